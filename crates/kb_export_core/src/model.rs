use std::path::PathBuf;

/// Display name used whenever an article's author cannot be resolved.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    pub sys_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub sys_id: String,
    pub label: String,
}

/// A fully populated article record.
///
/// Optional fields are `None` when the remote record omits them or carries an
/// empty value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    pub sys_id: String,
    pub short_description: Option<String>,
    pub title: Option<String>,
    pub html_body: String,
    pub author_ref: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub view_count: Option<String>,
    pub rating: Option<String>,
    pub knowledge_base_title: Option<String>,
    pub category_label: Option<String>,
    pub category_sys_id: Option<String>,
}

impl Article {
    /// `short_description`, then `title`, then a placeholder built from the id.
    /// Always non-empty and whitespace-normalized.
    pub fn resolved_title(&self) -> String {
        let candidate = [self.short_description.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .map(normalize_whitespace)
            .find(|t| !t.is_empty());
        match candidate {
            Some(title) => title,
            None => normalize_whitespace(&format!("Unnamed Article {}", self.sys_id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub sys_id: String,
}

impl Author {
    pub fn unknown(sys_id: impl Into<String>) -> Self {
        Self {
            name: UNKNOWN_AUTHOR.to_string(),
            sys_id: sys_id.into(),
        }
    }
}

/// Ordered key/value metadata. Keys keep insertion order; empty values are
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frontmatter {
    fields: Vec<(&'static str, String)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` trimmed, or nothing if it is absent or blank.
    pub fn insert(&mut self, key: &'static str, value: Option<&str>) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.fields.push((key, value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(k, _)| *k).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The final artifact of one article: where it goes and what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub destination: PathBuf,
    pub title: String,
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Collapses every run of whitespace (newlines and tabs included) into a
/// single space and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
