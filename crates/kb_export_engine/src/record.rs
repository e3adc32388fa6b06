use kb_export_core::{Article, Category, KnowledgeBase};
use serde_json::{Map, Value};

use crate::types::RecordError;

pub(crate) const UNNAMED_BASE: &str = "Unnamed Knowledge Base";
const UNNAMED_CATEGORY: &str = "Unnamed Category";

/// One listing row: a record, or the reason it cannot be one.
pub type Row = Result<Record, RecordError>;

/// One row of a table API response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(Map<String, Value>);

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl Record {
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(RecordError::NotAnObject),
        }
    }

    /// Field as text. Reference fields (`{"link": .., "value": ..}`) yield
    /// their `value`; numbers and booleans are stringified. Blank is `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        value_text(self.0.get(key)?)
    }

    pub fn require(&self, record: &'static str, field: &'static str) -> Result<String, RecordError> {
        self.text(field)
            .ok_or(RecordError::MissingField { record, field })
    }

    pub fn knowledge_base(&self) -> Result<KnowledgeBase, RecordError> {
        Ok(KnowledgeBase {
            sys_id: self.require("knowledge base", "sys_id")?,
            title: self.base_title(),
        })
    }

    /// Trimmed `title` of a knowledge base record, or a placeholder.
    pub fn base_title(&self) -> String {
        self.text("title")
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| UNNAMED_BASE.to_string())
    }

    pub fn category(&self) -> Result<Category, RecordError> {
        Ok(Category {
            sys_id: self.require("category", "sys_id")?,
            label: self
                .text("label")
                .unwrap_or_else(|| UNNAMED_CATEGORY.to_string()),
        })
    }

    /// Builds an article from a full record. `listed_id` is the id the article
    /// was requested by; it fills in when the record itself omits `sys_id`.
    pub fn article(&self, listed_id: &str) -> Article {
        Article {
            sys_id: self.text("sys_id").unwrap_or_else(|| listed_id.to_string()),
            short_description: self.text("short_description"),
            title: self.text("title"),
            html_body: self.text("text").unwrap_or_default(),
            author_ref: self.text("author"),
            created_at: self.text("sys_created_on"),
            updated_at: self.text("sys_updated_on"),
            view_count: self.text("view_count"),
            rating: self.text("rating"),
            knowledge_base_title: self.text("kb_knowledge_base.title"),
            category_label: self.text("kb_category.label"),
            category_sys_id: self.text("kb_category"),
        }
    }

    /// `"first last"` of a user record, if either part is present.
    pub fn user_name(&self) -> Option<String> {
        let first = self.text("first_name").unwrap_or_default();
        let last = self.text("last_name").unwrap_or_default();
        let name = format!("{} {}", first.trim(), last.trim()).trim().to_string();
        (!name.is_empty()).then_some(name)
    }
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(reference) => return reference.get("value").and_then(value_text),
        Value::Null | Value::Array(_) => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}
