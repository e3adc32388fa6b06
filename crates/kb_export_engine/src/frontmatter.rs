use export_logging::export_debug;
use kb_export_core::{Article, Author, ExportedDocument, Frontmatter, UNKNOWN_AUTHOR};

use crate::fetch::KnowledgeSource;

/// Metadata of one article in fixed key order. Blank sources are omitted;
/// `title` is always present.
pub fn compose(article: &Article, author: &Author) -> Frontmatter {
    let mut fm = Frontmatter::new();
    fm.insert("title", Some(article.resolved_title().as_str()));
    fm.insert("author", Some(author.name.as_str()));
    fm.insert("author_sys_id", Some(author.sys_id.as_str()));
    fm.insert("created_date", article.created_at.as_deref());
    fm.insert("updated_date", article.updated_at.as_deref());
    fm.insert("views", article.view_count.as_deref());
    fm.insert("rating", article.rating.as_deref());
    fm.insert("knowledge_base", article.knowledge_base_title.as_deref());
    fm.insert("category", article.category_label.as_deref());
    fm.insert("sys_id", Some(article.sys_id.as_str()));
    fm
}

/// `---` delimited block of `key: "value"` lines. Values are quoted, not escaped.
pub fn render_frontmatter(frontmatter: &Frontmatter) -> String {
    let mut lines = vec!["---".to_string()];
    lines.extend(
        frontmatter
            .iter()
            .map(|(key, value)| format!("{key}: \"{value}\"")),
    );
    lines.push("---".to_string());
    lines.join("\n")
}

pub fn build_markdown_document(document: &ExportedDocument) -> String {
    format!(
        "{frontmatter}\n\n# {title}\n\n{body}",
        frontmatter = render_frontmatter(&document.frontmatter),
        title = document.title,
        body = document.body.trim(),
    )
}

/// Looks up the author's display name. Never fails: a missing reference or
/// a failed lookup yields the "Unknown" author.
pub async fn resolve_author(source: &dyn KnowledgeSource, author_ref: Option<&str>) -> Author {
    let Some(sys_id) = author_ref.map(str::trim).filter(|id| !id.is_empty()) else {
        return Author::unknown("");
    };
    match source.user(sys_id).await {
        Ok(user) => Author {
            name: user.user_name().unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            sys_id: sys_id.to_string(),
        },
        Err(err) => {
            export_debug!("Author lookup for {} failed: {}", sys_id, err);
            Author::unknown(sys_id)
        }
    }
}
