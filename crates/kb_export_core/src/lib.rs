//! KB export core: pure domain model, run configuration and run report.
mod config;
mod model;
mod report;

pub use config::{
    parse_instance_url, Credentials, ExportConfig, KnowledgeBaseFilter, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_OUTPUT_DIR, DEFAULT_REQUEST_TIMEOUT,
};
pub use model::{
    normalize_whitespace, Article, Author, Category, ExportedDocument, Frontmatter,
    KnowledgeBase, UNKNOWN_AUTHOR,
};
pub use report::{
    ArticleOutcome, ArticleReport, BaseOutcome, BaseReport, RunReport, RunStatus,
};
