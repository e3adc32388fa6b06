//! KB export engine: fetch, transform and persist a knowledge-base hierarchy.
mod convert;
mod engine;
mod export;
mod fetch;
mod filename;
mod frontmatter;
mod hierarchy;
mod persist;
mod record;
mod types;

pub use convert::{transform, Converter, Html2MdConverter, MarkdownTransformer};
pub use engine::ExportEngine;
pub use export::Exporter;
pub use fetch::{FetchSettings, KnowledgeSource, ServiceNowClient};
pub use filename::sanitize;
pub use frontmatter::{build_markdown_document, compose, render_frontmatter, resolve_author};
pub use hierarchy::{
    destination_dir, destination_path, CategoryIndex, HierarchyResolver, PlacedArticle,
    Resolution, ResolvedArticle, ResolvedBase,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use record::{Record, Row};
pub use types::{ExportError, FailureKind, FetchError, RecordError};
