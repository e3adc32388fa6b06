use std::path::PathBuf;

use export_logging::{export_info, export_warn};
use kb_export_core::{
    ArticleOutcome, ArticleReport, BaseOutcome, BaseReport, ExportedDocument, KnowledgeBaseFilter,
    RunReport, RunStatus,
};

use crate::convert::MarkdownTransformer;
use crate::fetch::KnowledgeSource;
use crate::frontmatter::{build_markdown_document, compose, resolve_author};
use crate::hierarchy::{HierarchyResolver, PlacedArticle, Resolution, ResolvedArticle, ResolvedBase};
use crate::persist::{ensure_output_dir, AtomicFileWriter};
use crate::types::ExportError;

/// Sequential export of a whole hierarchy into `output_root`.
///
/// Failures of one knowledge base or one article are recorded in the returned
/// [`RunReport`] and never stop the run; only fetch failures abort it.
pub struct Exporter<'a> {
    source: &'a dyn KnowledgeSource,
    transformer: MarkdownTransformer,
    output_root: PathBuf,
}

impl<'a> Exporter<'a> {
    pub fn new(source: &'a dyn KnowledgeSource, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            transformer: MarkdownTransformer::default(),
            output_root: output_root.into(),
        }
    }

    pub fn with_transformer(mut self, transformer: MarkdownTransformer) -> Self {
        self.transformer = transformer;
        self
    }

    pub async fn run(&self, filter: &KnowledgeBaseFilter) -> Result<RunReport, ExportError> {
        export_info!("Starting knowledge base export...");
        let resolver = HierarchyResolver::new(self.source, &self.output_root);
        let bases = match resolver.resolve(filter).await? {
            Resolution::NoKnowledgeBases => return Ok(RunReport::new(RunStatus::NoKnowledgeBases)),
            Resolution::NoMatchingKnowledgeBases => {
                return Ok(RunReport::new(RunStatus::NoMatchingKnowledgeBases))
            }
            Resolution::Resolved(bases) => bases,
        };

        let mut report = RunReport::new(RunStatus::Completed);
        for base in bases {
            report.bases.push(self.export_base(base).await);
        }
        Ok(report)
    }

    async fn export_base(&self, base: ResolvedBase) -> BaseReport {
        if let Err(err) = &base.knowledge_base {
            export_warn!("Error processing knowledge base {}: {}", base.title, err);
            return BaseReport::failed(base.title, err.to_string());
        }

        export_info!("Processing knowledge base: {}", base.title);
        if let Err(err) = ensure_output_dir(&base.directory) {
            export_warn!("Error processing knowledge base {}: {}", base.title, err);
            return BaseReport::failed(base.title, err.to_string());
        }

        let mut report = BaseReport::new(base.title.as_str());
        if base.articles.is_empty() {
            export_warn!("No articles found in knowledge base: {}", base.title);
            report.outcome = BaseOutcome::Empty;
            return report;
        }

        for article in base.articles {
            report.articles.push(self.export_article(article).await);
        }
        report
    }

    async fn export_article(&self, entry: ResolvedArticle) -> ArticleReport {
        let placed = match entry.placed {
            Ok(placed) => placed,
            Err(err) => {
                export_warn!("  Skipping article due to missing data: {}", err);
                return ArticleReport {
                    sys_id: entry.sys_id,
                    outcome: ArticleOutcome::Skipped(err.to_string()),
                };
            }
        };

        let destination = placed.destination();
        export_info!(
            "→ {}",
            destination
                .strip_prefix(&self.output_root)
                .unwrap_or(&destination)
                .display()
        );

        let document = self.document_for(&placed).await;
        let writer = AtomicFileWriter::new(placed.directory.clone());
        let outcome = match writer.write(&placed.file_name, &build_markdown_document(&document)) {
            Ok(path) => ArticleOutcome::Written(path),
            Err(err) => {
                export_warn!("  Skipping article {}: {}", placed.article.sys_id, err);
                ArticleOutcome::Skipped(err.to_string())
            }
        };
        ArticleReport {
            sys_id: entry.sys_id,
            outcome,
        }
    }

    /// Transforms and composes one placed article; the author lookup is the
    /// only remote call and it cannot fail.
    pub async fn document_for(&self, placed: &PlacedArticle) -> ExportedDocument {
        let article = &placed.article;
        let author = resolve_author(self.source, article.author_ref.as_deref()).await;
        let title = article.resolved_title();
        ExportedDocument {
            destination: placed.destination(),
            frontmatter: compose(article, &author),
            body: self.transformer.transform(&article.html_body, &title),
            title,
        }
    }
}
