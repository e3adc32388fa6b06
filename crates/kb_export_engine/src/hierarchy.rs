use std::collections::HashMap;
use std::path::{Path, PathBuf};

use export_logging::{export_info, export_warn};
use kb_export_core::{Article, Category, KnowledgeBase, KnowledgeBaseFilter};

use crate::fetch::KnowledgeSource;
use crate::filename::sanitize;
use crate::record::{Row, UNNAMED_BASE};
use crate::types::{FetchError, RecordError};

/// Global `sys_id -> Category` lookup, shared by every knowledge base.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    by_id: HashMap<String, Category>,
}

impl CategoryIndex {
    /// Rows without a usable `sys_id` cannot be referenced and are dropped.
    pub fn from_records(rows: &[Row]) -> Self {
        let mut by_id = HashMap::with_capacity(rows.len());
        for row in rows {
            match row.as_ref().map_err(Clone::clone).and_then(|r| r.category()) {
                Ok(category) => {
                    by_id.insert(category.sys_id.trim().to_string(), category);
                }
                Err(err) => export_warn!("Ignoring category: {}", err),
            }
        }
        Self { by_id }
    }

    pub fn get(&self, sys_id: Option<&str>) -> Option<&Category> {
        self.by_id.get(sys_id?.trim())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NoKnowledgeBases,
    NoMatchingKnowledgeBases,
    Resolved(Vec<ResolvedBase>),
}

/// A retained knowledge base with its articles. `knowledge_base` is an error
/// when the base record itself is unusable; `articles` is then empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBase {
    pub title: String,
    pub directory: PathBuf,
    pub knowledge_base: Result<KnowledgeBase, RecordError>,
    pub articles: Vec<ResolvedArticle>,
}

/// One listed article: either placed in the tree or rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArticle {
    pub sys_id: Option<String>,
    pub placed: Result<PlacedArticle, RecordError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedArticle {
    pub article: Article,
    pub category: Option<Category>,
    pub directory: PathBuf,
    pub file_name: String,
}

impl PlacedArticle {
    pub fn destination(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// `<root>/<kb>/[<category>/]<article>.md`, every segment sanitized.
pub fn destination_path(
    output_root: &Path,
    knowledge_base: &str,
    category: Option<&str>,
    article_title: &str,
) -> PathBuf {
    destination_dir(output_root, knowledge_base, category).join(article_file_name(article_title))
}

pub fn destination_dir(output_root: &Path, knowledge_base: &str, category: Option<&str>) -> PathBuf {
    let mut dir = output_root.join(sanitize(knowledge_base));
    if let Some(label) = category {
        dir.push(sanitize(label));
    }
    dir
}

fn article_file_name(title: &str) -> String {
    format!("{}.md", sanitize(title))
}

pub struct HierarchyResolver<'a> {
    source: &'a dyn KnowledgeSource,
    output_root: &'a Path,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(source: &'a dyn KnowledgeSource, output_root: &'a Path) -> Self {
        Self {
            source,
            output_root,
        }
    }

    /// Fetches the whole hierarchy. Only transport and protocol failures are
    /// returned as errors; record-level problems stay inside the result.
    pub async fn resolve(&self, filter: &KnowledgeBaseFilter) -> Result<Resolution, FetchError> {
        export_info!("Fetching knowledge bases and categories...");
        let mut records = self.source.knowledge_bases().await?;
        if records.is_empty() {
            export_warn!("No knowledge bases found");
            return Ok(Resolution::NoKnowledgeBases);
        }

        if !filter.is_empty() {
            export_info!(
                "Filtering knowledge bases: {}",
                filter.titles().collect::<Vec<_>>().join(", ")
            );
            records.retain(|row| {
                row.as_ref()
                    .is_ok_and(|r| filter.admits(&r.text("title").unwrap_or_default()))
            });
            if records.is_empty() {
                export_warn!("No matching knowledge bases found");
                return Ok(Resolution::NoMatchingKnowledgeBases);
            }
        }

        let categories = CategoryIndex::from_records(&self.source.categories().await?);
        export_info!(
            "Found {} knowledge base(s) and {} categories",
            records.len(),
            categories.len()
        );

        let mut bases = Vec::with_capacity(records.len());
        for row in &records {
            bases.push(self.resolve_base(row, &categories).await?);
        }
        Ok(Resolution::Resolved(bases))
    }

    async fn resolve_base(
        &self,
        row: &Row,
        categories: &CategoryIndex,
    ) -> Result<ResolvedBase, FetchError> {
        let title = row
            .as_ref()
            .map_or_else(|_| UNNAMED_BASE.to_string(), |r| r.base_title());
        let directory = destination_dir(self.output_root, &title, None);
        let parsed = row
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|r| r.knowledge_base());
        let knowledge_base = match parsed {
            Ok(kb) => kb,
            Err(err) => {
                return Ok(ResolvedBase {
                    title,
                    directory,
                    knowledge_base: Err(err),
                    articles: Vec::new(),
                })
            }
        };

        let listed = self.source.articles_in(&knowledge_base.sys_id).await?;
        export_info!("Fetched {} article(s) of {}", listed.len(), title);

        let mut articles = Vec::with_capacity(listed.len());
        for row in &listed {
            articles.push(self.resolve_article(&knowledge_base, row, categories).await?);
        }

        Ok(ResolvedBase {
            title,
            directory,
            knowledge_base: Ok(knowledge_base),
            articles,
        })
    }

    async fn resolve_article(
        &self,
        knowledge_base: &KnowledgeBase,
        row: &Row,
        categories: &CategoryIndex,
    ) -> Result<ResolvedArticle, FetchError> {
        let listed_id = row
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|r| r.require("article", "sys_id"));
        let sys_id = match listed_id {
            Ok(id) => id,
            Err(err) => {
                return Ok(ResolvedArticle {
                    sys_id: None,
                    placed: Err(err),
                })
            }
        };

        // The listing only carries ids; the body needs the full record.
        let full = self.source.article(&sys_id).await?;
        let mut article = full.article(&sys_id);
        let category = categories.get(article.category_sys_id.as_deref()).cloned();

        article
            .knowledge_base_title
            .get_or_insert_with(|| knowledge_base.title.clone());
        if let Some(category) = &category {
            article
                .category_label
                .get_or_insert_with(|| category.label.clone());
        }

        let directory = destination_dir(
            self.output_root,
            &knowledge_base.title,
            category.as_ref().map(|c| c.label.as_str()),
        );
        let file_name = article_file_name(&article.resolved_title());

        Ok(ResolvedArticle {
            sys_id: Some(sys_id),
            placed: Ok(PlacedArticle {
                article,
                category,
                directory,
                file_name,
            }),
        })
    }
}
