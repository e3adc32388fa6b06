use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    NoKnowledgeBases,
    NoMatchingKnowledgeBases,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseOutcome {
    Exported,
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    Written(PathBuf),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleReport {
    pub sys_id: Option<String>,
    pub outcome: ArticleOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseReport {
    pub title: String,
    pub outcome: BaseOutcome,
    pub articles: Vec<ArticleReport>,
}

impl BaseReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outcome: BaseOutcome::Exported,
            articles: Vec::new(),
        }
    }

    pub fn failed(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outcome: BaseOutcome::Failed(reason.into()),
            articles: Vec::new(),
        }
    }

    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.articles.iter().filter_map(|a| match &a.outcome {
            ArticleOutcome::Written(path) => Some(path),
            ArticleOutcome::Skipped(_) => None,
        })
    }
}

/// Per-item results of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub status: RunStatus,
    pub bases: Vec<BaseReport>,
}

impl RunReport {
    pub fn new(status: RunStatus) -> Self {
        Self {
            status,
            bases: Vec::new(),
        }
    }

    pub fn written_count(&self) -> usize {
        self.bases.iter().map(|b| b.written().count()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.bases
            .iter()
            .flat_map(|b| &b.articles)
            .filter(|a| matches!(a.outcome, ArticleOutcome::Skipped(_)))
            .count()
    }

    pub fn failed_bases(&self) -> usize {
        self.bases
            .iter()
            .filter(|b| matches!(b.outcome, BaseOutcome::Failed(_)))
            .count()
    }

    /// True when nothing was skipped or failed along the way.
    pub fn is_clean(&self) -> bool {
        self.skipped_count() == 0 && self.failed_bases() == 0
    }

    pub fn summary_line(&self) -> String {
        match self.status {
            RunStatus::NoKnowledgeBases => "No knowledge bases found; nothing exported".to_string(),
            RunStatus::NoMatchingKnowledgeBases => {
                "No matching knowledge bases found; nothing exported".to_string()
            }
            RunStatus::Completed => format!(
                "Exported {} article(s) from {} knowledge base(s); {} article(s) skipped, {} knowledge base(s) failed",
                self.written_count(),
                self.bases.len(),
                self.skipped_count(),
                self.failed_bases()
            ),
        }
    }
}
