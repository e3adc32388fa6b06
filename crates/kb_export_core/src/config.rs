use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const DEFAULT_OUTPUT_DIR: &str = "articles";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 32 * 1024 * 1024;

/// Immutable settings for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub instance: Url,
    pub credentials: Credentials,
    pub knowledge_bases: KnowledgeBaseFilter,
    pub output_dir: PathBuf,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl ExportConfig {
    pub fn new(instance: Url, credentials: Credentials) -> Self {
        Self {
            instance,
            credentials,
            knowledge_bases: KnowledgeBaseFilter::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Allow-list of knowledge base titles. An empty filter admits every base.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KnowledgeBaseFilter {
    titles: BTreeSet<String>,
}

impl KnowledgeBaseFilter {
    /// Parses a comma-separated list; entries are trimmed and blanks dropped.
    pub fn parse(list: &str) -> Self {
        Self::from_titles(list.split(','))
    }

    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let titles = titles
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self { titles }
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Exact, case-sensitive match against the trimmed title.
    pub fn admits(&self, title: &str) -> bool {
        self.titles.is_empty() || self.titles.contains(title.trim())
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }
}

/// Accepts either a bare host (`dev1234.service-now.com`) or a full URL.
pub fn parse_instance_url(raw: &str) -> Result<Url, url::ParseError> {
    let raw = raw.trim().trim_end_matches('/');
    if raw.contains("://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("https://{raw}"))
    }
}
