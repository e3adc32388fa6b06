use std::time::Duration;

use export_logging::export_debug;
use futures_util::StreamExt;
use kb_export_core::{
    Credentials, ExportConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_RESPONSE_BYTES,
    DEFAULT_REQUEST_TIMEOUT,
};
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::record::{Record, Row};
use crate::types::{FailureKind, FetchError};

const KNOWLEDGE_BASE_TABLE: &str = "kb_knowledge_base";
const CATEGORY_TABLE: &str = "kb_category";
const ARTICLE_TABLE: &str = "kb_knowledge";
const USER_TABLE: &str = "sys_user";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl From<&ExportConfig> for FetchSettings {
    fn from(config: &ExportConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
            max_bytes: config.max_response_bytes,
        }
    }
}

/// Read-only access to the remote knowledge-base tables.
#[async_trait::async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Listing calls keep malformed rows as per-row errors.
    async fn knowledge_bases(&self) -> Result<Vec<Row>, FetchError>;

    async fn categories(&self) -> Result<Vec<Row>, FetchError>;

    /// Partial article records of one knowledge base; only ids are relied on.
    async fn articles_in(&self, knowledge_base: &str) -> Result<Vec<Row>, FetchError>;

    async fn article(&self, sys_id: &str) -> Result<Record, FetchError>;

    async fn user(&self, sys_id: &str) -> Result<Record, FetchError>;
}

/// Table API client with basic authentication.
#[derive(Debug, Clone)]
pub struct ServiceNowClient {
    client: reqwest::Client,
    instance: Url,
    credentials: Credentials,
    settings: FetchSettings,
}

impl ServiceNowClient {
    pub fn new(
        instance: Url,
        credentials: Credentials,
        settings: FetchSettings,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            instance,
            credentials,
            settings,
        })
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self, FetchError> {
        Self::new(
            config.instance.clone(),
            config.credentials.clone(),
            FetchSettings::from(config),
        )
    }

    fn table_url(&self, table: &str, sys_id: Option<&str>) -> Result<Url, FetchError> {
        let mut url = self
            .instance
            .join(&format!("/api/now/table/{table}"))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if let Some(sys_id) = sys_id {
            url.path_segments_mut()
                .map_err(|_| {
                    FetchError::new(FailureKind::InvalidUrl, "instance url cannot be a base")
                })?
                .push(sys_id);
        }
        Ok(url)
    }

    async fn get_result(&self, url: Url) -> Result<Value, FetchError> {
        export_debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| map_reqwest_error(&self.instance, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("GET {url} returned {status}"),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(&self.instance, err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let mut envelope: Value = serde_json::from_slice(&bytes).map_err(|err| {
            FetchError::new(FailureKind::InvalidJson, format!("{url}: {err}"))
        })?;
        envelope
            .get_mut("result")
            .map(Value::take)
            .ok_or_else(|| {
                FetchError::new(FailureKind::InvalidJson, format!("{url}: no `result` in response"))
            })
    }

    async fn get_list(&self, url: Url) -> Result<Vec<Row>, FetchError> {
        let result = self.get_result(url.clone()).await?;
        let Value::Array(rows) = result else {
            return Err(FetchError::new(
                FailureKind::InvalidJson,
                format!("{url}: `result` is not a list"),
            ));
        };
        Ok(rows.into_iter().map(Record::from_value).collect())
    }

    async fn get_one(&self, url: Url) -> Result<Record, FetchError> {
        let result = self.get_result(url.clone()).await?;
        Record::from_value(result).map_err(|_| {
            FetchError::new(FailureKind::InvalidJson, format!("{url}: `result` is not an object"))
        })
    }
}

#[async_trait::async_trait]
impl KnowledgeSource for ServiceNowClient {
    async fn knowledge_bases(&self) -> Result<Vec<Row>, FetchError> {
        self.get_list(self.table_url(KNOWLEDGE_BASE_TABLE, None)?).await
    }

    async fn categories(&self) -> Result<Vec<Row>, FetchError> {
        self.get_list(self.table_url(CATEGORY_TABLE, None)?).await
    }

    async fn articles_in(&self, knowledge_base: &str) -> Result<Vec<Row>, FetchError> {
        let mut url = self.table_url(ARTICLE_TABLE, None)?;
        url.query_pairs_mut()
            .append_pair("knowledge_base", knowledge_base)
            .append_pair("sysparm_fields", "sys_id");
        self.get_list(url).await
    }

    async fn article(&self, sys_id: &str) -> Result<Record, FetchError> {
        self.get_one(self.table_url(ARTICLE_TABLE, Some(sys_id))?).await
    }

    async fn user(&self, sys_id: &str) -> Result<Record, FetchError> {
        self.get_one(self.table_url(USER_TABLE, Some(sys_id))?).await
    }
}

fn map_reqwest_error(instance: &Url, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_connect() {
        return FetchError::new(
            FailureKind::Network,
            format!("could not connect to {instance}: {err}"),
        );
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
