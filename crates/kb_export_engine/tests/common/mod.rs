#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use kb_export_engine::{FailureKind, FetchError, KnowledgeSource, Record, Row};
use serde_json::{json, Value};

/// In-memory stand-in for the remote tables.
#[derive(Default)]
pub struct FakeSource {
    knowledge_bases: Vec<Value>,
    categories: Vec<Value>,
    listings: HashMap<String, Vec<Value>>,
    articles: HashMap<String, Value>,
    users: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_record(mut self, record: Value) -> Self {
        self.knowledge_bases.push(record);
        self
    }

    pub fn with_base(self, sys_id: &str, title: &str) -> Self {
        self.with_base_record(json!({ "sys_id": sys_id, "title": title }))
    }

    pub fn with_category(mut self, sys_id: &str, label: &str) -> Self {
        self.categories
            .push(json!({ "sys_id": sys_id, "label": label }));
        self
    }

    /// Lists `record` under `kb` and serves it as the full article record.
    pub fn with_article(mut self, kb: &str, record: Value) -> Self {
        let sys_id = record["sys_id"].as_str().unwrap_or_default().to_string();
        self.listings
            .entry(kb.to_string())
            .or_default()
            .push(json!({ "sys_id": sys_id }));
        self.articles.insert(sys_id, record);
        self
    }

    pub fn with_category_record(mut self, record: Value) -> Self {
        self.categories.push(record);
        self
    }

    pub fn with_listing_row(mut self, kb: &str, row: Value) -> Self {
        self.listings.entry(kb.to_string()).or_default().push(row);
        self
    }

    pub fn with_user(mut self, sys_id: &str, first: &str, last: &str) -> Self {
        self.users.insert(
            sys_id.to_string(),
            json!({ "first_name": first, "last_name": last }),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String, value: Option<&Value>) -> Result<Record, FetchError> {
        self.calls.lock().unwrap().push(call.clone());
        value
            .cloned()
            .and_then(|v| Record::from_value(v).ok())
            .ok_or(FetchError {
                kind: FailureKind::HttpStatus(404),
                message: call,
            })
    }

    fn rows(&self, call: String, rows: &[Value]) -> Vec<Row> {
        self.calls.lock().unwrap().push(call);
        rows.iter().cloned().map(Record::from_value).collect()
    }
}

#[async_trait::async_trait]
impl KnowledgeSource for FakeSource {
    async fn knowledge_bases(&self) -> Result<Vec<Row>, FetchError> {
        Ok(self.rows("knowledge_bases".into(), &self.knowledge_bases))
    }

    async fn categories(&self) -> Result<Vec<Row>, FetchError> {
        Ok(self.rows("categories".into(), &self.categories))
    }

    async fn articles_in(&self, knowledge_base: &str) -> Result<Vec<Row>, FetchError> {
        let rows = self
            .listings
            .get(knowledge_base)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(self.rows(format!("articles_in {knowledge_base}"), rows))
    }

    async fn article(&self, sys_id: &str) -> Result<Record, FetchError> {
        self.record(format!("article {sys_id}"), self.articles.get(sys_id))
    }

    async fn user(&self, sys_id: &str) -> Result<Record, FetchError> {
        self.record(format!("user {sys_id}"), self.users.get(sys_id))
    }
}

/// A source whose every call fails like an unreachable instance.
pub struct UnreachableSource;

#[async_trait::async_trait]
impl KnowledgeSource for UnreachableSource {
    async fn knowledge_bases(&self) -> Result<Vec<Row>, FetchError> {
        Err(unreachable_error())
    }

    async fn categories(&self) -> Result<Vec<Row>, FetchError> {
        Err(unreachable_error())
    }

    async fn articles_in(&self, _knowledge_base: &str) -> Result<Vec<Row>, FetchError> {
        Err(unreachable_error())
    }

    async fn article(&self, _sys_id: &str) -> Result<Record, FetchError> {
        Err(unreachable_error())
    }

    async fn user(&self, _sys_id: &str) -> Result<Record, FetchError> {
        Err(unreachable_error())
    }
}

fn unreachable_error() -> FetchError {
    FetchError {
        kind: FailureKind::Network,
        message: "could not connect".into(),
    }
}

pub fn record(value: Value) -> Record {
    Record::from_value(value).expect("object record")
}
