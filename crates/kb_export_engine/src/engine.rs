use kb_export_core::{ExportConfig, RunReport};
use tokio::runtime::{Builder, Runtime};

use crate::export::Exporter;
use crate::fetch::ServiceNowClient;
use crate::types::ExportError;

/// Blocking entry point: owns a single-threaded runtime and the HTTP client,
/// and runs one export per [`ExportEngine::run`] call.
pub struct ExportEngine {
    runtime: Runtime,
    client: ServiceNowClient,
    config: ExportConfig,
}

impl ExportEngine {
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let client = {
            let _guard = runtime.enter();
            ServiceNowClient::from_config(&config)?
        };
        Ok(Self {
            runtime,
            client,
            config,
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn run(&self) -> Result<RunReport, ExportError> {
        let exporter = Exporter::new(&self.client, self.config.output_dir.clone());
        self.runtime
            .block_on(exporter.run(&self.config.knowledge_bases))
    }
}
