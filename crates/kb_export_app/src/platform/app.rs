use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use export_logging::{export_debug, export_error, export_info, export_warn};
use kb_export_core::{ArticleOutcome, BaseOutcome, RunReport, RunStatus};
use kb_export_engine::ExportEngine;

use super::config::{self, Cli};
use super::logging;

/// Runs one export. Exit status is non-zero only for fatal errors.
pub fn run_app() -> ExitCode {
    // Missing .env is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::initialize(cli.log_level(), cli.log_file.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            export_error!("✗ Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = config::load(cli)?;
    export_debug!("Export configuration: {:?}", config);

    let engine = ExportEngine::new(config).context("Failed to start the export engine")?;
    let report = engine.run()?;
    log_report(&report, engine.config().output_dir.display());
    Ok(())
}

fn log_report(report: &RunReport, output_dir: impl std::fmt::Display) {
    for base in &report.bases {
        if let BaseOutcome::Failed(reason) = &base.outcome {
            export_debug!("Knowledge base {} failed: {}", base.title, reason);
        }
        for article in &base.articles {
            if let ArticleOutcome::Skipped(reason) = &article.outcome {
                export_debug!(
                    "Article {} skipped: {}",
                    article.sys_id.as_deref().unwrap_or("<no id>"),
                    reason
                );
            }
        }
    }

    match report.status {
        RunStatus::Completed if report.is_clean() => {
            export_info!("✓ Knowledge base export completed successfully!");
            export_info!("  {}", report.summary_line());
            export_info!("  Articles saved to: {}", output_dir);
        }
        RunStatus::Completed => {
            export_warn!("✓ Knowledge base export completed with skipped items");
            export_warn!("  {}", report.summary_line());
            export_info!("  Articles saved to: {}", output_dir);
        }
        RunStatus::NoKnowledgeBases | RunStatus::NoMatchingKnowledgeBases => {
            export_warn!("{}", report.summary_line());
        }
    }
}
