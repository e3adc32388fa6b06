//! Builds the immutable [`ExportConfig`] from flags, environment and an
//! optional RON file. Flags and environment win over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use kb_export_core::{parse_instance_url, Credentials, ExportConfig, KnowledgeBaseFilter};
use log::LevelFilter;
use ron::extensions::Extensions;
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(
    name = "kb-export",
    version,
    about = "Export ServiceNow knowledge bases into a tree of Markdown files"
)]
pub struct Cli {
    /// Instance host (dev1234.service-now.com) or full base URL.
    #[arg(long, env = "SERVICENOW_INSTANCE")]
    pub instance: Option<String>,

    #[arg(long, env = "SERVICENOW_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "SERVICENOW_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Comma-separated knowledge base titles to export; all when omitted.
    #[arg(long, env = "SERVICENOW_KNOWLEDGE_BASES")]
    pub knowledge_bases: Option<String>,

    #[arg(short, long, env = "KB_EXPORT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// RON file with default settings.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    instance: Option<String>,
    username: Option<String>,
    password: Option<String>,
    knowledge_bases: Vec<String>,
    output_dir: Option<PathBuf>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    max_response_bytes: Option<u64>,
}

pub fn load(cli: &Cli) -> Result<ExportConfig> {
    let file = match &cli.config {
        Some(path) => read_file_config(path)?,
        None => FileConfig::default(),
    };
    resolve(cli, file)
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn resolve(cli: &Cli, file: FileConfig) -> Result<ExportConfig> {
    let instance = pick(&cli.instance, file.instance);
    let username = pick(&cli.username, file.username);
    let password = pick(&cli.password, file.password);

    let missing: Vec<&str> = [
        ("SERVICENOW_INSTANCE", instance.is_none()),
        ("SERVICENOW_USERNAME", username.is_none()),
        ("SERVICENOW_PASSWORD", password.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();
    let (Some(instance), Some(username), Some(password)) = (instance, username, password) else {
        bail!(
            "Missing required configuration: {}. Set it in the environment, a .env file or the config file.",
            missing.join(", ")
        );
    };

    let instance = parse_instance_url(&instance)
        .with_context(|| format!("Invalid instance {instance:?}"))?;
    let mut config = ExportConfig::new(instance, Credentials { username, password });

    config.knowledge_bases = match &cli.knowledge_bases {
        Some(list) => KnowledgeBaseFilter::parse(list),
        None => KnowledgeBaseFilter::from_titles(&file.knowledge_bases),
    };
    if let Some(dir) = cli.output_dir.clone().or(file.output_dir) {
        config.output_dir = dir;
    }
    if let Some(secs) = file.connect_timeout_secs {
        config.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = cli.request_timeout_secs.or(file.request_timeout_secs) {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(bytes) = file.max_response_bytes {
        config.max_response_bytes = bytes;
    }
    Ok(config)
}

/// First non-blank of the flag/env value and the file value.
fn pick(flag: &Option<String>, file: Option<String>) -> Option<String> {
    flag.clone()
        .filter(|v| !v.trim().is_empty())
        .or(file)
        .filter(|v| !v.trim().is_empty())
}
