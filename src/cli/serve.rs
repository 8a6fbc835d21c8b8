use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::llm::factory;
use crate::pipeline::advisor::Advisor;
use crate::server;
use crate::submission_log::CsvSubmissionLog;

#[derive(Debug, Default, Clone)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
    pub submissions_dir: Option<String>,
}

/// Merge CLI overrides into the loaded config.
pub fn apply_overrides(config: &mut Config, overrides: ServeOverrides) {
    if let Some(host) = overrides.host {
        info!("CLI override: host = {}", host);
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(model) = overrides.model {
        info!("CLI override: model = {}", model);
        config.llm.model = model;
    }
    if let Some(dir) = overrides.submissions_dir {
        info!("CLI override: submissions directory = {}", dir);
        config.submissions.directory = dir.into();
    }
}

pub async fn run(config_path: Option<String>, overrides: ServeOverrides, dry_run: bool) -> Result<()> {
    let mut config = Config::load_with_path(config_path)?;
    apply_overrides(&mut config, overrides);

    info!("Provider: {} (model: {})", config.llm.provider, config.llm.model);
    info!(
        "Submission logs: {}",
        config.submissions.directory.display()
    );
    info!("Dry run: {}", dry_run);

    let client = factory::create_client(&config, dry_run)?;
    let log = CsvSubmissionLog::new(config.submissions.directory.clone());
    let advisor = Advisor::from_config(&config, client, Box::new(log));

    server::run_server(advisor, &config.server.host, config.server.port)
        .await
        .context("HTTP server failed")
}
