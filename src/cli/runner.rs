//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::orchestrate::{HttpCatalogRefresher, HttpJobRunner, OrchestrationHandler};
use crate::transform::TransformJob;
use serde_json::Value;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<ExitCode> {
        let mut config = self.load_config()?;

        match &self.cli.command {
            Commands::Transform {
                source,
                destination,
                write_mode,
            } => {
                if let Some(source) = source {
                    config.transform.source.clone_from(source);
                }
                if let Some(destination) = destination {
                    config.transform.destination.clone_from(destination);
                }
                if let Some(mode) = write_mode {
                    config.transform.write_mode = (*mode).into();
                }
                config.validate()?;
                self.transform(&config).await
            }
            Commands::Trigger {
                payload,
                poll_interval,
            } => {
                if let Some(secs) = poll_interval {
                    config.orchestration.poll_interval_secs = *secs;
                }
                self.trigger(&config, payload.as_deref()).await
            }
            Commands::Serve { port } => {
                let handler = Arc::new(build_handler(&config)?);
                crate::cli::serve(handler, *port).await?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Validate => {
                config.validate()?;
                print!("{}", serde_yaml::to_string(&config)?);
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    /// Load configuration, falling back to defaults when no file is given
    fn load_config(&self) -> Result<PipelineConfig> {
        match &self.cli.config {
            Some(path) => PipelineConfig::load(path),
            None => Ok(PipelineConfig::default()),
        }
    }

    /// Run the transform job once
    async fn transform(&self, config: &PipelineConfig) -> Result<ExitCode> {
        let start = Instant::now();
        let job = TransformJob::from_config(&config.transform)?;

        match job.run().await {
            Ok(report) => {
                info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    rows = report.rows_written,
                    "Transform finished"
                );
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                if e.is_fatal_for_transform() {
                    error!(error = %e, "Transform job aborted");
                }
                Err(e)
            }
        }
    }

    /// Run one orchestration invocation and print the response
    async fn trigger(&self, config: &PipelineConfig, payload: Option<&str>) -> Result<ExitCode> {
        let payload = parse_payload(payload)?;
        let handler = build_handler(config)?;

        let response = handler.invoke(&payload).await;
        println!("{}", serde_json::to_string_pretty(&response)?);

        Ok(if response.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

/// Build a handler wired to the HTTP job and catalog services
pub fn build_handler(config: &PipelineConfig) -> Result<OrchestrationHandler> {
    let jobs = HttpJobRunner::new(&config.service)?;
    let catalog = HttpCatalogRefresher::new(&config.service)?;
    Ok(OrchestrationHandler::new(
        config.orchestration.clone(),
        Arc::new(jobs),
        Arc::new(catalog),
    ))
}

/// Parse an optional JSON payload (absent means `null`)
fn parse_payload(payload: Option<&str>) -> Result<Value> {
    match payload {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| Error::config(format!("Invalid --payload JSON: {e}"))),
        None => Ok(Value::Null),
    }
}
