//! Pipeline configuration
//!
//! Locations, job and crawler names, and service endpoints are fixed per
//! deployment. They are loaded from YAML; every field falls back to the
//! production default so an empty file is a valid configuration.
//!
//! ```yaml
//! transform:
//!   source: s3://final-project-bucket-26/raw/
//!   destination: s3://final-project-bucket-26/curated/ecommerce_transactions/
//!   write_mode: overwrite_partitions
//! orchestration:
//!   job_name: pandas_etl_job
//!   crawler_name: curated_to_analysis_crawler
//!   poll_interval_secs: 15
//! service:
//!   base_url: http://localhost:8090
//! ```

use crate::error::{Error, Result};
use crate::types::{Compression, WriteMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default raw input location
pub const DEFAULT_SOURCE: &str = "s3://final-project-bucket-26/raw/";

/// Default curated output location
pub const DEFAULT_DESTINATION: &str = "s3://final-project-bucket-26/curated/ecommerce_transactions/";

/// Default transform job name
pub const DEFAULT_JOB_NAME: &str = "pandas_etl_job";

/// Default catalog crawler name
pub const DEFAULT_CRAWLER_NAME: &str = "curated_to_analysis_crawler";

/// Default poll cadence in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Transform job settings
    #[serde(default)]
    pub transform: TransformConfig,

    /// Orchestration handler settings
    #[serde(default)]
    pub orchestration: OrchestrationConfig,

    /// Job/catalog service endpoint settings
    #[serde(default)]
    pub service: ServiceConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.transform.source.trim().is_empty() {
            return Err(Error::invalid_value("transform.source", "must not be empty"));
        }
        if self.transform.destination.trim().is_empty() {
            return Err(Error::invalid_value(
                "transform.destination",
                "must not be empty",
            ));
        }
        if self.transform.source.trim_end_matches('/')
            == self.transform.destination.trim_end_matches('/')
        {
            return Err(Error::invalid_value(
                "transform.destination",
                "must differ from transform.source",
            ));
        }
        crate::storage::delimiter_byte(self.transform.delimiter)?;
        if self.orchestration.job_name.trim().is_empty() {
            return Err(Error::invalid_value(
                "orchestration.job_name",
                "must not be empty",
            ));
        }
        if self.orchestration.crawler_name.trim().is_empty() {
            return Err(Error::invalid_value(
                "orchestration.crawler_name",
                "must not be empty",
            ));
        }
        url::Url::parse(&self.service.base_url)
            .map_err(|e| Error::invalid_value("service.base_url", e.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// Transform Config
// ============================================================================

/// Settings for the transform job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    /// Raw delimited-text input location
    #[serde(default = "default_source")]
    pub source: String,

    /// Curated partitioned output location
    #[serde(default = "default_destination")]
    pub destination: String,

    /// How the output replaces existing data
    #[serde(default)]
    pub write_mode: WriteMode,

    /// Field delimiter for input files
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Parquet compression codec
    #[serde(default)]
    pub compression: Compression,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            destination: default_destination(),
            write_mode: WriteMode::default(),
            delimiter: default_delimiter(),
            compression: Compression::default(),
        }
    }
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_destination() -> String {
    DEFAULT_DESTINATION.to_string()
}

fn default_delimiter() -> char {
    ','
}

// ============================================================================
// Orchestration Config
// ============================================================================

/// Settings for the orchestration handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrchestrationConfig {
    /// Name of the transform job registered with the job service
    #[serde(default = "default_job_name")]
    pub job_name: String,

    /// Name of the catalog crawler started after a successful run
    #[serde(default = "default_crawler_name")]
    pub crawler_name: String,

    /// Seconds between job state checks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl OrchestrationConfig {
    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            job_name: default_job_name(),
            crawler_name: default_crawler_name(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_job_name() -> String {
    DEFAULT_JOB_NAME.to_string()
}

fn default_crawler_name() -> String {
    DEFAULT_CRAWLER_NAME.to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

// ============================================================================
// Service Config
// ============================================================================

/// Endpoint settings for the job and catalog services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Base URL shared by the job and catalog APIs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Dotted path to the run id in the submission response
    #[serde(default = "default_run_id_path")]
    pub run_id_path: String,

    /// Dotted path to the run state in the status response
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

impl ServiceConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            run_id_path: default_run_id_path(),
            state_path: default_state_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8090".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_run_id_path() -> String {
    "JobRunId".to_string()
}

fn default_state_path() -> String {
    "JobRun.JobRunState".to_string()
}
