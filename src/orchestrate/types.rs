//! Orchestration types and service traits

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body message when the job and the crawler start both succeed
pub const SUCCESS_MESSAGE: &str = "Glue Job completed & crawler started";

/// Body error when the job ends in any state other than SUCCEEDED
pub const JOB_NOT_SUCCEEDED_MESSAGE: &str = "Glue Job failed or stopped";

// ============================================================================
// Job Run State
// ============================================================================

/// Observed state of a job run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRunState {
    /// Any non-terminal state, with the raw service value
    Running(String),
    /// Finished successfully
    Succeeded,
    /// Finished unsuccessfully, with the raw service value
    Failed(String),
    /// Stopped before finishing
    Stopped,
}

impl JobRunState {
    /// Map a service state string
    ///
    /// `FAILED`, `ERROR` and `TIMEOUT` are failures; unknown values are
    /// treated as still running.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" | "ERROR" | "TIMEOUT" => Self::Failed(raw.trim().to_string()),
            "STOPPED" => Self::Stopped,
            _ => Self::Running(raw.trim().to_string()),
        }
    }

    /// Check if the run can no longer change state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running(_))
    }

    /// Check if the run finished successfully
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// State name for logs
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running(raw) | Self::Failed(raw) => raw,
            Self::Succeeded => "SUCCEEDED",
            Self::Stopped => "STOPPED",
        }
    }
}

// ============================================================================
// Handler Response
// ============================================================================

/// Response body returned to the trigger's caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success { message: String, run_id: String },
    Failure { error: String },
}

/// Structured result of one handler invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    /// 200 on success, 500 on any failure
    pub status_code: u16,
    pub body: ResponseBody,
}

impl HandlerResponse {
    /// Job succeeded and the crawler was started
    pub fn success(run_id: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody::Success {
                message: SUCCESS_MESSAGE.to_string(),
                run_id: run_id.into(),
            },
        }
    }

    /// Any failure path
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            body: ResponseBody::Failure {
                error: error.into(),
            },
        }
    }

    /// Check if this is a success response
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

// ============================================================================
// Service Traits
// ============================================================================

/// Submits named batch jobs and reports their run state
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Start a run of the named job, returning its run id
    async fn submit(&self, job_name: &str) -> Result<String>;

    /// Current state of a run
    async fn get_state(&self, job_name: &str, run_id: &str) -> Result<JobRunState>;
}

/// Starts named catalog refresh tasks
#[async_trait]
pub trait CatalogRefresher: Send + Sync {
    /// Start the named crawler; returns once the start is accepted
    async fn start(&self, crawler_name: &str) -> Result<()>;
}

/// Waits between job state checks
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
