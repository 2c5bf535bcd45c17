//! Run-wait-branch state machine
//!
//! ```text
//! Submitting ──ok──▶ Polling ──SUCCEEDED──▶ SuccessPath ──ok──▶ 200
//!     │                │ ▲                      │
//!     │                │ └─ running: sleep      │ start error
//!     │ error          │ FAILED/STOPPED/error   ▼
//!     └────────────────┴──────────────────▶ FailurePath ──▶ 500
//! ```

use super::types::{
    CatalogRefresher, HandlerResponse, JobRunState, JobRunner, Sleeper, TokioSleeper,
    JOB_NOT_SUCCEEDED_MESSAGE,
};
use crate::config::OrchestrationConfig;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Handler state between steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerState {
    Submitting,
    Polling { run_id: String, polls: u64 },
    SuccessPath { run_id: String },
    FailurePath { error: String },
}

/// Result of advancing the state machine once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(HandlerState),
    Done(HandlerResponse),
}

/// Drives one job run to completion and triggers the catalog refresh
pub struct OrchestrationHandler {
    config: OrchestrationConfig,
    jobs: Arc<dyn JobRunner>,
    catalog: Arc<dyn CatalogRefresher>,
    sleeper: Arc<dyn Sleeper>,
}

impl OrchestrationHandler {
    /// Create a handler that sleeps on the tokio timer
    pub fn new(
        config: OrchestrationConfig,
        jobs: Arc<dyn JobRunner>,
        catalog: Arc<dyn CatalogRefresher>,
    ) -> Self {
        Self {
            config,
            jobs,
            catalog,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleeper
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Handler configuration
    pub fn config(&self) -> &OrchestrationConfig {
        &self.config
    }

    /// Handle one trigger
    ///
    /// Blocks until the job reaches a terminal state. Never fails: every
    /// error becomes a 500 response.
    pub async fn invoke(&self, payload: &Value) -> HandlerResponse {
        info!(payload = %payload, "Received trigger");

        let mut state = HandlerState::Submitting;
        loop {
            match self.step(state).await {
                Step::Continue(next) => state = next,
                Step::Done(response) => return response,
            }
        }
    }

    /// Advance the state machine by one transition
    pub async fn step(&self, state: HandlerState) -> Step {
        let job_name = &self.config.job_name;

        match state {
            HandlerState::Submitting => {
                info!(job = %job_name, "Starting job");
                match self.jobs.submit(job_name).await {
                    Ok(run_id) => {
                        info!(job = %job_name, run_id = %run_id, "Job started");
                        Step::Continue(HandlerState::Polling { run_id, polls: 0 })
                    }
                    Err(e) => {
                        error!(job = %job_name, error = %e, "Error starting job");
                        Step::Continue(HandlerState::FailurePath {
                            error: e.to_string(),
                        })
                    }
                }
            }

            HandlerState::Polling { run_id, polls } => {
                match self.jobs.get_state(job_name, &run_id).await {
                    Ok(run_state) => {
                        info!(run_id = %run_id, state = run_state.as_str(), polls, "Current job status");
                        match run_state {
                            JobRunState::Succeeded => {
                                Step::Continue(HandlerState::SuccessPath { run_id })
                            }
                            JobRunState::Failed(_) | JobRunState::Stopped => {
                                warn!(run_id = %run_id, "Job failed or stopped, not starting crawler");
                                Step::Continue(HandlerState::FailurePath {
                                    error: JOB_NOT_SUCCEEDED_MESSAGE.to_string(),
                                })
                            }
                            JobRunState::Running(_) => {
                                self.sleeper.sleep(self.config.poll_interval()).await;
                                Step::Continue(HandlerState::Polling {
                                    run_id,
                                    polls: polls + 1,
                                })
                            }
                        }
                    }
                    Err(e) => {
                        error!(run_id = %run_id, error = %e, "Error checking job status");
                        Step::Continue(HandlerState::FailurePath {
                            error: e.to_string(),
                        })
                    }
                }
            }

            HandlerState::SuccessPath { run_id } => {
                let crawler = &self.config.crawler_name;
                match self.catalog.start(crawler).await {
                    Ok(()) => {
                        info!(crawler = %crawler, "Crawler started");
                        Step::Done(HandlerResponse::success(run_id))
                    }
                    Err(e) => {
                        error!(crawler = %crawler, error = %e, "Error starting crawler");
                        Step::Continue(HandlerState::FailurePath {
                            error: e.to_string(),
                        })
                    }
                }
            }

            HandlerState::FailurePath { error } => Step::Done(HandlerResponse::failure(error)),
        }
    }
}
