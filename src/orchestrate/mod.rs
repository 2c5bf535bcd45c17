//! Orchestration module
//!
//! Starts the transform job, polls it to a terminal state and, only on
//! success, starts the catalog crawler.
//!
//! # Overview
//!
//! - `OrchestrationHandler` - explicit state machine driven by `step`
//! - `JobRunner` / `CatalogRefresher` - service seams, with HTTP implementations
//! - `Sleeper` - pluggable wait between polls (`TokioSleeper` in production)

mod clients;
mod handler;
mod types;

pub use clients::{value_at_path, HttpCatalogRefresher, HttpJobRunner};
pub use handler::{HandlerState, OrchestrationHandler, Step};
pub use types::{
    CatalogRefresher, HandlerResponse, JobRunState, JobRunner, ResponseBody, Sleeper,
    TokioSleeper, JOB_NOT_SUCCEEDED_MESSAGE, SUCCESS_MESSAGE,
};

#[cfg(test)]
mod tests;
