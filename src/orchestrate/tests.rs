//! Tests for orchestration module

use super::*;
use crate::config::OrchestrationConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Test Doubles
// ============================================================================

/// Job runner that replays a scripted sequence of states
#[derive(Default)]
struct ScriptedJobs {
    submit_error: Option<String>,
    states: Mutex<VecDeque<Result<JobRunState>>>,
    submitted: Mutex<Vec<String>>,
    polled: Mutex<Vec<(String, String)>>,
}

impl ScriptedJobs {
    fn with_states(states: Vec<JobRunState>) -> Self {
        Self {
            states: Mutex::new(states.into_iter().map(Ok).collect()),
            ..Self::default()
        }
    }

    fn failing_submit(message: &str) -> Self {
        Self {
            submit_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn poll_count(&self) -> usize {
        self.polled.lock().unwrap().len()
    }
}

#[async_trait]
impl JobRunner for ScriptedJobs {
    async fn submit(&self, job_name: &str) -> Result<String> {
        if let Some(message) = &self.submit_error {
            return Err(Error::job_service(message.clone()));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(job_name.to_string());
        Ok(format!("jr_{}", submitted.len()))
    }

    async fn get_state(&self, job_name: &str, run_id: &str) -> Result<JobRunState> {
        self.polled
            .lock()
            .unwrap()
            .push((job_name.to_string(), run_id.to_string()));
        self.states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(JobRunState::Running("RUNNING".to_string())))
    }
}

#[derive(Default)]
struct RecordingCatalog {
    error: Option<String>,
    started: Mutex<Vec<String>>,
}

#[async_trait]
impl CatalogRefresher for RecordingCatalog {
    async fn start(&self, crawler_name: &str) -> Result<()> {
        if let Some(message) = &self.error {
            return Err(Error::catalog(message.clone()));
        }
        self.started.lock().unwrap().push(crawler_name.to_string());
        Ok(())
    }
}

/// Records requested sleeps and returns immediately
#[derive(Default)]
struct InstantSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

fn running() -> JobRunState {
    JobRunState::Running("RUNNING".to_string())
}

fn handler(
    jobs: Arc<ScriptedJobs>,
    catalog: Arc<RecordingCatalog>,
    sleeper: Arc<InstantSleeper>,
) -> OrchestrationHandler {
    OrchestrationHandler::new(OrchestrationConfig::default(), jobs, catalog).with_sleeper(sleeper)
}

// ============================================================================
// JobRunState Tests
// ============================================================================

#[test]
fn test_job_run_state_parse() {
    assert_eq!(JobRunState::parse("SUCCEEDED"), JobRunState::Succeeded);
    assert_eq!(JobRunState::parse("succeeded"), JobRunState::Succeeded);
    assert_eq!(JobRunState::parse("STOPPED"), JobRunState::Stopped);
    assert_eq!(
        JobRunState::parse("FAILED"),
        JobRunState::Failed("FAILED".to_string())
    );
    assert_eq!(
        JobRunState::parse("TIMEOUT"),
        JobRunState::Failed("TIMEOUT".to_string())
    );
    assert_eq!(
        JobRunState::parse("STARTING"),
        JobRunState::Running("STARTING".to_string())
    );
    assert_eq!(
        JobRunState::parse("STOPPING"),
        JobRunState::Running("STOPPING".to_string())
    );
}

#[test]
fn test_job_run_state_terminal() {
    assert!(!running().is_terminal());
    assert!(JobRunState::Succeeded.is_terminal());
    assert!(JobRunState::Stopped.is_terminal());
    assert!(JobRunState::Failed("ERROR".to_string()).is_terminal());
    assert!(JobRunState::Succeeded.is_succeeded());
    assert!(!JobRunState::Stopped.is_succeeded());
    assert_eq!(JobRunState::parse("WAITING").as_str(), "WAITING");
}

// ============================================================================
// Response Tests
// ============================================================================

#[test]
fn test_response_serialization() {
    let ok = serde_json::to_value(HandlerResponse::success("jr_1")).unwrap();
    assert_eq!(
        ok,
        json!({
            "status_code": 200,
            "body": {"message": "Glue Job completed & crawler started", "run_id": "jr_1"}
        })
    );

    let err = serde_json::to_value(HandlerResponse::failure("boom")).unwrap();
    assert_eq!(err, json!({"status_code": 500, "body": {"error": "boom"}}));
}

#[test]
fn test_response_deserialization() {
    let parsed: HandlerResponse =
        serde_json::from_value(json!({"status_code": 500, "body": {"error": "x"}})).unwrap();
    assert_eq!(parsed, HandlerResponse::failure("x"));
    assert!(!parsed.is_success());
}

// ============================================================================
// Handler Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_success_path() {
    let jobs = Arc::new(ScriptedJobs::with_states(vec![
        running(),
        running(),
        JobRunState::Succeeded,
    ]));
    let catalog = Arc::new(RecordingCatalog::default());
    let sleeper = Arc::new(InstantSleeper::default());
    let handler = handler(jobs.clone(), catalog.clone(), sleeper.clone());

    let response = handler.invoke(&json!({"source": "aws.s3"})).await;

    assert_eq!(response, HandlerResponse::success("jr_1"));
    assert_eq!(jobs.submitted.lock().unwrap().clone(), vec!["pandas_etl_job"]);
    assert_eq!(jobs.poll_count(), 3);
    assert_eq!(
        jobs.polled.lock().unwrap()[0],
        ("pandas_etl_job".to_string(), "jr_1".to_string())
    );
    assert_eq!(
        catalog.started.lock().unwrap().clone(),
        vec!["curated_to_analysis_crawler"]
    );
    assert_eq!(
        sleeper.sleeps.lock().unwrap().clone(),
        vec![Duration::from_secs(15), Duration::from_secs(15)]
    );
}

#[tokio::test]
async fn test_job_failure_never_starts_crawler() {
    let jobs = Arc::new(ScriptedJobs::with_states(vec![
        running(),
        JobRunState::Failed("FAILED".to_string()),
    ]));
    let catalog = Arc::new(RecordingCatalog::default());
    let sleeper = Arc::new(InstantSleeper::default());

    let response = handler(jobs.clone(), catalog.clone(), sleeper.clone())
        .invoke(&json!({}))
        .await;

    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.body,
        ResponseBody::Failure {
            error: "Glue Job failed or stopped".to_string()
        }
    );
    assert!(catalog.started.lock().unwrap().is_empty());
    assert_eq!(sleeper.sleeps.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_job_stopped_is_failure() {
    let jobs = Arc::new(ScriptedJobs::with_states(vec![JobRunState::Stopped]));
    let catalog = Arc::new(RecordingCatalog::default());
    let sleeper = Arc::new(InstantSleeper::default());

    let response = handler(jobs, catalog.clone(), sleeper.clone())
        .invoke(&json!(null))
        .await;

    assert_eq!(response, HandlerResponse::failure(JOB_NOT_SUCCEEDED_MESSAGE));
    assert!(catalog.started.lock().unwrap().is_empty());
    assert!(sleeper.sleeps.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submission_error_skips_polling() {
    let jobs = Arc::new(ScriptedJobs::failing_submit(
        "EntityNotFoundException: Job pandas_etl_job not found",
    ));
    let catalog = Arc::new(RecordingCatalog::default());
    let sleeper = Arc::new(InstantSleeper::default());

    let response = handler(jobs.clone(), catalog.clone(), sleeper)
        .invoke(&json!({}))
        .await;

    assert_eq!(
        response,
        HandlerResponse::failure("EntityNotFoundException: Job pandas_etl_job not found")
    );
    assert_eq!(jobs.poll_count(), 0);
    assert!(catalog.started.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_crawler_start_error_is_reported() {
    let jobs = Arc::new(ScriptedJobs::with_states(vec![JobRunState::Succeeded]));
    let catalog = Arc::new(RecordingCatalog {
        error: Some("CrawlerRunningException: already running".to_string()),
        ..RecordingCatalog::default()
    });
    let sleeper = Arc::new(InstantSleeper::default());

    let response = handler(jobs, catalog, sleeper).invoke(&json!({})).await;

    assert_eq!(
        response,
        HandlerResponse::failure("CrawlerRunningException: already running")
    );
    assert_ne!(
        response.body,
        ResponseBody::Failure {
            error: JOB_NOT_SUCCEEDED_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn test_state_query_error_becomes_failure() {
    let jobs = Arc::new(ScriptedJobs {
        states: Mutex::new(VecDeque::from(vec![
            Ok(running()),
            Err(Error::job_service("ThrottlingException")),
        ])),
        ..ScriptedJobs::default()
    });
    let catalog = Arc::new(RecordingCatalog::default());
    let sleeper = Arc::new(InstantSleeper::default());

    let response = handler(jobs, catalog.clone(), sleeper)
        .invoke(&json!({}))
        .await;

    assert_eq!(response, HandlerResponse::failure("ThrottlingException"));
    assert!(catalog.started.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_each_invocation_submits_a_new_run() {
    let jobs = Arc::new(ScriptedJobs::with_states(vec![
        JobRunState::Succeeded,
        JobRunState::Succeeded,
    ]));
    let catalog = Arc::new(RecordingCatalog::default());
    let sleeper = Arc::new(InstantSleeper::default());
    let handler = handler(jobs.clone(), catalog, sleeper);

    let first = handler.invoke(&json!({})).await;
    let second = handler.invoke(&json!({})).await;

    assert_eq!(first, HandlerResponse::success("jr_1"));
    assert_eq!(second, HandlerResponse::success("jr_2"));
}

#[tokio::test]
async fn test_custom_poll_interval_and_names() {
    let jobs = Arc::new(ScriptedJobs::with_states(vec![running(), JobRunState::Succeeded]));
    let catalog = Arc::new(RecordingCatalog::default());
    let sleeper = Arc::new(InstantSleeper::default());
    let config = OrchestrationConfig {
        job_name: "nightly".to_string(),
        crawler_name: "nightly_crawler".to_string(),
        poll_interval_secs: 3,
    };
    let handler = OrchestrationHandler::new(config, jobs.clone(), catalog.clone())
        .with_sleeper(sleeper.clone());

    let response = handler.invoke(&json!({})).await;

    assert!(response.is_success());
    assert_eq!(jobs.submitted.lock().unwrap().clone(), vec!["nightly"]);
    assert_eq!(catalog.started.lock().unwrap().clone(), vec!["nightly_crawler"]);
    assert_eq!(
        sleeper.sleeps.lock().unwrap().clone(),
        vec![Duration::from_secs(3)]
    );
}

// ============================================================================
// Step Tests
// ============================================================================

#[tokio::test]
async fn test_step_transitions() {
    let jobs = Arc::new(ScriptedJobs::with_states(vec![running(), JobRunState::Succeeded]));
    let catalog = Arc::new(RecordingCatalog::default());
    let sleeper = Arc::new(InstantSleeper::default());
    let handler = handler(jobs, catalog, sleeper);

    let step = handler.step(HandlerState::Submitting).await;
    assert_eq!(
        step,
        Step::Continue(HandlerState::Polling {
            run_id: "jr_1".to_string(),
            polls: 0
        })
    );

    let Step::Continue(state) = step else {
        panic!("expected polling state");
    };
    let step = handler.step(state).await;
    assert_eq!(
        step,
        Step::Continue(HandlerState::Polling {
            run_id: "jr_1".to_string(),
            polls: 1
        })
    );

    let Step::Continue(state) = step else {
        panic!("expected polling state");
    };
    let step = handler.step(state).await;
    assert_eq!(
        step,
        Step::Continue(HandlerState::SuccessPath {
            run_id: "jr_1".to_string()
        })
    );

    let failure = handler
        .step(HandlerState::FailurePath {
            error: "x".to_string(),
        })
        .await;
    assert_eq!(failure, Step::Done(HandlerResponse::failure("x")));
}

#[tokio::test]
async fn test_tokio_sleeper_waits() {
    let start = tokio::time::Instant::now();
    TokioSleeper.sleep(Duration::from_millis(10)).await;
    assert!(start.elapsed() >= Duration::from_millis(10));
}
