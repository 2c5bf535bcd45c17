//! HTTP clients for the job and catalog services
//!
//! Endpoints, relative to the configured base URL:
//! - `POST /jobs/{job}/runs` - start a run
//! - `GET /jobs/{job}/runs/{run_id}` - run status
//! - `POST /crawlers/{crawler}/start` - start a crawler

use super::types::{CatalogRefresher, JobRunState, JobRunner};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

/// Shared HTTP plumbing for both services
#[derive(Debug, Clone)]
struct ServiceClient {
    client: Client,
    base_url: Url,
}

impl ServiceClient {
    fn new(config: &ServiceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::invalid_value(
                "service.base_url",
                format!("{base_url} cannot be a base URL"),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("curate-pipeline/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL from path segments (each segment is escaped)
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn post(&self, url: Url) -> Result<Response> {
        debug!(url = %url, "POST");
        Ok(self.client.post(url).json(&json!({})).send().await?)
    }

    async fn get(&self, url: Url) -> Result<Response> {
        debug!(url = %url, "GET");
        Ok(self.client.get(url).send().await?)
    }
}

/// Read a JSON body, turning non-2xx responses into errors
///
/// `service_error` builds the error from the service's message.
async fn read_json(response: Response, service_error: fn(String) -> Error) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(match service_message(&body) {
            Some(message) => service_error(message),
            None => Error::http_status(status.as_u16(), body),
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}

/// Extract a human-readable message from an error body
fn service_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "Message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(String::from)
}

/// Extract a value from JSON using a simple dotted path (e.g., "JobRun.JobRunState")
pub fn value_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.')
        .filter(|part| !part.is_empty())
        .try_fold(value, |current, part| current.get(part))
}

fn job_service_error(message: String) -> Error {
    Error::job_service(message)
}

fn catalog_error(message: String) -> Error {
    Error::catalog(message)
}

// ============================================================================
// Job Runner
// ============================================================================

/// Job service client
#[derive(Debug, Clone)]
pub struct HttpJobRunner {
    service: ServiceClient,
    run_id_path: String,
    state_path: String,
}

impl HttpJobRunner {
    /// Create a client from service configuration
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            service: ServiceClient::new(config)?,
            run_id_path: config.run_id_path.clone(),
            state_path: config.state_path.clone(),
        })
    }
}

#[async_trait]
impl JobRunner for HttpJobRunner {
    async fn submit(&self, job_name: &str) -> Result<String> {
        let url = self.service.endpoint(&["jobs", job_name, "runs"]);
        let body = read_json(self.service.post(url).await?, job_service_error).await?;

        value_at_path(&body, &self.run_id_path)
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| {
                Error::job_service(format!(
                    "Job service response has no run id at '{}'",
                    self.run_id_path
                ))
            })
    }

    async fn get_state(&self, job_name: &str, run_id: &str) -> Result<JobRunState> {
        let url = self.service.endpoint(&["jobs", job_name, "runs", run_id]);
        let body = read_json(self.service.get(url).await?, job_service_error).await?;

        value_at_path(&body, &self.state_path)
            .and_then(Value::as_str)
            .map(JobRunState::parse)
            .ok_or_else(|| {
                Error::job_service(format!(
                    "Job service response has no run state at '{}'",
                    self.state_path
                ))
            })
    }
}

// ============================================================================
// Catalog Refresher
// ============================================================================

/// Catalog service client
#[derive(Debug, Clone)]
pub struct HttpCatalogRefresher {
    service: ServiceClient,
}

impl HttpCatalogRefresher {
    /// Create a client from service configuration
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            service: ServiceClient::new(config)?,
        })
    }
}

#[async_trait]
impl CatalogRefresher for HttpCatalogRefresher {
    async fn start(&self, crawler_name: &str) -> Result<()> {
        let url = self.service.endpoint(&["crawlers", crawler_name, "start"]);
        read_json(self.service.post(url).await?, catalog_error).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_at_path() {
        let value = json!({"JobRun": {"JobRunState": "RUNNING"}, "JobRunId": "jr_1"});
        assert_eq!(
            value_at_path(&value, "JobRun.JobRunState"),
            Some(&json!("RUNNING"))
        );
        assert_eq!(value_at_path(&value, "$.JobRunId"), Some(&json!("jr_1")));
        assert_eq!(value_at_path(&value, "JobRun.Missing"), None);
    }

    #[test]
    fn test_service_message() {
        assert_eq!(
            service_message(r#"{"message": "Job not found"}"#),
            Some("Job not found".to_string())
        );
        assert_eq!(
            service_message(r#"{"Message": "Throttled"}"#),
            Some("Throttled".to_string())
        );
        assert_eq!(service_message("<html>oops</html>"), None);
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let config = ServiceConfig {
            base_url: "http://localhost:9000/api/".to_string(),
            ..ServiceConfig::default()
        };
        let client = ServiceClient::new(&config).unwrap();
        let url = client.endpoint(&["jobs", "nightly etl", "runs"]);
        assert_eq!(url.as_str(), "http://localhost:9000/api/jobs/nightly%20etl/runs");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = ServiceConfig {
            base_url: "mailto:ops@example.com".to_string(),
            ..ServiceConfig::default()
        };
        assert!(HttpJobRunner::new(&config).is_err());
    }
}
