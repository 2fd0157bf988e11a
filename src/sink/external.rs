//! External test-management updater.
//!
//! Re-reads the persisted JSON report (deliberately decoupled from the
//! in-memory document so this sink can be re-run on its own), resolves each
//! test's remote test-case id and open execution record, and pushes the step
//! results. Remote calls are sequential with an enforced inter-push delay to
//! respect the downstream rate limit. A key with no resolvable id or no open
//! execution is skipped with a warning and never fails the update.
//!
//! HTTP goes through `curl` with bearer-token auth; the `ExternalApi` trait
//! keeps the transport swappable for tests.

use serde_json::Value;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use super::SinkError;
use super::json::load_json_report;
use crate::config::ExternalServiceSettings;
use crate::report::types::TestRecord;

/// Result type for external API operations
pub type ExternalResult<T> = Result<T, ExternalError>;

/// Errors from the external test-management API
#[derive(Debug)]
pub enum ExternalError {
    /// The HTTP transport failed (curl error, connection refused, ...)
    ConnectionFailed(String),
    /// The service answered with something unparsable
    InvalidResponse(String),
    /// IO error
    Io(std::io::Error),
}

impl std::fmt::Display for ExternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            ExternalError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            ExternalError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ExternalError {}

impl From<std::io::Error> for ExternalError {
    fn from(e: std::io::Error) -> Self {
        ExternalError::Io(e)
    }
}

/// Remote operations needed by the updater
pub trait ExternalApi {
    /// Resolve a test-case key to its remote id, `None` when unknown
    fn test_case_id(&self, test_case_key: &str) -> ExternalResult<Option<String>>;

    /// Find the open execution record for a test-case id within the
    /// configured test cycle, `None` when there is none
    fn open_execution_key(&self, test_case_id: &str) -> ExternalResult<Option<String>>;

    /// Push step results to an execution record
    fn put_execution_steps(&self, execution_key: &str, steps: &Value) -> ExternalResult<()>;
}

/// curl-backed API client with bearer-token auth
#[derive(Debug, Clone)]
pub struct CurlApi {
    base_url: String,
    api_key: String,
    test_cycle_key: String,
    connect_timeout_secs: u64,
}

impl CurlApi {
    /// Build a client from external-service settings
    pub fn new(settings: &ExternalServiceSettings) -> Self {
        Self {
            base_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            test_cycle_key: settings.test_cycle_key.clone(),
            connect_timeout_secs: settings.connect_timeout_secs,
        }
    }

    fn request(&self, method: &str, path: &str, body: Option<&str>) -> ExternalResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut command = Command::new("curl");
        command.args([
            "-s",
            "-X",
            method,
            &url,
            "-H",
            "Content-Type: application/json",
            "-H",
            &format!("Authorization: Bearer {}", self.api_key),
            "--connect-timeout",
            &self.connect_timeout_secs.to_string(),
        ]);
        if let Some(body) = body {
            command.args(["-d", body]);
        }

        let output = command.output()?;
        if !output.status.success() {
            return Err(ExternalError::ConnectionFailed(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        if output.stdout.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&output.stdout)
            .map_err(|e| ExternalError::InvalidResponse(e.to_string()))
    }
}

impl ExternalApi for CurlApi {
    fn test_case_id(&self, test_case_key: &str) -> ExternalResult<Option<String>> {
        let response = self.request("GET", &format!("testcases/{}", test_case_key), None)?;
        Ok(id_as_string(&response["id"]))
    }

    fn open_execution_key(&self, test_case_id: &str) -> ExternalResult<Option<String>> {
        let response = self.request(
            "GET",
            &format!(
                "testexecutions?testCycle={}&maxResults=1000",
                self.test_cycle_key
            ),
            None,
        )?;

        let Some(values) = response["values"].as_array() else {
            return Ok(None);
        };

        // The service cannot filter by test case, so filter client-side
        let execution = values.iter().find(|execution| {
            id_as_string(&execution["testCase"]["id"]).as_deref() == Some(test_case_id)
        });
        Ok(execution.and_then(|e| e["key"].as_str().map(String::from)))
    }

    fn put_execution_steps(&self, execution_key: &str, steps: &Value) -> ExternalResult<()> {
        let body = serde_json::json!({ "steps": steps });
        let body_json =
            serde_json::to_string(&body).map_err(|e| ExternalError::InvalidResponse(e.to_string()))?;
        self.request(
            "PUT",
            &format!("testexecutions/{}/teststeps", execution_key),
            Some(&body_json),
        )?;
        Ok(())
    }
}

/// Ids come back as numbers or strings depending on the endpoint
fn id_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Counts of what the updater did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Executions successfully updated
    pub pushed: usize,
    /// Tests skipped (no key, no remote id, no open execution, or API error)
    pub skipped: usize,
}

/// Update the external service from a persisted JSON report.
///
/// Processes tests in report order; every resolution miss or API error is a
/// warning and the update moves on. Already-pushed updates are not rolled
/// back when a later one fails.
pub fn update_execution_results(
    api: &dyn ExternalApi,
    report_path: &Path,
    settings: &ExternalServiceSettings,
) -> Result<UpdateSummary, SinkError> {
    let run = load_json_report(report_path)?;
    let mut summary = UpdateSummary::default();

    for test in &run.tests {
        let Some(key) = test.key.as_deref() else {
            warn!(test = %test.title, "test has no key, skipping external update");
            summary.skipped += 1;
            continue;
        };

        let case_id = match api.test_case_id(key) {
            Ok(Some(id)) => id,
            Ok(None) => {
                warn!(key, "test case id not found, skipping");
                summary.skipped += 1;
                continue;
            }
            Err(err) => {
                warn!(key, error = %err, "failed to resolve test case id, skipping");
                summary.skipped += 1;
                continue;
            }
        };

        let execution_key = match api.open_execution_key(&case_id) {
            Ok(Some(key)) => key,
            Ok(None) => {
                warn!(key, case_id = %case_id, "no open execution in cycle, skipping");
                summary.skipped += 1;
                continue;
            }
            Err(err) => {
                warn!(key, error = %err, "failed to resolve execution, skipping");
                summary.skipped += 1;
                continue;
            }
        };

        let steps = steps_payload(test);
        match api.put_execution_steps(&execution_key, &steps) {
            Ok(()) => {
                info!(key, execution_key = %execution_key, "pushed step results");
                summary.pushed += 1;
                // Fixed throttle between pushes; the downstream API rate-limits
                thread::sleep(Duration::from_millis(settings.push_delay_ms));
            }
            Err(err) => {
                warn!(key, execution_key = %execution_key, error = %err, "push failed, continuing");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Step results with display-only titles stripped
fn steps_payload(test: &TestRecord) -> Value {
    let steps: Vec<Value> = test
        .steps
        .iter()
        .map(|step| {
            let mut value = serde_json::to_value(step).unwrap_or(Value::Null);
            if let Some(object) = value.as_object_mut() {
                object.remove("title");
            }
            value
        })
        .collect();
    Value::Array(steps)
}
