//! Curation API client
//!
//! Bearer-token client for the external admin REST API. The API rewrites
//! the same static documents the loader reads; nothing here touches the
//! data root directly. A 401 from any call maps to
//! [`AdminError::Unauthorized`] so the caller can discard the session.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Curation API client errors
#[derive(Debug, Error)]
pub enum AdminError {
    /// Missing session or token rejected by the remote (forces logout)
    #[error("Not authenticated")]
    Unauthorized,

    /// Non-ok response; no status beyond 401 carries special semantics
    #[error("Curation API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Long-running external jobs the curation backend can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Crawl,
    Summary,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Crawl => "crawl",
            JobKind::Summary => "summary",
        }
    }

    fn trigger_path(&self) -> &'static str {
        match self {
            JobKind::Crawl => "/api/run-crawl",
            JobKind::Summary => "/api/run-summary",
        }
    }

    /// Manual fallback named in the trigger-failure message; there is no
    /// deployment guarantee that the job runner is reachable
    pub fn manual_command(&self) -> &'static str {
        match self {
            JobKind::Crawl => "python script/monitor.py",
            JobKind::Summary => "python script/ai_summary.py",
        }
    }
}

impl std::str::FromStr for JobKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crawl" => Ok(JobKind::Crawl),
            "summary" => Ok(JobKind::Summary),
            _ => Err(()),
        }
    }
}

/// `GET /api/status` response (unauthenticated on the remote)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub crawl_running: bool,
    #[serde(default)]
    pub summary_running: bool,
    #[serde(default)]
    pub crawl_last_run: Option<String>,
    #[serde(default)]
    pub summary_last_run: Option<String>,
}

impl JobStatus {
    pub fn is_running(&self, kind: JobKind) -> bool {
        match kind {
            JobKind::Crawl => self.crawl_running,
            JobKind::Summary => self.summary_running,
        }
    }
}

/// Outcome of a job trigger
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerOutcome {
    #[serde(default)]
    pub status: String,
}

impl TriggerOutcome {
    pub fn already_running(&self) -> bool {
        self.status == "already_running"
    }
}

/// Bearer-token client for the curation API
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base: String,
}

impl AdminClient {
    pub fn new(base: &str) -> Result<Self, AdminError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdminError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `POST /api/admin/login`, returns the session token
    pub async fn login(&self, password: &str) -> Result<String, AdminError> {
        let body = self
            .post_raw("/api/admin/login", None, &serde_json::json!({ "password": password }))
            .await?;
        body.get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AdminError::Decode("login response missing token".to_string()))
    }

    /// `POST /api/admin/logout`, best effort
    pub async fn logout(&self, token: &str) -> Result<(), AdminError> {
        self.post_raw("/api/admin/logout", Some(token), &Value::Null)
            .await
            .map(|_| ())
    }

    /// Authenticated GET, passing the JSON payload through
    pub async fn get(&self, path: &str, token: &str) -> Result<Value, AdminError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// Authenticated POST, passing request and response JSON through
    pub async fn post(&self, path: &str, token: &str, body: &Value) -> Result<Value, AdminError> {
        self.post_raw(path, Some(token), body).await
    }

    /// `GET /api/status` (no auth)
    pub async fn status(&self) -> Result<JobStatus, AdminError> {
        let response = self
            .http
            .get(self.url("/api/status"))
            .send()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;
        let value = Self::decode(response).await?;
        serde_json::from_value(value).map_err(|e| AdminError::Decode(e.to_string()))
    }

    /// Trigger a long-running job (no auth on the remote)
    pub async fn run_job(&self, kind: JobKind) -> Result<TriggerOutcome, AdminError> {
        let value = self.post_raw(kind.trigger_path(), None, &Value::Null).await?;
        serde_json::from_value(value).map_err(|e| AdminError::Decode(e.to_string()))
    }

    async fn post_raw(
        &self,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<Value, AdminError> {
        let mut request = self.http.post(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if !body.is_null() {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<Value, AdminError> {
        let status = response.status();

        if status.as_u16() == 401 {
            return Err(AdminError::Unauthorized);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(AdminError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| AdminError::Decode(e.to_string()))
    }
}
