use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use util::{config, languages::Language};

use crate::error::JudgeError;
use crate::executor::CodeExecutor;
use crate::types::{RawSubmission, RunResult, encode_field};

/// Client for a Judge0-compatible execution service.
///
/// Submissions go up asynchronously (`wait=false`); the client then polls
/// the returned token at a fixed interval until the status is terminal,
/// with one final fetch after the budget is spent. Transient poll failures
/// are tolerated; the next attempt simply tries again.
pub struct JudgeClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    poll_interval: Duration,
    poll_attempts: u32,
}

/// Resource limits sent with every submission. The judge enforces these
/// inside its sandbox; they are not negotiable per request.
const CPU_TIME_LIMIT_SECS: u32 = 2;
const MEMORY_LIMIT_KB: u32 = 128_000;
const WALL_TIME_LIMIT_SECS: u32 = 5;

#[derive(Serialize)]
struct SubmitBody {
    source_code: String,
    language_id: i32,
    stdin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_output: Option<String>,
    cpu_time_limit: u32,
    memory_limit: u32,
    wall_time_limit: u32,
}

#[derive(Deserialize)]
struct SubmitResponse {
    token: Option<String>,
}

impl JudgeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: None,
            poll_interval: Duration::from_millis(1000),
            poll_attempts: 30,
        }
    }

    /// Builds a client from `JUDGE_API_URL` / `JUDGE_API_KEY` /
    /// `JUDGE_POLL_*` configuration.
    pub fn from_config() -> Self {
        let api_key = config::judge_api_key();
        Self {
            http: Client::new(),
            base_url: config::judge_api_url(),
            api_key: (!api_key.is_empty()).then_some(api_key),
            poll_interval: Duration::from_millis(config::judge_poll_interval_ms()),
            poll_attempts: config::judge_poll_attempts(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("X-Auth-Token", key),
            None => req,
        }
    }

    /// Submits one execution and returns the polling token.
    async fn submit(
        &self,
        source_code: &str,
        language: Language,
        stdin: &str,
        expected_output: Option<&str>,
    ) -> Result<String, JudgeError> {
        let url = format!(
            "{}/submissions?base64_encoded=true&wait=false",
            self.base_url.trim_end_matches('/')
        );
        let body = SubmitBody {
            source_code: encode_field(source_code),
            language_id: language.judge_id(),
            stdin: encode_field(stdin),
            expected_output: expected_output.map(encode_field),
            cpu_time_limit: CPU_TIME_LIMIT_SECS,
            memory_limit: MEMORY_LIMIT_KB,
            wall_time_limit: WALL_TIME_LIMIT_SECS,
        };

        let response = self.authorized(self.http.post(&url)).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<SubmitResponse>()
            .await?
            .token
            .ok_or(JudgeError::MissingToken)
    }

    /// One fetch of a submission by token.
    async fn fetch(&self, token: &str) -> Result<RawSubmission, JudgeError> {
        let url = format!(
            "{}/submissions/{}?base64_encoded=true",
            self.base_url.trim_end_matches('/'),
            token
        );
        let response = self.authorized(self.http.get(&url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<RawSubmission>().await?)
    }

    /// Polls until terminal or the attempt budget is spent, then makes one
    /// final fetch before giving up.
    async fn poll(&self, token: &str) -> Result<RawSubmission, JudgeError> {
        for attempt in 1..=self.poll_attempts {
            tokio::time::sleep(self.poll_interval).await;
            match self.fetch(token).await {
                Ok(raw) if raw.status_or_unknown().is_terminal() => return Ok(raw),
                Ok(raw) => {
                    tracing::trace!(
                        token,
                        attempt,
                        status = raw.status_or_unknown().id,
                        "judge submission not terminal yet"
                    );
                }
                Err(err) => {
                    tracing::warn!(token, attempt, %err, "judge poll attempt failed");
                }
            }
        }

        // Last chance after the budget: the judge may have just finished.
        match self.fetch(token).await {
            Ok(raw) if raw.status_or_unknown().is_terminal() => Ok(raw),
            _ => Err(JudgeError::PollTimeout {
                attempts: self.poll_attempts,
            }),
        }
    }
}

#[async_trait]
impl CodeExecutor for JudgeClient {
    async fn execute(
        &self,
        source_code: &str,
        language: Language,
        stdin: &str,
        expected_output: Option<&str>,
    ) -> Result<RunResult, JudgeError> {
        let token = self
            .submit(source_code, language, stdin, expected_output)
            .await?;
        tracing::debug!(%token, %language, "judge submission accepted");

        let raw = self.poll(&token).await?;
        raw.into_result(expected_output)
    }
}
