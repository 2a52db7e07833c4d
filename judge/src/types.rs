use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::compare::outputs_match;
use crate::error::JudgeError;

/// Execution status reported by the judge.
///
/// Ids follow the Judge0 convention: 1 = In Queue, 2 = Processing, 3 =
/// Accepted, everything above 3 is a terminal failure of some kind (wrong
/// answer, TLE, compile error, runtime error, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeStatus {
    pub id: i32,
    pub description: String,
}

impl JudgeStatus {
    /// True once the judge has finished with the submission.
    pub fn is_terminal(&self) -> bool {
        self.id != 1 && self.id != 2
    }

    pub fn accepted(&self) -> bool {
        self.id == 3
    }
}

/// Normalized result of one execution, with base64 fields decoded.
///
/// `passed` is present only when an expected output was supplied to the
/// execution; it is trimmed-equality of stdout against that expectation.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub message: Option<String>,
    pub status: JudgeStatus,
    /// Wall-clock seconds as reported by the judge.
    pub time: Option<f64>,
    /// Peak memory in kilobytes as reported by the judge.
    pub memory: Option<i64>,
    pub passed: Option<bool>,
}

impl RunResult {
    /// Judge-reported wall time converted to whole milliseconds.
    pub fn execution_time_ms(&self) -> Option<i64> {
        self.time.map(|secs| (secs * 1000.0).round() as i64)
    }

    /// Everything the judge produced on the error side, first non-empty of
    /// stderr, compile output, and the status message.
    pub fn error_output(&self) -> Option<String> {
        [&self.stderr, &self.compile_output, &self.message]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
    }
}

/// Wire shape of `GET /submissions/{token}` with `base64_encoded=true`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSubmission {
    pub status: Option<JudgeStatus>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub message: Option<String>,
    pub time: Option<String>,
    pub memory: Option<i64>,
}

impl RawSubmission {
    pub(crate) fn status_or_unknown(&self) -> JudgeStatus {
        self.status.clone().unwrap_or(JudgeStatus {
            id: 0,
            description: "Unknown".to_string(),
        })
    }

    /// Decodes base64 text fields and computes `passed` against the
    /// expectation the caller supplied at submit time.
    pub(crate) fn into_result(self, expected_output: Option<&str>) -> Result<RunResult, JudgeError> {
        let status = self.status_or_unknown();
        let stdout = decode_field(self.stdout, "stdout")?;
        let stderr = decode_field(self.stderr, "stderr")?;
        let compile_output = decode_field(self.compile_output, "compile_output")?;
        let message = decode_field(self.message, "message")?;

        let passed = expected_output
            .map(|expected| outputs_match(stdout.as_deref().unwrap_or_default(), expected));

        Ok(RunResult {
            stdout,
            stderr,
            compile_output,
            message,
            status,
            time: self.time.and_then(|t| t.parse().ok()),
            memory: self.memory,
            passed,
        })
    }
}

/// Decodes one base64 field, tolerating the line breaks Judge0 inserts.
fn decode_field(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, JudgeError> {
    let Some(encoded) = value else {
        return Ok(None);
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(Some(String::new()));
    }
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| JudgeError::Decode { field })?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|_| JudgeError::Decode { field })
}

/// Encodes an outgoing text field.
pub(crate) fn encode_field(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}
