use async_trait::async_trait;
use util::languages::Language;

use crate::error::JudgeError;
use crate::types::RunResult;

/// Seam between the evaluation pipeline and actual code execution.
///
/// Production wires in [`crate::client::JudgeClient`]; tests wire in
/// [`crate::test_support::ScriptedExecutor`]. `stdin` is passed through
/// verbatim; empty is a valid value, distinct from a test case having no
/// input at all (callers skip those before reaching an executor).
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(
        &self,
        source_code: &str,
        language: Language,
        stdin: &str,
        expected_output: Option<&str>,
    ) -> Result<RunResult, JudgeError>;
}
