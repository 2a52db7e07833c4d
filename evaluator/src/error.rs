use thiserror::Error;

/// Failures that abort an evaluation outright.
///
/// A single test case failing to execute is *not* in this enum: per-case
/// failures are absorbed into the case's recorded result so the remaining
/// cases still run.
#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    /// The stored language string no longer parses. Submissions are
    /// validated on the way in, so this indicates tampering or drift.
    #[error("code submission carries unsupported language `{0}`")]
    UnsupportedLanguage(String),

    #[error("code question {0} not found")]
    QuestionNotFound(i64),
}
