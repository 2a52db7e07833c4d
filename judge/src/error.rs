use thiserror::Error;

/// Failures raised by the judge client.
///
/// A student program that legitimately exceeds the judge's own time limit is
/// *not* an error here; the judge reports that through `RunResult::status`.
/// `PollTimeout` means the judge never reached a terminal status within our
/// polling budget.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// The judge answered the submit call with a non-2xx status. The raw
    /// body is kept for diagnosis.
    #[error("judge service rejected submission ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Transport-level failure talking to the judge.
    #[error("judge service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The submit call succeeded but the response carried no token.
    #[error("judge service returned no submission token")]
    MissingToken,

    /// The submission never reached a terminal status within the polling
    /// budget, including the final fetch.
    #[error("judge polling timed out after {attempts} attempts")]
    PollTimeout { attempts: u32 },

    /// A base64 field in the judge response could not be decoded.
    #[error("failed to decode judge response field `{field}`")]
    Decode { field: &'static str },
}
