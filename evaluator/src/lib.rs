//! # Evaluator Library
//!
//! Runs a student's code submission against the hidden test cases of a code
//! question and persists the outcome. The actual execution goes through the
//! `judge::CodeExecutor` seam; this crate owns case selection, the skip rule
//! for unrunnable cases, output comparison, per-case result upserts, and the
//! aggregate summary stored back on the code submission.
//!
//! Sample-case runs ("Run Code") use the same machinery but persist nothing.

pub mod error;
pub mod inputs;
pub mod orchestrator;

pub use error::EvaluateError;
pub use orchestrator::{
    CaseReport, EvaluationSummary, SampleRun, evaluate_hidden_cases, run_sample_cases,
};
