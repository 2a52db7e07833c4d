//! HTTP client for a Judge0-compatible code-execution service.
//!
//! The judge runs untrusted student code in its own sandbox; this crate only
//! submits work, polls for a terminal status, and normalizes the response.
//! Consumers that need to fake execution (tests, offline development) go
//! through the [`executor::CodeExecutor`] trait instead of the concrete
//! [`client::JudgeClient`].

pub mod client;
pub mod compare;
pub mod error;
pub mod executor;
pub mod test_support;
pub mod types;

pub use client::JudgeClient;
pub use compare::outputs_match;
pub use error::JudgeError;
pub use executor::CodeExecutor;
pub use types::{JudgeStatus, RunResult};
