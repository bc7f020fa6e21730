use thiserror::Error;

use crate::core::io;
use crate::typing::config::Method;

/// Errors surfaced by a typing run.
///
/// Three families matter to callers: configuration errors (raised before any
/// side effect, recoverable by fixing the request), external process failures
/// (a typing executable could not be launched or exited non-zero), and
/// consistency errors (the backend's output contradicts the input molecule —
/// a toolchain contract violation that is never silently corrected).
#[derive(Debug, Error)]
pub enum TypingError {
    #[error("invalid typing method '{value}' (available methods: {available})")]
    InvalidMethod { value: String, available: String },

    #[error(
        "charge assignment scheme '{scheme}' is only defined for the GAFF family and cannot be combined with {method}"
    )]
    IncompatibleChargeScheme { method: Method, scheme: String },

    #[error("external tool '{tool}' could not be launched: {source}")]
    ProcessLaunch {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("external tool '{tool}' failed with {}", exit_description(.code))]
    ProcessFailed {
        tool: &'static str,
        code: Option<i32>,
    },

    #[error(
        "backend returned {actual} atoms for a molecule of {expected}; the toolchain reordered or dropped atoms"
    )]
    AtomCountMismatch { expected: usize, actual: usize },

    #[error(
        "atom name mismatch at index {index}: renamed molecule has '{expected}' but the backend reported '{actual}'"
    )]
    NameMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error(
        "element mismatch at index {index}: molecule has '{expected}' but the backend reported '{actual}'"
    )]
    ElementMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("backend output is internally inconsistent: {detail}")]
    BackendData { detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Format(#[from] io::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}
