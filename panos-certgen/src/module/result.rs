//! The single JSON outcome reported for an invocation.

use std::process::ExitCode;

use serde::Serialize;

use crate::driver::Response;
use crate::error::{Error, ErrorKind, Result};

/// Message reported when the certificate was generated.
pub const SUCCESS_MESSAGE: &str = "Self-signed certificate generated";

/// Outcome of one invocation, serialized as the module's JSON result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleResult {
    /// Whether the device was changed.
    pub changed: bool,

    /// Present and `true` on failure.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,

    /// Human-readable outcome.
    pub msg: String,

    /// Full shell transcript: on success, and when the device answered
    /// without reporting success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,

    /// Failure class, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl ModuleResult {
    /// Result for a generated certificate.
    pub fn success(response: &Response) -> Self {
        Self {
            changed: true,
            failed: false,
            msg: SUCCESS_MESSAGE.to_string(),
            stdout: Some(response.transcript()),
            error_kind: None,
        }
    }

    /// Result for any failure.
    pub fn failure(error: &Error) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: error.message(),
            stdout: error.transcript().map(str::to_string),
            error_kind: Some(kind_name(error.kind())),
        }
    }

    /// Process exit code matching this outcome.
    pub fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    /// Serialize to a single-line JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Result<Response>> for ModuleResult {
    fn from(result: Result<Response>) -> Self {
        match result {
            Ok(response) => Self::success(&response),
            Err(error) => Self::failure(&error),
        }
    }
}

fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => "configuration",
        ErrorKind::Connection => "connection",
        ErrorKind::Timeout => "timeout",
        ErrorKind::CertificateGeneration => "certificate_generation",
        ErrorKind::Unexpected => "unexpected",
    }
}
