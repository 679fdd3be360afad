//! Error types for the edgequake-content-analyzer library.
//!
//! Two distinct error types reflect two distinct failure scopes:
//!
//! * [`AnalyzerError`] — **Request-level**: the analysis cannot produce a
//!   result (bad upload, missing credential, upstream failure, no text).
//!   Returned as `Err(AnalyzerError)` from the `analyze*` entry points and
//!   rendered as a JSON error envelope by the HTTP server.
//!
//! * [`ProviderError`] — **Call-level**: one chat-completion call failed.
//!   Always wrapped in [`AnalyzerError::Upstream`] together with the pipeline
//!   stage that issued the call, so the message says *which* call broke.
//!
//! A malformed analysis reply from the model is deliberately absent here:
//! it is recovered by [`crate::pipeline::postprocess`] and never surfaces.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All request-level errors returned by the library.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// Declared MIME type is neither a PDF nor an image.
    #[error("Invalid file type '{file_type}': please upload a PDF or image file")]
    InvalidFileType { file_type: String },

    /// The `file` field is not a usable `data:<mime>;base64,<payload>` URL.
    #[error("Invalid data URL: {reason}")]
    InvalidDataUrl { reason: String },

    /// The request body could not be decoded.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request body exceeds the server's body limit.
    #[error("Request body exceeds the {limit}-byte limit")]
    RequestTooLarge { limit: usize },

    // ── Local file errors (client side) ───────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Input file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file exceeds the configured upload limit.
    #[error("File '{path}' is {size} bytes, above the {limit}-byte upload limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        limit: usize,
    },

    // ── Configuration errors ──────────────────────────────────────────────
    /// No API credential is available for the completion provider.
    #[error("{env_var} not configured")]
    ProviderNotConfigured { env_var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Upstream errors ───────────────────────────────────────────────────
    /// A chat-completion call failed.
    #[error("{stage} failed: {source}")]
    Upstream {
        stage: Stage,
        #[source]
        source: ProviderError,
    },

    /// Extraction succeeded but returned too little text to analyse.
    #[error("No text could be extracted from the document ({chars} chars, need at least {min})")]
    InsufficientText { chars: usize, min: usize },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalyzerError {
    /// True for errors caused by the caller's input rather than the server.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AnalyzerError::InvalidFileType { .. }
                | AnalyzerError::InvalidDataUrl { .. }
                | AnalyzerError::InvalidRequest(_)
                | AnalyzerError::RequestTooLarge { .. }
                | AnalyzerError::FileNotFound { .. }
                | AnalyzerError::FileTooLarge { .. }
        )
    }

    /// Diagnostic detail worth returning alongside the message, if any.
    ///
    /// Currently only upstream HTTP failures carry one: the provider's
    /// response body.
    pub fn details(&self) -> Option<String> {
        match self {
            AnalyzerError::Upstream {
                source: ProviderError::Http { body, .. },
                ..
            } if !body.is_empty() => Some(body.clone()),
            _ => None,
        }
    }
}

/// The pipeline step that issued a provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Text extraction / OCR.
    Extraction,
    /// Engagement analysis.
    Analysis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extraction => f.write_str("Text extraction"),
            Stage::Analysis => f.write_str("Content analysis"),
        }
    }
}

/// A failure of a single chat-completion call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API answered with a non-success status.
    #[error("upstream returned HTTP {status}")]
    Http { status: u16, body: String },

    /// The call did not complete within the configured timeout.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Connection, TLS or other transport failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered 2xx but the body was not a completion.
    #[error("malformed completion response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_display_names_stage_and_status() {
        let e = AnalyzerError::Upstream {
            stage: Stage::Extraction,
            source: ProviderError::Http {
                status: 401,
                body: "{\"error\":\"bad key\"}".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("Text extraction"), "got: {msg}");
        assert!(msg.contains("401"), "got: {msg}");
        assert_eq!(e.details().as_deref(), Some("{\"error\":\"bad key\"}"));
    }

    #[test]
    fn upstream_timeout_has_no_details() {
        let e = AnalyzerError::Upstream {
            stage: Stage::Analysis,
            source: ProviderError::Timeout { secs: 30 },
        };
        assert!(e.to_string().contains("30s"));
        assert!(e.details().is_none());
    }

    #[test]
    fn provider_not_configured_display() {
        let e = AnalyzerError::ProviderNotConfigured {
            env_var: "OPENAI_API_KEY".into(),
        };
        assert_eq!(e.to_string(), "OPENAI_API_KEY not configured");
        assert!(!e.is_validation());
    }

    #[test]
    fn invalid_file_type_is_validation() {
        let e = AnalyzerError::InvalidFileType {
            file_type: "text/plain".into(),
        };
        assert!(e.is_validation());
        assert!(e.to_string().contains("text/plain"));
    }

    #[test]
    fn insufficient_text_display() {
        let e = AnalyzerError::InsufficientText { chars: 3, min: 10 };
        let msg = e.to_string();
        assert!(msg.starts_with("No text could be extracted"), "got: {msg}");
        assert!(msg.contains("3 chars"));
    }
}
