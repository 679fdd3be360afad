//! # edgequake-content-analyzer
//!
//! Extract the text of a PDF or image with a vision LLM, then score it for
//! social-media engagement.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (PDF / image)
//!  │
//!  ├─ 1. Credential  API key from config or environment, per request
//!  ├─ 2. Validate    only *pdf* / *image* MIME types; data-URL shape and payload
//!  ├─ 3. Extract     VLM call #1 — OCR / text extraction
//!  ├─ 4. Analyse     LLM call #2 — engagement JSON
//!  ├─ 5. Parse       strip fences, decode, fall back to defaults
//!  └─ 6. Output      AnalysisResult { extractedText, titles, hashtags, … }
//! ```
//!
//! The same pipeline is reachable three ways: the [`analyze()`] functions, the
//! `POST /analyze-content` endpoint in [`server`], and the `content-analyzer`
//! binary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_content_analyzer::{analyze_file, AnalyzerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads OPENAI_API_KEY at call time.
//!     let config = AnalyzerConfig::default();
//!     let result = analyze_file("flyer.png", &config).await?;
//!     println!("score {}: {:?}", result.engagement.score, result.hashtags);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `content-analyzer` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Failure policy
//!
//! Bad input, a missing key, a failed provider call, or too little extracted
//! text all fail the request with an [`AnalyzerError`]. A reply from the
//! analysis call that is not a JSON object does **not**: it is replaced by a fixed
//! default analysis (score 70) and logged at WARN.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod server;

#[cfg(test)]
mod testing;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_file, analyze_with_provider};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::{AnalyzerError, ProviderError, Stage};
pub use output::{AnalysisResult, Engagement, ErrorBody};
pub use pipeline::llm::{CompletionProvider, OpenAiProvider};
pub use pipeline::upload::{validate_file_type, AnalyzeRequest, FileKind, UploadedFile};
