//! Pipeline stages for content analysis.
//!
//! Each submodule implements exactly one step of a request. Stages are plain
//! async functions over a [`llm::CompletionProvider`], so tests can swap the
//! network for a scripted double without touching stage logic.
//!
//! ## Data Flow
//!
//! ```text
//! upload ──▶ extract ──▶ analysis ──▶ postprocess
//! (validate)  (OCR call)  (JSON call)  (fence strip, fallback)
//! ```
//!
//! 1. [`upload`]      — file-type validation and data-URL handling; no I/O
//!    beyond reading a local file on the client side
//! 2. [`extract`]     — first provider call: text extraction / OCR
//! 3. [`analysis`]    — second provider call: engagement analysis
//! 4. [`postprocess`] — turn the free-text reply into the fixed result shape,
//!    substituting defaults when it is not valid JSON
//!
//! [`llm`] holds the provider seam shared by stages 2 and 3.

pub mod analysis;
pub mod extract;
pub mod llm;
pub mod postprocess;
pub mod upload;
