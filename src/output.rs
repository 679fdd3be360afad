//! Result types returned to callers.
//!
//! Field names serialise in camelCase because the JSON shape is consumed by a
//! browser front-end as-is.

use serde::{Deserialize, Serialize};

/// Score used when the model omits one.
pub const DEFAULT_SCORE: u8 = 70;

/// The combined outcome of one analysis request.
///
/// Produced once per request and owned by the caller; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Text recovered from the upload by the extraction call.
    pub extracted_text: String,
    /// Suggested post titles, in model order.
    pub titles: Vec<String>,
    /// Suggested hashtags, in model order.
    pub hashtags: Vec<String>,
    /// Suggestions to improve engagement.
    pub suggestions: Vec<String>,
    pub engagement: Engagement,
}

/// Predicted engagement for the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    /// Heuristic rating in `0..=100`, produced by the model.
    pub score: u8,
    /// Improvements the content needs.
    pub improvements: Vec<String>,
}

/// JSON error envelope returned by the HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
