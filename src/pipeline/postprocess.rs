//! Post-processing: turn the model's free-text analysis reply into the fixed
//! result shape.
//!
//! Models asked for "strictly JSON" still wrap it in Markdown fences, prepend a
//! sentence, or reply with prose. This module applies two deterministic steps:
//!
//! 1. Strip an optional code fence. A ```` ```json ```` fence is tried first,
//!    then any ```` ``` ```` fence; the first match's body is used, otherwise
//!    the whole reply.
//! 2. Decode the result as a JSON object and read each field on its own.
//!
//! Only a reply that is not JSON, or is JSON but not an object, is replaced by
//! [`ModelAnalysis::fallback`] (with a warning). Inside an object a field of
//! the wrong type is dropped alone: a score given as a numeric string is still
//! read, an unusable score becomes 70 and an unusable list becomes empty. The
//! caller never sees an error from this stage.

use crate::output::{AnalysisResult, Engagement, DEFAULT_SCORE};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

static RE_JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());

static RE_ANY_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```\s*(.*?)\s*```").unwrap());

/// Return the body of the first code fence in `reply`, or `reply` unchanged.
pub fn strip_code_fences(reply: &str) -> &str {
    RE_JSON_FENCE
        .captures(reply)
        .or_else(|| RE_ANY_FENCE.captures(reply))
        .and_then(|caps| caps.get(1))
        .map_or(reply, |m| m.as_str())
}

/// The analysis object as the model sends it. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelAnalysis {
    pub score: Option<f64>,
    pub titles: Option<Vec<String>>,
    pub hashtags: Option<Vec<String>>,
    pub suggestions: Option<Vec<String>>,
    pub improvements: Option<Vec<String>>,
}

impl ModelAnalysis {
    /// Generic analysis substituted when the reply cannot be decoded.
    pub fn fallback() -> Self {
        fn owned(items: &[&str]) -> Option<Vec<String>> {
            Some(items.iter().map(|s| s.to_string()).collect())
        }

        Self {
            score: Some(f64::from(DEFAULT_SCORE)),
            titles: owned(&[
                "Boost Engagement Today",
                "Maximize Reach with These Tips",
                "Transform Your Social Media",
            ]),
            hashtags: owned(&[
                "#SocialMedia",
                "#Marketing",
                "#Engagement",
                "#Trends",
                "#Strategy",
            ]),
            suggestions: owned(&[
                "Use eye-catching visuals",
                "Add strong CTAs",
                "Post at optimal times",
            ]),
            improvements: owned(&[
                "Enhance captions",
                "Optimize for mobile",
                "Include trending tags",
            ]),
        }
    }

    /// Score rounded and clamped to `0..=100`, defaulting to 70.
    ///
    /// An explicit `0` stays 0; only a missing or unusable score becomes 70.
    pub fn engagement_score(&self) -> u8 {
        match self.score {
            Some(s) if s.is_finite() => s.round().clamp(0.0, 100.0) as u8,
            _ => DEFAULT_SCORE,
        }
    }

    /// Assemble the caller-facing result, defaulting absent lists to empty.
    pub fn into_result(self, extracted_text: String) -> AnalysisResult {
        let score = self.engagement_score();
        AnalysisResult {
            extracted_text,
            titles: self.titles.unwrap_or_default(),
            hashtags: self.hashtags.unwrap_or_default(),
            suggestions: self.suggestions.unwrap_or_default(),
            engagement: Engagement {
                score,
                improvements: self.improvements.unwrap_or_default(),
            },
        }
    }

    /// Read the known keys of a decoded object, ignoring wrong-typed values.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            score: object.get("score").and_then(read_score),
            titles: read_list(object, "titles"),
            hashtags: read_list(object, "hashtags"),
            suggestions: read_list(object, "suggestions"),
            improvements: read_list(object, "improvements"),
        }
    }
}

/// A JSON number, or a string holding one (`"85"`).
fn read_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The string entries of an array. Anything else counts as absent.
fn read_list(object: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match object.get(key)? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        Value::Null => None,
        other => {
            debug!("Ignoring analysis field '{}' of unexpected type: {}", key, other);
            None
        }
    }
}

/// Decode a reply, substituting [`ModelAnalysis::fallback`] when it is not a
/// JSON object.
pub fn parse_analysis(reply: &str) -> ModelAnalysis {
    match serde_json::from_str::<Value>(strip_code_fences(reply)) {
        Ok(Value::Object(object)) => ModelAnalysis::from_object(&object),
        Ok(other) => {
            warn!("Analysis reply is JSON but not an object, using defaults: {}", other);
            ModelAnalysis::fallback()
        }
        Err(e) => {
            warn!("Failed to parse analysis JSON, using defaults: {}", e);
            ModelAnalysis::fallback()
        }
    }
}
