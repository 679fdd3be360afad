//! Engagement analysis: the second provider call.

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Stage};
use crate::pipeline::llm::{ChatMessage, CompletionOptions, CompletionProvider};
use crate::pipeline::postprocess::{parse_analysis, ModelAnalysis};
use crate::prompts::analysis_prompt;
use tracing::{debug, info};

/// Ask the model to score `text` and decode its reply.
///
/// Only a failed call is an error. An unusable reply becomes
/// [`ModelAnalysis::fallback`] inside [`parse_analysis`].
pub async fn analyze_engagement(
    provider: &dyn CompletionProvider,
    api_key: &str,
    text: &str,
    config: &AnalyzerConfig,
) -> Result<ModelAnalysis, AnalyzerError> {
    info!("Analyzing content via {}", provider.name());

    let messages = [ChatMessage::user(analysis_prompt(text))];
    let options = CompletionOptions::from_config(config);

    let completion = provider
        .chat(api_key, &messages, &options)
        .await
        .map_err(|source| AnalyzerError::Upstream {
            stage: Stage::Analysis,
            source,
        })?;

    debug!(
        "Analysis used {} input / {} output tokens",
        completion.prompt_tokens, completion.completion_tokens
    );
    let reply = completion.content.unwrap_or_default();
    debug!("Analysis reply: {}", reply);

    Ok(parse_analysis(&reply))
}
