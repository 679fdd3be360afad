//! Text extraction: the first provider call.
//!
//! The upload is attached to a single user turn as an `image_url` part whose
//! URL is the data URL itself, alongside a PDF or OCR instruction.

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Stage};
use crate::pipeline::llm::{ChatMessage, CompletionOptions, CompletionProvider};
use crate::pipeline::upload::FileKind;
use crate::prompts::extraction_prompt;
use std::time::Instant;
use tracing::{debug, info};

/// Extract text from an upload.
///
/// Fails with [`AnalyzerError::InsufficientText`] when the trimmed reply is
/// shorter than `config.min_text_chars` characters. An absent reply counts as
/// empty.
pub async fn extract_text(
    provider: &dyn CompletionProvider,
    api_key: &str,
    data_url: &str,
    kind: FileKind,
    config: &AnalyzerConfig,
) -> Result<String, AnalyzerError> {
    let start = Instant::now();
    info!(
        "Extracting text from {} via {}",
        match kind {
            FileKind::Pdf => "PDF",
            FileKind::Image => "image",
        },
        provider.name()
    );

    let messages = [ChatMessage::user_with_image(extraction_prompt(kind), data_url)];
    let options = CompletionOptions::from_config(config);

    let completion = provider
        .chat(api_key, &messages, &options)
        .await
        .map_err(|source| AnalyzerError::Upstream {
            stage: Stage::Extraction,
            source,
        })?;

    let text = completion.content.unwrap_or_default();
    let chars = text.trim().chars().count();
    debug!(
        "Extraction returned {} chars in {:?} ({} input / {} output tokens): {:?}",
        chars,
        start.elapsed(),
        completion.prompt_tokens,
        completion.completion_tokens,
        text.chars().take(100).collect::<String>()
    );

    if chars < config.min_text_chars {
        return Err(AnalyzerError::InsufficientText {
            chars,
            min: config.min_text_chars,
        });
    }

    Ok(text)
}
