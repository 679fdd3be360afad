//! Analysis entry points.
//!
//! One request runs strictly in order: credential, validation, extraction,
//! analysis, assembly. Nothing is retried, queued or stored, so concurrent
//! requests share no state beyond the immutable config and provider.

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::output::AnalysisResult;
use crate::pipeline::llm::{CompletionProvider, OpenAiProvider};
use crate::pipeline::upload::{AnalyzeRequest, UploadedFile};
use crate::pipeline::{analysis, extract};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Analyse one upload against the OpenAI-compatible API in `config`.
///
/// # Errors
/// - [`AnalyzerError::ProviderNotConfigured`] when no key is available,
///   checked before anything else
/// - [`AnalyzerError::InvalidFileType`] / [`AnalyzerError::InvalidDataUrl`]
///   for unusable input; no call is made
/// - [`AnalyzerError::Upstream`] when either call fails
/// - [`AnalyzerError::InsufficientText`] when extraction finds too little
pub async fn analyze(
    request: &AnalyzeRequest,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AnalyzerError> {
    let provider = OpenAiProvider::new(config)?;
    analyze_with_provider(&provider, request, config).await
}

/// Same as [`analyze`] with an injected provider.
pub async fn analyze_with_provider(
    provider: &dyn CompletionProvider,
    request: &AnalyzeRequest,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AnalyzerError> {
    let start = Instant::now();

    // ── Step 1: Credential ───────────────────────────────────────────────
    let api_key = config.resolve_api_key()?;

    // ── Step 2: Validate ─────────────────────────────────────────────────
    info!(
        "Processing file: {}, type: {}",
        request.file_name, request.file_type
    );
    let kind = request.validate()?;

    // ── Step 3: Extract ──────────────────────────────────────────────────
    let text = extract::extract_text(provider, &api_key, &request.file, kind, config).await?;

    // ── Step 4: Analyse + parse ──────────────────────────────────────────
    let model_analysis = analysis::analyze_engagement(provider, &api_key, &text, config).await?;

    // ── Step 5: Assemble ─────────────────────────────────────────────────
    let result = model_analysis.into_result(text);
    info!(
        "Analysis complete for {}: score {} in {}ms",
        request.file_name,
        result.engagement.score,
        start.elapsed().as_millis()
    );
    Ok(result)
}

/// Client path: read a local file, validate it, and analyse it.
///
/// The file type is checked right after reading, before the credential is
/// looked up, so a wrong file is reported as such even on an unconfigured
/// machine.
pub async fn analyze_file(
    path: impl AsRef<Path>,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AnalyzerError> {
    let file = UploadedFile::from_path(path, config.max_upload_bytes).await?;
    file.validate()?;
    analyze(&file.into_request(), config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, Stage};
    use crate::pipeline::llm::{ContentPart, MessageContent};
    use crate::testing::ScriptedProvider;

    const FULL: &str = r##"{"score":85,"titles":["T"],"hashtags":["#x"],"suggestions":["S"],"improvements":["I"]}"##;

    fn config() -> AnalyzerConfig {
        AnalyzerConfig::builder().api_key("sk-test").build().unwrap()
    }

    fn unconfigured() -> AnalyzerConfig {
        AnalyzerConfig::builder()
            .api_key_env("CONTENT_ANALYZER_TEST_NEVER_SET")
            .build()
            .unwrap()
    }

    fn pdf_request() -> AnalyzeRequest {
        UploadedFile::new(b"%PDF-1.7 hello".to_vec(), "application/pdf", "post.pdf").into_request()
    }

    #[tokio::test]
    async fn happy_path_returns_model_output_verbatim() {
        let provider = ScriptedProvider::new().reply("Hello world").reply(FULL);

        let result = analyze_with_provider(&provider, &pdf_request(), &config())
            .await
            .unwrap();

        assert_eq!(result.extracted_text, "Hello world");
        assert_eq!(result.titles, vec!["T"]);
        assert_eq!(result.hashtags, vec!["#x"]);
        assert_eq!(result.suggestions, vec!["S"]);
        assert_eq!(result.engagement.score, 85);
        assert_eq!(result.engagement.improvements, vec!["I"]);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn extraction_call_carries_data_url_and_pdf_prompt() {
        let provider = ScriptedProvider::new().reply("Hello world").reply(FULL);
        let request = pdf_request();
        analyze_with_provider(&provider, &request, &config()).await.unwrap();

        let calls = provider.calls();
        let MessageContent::Parts(parts) = &calls[0][0].content else {
            panic!("extraction message should be multimodal");
        };
        assert!(matches!(&parts[0], ContentPart::Text { text } if text.contains("PDF")));
        assert!(matches!(&parts[1], ContentPart::ImageUrl { image_url } if image_url.url == request.file));

        let MessageContent::Text(prompt) = &calls[1][0].content else {
            panic!("analysis message should be text");
        };
        assert!(prompt.contains("Hello world"));
    }

    #[tokio::test]
    async fn image_uses_ocr_prompt() {
        let provider = ScriptedProvider::new().reply("Some words here").reply(FULL);
        let request =
            UploadedFile::new(vec![0x89, b'P', b'N', b'G'], "image/png", "shot.png").into_request();
        analyze_with_provider(&provider, &request, &config()).await.unwrap();

        let calls = provider.calls();
        let MessageContent::Parts(parts) = &calls[0][0].content else {
            panic!("extraction message should be multimodal");
        };
        assert!(matches!(&parts[0], ContentPart::Text { text } if text.contains("OCR")));
    }

    #[tokio::test]
    async fn wrong_type_makes_no_calls() {
        let provider = ScriptedProvider::new().reply("Hello world").reply(FULL);
        let request =
            UploadedFile::new(b"just notes".to_vec(), "text/plain", "notes.txt").into_request();

        let err = analyze_with_provider(&provider, &request, &config())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalyzerError::InvalidFileType { .. }));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn bad_base64_payload_makes_no_calls() {
        let provider = ScriptedProvider::new().reply("Hello world").reply(FULL);
        let request = AnalyzeRequest {
            file: "data:image/png;base64,!!!".into(),
            file_type: "image/png".into(),
            file_name: "shot.png".into(),
        };

        let err = analyze_with_provider(&provider, &request, &config())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalyzerError::InvalidDataUrl { .. }), "got {err:?}");
        assert!(err.is_validation());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_credential_wins_regardless_of_input() {
        let requests = [
            pdf_request(),
            UploadedFile::new(b"x".to_vec(), "text/plain", "a.txt").into_request(),
            AnalyzeRequest {
                file: "garbage".into(),
                file_type: "image/png".into(),
                file_name: String::new(),
            },
        ];

        for request in &requests {
            let provider = ScriptedProvider::new().reply("Hello world").reply(FULL);
            let err = analyze_with_provider(&provider, request, &unconfigured())
                .await
                .unwrap_err();
            assert!(
                matches!(err, AnalyzerError::ProviderNotConfigured { .. }),
                "got {err:?}"
            );
            assert_eq!(provider.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn short_extraction_fails() {
        for text in ["", "short", "  tiny \n "] {
            let provider = ScriptedProvider::new().reply(text).reply(FULL);
            let err = analyze_with_provider(&provider, &pdf_request(), &config())
                .await
                .unwrap_err();
            assert!(
                matches!(err, AnalyzerError::InsufficientText { min: 10, .. }),
                "got {err:?}"
            );
            assert_eq!(provider.call_count(), 1, "analysis must not run");
        }
    }

    #[tokio::test]
    async fn minimum_text_length_boundary() {
        // Nine characters, even with surrounding whitespace, are too few.
        for text in ["abcdefghi", "   abcdefghi   ", "\n\tabcdefghi\n"] {
            let provider = ScriptedProvider::new().reply(text).reply(FULL);
            let err = analyze_with_provider(&provider, &pdf_request(), &config())
                .await
                .unwrap_err();
            assert!(
                matches!(err, AnalyzerError::InsufficientText { chars: 9, min: 10 }),
                "{text:?}: got {err:?}"
            );
            assert_eq!(provider.call_count(), 1);
        }

        for text in ["abcdefghij", "  abcdefghij  "] {
            let provider = ScriptedProvider::new().reply(text).reply(FULL);
            let result = analyze_with_provider(&provider, &pdf_request(), &config())
                .await
                .unwrap();
            assert_eq!(result.extracted_text, text);
            assert_eq!(provider.call_count(), 2);
        }
    }

    #[tokio::test]
    async fn unparseable_analysis_returns_defaults() {
        for reply in ["Great post!", "```json\nnot json\n```", "```\n{oops\n```"] {
            let provider = ScriptedProvider::new().reply("Hello world").reply(reply);
            let result = analyze_with_provider(&provider, &pdf_request(), &config())
                .await
                .unwrap();
            assert_eq!(result.engagement.score, 70);
            assert_eq!(result.hashtags[0], "#SocialMedia");
            assert_eq!(result.extracted_text, "Hello world");
        }
    }

    #[tokio::test]
    async fn upstream_errors_carry_stage() {
        let provider = ScriptedProvider::new().fail(ProviderError::Http {
            status: 429,
            body: "slow down".into(),
        });
        let err = analyze_with_provider(&provider, &pdf_request(), &config())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Upstream {
                stage: Stage::Extraction,
                source: ProviderError::Http { status: 429, .. }
            }
        ));
        assert_eq!(err.details().as_deref(), Some("slow down"));

        let provider = ScriptedProvider::new()
            .reply("Hello world")
            .fail(ProviderError::Timeout { secs: 5 });
        let err = analyze_with_provider(&provider, &pdf_request(), &config())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Upstream {
                stage: Stage::Analysis,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn analyze_file_rejects_wrong_type_before_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text notes").unwrap();

        let err = analyze_file(&path, &unconfigured()).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidFileType { .. }));
    }
}
