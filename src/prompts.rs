//! Prompts sent to the completion API.
//!
//! Both calls use a single user turn; there is no system message. Keeping the
//! wording here lets tests pin the exact instructions without a live model.

use crate::pipeline::upload::FileKind;

/// Extraction instruction for PDF uploads.
pub const PDF_EXTRACTION_PROMPT: &str =
    "Extract all text from this PDF document. Maintain formatting where possible.";

/// Extraction instruction for image uploads.
pub const IMAGE_EXTRACTION_PROMPT: &str =
    "Extract all visible text from this image using OCR. Maintain structure and reading order.";

/// Pick the extraction instruction for a file kind.
pub fn extraction_prompt(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Pdf => PDF_EXTRACTION_PROMPT,
        FileKind::Image => IMAGE_EXTRACTION_PROMPT,
    }
}

/// Build the engagement-analysis prompt around the extracted text.
///
/// The model is asked for a bare JSON object with exactly the five keys that
/// [`crate::pipeline::postprocess::parse_analysis`] understands.
pub fn analysis_prompt(content: &str) -> String {
    format!(
        r#"Analyze this social media content and provide:
1. An engagement score (0-100)
2. 3-5 suggested post titles
3. 5-10 relevant hashtags
4. 3-5 suggestions to improve engagement
5. 3-5 improvements needed

Content:
{content}

Respond strictly in JSON format:
{{
  "score": <number>,
  "titles": ["..."],
  "hashtags": ["..."],
  "suggestions": ["..."],
  "improvements": ["..."]
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_prompt_by_kind() {
        assert!(extraction_prompt(FileKind::Pdf).contains("PDF document"));
        assert!(extraction_prompt(FileKind::Image).contains("OCR"));
    }

    #[test]
    fn analysis_prompt_embeds_content_and_keys() {
        let p = analysis_prompt("Hello world");
        assert!(p.contains("Content:\nHello world\n"));
        for key in ["\"score\"", "\"titles\"", "\"hashtags\"", "\"suggestions\"", "\"improvements\""] {
            assert!(p.contains(key), "missing {key}");
        }
        // Braces survive format! escaping.
        assert!(p.trim_end().ends_with('}'));
    }
}
