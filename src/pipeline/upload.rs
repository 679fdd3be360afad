//! Upload handling: file-type validation and data-URL encoding.
//!
//! Validation runs before any provider call. An upload that is neither a PDF
//! nor an image is rejected here with a user-facing error, and no request ever
//! leaves the process for it.

use crate::error::AnalyzerError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Fallback MIME type when sniffing finds nothing.
const OCTET_STREAM: &str = "application/octet-stream";

/// Which extraction instruction an upload gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
}

/// Accept only MIME types that mention `pdf` or `image`.
///
/// `pdf` is checked first, so a type mentioning both counts as a PDF.
pub fn validate_file_type(mime_type: &str) -> Result<FileKind, AnalyzerError> {
    let lower = mime_type.to_ascii_lowercase();
    if lower.contains("pdf") {
        Ok(FileKind::Pdf)
    } else if lower.contains("image") {
        Ok(FileKind::Image)
    } else {
        Err(AnalyzerError::InvalidFileType {
            file_type: mime_type.to_string(),
        })
    }
}

/// One uploaded file. Lives for the duration of a single request.
#[derive(Clone)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub name: String,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    /// Read a local file, sniffing its MIME type from the content.
    ///
    /// Files larger than `max_bytes` are refused before being read.
    pub async fn from_path(path: impl AsRef<Path>, max_bytes: usize) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();

        let meta = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AnalyzerError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => AnalyzerError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        if meta.len() > max_bytes as u64 {
            return Err(AnalyzerError::FileTooLarge {
                path: path.to_path_buf(),
                size: meta.len(),
                limit: max_bytes,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AnalyzerError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mime_type = detect_mime(&bytes);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Read {} ({} bytes, {})", name, bytes.len(), mime_type);
        Ok(Self::new(bytes, mime_type, name))
    }

    /// Check the declared type. See [`validate_file_type`].
    pub fn validate(&self) -> Result<FileKind, AnalyzerError> {
        validate_file_type(&self.mime_type)
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// Turn the upload into the wire request the endpoint accepts.
    pub fn into_request(self) -> AnalyzeRequest {
        AnalyzeRequest {
            file: self.to_data_url(),
            file_type: self.mime_type,
            file_name: self.name,
        }
    }
}

/// Sniff a MIME type from magic bytes.
pub fn detect_mime(bytes: &[u8]) -> String {
    infer::get(bytes)
        .map(|t| t.mime_type().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

/// Body of `POST /analyze-content`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// The upload as a data URL.
    pub file: String,
    /// Declared MIME type.
    pub file_type: String,
    /// Display name, used for logging only.
    #[serde(default)]
    pub file_name: String,
}

impl std::fmt::Debug for AnalyzeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzeRequest")
            .field("file", &format_args!("<{} chars>", self.file.len()))
            .field("file_type", &self.file_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

impl AnalyzeRequest {
    /// Validate file type, then the data URL's shape and base64 payload.
    pub fn validate(&self) -> Result<FileKind, AnalyzerError> {
        let kind = validate_file_type(&self.file_type)?;
        DataUrl::parse(&self.file)?.decode()?;
        Ok(kind)
    }
}

/// A borrowed view of a `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub mime_type: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    pub fn parse(s: &'a str) -> Result<Self, AnalyzerError> {
        let rest = s.strip_prefix("data:").ok_or_else(|| AnalyzerError::InvalidDataUrl {
            reason: "missing 'data:' prefix".into(),
        })?;

        let (header, payload) = rest.split_once(',').ok_or_else(|| AnalyzerError::InvalidDataUrl {
            reason: "missing ',' separator".into(),
        })?;

        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| AnalyzerError::InvalidDataUrl {
                reason: "payload is not base64-encoded".into(),
            })?;

        if payload.is_empty() {
            return Err(AnalyzerError::InvalidDataUrl {
                reason: "empty payload".into(),
            });
        }

        Ok(Self { mime_type, payload })
    }

    /// Decode the base64 payload.
    pub fn decode(&self) -> Result<Vec<u8>, AnalyzerError> {
        STANDARD
            .decode(self.payload)
            .map_err(|e| AnalyzerError::InvalidDataUrl {
                reason: format!("bad base64: {e}"),
            })
    }
}
