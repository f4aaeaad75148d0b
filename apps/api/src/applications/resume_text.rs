//! Résumé text extraction.
//!
//! PDF uploads go through `pdf-extract`; plain-text uploads are decoded as UTF-8. Extraction
//! failures never fail an application: `scoring_source` logs them and falls back to the
//! applicant's listed skills.

use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

use crate::matching::scoring_text;

#[derive(Debug, Error, PartialEq)]
pub enum ResumeParseError {
    #[error("resume upload is empty")]
    Empty,

    #[error("unsupported resume format: {0}")]
    Unsupported(String),

    #[error("failed to extract PDF text: {0}")]
    Pdf(String),

    #[error("resume is not valid UTF-8 text")]
    Encoding,
}

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeUpload {
    fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
            || self.has_extension(".pdf")
            || self.bytes.starts_with(b"%PDF")
    }

    fn is_plain_text(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("text/plain"))
            || self.has_extension(".txt")
    }

    fn has_extension(&self, ext: &str) -> bool {
        self.file_name
            .as_deref()
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(ext))
    }
}

/// Text the scorer sees, plus the parse problem (if any) for the caller to surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSource {
    pub text: String,
    pub parse_warning: Option<String>,
}

pub fn extract_resume_text(upload: &ResumeUpload) -> Result<String, ResumeParseError> {
    if upload.bytes.is_empty() {
        return Err(ResumeParseError::Empty);
    }
    if upload.is_pdf() {
        return pdf_extract::extract_text_from_mem(&upload.bytes)
            .map_err(|e| ResumeParseError::Pdf(e.to_string()));
    }
    if upload.is_plain_text() {
        return String::from_utf8(upload.bytes.to_vec()).map_err(|_| ResumeParseError::Encoding);
    }
    Err(ResumeParseError::Unsupported(
        upload
            .content_type
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
    ))
}

/// Runs extraction on the blocking pool. A panic inside the PDF parser surfaces as a
/// `ResumeParseError::Pdf`.
pub async fn extract_resume_text_blocking(upload: ResumeUpload) -> Result<String, ResumeParseError> {
    tokio::task::spawn_blocking(move || extract_resume_text(&upload))
        .await
        .unwrap_or_else(|e| Err(ResumeParseError::Pdf(format!("parser aborted: {e}"))))
}

/// Combines an extraction result with the skills fallback. Never fails.
pub fn scoring_source(
    extracted: Option<Result<String, ResumeParseError>>,
    provided_skills: &[String],
) -> ScoringSource {
    let (resume_text, parse_warning) = match extracted {
        None => (None, None),
        Some(Ok(text)) => (Some(text), None),
        Some(Err(e)) => {
            warn!("Resume parsing failed, falling back to listed skills: {e}");
            (None, Some(e.to_string()))
        }
    };

    ScoringSource {
        text: scoring_text(resume_text.as_deref(), provided_skills),
        parse_warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: &str, body: &'static [u8]) -> ResumeUpload {
        ResumeUpload {
            file_name: Some(name.to_string()),
            content_type: Some(content_type.to_string()),
            bytes: Bytes::from_static(body),
        }
    }

    #[test]
    fn test_plain_text_upload_decoded() {
        let text = extract_resume_text(&upload("cv.txt", "text/plain", b"Rust and Go")).unwrap();
        assert_eq!(text, "Rust and Go");
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert_eq!(
            extract_resume_text(&upload("cv.pdf", "application/pdf", b"")),
            Err(ResumeParseError::Empty)
        );
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert_eq!(
            extract_resume_text(&upload("cv.txt", "text/plain", &[0xff, 0xfe, 0x00])),
            Err(ResumeParseError::Encoding)
        );
    }

    #[test]
    fn test_unknown_format_unsupported() {
        let result = extract_resume_text(&upload("cv.docx", "application/msword", b"PK\x03\x04"));
        assert!(matches!(result, Err(ResumeParseError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_blocking_extraction_degrades_on_garbage_pdf() {
        let result =
            extract_resume_text_blocking(upload("cv.pdf", "application/pdf", b"%PDF-1.4 junk"))
                .await;
        assert!(matches!(result, Err(ResumeParseError::Pdf(_))));
    }

    #[test]
    fn test_scoring_source_falls_back_on_parse_error() {
        let skills = vec!["python".to_string(), "sql".to_string()];
        let source = scoring_source(Some(Err(ResumeParseError::Encoding)), &skills);
        assert_eq!(source.text, "python sql");
        assert!(source.parse_warning.is_some());
    }

    #[test]
    fn test_scoring_source_without_resume_or_skills_is_empty() {
        let source = scoring_source(None, &[]);
        assert_eq!(source.text, "");
        assert_eq!(source.parse_warning, None);
    }

    #[test]
    fn test_scoring_source_prefers_resume() {
        let source = scoring_source(Some(Ok("Kubernetes operator".to_string())), &["go".to_string()]);
        assert_eq!(source.text, "Kubernetes operator");
    }
}
