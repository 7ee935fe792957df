//! Text extraction with page-offset tracking

mod pdf;

use serde::{Deserialize, Serialize};

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::types::{PageError, PageSpan};

/// Result of a successful extraction
#[derive(Debug, Clone)]
pub struct Extracted {
    /// Extracted plain text
    pub text: String,
    /// Page offsets into the text
    pub pages: Vec<PageSpan>,
    /// Per-page failures for partially extracted documents
    pub report: ExtractionReport,
}

/// Per-page error list for partial extraction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Pages that failed to parse; good pages are kept
    pub failed_pages: Vec<PageError>,
}

/// Converts uploaded bytes into plain text with page boundaries preserved
pub struct Extractor {
    max_file_size: usize,
}

impl Extractor {
    /// Create an extractor from configuration
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
        }
    }

    /// Extract text and page offsets from an uploaded document.
    ///
    /// The size limit is enforced before any parse attempt.
    pub fn extract(&self, data: &[u8], declared_mime: &str) -> Result<Extracted> {
        if data.len() > self.max_file_size {
            return Err(Error::SizeExceeded {
                got: data.len(),
                limit: self.max_file_size,
            });
        }

        let mime = declared_mime
            .split(';')
            .next()
            .unwrap_or(declared_mime)
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/pdf" => pdf::extract_pdf(data),
            "text/plain" | "text/markdown" => Ok(extract_text(data)),
            other => Err(Error::unsupported(other.to_string())),
        }
    }
}

/// Plain-text uploads are a single page
fn extract_text(data: &[u8]) -> Extracted {
    let text = String::from_utf8_lossy(data).into_owned();
    let pages = if text.is_empty() {
        Vec::new()
    } else {
        vec![PageSpan {
            page: 1,
            start: 0,
            end: text.len(),
        }]
    };

    Extracted {
        text,
        pages,
        report: ExtractionReport::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(&ExtractionConfig::default())
    }

    #[test]
    fn rejects_oversized_input_before_parsing() {
        let small = Extractor::new(&ExtractionConfig {
            max_file_size: 8,
            preview_chars: 80,
        });
        let err = small.extract(b"0123456789", "application/pdf").unwrap_err();
        assert!(matches!(err, Error::SizeExceeded { got: 10, limit: 8 }));
    }

    #[test]
    fn rejects_unknown_mime() {
        let err = extractor().extract(b"data", "image/png").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn mime_parameters_are_ignored() {
        let extracted = extractor()
            .extract(b"hello world", "text/plain; charset=utf-8")
            .unwrap();
        assert_eq!(extracted.text, "hello world");
        assert_eq!(extracted.pages.len(), 1);
        assert_eq!(extracted.pages[0].page, 1);
    }

    #[test]
    fn garbage_pdf_is_corrupt_input() {
        let err = extractor()
            .extract(b"definitely not a pdf", "application/pdf")
            .unwrap_err();
        assert!(matches!(err, Error::CorruptInput(_)));
    }

    #[test]
    fn plain_text_span_covers_whole_text() {
        let extracted = extractor().extract(b"line one\nline two", "text/plain").unwrap();
        assert_eq!(extracted.pages[0].start, 0);
        assert_eq!(extracted.pages[0].end, extracted.text.len());
        assert!(extracted.report.failed_pages.is_empty());
    }
}
