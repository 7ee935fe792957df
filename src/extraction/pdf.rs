//! PDF extraction via lopdf, page by page

use crate::error::{Error, Result};
use crate::types::{PageError, PageSpan};

use super::{Extracted, ExtractionReport};

/// Extract text from a PDF, preserving per-page char offsets.
///
/// Pages that fail to parse are recorded in the report while good pages are
/// kept; only when no page yields text does extraction fail.
pub fn extract_pdf(data: &[u8]) -> Result<Extracted> {
    let doc = lopdf::Document::load_mem(data).map_err(|e| Error::corrupt(e.to_string()))?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(Error::corrupt("PDF contains no pages"));
    }

    let mut text = String::new();
    let mut pages = Vec::new();
    let mut failed_pages = Vec::new();

    for page in page_numbers {
        match doc.extract_text(&[page]) {
            Ok(content) => {
                let content = content.trim_end();
                if content.is_empty() {
                    continue;
                }
                let start = text.len();
                text.push_str(content);
                text.push('\n');
                pages.push(PageSpan {
                    page,
                    start,
                    end: text.len(),
                });
            }
            Err(e) => {
                tracing::warn!("page {} failed to extract: {}", page, e);
                failed_pages.push(PageError {
                    page,
                    message: e.to_string(),
                });
            }
        }
    }

    // Some generators defeat per-page extraction; fall back to a
    // whole-document pass before declaring the input corrupt. The fallback
    // loses page boundaries, so citations degrade to page 1.
    if pages.is_empty() {
        match pdf_extract::extract_text_from_mem(data) {
            Ok(content) if !content.trim().is_empty() => {
                let text = content;
                let pages = vec![PageSpan {
                    page: 1,
                    start: 0,
                    end: text.len(),
                }];
                return Ok(Extracted {
                    text,
                    pages,
                    report: ExtractionReport { failed_pages },
                });
            }
            _ => {
                return Err(Error::corrupt("no pages could be extracted"));
            }
        }
    }

    Ok(Extracted {
        text,
        pages,
        report: ExtractionReport { failed_pages },
    })
}
