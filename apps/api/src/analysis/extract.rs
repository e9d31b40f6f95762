//! Text extraction for uploaded resumes.
//!
//! Format selection is driven purely by the filename suffix. Each `DocumentFormat`
//! variant owns one extraction strategy; a successful extraction always carries
//! at least one non-whitespace character.

use std::io::{Cursor, Read};
use std::panic::{self, AssertUnwindSafe};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type. Please use PDF or DOCX.")]
    UnsupportedFormat(String),

    /// `reason` is the low-level parser message. It is logged, never shown to clients.
    #[error("{}", failure_message(.format))]
    ExtractionFailed {
        format: DocumentFormat,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Case-insensitive suffix match. No magic-byte sniffing is performed.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.trim().to_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentFormat::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentFormat::Docx)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }

    fn read_text(self, bytes: &[u8]) -> Result<String, String> {
        match self {
            DocumentFormat::Pdf => extract_pdf(bytes),
            DocumentFormat::Docx => extract_docx(bytes),
        }
    }
}

fn failure_message(format: &DocumentFormat) -> &'static str {
    match format {
        DocumentFormat::Pdf => "Failed to read PDF file. It might be scanned or corrupted.",
        DocumentFormat::Docx => {
            "Failed to read DOCX file. It might be corrupted or in an old DOC format."
        }
    }
}

/// Extracts plain text from `bytes`, choosing the parser from `filename`'s extension.
pub fn extract(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    let format = DocumentFormat::from_filename(filename)
        .ok_or_else(|| ExtractError::UnsupportedFormat(filename.to_string()))?;
    extract_as(format, bytes)
}

/// Runs the parser for `format`. Parser panics on malformed input are converted
/// into `ExtractionFailed`.
pub fn extract_as(format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| format.read_text(bytes)))
        .unwrap_or_else(|payload| Err(panic_reason(payload.as_ref())));

    let failed = |reason: String| ExtractError::ExtractionFailed { format, reason };

    match outcome {
        Ok(text) if text.trim().is_empty() => {
            Err(failed("document contains no extractable text".to_string()))
        }
        Ok(text) => {
            debug!("Extracted {} bytes of text from {}", text.len(), format.extension());
            Ok(text)
        }
        Err(reason) => Err(failed(reason)),
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("parser panicked: {detail}")
}

/// pdf-extract walks the page tree in document order and concatenates each page's
/// text layer. Image-only pages contribute nothing.
fn extract_pdf(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())
}

fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| format!("{DOCX_BODY_PART}: {e}"))?
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;

    let paragraphs = docx_paragraphs(&xml)?;
    Ok(paragraphs.join("\n"))
}

/// Collects the text of every `w:p` element in document order.
///
/// Text comes from `w:t` runs; `w:tab` becomes a tab and `w:br`/`w:cr` a newline.
/// Empty paragraphs yield empty strings so paragraph positions are kept.
///
/// Paragraphs nest inside text boxes (`w:txbxContent`). Each paragraph gets its
/// slot when it opens, so a text box paragraph lands right after the paragraph
/// that anchors it and the anchor keeps the text on both sides of the box.
/// `mc:Fallback` subtrees repeat the `mc:Choice` content and are skipped.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    // Slot indices of the currently open paragraphs, innermost last.
    let mut open: Vec<usize> = Vec::new();
    let mut fallback_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;

        if fallback_depth > 0 {
            match &event {
                Event::Start(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth += 1,
                Event::End(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Fallback" => fallback_depth = 1,
                b"p" => {
                    open.push(paragraphs.len());
                    paragraphs.push(String::new());
                }
                b"t" if !open.is_empty() => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                let separator = match e.local_name().as_ref() {
                    b"p" => {
                        paragraphs.push(String::new());
                        None
                    }
                    b"tab" => Some('\t'),
                    b"br" | b"cr" => Some('\n'),
                    _ => None,
                };
                if let (Some(c), Some(&i)) = (separator, open.last()) {
                    paragraphs[i].push(c);
                }
            }
            Event::Text(t) if in_text => {
                if let Some(&i) = open.last() {
                    paragraphs[i].push_str(&t.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(t) if in_text => {
                if let Some(&i) = open.last() {
                    paragraphs[i].push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    open.pop();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
