//! C1: Document Extractor — turns raw document bytes into normalized text
//! plus a parse-confidence. Fully synchronous: the surrounding service owns
//! any I/O scheduling or worker pool (§5).

use crate::error::{PipelineError, PipelineResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Read as _};
use unicode_normalization::UnicodeNormalization;
use zip::ZipArchive;

const PDF_TABLE_AWARE_CONFIDENCE: f64 = 0.85;
const PDF_BASIC_CONFIDENCE: f64 = 0.80;
const DOCX_CONFIDENCE: f64 = 0.90;
const DOC_CONFIDENCE: f64 = 0.70;
const TEXT_CONFIDENCE: f64 = 1.0;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static EXCESSIVE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static CRLF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r").unwrap());

/// `ExtractDocument(bytes, mime) -> (text, confidence) | Error` from the
/// core API.
pub fn extract(bytes: &[u8], mime: &str) -> PipelineResult<(String, f64)> {
    let (raw_text, confidence) = match mime {
        "application/pdf" => extract_pdf(bytes)?,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            (extract_docx(bytes)?, DOCX_CONFIDENCE)
        }
        "application/msword" => (extract_doc(bytes)?, DOC_CONFIDENCE),
        "text/plain" => (extract_text(bytes), TEXT_CONFIDENCE),
        other => return Err(PipelineError::unsupported_format(other)),
    };

    let normalized = normalize_text(&raw_text);
    if normalized.trim().is_empty() {
        return Err(PipelineError::extraction_failed(
            "no text could be recovered from document",
        ));
    }

    Ok((normalized, confidence))
}

/// Two extraction strategies are attempted for PDF; whichever yields the
/// longer text wins. Ties favor the table-aware (`lopdf`) strategy.
fn extract_pdf(bytes: &[u8]) -> PipelineResult<(String, f64)> {
    let basic = pdf_extract::extract_text_from_mem(bytes).unwrap_or_default();
    let table_aware = extract_pdf_table_aware(bytes).unwrap_or_default();

    if table_aware.len() >= basic.len() && !table_aware.trim().is_empty() {
        Ok((table_aware, PDF_TABLE_AWARE_CONFIDENCE))
    } else if !basic.trim().is_empty() {
        Ok((basic, PDF_BASIC_CONFIDENCE))
    } else {
        Err(PipelineError::extraction_failed(
            "both PDF extraction strategies failed",
        ))
    }
}

/// Walks page content streams directly via `lopdf`, concatenating the text
/// operands of `Tj`/`TJ` show-text operators in object order. This reads
/// tabular layouts (which the stream-linearized `pdf-extract` strategy can
/// scramble) closer to their visual row order.
fn extract_pdf_table_aware(bytes: &[u8]) -> Option<String> {
    let document = lopdf::Document::load_mem(bytes).ok()?;
    let mut out = String::new();

    for (_page_number, page_id) in document.get_pages() {
        let Ok(raw) = document.get_page_content(page_id) else {
            continue;
        };
        let Ok(content) = lopdf::content::Content::decode(&raw) else {
            continue;
        };
        for operation in content.operations {
            match operation.operator.as_str() {
                "Tj" => {
                    if let Some(lopdf::Object::String(bytes, _)) = operation.operands.first() {
                        out.push_str(&String::from_utf8_lossy(bytes));
                        out.push(' ');
                    }
                }
                "TJ" => {
                    if let Some(lopdf::Object::Array(items)) = operation.operands.first() {
                        for item in items {
                            if let lopdf::Object::String(bytes, _) = item {
                                out.push_str(&String::from_utf8_lossy(bytes));
                            }
                        }
                        out.push(' ');
                    }
                }
                "Td" | "TD" | "T*" => out.push('\n'),
                _ => {}
            }
        }
        out.push('\n');
    }

    Some(out)
}

fn extract_docx(bytes: &[u8]) -> PipelineResult<String> {
    let cursor = Cursor::new(bytes);
    let mut archive = ZipArchive::new(cursor)
        .map_err(|e| PipelineError::extraction_failed(format!("invalid DOCX archive: {}", e)))?;

    let mut document_xml = archive.by_name("word/document.xml").map_err(|e| {
        PipelineError::extraction_failed(format!("DOCX missing document.xml: {}", e))
    })?;

    let mut xml_content = String::new();
    document_xml
        .read_to_string(&mut xml_content)
        .map_err(|e| PipelineError::extraction_failed(format!("DOCX read failure: {}", e)))?;

    extract_text_from_docx_xml(&xml_content)
}

/// Reads paragraphs and table cells in document order: `<w:t>` runs are
/// collected as text, `<w:p>` and `<w:tr>` ends insert paragraph/row breaks.
fn extract_text_from_docx_xml(xml: &str) -> PipelineResult<String> {
    use quick_xml::events::Event;
    use quick_xml::name::QName;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut text = Vec::new();
    let mut inside_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name() == QName(b"w:t") => inside_text = true,
            Ok(Event::Text(e)) if inside_text => {
                let decoded = e
                    .unescape()
                    .map_err(|e| PipelineError::extraction_failed(format!("bad XML text: {}", e)))?;
                text.push(decoded.to_string());
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                if name == QName(b"w:t") {
                    inside_text = false;
                } else if name == QName(b"w:p") || name == QName(b"w:tr") {
                    text.push("\n".to_string());
                } else if name == QName(b"w:tc") {
                    text.push("\t".to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PipelineError::extraction_failed(format!(
                    "XML parsing error: {}",
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(text.join(""))
}

/// Legacy binary `.doc`: scan for runs of printable ASCII terminated by a
/// null byte or other non-printable character, keeping chunks longer than
/// three characters that contain at least one letter.
fn extract_doc(bytes: &[u8]) -> PipelineResult<String> {
    let mut chunks = Vec::new();
    let mut current = Vec::new();

    let flush = |current: &mut Vec<u8>, chunks: &mut Vec<String>| {
        if current.len() > 3 {
            if let Ok(text) = String::from_utf8(current.clone()) {
                let cleaned = text.trim();
                if !cleaned.is_empty() && cleaned.chars().any(|c| c.is_alphabetic()) {
                    chunks.push(cleaned.to_string());
                }
            }
        }
        current.clear();
    };

    for &byte in bytes {
        let printable = (32..=126).contains(&byte) || matches!(byte, 9 | 10 | 13);
        if printable {
            current.push(byte);
        } else {
            flush(&mut current, &mut chunks);
        }
    }
    flush(&mut current, &mut chunks);

    if chunks.is_empty() {
        return Err(PipelineError::extraction_failed(
            "no readable text found in legacy .doc file",
        ));
    }

    Ok(chunks.join(" "))
}

fn extract_text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())
}

/// Collapse whitespace runs, normalize line endings, preserve paragraph
/// breaks, and strip zero-width characters.
fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .nfc()
        .filter(|c| !matches!(*c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}'))
        .collect();

    let normalized_breaks = CRLF.replace_all(&stripped, "\n");
    let collapsed = WHITESPACE_RUN.replace_all(&normalized_breaks, " ");
    let trimmed_lines: Vec<&str> = collapsed.lines().map(|l| l.trim()).collect();
    let rejoined = trimmed_lines.join("\n");
    let no_excessive_breaks = EXCESSIVE_BREAKS.replace_all(&rejoined, "\n\n");

    no_excessive_breaks.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_round_trips_with_full_confidence() {
        let (text, confidence) = extract(b"Hello   world\n\n\nSecond paragraph", "text/plain")
            .unwrap();
        assert_eq!(confidence, 1.0);
        assert_eq!(text, "Hello world\n\nSecond paragraph");
    }

    #[test]
    fn unsupported_mime_is_fatal() {
        let err = extract(b"whatever", "image/png").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn empty_text_is_extraction_failure() {
        let err = extract(b"   \n\n  ", "text/plain").unwrap_err();
        assert!(matches!(err, PipelineError::ExtractionFailed { .. }));
    }

    #[test]
    fn zero_width_characters_are_stripped() {
        let text = normalize_text("hello\u{200B}world");
        assert_eq!(text, "helloworld");
    }

    #[test]
    fn doc_fallback_extracts_printable_runs() {
        let mut bytes = b"garbage\x00\x01".to_vec();
        bytes.extend_from_slice(b"Software Engineer");
        bytes.push(0);
        bytes.extend_from_slice(b"\x02\x03binary");
        let (text, confidence) = extract(&bytes, "application/msword").unwrap();
        assert!(text.contains("Software Engineer"));
        assert_eq!(confidence, 0.70);
    }
}
