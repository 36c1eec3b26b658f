//! Plain-text extraction from uploaded resumes.
//!
//! PDF and Word parsing are CPU-bound and run inside `spawn_blocking`.

use std::io::{Cursor, Read};

use bytes::Bytes;
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use thiserror::Error;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const TEXT_CONTENT_TYPE: &str = "text/plain";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MSWORD_CONTENT_TYPE: &str = "application/msword";

/// Main body part of a WordprocessingML package.
const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type '{0}'. Please upload a PDF, Word (.docx) or plain-text file.")]
    UnsupportedType(String),

    #[error("File size exceeds the {limit}-byte limit")]
    TooLarge { limit: usize },

    #[error("Failed to parse PDF: {0}")]
    Pdf(String),

    #[error("Failed to parse Word document: {0}")]
    Docx(String),

    #[error("Text file is not valid UTF-8")]
    NotUtf8,

    #[error("Could not extract text from the resume. Please ensure the file is not corrupted.")]
    Empty,
}

/// Accepted upload kinds, keyed off the declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Docx,
    Text,
}

impl UploadKind {
    /// Ignores parameters such as `; charset=utf-8`.
    pub fn from_content_type(content_type: &str) -> Result<Self, ExtractError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            PDF_CONTENT_TYPE => Ok(UploadKind::Pdf),
            // Legacy .doc binaries are sent as msword too; they fail as parse errors.
            DOCX_CONTENT_TYPE | MSWORD_CONTENT_TYPE => Ok(UploadKind::Docx),
            TEXT_CONTENT_TYPE => Ok(UploadKind::Text),
            _ => Err(ExtractError::UnsupportedType(content_type.to_string())),
        }
    }
}

/// Extracts resume text, enforcing the size limit before any parsing.
pub async fn extract_text(
    kind: UploadKind,
    data: Bytes,
    max_bytes: usize,
) -> Result<String, ExtractError> {
    if data.len() > max_bytes {
        return Err(ExtractError::TooLarge { limit: max_bytes });
    }

    let text = match kind {
        UploadKind::Text => String::from_utf8(data.to_vec()).map_err(|_| ExtractError::NotUtf8)?,
        UploadKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| ExtractError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| ExtractError::Pdf(format!("extraction task failed: {e}")))??,
        UploadKind::Docx => tokio::task::spawn_blocking(move || docx_text(&data))
            .await
            .map_err(|e| ExtractError::Docx(format!("extraction task failed: {e}")))??,
    };

    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

/// Text of `word/document.xml`: `w:t` runs in order, one line per `w:p`
/// paragraph, `w:tab` as a tab and `w:br`/`w:cr` as a line break.
fn docx_text(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(docx_err)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(docx_err)?
        .read_to_string(&mut xml)
        .map_err(docx_err)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(docx_err)? {
            XmlEvent::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            XmlEvent::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            XmlEvent::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                b"w:p" => text.push('\n'),
                _ => {}
            },
            XmlEvent::Text(e) if in_run_text => {
                text.push_str(&e.unescape().map_err(docx_err)?);
            }
            XmlEvent::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn docx_err(e: impl std::fmt::Display) -> ExtractError {
    ExtractError::Docx(e.to_string())
}

/// Minimal `.docx` package holding only the body part.
#[cfg(test)]
pub(crate) fn docx_fixture(paragraphs: &[&str]) -> Vec<u8> {
    use std::io::Write;

    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    zip.start_file(DOCX_BODY_PART, options).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}
