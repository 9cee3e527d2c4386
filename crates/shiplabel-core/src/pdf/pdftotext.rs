//! Word tokenization using lopdf for validation and `pdftotext -bbox` for layout.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use lopdf::Document;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, trace};

use super::{PdfTokenizer, Result, TokenizedDocument, Word};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Tokenizer backed by poppler's `pdftotext`.
///
/// The document is opened with lopdf first so that corrupt input is reported
/// as a parse error and empty-password encryption is removed before the
/// bytes reach `pdftotext`.
#[derive(Debug, Clone)]
pub struct PdftotextTokenizer {
    binary: PathBuf,
    decrypt_empty_password: bool,
}

impl PdftotextTokenizer {
    /// Create a tokenizer that runs `pdftotext` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("pdftotext"),
            decrypt_empty_password: true,
        }
    }

    /// Create a tokenizer from the PDF configuration section.
    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new()
            .with_binary(&config.pdftotext_path)
            .with_empty_password_decryption(config.decrypt_empty_password)
    }

    /// Set the `pdftotext` binary to run.
    pub fn with_binary(mut self, binary: impl AsRef<Path>) -> Self {
        self.binary = binary.as_ref().to_path_buf();
        self
    }

    /// Set whether encrypted PDFs are retried with an empty password.
    pub fn with_empty_password_decryption(mut self, enabled: bool) -> Self {
        self.decrypt_empty_password = enabled;
        self
    }

    /// Check if the configured binary can be executed.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    /// Validate the document and strip empty-password encryption.
    fn prepare<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        if !doc.is_encrypted() {
            return Ok(Cow::Borrowed(data));
        }

        if !self.decrypt_empty_password || doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
        Ok(Cow::Owned(decrypted))
    }

    fn run_bbox(&self, data: &[u8]) -> Result<String> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| PdfError::Tokenizer(e.to_string()))?;
        tmpfile
            .write_all(data)
            .map_err(|e| PdfError::Tokenizer(e.to_string()))?;

        let output = Command::new(&self.binary)
            .arg("-bbox")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PdfError::PdftotextNotFound
                } else {
                    PdfError::Tokenizer(format!("pdftotext -bbox failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(PdfError::PdftotextFailed { code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for PdftotextTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfTokenizer for PdftotextTokenizer {
    fn tokenize(&self, data: &[u8]) -> Result<TokenizedDocument> {
        let prepared = self.prepare(data)?;
        let xhtml = self.run_bbox(&prepared)?;
        let document = parse_bbox_xhtml(&xhtml)?;

        debug!(
            "Tokenized PDF: {} words, page {}x{}",
            document.words.len(),
            document.page_width,
            document.page_height
        );

        Ok(document)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Parse the XHTML written by `pdftotext -bbox`.
///
/// Words from every `<page>` are kept in page order; the first page's
/// `width`/`height` become the reference geometry.
pub(crate) fn parse_bbox_xhtml(xhtml: &str) -> Result<TokenizedDocument> {
    let mut reader = Reader::from_str(xhtml);
    reader.config_mut().trim_text(true);

    let mut document = TokenizedDocument::default();
    let mut pages = 0usize;
    let mut current: Option<Word> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => {
                    pages += 1;
                    on_page(&e, pages, &mut document)?;
                }
                b"word" => current = Some(word_from_attrs(&e)?),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.name().as_ref() == b"page" => {
                pages += 1;
                on_page(&e, pages, &mut document)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(word) = current.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| PdfError::Tokenizer(e.to_string()))?;
                    word.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"word" => {
                if let Some(word) = current.take() {
                    if word.text.trim().is_empty() {
                        continue;
                    }
                    trace!("word {:?} at ({}, {})", word.text, word.x0, word.top);
                    document.words.push(word);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PdfError::Tokenizer(format!(
                    "invalid pdftotext output at {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if pages == 0 {
        return Err(PdfError::NoPages);
    }

    Ok(document)
}

fn on_page(e: &BytesStart, number: usize, document: &mut TokenizedDocument) -> Result<()> {
    if number > 1 {
        return Ok(());
    }
    let width = attr_f64(e, b"width")?;
    let height = attr_f64(e, b"height")?;
    if width <= 0.0 || height <= 0.0 {
        return Err(PdfError::Tokenizer(format!(
            "invalid page size {}x{}",
            width, height
        )));
    }
    document.page_width = width;
    document.page_height = height;
    Ok(())
}

fn word_from_attrs(e: &BytesStart) -> Result<Word> {
    Ok(Word::new(
        String::new(),
        attr_f64(e, b"xMin")?,
        attr_f64(e, b"yMin")?,
        attr_f64(e, b"xMax")?,
        attr_f64(e, b"yMax")?,
    ))
}

fn attr_f64(e: &BytesStart, name: &[u8]) -> Result<f64> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| PdfError::Tokenizer(e.to_string()))?;
        if attr.key.as_ref() != name {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| PdfError::Tokenizer(e.to_string()))?;
        return value.trim().parse::<f64>().map_err(|_| {
            PdfError::Tokenizer(format!(
                "attribute {} is not a number: {}",
                String::from_utf8_lossy(name),
                value
            ))
        });
    }

    Err(PdfError::Tokenizer(format!(
        "missing attribute {}",
        String::from_utf8_lossy(name)
    )))
}
