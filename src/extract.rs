//! PDF text extraction: the collaborator the pipeline consumes.
//!
//! The pipeline only needs "a sequence of (page_number, text) pairs per
//! document", so extraction sits behind [`TextSource`] and tests drive the
//! orchestrator with an in-memory implementation.

use std::path::Path;
use std::process::Command;

use pdf::content::{Content, Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use pdf::object::Resolve;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Text extracted from one page. `text` may be empty when extraction
/// failed for that page; downstream stages treat that as zero candidate
/// sections, not an error.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Per-document page text supplier.
pub trait TextSource {
    /// Extract page text for one document. May return an empty sequence or
    /// per-page empty strings; must only fail when the file cannot be
    /// opened at all.
    fn extract(&self, path: &Path) -> Result<Vec<PageText>>;
}

/// Production source: the `pdf` crate's content-stream operators, with a
/// `pdftotext` subprocess fallback for documents the library cannot read
/// any text out of.
pub struct PdfTextSource;

impl TextSource for PdfTextSource {
    fn extract(&self, path: &Path) -> Result<Vec<PageText>> {
        let document = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let file = match FileOptions::cached().open(path) {
            Ok(file) => file,
            Err(e) => {
                // The library cannot parse the file at all; pdftotext gets
                // one chance before the document is declared unreadable.
                warn!(%document, error = %e, "pdf parse failed, trying pdftotext");
                return match pdftotext_pages(path) {
                    Ok(pages) if !pages.is_empty() => Ok(pages),
                    _ => Err(Error::DocumentUnreadable {
                        document,
                        reason: e.to_string(),
                    }),
                };
            }
        };

        let mut pages = Vec::new();
        for page_index in 0..file.num_pages() {
            let page_number = page_index + 1;
            let mut page_text = String::new();
            match file.get_page(page_index) {
                Ok(page) => {
                    if let Some(content) = &page.contents {
                        if let Err(e) = collect_text_ops(&file, content, &mut page_text) {
                            warn!(%document, page_number, error = %e, "page content extraction failed");
                            page_text.clear();
                        }
                    }
                }
                Err(e) => {
                    warn!(%document, page_number, error = %e, "page unavailable");
                }
            }
            let cleaned = clean_page_text(&page_text);
            debug!(%document, page_number, chars = cleaned.len(), "extracted page");
            pages.push(PageText {
                page_number,
                text: cleaned,
            });
        }

        if pages.iter().all(|p| p.text.is_empty()) {
            debug!(%document, "no text via pdf parsing, trying pdftotext");
            match pdftotext_pages(path) {
                Ok(fallback) if !fallback.is_empty() => return Ok(fallback),
                Ok(_) => warn!(%document, "pdftotext extracted no text"),
                Err(e) => warn!(%document, error = %e, "pdftotext fallback failed"),
            }
        }

        Ok(pages)
    }
}

/// Walk a page's content stream collecting drawn text. Newline ops and
/// large vertical moves become line breaks so header detection still sees
/// line structure.
fn collect_text_ops(
    resolver: &impl Resolve,
    content: &Content,
    text: &mut String,
) -> anyhow::Result<()> {
    for op in content.operations(resolver)? {
        match op {
            Op::TextDraw { text: t } => {
                let s = t.to_string_lossy();
                if !s.trim().is_empty() {
                    text.push_str(&s);
                    text.push(' ');
                }
            }
            Op::TextDrawAdjusted { array } => {
                for item in array {
                    match item {
                        TextDrawAdjusted::Text(s) => {
                            let s = s.to_string_lossy();
                            if !s.trim().is_empty() {
                                text.push_str(&s);
                                text.push(' ');
                            }
                        }
                        TextDrawAdjusted::Spacing(_) => text.push(' '),
                    }
                }
            }
            Op::TextNewline => text.push('\n'),
            Op::MoveTextPosition { translation } => {
                // Vertical jumps larger than a line height read as breaks.
                if translation.y.abs() > 12.0 {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Trim lines, drop empties, collapse runs of spaces within a line. Line
/// boundaries are preserved for the section detector.
fn clean_page_text(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shell out to `pdftotext -layout`, splitting its form-feed page breaks.
fn pdftotext_pages(path: &Path) -> anyhow::Result<Vec<PageText>> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg("-")
        .output()?;

    if !output.status.success() {
        anyhow::bail!(
            "pdftotext exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let pages: Vec<PageText> = text
        .split('\u{c}')
        .enumerate()
        .map(|(i, chunk)| PageText {
            page_number: (i + 1) as u32,
            text: clean_page_text(chunk),
        })
        .collect();

    if pages.iter().all(|p| p.text.is_empty()) {
        return Ok(Vec::new());
    }
    Ok(pages)
}
