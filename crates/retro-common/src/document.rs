/// Plain-text extraction for student submissions.
///
/// Supported formats are `.docx` (paragraph text via docx-rs) and `.pdf` (via pdf-extract).
/// Line structure matters to the feedback sectioner downstream, so empty DOCX paragraphs
/// are kept as blank lines.
use std::path::Path;

use docx_rs::{DocumentChild, InsertChild, MoveToChild, Paragraph, ParagraphChild, Run, RunChild};
use tracing::debug;

use crate::error::CommonError;

/// Extensions accepted by [`extract_text`], lower-case and without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["docx", "pdf"];

/// A submission loaded from disk.
#[derive(Debug, Clone)]
pub struct Document {
    /// File name without directory, e.g. "doe-jane.docx"
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn load(path: &Path) -> Result<Self, CommonError> {
        let text = extract_text(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        debug!(file = %name, chars = text.chars().count(), "document loaded");
        Ok(Self { name, text })
    }
}

/// Extract the plain text of a document, dispatching on its extension.
pub fn extract_text(path: &Path) -> Result<String, CommonError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "docx" => extract_docx(path),
        "pdf" => extract_pdf(path),
        _ => Err(CommonError::UnsupportedFormat(format!(".{ext}"))),
    }
}

fn extract_docx(path: &Path) -> Result<String, CommonError> {
    let bytes = std::fs::read(path).map_err(|source| CommonError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| CommonError::Docx {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Concatenate the visible runs of one paragraph, including hyperlinks and tracked
/// insertions. Tabs and explicit breaks are kept.
fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    push_children_text(&para.children, &mut out);
    out
}

fn push_children_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, out),
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, out),
            ParagraphChild::Insert(insert) => {
                for ic in &insert.children {
                    if let InsertChild::Run(run) = ic {
                        push_run_text(run, out);
                    }
                }
            }
            ParagraphChild::MoveTo(moved) => {
                for mc in &moved.children {
                    if let MoveToChild::Run(run) = mc {
                        push_run_text(run, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, out: &mut String) {
    for rc in &run.children {
        match rc {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

/// pdf-extract panics on some fonts it cannot decode; that is reported as an extraction
/// failure for this file only.
fn extract_pdf(path: &Path) -> Result<String, CommonError> {
    let bytes = std::fs::read(path).map_err(|source| CommonError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let pdf_err = |message: String| CommonError::Pdf {
        path: path.to_path_buf(),
        message,
    };

    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(pdf_err(e.to_string())),
        Err(_) => Err(pdf_err("pdf parser panicked".to_string())),
    }
}
