use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use retro_common::document::Document;

use crate::error::AppError;
use crate::model::FeedbackSpan;

const RULE_WIDTH: usize = 80;

/// Format every document's full text followed by the spans taken from it, for manual review.
///
/// Spans are matched to documents by their `source` file name.
pub fn format_dump(documents: &[Document], spans: &[FeedbackSpan]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    for doc in documents {
        let own: Vec<&FeedbackSpan> = spans
            .iter()
            .filter(|s| s.source.as_deref() == Some(doc.name.as_str()))
            .collect();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "FILE: {}", doc.name);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{}", doc.text);
        let _ = writeln!(out);
        let _ = writeln!(out, "Extracted feedback ({}):", own.len());
        for span in own {
            let _ = writeln!(out, "- {}", span.text);
        }
        let _ = writeln!(out);
    }
    out
}

pub fn write_dump(
    path: &Path,
    documents: &[Document],
    spans: &[FeedbackSpan],
) -> Result<(), AppError> {
    let write_err = |source| AppError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, format_dump(documents, spans)).map_err(write_err)?;
    info!(path = %path.display(), documents = documents.len(), "raw feedback dump written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, text: &str) -> Document {
        Document {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    fn span_from(source: &str, text: &str) -> FeedbackSpan {
        FeedbackSpan {
            source: Some(source.to_string()),
            ..FeedbackSpan::new(text)
        }
    }

    #[test]
    fn test_format_dump() {
        let docs = [doc("doe-jane.pdf", "Suggestions: shorter sprints please")];
        let spans = vec![span_from("doe-jane.pdf", "Suggestions: shorter sprints please")];
        let out = format_dump(&docs, &spans);

        assert!(out.starts_with(&"=".repeat(80)));
        assert!(out.contains("FILE: doe-jane.pdf\n"));
        assert!(out.contains("Extracted feedback (1):\n- Suggestions: shorter sprints please\n"));
    }

    #[test]
    fn test_format_dump_lists_spans_under_their_source() {
        let docs = [
            doc("doe-jane.pdf", "retro one"),
            doc("smith-alex.docx", "retro two"),
        ];
        let spans = vec![
            span_from("smith-alex.docx", "Concerns: the demo slot was too short"),
            span_from("doe-jane.pdf", "Suggestions: shorter sprints please"),
            span_from("smith-alex.docx", "Suggestions: publish the rubric earlier"),
        ];
        let out = format_dump(&docs, &spans);

        let (jane, alex) = out.split_once("FILE: smith-alex.docx").unwrap();
        assert!(jane.contains("Extracted feedback (1):\n- Suggestions: shorter sprints please\n"));
        assert!(!jane.contains("demo slot"));
        assert!(alex.contains(
            "Extracted feedback (2):\n\
             - Concerns: the demo slot was too short\n\
             - Suggestions: publish the rubric earlier\n"
        ));
    }
}
