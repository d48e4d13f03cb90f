/// Line-oriented extraction of feedback passages from retrospective text.
///
/// A passage opens on a line containing an indicator phrase and collects the following
/// lines until a blank line, or until a line that looks like the start of a new section
/// (numbered item, bold markup, or an all-caps `HEADER:`). That line is kept in the
/// passage before it closes. Lines that start a "what went well" style block are dropped
/// without closing the passage.
use once_cell::sync::Lazy;
use regex::Regex;

use retro_common::document::Document;

use crate::model::FeedbackSpan;

/// Passages of this many characters or fewer are discarded.
const MIN_SPAN_CHARS: usize = 20;

/// Lower-case phrases whose presence in a line opens a feedback passage.
const INDICATOR_PHRASES: &[&str] = &[
    "professor feedback",
    "feedback for professor",
    "feedback to professor",
    "what i didn't like",
    "what i disliked",
    "didn't like",
    "could be improved",
    "improvement",
    "suggestions",
    "suggestion",
    "challenges",
    "difficulties",
    "issues",
    "problems",
    "would have appreciated",
    "would have preferred",
    "would have liked",
    "wish",
    "hope",
    "next time",
    "going forward",
    "criticism",
    "concern",
    "complaint",
];

/// Lower-case line prefixes marking praise rather than feedback.
const POSITIVE_PREFIXES: &[&str] = &["what i liked", "what went well", "positives", "strengths"];

static NEW_SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.|^\*\*|^[A-Z][^a-z]+:").expect("valid regex"));

/// Extract feedback passages from `text`, in document order.
pub fn extract_sections(text: &str) -> Vec<String> {
    let mut spans = Vec::new();
    let mut in_section = false;
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let key = line.trim().to_lowercase();

        if !in_section && INDICATOR_PHRASES.iter().any(|p| key.contains(p)) {
            in_section = true;
            current.clear();
            current.push(line);
            continue;
        }
        if !in_section {
            continue;
        }

        if key.is_empty() {
            close_section(&mut current, &mut spans);
            in_section = false;
        } else if POSITIVE_PREFIXES.iter().any(|p| key.starts_with(p)) {
            continue;
        } else {
            current.push(line);
            if NEW_SECTION_RE.is_match(line) {
                close_section(&mut current, &mut spans);
                in_section = false;
            }
        }
    }

    close_section(&mut current, &mut spans);
    spans
}

/// Extract passages from a loaded document, tagged with its file name.
pub fn extract_spans(document: &Document) -> Vec<FeedbackSpan> {
    extract_sections(&document.text)
        .into_iter()
        .map(|text| FeedbackSpan {
            text,
            source: Some(document.name.clone()),
        })
        .collect()
}

fn close_section(current: &mut Vec<&str>, spans: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let joined = current.join(" ");
    let text = joined.trim();
    if text.chars().count() > MIN_SPAN_CHARS {
        spans.push(text.to_string());
    }
    current.clear();
}
