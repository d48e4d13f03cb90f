/// Markdown rendering of categorized feedback.
///
/// Categories are ranked by how many spans they received. Within a category, spans are
/// deduplicated on a whitespace- and case-insensitive key and at most
/// [`MAX_ITEMS_PER_CATEGORY`] are considered for display. Only cleaned items longer than
/// [`MIN_DISPLAY_CHARS`] become bullets, so a heading's mention count can exceed its
/// bullet count.
use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::error::AppError;
use crate::model::{Bucket, CategorizedFeedback};

pub const MAX_ITEMS_PER_CATEGORY: usize = 10;
pub const MIN_DISPLAY_CHARS: usize = 30;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.|^-|^\*").expect("valid regex"));

/// Render the summary as markdown lines (without trailing newlines).
///
/// `corpus_size` is the number of documents the feedback was drawn from.
pub fn render(categorized: &CategorizedFeedback, title: &str, corpus_size: usize) -> Vec<String> {
    let mut lines = vec![
        format!("# {title}"),
        String::new(),
        format!("*Compiled from {corpus_size} student retrospectives*"),
        String::new(),
        "---".to_string(),
    ];

    let mut ranked: Vec<&Bucket> = categorized.buckets.iter().collect();
    // stable: equal counts keep declaration order
    ranked.sort_by(|a, b| b.items.len().cmp(&a.items.len()));

    for bucket in ranked.into_iter().filter(|b| !b.items.is_empty()) {
        lines.push(String::new());
        lines.push(format!("## {} ({} mentions)", bucket.label, bucket.items.len()));
        lines.push(String::new());

        let unique = dedupe(bucket.items.iter().map(|s| s.text.as_str()));
        for item in unique.into_iter().take(MAX_ITEMS_PER_CATEGORY) {
            let cleaned = clean_for_display(item);
            if cleaned.chars().count() > MIN_DISPLAY_CHARS {
                lines.push(format!("- {cleaned}"));
            }
        }
    }

    lines
}

/// Write rendered lines to `path`, creating parent directories.
pub fn write_summary(path: &Path, lines: &[String]) -> Result<(), AppError> {
    let write_err = |source| AppError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content).map_err(write_err)?;
    info!(path = %path.display(), lines = lines.len(), "summary written");
    Ok(())
}

/// Key under which two spans count as duplicates.
pub fn normalize_key(text: &str) -> String {
    WHITESPACE_RE
        .replace_all(&text.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// Keep the first occurrence of every normalized key, in input order.
fn dedupe<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(normalize_key(item))).collect()
}

/// Strip one leading list marker (`1.`, `-`, `*`) and collapse whitespace.
fn clean_for_display(text: &str) -> String {
    let stripped = LIST_MARKER_RE.replace(text, "");
    WHITESPACE_RE.replace_all(stripped.trim(), " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::categorize;
    use crate::model::FeedbackSpan;

    fn bucket(label: &'static str, texts: &[&str]) -> Bucket {
        Bucket {
            label,
            items: texts.iter().map(|t| FeedbackSpan::new(*t)).collect(),
        }
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Team  issues"), normalize_key("team issues"));
        assert_eq!(normalize_key("  Line\none\t two "), "line one two");
    }

    #[test]
    fn test_dedupe_keeps_first_seen_form() {
        let items = ["Team  issues were constant", "team issues were constant", "Other"];
        assert_eq!(
            dedupe(items.into_iter()),
            vec!["Team  issues were constant", "Other"]
        );
    }

    #[test]
    fn test_clean_for_display() {
        assert_eq!(clean_for_display("3. More  office\thours"), "More office hours");
        assert_eq!(clean_for_display("- bullet item"), "bullet item");
        assert_eq!(clean_for_display("* starred"), "starred");
        assert_eq!(clean_for_display("no marker - here"), "no marker - here");
    }

    #[test]
    fn test_header_block() {
        let categorized = categorize(&[]);
        let lines = render(&categorized, "Sprint 4 Feedback", 12);
        assert_eq!(
            lines,
            vec![
                "# Sprint 4 Feedback",
                "",
                "*Compiled from 12 student retrospectives*",
                "",
                "---",
            ]
        );
    }

    #[test]
    fn test_ranking_is_by_count_then_declaration_order() {
        let categorized = CategorizedFeedback {
            buckets: vec![
                bucket("First", &["first category feedback that is long enough"]),
                bucket("Empty", &[]),
                bucket(
                    "Second",
                    &[
                        "second category feedback number one here",
                        "second category feedback number two here",
                    ],
                ),
                bucket("Third", &["third category feedback that is long enough"]),
            ],
        };
        let headings: Vec<String> = render(&categorized, "T", 3)
            .into_iter()
            .filter(|l| l.starts_with("## "))
            .collect();
        assert_eq!(
            headings,
            vec!["## Second (2 mentions)", "## First (1 mentions)", "## Third (1 mentions)"]
        );
    }

    #[test]
    fn test_count_includes_items_hidden_by_length_filter() {
        let categorized = CategorizedFeedback {
            buckets: vec![bucket(
                "Communication",
                &[
                    "Instructions were unclear",
                    "1. The assignment instructions were unclear and changed often",
                    "1. The assignment   instructions were unclear and changed OFTEN",
                ],
            )],
        };
        let lines = render(&categorized, "T", 1);
        let section: Vec<&str> = lines[5..].iter().map(String::as_str).collect();
        assert_eq!(
            section,
            vec![
                "",
                "## Communication (3 mentions)",
                "",
                "- The assignment instructions were unclear and changed often",
            ]
        );
    }

    #[test]
    fn test_at_most_ten_unique_items() {
        let texts: Vec<String> = (0..15)
            .map(|i| format!("Distinct feedback item number {i} about scope"))
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let categorized = CategorizedFeedback {
            buckets: vec![bucket("Tickets/Jira Issues", &refs)],
        };
        let lines = render(&categorized, "T", 1);
        assert!(lines.contains(&"## Tickets/Jira Issues (15 mentions)".to_string()));
        assert_eq!(lines.iter().filter(|l| l.starts_with("- ")).count(), 10);
        assert!(lines.contains(&"- Distinct feedback item number 9 about scope".to_string()));
        assert!(!lines.contains(&"- Distinct feedback item number 10 about scope".to_string()));
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("feedback.md");
        write_summary(&path, &["# Title".to_string(), String::new(), "---".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Title\n\n---\n");
    }

    #[test]
    fn test_write_summary_under_a_file_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("results");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = write_summary(&blocker.join("feedback.md"), &["# Title".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::Write { ref path, .. } if path.ends_with("feedback.md")));
    }
}
