/// Keyword bucketing of feedback spans into themes.
///
/// Categories are checked in declaration order and the first one with a keyword
/// contained in the (lower-cased) span wins. Spans matching nothing go to "Other".
use crate::model::{Bucket, CategorizedFeedback, Category, FeedbackSpan};

pub const OTHER_LABEL: &str = "Other";

pub const CATEGORIES: &[Category] = &[
    Category {
        label: "Tickets/Jira Issues",
        keywords: &[
            "ticket",
            "jira",
            "requirements",
            "scope",
            "contradictory",
            "redundant",
            "workload",
            "expectations",
        ],
    },
    Category {
        label: "Deployment/Hosting",
        keywords: &[
            "deployment",
            "deploy",
            "hosting",
            "cloud",
            "ci/cd",
            "pipeline",
            "production",
        ],
    },
    Category {
        label: "Time Management/Deadlines",
        keywords: &["time", "deadline", "finals", "week", "stress", "rushed", "crunch"],
    },
    Category {
        label: "Grading/Evaluation",
        keywords: &["grading", "grade", "evaluation", "points", "credit", "fair"],
    },
    Category {
        label: "Communication",
        keywords: &["communication", "clarity", "instructions", "confusion", "unclear"],
    },
    Category {
        label: "Tools/Technology",
        keywords: &["tools", "technology", "github", "framework", "platform"],
    },
    Category {
        label: "Team Issues",
        keywords: &["team", "group", "member", "collaboration", "coordination"],
    },
    Category {
        label: "Course Structure",
        keywords: &["course", "class", "lecture", "structure", "format"],
    },
    Category {
        label: "Demo/Presentation",
        keywords: &["demo", "presentation", "showing", "display"],
    },
];

/// Label of the first category whose keywords match `text`, or "Other".
pub fn classify(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    CATEGORIES
        .iter()
        .find(|c| c.keywords.iter().any(|k| lower.contains(k)))
        .map(|c| c.label)
        .unwrap_or(OTHER_LABEL)
}

/// Assign every span to exactly one bucket, preserving input order within each bucket.
///
/// The result always holds one bucket per category followed by "Other", empty or not.
pub fn categorize(spans: &[FeedbackSpan]) -> CategorizedFeedback {
    let mut buckets: Vec<Bucket> = CATEGORIES
        .iter()
        .map(|c| c.label)
        .chain(std::iter::once(OTHER_LABEL))
        .map(|label| Bucket {
            label,
            items: Vec::new(),
        })
        .collect();

    for span in spans {
        let label = classify(&span.text);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.label == label) {
            bucket.items.push(span.clone());
        }
    }

    CategorizedFeedback { buckets }
}
