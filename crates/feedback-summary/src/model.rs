/// A feedback excerpt pulled out of one retrospective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSpan {
    /// Span lines joined with single spaces and trimmed. Always longer than 20 characters.
    pub text: String,
    /// File name of the source document, when known.
    pub source: Option<String>,
}

impl FeedbackSpan {
    #[cfg(test)]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }
}

/// A theme bucket and the keywords that route feedback into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

/// Feedback of one category, in the order it was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: &'static str,
    pub items: Vec<FeedbackSpan>,
}

/// Buckets for every category plus "Other", in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedFeedback {
    pub buckets: Vec<Bucket>,
}

impl CategorizedFeedback {
    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.label == label)
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.items.len()).sum()
    }
}
