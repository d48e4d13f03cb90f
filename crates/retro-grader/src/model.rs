use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The five rubric criteria, one point each.
pub const RUBRIC_CRITERIA: [&str; 5] = [
    "Overall thoughts on the sprint",
    "Personal contributions",
    "Things that went well",
    "Things that could be improved",
    "Teammate ratings",
];

/// Structured grade returned by the model for one retrospective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    #[serde(default)]
    pub student_name: String,
    /// Total score, 0..=5
    pub score: u8,
    /// One sentence per rubric criterion, keyed by the criterion label.
    #[serde(default)]
    pub breakdown: BTreeMap<String, String>,
}

impl GradeResult {
    /// Justification for `criterion`, or an empty string when the model omitted it.
    pub fn justification(&self, criterion: &str) -> &str {
        self.breakdown
            .get(criterion)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// One row of the grading report (CSV and JSON share the same shape).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRecord {
    pub filename: String,
    pub student_name: String,
    pub score: u8,
    pub overall_thoughts: String,
    pub personal_contributions: String,
    pub things_that_went_well: String,
    pub things_that_could_be_improved: String,
    pub teammate_ratings: String,
}

impl GradeRecord {
    pub fn new(filename: impl Into<String>, grade: &GradeResult) -> Self {
        let [overall, personal, went_well, improved, ratings] =
            RUBRIC_CRITERIA.map(|c| grade.justification(c).to_string());
        Self {
            filename: filename.into(),
            student_name: grade.student_name.clone(),
            score: grade.score,
            overall_thoughts: overall,
            personal_contributions: personal,
            things_that_went_well: went_well,
            things_that_could_be_improved: improved,
            teammate_ratings: ratings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_maps_breakdown_and_defaults_missing() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(
            "Things that went well".to_string(),
            "Lists finishing early.".to_string(),
        );
        breakdown.insert("Teammate ratings".to_string(), "Rates everyone 5/5.".to_string());
        let grade = GradeResult {
            student_name: "Jane Doe".to_string(),
            score: 3,
            breakdown,
        };

        let record = GradeRecord::new("doe-jane.docx", &grade);
        assert_eq!(record.filename, "doe-jane.docx");
        assert_eq!(record.student_name, "Jane Doe");
        assert_eq!(record.score, 3);
        assert_eq!(record.things_that_went_well, "Lists finishing early.");
        assert_eq!(record.teammate_ratings, "Rates everyone 5/5.");
        assert_eq!(record.overall_thoughts, "");
        assert_eq!(record.things_that_could_be_improved, "");
    }
}
