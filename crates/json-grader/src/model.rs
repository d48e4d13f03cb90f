use serde::Serialize;

/// Keys every submission must carry, in reporting order.
pub const REQUIRED_KEYS: [&str; 4] = ["name", "ucid", "discordId", "githubId"];

pub const MAX_SCORE: u8 = 5;

/// Graded JSON submission, one CSV row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubmissionGrade {
    pub filename: String,
    pub name: String,
    pub ucid: String,
    #[serde(rename = "discordId")]
    pub discord_id: String,
    #[serde(rename = "githubId")]
    pub github_id: String,
    pub score: u8,
    /// "; "-joined rubric notes, or "Perfect!" when nothing was deducted.
    pub feedback: String,
}
