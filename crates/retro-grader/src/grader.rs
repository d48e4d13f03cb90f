/// Retrospective grading via a chat-completions model.
///
/// The model is asked for a JSON object; the reply is accepted bare or wrapped in a
/// markdown code fence. Anything that does not deserialize into a [`GradeResult`] with a
/// score in 0..=5 is an error carrying the raw reply, and is never retried or defaulted.
use serde::Deserialize;
use tracing::debug;

use retro_common::completion::{CompletionClient, CompletionRequest};

use crate::config::TEXT_PLACEHOLDER;
use crate::error::AppError;
use crate::model::{GradeResult, RUBRIC_CRITERIA};

const TEMPERATURE: f32 = 0.2;
const MAX_SCORE: i64 = 5;

/// Grade one retrospective.
///
/// `template` is a prompt with a single `{text}` placeholder; `None` uses the built-in
/// rubric prompt.
pub async fn evaluate(
    client: &CompletionClient,
    model: &str,
    text: &str,
    template: Option<&str>,
) -> Result<GradeResult, AppError> {
    let prompt = build_prompt(text, template);
    let completion = client
        .complete(CompletionRequest {
            model,
            prompt: &prompt,
            temperature: TEMPERATURE,
        })
        .await?;
    if let Some(usage) = completion.usage {
        debug!(
            model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "grading call complete"
        );
    }

    parse_grade(&completion.content)
}

/// The prompt sent for `text`: the template with its placeholder filled, or the rubric prompt.
pub fn build_prompt(text: &str, template: Option<&str>) -> String {
    match template {
        Some(t) => t.replacen(TEXT_PLACEHOLDER, text, 1),
        None => rubric_prompt(text),
    }
}

/// Built-in prompt describing the five-point rubric.
pub fn rubric_prompt(text: &str) -> String {
    let rubric: String = RUBRIC_CRITERIA
        .iter()
        .map(|c| format!("1 point: {c}\n"))
        .collect();
    let keys: String = RUBRIC_CRITERIA
        .iter()
        .map(|c| format!("  - \"{c}\"\n"))
        .collect();

    format!(
        "You are grading a student's sprint retrospective. The grading rubric is:\n\n\
         {rubric}\n\
         Analyze the text below and return a JSON object with the following keys:\n\
         - student_name (string)\n\
         - score (integer from 0 to 5)\n\
         - breakdown (object with one sentence for each of these criteria, keyed by name):\n\
         {keys}\n\
         Text:\n{text}\n"
    )
}

#[derive(Debug, Deserialize)]
struct RawGrade {
    #[serde(default)]
    student_name: String,
    score: i64,
    #[serde(default)]
    breakdown: std::collections::BTreeMap<String, String>,
}

/// Parse the model's reply into a grade.
pub fn parse_grade(content: &str) -> Result<GradeResult, AppError> {
    let body = strip_code_fence(content);
    let raw: RawGrade = serde_json::from_str(body).map_err(|source| AppError::ResponseParse {
        source,
        raw: content.to_string(),
    })?;

    if !(0..=MAX_SCORE).contains(&raw.score) {
        return Err(AppError::ScoreOutOfRange {
            score: raw.score,
            raw: content.to_string(),
        });
    }

    Ok(GradeResult {
        student_name: raw.student_name.trim().to_string(),
        score: raw.score as u8,
        breakdown: raw.breakdown,
    })
}

/// Remove a surrounding markdown code fence (```` ``` ```` or ```` ```json ````), if any.
///
/// Leading prose before the fence is skipped when the reply does not start with `{`. The
/// closing fence is the last one in the reply, so fences quoted inside JSON strings survive.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if trimmed.starts_with('{') {
        return trimmed;
    }
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };

    let after = trimmed[open + 3..]
        .trim_start_matches([' ', '\t'])
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    match after.rfind("```") {
        Some(end) => after[..end].trim(),
        None => after.trim(),
    }
}
