/// Five-point rubric for the Discord/GitHub setup assignment.
///
/// - 1 point: file named `[lastname]-[firstname].json`
/// - 1 point: file parses as JSON
/// - 1 point: key set is exactly [`REQUIRED_KEYS`] (case-sensitive)
/// - 2 points: every required value is supplied (1 point if only one or two are empty)
///
/// Scoring stops after a parse failure; the filename point still counts.
use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;

use crate::model::{SubmissionGrade, REQUIRED_KEYS};

const PERFECT: &str = "Perfect!";
const MAX_EMPTY_FOR_PARTIAL: usize = 2;

pub fn grade_submission(path: &Path) -> SubmissionGrade {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut grade = SubmissionGrade {
        filename,
        ..Default::default()
    };
    let mut feedback: Vec<String> = Vec::new();
    let mut points: u8 = 0;

    match validate_filename(path) {
        Ok(()) => points += 1,
        Err(msg) => feedback.push(format!("Filename: {msg}")),
    }

    let data = match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Value>(&content) {
            Ok(data) => data,
            Err(e) => {
                feedback.push(format!("Invalid JSON: {e}"));
                return finish(grade, points, feedback);
            }
        },
        Err(e) => {
            feedback.push(format!("Error reading file: {e}"));
            return finish(grade, points, feedback);
        }
    };
    points += 1;

    match validate_keys(&data) {
        Ok(()) => points += 1,
        Err(msg) => feedback.push(format!("Keys: {msg}")),
    }

    let (value_points, value_feedback) = score_values(&data);
    points += value_points;
    if let Some(msg) = value_feedback {
        feedback.push(format!("Values: {msg}"));
    }

    grade.name = field_text(&data, "name");
    grade.ucid = field_text(&data, "ucid");
    grade.discord_id = field_text(&data, "discordId");
    grade.github_id = field_text(&data, "githubId");

    finish(grade, points, feedback)
}

fn finish(mut grade: SubmissionGrade, points: u8, feedback: Vec<String>) -> SubmissionGrade {
    grade.score = points;
    grade.feedback = if feedback.is_empty() {
        PERFECT.to_string()
    } else {
        feedback.join("; ")
    };
    grade
}

/// The file stem must be `lastname-firstname`: exactly one dash, both sides non-empty.
pub fn validate_filename(path: &Path) -> Result<(), String> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    if !stem.contains('-') {
        return Err("Filename does not follow [lastname]-[firstname] pattern".to_string());
    }
    let parts: Vec<&str> = stem.split('-').collect();
    if parts.len() != 2 {
        return Err(
            "Filename should have exactly one dash between lastname and firstname".to_string(),
        );
    }
    if parts[0].is_empty() || parts[1].is_empty() {
        return Err("Both lastname and firstname must be provided".to_string());
    }
    Ok(())
}

pub fn validate_keys(data: &Value) -> Result<(), String> {
    let Some(object) = data.as_object() else {
        return Err("Top-level value must be a JSON object".to_string());
    };

    let required: BTreeSet<&str> = REQUIRED_KEYS.into_iter().collect();
    let actual: BTreeSet<&str> = object.keys().map(String::as_str).collect();
    if actual == required {
        return Ok(());
    }

    let mut parts = Vec::new();
    let missing: Vec<&str> = required.difference(&actual).copied().collect();
    if !missing.is_empty() {
        parts.push(format!("Missing keys: {}", missing.join(", ")));
    }
    let extra: Vec<&str> = actual.difference(&required).copied().collect();
    if !extra.is_empty() {
        parts.push(format!("Extra keys: {}", extra.join(", ")));
    }
    Err(parts.join("; "))
}

/// Points for supplied values (0..=2) and a note naming the empty fields, if any.
pub fn score_values(data: &Value) -> (u8, Option<String>) {
    let empty: Vec<&str> = REQUIRED_KEYS
        .into_iter()
        .filter(|key| is_empty_value(data.get(*key)))
        .collect();

    if empty.is_empty() {
        return (2, None);
    }
    let note = format!("Empty or missing values: {}", empty.join(", "));
    if empty.len() <= MAX_EMPTY_FOR_PARTIAL {
        (1, Some(note))
    } else {
        (0, Some(note))
    }
}

/// Missing, null, false, zero, blank strings, and empty containers all count as empty.
fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

fn field_text(data: &Value, key: &str) -> String {
    match data.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename(Path::new("doe-jane.json")).is_ok());
        assert_eq!(
            validate_filename(Path::new("doejane.json")).unwrap_err(),
            "Filename does not follow [lastname]-[firstname] pattern"
        );
        assert_eq!(
            validate_filename(Path::new("van-der-berg.json")).unwrap_err(),
            "Filename should have exactly one dash between lastname and firstname"
        );
        assert_eq!(
            validate_filename(Path::new("-jane.json")).unwrap_err(),
            "Both lastname and firstname must be provided"
        );
    }

    #[test]
    fn test_validate_keys_reports_missing_and_extra_sorted() {
        let data = json!({"name": "A", "ucid": "b", "githubid": "g", "email": "e"});
        assert_eq!(
            validate_keys(&data).unwrap_err(),
            "Missing keys: discordId, githubId; Extra keys: email, githubid"
        );
        assert!(validate_keys(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_score_values() {
        let full = json!({"name": "A", "ucid": "b1", "discordId": "d", "githubId": "g"});
        assert_eq!(score_values(&full), (2, None));

        let two_empty = json!({"name": " ", "ucid": "b1", "discordId": null, "githubId": "g"});
        assert_eq!(
            score_values(&two_empty),
            (1, Some("Empty or missing values: name, discordId".to_string()))
        );

        let three_empty = json!({"name": "", "ucid": 0, "githubId": "g"});
        assert_eq!(score_values(&three_empty).0, 0);
    }

    #[test]
    fn test_one_empty_field_scores_four() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "doe-jane.json",
            r#"{"name":"A","ucid":"b1","discordId":"","githubId":"g"}"#,
        );
        let grade = grade_submission(&path);
        assert_eq!(grade.score, 4);
        assert_eq!(grade.feedback, "Values: Empty or missing values: discordId");
        assert_eq!(grade.name, "A");
        assert_eq!(grade.github_id, "g");
        assert_eq!(grade.discord_id, "");
    }

    #[test]
    fn test_perfect_submission() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "smith-alex.json",
            r#"{"name":" Alex Smith ","ucid":"as12","discordId":"alex#1","githubId":"asmith"}"#,
        );
        let grade = grade_submission(&path);
        assert_eq!(grade.score, 5);
        assert_eq!(grade.feedback, "Perfect!");
        assert_eq!(grade.name, "Alex Smith");
    }

    #[test]
    fn test_invalid_json_stops_scoring() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "smith.json", r#"{"name": "A",}"#);
        let grade = grade_submission(&path);
        assert_eq!(grade.score, 0);
        assert!(grade.feedback.starts_with(
            "Filename: Filename does not follow [lastname]-[firstname] pattern; Invalid JSON: "
        ));
    }

    #[test]
    fn test_non_object_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "doe-jane.json", r#"["A", "b1"]"#);
        let grade = grade_submission(&path);
        assert_eq!(grade.score, 2);
        assert_eq!(
            grade.feedback,
            "Keys: Top-level value must be a JSON object; \
             Values: Empty or missing values: name, ucid, discordId, githubId"
        );
    }
}
