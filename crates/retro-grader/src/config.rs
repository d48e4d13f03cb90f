use std::path::Path;

use crate::error::AppError;

const DEFAULT_MODEL: &str = "gpt-4-turbo";

/// Placeholder replaced by the submission text in a prompt template file.
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Grader configuration loaded from the environment and CLI.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    /// Chat model used for grading, e.g. "gpt-4-turbo".
    pub model: String,
    /// Prompt template with a single `{text}` placeholder. `None` uses the built-in rubric prompt.
    pub prompt_template: Option<String>,
}

impl Config {
    /// Required:
    /// - `OPENAI_API_KEY`
    ///
    /// Optional:
    /// - `OPENAI_MODEL` (default: "gpt-4-turbo")
    ///
    /// `prompt_path`, when given, must point at a readable template containing `{text}` once.
    pub fn from_env(prompt_path: Option<&Path>) -> Result<Self, AppError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::Config("OPENAI_API_KEY environment variable is required".to_string())
            })?;

        let model = std::env::var("OPENAI_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let prompt_template = prompt_path.map(load_prompt_template).transpose()?;

        Ok(Self {
            api_key,
            model,
            prompt_template,
        })
    }
}

pub fn load_prompt_template(path: &Path) -> Result<String, AppError> {
    let template = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("failed to read prompt template {}: {e}", path.display()))
    })?;
    validate_template(&template).map_err(|msg| {
        AppError::Config(format!("prompt template {}: {msg}", path.display()))
    })?;
    Ok(template)
}

fn validate_template(template: &str) -> Result<(), String> {
    match template.matches(TEXT_PLACEHOLDER).count() {
        1 => Ok(()),
        0 => Err(format!("missing {TEXT_PLACEHOLDER} placeholder")),
        n => Err(format!("{TEXT_PLACEHOLDER} placeholder appears {n} times, expected once")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_template() {
        assert!(validate_template("Grade this:\n{text}\n").is_ok());
        assert!(validate_template("Grade this").is_err());
        assert!(validate_template("{text} and {text}").is_err());
    }

    #[test]
    fn test_load_prompt_template() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("prompt.txt");
        std::fs::write(&good, "Rubric...\n\nText:\n{text}").unwrap();
        assert!(load_prompt_template(&good).unwrap().ends_with("{text}"));

        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "no placeholder").unwrap();
        assert!(matches!(load_prompt_template(&bad), Err(AppError::Config(_))));

        let missing = dir.path().join("missing.txt");
        assert!(matches!(load_prompt_template(&missing), Err(AppError::Config(_))));
    }
}
