//! Loader for operator-supplied YAML prompt definitions.

use crate::types::PromptDefinition;
use driverag_core::{AppError, AppResult};
use std::path::Path;

/// Load and validate a prompt definition from a YAML file.
///
/// # Example
/// ```no_run
/// use driverag_prompt::load_prompt_file;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt_file(Path::new(".driverag/prompts/answer.yml"))?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt_file(path: &Path) -> AppResult<PromptDefinition> {
    tracing::debug!("Loading prompt from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    let mut parts = def.api_version.split('.');
    let well_formed = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(major), Some(minor), None)
            if !major.is_empty()
                && !minor.is_empty()
                && major.chars().all(|c| c.is_ascii_digit())
                && minor.chars().all(|c| c.is_ascii_digit())
    );
    if !well_formed {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, api_version: &str, template: &str) -> PathBuf {
        let content = format!(
            "id: answer.terse\ntitle: \"Terse answer\"\napiVersion: \"{}\"\ntemplate: \"{}\"\n",
            api_version, template
        );
        let path = dir.join("answer.yml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_prompt(temp_dir.path(), "1.0", "{{context}} -> {{question}}");

        let prompt = load_prompt_file(&path).unwrap();
        assert_eq!(prompt.id, "answer.terse");
        assert_eq!(prompt.title, "Terse answer");
        assert_eq!(prompt.template, "{{context}} -> {{question}}");
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt_file(&temp_dir.path().join("missing.yml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.yml");
        fs::write(&path, "invalid: yaml: content:").unwrap();
        assert!(load_prompt_file(&path).is_err());
    }

    #[test]
    fn test_reject_bad_api_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_prompt(temp_dir.path(), "v1", "{{question}}");
        assert!(load_prompt_file(&path).is_err());
    }

    #[test]
    fn test_reject_blank_template() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_prompt(temp_dir.path(), "1.0", "   ");
        assert!(load_prompt_file(&path).is_err());
    }
}
