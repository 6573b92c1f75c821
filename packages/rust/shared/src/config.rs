//! Application configuration for qaextract.
//!
//! User config lives at `~/.qaextract/qaextract.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QaExtractError, Result};
use crate::types::DEFAULT_SYSTEM_PROMPT;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "qaextract.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".qaextract";

// ---------------------------------------------------------------------------
// Config structs (matching qaextract.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output file settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Input discovery settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Record content settings.
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name written next to the input.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

fn default_file_name() -> String {
    "fine_tune_data.jsonl".into()
}

/// `[input]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Extensions (without the dot) treated as text files in directory mode.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["txt".into(), "text".into()]
}

/// `[prompt]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Content of the system turn in every record.
    #[serde(default = "default_system_prompt")]
    pub system: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system: default_system_prompt(),
        }
    }
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

// ---------------------------------------------------------------------------
// Convert config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime settings for one `convert` run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// File or directory to read.
    pub input: PathBuf,
    /// Output file name, placed in the input's folder.
    pub output_file_name: String,
    /// Recognized text-file extensions, lowercase, without the dot.
    pub extensions: Vec<String>,
    /// System turn content.
    pub system_prompt: String,
}

impl ConvertConfig {
    /// Build from the loaded app config for the given input path.
    pub fn new(input: impl Into<PathBuf>, config: &AppConfig) -> Self {
        Self {
            input: input.into(),
            output_file_name: config.output.file_name.clone(),
            extensions: config
                .input
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            system_prompt: config.prompt.system.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.qaextract/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| QaExtractError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.qaextract/qaextract.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QaExtractError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        QaExtractError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| QaExtractError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| QaExtractError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| QaExtractError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject configs that cannot produce a usable run.
fn validate_config(config: &AppConfig) -> Result<()> {
    let name = config.output.file_name.trim();
    if name.is_empty() {
        return Err(QaExtractError::config("output.file_name must not be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(QaExtractError::config(format!(
            "output.file_name must be a bare file name, got '{name}'"
        )));
    }
    if config.input.extensions.is_empty() {
        return Err(QaExtractError::config("input.extensions must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("fine_tune_data.jsonl"));
        assert!(toml_str.contains("extensions"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.output.file_name, "fine_tune_data.jsonl");
        assert_eq!(parsed.prompt.system, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[input]
extensions = [".TXT", "md"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.output.file_name, "fine_tune_data.jsonl");

        let convert = ConvertConfig::new("notes", &config);
        assert_eq!(convert.extensions, vec!["txt", "md"]);
        assert_eq!(convert.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn file_name_with_separator_is_rejected() {
        let mut config = AppConfig::default();
        config.output.file_name = "out/data.jsonl".into();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("bare file name"));
    }

    #[test]
    fn empty_extension_list_is_rejected() {
        let mut config = AppConfig::default();
        config.input.extensions.clear();
        assert!(validate_config(&config).is_err());
    }
}
