use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::loader::{LoadOptions, DEFAULT_MISSING_TOKENS};
use crate::output::export::ExportOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_missing_tokens")]
    pub missing_tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_true")]
    pub write_indicators: bool,
    #[serde(default = "default_true")]
    pub write_text_report: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub delimiter: Option<String>,
    pub output_directory: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/edu-qa/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(delimiter) = overrides.delimiter {
            self.input.delimiter = delimiter;
        }
        if let Some(directory) = overrides.output_directory {
            self.output.directory = directory;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_output_dir(&self) -> PathBuf {
        expand_tilde(&self.output.directory)
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        Ok(LoadOptions {
            delimiter: self.input.delimiter_byte()?,
            missing_tokens: self.input.missing_tokens.clone(),
        })
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            write_indicators: self.output.write_indicators,
            write_text_report: self.output.write_text_report,
        }
    }

    pub fn default_template() -> String {
        let template = r#"[input]
# Single ASCII character, or "\t" / "tab" for tab-separated files.
delimiter = ","
missing_tokens = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"]

[output]
directory = "qa-output"
write_indicators = true
write_text_report = true

[logging]
# Overridden by RUST_LOG when set.
level = "info"
"#;
        template.to_string()
    }
}

impl InputConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_str() {
            "\\t" | "\t" | "tab" => Ok(b'\t'),
            other => {
                let bytes = other.as_bytes();
                if bytes.len() == 1 && bytes[0].is_ascii() {
                    Ok(bytes[0])
                } else {
                    Err(anyhow!(
                        "delimiter must be a single ASCII character, got {other:?}"
                    ))
                }
            }
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            missing_tokens: default_missing_tokens(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            write_indicators: true,
            write_text_report: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_missing_tokens() -> Vec<String> {
    DEFAULT_MISSING_TOKENS.iter().map(|t| t.to_string()).collect()
}

fn default_output_directory() -> String {
    "qa-output".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
