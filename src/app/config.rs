use crate::app::compiler::compile;
use crate::app::error::ConfigError;
use crate::app::models::Config;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Document formats a config file may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        match extension {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Decodes a document. Empty input decodes to `null`, which compiles as an
/// empty mapping.
pub fn parse_document(format: Format, contents: &str) -> Result<Value, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(Value::Null);
    }

    let value = match format {
        Format::Yaml => serde_yaml::from_str::<Value>(contents)?,
        Format::Json => serde_json::from_str::<Value>(contents)?,
    };
    Ok(value)
}

/// Reads, decodes and compiles the config file at `path`.
pub fn load_config(path: &Path, cwd: &Path) -> Result<Config, ConfigError> {
    let format = Format::from_path(path)?;

    let contents =
        fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;

    log::debug!("Loading {:?} config from {}", format, path.display());
    let document = parse_document(format, &contents)?;

    Ok(compile(&document, cwd)?)
}
