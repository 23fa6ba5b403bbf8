use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while turning a config file into a [`Config`](crate::app::models::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported config format '{0}' (expected yaml, yml or json)")]
    UnsupportedFormat(String),
    #[error("Failed to read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}

/// Every problem found in one compile pass, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Configuration failed:{}", render_problems(.problems))]
pub struct ConfigurationError {
    problems: Vec<String>,
}

impl ConfigurationError {
    pub fn new(problems: Vec<String>) -> Self {
        Self { problems }
    }

    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

fn render_problems(problems: &[String]) -> String {
    problems
        .iter()
        .map(|problem| format!("\n - {}", problem))
        .collect()
}

/// A fully qualified name that could not be split into namespace and leaf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("'{0}' contains an empty segment")]
    EmptySegment(String),
    #[error("'{0}' has an empty member after '::'")]
    EmptyMember(String),
    #[error("'{0}' has more than one '::'")]
    NestedMember(String),
}
