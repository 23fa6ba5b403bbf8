use crate::app::filter::FilterRuleSet;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Files preloaded before scanning when the document does not name its own.
pub const DEFAULT_BOOTSTRAP: &[&str] = &["vendor/autoload.php"];

/// The compiled configuration handed to the scan engine and script executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub cwd: PathBuf,
    pub scripts: Vec<ScriptDescriptor>,
    pub bootstrap: Vec<String>,
    pub filter: FilterRuleSet,
}

impl Config {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            scripts: Vec::new(),
            bootstrap: DEFAULT_BOOTSTRAP.iter().map(|s| s.to_string()).collect(),
            filter: FilterRuleSet::new(),
        }
    }

    /// Bootstrap entries resolved against `cwd`.
    pub fn bootstrap_paths(&self) -> Vec<PathBuf> {
        self.bootstrap
            .iter()
            .map(|entry| resolve(&self.cwd, entry))
            .collect()
    }
}

fn resolve(cwd: &Path, entry: &str) -> PathBuf {
    let path = Path::new(entry);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    Php,
    Shell,
}

impl ScriptType {
    pub(crate) fn parse(token: &str) -> Option<Self> {
        match token {
            "php" => Some(ScriptType::Php),
            "shell" => Some(ScriptType::Shell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptType::Php => "php",
            ScriptType::Shell => "shell",
        }
    }
}

/// A declared build-time script. Everything except `type` is forwarded to the
/// executor untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptDescriptor {
    #[serde(rename = "type")]
    pub script_type: ScriptType,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ScriptDescriptor {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}
