//! Compiles scan config documents (YAML or JSON) into a validated [`Config`]:
//! ordered build scripts, bootstrap files and include/exclude filter rules.

pub mod app;

pub use app::compiler::compile;
pub use app::config::{load_config, parse_document, Format};
pub use app::error::{ConfigError, ConfigurationError, NameError};
pub use app::filter::{parse_name, parse_namespace, FilterRule, FilterRuleSet, QualifiedName, Scope};
pub use app::models::{Config, ScriptDescriptor, ScriptType, DEFAULT_BOOTSTRAP};
