use crate::app::filter::Scope;
use crate::app::models::Config;
use anyhow::Result;

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn generate_bootstrap(config: &Config) -> String {
        let mut output = String::new();

        for entry in &config.bootstrap {
            output.push_str(&format!("    {}\n", entry));
        }

        output.trim_end().to_string()
    }

    pub fn generate_scripts(config: &Config) -> String {
        let mut output = String::new();

        for (idx, script) in config.scripts.iter().enumerate() {
            let fields = script
                .fields
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(" ");
            output.push_str(&format!(
                "    [{}] {} {}\n",
                idx,
                script.script_type.as_str(),
                fields
            ));
        }

        output.trim_end().to_string()
    }

    /// One line per rule, `+` for include and `-` for exclude.
    pub fn generate_rules(config: &Config) -> String {
        let mut output = String::new();

        for rule in config.filter.rules() {
            let marker = if rule.included { "+" } else { "-" };
            let target = match &rule.scope {
                Scope::All => "*".to_string(),
                Scope::Namespace { namespace } => format!("{}\\", namespace.join("\\")),
                Scope::Class { namespace, class } => qualified(namespace, class),
                Scope::Method {
                    namespace,
                    class,
                    method,
                } => format!("{}::{}", qualified(namespace, class), method),
            };
            output.push_str(&format!("    {} {}\n", marker, target));
        }

        output.trim_end().to_string()
    }

    pub fn format_summary(config: &Config) -> String {
        let mut out = format!("cwd: {}\n", config.cwd.display());

        out.push_str("bootstrap:\n");
        out.push_str(&Self::generate_bootstrap(config));

        if !config.scripts.is_empty() {
            out.push_str("\nscripts:\n");
            out.push_str(&Self::generate_scripts(config));
        }

        if !config.filter.is_empty() {
            out.push_str("\nscan:\n");
            out.push_str(&Self::generate_rules(config));
        }

        out
    }

    pub fn format_json(config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(config)?)
    }
}

fn qualified(namespace: &[String], class: &str) -> String {
    if namespace.is_empty() {
        class.to_string()
    } else {
        format!("{}\\{}", namespace.join("\\"), class)
    }
}
