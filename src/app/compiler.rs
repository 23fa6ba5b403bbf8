//! Validates a decoded config document and builds a [`Config`] from it.
//!
//! Every section is checked even when an earlier one failed, so a single run
//! reports every problem. Invalid script and scan entries are skipped and
//! recorded; any recorded problem fails the whole compile.

use crate::app::error::ConfigurationError;
use crate::app::filter::{parse_name, parse_namespace, FilterRuleSet, Scope};
use crate::app::models::{Config, ScriptDescriptor, ScriptType};
use serde_json::{Map, Value};
use std::path::PathBuf;

const KNOWN_KEYS: [&str; 3] = ["scripts", "scan", "bootstrap"];
const BOOTSTRAP_INVALID: &str = "'bootstrap' must be a list of scripts or single script";

/// Compiles a decoded document. `cwd` is carried into the result as-is.
pub fn compile(raw: &Value, cwd: impl Into<PathBuf>) -> Result<Config, ConfigurationError> {
    let mut config = Config::new(cwd);
    let mut problems = Problems::default();

    let empty = Map::new();
    let document = match raw {
        Value::Null => &empty,
        Value::Object(map) => map,
        _ => {
            problems.push("Config root must be a mapping");
            return problems.finish(config);
        }
    };

    check_keys(document, &mut problems);

    if let Some(bootstrap) = present(document, "bootstrap") {
        match compile_bootstrap(bootstrap) {
            Some(list) => config.bootstrap = list,
            None => problems.push(BOOTSTRAP_INVALID),
        }
    }

    if let Some(scripts) = present(document, "scripts") {
        compile_scripts(scripts, &mut config.scripts, &mut problems);
    }

    if let Some(scan) = present(document, "scan") {
        compile_scan(scan, &mut config.filter, &mut problems);
    }

    log::debug!(
        "Compiled config: {} scripts, {} bootstrap files, {} filter rules, {} problems",
        config.scripts.len(),
        config.bootstrap.len(),
        config.filter.len(),
        problems.0.len()
    );

    problems.finish(config)
}

#[derive(Default)]
struct Problems(Vec<String>);

impl Problems {
    fn push(&mut self, problem: impl Into<String>) {
        self.0.push(problem.into());
    }

    fn finish(self, config: Config) -> Result<Config, ConfigurationError> {
        if self.0.is_empty() {
            Ok(config)
        } else {
            Err(ConfigurationError::new(self.0))
        }
    }
}

/// A key counts as present only when it holds a non-null value.
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

fn check_keys(document: &Map<String, Value>, problems: &mut Problems) {
    let unknown: Vec<&str> = document
        .keys()
        .map(String::as_str)
        .filter(|key| !KNOWN_KEYS.contains(key))
        .collect();
    if !unknown.is_empty() {
        problems.push(format!("Unknown config keys: {}", unknown.join(", ")));
    }
}

fn compile_bootstrap(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(script) => Some(vec![script.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

fn compile_scripts(value: &Value, scripts: &mut Vec<ScriptDescriptor>, problems: &mut Problems) {
    let Some(entries) = value.as_array() else {
        problems.push("'scripts' must be a list");
        return;
    };

    for (idx, entry) in entries.iter().enumerate() {
        let Some((fields, script_type)) = entry
            .as_object()
            .and_then(|fields| present(fields, "type").map(|t| (fields, t)))
        else {
            problems.push(format!("Script at index {} invalid", idx));
            continue;
        };

        let Some(script_type) = script_type.as_str().and_then(ScriptType::parse) else {
            problems.push(format!("Unknown script type at index {}", idx));
            continue;
        };

        let mut fields = fields.clone();
        fields.remove("type");
        scripts.push(ScriptDescriptor {
            script_type,
            fields,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanDirective {
    Include,
    Exclude,
}

impl ScanDirective {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "include" => Some(ScanDirective::Include),
            "exclude" => Some(ScanDirective::Exclude),
            _ => None,
        }
    }

    fn included(self) -> bool {
        self == ScanDirective::Include
    }
}

/// The selector honored for a scan entry. Resolution order is fixed:
/// namespace, class, method, then all.
#[derive(Debug, Clone, Copy)]
enum Selector<'a> {
    Namespace(&'a Value),
    Class(&'a Value),
    Method(&'a Value),
    All,
}

impl<'a> Selector<'a> {
    fn resolve(entry: &'a Map<String, Value>) -> Option<Self> {
        if let Some(value) = present(entry, "namespace") {
            return Some(Selector::Namespace(value));
        }
        if let Some(value) = present(entry, "class") {
            return Some(Selector::Class(value));
        }
        if let Some(value) = present(entry, "method") {
            return Some(Selector::Method(value));
        }
        if present(entry, "all").is_some() {
            return Some(Selector::All);
        }
        None
    }

    fn key(&self) -> &'static str {
        match self {
            Selector::Namespace(_) => "namespace",
            Selector::Class(_) => "class",
            Selector::Method(_) => "method",
            Selector::All => "all",
        }
    }

    fn into_scope(self) -> Result<Scope, String> {
        let raw = match self {
            Selector::All => return Ok(Scope::All),
            Selector::Namespace(value) | Selector::Class(value) | Selector::Method(value) => value
                .as_str()
                .ok_or_else(|| "expected a string".to_string())?,
        };

        match self {
            Selector::Namespace(_) => {
                let namespace = parse_namespace(raw).map_err(|err| err.to_string())?;
                Ok(Scope::Namespace { namespace })
            }
            Selector::Class(_) => {
                let name = parse_name(raw).map_err(|err| err.to_string())?;
                if name.member.is_some() {
                    return Err(format!("'{}' names a member, use a method selector", raw));
                }
                Ok(Scope::Class {
                    namespace: name.namespace,
                    class: name.name,
                })
            }
            Selector::Method(_) => {
                let name = parse_name(raw).map_err(|err| err.to_string())?;
                let method = name
                    .member
                    .ok_or_else(|| format!("'{}' must have the form Class::method", raw))?;
                Ok(Scope::Method {
                    namespace: name.namespace,
                    class: name.name,
                    method,
                })
            }
            Selector::All => Ok(Scope::All),
        }
    }
}

fn compile_scan(value: &Value, filter: &mut FilterRuleSet, problems: &mut Problems) {
    let Some(entries) = value.as_array() else {
        problems.push("'scan' must be a list");
        return;
    };

    for (idx, entry) in entries.iter().enumerate() {
        let Some((fields, scan_type)) = entry
            .as_object()
            .and_then(|fields| present(fields, "type").map(|t| (fields, t)))
        else {
            problems.push(format!("Scan at index {} invalid", idx));
            continue;
        };

        // Unrecognized types are skipped without a problem.
        let Some(directive) = scan_type.as_str().and_then(ScanDirective::parse) else {
            log::debug!("Skipping scan entry {} with type {}", idx, scan_type);
            continue;
        };

        let Some(selector) = Selector::resolve(fields) else {
            problems.push(format!(
                "Unknown scan type {} at index {}",
                display_token(scan_type),
                idx
            ));
            continue;
        };

        match selector.into_scope() {
            Ok(scope) => filter.add(directive.included(), scope),
            Err(reason) => problems.push(format!(
                "Invalid {} selector at index {}: {}",
                selector.key(),
                idx,
                reason
            )),
        }
    }
}

fn display_token(value: &Value) -> String {
    match value {
        Value::String(token) => token.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn problems_of(raw: Value) -> Vec<String> {
        compile(&raw, "/work")
            .expect_err("compile should fail")
            .problems()
            .to_vec()
    }

    fn strings(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_document_yields_defaults() {
        for raw in [json!({}), Value::Null] {
            let config = compile(&raw, "/work").unwrap();
            assert_eq!(config.cwd, PathBuf::from("/work"));
            assert!(config.scripts.is_empty());
            assert_eq!(config.bootstrap, strings(&["vendor/autoload.php"]));
            assert!(config.filter.is_empty());
        }
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        assert_eq!(
            problems_of(json!(["scripts"])),
            strings(&["Config root must be a mapping"])
        );
    }

    #[test]
    fn unknown_keys_are_reported_once_in_document_order() {
        let problems = problems_of(json!({
            "zeta": 1,
            "scripts": [{"type": "ruby"}],
            "alpha": 2,
        }));
        assert_eq!(
            problems,
            strings(&[
                "Unknown config keys: zeta, alpha",
                "Unknown script type at index 0",
            ])
        );
    }

    #[test]
    fn bootstrap_string_and_list_normalize_identically() {
        let single = compile(&json!({"bootstrap": "x.php"}), "/work").unwrap();
        let list = compile(&json!({"bootstrap": ["x.php"]}), "/work").unwrap();
        assert_eq!(single.bootstrap, strings(&["x.php"]));
        assert_eq!(single.bootstrap, list.bootstrap);
    }

    #[test]
    fn bootstrap_replaces_default_wholesale() {
        let config = compile(&json!({"bootstrap": ["a.php", "b.php"]}), "/work").unwrap();
        assert_eq!(config.bootstrap, strings(&["a.php", "b.php"]));
    }

    #[test]
    fn bootstrap_with_bad_elements_reports_a_single_problem() {
        assert_eq!(
            problems_of(json!({"bootstrap": [1, "x.php", false]})),
            strings(&[BOOTSTRAP_INVALID])
        );
        assert_eq!(
            problems_of(json!({"bootstrap": {"file": "x.php"}})),
            strings(&[BOOTSTRAP_INVALID])
        );
    }

    #[test]
    fn scripts_keep_order_and_extra_fields() {
        let config = compile(
            &json!({"scripts": [
                {"type": "shell", "command": "make assets"},
                {"type": "php", "file": "build.php", "args": ["--fast"]},
            ]}),
            "/work",
        )
        .unwrap();

        assert_eq!(config.scripts.len(), 2);
        assert_eq!(config.scripts[0].script_type, ScriptType::Shell);
        assert_eq!(config.scripts[0].get("command"), Some(&json!("make assets")));
        assert_eq!(config.scripts[1].script_type, ScriptType::Php);
        assert_eq!(config.scripts[1].get("args"), Some(&json!(["--fast"])));
        assert_eq!(config.scripts[1].get("type"), None);
    }

    #[test]
    fn invalid_scripts_each_record_one_problem() {
        let problems = problems_of(json!({"scripts": [
            "make",
            {"command": "make"},
            {"type": null},
            {"type": "ruby"},
            {"type": 7},
            {"type": "php"},
        ]}));
        assert_eq!(
            problems,
            strings(&[
                "Script at index 0 invalid",
                "Script at index 1 invalid",
                "Script at index 2 invalid",
                "Unknown script type at index 3",
                "Unknown script type at index 4",
            ])
        );
    }

    #[test]
    fn non_list_sections_are_reported() {
        assert_eq!(
            problems_of(json!({"scripts": "make", "scan": {"type": "include"}})),
            strings(&["'scripts' must be a list", "'scan' must be a list"])
        );
    }

    #[test]
    fn namespace_selector_builds_namespace_rule() {
        let config = compile(
            &json!({"scan": [{"type": "include", "namespace": "App\\Service"}]}),
            "/work",
        )
        .unwrap();
        let rule = &config.filter.rules()[0];
        assert!(rule.included);
        assert_eq!(
            rule.scope,
            Scope::Namespace {
                namespace: strings(&["App", "Service"])
            }
        );
    }

    #[test]
    fn namespace_takes_precedence_over_class() {
        let config = compile(
            &json!({"scan": [{"type": "exclude", "class": "App\\Mailer", "namespace": "Vendor"}]}),
            "/work",
        )
        .unwrap();
        assert_eq!(config.filter.len(), 1);
        assert_eq!(
            config.filter.rules()[0].scope,
            Scope::Namespace {
                namespace: strings(&["Vendor"])
            }
        );
    }

    #[test]
    fn class_and_method_selectors_split_names() {
        let config = compile(
            &json!({"scan": [
                {"type": "include", "class": "App\\Mailer"},
                {"type": "exclude", "method": "App\\Mailer::send", "all": true},
            ]}),
            "/work",
        )
        .unwrap();
        assert_eq!(
            config.filter.rules()[0].scope,
            Scope::Class {
                namespace: strings(&["App"]),
                class: "Mailer".to_string()
            }
        );
        assert_eq!(
            config.filter.rules()[1].scope,
            Scope::Method {
                namespace: strings(&["App"]),
                class: "Mailer".to_string(),
                method: "send".to_string()
            }
        );
        assert!(!config.filter.rules()[1].included);
    }

    #[test]
    fn all_selector_builds_catch_all_rule() {
        let config = compile(&json!({"scan": [{"type": "exclude", "all": true}]}), "/work").unwrap();
        let rule = &config.filter.rules()[0];
        assert!(!rule.included);
        assert_eq!(rule.scope, Scope::All);
        assert_eq!(rule.scope.parts(), None);
    }

    #[test]
    fn unrecognized_scan_type_is_skipped_silently() {
        let config = compile(
            &json!({"scan": [{"type": "purge", "namespace": "App"}, {"type": 3, "all": true}]}),
            "/work",
        )
        .unwrap();
        assert!(config.filter.is_empty());
    }

    #[test]
    fn include_without_selector_is_unknown_scan_type() {
        assert_eq!(
            problems_of(json!({"scan": [
                {"type": "include", "all": true},
                {"type": "include"},
                {"type": "exclude", "all": null},
            ]})),
            strings(&[
                "Unknown scan type include at index 1",
                "Unknown scan type exclude at index 2",
            ])
        );
    }

    #[test]
    fn falsy_all_marker_still_builds_catch_all_rule() {
        let config = compile(
            &json!({"scan": [{"type": "exclude", "all": false}, {"type": "include", "all": 0}]}),
            "/work",
        )
        .unwrap();
        assert_eq!(config.filter.len(), 2);
        assert_eq!(config.filter.rules()[0].scope, Scope::All);
        assert!(!config.filter.rules()[0].included);
        assert_eq!(config.filter.rules()[1].scope, Scope::All);
        assert!(config.filter.rules()[1].included);
    }

    #[test]
    fn malformed_scan_entries_are_invalid() {
        assert_eq!(
            problems_of(json!({"scan": ["App", {"namespace": "App"}]})),
            strings(&["Scan at index 0 invalid", "Scan at index 1 invalid"])
        );
    }

    #[test]
    fn bad_selector_values_are_reported_per_entry() {
        let problems = problems_of(json!({"scan": [
            {"type": "include", "namespace": "\\\\"},
            {"type": "include", "class": ["App"]},
            {"type": "include", "class": "App\\Mailer::send"},
            {"type": "include", "method": "App\\Mailer"},
            {"type": "include", "namespace": "App"},
        ]}));
        assert_eq!(
            problems,
            strings(&[
                "Invalid namespace selector at index 0: name is empty",
                "Invalid class selector at index 1: expected a string",
                "Invalid class selector at index 2: 'App\\Mailer::send' names a member, use a method selector",
                "Invalid method selector at index 3: 'App\\Mailer' must have the form Class::method",
            ])
        );
    }

    #[test]
    fn method_with_repeated_member_separator_is_rejected() {
        assert_eq!(
            problems_of(json!({"scan": [{"type": "include", "method": "App\\A::b::c"}]})),
            strings(&["Invalid method selector at index 0: 'App\\A::b::c' has more than one '::'"])
        );
    }

    #[test]
    fn problems_are_ordered_by_section() {
        let problems = problems_of(json!({
            "scan": [{"type": "include"}],
            "scripts": [{}],
            "bootstrap": 5,
            "extra": true,
        }));
        assert_eq!(
            problems,
            strings(&[
                "Unknown config keys: extra",
                BOOTSTRAP_INVALID,
                "Script at index 0 invalid",
                "Unknown scan type include at index 0",
            ])
        );
    }

    #[test]
    fn recompiling_yields_independent_configs() {
        let raw = json!({"scan": [{"type": "include", "namespace": "App"}]});
        let first = compile(&raw, "/work").unwrap();
        let mut second = compile(&raw, "/work").unwrap();
        assert_eq!(first, second);

        second.filter.add(false, Scope::All);
        assert_eq!(first.filter.len(), 1);
        assert_eq!(second.filter.len(), 2);
    }
}
