//! Scan filter rules: an ordered list of include/exclude decisions keyed by
//! namespace, class or method path.
//!
//! The compiler is the only writer. Consumers read the rules in declaration
//! order and let later, narrower rules override earlier ones.

use crate::app::error::NameError;
use serde::Serialize;

const SEPARATORS: [char; 2] = ['\\', '.'];
const MEMBER_SEPARATOR: &str = "::";

/// What a single rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Scope {
    All,
    Namespace {
        namespace: Vec<String>,
    },
    Class {
        namespace: Vec<String>,
        class: String,
    },
    Method {
        namespace: Vec<String>,
        class: String,
        method: String,
    },
}

impl Scope {
    /// Flattened selector path, or `None` for the catch-all.
    pub fn parts(&self) -> Option<Vec<&str>> {
        match self {
            Scope::All => None,
            Scope::Namespace { namespace } => Some(namespace.iter().map(String::as_str).collect()),
            Scope::Class { namespace, class } => {
                let mut parts: Vec<&str> = namespace.iter().map(String::as_str).collect();
                parts.push(class);
                Some(parts)
            }
            Scope::Method {
                namespace,
                class,
                method,
            } => {
                let mut parts: Vec<&str> = namespace.iter().map(String::as_str).collect();
                parts.push(class);
                parts.push(method);
                Some(parts)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterRule {
    pub included: bool,
    pub scope: Scope,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterRuleSet {
    rules: Vec<FilterRule>,
}

impl FilterRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule. Names are not checked here; that is the caller's job.
    ///
    /// The target is a [`Scope`] rather than a nullable list of path parts:
    /// [`Scope::All`] is the catch-all, and [`Scope::parts`] gives the flat path.
    pub fn add(&mut self, included: bool, scope: Scope) {
        self.rules.push(FilterRule { included, scope });
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A fully qualified name split into its namespace, leaf and optional member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub namespace: Vec<String>,
    pub name: String,
    pub member: Option<String>,
}

/// Splits `App\Service\Mailer::send` (or `App.Service.Mailer::send`) into
/// `(["App", "Service"], "Mailer", Some("send"))`.
pub fn parse_name(raw: &str) -> Result<QualifiedName, NameError> {
    let (path, member) = match raw.split_once(MEMBER_SEPARATOR) {
        Some((path, member)) => {
            let member = member.trim();
            if member.is_empty() {
                return Err(NameError::EmptyMember(raw.to_string()));
            }
            if member.contains(MEMBER_SEPARATOR) {
                return Err(NameError::NestedMember(raw.to_string()));
            }
            (path, Some(member.to_string()))
        }
        None => (raw, None),
    };

    let mut segments = split_segments(path, raw)?;
    // split_segments never returns an empty list
    let name = segments.pop().ok_or(NameError::Empty)?;

    Ok(QualifiedName {
        namespace: segments,
        name,
        member,
    })
}

/// Splits a namespace selector into its segments.
pub fn parse_namespace(raw: &str) -> Result<Vec<String>, NameError> {
    split_segments(raw, raw)
}

fn split_segments(path: &str, raw: &str) -> Result<Vec<String>, NameError> {
    let trimmed = path.trim().trim_matches(SEPARATORS.as_slice());
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }

    trimmed
        .split(SEPARATORS.as_slice())
        .map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                Err(NameError::EmptySegment(raw.to_string()))
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}
