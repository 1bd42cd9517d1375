//! Environment variable types and their `KEY=VALUE` text form

use serde::{Deserialize, Serialize};

/// A single `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    /// Variable name.
    #[serde(alias = "Key")]
    pub key: String,
    /// Variable value.
    #[serde(alias = "Value", default)]
    pub value: String,
}

impl EnvironmentVariable {
    /// Creates a new variable.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parses one `KEY=VALUE` line, splitting at the first `=`.
    ///
    /// Returns `None` for blank lines and lines without `=`.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some(Self::new(key, value))
    }
}

/// The flat, ordered set of environment variables.
///
/// Duplicate keys are allowed; every line stays independent. Lookups use
/// the last definition of a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    variables: Vec<EnvironmentVariable>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            variables: Vec::new(),
        }
    }

    /// Parses the editor text, one `KEY=VALUE` per line.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            variables: text
                .split('\n')
                .filter_map(EnvironmentVariable::parse_line)
                .collect(),
        }
    }

    /// Renders the variables back to `KEY=VALUE` lines.
    #[must_use]
    pub fn render(&self) -> String {
        self.variables
            .iter()
            .map(|v| format!("{}={}", v.key, v.value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the value of the last variable named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .rev()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    /// Returns the variables in order.
    #[must_use]
    pub fn variables(&self) -> &[EnvironmentVariable] {
        &self.variables
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if no variables are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl From<Vec<EnvironmentVariable>> for Environment {
    fn from(variables: Vec<EnvironmentVariable>) -> Self {
        Self { variables }
    }
}

impl FromIterator<EnvironmentVariable> for Environment {
    fn from_iter<I: IntoIterator<Item = EnvironmentVariable>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_skips_blank_and_malformed_lines() {
        let env = Environment::parse("HOST=localhost\n\nnot a pair\r\nTOKEN=a=b\r\n");
        assert_eq!(
            env.variables(),
            &[
                EnvironmentVariable::new("HOST", "localhost"),
                EnvironmentVariable::new("TOKEN", "a=b"),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept_and_last_wins() {
        let env = Environment::parse("A=1\nA=2");
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("A"), Some("2"));
        assert_eq!(env.get("B"), None);
    }

    #[test]
    fn test_render_matches_parse() {
        let text = "HOST=localhost\nPORT=8080";
        assert_eq!(Environment::parse(text).render(), text);
    }

    #[test]
    fn test_serializes_as_array() {
        let env: Environment = vec![EnvironmentVariable::new("K", "V")].into();
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"[{"key":"K","value":"V"}]"#);
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let env = Environment::parse("EMPTY=");
        assert_eq!(env.get("EMPTY"), Some(""));
    }
}
