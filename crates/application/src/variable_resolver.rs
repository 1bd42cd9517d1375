//! `{{KEY}}` substitution against the environment.
//!
//! References are found by a single left-to-right scan. A reference whose
//! key is not defined is left in the output exactly as written.

use std::ops::Range;

use postbox_domain::Environment;

/// A `{{name}}` reference found in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The key, trimmed, without the braces.
    pub name: String,

    /// Byte range of the whole `{{...}}` in the input.
    pub span: Range<usize>,
}

/// Finds every `{{name}}` reference in `input`.
///
/// Empty references (`{{}}`, `{{  }}`) are skipped. An opening `{{` with no
/// closing `}}` ends the scan.
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find("{{") {
        let start = cursor + offset;
        let inner_start = start + 2;
        let Some(close) = input[inner_start..].find("}}") else {
            break;
        };
        let end = inner_start + close + 2;
        let name = input[inner_start..inner_start + close].trim();
        if !name.is_empty() {
            references.push(VariableReference {
                name: name.to_string(),
                span: start..end,
            });
        }
        cursor = end;
    }

    references
}

/// Substitutes every defined reference in `input`.
#[must_use]
pub fn resolve(input: &str, environment: &Environment) -> String {
    let references = parse_variables(input);
    if references.is_empty() {
        return input.to_string();
    }

    let mut result = String::with_capacity(input.len());
    let mut last_end = 0;
    for reference in &references {
        result.push_str(&input[last_end..reference.span.start]);
        match environment.get(&reference.name) {
            Some(value) => result.push_str(value),
            None => result.push_str(&input[reference.span.clone()]),
        }
        last_end = reference.span.end;
    }
    result.push_str(&input[last_end..]);
    result
}
