//! Identifier mapping
//!
//! Turns dotted convention keys into target-language identifiers and keeps
//! track of which identifiers a scope has already handed out. Collisions are
//! reported, never renamed around.

use std::collections::HashMap;

use crate::error::{CodegenError, CodegenResult};
use crate::model::root_segment;

// ── Key → identifier ─────────────────────────────────────────────────────────

/// Upper-case a dotted key into a constant name.
///
/// # Examples
/// ```
/// # use semconv_codegen::naming::to_const_name;
/// assert_eq!(to_const_name("first.attr_one_a"), "FIRST_ATTR_ONE_A");
/// assert_eq!(to_const_name("http.response.status-code"), "HTTP_RESPONSE_STATUS_CODE");
/// ```
pub fn to_const_name(key: &str) -> String {
    key.split('.')
        .map(|segment| segment.to_uppercase().replace('-', "_"))
        .collect::<Vec<_>>()
        .join("_")
}

/// Maps keys to constant identifiers for one emission unit.
///
/// A mapper created with [`IdentifierMapper::scoped`] drops the leading key
/// segment when it equals the scope segment the unit already encodes.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMapper {
    scope_segment: Option<String>,
}

impl IdentifierMapper {
    /// Keep every key segment.
    pub fn unscoped() -> Self {
        Self::default()
    }

    /// Drop `segment` when it leads a key.
    pub fn scoped(segment: impl Into<String>) -> Self {
        Self {
            scope_segment: Some(segment.into()),
        }
    }

    /// Map a dotted key to its constant identifier.
    ///
    /// Fails with `InvalidNamespace` when the key has no root segment.
    pub fn map(&self, key: &str) -> CodegenResult<String> {
        if root_segment(key).is_empty() {
            return Err(CodegenError::invalid_namespace(key));
        }
        let effective = match self.scope_segment.as_deref() {
            Some(scope) => key
                .strip_prefix(scope)
                .and_then(|rest| rest.strip_prefix('.'))
                .filter(|rest| !rest.is_empty())
                .unwrap_or(key),
            None => key,
        };
        Ok(to_const_name(effective))
    }
}

// ── Collision tracking ───────────────────────────────────────────────────────

/// Outcome of claiming an identifier in a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// First time the identifier is seen.
    New,
    /// The same source key already claimed it; emit nothing new.
    Duplicate,
}

/// Set of identifiers handed out within one scope.
#[derive(Debug, Clone)]
pub struct IdentifierScope {
    name: String,
    owners: HashMap<String, String>,
}

impl IdentifierScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owners: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Claim `identifier` on behalf of `source` (the key it came from).
    pub fn claim(&mut self, identifier: &str, source: &str) -> CodegenResult<Claim> {
        match self.owners.get(identifier) {
            Some(owner) if owner == source => Ok(Claim::Duplicate),
            Some(owner) => Err(CodegenError::collision(
                &self.name, identifier, owner, source,
            )),
            None => {
                self.owners
                    .insert(identifier.to_string(), source.to_string());
                Ok(Claim::New)
            }
        }
    }
}

// ── Case helpers ──────────────────────────────────────────────────────────────

/// Convert a dotted, kebab-case, snake_case or SCREAMING_SNAKE string to
/// PascalCase.
///
/// # Examples
/// ```
/// # use semconv_codegen::naming::to_pascal_case;
/// assert_eq!(to_pascal_case("first"), "First");
/// assert_eq!(to_pascal_case("second_group"), "SecondGroup");
/// assert_eq!(to_pascal_case("http.server-request"), "HttpServerRequest");
/// assert_eq!(to_pascal_case("FIFTH_ATTR_FIVE_STRING"), "FifthAttrFiveString");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['.', '-', '_'])
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    let upper: String = first.to_uppercase().collect();
                    upper + &chars.as_str().to_lowercase()
                }
            }
        })
        .collect()
}

/// Convert a PascalCase string to snake_case. A run of capitals is one
/// word, so an acronym stays together.
///
/// # Examples
/// ```
/// # use semconv_codegen::naming::to_snake_case;
/// assert_eq!(to_snake_case("FirstAttributes"), "first_attributes");
/// assert_eq!(to_snake_case("Http2Attributes"), "http2_attributes");
/// assert_eq!(to_snake_case("HTTPAttributes"), "http_attributes");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_lower);
            if boundary {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// Trim a brief and drop a single trailing period.
pub fn to_doc_brief(brief: &str) -> String {
    let trimmed = brief.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}
