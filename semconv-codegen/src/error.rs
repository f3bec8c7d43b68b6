//! Error types for plan generation
//!
//! Every failure is structural: it is found during the grouping/mapping
//! pass, aborts the whole run, and names the offending key or identifier so
//! tooling can point at it.

use thiserror::Error;

/// Result type for codegen operations
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Coarse classification of a [`CodegenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidNamespace,
    IdentifierCollision,
    UnsupportedType,
    MissingGroupingContext,
    Parse,
    Render,
}

/// Errors raised while loading a model or building a rendering plan
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The root namespace of a group or key is empty or cannot be resolved
    #[error("invalid namespace in '{key}': root namespace must be a non-empty dot segment")]
    InvalidNamespace { key: String },

    /// Two distinct declarations normalize to the same identifier in one scope
    #[error("identifier collision in {scope}: '{first}' and '{second}' both map to {identifier}")]
    IdentifierCollision {
        scope: String,
        identifier: String,
        first: String,
        second: String,
    },

    /// The declared value type has no mapping
    #[error("unsupported type '{declared}' for '{key}'")]
    UnsupportedType { key: String, declared: String },

    /// The grouping policy needs information the group does not carry
    #[error("group '{group}' cannot be grouped: {reason}")]
    MissingGroupingContext { group: String, reason: String },

    /// TOML input could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The writer could not turn a plan into a syntax tree
    #[error("render error in {unit}: {reason}")]
    Render { unit: String, reason: String },
}

impl CodegenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodegenError::InvalidNamespace { .. } => ErrorKind::InvalidNamespace,
            CodegenError::IdentifierCollision { .. } => ErrorKind::IdentifierCollision,
            CodegenError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            CodegenError::MissingGroupingContext { .. } => ErrorKind::MissingGroupingContext,
            CodegenError::Parse(_) => ErrorKind::Parse,
            CodegenError::Render { .. } => ErrorKind::Render,
        }
    }

    /// Create an invalid namespace error
    pub fn invalid_namespace(key: impl Into<String>) -> Self {
        Self::InvalidNamespace { key: key.into() }
    }

    /// Create an identifier collision error
    pub fn collision(
        scope: impl Into<String>,
        identifier: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::IdentifierCollision {
            scope: scope.into(),
            identifier: identifier.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(key: impl Into<String>, declared: impl Into<String>) -> Self {
        Self::UnsupportedType {
            key: key.into(),
            declared: declared.into(),
        }
    }

    /// Create a missing grouping context error
    pub fn missing_context(group: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingGroupingContext {
            group: group.into(),
            reason: reason.into(),
        }
    }

    /// The key or identifier the error is about, if it names one.
    pub fn subject(&self) -> Option<&str> {
        match self {
            CodegenError::InvalidNamespace { key } => Some(key),
            CodegenError::IdentifierCollision { identifier, .. } => Some(identifier),
            CodegenError::UnsupportedType { key, .. } => Some(key),
            CodegenError::MissingGroupingContext { group, .. } => Some(group),
            CodegenError::Render { unit, .. } => Some(unit),
            CodegenError::Parse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            CodegenError::invalid_namespace(".x").kind(),
            ErrorKind::InvalidNamespace
        );
        assert_eq!(
            CodegenError::collision("FirstAttributes", "FIRST_A", "first.a", "first.A").kind(),
            ErrorKind::IdentifierCollision
        );
        assert_eq!(
            CodegenError::unsupported_type("first.a", "float").kind(),
            ErrorKind::UnsupportedType
        );
        assert_eq!(
            CodegenError::missing_context("first", "no metric").kind(),
            ErrorKind::MissingGroupingContext
        );
    }

    #[test]
    fn display_names_offending_key() {
        let e = CodegenError::collision("FirstAttributes", "FIRST_A", "first.a", "first.A");
        let s = e.to_string();
        assert!(s.contains("FirstAttributes"), "Missing scope:\n{s}");
        assert!(s.contains("FIRST_A"), "Missing identifier:\n{s}");
        assert!(s.contains("first.a") && s.contains("first.A"), "Missing keys:\n{s}");
        assert_eq!(e.subject(), Some("FIRST_A"));
    }

    #[test]
    fn parse_error_converts() {
        let err: CodegenError = toml::from_str::<toml::Value>("a = ").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.subject(), None);
    }
}
