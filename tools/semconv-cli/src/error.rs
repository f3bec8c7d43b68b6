//! CLI Error Types
//!
//! Error messages name the file involved and, where one exists, a hint at
//! the fix.

use std::path::Path;

use semconv_codegen::{CodegenError, ErrorKind};
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI-specific errors with helpful messages and hints
#[derive(Debug, Error)]
pub enum CliError {
    /// Model file does not exist
    #[error("Model file not found: {path}\n  Hint: pass --model <path> or create {path}")]
    ModelNotFound { path: String },

    /// Model could not be turned into a plan or source
    #[error("{source}\n  In: {path}{}", hint(.source))]
    Codegen {
        path: String,
        #[source]
        source: CodegenError,
    },

    /// `--check` found generated files that differ from what is on disk
    #[error("Generated files are out of date:\n{}\n  Hint: run 'semconv generate' to refresh them", list(.files))]
    OutOfDate { files: Vec<String> },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

fn hint(source: &CodegenError) -> &'static str {
    match source.kind() {
        ErrorKind::InvalidNamespace => "\n  Hint: group ids and keys must start with a non-empty namespace segment",
        ErrorKind::IdentifierCollision => "\n  Hint: rename one of the keys or pick a policy that separates them",
        ErrorKind::UnsupportedType => "\n  Hint: supported types are boolean, string, int, double, their arrays, enum and template[T]",
        ErrorKind::MissingGroupingContext => "\n  Hint: add the metric to the group or use another grouping policy",
        ErrorKind::Parse | ErrorKind::Render => "",
    }
}

fn list(files: &[String]) -> String {
    files
        .iter()
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl CliError {
    /// Create a model not found error
    pub fn model_not_found(path: &Path) -> Self {
        Self::ModelNotFound {
            path: path.display().to_string(),
        }
    }

    /// Wrap a codegen error raised while processing `path`
    pub fn codegen(path: &Path, source: CodegenError) -> Self {
        Self::Codegen {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codegen_error_carries_path_and_hint() {
        let err = CliError::codegen(
            Path::new("model.toml"),
            CodegenError::unsupported_type("first.a", "float"),
        );
        let msg = err.to_string();
        assert!(msg.contains("first.a"), "Missing key:\n{msg}");
        assert!(msg.contains("In: model.toml"), "Missing path:\n{msg}");
        assert!(msg.contains("Hint:"), "Missing hint:\n{msg}");
    }

    #[test]
    fn out_of_date_lists_files() {
        let err = CliError::OutOfDate {
            files: vec!["out/mod.rs".to_string(), "out/keys.rs".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("  - out/mod.rs"), "Missing file:\n{msg}");
        assert!(msg.contains("  - out/keys.rs"), "Missing file:\n{msg}");
    }
}
