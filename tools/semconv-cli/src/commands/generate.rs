//! `semconv generate` subcommand
//!
//! Reads a model and writes one Rust module per emission unit, plus
//! `mod.rs` and `keys.rs`, into the output directory.
//!
//! # Usage
//!
//! ```text
//! semconv generate                                  # semconv.toml -> src/semconv/
//! semconv generate --policy attributes_and_metrics  # split attributes and metrics
//! semconv generate --check                          # fail if files are stale (CI)
//! semconv generate --dry-run                        # print to stdout, don't write
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use semconv_codegen::{write_rust, RustWriterOptions};

use super::ModelArgs;
use crate::error::{CliError, CliResult};

/// Generate Rust modules from a semantic-convention model
#[derive(Debug, Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Directory receiving the generated modules
    #[arg(long, default_value = "src/semconv")]
    pub out_dir: PathBuf,

    /// Absolute path of the keys module, e.g. crate::semconv::keys
    #[arg(long)]
    pub keys_path: Option<String>,

    /// Compare generated output with the files on disk (exit 1 if stale)
    #[arg(long, conflicts_with = "dry_run")]
    pub check: bool,

    /// Print generated output to stdout instead of writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn execute(self) -> CliResult<()> {
        let plan = self.model.plan()?;

        let mut options = RustWriterOptions::default();
        if let Some(path) = &self.keys_path {
            options = options.keys_path(path.clone());
        }
        let files =
            write_rust(&plan, &options).map_err(|e| CliError::codegen(&self.model.model, e))?;

        if self.check {
            let mut stale = Vec::new();
            for file in &files {
                let path = self.out_dir.join(&file.path);
                if !is_current(&path, &file.contents)? {
                    stale.push(path.display().to_string());
                }
            }
            if !stale.is_empty() {
                return Err(CliError::OutOfDate { files: stale });
            }
            println!("{} {} is up to date", "✓".green(), self.out_dir.display());
            return Ok(());
        }

        if self.dry_run {
            for file in &files {
                println!("{}  {}", "──".dimmed(), self.out_dir.join(&file.path).display());
                println!("{}", file.contents);
            }
            return Ok(());
        }

        for file in &files {
            write_if_changed(&self.out_dir.join(&file.path), &file.contents)?;
        }

        println!(
            "{} {} unit(s), {} declaration(s)",
            "✓".green(),
            plan.walk().len(),
            plan.declaration_count()
        );
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `true` when `path` exists with exactly `contents`.
fn is_current(path: &Path, contents: &str) -> CliResult<bool> {
    match std::fs::read_to_string(path) {
        Ok(existing) => Ok(existing == contents),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Write `contents` to `path`, creating parent directories as needed.
/// Prints a status line indicating whether the file was written or unchanged.
fn write_if_changed(path: &Path, contents: &str) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory: {}", parent.display()))?;
    }

    let existing = std::fs::read_to_string(path).ok();
    if existing.as_deref() != Some(contents) {
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        println!("  {} {} written", "→".cyan(), path.display());
    } else {
        println!("  {} {} unchanged", "·".dimmed(), path.display());
    }
    Ok(())
}
