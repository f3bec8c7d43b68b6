//! `semconv plan` subcommand
//!
//! Prints the rendering plan: units by default, every declaration with
//! `--declarations`, or the full plan as JSON for other tools.

use clap::Args;

use super::ModelArgs;
use crate::error::CliResult;
use crate::output::{json, table, OutputFormat};

/// Show how a model would be rendered
#[derive(Debug, Args)]
pub struct PlanCommand {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// List every declaration instead of one row per unit (table only)
    #[arg(long)]
    pub declarations: bool,
}

impl PlanCommand {
    pub fn execute(self) -> CliResult<()> {
        let plan = self.model.plan()?;

        let out = match self.format {
            OutputFormat::Table if self.declarations => table::format_declarations_table(&plan),
            OutputFormat::Table => table::format_units_table(&plan),
            OutputFormat::Json => json::format_plan_json(&plan, true)?,
            OutputFormat::JsonCompact => json::format_plan_json(&plan, false)?,
        };
        println!("{out}");
        Ok(())
    }
}
