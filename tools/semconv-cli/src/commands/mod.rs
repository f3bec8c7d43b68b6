//! CLI Command Implementations
//!
//! Both commands load the same inputs: a model, an optional config file and
//! per-field overrides from the command line.

pub mod generate;
pub mod plan;

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use semconv_codegen::{
    render_plan, CodegenConfig, GroupingPolicy, MetricMode, NamespaceOrder, RenderingPlan,
    SemanticModel,
};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Model, config file and config overrides
#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Path to the semantic-convention model (TOML)
    #[arg(long, default_value = "semconv.toml")]
    pub model: PathBuf,

    /// Path to a codegen config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Grouping policy: all, attributes_and_metrics, single_file, no_group_prefix
    #[arg(long)]
    pub policy: Option<GroupingPolicy>,

    /// Metric rendering: name_constant, builder_factory
    #[arg(long)]
    pub metric_mode: Option<MetricMode>,

    /// Namespace order: discovery, alphabetical
    #[arg(long)]
    pub namespace_order: Option<NamespaceOrder>,

    /// Drop experimental groups, attributes and metrics
    #[arg(long)]
    pub no_experimental: bool,

    /// Drop the group's namespace segment from identifiers (no_group_prefix only)
    #[arg(long)]
    pub strip_scope_prefix: bool,

    /// Identifier of the bundle unit under single_file
    #[arg(long)]
    pub bundle_name: Option<String>,
}

impl ModelArgs {
    /// Read the model and resolve the effective config.
    pub fn load(&self) -> CliResult<(SemanticModel, CodegenConfig)> {
        if !self.model.exists() {
            return Err(CliError::model_not_found(&self.model));
        }
        let src = std::fs::read_to_string(&self.model)
            .with_context(|| format!("reading {}", self.model.display()))?;
        let model =
            SemanticModel::from_toml(&src).map_err(|e| CliError::codegen(&self.model, e))?;

        let config = self.config()?;
        debug!(
            model = %self.model.display(),
            groups = model.groups.len(),
            policy = %config.grouping_policy,
            metric_mode = %config.metric_mode,
            "loaded model"
        );
        Ok((model, config))
    }

    fn config(&self) -> CliResult<CodegenConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let src = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                CodegenConfig::from_toml(&src).map_err(|e| CliError::codegen(path, e))?
            }
            None => CodegenConfig::default(),
        };

        if let Some(policy) = self.policy {
            config = config.grouping_policy(policy);
        }
        if let Some(mode) = self.metric_mode {
            config = config.metric_mode(mode);
        }
        if let Some(order) = self.namespace_order {
            config = config.namespace_order(order);
        }
        if self.no_experimental {
            config = config.include_experimental(false);
        }
        if self.strip_scope_prefix {
            config = config.strip_scope_prefix(true);
        }
        if let Some(name) = &self.bundle_name {
            config = config.bundle_name(name.clone());
        }
        Ok(config)
    }

    /// Load everything and build the plan.
    pub fn plan(&self) -> CliResult<RenderingPlan> {
        let (model, config) = self.load()?;
        render_plan(&model, &config).map_err(|e| CliError::codegen(&self.model, e))
    }
}
