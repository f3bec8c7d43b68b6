//! Generation run configuration

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};

/// How groups are folded into emission units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    /// One unit per root namespace, attributes then metrics.
    #[default]
    All,
    /// Per root namespace: an attributes unit and, when metrics exist, a
    /// metrics unit.
    AttributesAndMetrics,
    /// One bundle unit with one nested scope per root namespace.
    SingleFile,
    /// One unit per group, no root-namespace folding.
    NoGroupPrefix,
}

/// How metrics are rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetricMode {
    /// A string constant holding the metric name.
    #[default]
    NameConstant,
    /// A factory function configuring an instrument builder.
    BuilderFactory,
}

/// Order in which root namespaces are emitted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceOrder {
    /// First occurrence in the model's group sequence.
    #[default]
    Discovery,
    Alphabetical,
}

macro_rules! str_enum {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const VARIANTS: &'static [&'static str] = &[$($name),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown value '{other}', expected one of: {}",
                        Self::VARIANTS.join(", ")
                    )),
                }
            }
        }
    };
}

str_enum!(GroupingPolicy {
    All => "all",
    AttributesAndMetrics => "attributes_and_metrics",
    SingleFile => "single_file",
    NoGroupPrefix => "no_group_prefix",
});

str_enum!(MetricMode {
    NameConstant => "name_constant",
    BuilderFactory => "builder_factory",
});

str_enum!(NamespaceOrder {
    Discovery => "discovery",
    Alphabetical => "alphabetical",
});

fn default_true() -> bool {
    true
}

fn default_bundle_name() -> String {
    CodegenConfig::DEFAULT_BUNDLE_NAME.to_string()
}

/// Options for one generation run
///
/// Applied uniformly to every group, attribute and metric in the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenConfig {
    #[serde(default)]
    pub grouping_policy: GroupingPolicy,

    #[serde(default)]
    pub metric_mode: MetricMode,

    /// When false, experimental groups, attributes and metrics are left out
    /// of the plan entirely.
    #[serde(default = "default_true")]
    pub include_experimental: bool,

    /// Drop the leading key segment when a `no_group_prefix` unit already
    /// scopes it.
    #[serde(default)]
    pub strip_scope_prefix: bool,

    #[serde(default)]
    pub namespace_order: NamespaceOrder,

    /// Identifier of the wrapping unit under `single_file`.
    #[serde(default = "default_bundle_name")]
    pub bundle_name: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            grouping_policy: GroupingPolicy::default(),
            metric_mode: MetricMode::default(),
            include_experimental: true,
            strip_scope_prefix: false,
            namespace_order: NamespaceOrder::default(),
            bundle_name: default_bundle_name(),
        }
    }
}

impl CodegenConfig {
    pub const DEFAULT_BUNDLE_NAME: &'static str = "AllAttributes";

    /// Parse from a TOML string. Missing keys take their defaults.
    pub fn from_toml(s: &str) -> CodegenResult<Self> {
        toml::from_str(s).map_err(CodegenError::from)
    }

    /// Sets the grouping policy
    pub fn grouping_policy(mut self, policy: GroupingPolicy) -> Self {
        self.grouping_policy = policy;
        self
    }

    /// Sets the metric rendering mode
    pub fn metric_mode(mut self, mode: MetricMode) -> Self {
        self.metric_mode = mode;
        self
    }

    /// Sets whether experimental definitions are emitted
    pub fn include_experimental(mut self, include: bool) -> Self {
        self.include_experimental = include;
        self
    }

    /// Sets whether scope-redundant key prefixes are dropped
    pub fn strip_scope_prefix(mut self, strip: bool) -> Self {
        self.strip_scope_prefix = strip;
        self
    }

    /// Sets the namespace emission order
    pub fn namespace_order(mut self, order: NamespaceOrder) -> Self {
        self.namespace_order = order;
        self
    }

    /// Sets the bundle identifier used by `single_file`
    pub fn bundle_name(mut self, name: impl Into<String>) -> Self {
        self.bundle_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = CodegenConfig::default();
        assert_eq!(cfg.grouping_policy, GroupingPolicy::All);
        assert_eq!(cfg.metric_mode, MetricMode::NameConstant);
        assert!(cfg.include_experimental);
        assert!(!cfg.strip_scope_prefix);
        assert_eq!(cfg.namespace_order, NamespaceOrder::Discovery);
        assert_eq!(cfg.bundle_name, "AllAttributes");
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(CodegenConfig::from_toml("").unwrap(), CodegenConfig::default());
    }

    #[test]
    fn toml_overrides() {
        let cfg = CodegenConfig::from_toml(
            r#"
grouping_policy = "attributes_and_metrics"
metric_mode = "builder_factory"
include_experimental = false
namespace_order = "alphabetical"
"#,
        )
        .unwrap();
        assert_eq!(cfg.grouping_policy, GroupingPolicy::AttributesAndMetrics);
        assert_eq!(cfg.metric_mode, MetricMode::BuilderFactory);
        assert!(!cfg.include_experimental);
        assert_eq!(cfg.namespace_order, NamespaceOrder::Alphabetical);
    }

    #[test]
    fn unknown_policy_rejected() {
        assert!(CodegenConfig::from_toml("grouping_policy = \"by_file\"").is_err());
        let err = "by_file".parse::<GroupingPolicy>().unwrap_err();
        assert!(err.contains("no_group_prefix"), "Missing choices:\n{err}");
    }

    #[test]
    fn from_str_matches_display() {
        for name in GroupingPolicy::VARIANTS {
            let p: GroupingPolicy = name.parse().unwrap();
            assert_eq!(p.to_string(), *name);
        }
        for name in MetricMode::VARIANTS {
            let m: MetricMode = name.parse().unwrap();
            assert_eq!(m.as_str(), *name);
        }
    }

    #[test]
    fn builder_setters() {
        let cfg = CodegenConfig::default()
            .grouping_policy(GroupingPolicy::SingleFile)
            .metric_mode(MetricMode::BuilderFactory)
            .include_experimental(false)
            .strip_scope_prefix(true)
            .namespace_order(NamespaceOrder::Alphabetical)
            .bundle_name("Everything");
        assert_eq!(cfg.grouping_policy, GroupingPolicy::SingleFile);
        assert_eq!(cfg.metric_mode, MetricMode::BuilderFactory);
        assert!(!cfg.include_experimental);
        assert!(cfg.strip_scope_prefix);
        assert_eq!(cfg.bundle_name, "Everything");
    }
}
