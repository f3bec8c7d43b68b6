//! Semconv Codegen: semantic-convention models to typed constant declarations
//!
//! This library reads a semantic-convention model (groups of attributes,
//! metrics and events keyed by dotted namespaces) and produces:
//!
//! - **Rendering plan**: an ordered, language-neutral list of emission units
//!   and their declarations (see [`render_plan`])
//! - **Rust source**: one module per unit with typed attribute keys, enum
//!   value containers and metric builders (see [`write_rust`])
//!
//! How definitions are partitioned into units is controlled by
//! [`CodegenConfig`]: the [`GroupingPolicy`], the [`MetricMode`] and whether
//! experimental definitions are kept.
//!
//! # Usage
//!
//! ```rust
//! use semconv_codegen::{
//!     render_plan, write_rust, CodegenConfig, GroupingPolicy, RustWriterOptions, SemanticModel,
//! };
//!
//! let toml = r#"
//! [[groups]]
//! id = "first"
//!
//! [[groups.attributes]]
//! key = "first.attr_one"
//! type = "boolean"
//! brief = "short description of attr_one"
//!
//! [[groups.attributes]]
//! key = "first.attr_template_one"
//! type = "template[string]"
//! "#;
//!
//! let model = SemanticModel::from_toml(toml).unwrap();
//! let config = CodegenConfig::default().grouping_policy(GroupingPolicy::NoGroupPrefix);
//!
//! let plan = render_plan(&model, &config).unwrap();
//! assert_eq!(
//!     plan.units[0].identifiers(),
//!     ["FIRST_ATTR_ONE", "FIRST_ATTR_TEMPLATE_ONE"]
//! );
//!
//! let files = write_rust(&plan, &RustWriterOptions::default()).unwrap();
//! assert!(files.iter().any(|f| f.contents.contains("pub const FIRST_ATTR_ONE")));
//! ```

pub mod config;
pub mod enums;
pub mod error;
pub mod grouping;
pub mod metrics;
pub mod model;
pub mod naming;
pub mod plan;
pub mod render;
pub mod types;
pub mod writer;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use config::{CodegenConfig, GroupingPolicy, MetricMode, NamespaceOrder};
pub use error::{CodegenError, CodegenResult, ErrorKind};
pub use model::{
    Attribute, EnumMember, EnumValue, Event, Group, GroupKind, Metric, SemanticModel, Stability,
};
pub use naming::{to_const_name, to_pascal_case, to_snake_case, IdentifierMapper};
pub use plan::{Declaration, EmissionUnit, RenderingPlan, UnitRole};
pub use render::render_plan;
pub use writer::{write_rust, GeneratedFile, RustWriterOptions};
