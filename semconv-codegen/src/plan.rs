//! Rendering plan: the ordered, language-neutral output of a generation run
//!
//! A plan is a list of emission units, each holding declarations in emission
//! order. Writers format it per target language; nothing here is source text.

use serde::Serialize;

use crate::metrics::{InstrumentKind, NumberType};
use crate::model::EnumValue;
use crate::types::{ScalarType, ValueType};

/// Complete output of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderingPlan {
    pub units: Vec<EmissionUnit>,
}

impl RenderingPlan {
    /// Serialise to pretty JSON. Stable across runs for the same input.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Depth-first walk over all units, parents before children.
    pub fn walk(&self) -> Vec<&EmissionUnit> {
        let mut out = Vec::new();
        for unit in &self.units {
            unit.collect_into(&mut out);
        }
        out
    }

    /// Find a unit anywhere in the tree by identifier.
    pub fn find_unit(&self, identifier: &str) -> Option<&EmissionUnit> {
        self.walk().into_iter().find(|u| u.identifier == identifier)
    }

    /// Total declarations across every unit, nested ones included.
    pub fn declaration_count(&self) -> usize {
        self.walk().iter().map(|u| u.declarations.len()).sum()
    }
}

/// What a unit holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitRole {
    /// Attributes, metrics and events together.
    Combined,
    /// Attributes and events only.
    Attributes,
    /// Metric name constants or builder factories only.
    Metrics,
    /// Wrapper whose content lives in its children.
    Bundle,
}

/// One output scope (file, class or module).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionUnit {
    pub identifier: String,
    pub role: UnitRole,
    /// Root namespace this unit was folded from, if any.
    pub namespace: Option<String>,
    pub declarations: Vec<Declaration>,
    pub children: Vec<EmissionUnit>,
}

impl EmissionUnit {
    fn collect_into<'a>(&'a self, out: &mut Vec<&'a EmissionUnit>) {
        out.push(self);
        for child in &self.children {
            child.collect_into(out);
        }
    }

    /// Identifiers of the unit's own declarations, in order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.declarations.iter().map(|d| d.identifier()).collect()
    }
}

/// A single emitted declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Constant(ConstantDecl),
    TemplatedConstant(ConstantDecl),
    EnumContainer(EnumContainer),
    Factory(FactoryDecl),
}

impl Declaration {
    pub fn identifier(&self) -> &str {
        match self {
            Declaration::Constant(c) | Declaration::TemplatedConstant(c) => &c.identifier,
            Declaration::EnumContainer(e) => &e.identifier,
            Declaration::Factory(f) => &f.identifier,
        }
    }

    /// Documentation lines, verbatim.
    pub fn doc(&self) -> &[String] {
        match self {
            Declaration::Constant(c) | Declaration::TemplatedConstant(c) => &c.doc,
            Declaration::EnumContainer(e) => &e.doc,
            Declaration::Factory(f) => &f.doc,
        }
    }
}

/// What a constant holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantType {
    /// A typed attribute key.
    Key(ValueType),
    /// A plain metric name string.
    MetricName,
    /// A plain event name string.
    EventName,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstantDecl {
    pub identifier: String,
    /// The literal key or name.
    pub literal: String,
    pub ty: ConstantType,
    pub doc: Vec<String>,
}

/// Ordered name → value constants attached to an attribute or metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumContainer {
    pub identifier: String,
    /// Identifier of the attribute or metric constant owning the values.
    pub owner: String,
    pub value_type: ScalarType,
    pub members: Vec<EnumConstant>,
    pub doc: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumConstant {
    pub identifier: String,
    pub value: EnumValue,
    pub doc: Vec<String>,
}

/// A factory that builds a configured instrument from a meter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactoryDecl {
    pub identifier: String,
    pub metric_name: String,
    pub instrument: InstrumentKind,
    pub number: NumberType,
    /// Builder configuration calls, applied in order.
    pub calls: Vec<BuilderCall>,
    pub doc: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderCall {
    Description(String),
    Unit(String),
}
