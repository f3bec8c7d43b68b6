//! Semantic convention model types and TOML loader
//!
//! Deserialises a model file into [`SemanticModel`]. The model is treated as
//! already validated: briefs are present, metrics carry a unit, and declared
//! enums have at least one member.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};

// ── Top-level model ───────────────────────────────────────────────────────────

/// An ordered collection of convention groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticModel {
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl SemanticModel {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Parse from a TOML string.
    pub fn from_toml(s: &str) -> CodegenResult<Self> {
        toml::from_str(s).map_err(CodegenError::from)
    }

    /// Serialise back to a TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

// ── Stability ─────────────────────────────────────────────────────────────────

/// Stability marker carried by groups, attributes and metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    #[default]
    Stable,
    Experimental,
    Deprecated,
}

impl Stability {
    pub fn is_experimental(self) -> bool {
        self == Stability::Experimental
    }
}

// ── Group ─────────────────────────────────────────────────────────────────────

/// Kind of convention group, as declared by the schema.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    #[default]
    AttributeGroup,
    Span,
    Resource,
    Scope,
    Event,
    Metric,
    MetricGroup,
}

/// One `[[groups]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Globally unique id, e.g. `"http.server"`.
    pub id: String,
    #[serde(default)]
    pub kind: GroupKind,
    #[serde(default)]
    pub brief: String,
    #[serde(default)]
    pub stability: Stability,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Group {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: GroupKind::default(),
            brief: String::new(),
            stability: Stability::default(),
            attributes: Vec::new(),
            metrics: Vec::new(),
            events: Vec::new(),
        }
    }

    /// First dot segment of the group id. Empty when the id is empty or
    /// starts with a dot.
    pub fn root_namespace(&self) -> &str {
        root_segment(&self.id)
    }

    pub fn with_kind(mut self, kind: GroupKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_stability(mut self, stability: Stability) -> Self {
        self.stability = stability;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }
}

/// First segment of a dotted key.
pub fn root_segment(key: &str) -> &str {
    key.split('.').next().unwrap_or_default()
}

// ── Attribute ─────────────────────────────────────────────────────────────────

/// One `[[groups.attributes]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Dot-namespaced key, e.g. `"first.attr_one"`.
    pub key: String,
    /// Declared type as written in the schema, e.g. `"int"` or
    /// `"template[string]"`. Interpreted by [`crate::types`].
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub brief: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Deprecation reason; its presence marks the attribute deprecated.
    #[serde(default)]
    pub deprecated: Option<String>,
    #[serde(default)]
    pub stability: Stability,
    #[serde(default)]
    pub members: Vec<EnumMember>,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_type: value_type.into(),
            brief: String::new(),
            note: None,
            deprecated: None,
            stability: Stability::default(),
            members: Vec::new(),
        }
    }

    pub fn with_brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = brief.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_stability(mut self, stability: Stability) -> Self {
        self.stability = stability;
        self
    }

    pub fn with_member(mut self, member: EnumMember) -> Self {
        self.members.push(member);
        self
    }
}

// ── Enum member ───────────────────────────────────────────────────────────────

/// Literal value of an enum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Int(v) => write!(f, "{v}"),
            EnumValue::Str(s) => f.write_str(s),
        }
    }
}

/// One `[[groups.attributes.members]]` entry. Order in the parent list is
/// the emitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub id: String,
    pub value: EnumValue,
    #[serde(default)]
    pub brief: String,
}

impl EnumMember {
    pub fn new(id: impl Into<String>, value: EnumValue) -> Self {
        Self {
            id: id.into(),
            value,
            brief: String::new(),
        }
    }

    pub fn string(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(id, EnumValue::Str(value.into()))
    }

    pub fn int(id: impl Into<String>, value: i64) -> Self {
        Self::new(id, EnumValue::Int(value))
    }

    pub fn with_brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = brief.into();
        self
    }
}

// ── Metric ────────────────────────────────────────────────────────────────────

/// One `[[groups.metrics]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Dot-namespaced metric name, e.g. `"http.server.request.duration"`.
    pub name: String,
    /// `counter`, `updowncounter`, `histogram` or `gauge`.
    pub instrument: String,
    /// Passed through verbatim, including `{custom}` units.
    pub unit: String,
    #[serde(default)]
    pub brief: String,
    #[serde(default)]
    pub stability: Stability,
    /// Recorded number type (`int` or `double`); defaults per instrument.
    #[serde(default)]
    pub value_type: Option<String>,
    #[serde(default)]
    pub members: Vec<EnumMember>,
}

impl Metric {
    pub fn new(
        name: impl Into<String>,
        instrument: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instrument: instrument.into(),
            unit: unit.into(),
            brief: String::new(),
            stability: Stability::default(),
            value_type: None,
            members: Vec::new(),
        }
    }

    pub fn with_brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = brief.into();
        self
    }

    pub fn with_stability(mut self, stability: Stability) -> Self {
        self.stability = stability;
        self
    }

    pub fn with_value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// One `[[groups.events]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub brief: String,
    /// Keys of the attributes recorded with this event.
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brief: String::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = brief.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TOML: &str = r#"
[[groups]]
id = "first"
brief = "first group"

[[groups.attributes]]
key = "first.attr_one"
type = "boolean"
brief = "short description of attr_one"

[[groups.attributes]]
key = "first.attr_template_one"
type = "template[string]"
brief = "this is the description of attribute template"
note = "suffix is the header name"

[[groups.metrics]]
name = "first.metric.name"
instrument = "counter"
unit = "{one}"
brief = "first metric description"

[[groups]]
id = "fifth"
stability = "experimental"

[[groups.attributes]]
key = "fifth.attr_five_int"
type = "enum"
brief = "short description of attr_five_int"

[[groups.attributes.members]]
id = "enum2_one"
value = 1

[[groups.attributes.members]]
id = "enum2_two"
value = 2

[[groups.events]]
name = "fifth.event"
attributes = ["fifth.attr_five_int"]
"#;

    fn model() -> SemanticModel {
        SemanticModel::from_toml(SAMPLE_TOML).unwrap()
    }

    #[test]
    fn parses_groups_in_order() {
        let m = model();
        let ids: Vec<_> = m.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["first", "fifth"]);
    }

    #[test]
    fn defaults_applied() {
        let m = model();
        let first = &m.groups[0];
        assert_eq!(first.kind, GroupKind::AttributeGroup);
        assert_eq!(first.stability, Stability::Stable);
        assert_eq!(first.attributes[0].stability, Stability::Stable);
        assert!(first.attributes[0].members.is_empty());
        assert_eq!(first.metrics[0].value_type, None);
    }

    #[test]
    fn attribute_fields_parsed() {
        let m = model();
        let tmpl = &m.groups[0].attributes[1];
        assert_eq!(tmpl.value_type, "template[string]");
        assert_eq!(tmpl.note.as_deref(), Some("suffix is the header name"));
    }

    #[test]
    fn enum_members_keep_declared_order_and_type() {
        let m = model();
        let fifth = &m.groups[1];
        assert!(fifth.stability.is_experimental());
        let members = &fifth.attributes[0].members;
        assert_eq!(members[0], EnumMember::int("enum2_one", 1));
        assert_eq!(members[1], EnumMember::int("enum2_two", 2));
    }

    #[test]
    fn string_enum_values_parse_as_str() {
        let m = SemanticModel::from_toml(
            r#"
[[groups]]
id = "g"
[[groups.attributes]]
key = "g.a"
type = "enum"
[[groups.attributes.members]]
id = "one"
value = "one"
"#,
        )
        .unwrap();
        assert_eq!(
            m.groups[0].attributes[0].members[0].value,
            EnumValue::Str("one".to_string())
        );
    }

    #[test]
    fn events_reference_attributes() {
        let m = model();
        let ev = &m.groups[1].events[0];
        assert_eq!(ev.name, "fifth.event");
        assert_eq!(ev.attributes, ["fifth.attr_five_int"]);
    }

    #[test]
    fn root_namespace_is_first_segment() {
        assert_eq!(Group::new("http.server").root_namespace(), "http");
        assert_eq!(Group::new("first").root_namespace(), "first");
        assert_eq!(Group::new(".x").root_namespace(), "");
        assert_eq!(Group::new("").root_namespace(), "");
    }

    #[test]
    fn toml_round_trip_preserves_model() {
        let m = model();
        let back = SemanticModel::from_toml(&m.to_toml().unwrap()).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = SemanticModel::from_toml("[[groups]]\nid = ").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Parse);
    }
}
