//! Plan composition
//!
//! Walks the unit layouts produced by [`group_model`] and turns every
//! attribute, metric and event into declarations. Nothing is emitted unless
//! the whole model renders; the first error aborts the run.

use tracing::{debug, trace, warn};

use crate::config::{CodegenConfig, MetricMode};
use crate::enums::render_enum_container;
use crate::error::CodegenResult;
use crate::grouping::{group_model, UnitLayout};
use crate::metrics::{metric_const_name, render_metric};
use crate::model::{Attribute, Event, Metric, SemanticModel};
use crate::naming::{to_doc_brief, Claim, IdentifierMapper, IdentifierScope};
use crate::plan::{ConstantDecl, ConstantType, Declaration, EmissionUnit, RenderingPlan};
use crate::types::{map_attribute_type, KeyShape};

/// Build the rendering plan for `model` under `config`.
pub fn render_plan(model: &SemanticModel, config: &CodegenConfig) -> CodegenResult<RenderingPlan> {
    let layouts = group_model(model, config)?;
    let units = layouts
        .iter()
        .map(|layout| render_unit(layout, config.metric_mode))
        .collect::<CodegenResult<Vec<_>>>()?;

    let plan = RenderingPlan { units };
    debug!(
        units = plan.walk().len(),
        declarations = plan.declaration_count(),
        "rendering plan ready"
    );
    Ok(plan)
}

fn render_unit(layout: &UnitLayout<'_>, mode: MetricMode) -> CodegenResult<EmissionUnit> {
    let mapper = match layout.scope_segment.as_deref() {
        Some(segment) => IdentifierMapper::scoped(segment),
        None => IdentifierMapper::unscoped(),
    };
    let mut unit = UnitRenderer {
        mapper,
        scope: IdentifierScope::new(&layout.identifier),
        declarations: Vec::new(),
    };

    let attributes = layout.slices.iter().flat_map(|s| s.attributes.iter().copied());
    let metrics = layout.slices.iter().flat_map(|s| s.metrics.iter().copied());
    let events = layout.slices.iter().flat_map(|s| s.events.iter().copied());

    unit.attributes(attributes)?;
    unit.metrics(metrics, mode)?;
    unit.events(events)?;

    let children = layout
        .children
        .iter()
        .map(|child| render_unit(child, mode))
        .collect::<CodegenResult<Vec<_>>>()?;

    debug!(
        unit = %layout.identifier,
        declarations = unit.declarations.len(),
        children = children.len(),
        "rendered unit"
    );

    Ok(EmissionUnit {
        identifier: layout.identifier.clone(),
        role: layout.role,
        namespace: layout.namespace.clone(),
        declarations: unit.declarations,
        children,
    })
}

/// Per-unit rendering state.
struct UnitRenderer {
    mapper: IdentifierMapper,
    scope: IdentifierScope,
    declarations: Vec<Declaration>,
}

impl UnitRenderer {
    /// Claim `identifier` for `source`; `false` when the same source already
    /// owns it and nothing new should be emitted.
    fn claim(&mut self, identifier: &str, source: &str) -> CodegenResult<bool> {
        match self.scope.claim(identifier, source)? {
            Claim::New => Ok(true),
            Claim::Duplicate => {
                warn!(
                    unit = %self.scope.name(),
                    identifier,
                    "{source} reached twice, emitting once"
                );
                Ok(false)
            }
        }
    }

    fn push(&mut self, decl: Declaration) {
        trace!(unit = %self.scope.name(), identifier = decl.identifier(), "declaration");
        self.declarations.push(decl);
    }

    fn attributes<'m>(&mut self, attrs: impl Iterator<Item = &'m Attribute>) -> CodegenResult<()> {
        let mut enumerated = Vec::new();
        for attr in attrs {
            let mapping = map_attribute_type(attr)?;
            let identifier = self.mapper.map(&attr.key)?;
            if !self.claim(&identifier, &format!("attribute {}", attr.key))? {
                continue;
            }
            let decl = ConstantDecl {
                identifier: identifier.clone(),
                literal: attr.key.clone(),
                ty: ConstantType::Key(mapping.shape.value_type()),
                doc: attribute_doc(attr),
            };
            self.push(match mapping.shape {
                KeyShape::Key(_) => Declaration::Constant(decl),
                KeyShape::TemplatedKey(_) => Declaration::TemplatedConstant(decl),
            });
            if mapping.enumerated {
                enumerated.push((identifier, attr));
            }
        }

        for (owner, attr) in enumerated {
            let container = render_enum_container(&owner, &attr.key, &attr.members)?;
            self.claim(&container.identifier, &format!("values of {}", attr.key))?;
            self.push(Declaration::EnumContainer(container));
        }
        Ok(())
    }

    fn metrics<'m>(
        &mut self,
        metrics: impl Iterator<Item = &'m Metric>,
        mode: MetricMode,
    ) -> CodegenResult<()> {
        let mut enumerated = Vec::new();
        for metric in metrics {
            let decl = render_metric(metric, &self.mapper, mode)?;
            if !self.claim(decl.identifier(), &format!("metric {}", metric.name))? {
                continue;
            }
            self.push(decl);
            if !metric.members.is_empty() {
                enumerated.push(metric);
            }
        }

        for metric in enumerated {
            let owner = metric_const_name(metric, &self.mapper)?;
            let container = render_enum_container(&owner, &metric.name, &metric.members)?;
            self.claim(&container.identifier, &format!("values of {}", metric.name))?;
            self.push(Declaration::EnumContainer(container));
        }
        Ok(())
    }

    fn events<'m>(&mut self, events: impl Iterator<Item = &'m Event>) -> CodegenResult<()> {
        for event in events {
            let identifier = self.mapper.map(&event.name)?;
            if !self.claim(&identifier, &format!("event {}", event.name))? {
                continue;
            }
            self.push(Declaration::Constant(ConstantDecl {
                identifier,
                literal: event.name.clone(),
                ty: ConstantType::EventName,
                doc: event_doc(event),
            }));
        }
        Ok(())
    }
}

/// Brief, then note, then deprecation reason; blank lines between.
fn attribute_doc(attr: &Attribute) -> Vec<String> {
    let mut doc = Vec::new();
    let brief = to_doc_brief(&attr.brief);
    if !brief.is_empty() {
        doc.push(brief);
    }
    if let Some(note) = attr.note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        if !doc.is_empty() {
            doc.push(String::new());
        }
        doc.extend(note.lines().map(|l| l.trim_end().to_string()));
    }
    if let Some(reason) = attr.deprecated.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        if !doc.is_empty() {
            doc.push(String::new());
        }
        doc.push(format!("Deprecated: {reason}"));
    }
    doc
}

fn event_doc(event: &Event) -> Vec<String> {
    let mut doc = Vec::new();
    let brief = to_doc_brief(&event.brief);
    if !brief.is_empty() {
        doc.push(brief);
    }
    if !event.attributes.is_empty() {
        if !doc.is_empty() {
            doc.push(String::new());
        }
        let keys: Vec<String> = event.attributes.iter().map(|k| format!("`{k}`")).collect();
        doc.push(format!("Attributes: {}", keys.join(", ")));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupingPolicy;
    use crate::error::ErrorKind;
    use crate::model::{EnumMember, Group, Stability};
    use crate::plan::UnitRole;
    use crate::types::{ScalarType, ValueType};

    const SAMPLE_TOML: &str = r#"
[[groups]]
id = "first"
brief = "first group"

[[groups.attributes]]
key = "first.attr_one"
type = "boolean"
brief = "short description of attr_one."
note = "a longer note"

[[groups.attributes]]
key = "first.attr_template_one"
type = "template[string]"
brief = "a template attribute"

[[groups.attributes]]
key = "first.attr_enum"
type = "enum"
brief = "an enum attribute"

[[groups.attributes.members]]
id = "b"
value = "b"

[[groups.attributes.members]]
id = "a"
value = "a"

[[groups.attributes]]
key = "first.attr_old"
type = "string"
deprecated = "Replaced by `first.attr_one`."

[[groups.metrics]]
name = "first.metric"
instrument = "counter"
unit = "{one}"
brief = "first metric description"

[[groups.events]]
name = "first.event"
brief = "something happened"
attributes = ["first.attr_one"]
"#;

    fn model() -> SemanticModel {
        SemanticModel::from_toml(SAMPLE_TOML).unwrap()
    }

    fn plan(config: &CodegenConfig) -> RenderingPlan {
        render_plan(&model(), config).unwrap()
    }

    #[test]
    fn declarations_in_canonical_order() {
        let p = plan(&CodegenConfig::default());
        let unit = p.find_unit("FirstAttributes").unwrap();
        assert_eq!(
            unit.identifiers(),
            [
                "FIRST_ATTR_ONE",
                "FIRST_ATTR_TEMPLATE_ONE",
                "FIRST_ATTR_ENUM",
                "FIRST_ATTR_OLD",
                "FirstAttrEnumValues",
                "FIRST_METRIC",
                "FIRST_EVENT",
            ]
        );
    }

    #[test]
    fn template_attribute_is_templated_constant() {
        let p = plan(&CodegenConfig::default());
        let unit = p.find_unit("FirstAttributes").unwrap();
        match &unit.declarations[1] {
            Declaration::TemplatedConstant(c) => {
                assert_eq!(c.literal, "first.attr_template_one");
                assert_eq!(c.ty, ConstantType::Key(ValueType::scalar(ScalarType::String)));
            }
            other => panic!("expected templated constant, got {other:?}"),
        }
    }

    #[test]
    fn enum_container_keeps_declared_order() {
        let p = plan(&CodegenConfig::default());
        let unit = p.find_unit("FirstAttributes").unwrap();
        let Declaration::EnumContainer(c) = &unit.declarations[4] else {
            panic!("expected container");
        };
        let names: Vec<_> = c.members.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(c.owner, "FIRST_ATTR_ENUM");
    }

    #[test]
    fn attribute_docs_stack_brief_note_deprecation() {
        let p = plan(&CodegenConfig::default());
        let unit = p.find_unit("FirstAttributes").unwrap();
        assert_eq!(
            unit.declarations[0].doc(),
            ["short description of attr_one", "", "a longer note"]
        );
        assert_eq!(
            unit.declarations[3].doc(),
            ["Deprecated: Replaced by `first.attr_one`."]
        );
    }

    #[test]
    fn event_rendered_as_name_constant() {
        let p = plan(&CodegenConfig::default());
        let unit = p.find_unit("FirstAttributes").unwrap();
        let Declaration::Constant(c) = unit.declarations.last().unwrap() else {
            panic!("expected constant");
        };
        assert_eq!(c.ty, ConstantType::EventName);
        assert_eq!(c.doc, ["something happened", "", "Attributes: `first.attr_one`"]);
    }

    #[test]
    fn builder_factory_mode_in_metrics_unit() {
        let cfg = CodegenConfig::default()
            .grouping_policy(GroupingPolicy::AttributesAndMetrics)
            .metric_mode(MetricMode::BuilderFactory);
        let p = plan(&cfg);
        let metrics = p.find_unit("FirstMetrics").unwrap();
        assert_eq!(metrics.role, UnitRole::Metrics);
        assert_eq!(metrics.identifiers(), ["createFirstMetric"]);
        let attrs = p.find_unit("FirstAttributes").unwrap();
        assert!(attrs.identifiers().contains(&"FIRST_EVENT"));
        assert!(!attrs.identifiers().contains(&"FIRST_METRIC"));
    }

    #[test]
    fn shared_attribute_emitted_once() {
        let shared = Attribute::new("net.peer", "string");
        let m = SemanticModel::new(vec![
            Group::new("net.a").with_attribute(shared.clone()),
            Group::new("net.b").with_attribute(shared),
        ]);
        let p = render_plan(&m, &CodegenConfig::default()).unwrap();
        assert_eq!(p.units[0].identifiers(), ["NET_PEER"]);
    }

    #[test]
    fn distinct_keys_colliding_in_unit_fail() {
        let m = SemanticModel::new(vec![Group::new("net")
            .with_attribute(Attribute::new("net.peer_name", "string"))
            .with_attribute(Attribute::new("net.peer.name", "string"))]);
        let err = render_plan(&m, &CodegenConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdentifierCollision);
        assert_eq!(err.subject(), Some("NET_PEER_NAME"));
    }

    #[test]
    fn attribute_and_metric_with_same_name_collide() {
        let m = SemanticModel::new(vec![Group::new("x")
            .with_attribute(Attribute::new("x.y", "string"))
            .with_metric(Metric::new("x.y", "counter", "1"))]);
        let err = render_plan(&m, &CodegenConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdentifierCollision);
    }

    #[test]
    fn unsupported_type_aborts_run() {
        let m = SemanticModel::new(vec![
            Group::new("ok").with_attribute(Attribute::new("ok.a", "string")),
            Group::new("bad").with_attribute(Attribute::new("bad.a", "float")),
        ]);
        let err = render_plan(&m, &CodegenConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(err.subject(), Some("bad.a"));
    }

    #[test]
    fn experimental_attribute_dropped() {
        let m = SemanticModel::new(vec![Group::new("a")
            .with_attribute(Attribute::new("a.stable", "string"))
            .with_attribute(
                Attribute::new("a.new", "string").with_stability(Stability::Experimental),
            )]);
        let cfg = CodegenConfig::default().include_experimental(false);
        let p = render_plan(&m, &cfg).unwrap();
        assert_eq!(p.units[0].identifiers(), ["A_STABLE"]);
    }

    #[test]
    fn metric_members_get_container_after_metrics() {
        let mut metric = Metric::new("a.state", "updowncounter", "1");
        metric.members = vec![EnumMember::string("idle", "idle")];
        let m = SemanticModel::new(vec![Group::new("a").with_metric(metric)]);
        let p = render_plan(&m, &CodegenConfig::default()).unwrap();
        assert_eq!(p.units[0].identifiers(), ["A_STATE", "AStateValues"]);
    }

    #[test]
    fn rendering_is_deterministic() {
        let cfg = CodegenConfig::default().grouping_policy(GroupingPolicy::SingleFile);
        let a = plan(&cfg).to_json().unwrap();
        let b = plan(&cfg).to_json().unwrap();
        assert_eq!(a, b);
    }
}
