//! Namespace grouping
//!
//! Partitions the model's groups into emission-unit layouts according to the
//! configured [`GroupingPolicy`]. Layouts borrow from the model; the only
//! thing the grouper decides is which definitions land in which unit, in
//! what order.

use tracing::debug;

use crate::config::{CodegenConfig, GroupingPolicy, NamespaceOrder};
use crate::error::{CodegenError, CodegenResult};
use crate::model::{Attribute, Event, Group, GroupKind, Metric, SemanticModel};
use crate::naming::{to_pascal_case, IdentifierScope};
use crate::plan::UnitRole;

/// Suffix of attribute-bearing units.
pub const ATTRIBUTES_SUFFIX: &str = "Attributes";
/// Suffix of metric-factory units under `attributes_and_metrics`.
pub const METRICS_SUFFIX: &str = "Metrics";

/// The part of one group that lands in a unit.
#[derive(Debug, Clone)]
pub struct GroupSlice<'m> {
    pub group: &'m Group,
    pub attributes: Vec<&'m Attribute>,
    pub metrics: Vec<&'m Metric>,
    pub events: Vec<&'m Event>,
}

impl<'m> GroupSlice<'m> {
    /// Everything in `group` that survives experimental filtering.
    fn visible(group: &'m Group, include_experimental: bool) -> Self {
        let keep = |experimental: bool| include_experimental || !experimental;
        Self {
            group,
            attributes: group
                .attributes
                .iter()
                .filter(|a| keep(a.stability.is_experimental()))
                .collect(),
            metrics: group
                .metrics
                .iter()
                .filter(|m| keep(m.stability.is_experimental()))
                .collect(),
            events: group.events.iter().collect(),
        }
    }

    fn attributes_only(&self) -> Self {
        Self {
            metrics: Vec::new(),
            ..self.clone()
        }
    }

    fn metrics_only(&self) -> Self {
        Self {
            attributes: Vec::new(),
            events: Vec::new(),
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.metrics.is_empty() && self.events.is_empty()
    }
}

/// Layout of one emission unit before declarations are rendered.
#[derive(Debug, Clone)]
pub struct UnitLayout<'m> {
    pub identifier: String,
    pub role: UnitRole,
    pub namespace: Option<String>,
    /// Leading key segment the unit already scopes; dropped from identifiers.
    pub scope_segment: Option<String>,
    pub slices: Vec<GroupSlice<'m>>,
    pub children: Vec<UnitLayout<'m>>,
}

impl<'m> UnitLayout<'m> {
    fn new(identifier: String, role: UnitRole, namespace: Option<&str>) -> Self {
        Self {
            identifier,
            role,
            namespace: namespace.map(str::to_string),
            scope_segment: None,
            slices: Vec::new(),
            children: Vec::new(),
        }
    }

    fn with_slices(mut self, slices: Vec<GroupSlice<'m>>) -> Self {
        self.slices = slices.into_iter().filter(|s| !s.is_empty()).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty() && self.children.is_empty()
    }

    pub fn has_metrics(&self) -> bool {
        self.slices.iter().any(|s| !s.metrics.is_empty())
    }
}

/// Groups sharing one root namespace, in model order.
#[derive(Debug)]
struct Namespace<'m> {
    root: &'m str,
    slices: Vec<GroupSlice<'m>>,
}

/// Partition `model` into unit layouts.
pub fn group_model<'m>(
    model: &'m SemanticModel,
    config: &CodegenConfig,
) -> CodegenResult<Vec<UnitLayout<'m>>> {
    for group in &model.groups {
        if group.root_namespace().is_empty() {
            return Err(CodegenError::invalid_namespace(&group.id));
        }
    }

    let visible: Vec<GroupSlice<'m>> = model
        .groups
        .iter()
        .filter(|g| config.include_experimental || !g.stability.is_experimental())
        .map(|g| GroupSlice::visible(g, config.include_experimental))
        .collect();

    if config.grouping_policy == GroupingPolicy::AttributesAndMetrics {
        check_metric_context(&visible)?;
    }

    let layouts = match config.grouping_policy {
        GroupingPolicy::All => namespaces(visible, config.namespace_order)
            .into_iter()
            .map(combined_unit)
            .filter(|u| !u.is_empty())
            .collect(),
        GroupingPolicy::AttributesAndMetrics => namespaces(visible, config.namespace_order)
            .into_iter()
            .flat_map(split_units)
            .collect(),
        GroupingPolicy::SingleFile => {
            let bundle = bundle_unit(
                &config.bundle_name,
                namespaces(visible, config.namespace_order),
            );
            if bundle.is_empty() {
                Vec::new()
            } else {
                vec![bundle]
            }
        }
        GroupingPolicy::NoGroupPrefix => per_group_units(visible, config),
    };

    let mut siblings = IdentifierScope::new("rendering plan");
    for layout in &layouts {
        claim_unit(&mut siblings, layout)?;
        let mut nested = IdentifierScope::new(&layout.identifier);
        for child in &layout.children {
            claim_unit(&mut nested, child)?;
        }
    }

    debug!(
        policy = %config.grouping_policy,
        units = layouts.len(),
        "grouped {} group(s)",
        model.groups.len()
    );
    Ok(layouts)
}

fn claim_unit(scope: &mut IdentifierScope, layout: &UnitLayout<'_>) -> CodegenResult<()> {
    let source = layout
        .slices
        .first()
        .map(|s| s.group.id.as_str())
        .or(layout.namespace.as_deref())
        .unwrap_or(&layout.identifier);
    scope.claim(&layout.identifier, source).map(|_| ())
}

/// A metric-kind group must carry its metric for the policy to know where
/// it belongs.
fn check_metric_context(visible: &[GroupSlice<'_>]) -> CodegenResult<()> {
    for slice in visible {
        let group = slice.group;
        if group.kind == GroupKind::Metric && group.metrics.is_empty() {
            return Err(CodegenError::missing_context(
                &group.id,
                "metric group declares no metric, so attributes_and_metrics cannot assign it a metrics unit",
            ));
        }
    }
    Ok(())
}

fn namespaces<'m>(visible: Vec<GroupSlice<'m>>, order: NamespaceOrder) -> Vec<Namespace<'m>> {
    let mut out: Vec<Namespace<'m>> = Vec::new();
    for slice in visible {
        let root = slice.group.root_namespace();
        match out.iter_mut().find(|ns| ns.root == root) {
            Some(ns) => ns.slices.push(slice),
            None => out.push(Namespace {
                root,
                slices: vec![slice],
            }),
        }
    }
    if order == NamespaceOrder::Alphabetical {
        out.sort_by(|a, b| a.root.cmp(b.root));
    }
    out
}

fn unit_name(base: &str, suffix: &str) -> String {
    format!("{}{suffix}", to_pascal_case(base))
}

fn combined_unit(ns: Namespace<'_>) -> UnitLayout<'_> {
    UnitLayout::new(
        unit_name(ns.root, ATTRIBUTES_SUFFIX),
        UnitRole::Combined,
        Some(ns.root),
    )
    .with_slices(ns.slices)
}

fn split_units(ns: Namespace<'_>) -> Vec<UnitLayout<'_>> {
    let attributes = UnitLayout::new(
        unit_name(ns.root, ATTRIBUTES_SUFFIX),
        UnitRole::Attributes,
        Some(ns.root),
    )
    .with_slices(ns.slices.iter().map(GroupSlice::attributes_only).collect());
    let metrics = UnitLayout::new(
        unit_name(ns.root, METRICS_SUFFIX),
        UnitRole::Metrics,
        Some(ns.root),
    )
    .with_slices(ns.slices.iter().map(GroupSlice::metrics_only).collect());

    let mut out = Vec::with_capacity(2);
    if !attributes.is_empty() {
        out.push(attributes);
    }
    if metrics.has_metrics() {
        out.push(metrics);
    }
    out
}

fn bundle_unit<'m>(name: &str, namespaces: Vec<Namespace<'m>>) -> UnitLayout<'m> {
    let mut bundle = UnitLayout::new(name.to_string(), UnitRole::Bundle, None);
    bundle.children = namespaces
        .into_iter()
        .map(combined_unit)
        .filter(|u| !u.is_empty())
        .collect();
    bundle
}

fn per_group_units<'m>(visible: Vec<GroupSlice<'m>>, config: &CodegenConfig) -> Vec<UnitLayout<'m>> {
    let mut units: Vec<UnitLayout<'m>> = visible
        .into_iter()
        .map(|slice| {
            let group = slice.group;
            let root = group.root_namespace();
            let mut unit = UnitLayout::new(
                unit_name(&group.id, ATTRIBUTES_SUFFIX),
                UnitRole::Combined,
                Some(root),
            );
            if config.strip_scope_prefix {
                unit.scope_segment = Some(root.to_string());
            }
            unit.with_slices(vec![slice])
        })
        .filter(|u| !u.is_empty())
        .collect();
    if config.namespace_order == NamespaceOrder::Alphabetical {
        units.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    }
    units
}
