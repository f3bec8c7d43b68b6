//! Metric descriptors
//!
//! A metric renders either as a name constant or as a builder factory. The
//! mode is chosen once per run from [`MetricMode`].

use serde::Serialize;

use crate::config::MetricMode;
use crate::error::{CodegenError, CodegenResult};
use crate::model::Metric;
use crate::naming::{to_doc_brief, to_pascal_case, IdentifierMapper};
use crate::plan::{BuilderCall, ConstantDecl, ConstantType, Declaration, FactoryDecl};

/// Instrument kinds a metric can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    Counter,
    UpDownCounter,
    Histogram,
    Gauge,
}

impl InstrumentKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "counter" => Some(InstrumentKind::Counter),
            "updowncounter" => Some(InstrumentKind::UpDownCounter),
            "histogram" => Some(InstrumentKind::Histogram),
            "gauge" => Some(InstrumentKind::Gauge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Counter => "counter",
            InstrumentKind::UpDownCounter => "updowncounter",
            InstrumentKind::Histogram => "histogram",
            InstrumentKind::Gauge => "gauge",
        }
    }

    /// Number type recorded when the metric does not say.
    pub fn default_number(&self) -> NumberType {
        match self {
            InstrumentKind::Counter | InstrumentKind::UpDownCounter => NumberType::Long,
            InstrumentKind::Histogram | InstrumentKind::Gauge => NumberType::Double,
        }
    }
}

/// Number type an instrument records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberType {
    Long,
    Double,
}

impl NumberType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "int" | "integer" | "long" => Some(NumberType::Long),
            "double" => Some(NumberType::Double),
            _ => None,
        }
    }
}

/// Render `metric` in the configured mode.
pub fn render_metric(
    metric: &Metric,
    mapper: &IdentifierMapper,
    mode: MetricMode,
) -> CodegenResult<Declaration> {
    let instrument = InstrumentKind::parse(metric.instrument.trim())
        .ok_or_else(|| CodegenError::unsupported_type(&metric.name, &metric.instrument))?;
    let const_name = mapper.map(&metric.name)?;

    match mode {
        MetricMode::NameConstant => Ok(Declaration::Constant(name_constant(
            metric, const_name, instrument,
        ))),
        MetricMode::BuilderFactory => {
            let number = match metric.value_type.as_deref() {
                Some(declared) => NumberType::parse(declared.trim())
                    .ok_or_else(|| CodegenError::unsupported_type(&metric.name, declared))?,
                None => instrument.default_number(),
            };
            Ok(Declaration::Factory(factory(
                metric, &const_name, instrument, number,
            )))
        }
    }
}

/// Constant identifier of a metric, independent of mode. Enum containers
/// attached to the metric are named from this.
pub fn metric_const_name(metric: &Metric, mapper: &IdentifierMapper) -> CodegenResult<String> {
    mapper.map(&metric.name)
}

/// `second_group.metric` → `createSecondGroupMetric`.
pub fn factory_identifier(const_name: &str) -> String {
    format!("create{}", to_pascal_case(const_name))
}

fn name_constant(metric: &Metric, identifier: String, instrument: InstrumentKind) -> ConstantDecl {
    let mut doc = Vec::new();
    let brief = to_doc_brief(&metric.brief);
    if !brief.is_empty() {
        doc.push(brief);
        doc.push(String::new());
    }
    doc.push(format!("Instrument: {}", instrument.as_str()));
    doc.push(format!("Unit: {}", metric.unit));

    ConstantDecl {
        identifier,
        literal: metric.name.clone(),
        ty: ConstantType::MetricName,
        doc,
    }
}

fn factory(
    metric: &Metric,
    const_name: &str,
    instrument: InstrumentKind,
    number: NumberType,
) -> FactoryDecl {
    let mut doc = Vec::new();
    let brief = to_doc_brief(&metric.brief);
    if !brief.is_empty() {
        doc.push(brief);
    }
    doc.push(format!(
        "Experimental: {}",
        metric.stability.is_experimental()
    ));

    let mut calls = Vec::with_capacity(2);
    if !metric.brief.trim().is_empty() {
        calls.push(BuilderCall::Description(metric.brief.trim().to_string()));
    }
    calls.push(BuilderCall::Unit(metric.unit.clone()));

    FactoryDecl {
        identifier: factory_identifier(const_name),
        metric_name: metric.name.clone(),
        instrument,
        number,
        calls,
        doc,
    }
}
