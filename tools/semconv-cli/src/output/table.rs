//! Table Output Formatting

use colored::Colorize;
use semconv_codegen::plan::ConstantType;
use semconv_codegen::{Declaration, EmissionUnit, RenderingPlan, UnitRole};
use tabled::{builder::Builder, settings::Style};

/// Format the plan's units as a table, children indented under their bundle
pub fn format_units_table(plan: &RenderingPlan) -> String {
    if plan.units.is_empty() {
        return "No units to emit".to_string();
    }

    let mut builder = Builder::default();

    // Add header
    builder.push_record(vec!["Unit", "Role", "Namespace", "Declarations"]);

    // Add rows
    let mut rows = Vec::new();
    for unit in &plan.units {
        unit_rows(unit, 0, &mut rows);
    }
    for (depth, unit) in rows {
        let role = match unit.role {
            UnitRole::Combined => "combined".to_string(),
            UnitRole::Attributes => "attributes".cyan().to_string(),
            UnitRole::Metrics => "metrics".green().to_string(),
            UnitRole::Bundle => "bundle".yellow().to_string(),
        };
        builder.push_record(vec![
            format!("{}{}", "  ".repeat(depth), unit.identifier),
            role,
            unit.namespace.clone().unwrap_or_else(|| "-".to_string()),
            unit.declarations.len().to_string(),
        ]);
    }

    builder.build().with(Style::modern()).to_string()
}

fn unit_rows<'a>(unit: &'a EmissionUnit, depth: usize, out: &mut Vec<(usize, &'a EmissionUnit)>) {
    out.push((depth, unit));
    for child in &unit.children {
        unit_rows(child, depth + 1, out);
    }
}

/// Format every declaration in emission order
pub fn format_declarations_table(plan: &RenderingPlan) -> String {
    if plan.declaration_count() == 0 {
        return "No declarations to emit".to_string();
    }

    let mut builder = Builder::default();

    // Add header
    builder.push_record(vec!["Unit", "Kind", "Identifier", "Value"]);

    // Add rows
    for unit in plan.walk() {
        for decl in &unit.declarations {
            let (kind, value) = describe(decl);
            builder.push_record(vec![
                unit.identifier.clone(),
                kind,
                decl.identifier().to_string(),
                value,
            ]);
        }
    }

    builder.build().with(Style::modern()).to_string()
}

fn describe(decl: &Declaration) -> (String, String) {
    match decl {
        Declaration::Constant(c) => {
            let kind = match c.ty {
                ConstantType::Key(_) => "key",
                ConstantType::MetricName => "metric",
                ConstantType::EventName => "event",
            };
            (kind.to_string(), c.literal.clone())
        }
        Declaration::TemplatedConstant(c) => ("template".cyan().to_string(), c.literal.clone()),
        Declaration::EnumContainer(e) => {
            let members: Vec<String> = e
                .members
                .iter()
                .map(|m| format!("{}={}", m.identifier, m.value))
                .collect();
            ("values".yellow().to_string(), members.join(", "))
        }
        Declaration::Factory(f) => (
            "factory".green().to_string(),
            format!("{} {}", f.instrument.as_str(), f.metric_name),
        ),
    }
}
