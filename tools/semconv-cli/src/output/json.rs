//! JSON Output Formatting

use semconv_codegen::RenderingPlan;
use serde::Serialize;

/// Format data as pretty JSON
pub fn format_json_pretty<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Format data as compact JSON (one line)
pub fn format_json_compact<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

/// Format a rendering plan as JSON
pub fn format_plan_json(plan: &RenderingPlan, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        format_json_pretty(plan)
    } else {
        format_json_compact(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semconv_codegen::{render_plan, CodegenConfig, SemanticModel};

    #[test]
    fn test_plan_json_formatting() {
        let model = SemanticModel::from_toml(
            r#"
[[groups]]
id = "first"

[[groups.attributes]]
key = "first.attr_one"
type = "boolean"
"#,
        )
        .unwrap();
        let plan = render_plan(&model, &CodegenConfig::default()).unwrap();

        let pretty = format_plan_json(&plan, true).unwrap();
        assert!(pretty.contains('\n')); // Pretty has newlines
        assert!(pretty.contains("\"FIRST_ATTR_ONE\""), "Missing identifier:\n{pretty}");

        let compact = format_plan_json(&plan, false).unwrap();
        assert!(!compact.contains('\n')); // Compact is one line
    }
}
