//! Rendering of input variables as `-var` command line arguments.
//!
//! Top-level strings are passed through unquoted, the way Terraform reads
//! `-var name=value`. Everything else is written as an HCL literal so lists
//! and maps keep their structure.

use std::collections::BTreeMap;

use serde_json::Value;

/// Builds `-var name=value` argument pairs, ordered by variable name.
pub fn var_args(vars: &BTreeMap<String, Value>) -> Vec<String> {
    let mut args = Vec::with_capacity(vars.len() * 2);
    for (name, value) in vars {
        args.push("-var".to_string());
        args.push(format!("{}={}", name, render_var(value)));
    }
    args
}

/// Renders a variable value as it appears after `name=`.
pub fn render_var(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => render_literal(other),
    }
}

fn render_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} = {}", quote(k), render_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn quote(s: &str) -> String {
    // JSON string escaping is a subset HCL accepts.
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_pass_through_unquoted() {
        assert_eq!(
            render_var(&json!("my-devops-project-pipeline")),
            "my-devops-project-pipeline"
        );
    }

    #[test]
    fn scalars_render_as_literals() {
        assert_eq!(render_var(&json!(3)), "3");
        assert_eq!(render_var(&json!(true)), "true");
        assert_eq!(render_var(&Value::Null), "null");
    }

    #[test]
    fn lists_quote_nested_strings() {
        assert_eq!(render_var(&json!(["a", 1, false])), r#"["a", 1, false]"#);
    }

    #[test]
    fn maps_render_with_sorted_quoted_keys() {
        let value = json!({"team": "devops", "env": "dev", "tags": ["x"]});
        assert_eq!(
            render_var(&value),
            r#"{"env" = "dev", "tags" = ["x"], "team" = "devops"}"#
        );
    }

    #[test]
    fn nested_strings_escape_quotes() {
        assert_eq!(render_var(&json!(["say \"hi\""])), r#"["say \"hi\""]"#);
    }

    #[test]
    fn var_args_pairs_flag_and_assignment() {
        let mut vars = BTreeMap::new();
        vars.insert("codepipeline_name".to_string(), json!("pipe"));
        vars.insert("branch".to_string(), json!("main"));

        assert_eq!(
            var_args(&vars),
            vec!["-var", "branch=main", "-var", "codepipeline_name=pipe"]
        );
    }
}
