//! Template context construction.

use anyhow::{Context, Result};
use tera::Context as TeraContext;

use crate::model::{Generator, Template, Values};

/// Borrowed inputs of a render, turned into a [`TeraContext`] by [`build`](Self::build).
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub template: &'a Template,
    pub generator: &'a Generator,
    pub values: &'a Values,
}

impl<'a> RenderContext<'a> {
    pub const fn new(template: &'a Template, generator: &'a Generator, values: &'a Values) -> Self {
        Self {
            template,
            generator,
            values,
        }
    }

    /// Serialize the three namespaces into a Tera context.
    pub fn build(&self) -> Result<TeraContext> {
        let value = serde_json::json!({
            "template": serde_json::to_value(self.template)?,
            "generator": serde_json::to_value(self.generator)?,
            "values": serde_json::to_value(self.values)?,
        });
        TeraContext::from_value(value).context("Failed to build template context")
    }
}

/// Every dotted variable path available in `context`, for suggestions.
///
/// Arrays are not descended into; their elements are reachable only through
/// loops.
pub(crate) fn variable_paths(context: &TeraContext) -> Vec<String> {
    fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
        out.push(prefix.to_string());
        if let serde_json::Value::Object(map) = value {
            for (key, child) in map {
                walk(&format!("{prefix}.{key}"), child, out);
            }
        }
    }

    let mut paths = Vec::new();
    if let serde_json::Value::Object(map) = context.clone().into_json() {
        for (key, value) in &map {
            walk(key, value, &mut paths);
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_namespaces() {
        let template = Template {
            id: "base".to_string(),
            ..Default::default()
        };
        let generator = Generator {
            id: "app".to_string(),
            ..Default::default()
        };
        let mut values = Values::new();
        values.insert("name".to_string(), serde_json::json!("demo"));
        values.insert("features".to_string(), serde_json::json!({"auth": true}));

        let context = RenderContext::new(&template, &generator, &values).build().unwrap();
        let json = context.into_json();

        assert_eq!(json["template"]["id"], "base");
        assert_eq!(json["generator"]["id"], "app");
        assert_eq!(json["values"]["name"], "demo");
        assert_eq!(json["values"]["features"]["auth"], true);
    }

    #[test]
    fn test_variable_paths() {
        let template = Template::default();
        let generator = Generator::default();
        let mut values = Values::new();
        values.insert("project".to_string(), serde_json::json!({"name": "demo"}));

        let context = RenderContext::new(&template, &generator, &values).build().unwrap();
        let paths = variable_paths(&context);

        assert!(paths.contains(&"values.project.name".to_string()));
        assert!(paths.contains(&"template.id".to_string()));
        assert!(paths.contains(&"generator.type".to_string()));
    }
}
