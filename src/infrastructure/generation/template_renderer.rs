//! Tera-based template renderer with the Express templates embedded

use tera::{Context, Tera};

use crate::generation::{GenerationError, TemplateKind, TemplateRenderer};

fn template_source(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Entrypoint => {
            include_str!("../../../templates/express/entrypoint.js.tera")
        }
        TemplateKind::ControllerIndex => {
            include_str!("../../../templates/express/controller_index.js.tera")
        }
        TemplateKind::ServiceIndex => {
            include_str!("../../../templates/express/service_index.js.tera")
        }
        TemplateKind::Service => include_str!("../../../templates/express/service.js.tera"),
        TemplateKind::ControllerHead => {
            include_str!("../../../templates/express/controller.js.tera")
        }
        TemplateKind::RouteHandler => {
            include_str!("../../../templates/express/route_handler.js.tera")
        }
    }
}

/// Tera-based template renderer
pub struct TeraTemplateRenderer {
    tera: Tera,
}

impl TeraTemplateRenderer {
    /// Compile every embedded template
    pub fn new() -> Result<Self, GenerationError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(
            TemplateKind::ALL
                .iter()
                .map(|kind| (kind.name(), template_source(*kind))),
        )?;
        Ok(Self { tera })
    }
}

impl TemplateRenderer for TeraTemplateRenderer {
    fn render(
        &self,
        template: TemplateKind,
        context: &serde_json::Value,
    ) -> Result<String, GenerationError> {
        let tera_context = Context::from_value(context.clone())?;

        tracing::trace!(template = template.name(), "Rendering template");

        Ok(self.tera.render(template.name(), &tera_context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_templates_compile() {
        let renderer = TeraTemplateRenderer::new().unwrap();
        let names: Vec<&str> = renderer.tera.get_template_names().collect();
        for kind in TemplateKind::ALL {
            assert!(names.contains(&kind.name()), "missing {}", kind.name());
        }
    }

    #[test]
    fn test_templates_are_not_html_escaped() {
        let renderer = TeraTemplateRenderer::new().unwrap();
        let rendered = renderer
            .render(
                TemplateKind::Service,
                &json!({
                    "name": "search",
                    "uri": "https://api.example.com/search?a=1&b=<2>",
                    "method": "GET",
                    "has_body": false,
                    "timeout_ms": 1000,
                }),
            )
            .unwrap();

        assert!(rendered.contains("`https://api.example.com/search?a=1&b=<2>`"));
    }

    #[test]
    fn test_missing_variable_is_render_error() {
        let renderer = TeraTemplateRenderer::new().unwrap();
        let result = renderer.render(TemplateKind::Entrypoint, &json!({ "port": 3000 }));
        assert!(matches!(result, Err(GenerationError::RenderError(_))));
    }

    #[test]
    fn test_non_object_context_is_render_error() {
        let renderer = TeraTemplateRenderer::new().unwrap();
        let result = renderer.render(TemplateKind::Entrypoint, &json!(["not", "an", "object"]));
        assert!(matches!(result, Err(GenerationError::RenderError(_))));
    }
}
