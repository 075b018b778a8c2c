//! Port interfaces for the generation domain

use crate::generation::GenerationError;

/// Source templates the emitters render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Entrypoint,
    ControllerIndex,
    ServiceIndex,
    Service,
    /// Controller boilerplate plus service imports, up to the router declaration
    ControllerHead,
    /// A single route handler block
    RouteHandler,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::Entrypoint,
        TemplateKind::ControllerIndex,
        TemplateKind::ServiceIndex,
        TemplateKind::Service,
        TemplateKind::ControllerHead,
        TemplateKind::RouteHandler,
    ];

    /// Registered template name
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::Entrypoint => "entrypoint.js",
            TemplateKind::ControllerIndex => "controller_index.js",
            TemplateKind::ServiceIndex => "service_index.js",
            TemplateKind::Service => "service.js",
            TemplateKind::ControllerHead => "controller.js",
            TemplateKind::RouteHandler => "route_handler.js",
        }
    }
}

/// Renders a template with a JSON context
pub trait TemplateRenderer: Send + Sync {
    fn render(
        &self,
        template: TemplateKind,
        context: &serde_json::Value,
    ) -> Result<String, GenerationError>;
}
