//! Template rendering infrastructure

pub mod template_renderer;

pub use template_renderer::TeraTemplateRenderer;
