//! Controller synthesis
//!
//! A controller file owns one Express router. The first request for a name
//! creates the file; every later request for the same name appends another
//! route handler to it. The merge is a pure function over the previous file
//! content so it can be tested without a filesystem.
//!
//! Layout of a synthesized file:
//!
//! ```text
//! <imports added by later merges>
//! import express from 'express';
//! <imports of the first request>
//!
//! const router = express.Router();
//!
//! <route handler 1>
//!
//! <route handler N>
//!
//! export default router;
//! ```

use regex::Regex;
use serde_json::json;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::generation::sanitizers::escape_single_quoted;
use crate::generation::{
    EndpointSpec, GenerationError, ServiceImport, TemplateKind, TemplateRenderer,
};

/// Statement closing every controller file
pub const DEFAULT_EXPORT: &str = "export default router;";

/// Prefix of the default export, matching formatted and unformatted files
const DEFAULT_EXPORT_MARKER: &str = "export default router";

/// Path of a controller file relative to the project root
pub fn controller_file_path(controller_path: &str, name: &str) -> PathBuf {
    PathBuf::from(controller_path).join(format!("{name}.js"))
}

/// Module specifier importing `<service_dir>/<name>/index.js` from a file
/// inside `controller_dir`. Both directories are relative to the project root.
///
/// # Examples
/// ```
/// use routesmith::generation::controller::service_import_specifier;
/// use std::path::Path;
///
/// assert_eq!(
///     service_import_specifier(
///         Path::new("src/controllers"),
///         Path::new("src/services"),
///         "listOrders"
///     ),
///     "../services/listOrders/index.js"
/// );
/// ```
pub fn service_import_specifier(
    controller_dir: &Path,
    service_dir: &Path,
    name: &str,
) -> String {
    fn parts(path: &Path) -> Vec<String> {
        path.components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }

    let from = parts(controller_dir);
    let to = parts(service_dir);
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut segments: Vec<String> = Vec::new();
    if from.len() == common {
        segments.push(".".to_string());
    } else {
        segments.extend(std::iter::repeat_n("..".to_string(), from.len() - common));
    }
    segments.extend(to[common..].iter().cloned());
    segments.push(name.to_string());
    segments.push("index.js".to_string());
    segments.join("/")
}

fn render_handler(
    renderer: &dyn TemplateRenderer,
    endpoint: &EndpointSpec,
) -> Result<String, GenerationError> {
    let handler = renderer.render(
        TemplateKind::RouteHandler,
        &json!({
            "router_fn": endpoint.method.router_fn(),
            "url_pattern": escape_single_quoted(&endpoint.url_pattern),
            "services": endpoint.services,
        }),
    )?;
    Ok(handler.trim_end().to_string())
}

fn render_import(import: &ServiceImport) -> String {
    format!(
        "import {{ {} }} from '{}';",
        import.name,
        escape_single_quoted(&import.specifier)
    )
}

/// Whether `content` already binds `name` through a named import
fn imports_binding(content: &str, name: &str) -> bool {
    let pattern = format!(r"(?m)^\s*import\s*\{{\s*{}\s*\}}", regex::escape(name));
    Regex::new(&pattern)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

/// Produces the new content of a controller file.
///
/// `existing` is the current file content, if the file exists. `imports`
/// must list one import per service in `endpoint.services`.
///
/// With no existing content a fresh file is rendered. Otherwise everything
/// before the last default export is kept verbatim, imports for services not
/// yet bound are placed in front of it, the new handler is appended and the
/// single default export is restored at the end.
pub fn synthesize_controller(
    renderer: &dyn TemplateRenderer,
    existing: Option<&str>,
    endpoint: &EndpointSpec,
    imports: &[ServiceImport],
) -> Result<String, GenerationError> {
    if endpoint.services.is_empty() {
        return Err(GenerationError::MissingServices(endpoint.name.clone()));
    }

    let handler = render_handler(renderer, endpoint)?;

    // One import per binding, even when a service is listed twice
    let mut seen = HashSet::new();
    let imports: Vec<&ServiceImport> = imports
        .iter()
        .filter(|import| seen.insert(import.name.as_str()))
        .collect();

    let prefix = existing
        .map(|content| match content.rfind(DEFAULT_EXPORT_MARKER) {
            Some(idx) => &content[..idx],
            None => content,
        })
        .map(str::trim)
        .filter(|prefix| !prefix.is_empty());

    let Some(prefix) = prefix else {
        let head =
            renderer.render(TemplateKind::ControllerHead, &json!({ "imports": imports }))?;
        return Ok(format!(
            "{}\n\n{}\n\n{}\n",
            head.trim_end(),
            handler,
            DEFAULT_EXPORT
        ));
    };

    let new_imports: Vec<String> = imports
        .iter()
        .filter(|import| !imports_binding(prefix, &import.name))
        .map(|import| render_import(import))
        .collect();

    let mut content = String::with_capacity(prefix.len() + handler.len() + 128);
    for line in &new_imports {
        content.push_str(line);
        content.push('\n');
    }
    content.push_str(prefix);
    content.push_str("\n\n");
    content.push_str(&handler);
    content.push_str("\n\n");
    content.push_str(DEFAULT_EXPORT);
    content.push('\n');
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::HttpMethod;
    use crate::infrastructure::generation::TeraTemplateRenderer;

    fn renderer() -> TeraTemplateRenderer {
        TeraTemplateRenderer::new().expect("templates compile")
    }

    fn imports_for(services: &[&str]) -> Vec<ServiceImport> {
        services
            .iter()
            .map(|name| ServiceImport {
                name: name.to_string(),
                specifier: service_import_specifier(
                    Path::new("src/controllers"),
                    Path::new("src/services"),
                    name,
                ),
            })
            .collect()
    }

    fn endpoint(services: &[&str]) -> EndpointSpec {
        EndpointSpec::new(
            "orders",
            services.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_fresh_controller() {
        let content = synthesize_controller(
            &renderer(),
            None,
            &endpoint(&["listOrders"]),
            &imports_for(&["listOrders"]),
        )
        .unwrap();

        assert!(content.starts_with("import express from 'express';\n"));
        assert!(content.contains("import { listOrders } from '../services/listOrders/index.js';"));
        assert!(content.contains("const router = express.Router();"));
        assert!(content.contains("router.get('/', async (req, res) => {"));
        assert!(content.contains("const { params, body, query } = req;"));
        assert!(content.contains(
            "finalData['listOrders'] = await listOrders({ params, body, query });"
        ));
        assert!(content.contains("res.json(finalData);"));
        assert!(content.contains("res.status(500).json({ error: error.message });"));
        assert!(content.ends_with("export default router;\n"));
    }

    #[test]
    fn test_fresh_controller_calls_services_in_order() {
        let content = synthesize_controller(
            &renderer(),
            None,
            &endpoint(&["getUser", "getOrders"]).with_url_pattern("/:userId"),
            &imports_for(&["getUser", "getOrders"]),
        )
        .unwrap();

        let user = content.find("await getUser(").unwrap();
        let orders = content.find("await getOrders(").unwrap();
        assert!(user < orders);
        assert!(content.contains("router.get('/:userId', async"));
    }

    #[test]
    fn test_merge_accretes_handlers() {
        let renderer = renderer();
        let first = synthesize_controller(
            &renderer,
            None,
            &endpoint(&["listOrders"]),
            &imports_for(&["listOrders"]),
        )
        .unwrap();

        let second = synthesize_controller(
            &renderer,
            Some(&first),
            &endpoint(&["cancelOrder"])
                .with_method(HttpMethod::Delete)
                .with_url_pattern("/:id"),
            &imports_for(&["cancelOrder"]),
        )
        .unwrap();

        assert_eq!(second.matches("const router = express.Router();").count(), 1);
        assert_eq!(second.matches("export default router").count(), 1);
        assert_eq!(second.matches("async (req, res) =>").count(), 2);
        assert!(second.trim_end().ends_with(DEFAULT_EXPORT));

        let import = second
            .find("import { cancelOrder } from '../services/cancelOrder/index.js';")
            .unwrap();
        assert!(import < second.find("import express").unwrap());

        let handlers: Vec<&str> = second.split("router.").skip(1).collect();
        let list = handlers
            .iter()
            .find(|h| h.starts_with("get('/'"))
            .unwrap();
        let cancel = handlers
            .iter()
            .find(|h| h.starts_with("delete('/:id'"))
            .unwrap();
        assert!(list.contains("listOrders(") && !list.contains("cancelOrder("));
        assert!(cancel.contains("cancelOrder(") && !cancel.contains("listOrders("));
    }

    #[test]
    fn test_merge_does_not_duplicate_existing_import() {
        let renderer = renderer();
        let first = synthesize_controller(
            &renderer,
            None,
            &endpoint(&["listOrders"]),
            &imports_for(&["listOrders"]),
        )
        .unwrap();

        let second = synthesize_controller(
            &renderer,
            Some(&first),
            &endpoint(&["listOrders"]).with_url_pattern("/recent"),
            &imports_for(&["listOrders"]),
        )
        .unwrap();

        assert_eq!(second.matches("import { listOrders }").count(), 1);
        assert_eq!(second.matches("await listOrders(").count(), 2);
    }

    #[test]
    fn test_duplicate_services_import_once() {
        let renderer = renderer();
        let services = ["listOrders", "listOrders"];

        let fresh = synthesize_controller(
            &renderer,
            None,
            &endpoint(&services),
            &imports_for(&services),
        )
        .unwrap();
        assert_eq!(fresh.matches("import { listOrders }").count(), 1);

        let existing = "import express from 'express';\n\n\
                        const router = express.Router();\n\n\
                        export default router;\n";
        let merged = synthesize_controller(
            &renderer,
            Some(existing),
            &endpoint(&services).with_url_pattern("/again"),
            &imports_for(&services),
        )
        .unwrap();
        assert_eq!(merged.matches("import { listOrders }").count(), 1);
        assert_eq!(merged.matches("export default router").count(), 1);
    }

    #[test]
    fn test_merge_recognizes_formatted_file() {
        let formatted = r#"import express from "express";
import { getTodosService } from "../services/getTodosService/index.js";
const router = express.Router();

router.get("/", async (req, res) => {
  res.json({});
});

export default router;
"#;
        let merged = synthesize_controller(
            &renderer(),
            Some(formatted),
            &EndpointSpec::new("todos", vec!["getTodosService".to_string()])
                .with_url_pattern("/:id"),
            &imports_for(&["getTodosService"]),
        )
        .unwrap();

        assert_eq!(merged.matches("import { getTodosService }").count(), 1);
        assert_eq!(merged.matches("export default router").count(), 1);
        assert!(merged.contains("router.get('/:id', async"));
        assert!(merged.starts_with("import express from \"express\";"));
    }

    #[test]
    fn test_merge_without_export_appends_one() {
        let existing = "import express from 'express';\nconst router = express.Router();\n";
        let merged = synthesize_controller(
            &renderer(),
            Some(existing),
            &endpoint(&["listOrders"]),
            &imports_for(&["listOrders"]),
        )
        .unwrap();

        assert_eq!(merged.matches(DEFAULT_EXPORT).count(), 1);
        assert!(merged.starts_with("import { listOrders }"));
    }

    #[test]
    fn test_blank_existing_file_is_treated_as_fresh() {
        let merged = synthesize_controller(
            &renderer(),
            Some("  \n"),
            &endpoint(&["listOrders"]),
            &imports_for(&["listOrders"]),
        )
        .unwrap();

        assert!(merged.starts_with("import express from 'express';"));
        assert_eq!(merged.matches("const router").count(), 1);
    }

    #[test]
    fn test_empty_services_rejected() {
        let result = synthesize_controller(&renderer(), Some("keep me"), &endpoint(&[]), &[]);
        match result {
            Err(GenerationError::MissingServices(name)) => assert_eq!(name, "orders"),
            other => panic!("Expected MissingServices, got {other:?}"),
        }
    }

    #[test]
    fn test_url_pattern_is_escaped() {
        let content = synthesize_controller(
            &renderer(),
            None,
            &endpoint(&["listOrders"]).with_url_pattern("/o'brien"),
            &imports_for(&["listOrders"]),
        )
        .unwrap();

        assert!(content.contains("router.get('/o\\'brien', async"));
    }

    #[test]
    fn test_service_import_specifier() {
        assert_eq!(
            service_import_specifier(Path::new("src/controllers"), Path::new("src/services"), "a"),
            "../services/a/index.js"
        );
        assert_eq!(
            service_import_specifier(
                Path::new("./src/controllers"),
                Path::new("src/services"),
                "a"
            ),
            "../services/a/index.js"
        );
        assert_eq!(
            service_import_specifier(Path::new("src/api/routes"), Path::new("lib/clients"), "b"),
            "../../../lib/clients/b/index.js"
        );
        assert_eq!(
            service_import_specifier(Path::new("src"), Path::new("src/services"), "c"),
            "./services/c/index.js"
        );
    }

    #[test]
    fn test_controller_file_path() {
        assert_eq!(
            controller_file_path("src/controllers", "orders"),
            PathBuf::from("src/controllers/orders.js")
        );
    }
}
