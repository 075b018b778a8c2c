//! File emitters
//!
//! Pure functions turning structured parameters into an [`Artifact`]. Paths
//! are relative to the project root; nothing here touches the filesystem.

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::path::PathBuf;

use crate::generation::naming::{MountSegment, unique_singular_segments};
use crate::generation::sanitizers::{
    escape_single_quoted, escape_template_literal, rewrite_path_placeholders,
};
use crate::generation::{Artifact, GenerationError, HttpMethod, TemplateKind, TemplateRenderer};

/// Location of the server entrypoint
pub const ENTRYPOINT_PATH: &str = "src/index.js";
/// File name of aggregator and service modules
pub const INDEX_FILE: &str = "index.js";
/// Dependency manifest at the project root
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Parameters for the server entrypoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrypointParams {
    pub port: u16,
    /// Controller directory relative to `src`, used for the aggregator import
    pub controller_path: String,
}

/// Parameters for an outbound-call module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceParams {
    pub name: String,
    /// Target URI; may embed `${params.x}` or `{x}` placeholders
    pub uri: String,
    pub method: HttpMethod,
    pub service_path: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Serialize)]
struct Mount<'a> {
    name: &'a str,
    segment: &'a str,
}

/// Renders `src/index.js`
pub fn emit_entrypoint(
    renderer: &dyn TemplateRenderer,
    params: &EntrypointParams,
) -> Result<Artifact, GenerationError> {
    let content = renderer.render(
        TemplateKind::Entrypoint,
        &json!({
            "port": params.port,
            "controller_path": escape_single_quoted(params.controller_path.trim_matches('/')),
        }),
    )?;
    Ok(Artifact::new(ENTRYPOINT_PATH, content))
}

/// Renders the controller aggregator, mounting each controller under its
/// singular segment in input order. Names whose segment collides with an
/// earlier one are left out entirely.
pub fn emit_controller_index(
    renderer: &dyn TemplateRenderer,
    names: &[String],
    controller_path: &str,
) -> Result<Artifact, GenerationError> {
    let segments = unique_singular_segments(names);

    let mounts: Vec<Mount<'_>> = names
        .iter()
        .zip(&segments)
        .filter_map(|(name, segment)| match segment {
            MountSegment::Unique(segment) => Some(Mount { name, segment }),
            MountSegment::Coalesced { segment, first } => {
                tracing::warn!(
                    controller = %name,
                    segment = %segment,
                    kept = %names[*first],
                    "Mount segment already claimed, dropping controller from index"
                );
                None
            }
        })
        .collect();

    let content = renderer.render(TemplateKind::ControllerIndex, &json!({ "mounts": mounts }))?;
    Ok(Artifact::new(
        PathBuf::from(controller_path).join(INDEX_FILE),
        content,
    ))
}

/// Renders the service barrel file re-exporting every service in order
pub fn emit_service_index(
    renderer: &dyn TemplateRenderer,
    names: &[String],
    service_path: &str,
) -> Result<Artifact, GenerationError> {
    let content = renderer.render(TemplateKind::ServiceIndex, &json!({ "names": names }))?;
    Ok(Artifact::new(
        PathBuf::from(service_path).join(INDEX_FILE),
        content,
    ))
}

/// Path of a service module relative to the project root
pub fn service_module_path(service_path: &str, name: &str) -> PathBuf {
    PathBuf::from(service_path).join(name).join(INDEX_FILE)
}

/// Renders `<service_path>/<name>/index.js`
pub fn emit_service(
    renderer: &dyn TemplateRenderer,
    params: &ServiceParams,
) -> Result<Artifact, GenerationError> {
    let uri = escape_template_literal(&rewrite_path_placeholders(&params.uri));
    let content = renderer.render(
        TemplateKind::Service,
        &json!({
            "name": params.name,
            "uri": uri,
            "method": params.method.as_str(),
            "has_body": params.method.allows_body(),
            "timeout_ms": params.timeout_ms,
        }),
    )?;
    Ok(Artifact::new(
        service_module_path(&params.service_path, &params.name),
        content,
    ))
}

/// Patches the manifest written by `npm init` into an ES-module project
/// with start and dev scripts. Keys already present keep their position.
pub fn emit_package_manifest(
    existing: Option<&str>,
    project_name: &str,
) -> Result<Artifact, GenerationError> {
    let mut manifest = match existing.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => map,
            _ => {
                return Err(GenerationError::InvalidManifest(
                    "package.json must contain a JSON object".to_string(),
                ));
            }
        },
        None => Map::new(),
    };

    manifest.insert("name".to_string(), json!(project_name));
    manifest.insert("type".to_string(), json!("module"));
    manifest.insert("main".to_string(), json!(ENTRYPOINT_PATH));
    manifest.insert(
        "scripts".to_string(),
        json!({
            "start": format!("node {ENTRYPOINT_PATH}"),
            "dev": format!("nodemon {ENTRYPOINT_PATH}"),
        }),
    );

    let mut content = serde_json::to_string_pretty(&Value::Object(manifest))?;
    content.push('\n');
    Ok(Artifact::new(PACKAGE_MANIFEST, content))
}
