//! Generation requests
//!
//! The orchestration layer speaks in `(name, args)` calls. They are parsed
//! exactly once, here, into the closed [`GenerationRequest`] enum: arguments
//! are type-checked, defaults are filled in and names are validated before
//! any handler runs.

use serde::Deserialize;
use std::collections::HashSet;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::application::RequestError;
use crate::generation::HttpMethod;
use crate::generation::rules::{validate_identifier, validate_project_name, validate_relative_dir};

pub const CREATE_PROJECT_FOLDER: &str = "create_project_folder";
pub const INSTALL_DEPENDENCIES: &str = "install_dependencies";
pub const FORMAT_FILES: &str = "format_files";
pub const GENERATE_ENTRYPOINT: &str = "generate_entrypoint";
pub const GENERATE_CONTROLLER_INDEX: &str = "generate_controller_index";
pub const GENERATE_CONTROLLER: &str = "generate_controller";
pub const GENERATE_SERVICES_INDEX: &str = "generate_services_index";
pub const GENERATE_SERVICE: &str = "generate_service";

/// Every request name the driver understands
pub const REQUEST_NAMES: [&str; 8] = [
    CREATE_PROJECT_FOLDER,
    INSTALL_DEPENDENCIES,
    FORMAT_FILES,
    GENERATE_ENTRYPOINT,
    GENERATE_CONTROLLER_INDEX,
    GENERATE_CONTROLLER,
    GENERATE_SERVICES_INDEX,
    GENERATE_SERVICE,
];

pub const DEFAULT_PROJECT_NAME: &str = "node_api";
pub const DEFAULT_PORT: u16 = 3000;
/// Entrypoint import path of the controller directory, relative to `src`
pub const DEFAULT_ENTRYPOINT_CONTROLLER_PATH: &str = "controllers";
pub const DEFAULT_CONTROLLER_PATH: &str = "src/controllers";
pub const DEFAULT_SERVICE_PATH: &str = "src/services";
pub const DEFAULT_ENDPOINT: &str = "/";

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_entrypoint_controller_path() -> String {
    DEFAULT_ENTRYPOINT_CONTROLLER_PATH.to_string()
}

fn default_controller_path() -> String {
    DEFAULT_CONTROLLER_PATH.to_string()
}

fn default_service_path() -> String {
    DEFAULT_SERVICE_PATH.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// One raw call from the orchestration layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

impl RequestCall {
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateProjectArgs {
    pub project_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallDependenciesArgs {
    #[serde(default = "default_project_name")]
    pub project_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntrypointArgs {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_entrypoint_controller_path")]
    pub controller_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControllerIndexArgs {
    #[serde(default)]
    pub controller_names: Vec<String>,
    #[serde(default = "default_controller_path")]
    pub controller_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControllerArgs {
    pub controller_name: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default = "default_controller_path")]
    pub controller_path: String,
    #[serde(default = "default_service_path")]
    pub service_path: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceIndexArgs {
    #[serde(default)]
    pub service_names: Vec<String>,
    #[serde(default = "default_service_path")]
    pub service_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceArgs {
    pub service_name: String,
    pub uri: String,
    #[serde(default = "default_service_path")]
    pub service_path: String,
    #[serde(default)]
    pub method: HttpMethod,
}

/// A validated generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    CreateProjectRoot(CreateProjectArgs),
    InstallDependencies(InstallDependenciesArgs),
    FormatSources,
    EmitEntrypoint(EntrypointArgs),
    EmitControllerIndex(ControllerIndexArgs),
    SynthesizeController(ControllerArgs),
    EmitServiceIndex(ServiceIndexArgs),
    EmitService(ServiceArgs),
}

fn parse_args<T: DeserializeOwned>(request: &str, args: Value) -> Result<T, RequestError> {
    let args = match args {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| RequestError::invalid_arguments(request, e))
}

impl GenerationRequest {
    /// Parse, default-fill and validate a raw call
    pub fn from_call(name: &str, args: Value) -> Result<Self, RequestError> {
        let request = match name {
            CREATE_PROJECT_FOLDER => Self::CreateProjectRoot(parse_args(name, args)?),
            INSTALL_DEPENDENCIES => Self::InstallDependencies(parse_args(name, args)?),
            FORMAT_FILES => Self::FormatSources,
            GENERATE_ENTRYPOINT => Self::EmitEntrypoint(parse_args(name, args)?),
            GENERATE_CONTROLLER_INDEX => Self::EmitControllerIndex(parse_args(name, args)?),
            GENERATE_CONTROLLER => Self::SynthesizeController(parse_args(name, args)?),
            GENERATE_SERVICES_INDEX => Self::EmitServiceIndex(parse_args(name, args)?),
            GENERATE_SERVICE => Self::EmitService(parse_args(name, args)?),
            other => return Err(RequestError::UnknownRequest(other.to_string())),
        };
        request.validate()?;
        Ok(request)
    }

    /// External name of this request
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateProjectRoot(_) => CREATE_PROJECT_FOLDER,
            Self::InstallDependencies(_) => INSTALL_DEPENDENCIES,
            Self::FormatSources => FORMAT_FILES,
            Self::EmitEntrypoint(_) => GENERATE_ENTRYPOINT,
            Self::EmitControllerIndex(_) => GENERATE_CONTROLLER_INDEX,
            Self::SynthesizeController(_) => GENERATE_CONTROLLER,
            Self::EmitServiceIndex(_) => GENERATE_SERVICES_INDEX,
            Self::EmitService(_) => GENERATE_SERVICE,
        }
    }

    fn validate(&self) -> Result<(), RequestError> {
        match self {
            Self::CreateProjectRoot(args) => validate_project_name(&args.project_name)?,
            Self::InstallDependencies(args) => validate_project_name(&args.project_name)?,
            Self::FormatSources => {}
            Self::EmitEntrypoint(args) => validate_relative_dir(&args.controller_path)?,
            Self::EmitControllerIndex(args) => {
                validate_relative_dir(&args.controller_path)?;
                for name in &args.controller_names {
                    validate_identifier(name)?;
                }
            }
            Self::SynthesizeController(args) => {
                validate_identifier(&args.controller_name)?;
                validate_relative_dir(&args.controller_path)?;
                validate_relative_dir(&args.service_path)?;
                let mut seen = HashSet::new();
                for name in &args.services {
                    validate_identifier(name)?;
                    if !seen.insert(name.as_str()) {
                        return Err(RequestError::invalid_arguments(
                            GENERATE_CONTROLLER,
                            format!("service '{name}' is listed more than once"),
                        ));
                    }
                }
            }
            Self::EmitServiceIndex(args) => {
                validate_relative_dir(&args.service_path)?;
                for name in &args.service_names {
                    validate_identifier(name)?;
                }
            }
            Self::EmitService(args) => {
                validate_identifier(&args.service_name)?;
                validate_relative_dir(&args.service_path)?;
                if args.uri.trim().is_empty() {
                    return Err(RequestError::invalid_arguments(
                        GENERATE_SERVICE,
                        "uri cannot be empty",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<RequestCall> for GenerationRequest {
    type Error = RequestError;

    fn try_from(call: RequestCall) -> Result<Self, Self::Error> {
        Self::from_call(&call.name, call.args)
    }
}

/// Tool declarations for the orchestration layer: one JSON schema per
/// request, in the shape function-calling model APIs expect.
pub fn declarations() -> Vec<Value> {
    let string = |description: &str| json!({ "type": "string", "description": description });
    let string_list = |description: &str| {
        json!({ "type": "array", "items": { "type": "string" }, "description": description })
    };
    let method = json!({
        "type": "string",
        "enum": ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"],
        "description": "HTTP method. Default is GET."
    });

    vec![
        json!({
            "name": CREATE_PROJECT_FOLDER,
            "description": "Creates the project folder and makes it the root for every later request.",
            "parameters": {
                "type": "object",
                "properties": { "project_name": string("Name of the project folder.") },
                "required": ["project_name"]
            }
        }),
        json!({
            "name": INSTALL_DEPENDENCIES,
            "description": "Initializes package.json and installs express, helmet, cors and nodemon.",
            "parameters": {
                "type": "object",
                "properties": { "project_name": string("Package name written to package.json.") },
                "required": ["project_name"]
            }
        }),
        json!({
            "name": FORMAT_FILES,
            "description": "Formats every generated source file. Call once when all other tasks are done."
        }),
        json!({
            "name": GENERATE_ENTRYPOINT,
            "description": "Generates src/index.js, which starts an express server with helmet and cors.",
            "parameters": {
                "type": "object",
                "properties": {
                    "port": { "type": "integer", "minimum": 0, "maximum": 65535, "description": "Port to listen on. Default is 3000." },
                    "controller_path": string("Controller directory relative to src. Default is 'controllers'.")
                }
            }
        }),
        json!({
            "name": GENERATE_CONTROLLER_INDEX,
            "description": "Generates the controller index which mounts every controller. Only call this once.",
            "parameters": {
                "type": "object",
                "properties": {
                    "controller_names": string_list("Controller names in camel case, named after the entity being resolved."),
                    "controller_path": string("Path to the controllers directory. Default is 'src/controllers'.")
                },
                "required": ["controller_names"]
            }
        }),
        json!({
            "name": GENERATE_CONTROLLER,
            "description": "Generates a controller route. Call repeatedly with the same controller name to add more routes to that controller.",
            "parameters": {
                "type": "object",
                "properties": {
                    "controller_name": string("Controller name in camel case, without the word 'controller'. Must match a name given to generate_controller_index."),
                    "services": string_list("Services to import and call, in order. Each must already be generated."),
                    "controller_path": string("Path to the controllers directory. Default is 'src/controllers'."),
                    "service_path": string("Path to the services directory. Default is 'src/services'."),
                    "method": method.clone(),
                    "endpoint": string("Route path using express params, e.g. '/:id' or '/:id/:name'. Do not repeat the controller name. Default is '/'.")
                },
                "required": ["controller_name", "services"]
            }
        }),
        json!({
            "name": GENERATE_SERVICES_INDEX,
            "description": "Generates the services index which re-exports every service. Only call this once.",
            "parameters": {
                "type": "object",
                "properties": {
                    "service_names": string_list("Service names in camel case."),
                    "service_path": string("Path to the services directory. Default is 'src/services'.")
                },
                "required": ["service_names"]
            }
        }),
        json!({
            "name": GENERATE_SERVICE,
            "description": "Generates a service module that performs one outbound HTTP call.",
            "parameters": {
                "type": "object",
                "properties": {
                    "service_name": string("Service name in camel case."),
                    "uri": string("URI of the upstream endpoint. Reference path parameters as ${params.id}."),
                    "service_path": string("Path to the services directory. Default is 'src/services'."),
                    "method": method
                },
                "required": ["service_name", "uri"]
            }
        }),
    ]
}
