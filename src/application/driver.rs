//! Generation driver
//!
//! Maps each generation request onto an emitter, the controller
//! synthesizer or an external tool, against the current project root.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::{
    ApplicationError, CommandExecutor, ControllerLocks, ControllerArgs, CreateProjectArgs,
    GenerationRequest, InstallDependenciesArgs, ProjectStore, RequestCall, rooted,
};
use crate::core::Config;
use crate::generation::controller::{
    controller_file_path, service_import_specifier, synthesize_controller,
};
use crate::generation::emitters::{
    EntrypointParams, PACKAGE_MANIFEST, ServiceParams, emit_controller_index, emit_entrypoint,
    emit_package_manifest, emit_service, emit_service_index, service_module_path,
};
use crate::generation::{
    Artifact, EndpointSpec, GenerationError, ServiceImport, TemplateRenderer,
};

/// Result of dispatching one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The request ran; `paths` lists the files or directories it produced
    Completed {
        request: String,
        paths: Vec<PathBuf>,
    },
    /// The request was rejected or failed and nothing further was done for it
    Skipped { request: String, reason: String },
}

impl DispatchOutcome {
    pub fn request(&self) -> &str {
        match self {
            Self::Completed { request, .. } | Self::Skipped { request, .. } => request,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Outcomes of a whole request stream, in stream order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<DispatchOutcome>,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_completed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.completed()
    }
}

/// Session object owning the project root and every port
pub struct GenerationDriver {
    config: Config,
    root: RwLock<PathBuf>,
    renderer: Arc<dyn TemplateRenderer>,
    store: Arc<dyn ProjectStore>,
    executor: Arc<dyn CommandExecutor>,
    locks: ControllerLocks,
}

impl GenerationDriver {
    /// The project root starts out as the configured base directory
    pub fn new(
        config: Config,
        renderer: Arc<dyn TemplateRenderer>,
        store: Arc<dyn ProjectStore>,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        let root = RwLock::new(config.base_dir.clone());
        Self {
            config,
            root,
            renderer,
            store,
            executor,
            locks: ControllerLocks::new(),
        }
    }

    /// Current project root
    pub async fn root(&self) -> PathBuf {
        self.root.read().await.clone()
    }

    /// Run every call in order. A skipped call never stops the stream.
    pub async fn run<I>(&self, calls: I) -> RunSummary
    where
        I: IntoIterator<Item = RequestCall>,
    {
        let mut summary = RunSummary::default();
        for call in calls {
            let outcome = self.dispatch_call(&call.name, call.args).await;
            summary.outcomes.push(outcome);
        }

        tracing::info!(
            completed = summary.completed(),
            skipped = summary.skipped(),
            "Request stream finished"
        );
        summary
    }

    /// Parse a raw `(name, args)` pair and dispatch it
    pub async fn dispatch_call(&self, name: &str, args: serde_json::Value) -> DispatchOutcome {
        match GenerationRequest::from_call(name, args) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                tracing::warn!(request = %name, error = %e, "Skipping request");
                DispatchOutcome::Skipped {
                    request: name.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Dispatch a parsed request. Errors are logged and turned into a skip.
    pub async fn dispatch(&self, request: GenerationRequest) -> DispatchOutcome {
        let name = request.name();
        tracing::info!(request = name, "Dispatching request");

        match self.execute(request).await {
            Ok(paths) => {
                for path in &paths {
                    tracing::debug!(request = name, path = %path.display(), "Produced");
                }
                DispatchOutcome::Completed {
                    request: name.to_string(),
                    paths,
                }
            }
            Err(e) => {
                tracing::warn!(request = name, error = %e, "Skipping request");
                DispatchOutcome::Skipped {
                    request: name.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn execute(&self, request: GenerationRequest) -> Result<Vec<PathBuf>, ApplicationError> {
        let root = self.root().await;
        match request {
            GenerationRequest::CreateProjectRoot(args) => self.create_project_root(args).await,
            GenerationRequest::InstallDependencies(args) => {
                self.install_dependencies(&root, args).await
            }
            GenerationRequest::FormatSources => self.format_sources(&root).await,
            GenerationRequest::EmitEntrypoint(args) => {
                let artifact = emit_entrypoint(
                    self.renderer.as_ref(),
                    &EntrypointParams {
                        port: args.port,
                        controller_path: args.controller_path,
                    },
                )?;
                self.write(&root, artifact).await
            }
            GenerationRequest::EmitControllerIndex(args) => {
                let artifact = emit_controller_index(
                    self.renderer.as_ref(),
                    &args.controller_names,
                    &args.controller_path,
                )?;
                self.write(&root, artifact).await
            }
            GenerationRequest::SynthesizeController(args) => {
                self.synthesize_controller(&root, args).await
            }
            GenerationRequest::EmitServiceIndex(args) => {
                let artifact = emit_service_index(
                    self.renderer.as_ref(),
                    &args.service_names,
                    &args.service_path,
                )?;
                self.write(&root, artifact).await
            }
            GenerationRequest::EmitService(args) => {
                let artifact = emit_service(
                    self.renderer.as_ref(),
                    &ServiceParams {
                        name: args.service_name,
                        uri: args.uri,
                        method: args.method,
                        service_path: args.service_path,
                        timeout_ms: self.config.service_timeout_ms,
                    },
                )?;
                self.write(&root, artifact).await
            }
        }
    }

    async fn write(
        &self,
        root: &Path,
        artifact: Artifact,
    ) -> Result<Vec<PathBuf>, ApplicationError> {
        let artifact = rooted(root, artifact);
        let path = artifact.path.clone();
        self.store.write_artifacts(&[artifact]).await?;
        Ok(vec![path])
    }

    async fn create_project_root(
        &self,
        args: CreateProjectArgs,
    ) -> Result<Vec<PathBuf>, ApplicationError> {
        let project_root = self.config.base_dir.join(&args.project_name);

        // Directory failures are not fatal; later writes create parents anyway
        if let Err(e) = self.store.ensure_directory(&project_root.join("src")).await {
            tracing::warn!(
                project = %args.project_name,
                error = %e,
                "Failed to create project directory, continuing"
            );
        }

        *self.root.write().await = project_root.clone();
        tracing::info!(root = %project_root.display(), "Project root set");
        Ok(vec![project_root])
    }

    async fn synthesize_controller(
        &self,
        root: &Path,
        args: ControllerArgs,
    ) -> Result<Vec<PathBuf>, ApplicationError> {
        let ControllerArgs {
            controller_name,
            services,
            controller_path,
            service_path,
            method,
            endpoint,
        } = args;

        if services.is_empty() {
            return Err(GenerationError::MissingServices(controller_name).into());
        }

        for service in &services {
            let module = root.join(service_module_path(&service_path, service));
            if !self.store.exists(&module).await {
                return Err(GenerationError::UnknownService {
                    controller: controller_name,
                    service: service.clone(),
                    expected: module.display().to_string(),
                }
                .into());
            }
        }

        let imports: Vec<ServiceImport> = services
            .iter()
            .map(|name| ServiceImport {
                name: name.clone(),
                specifier: service_import_specifier(
                    Path::new(&controller_path),
                    Path::new(&service_path),
                    name,
                ),
            })
            .collect();

        let path = root.join(controller_file_path(&controller_path, &controller_name));
        let endpoint = EndpointSpec::new(controller_name, services)
            .with_method(method)
            .with_url_pattern(endpoint);

        // Held until the merged file is written
        let _guard = self.locks.acquire(&path).await;

        let existing = self.store.read_file(&path).await?;
        let content = synthesize_controller(
            self.renderer.as_ref(),
            existing.as_deref(),
            &endpoint,
            &imports,
        )?;

        tracing::info!(
            controller = %endpoint.name,
            method = %endpoint.method,
            url = %endpoint.url_pattern,
            merged = existing.is_some(),
            "Synthesized controller"
        );

        self.store
            .write_artifacts(&[Artifact::new(&path, content)])
            .await?;
        Ok(vec![path])
    }

    async fn install_dependencies(
        &self,
        root: &Path,
        args: InstallDependenciesArgs,
    ) -> Result<Vec<PathBuf>, ApplicationError> {
        if let Err(e) = self.store.ensure_directory(root).await {
            tracing::warn!(root = %root.display(), error = %e, "Failed to create project root");
        }

        let program = self.config.package_manager.program.clone();
        self.run_tool(&program, &["init".to_string(), "-y".to_string()], root)
            .await?;

        let install: Vec<String> = std::iter::once("install".to_string())
            .chain(self.config.package_manager.packages.iter().cloned())
            .collect();
        self.run_tool(&program, &install, root).await?;

        let manifest_path = root.join(PACKAGE_MANIFEST);
        let existing = self.store.read_file(&manifest_path).await?;
        let artifact = emit_package_manifest(existing.as_deref(), &args.project_name)?;
        self.write(root, artifact).await
    }

    async fn format_sources(&self, root: &Path) -> Result<Vec<PathBuf>, ApplicationError> {
        let formatter = &self.config.formatter;
        self.run_tool(&formatter.program, &formatter.args, root)
            .await?;
        Ok(Vec::new())
    }

    /// Runs a tool and logs its output. A non-zero exit is only a warning.
    async fn run_tool(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<(), ApplicationError> {
        let result = self.executor.execute(program, args, working_dir).await?;

        if !result.stdout.trim().is_empty() {
            tracing::debug!(program, stdout = %result.stdout.trim(), "Tool output");
        }

        if result.is_success() {
            tracing::info!(program, args = %args.join(" "), "Tool finished");
        } else {
            tracing::warn!(
                program,
                args = %args.join(" "),
                exit_code = result.exit_code,
                stderr = %result.stderr.trim(),
                "Tool exited with non-zero status"
            );
        }
        Ok(())
    }
}
