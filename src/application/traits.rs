//! Port interfaces for the application layer

use async_trait::async_trait;
use std::path::Path;

use crate::application::ApplicationError;
use crate::generation::Artifact;

/// Read/write boundary for everything under a project root.
///
/// Paths handed to a store are absolute (already joined onto the project
/// root by the driver).
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Read a file, returning `None` when it does not exist
    async fn read_file(&self, path: &Path) -> Result<Option<String>, ApplicationError>;

    /// Whether a file exists at `path`
    async fn exists(&self, path: &Path) -> bool;

    /// Write all artifacts, creating parent directories as needed
    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<(), ApplicationError>;

    /// Ensure a directory exists
    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError>;
}

/// Runs the external developer tools (package manager, formatter)
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute `program` with `args` in `working_dir`
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandResult, ApplicationError>;
}

/// Result of command execution
#[derive(Debug, Clone, Default)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Check if the command was successful
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Joins a relative artifact onto a project root
pub fn rooted(root: &Path, artifact: Artifact) -> Artifact {
    Artifact {
        path: root.join(&artifact.path),
        content: artifact.content,
    }
}
