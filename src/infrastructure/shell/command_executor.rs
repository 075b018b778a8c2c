//! Command executor for the external developer tools
//!
//! Runs the package manager and formatter as part of project setup.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::application::{ApplicationError, CommandExecutor, CommandResult};

/// Default command executor using tokio::process
pub struct ShellCommandExecutor;

impl ShellCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ShellCommandExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandResult, ApplicationError> {
        // npm and npx are .cmd shims on Windows
        let mut command = if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(program);
            command
        } else {
            Command::new(program)
        };

        tracing::debug!(program, ?args, dir = %working_dir.display(), "Running command");

        let output = command
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ApplicationError::ToolError(format!(
                    "Failed to execute '{program} {}': {e}",
                    args.join(" ")
                ))
            })?;

        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Invocation captured by a recording executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: std::path::PathBuf,
}

/// Command executor that records invocations instead of running them
#[derive(Default)]
pub struct RecordingCommandExecutor {
    results: std::collections::HashMap<String, CommandResult>,
    fail_spawn: bool,
    calls: std::sync::Mutex<Vec<RecordedCommand>>,
}

impl RecordingCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned result for the command line `program args...`
    pub fn with_result(
        mut self,
        command_line: &str,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.results.insert(
            command_line.to_string(),
            CommandResult {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Make every invocation fail as if the program could not be started
    pub fn failing_spawn(mut self) -> Self {
        self.fail_spawn = true;
        self
    }

    /// Every invocation so far, in order
    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CommandExecutor for RecordingCommandExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandResult, ApplicationError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCommand {
                program: program.to_string(),
                args: args.to_vec(),
                working_dir: working_dir.to_path_buf(),
            });
        }

        if self.fail_spawn {
            return Err(ApplicationError::ToolError(format!(
                "Failed to execute '{program}': not found"
            )));
        }

        let command_line = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(self
            .results
            .get(&command_line)
            .cloned()
            .unwrap_or_default())
    }
}
