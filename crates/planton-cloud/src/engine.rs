//! pulumi CLI wrapper
//!
//! Runs a rendered [`Program`] through the `pulumi` CLI. Each run gets a
//! fresh temporary project directory holding `Pulumi.yaml`; the stack input
//! travels in the `STACK_INPUT_YAML` environment variable.

use crate::error::{CloudError, Result};
use crate::program::Program;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use planton_core::PulumiBackendConfig;
use planton_stackinput::STACK_INPUT_ENV;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Stack operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Preview,
    Up,
    Refresh,
    Destroy,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Preview => "preview",
            Operation::Up => "up",
            Operation::Refresh => "refresh",
            Operation::Destroy => "destroy",
        }
    }

    /// Arguments after the subcommand
    ///
    /// `--yes` also skips the implicit preview; it has no meaning for preview.
    pub fn args(self, stack: &str, yes: bool) -> Vec<String> {
        let mut args = vec![
            self.as_str().to_string(),
            "--stack".to_string(),
            stack.to_string(),
            "--non-interactive".to_string(),
        ];
        if yes && self != Operation::Preview {
            args.push("--yes".to_string());
            args.push("--skip-preview".to_string());
        }
        args
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one stack operation needs
#[derive(Debug, Clone, Copy)]
pub struct StackRun<'a> {
    pub program: &'a Program,
    pub stack_input_yaml: &'a str,
    pub backend: &'a PulumiBackendConfig,
}

/// Captured result of one CLI invocation
#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub operation: Operation,
    pub stack: String,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// IaC engine abstraction
#[async_trait]
pub trait IacEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Run an operation against the run's stack
    async fn run(&self, operation: Operation, run: StackRun<'_>, yes: bool)
        -> Result<EngineOutput>;

    /// Current stack outputs as a JSON object
    async fn stack_outputs(
        &self,
        run: StackRun<'_>,
    ) -> Result<serde_json::Map<String, serde_json::Value>>;
}

/// Whether a finished run counts as successful
///
/// The CLI sometimes exits non-zero after a clean run; only `error:`
/// diagnostics mark a failure.
pub fn run_succeeded(exit_ok: bool, stdout: &str, stderr: &str) -> bool {
    exit_ok || !(stdout.contains("error:") || stderr.contains("error:"))
}

fn error_lines(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .chain(stdout.lines())
        .map(str::trim)
        .filter(|l| l.contains("error:"))
        .collect();
    if lines.is_empty() {
        stderr.trim().to_string()
    } else {
        lines.join("\n")
    }
}

/// Runs programs with the `pulumi` CLI
#[derive(Debug, Clone)]
pub struct PulumiEngine {
    binary: PathBuf,
    backend_url: Option<String>,
}

impl Default for PulumiEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PulumiEngine {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("pulumi"),
            backend_url: None,
        }
    }

    /// Use another executable in place of `pulumi`
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Passed to the CLI as `PULUMI_BACKEND_URL`
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    /// Installed CLI version
    pub async fn version(&self) -> Result<String> {
        let output = self.command(None).arg("version").output().await;
        let output = self.map_spawn(output)?;
        if !output.status.success() {
            return Err(CloudError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn command(&self, workspace: Option<&TempDir>) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(dir) = workspace {
            cmd.current_dir(dir.path());
        }
        cmd.env("PULUMI_SKIP_UPDATE_CHECK", "true");
        if let Some(url) = &self.backend_url {
            cmd.env("PULUMI_BACKEND_URL", url);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    fn map_spawn(
        &self,
        output: std::io::Result<std::process::Output>,
    ) -> Result<std::process::Output> {
        output.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CloudError::PulumiNotFound,
            _ => CloudError::Io(e),
        })
    }

    /// Write the program as `Pulumi.yaml` into a fresh project directory
    ///
    /// The project name follows the backend so the stack resolves.
    async fn write_workspace(&self, run: &StackRun<'_>) -> Result<TempDir> {
        let dir = tempfile::Builder::new().prefix("planton-").tempdir()?;
        let mut program = run.program.clone();
        program.name = run.backend.project.clone();
        tokio::fs::write(dir.path().join("Pulumi.yaml"), program.to_yaml()?).await?;
        debug!(path = %dir.path().display(), "Wrote Pulumi workspace");
        Ok(dir)
    }

    async fn select_stack(&self, workspace: &TempDir, stack: &str) -> Result<()> {
        let args = ["stack", "select", "--create", "--stack", stack, "--non-interactive"];
        debug!("Running: pulumi {}", args.join(" "));

        let output = self.command(Some(workspace)).args(args).output().await;
        let output = self.map_spawn(output)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CloudError::CommandFailed(stderr.trim().to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl IacEngine for PulumiEngine {
    fn name(&self) -> &str {
        "pulumi"
    }

    #[instrument(skip(self, run), fields(stack = %run.backend))]
    async fn run(
        &self,
        operation: Operation,
        run: StackRun<'_>,
        yes: bool,
    ) -> Result<EngineOutput> {
        let stack = run.backend.stack_fqdn();
        let workspace = self.write_workspace(&run).await?;
        self.select_stack(&workspace, &stack).await?;

        let args = operation.args(&stack, yes);
        debug!("Running: pulumi {}", args.join(" "));
        info!(operation = %operation, stack = %stack, "Starting pulumi operation");

        let started_at = Utc::now();
        let timer = Instant::now();
        let output = self
            .command(Some(&workspace))
            .args(&args)
            .env(STACK_INPUT_ENV, run.stack_input_yaml)
            .output()
            .await;
        let output = self.map_spawn(output)?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !run_succeeded(output.status.success(), &stdout, &stderr) {
            return Err(CloudError::Engine {
                operation: operation.to_string(),
                message: error_lines(&stdout, &stderr),
            });
        }
        if !output.status.success() {
            warn!(
                code = ?output.status.code(),
                "pulumi exited non-zero without error diagnostics, treating as success"
            );
        }

        Ok(EngineOutput {
            operation,
            stack,
            exit_code: output.status.code(),
            stdout,
            stderr,
            started_at,
            duration_ms: timer.elapsed().as_millis() as u64,
        })
    }

    #[instrument(skip(self, run), fields(stack = %run.backend))]
    async fn stack_outputs(
        &self,
        run: StackRun<'_>,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        let stack = run.backend.stack_fqdn();
        let workspace = self.write_workspace(&run).await?;

        let args = ["stack", "output", "--json", "--show-secrets", "--stack", stack.as_str()];
        debug!("Running: pulumi {}", args.join(" "));

        let output = self.command(Some(&workspace)).args(args).output().await;
        let output = self.map_spawn(output)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CloudError::CommandFailed(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(serde_json::Map::new());
        }
        Ok(serde_json::from_str(&stdout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_args() {
        assert_eq!(
            Operation::Up.args("acme/web/dev", true),
            vec![
                "up",
                "--stack",
                "acme/web/dev",
                "--non-interactive",
                "--yes",
                "--skip-preview"
            ]
        );
        assert_eq!(
            Operation::Destroy.args("acme/web/dev", false),
            vec!["destroy", "--stack", "acme/web/dev", "--non-interactive"]
        );
        assert_eq!(Operation::Preview.args("a/b/c", true).len(), 4);
    }

    #[test]
    fn test_run_succeeded_heuristic() {
        assert!(run_succeeded(true, "error: ignored", ""));
        assert!(run_succeeded(false, "Resources: 3 unchanged", ""));
        assert!(!run_succeeded(false, "", "error: update failed"));
        assert!(!run_succeeded(false, "  error: preview failed", ""));
    }

    #[test]
    fn test_error_lines() {
        let stderr = "warning: slow\nerror: access denied\n";
        assert_eq!(error_lines("", stderr), "error: access denied");
        assert_eq!(error_lines("", "  boom \n"), "boom");
    }
}
