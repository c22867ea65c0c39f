use std::process::{Command, Stdio};
use tracing::debug;

use crate::constants::CONTAINER_RUNTIMES;
use crate::utils::{DeployError, Result};

/// Invocation primitive behind every compose operation
pub trait ComposeRunner {
    /// Run to completion with stdin, stdout and stderr passed through
    fn run(&self, args: &[String]) -> Result<()>;

    /// Run to completion and return captured stdout
    fn capture(&self, args: &[String]) -> Result<String>;
}

/// Check if container runtime is available and return its name
/// Prefers Docker over Podman
pub fn detect_container_runtime() -> Option<&'static str> {
    CONTAINER_RUNTIMES
        .iter()
        .copied()
        .find(|cmd| which::which(cmd).is_ok())
}

pub(crate) fn runtime_missing() -> DeployError {
    DeployError::ExternalProcess {
        command: "compose".to_string(),
        reason: format!("none of {} found on PATH", CONTAINER_RUNTIMES.join(", ")),
    }
}

/// Runs compose commands through a real container runtime binary
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Bind to the first runtime found on `PATH`
    pub fn detect() -> Result<Self> {
        detect_container_runtime()
            .map(Self::new)
            .ok_or_else(runtime_missing)
    }

    fn command_line(&self, args: &[String]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }

    fn failure(&self, args: &[String], reason: impl ToString) -> DeployError {
        DeployError::ExternalProcess {
            command: self.command_line(args),
            reason: reason.to_string(),
        }
    }
}

impl ComposeRunner for ProcessRunner {
    fn run(&self, args: &[String]) -> Result<()> {
        debug!("Executing: {}", self.command_line(args));

        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| self.failure(args, e))?;

        if !status.success() {
            return Err(self.failure(args, status));
        }

        Ok(())
    }

    fn capture(&self, args: &[String]) -> Result<String> {
        debug!("Executing: {}", self.command_line(args));

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| self.failure(args, e))?;

        if !output.status.success() {
            return Err(self.failure(args, output.status));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
