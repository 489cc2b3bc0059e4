//! The docker CLI boundary.
//!
//! Every container interaction funnels through [`ContainerCli`], so the rest
//! of the executor can be driven by test doubles that never spawn a process.

use std::process::Output;

use anyhow::Result;

use crate::runner::{CommandRunner, TokioCommandRunner};

/// Program invoked for all container operations.
pub const CONTAINER_TOOL: &str = "docker";

/// Abstraction over container tool invocation.
#[allow(async_fn_in_trait)]
pub trait ContainerCli {
    /// Run the container tool with `args` and hand back the raw output.
    ///
    /// `Err` means the tool could not be run at all (spawn failure or
    /// timeout); a nonzero exit comes back as `Ok` with the failing status.
    async fn run(&self, args: &[&str]) -> Result<Output>;
}

/// Production implementation shelling out through a [`CommandRunner`].
pub struct DockerCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> DockerCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl Default for DockerCli<TokioCommandRunner> {
    fn default() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> ContainerCli for DockerCli<R> {
    async fn run(&self, args: &[&str]) -> Result<Output> {
        self.runner.run(CONTAINER_TOOL, args).await
    }
}

/// Stdout and stderr flattened to one trimmed single-line string.
pub(crate) fn flatten_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text.replace(['\r', '\n'], " ").trim().to_owned()
}

/// Failure text for a command that ran but exited nonzero.
pub(crate) fn exit_error(output: &Output) -> String {
    let text = flatten_output(output);
    if text.is_empty() {
        output.status.to_string()
    } else {
        format!("{}: {text}", output.status)
    }
}
