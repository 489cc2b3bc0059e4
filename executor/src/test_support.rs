//! Shared test helpers for executor tests.
//!
//! Provides cross-platform `exit_status()`, canned `Output` builders, and a
//! scripted `ContainerCli` double that records every argv it is given.

use std::cell::RefCell;
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::docker::ContainerCli;

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    output_with(0, stdout, b"")
}

pub fn output_with(code: i32, stdout: &[u8], stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: stdout.to_vec(),
        stderr: stderr.to_vec(),
    }
}

/// Scripted `ContainerCli`: hands out queued results in call order and
/// records every argv it saw. Running past the script bails.
pub struct ScriptedCli {
    results: RefCell<Vec<Result<Output>>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedCli {
    pub fn new(results: Vec<Result<Output>>) -> Self {
        Self {
            results: RefCell::new(results),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn argv(&self, call: usize) -> Vec<String> {
        self.calls.borrow()[call].clone()
    }
}

impl ContainerCli for ScriptedCli {
    async fn run(&self, args: &[&str]) -> Result<Output> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(ToString::to_string).collect());
        let mut results = self.results.borrow_mut();
        if results.is_empty() {
            anyhow::bail!("not expected");
        }
        results.remove(0)
    }
}
