//! External process execution.
//!
//! Every creation and installation step is a single blocking child process.
//! `ProcessRunner` is the seam between the lifecycle logic and the OS: the
//! handle builds an [`Invocation`], the runner executes it.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{EnvError, Result};

/// One external command: program, arguments and environment overrides.
///
/// `env` entries are applied on top of the inherited process environment,
/// so an override always wins over an ambient variable of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Arguments as lossy strings, for logging and assertions.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Executes invocations synchronously; returns once the child has exited.
///
/// Implement this trait to intercept process execution (dry runs, recording
/// in tests, remote execution).
pub trait ProcessRunner: Send + Sync {
    /// Run to completion. A non-zero exit is an error.
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs invocations as real child processes with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        let program = invocation.program.display().to_string();
        tracing::debug!(command = %invocation, "spawning");
        let status = invocation
            .to_command()
            .status()
            .map_err(|source| EnvError::Spawn {
                program: program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(EnvError::ProcessFailed {
                program,
                code: status.code(),
            });
        }
        Ok(())
    }
}
