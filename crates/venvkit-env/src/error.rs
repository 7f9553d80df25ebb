//! Errors raised while creating or provisioning an environment.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnvError>;

/// Failures bubble up verbatim; nothing here retries or cleans up partial state.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {}", exit_description(.code))]
    ProcessFailed { program: String, code: Option<i32> },

    #[error("Environment field '{0}' is required but was never set")]
    MissingField(&'static str),

    #[error("python3 or python not found in PATH (set VENVKIT_PYTHON to override)")]
    InterpreterNotFound,

    #[error("Invalid environment spec {}", .path.display())]
    Spec {
        path: PathBuf,
        #[source]
        source: SpecFileError,
    },
}

/// Why a spec file could not be loaded.
#[derive(Debug, Error)]
pub enum SpecFileError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse failed: {0}")]
    Parse(#[from] serde_yaml::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "no status (terminated by signal)".to_string(),
    }
}
