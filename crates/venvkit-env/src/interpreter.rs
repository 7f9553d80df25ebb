//! Locate the Python used to run `virtualenv`, `venv` and `tox`.

use std::path::{Path, PathBuf};

use crate::error::{EnvError, Result};

const CANDIDATES: [&str; 2] = ["python3", "python"];

/// Resolve the self-interpreter: an explicit override, else the first
/// candidate found on `PATH`.
pub fn resolve(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = override_path {
        return Ok(p.to_path_buf());
    }
    find_on_path()
}

fn find_on_path() -> Result<PathBuf> {
    for name in CANDIDATES {
        if let Ok(path) = which::which(name) {
            tracing::debug!(interpreter = %path.display(), "found python on PATH");
            return Ok(path);
        }
    }
    Err(EnvError::InterpreterNotFound)
}
