//! Executable layout inside an environment.

use std::path::{Path, PathBuf};

/// `Scripts` on Windows, `bin` everywhere else. Checked on every call.
pub fn scripts_dir_name() -> &'static str {
    scripts_dir_for(std::env::consts::OS)
}

fn scripts_dir_for(os: &str) -> &'static str {
    if os == "windows" {
        "Scripts"
    } else {
        "bin"
    }
}

/// `<env_dir>/<bin|Scripts>/<cmd>`. Purely syntactic: nothing is checked on disk.
pub fn executable_in(env_dir: &Path, cmd: impl AsRef<Path>) -> PathBuf {
    env_dir.join(scripts_dir_name()).join(cmd)
}
