//! End-to-end provisioning against real child processes.
//!
//! Tests that need a working Python return early when none is available.

use std::path::{Path, PathBuf};
use std::process::Command;

use venvkit_core::config::EnvsConfig;
use venvkit_env::{EnvError, EnvSpec, EnvironmentHandle, Provision, Strategy};

fn python_with(module: &str) -> Option<PathBuf> {
    let python = which::which("python3")
        .or_else(|_| which::which("python"))
        .ok()?;
    let ok = Command::new(&python)
        .args(["-c", &format!("import {}", module)])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    ok.then_some(python)
}

fn config(root: &Path, python: Option<PathBuf>) -> EnvsConfig {
    EnvsConfig {
        services_root: root.to_path_buf(),
        tox_root: root.join(".tox"),
        python,
    }
}

fn bin_dir(env_dir: &Path) -> PathBuf {
    let candidates = [env_dir.join("bin"), env_dir.join("Scripts")];
    candidates
        .into_iter()
        .find(|p| p.exists())
        .expect("environment has no bin or Scripts directory")
}

fn reported_executable(exe: &Path) -> PathBuf {
    let out = Command::new(exe)
        .args(["-c", "import sys; print(sys.executable)"])
        .output()
        .unwrap();
    assert!(out.status.success());
    PathBuf::from(String::from_utf8(out.stdout).unwrap().trim())
}

#[test]
fn test_lightweight_env_reports_own_interpreter() {
    let Some(python) = python_with("venv") else {
        eprintln!("skipping: no python with venv");
        return;
    };
    let tmp = tempfile::tempdir().unwrap();
    let spec = EnvSpec::default().with_create_opts(Strategy::Lightweight.clean_opts().iter().copied());
    let env = EnvironmentHandle::new(Strategy::Lightweight, spec, &config(tmp.path(), Some(python)));

    env.ensure_env().unwrap();

    let bin = bin_dir(&tmp.path().join(".venv"));
    let exe = env.exe("python");
    assert!(exe.exists());
    let reported = reported_executable(&exe);
    assert_eq!(
        reported.parent().unwrap().canonicalize().unwrap(),
        bin.canonicalize().unwrap()
    );
}

#[test]
fn test_lightweight_without_pip_install_fails() {
    let Some(python) = python_with("venv") else {
        eprintln!("skipping: no python with venv");
        return;
    };
    let tmp = tempfile::tempdir().unwrap();
    let spec = EnvSpec::new("nopip")
        .with_requirement("example")
        .with_create_opts(["--without-pip"]);
    let env = EnvironmentHandle::new(Strategy::Lightweight, spec, &config(tmp.path(), Some(python)));

    env.ensure_env().unwrap();
    let bin = bin_dir(&env.directory());
    assert!(!bin.join("pip").exists());
    assert!(!bin.join("pip.exe").exists());

    // The installer is still looked up inside the environment; without pip it fails.
    let err = env.install().unwrap_err();
    assert!(matches!(err, EnvError::ProcessFailed { .. }), "{err}");
    assert!(env.directory().exists());
}

#[test]
fn test_standard_env_with_virtualenv() {
    let Some(python) = python_with("virtualenv") else {
        eprintln!("skipping: virtualenv not installed");
        return;
    };
    let tmp = tempfile::tempdir().unwrap();
    let spec = EnvSpec::default().with_create_opts(Strategy::Standard.clean_opts().iter().copied());
    let env = EnvironmentHandle::new(Strategy::Standard, spec, &config(tmp.path(), Some(python)));

    env.ensure_env().unwrap();
    let bin = bin_dir(&tmp.path().join(".venv"));
    let reported = reported_executable(&env.exe("python"));
    assert_eq!(
        reported.parent().unwrap().canonicalize().unwrap(),
        bin.canonicalize().unwrap()
    );
}

/// Writes a minimal pure-Python wheel so pip can install without an index.
const BUILD_WHEEL: &str = r#"
import base64, hashlib, sys, zipfile
out = sys.argv[1]
files = {
    "tinypkg/__init__.py": "VALUE = 'installed'\n",
    "tinypkg-0.1.dist-info/METADATA": "Metadata-Version: 2.1\nName: tinypkg\nVersion: 0.1\n",
    "tinypkg-0.1.dist-info/WHEEL": "Wheel-Version: 1.0\nGenerator: venvkit-tests\nRoot-Is-Purelib: true\nTag: py3-none-any\n",
}
def digest(data):
    return "sha256=" + base64.urlsafe_b64encode(hashlib.sha256(data).digest()).rstrip(b"=").decode()
record = []
with zipfile.ZipFile(out, "w") as zf:
    for name, text in files.items():
        data = text.encode()
        zf.writestr(name, data)
        record.append("%s,%s,%d" % (name, digest(data), len(data)))
    record.append("tinypkg-0.1.dist-info/RECORD,,")
    zf.writestr("tinypkg-0.1.dist-info/RECORD", "\n".join(record) + "\n")
"#;

fn build_wheel(python: &Path, dir: &Path) -> PathBuf {
    let wheel = dir.join("tinypkg-0.1-py3-none-any.whl");
    let status = Command::new(python)
        .args(["-c", BUILD_WHEEL])
        .arg(&wheel)
        .status()
        .unwrap();
    assert!(status.success());
    wheel
}

/// Real creation followed by a real `pip install` of a local wheel.
fn assert_create_installs_requirement(strategy: Strategy, python: PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let wheel = build_wheel(&python, tmp.path());
    let spec = EnvSpec::default()
        .with_requirement(wheel.to_string_lossy())
        .with_install_env("PIP_NO_INDEX", "1")
        .with_install_env("PIP_DISABLE_PIP_VERSION_CHECK", "1");
    let root = tmp.path().join("envs");
    let env = EnvironmentHandle::new(strategy, spec, &config(&root, Some(python)));

    let dir = env.create().unwrap().directory();
    assert_eq!(dir, root.join(".venv"));

    let out = Command::new(env.exe("python"))
        .args(["-c", "import tinypkg; print(tinypkg.VALUE)"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "installed");
    let reported = reported_executable(&env.exe("python"));
    assert_eq!(
        reported.parent().unwrap().canonicalize().unwrap(),
        bin_dir(&dir).canonicalize().unwrap()
    );

    // Second create skips creation but installs again.
    env.create().unwrap();
}

/// Some distributions ship `venv` with a disabled `ensurepip`; try it for real.
fn python_with_venv_pip() -> Option<PathBuf> {
    let python = python_with("venv")?;
    let scratch = tempfile::tempdir().ok()?;
    let ok = Command::new(&python)
        .args(["-m", "venv"])
        .arg(scratch.path().join("check"))
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    ok.then_some(python)
}

#[test]
fn test_lightweight_create_installs_local_wheel() {
    let Some(python) = python_with_venv_pip() else {
        eprintln!("skipping: venv cannot bootstrap pip");
        return;
    };
    assert_create_installs_requirement(Strategy::Lightweight, python);
}

#[test]
fn test_standard_create_installs_local_wheel() {
    let Some(python) = python_with("virtualenv") else {
        eprintln!("skipping: virtualenv not installed");
        return;
    };
    assert_create_installs_requirement(Strategy::Standard, python);
}

#[cfg(unix)]
mod fake_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// A stand-in interpreter that records its arguments and one variable.
    fn write_recorder(path: &Path, log: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let script = format!(
            "#!/bin/sh\necho \"$@\" > '{log}'\necho \"marker=$VENVKIT_IT_MARKER\" >> '{log}'\n",
            log = log.display()
        );
        std::fs::write(path, script).unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_install_env_overrides_ambient_variable() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("install.log");
        let env_dir = tmp.path().join(".venv");
        write_recorder(&env_dir.join("bin").join("python"), &log);

        std::env::set_var("VENVKIT_IT_MARKER", "ambient");
        let spec = EnvSpec::default()
            .with_requirement("example>=1")
            .with_install_env("VENVKIT_IT_MARKER", "override");
        let env = EnvironmentHandle::new(Strategy::Standard, spec, &config(tmp.path(), None));

        // The directory already exists, so no creation tool (and no python) is needed.
        env.create().unwrap();

        let recorded = std::fs::read_to_string(&log).unwrap();
        assert_eq!(recorded, "-m pip install example>=1\nmarker=override\n");
    }

    #[test]
    fn test_delegated_install_invokes_tox() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("tox.log");
        let fake_python = tmp.path().join("tools").join("python");
        write_recorder(&fake_python, &log);

        let env = EnvironmentHandle::new(
            Strategy::Delegated,
            EnvSpec::new("py312"),
            &config(tmp.path(), Some(fake_python)),
        );
        env.create().unwrap();

        let recorded = std::fs::read_to_string(&log).unwrap();
        assert!(recorded.starts_with("-m tox -e py312 --notest\n"));
        assert!(!env.directory().exists());
    }

    #[test]
    fn test_failed_creation_propagates() {
        let tmp = tempfile::tempdir().unwrap();
        let fake_python = tmp.path().join("false-python");
        std::fs::write(&fake_python, "#!/bin/sh\nexit 7\n").unwrap();
        std::fs::set_permissions(&fake_python, std::fs::Permissions::from_mode(0o755)).unwrap();

        let env = EnvironmentHandle::new(
            Strategy::Standard,
            EnvSpec::default().with_requirement("example"),
            &config(tmp.path(), Some(fake_python)),
        );
        match env.create().unwrap_err() {
            EnvError::ProcessFailed { code, .. } => assert_eq!(code, Some(7)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
