//! Environment lifecycle: create (if missing), then install.
//!
//! `ensure_env` checks for the environment directory before doing anything,
//! for every strategy. The check and the creation that follows are not
//! atomic: two handles creating the same directory concurrently race, and
//! callers must keep names unique per concurrent task.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use venvkit_core::config::EnvsConfig;

use crate::error::{EnvError, Result};
use crate::info_log;
use crate::interpreter;
use crate::paths;
use crate::process::{Invocation, ProcessRunner, SystemRunner};
use crate::spec::{EnvSpec, Strategy};

/// The environment contract: create an isolated environment, then install into it.
///
/// [`EnvironmentHandle`] implements it for the built-in strategies; wrap or
/// reimplement it to expose different `env_vars` or a custom layout.
pub trait Provision {
    /// On-disk location of the environment.
    fn directory(&self) -> PathBuf;

    /// Create the environment unless its directory already exists.
    fn ensure_env(&self) -> Result<()>;

    /// Install the requirement. Runs every time it is called.
    fn install(&self) -> Result<()>;

    /// Path of `cmd` inside the environment's executable directory.
    fn exe(&self, cmd: &str) -> PathBuf {
        paths::executable_in(&self.directory(), cmd)
    }

    /// Variables a caller should set to use the environment.
    fn env_vars(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// `ensure_env` then `install`. A failed install does not undo creation.
    fn create(&self) -> Result<&Self>
    where
        Self: Sized,
    {
        self.ensure_env()?;
        self.install()?;
        Ok(self)
    }
}

/// One environment, bound to a strategy and a process runner.
#[derive(Clone)]
pub struct EnvironmentHandle {
    strategy: Strategy,
    spec: EnvSpec,
    root: PathBuf,
    self_python: Option<PathBuf>,
    runner: Arc<dyn ProcessRunner>,
}

impl std::fmt::Debug for EnvironmentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentHandle")
            .field("strategy", &self.strategy)
            .field("spec", &self.spec)
            .field("root", &self.root)
            .field("self_python", &self.self_python)
            .finish_non_exhaustive()
    }
}

impl EnvironmentHandle {
    /// Build a handle that runs real processes.
    ///
    /// `config` supplies the strategy's default root (used when `spec.root`
    /// is unset) and the interpreter that runs virtualenv / venv / tox.
    pub fn new(strategy: Strategy, spec: EnvSpec, config: &EnvsConfig) -> Self {
        Self::with_runner(strategy, spec, config, Arc::new(SystemRunner))
    }

    pub fn with_runner(
        strategy: Strategy,
        spec: EnvSpec,
        config: &EnvsConfig,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        let root = spec
            .root
            .clone()
            .unwrap_or_else(|| strategy.default_root(config));
        Self {
            strategy,
            spec,
            root,
            self_python: config.python.clone(),
            runner,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn spec(&self) -> &EnvSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Shorthand for `exe("python")`.
    pub fn python(&self) -> PathBuf {
        self.exe("python")
    }

    fn self_interpreter(&self) -> Result<PathBuf> {
        interpreter::resolve(self.self_python.as_deref())
    }

    /// `--python <target>` then `create_opts`, each only when set.
    fn optional_create_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(ref python) = self.spec.python {
            args.push("--python".to_string());
            args.push(python.to_string_lossy().into_owned());
        }
        if let Some(ref opts) = self.spec.create_opts {
            args.extend(opts.iter().cloned());
        }
        args
    }

    /// The creation command for this strategy, or `None` when the strategy
    /// leaves creation to someone else.
    pub fn creation_invocation(&self) -> Result<Option<Invocation>> {
        let (program, module) = match self.strategy {
            Strategy::Delegated => return Ok(None),
            Strategy::Standard => (self.self_interpreter()?, "virtualenv"),
            Strategy::Lightweight => {
                let program = match self.spec.python {
                    Some(ref target) => target.clone(),
                    None => self.self_interpreter()?,
                };
                (program, "venv")
            }
        };
        Ok(Some(
            Invocation::new(program)
                .args(["-m", module])
                .arg(self.directory())
                .args(self.optional_create_args()),
        ))
    }

    /// The provisioning command for this strategy.
    pub fn install_invocation(&self) -> Result<Invocation> {
        match self.strategy {
            Strategy::Delegated => Ok(Invocation::new(self.self_interpreter()?)
                .args(["-m", "tox", "-e"])
                .arg(&self.spec.name)
                .arg("--notest")),
            Strategy::Standard | Strategy::Lightweight => {
                let requirement = self
                    .spec
                    .requirement
                    .as_deref()
                    .ok_or(EnvError::MissingField("requirement"))?;
                let mut inv = Invocation::new(self.python())
                    .args(["-m", "pip", "install", requirement]);
                if let Some(ref extra) = self.spec.install_env {
                    inv = inv.envs(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                Ok(inv)
            }
        }
    }
}

impl Provision for EnvironmentHandle {
    fn directory(&self) -> PathBuf {
        self.root.join(&self.spec.name)
    }

    fn ensure_env(&self) -> Result<()> {
        if self.strategy == Strategy::Delegated {
            tracing::debug!(name = %self.spec.name, "creation delegated to tox");
            return Ok(());
        }
        let dir = self.directory();
        if dir.exists() {
            tracing::debug!(dir = %dir.display(), "environment exists, skipping creation");
            return Ok(());
        }
        if let Some(inv) = self.creation_invocation()? {
            info_log!(
                "Creating {} environment at {}",
                self.strategy,
                dir.display()
            );
            self.runner.run(&inv)?;
        }
        Ok(())
    }

    fn install(&self) -> Result<()> {
        let inv = self.install_invocation()?;
        match self.strategy {
            Strategy::Delegated => info_log!("Provisioning tox environment {}", self.spec.name),
            _ => info_log!(
                "Installing {} into {}",
                self.spec.requirement.as_deref().unwrap_or_default(),
                self.directory().display()
            ),
        }
        self.runner.run(&inv)
    }

    fn env_vars(&self) -> BTreeMap<String, String> {
        self.spec.env_vars.clone()
    }
}
