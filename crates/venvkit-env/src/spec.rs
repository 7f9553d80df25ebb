//! Environment configuration: what to create, where, and how.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use venvkit_core::config::EnvsConfig;

use crate::error::{EnvError, Result, SpecFileError};

/// Default environment name, relative to the strategy root.
pub const DEFAULT_ENV_NAME: &str = ".venv";

/// How an environment is created and provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// `python -m virtualenv`, then pip.
    #[default]
    #[serde(alias = "virtualenv")]
    Standard,
    /// `python -m venv`, then pip.
    #[serde(alias = "venv")]
    Lightweight,
    /// tox creates and provisions the environment itself.
    #[serde(alias = "tox")]
    Delegated,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Lightweight => "lightweight",
            Self::Delegated => "delegated",
        }
    }

    /// Root under which this strategy's environments live when the spec has no `root`.
    pub fn default_root(&self, config: &EnvsConfig) -> PathBuf {
        match self {
            Self::Standard | Self::Lightweight => config.services_root.clone(),
            Self::Delegated => config.tox_root.clone(),
        }
    }

    /// Creation flags that leave out bundled installer tooling.
    pub fn clean_opts(&self) -> &'static [&'static str] {
        match self {
            Self::Standard => &["--no-setuptools", "--no-pip", "--no-wheel"],
            Self::Lightweight => &["--without-pip"],
            Self::Delegated => &[],
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "virtualenv" => Ok(Self::Standard),
            "lightweight" | "venv" => Ok(Self::Lightweight),
            "delegated" | "tox" => Ok(Self::Delegated),
            other => Err(format!(
                "unknown strategy '{}' (expected standard, lightweight or delegated)",
                other
            )),
        }
    }
}

/// Declarative description of one environment.
///
/// Every optional field means "omit" when unset: no flag is passed and no
/// error is raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvSpec {
    /// Sub-directory of the root holding this environment.
    #[serde(default = "default_name")]
    pub name: String,
    /// Overrides the strategy's default root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Passed verbatim to `pip install`.
    #[serde(default, alias = "req", skip_serializing_if = "Option::is_none")]
    pub requirement: Option<String>,
    /// Interpreter the environment should be built for (`--python`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<PathBuf>,
    /// Extra creation flags, appended in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_opts: Option<Vec<String>>,
    /// Extra variables for the install step; they win over the process environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_env: Option<BTreeMap<String, String>>,
    /// Variables a caller should set to use the environment.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env_vars: BTreeMap<String, String>,
}

fn default_name() -> String {
    DEFAULT_ENV_NAME.to_string()
}

impl Default for EnvSpec {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_NAME)
    }
}

impl EnvSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: None,
            requirement: None,
            python: None,
            create_opts: None,
            install_env: None,
            env_vars: BTreeMap::new(),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirement = Some(requirement.into());
        self
    }

    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = Some(python.into());
        self
    }

    pub fn with_create_opts<I, S>(mut self, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create_opts = Some(opts.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_install_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.install_env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }
}

/// An environment declared in a YAML (or JSON) file.
///
/// ```yaml
/// strategy: lightweight
/// name: .venv
/// requirement: "pytest>=8"
/// create_opts: ["--without-pip"]
/// install_env:
///   PIP_INDEX_URL: https://mirror.example/simple
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(flatten)]
    pub env: EnvSpec,
}

impl SpecFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        std::fs::read_to_string(path)
            .map_err(SpecFileError::from)
            .and_then(|content| Self::parse(&content))
            .map_err(|source| EnvError::Spec {
                path: path.to_path_buf(),
                source,
            })
    }

    /// YAML is a superset of JSON, so both formats go through serde_yaml.
    pub fn parse(content: &str) -> std::result::Result<Self, SpecFileError> {
        Ok(serde_yaml::from_str(content)?)
    }
}
