//! Isolated Python environments created on demand and provisioned with a requirement.
//!
//! An [`EnvironmentHandle`] pairs an [`EnvSpec`] with a [`Strategy`]:
//!
//! - [`Strategy::Standard`] shells out to `virtualenv`
//! - [`Strategy::Lightweight`] uses the built-in `venv` module
//! - [`Strategy::Delegated`] leaves creation and provisioning to `tox`
//!
//! ```no_run
//! use venvkit_core::config::EnvsConfig;
//! use venvkit_env::{EnvSpec, EnvironmentHandle, Provision, Strategy};
//!
//! let spec = EnvSpec::new(".venv").with_requirement("example");
//! let env = EnvironmentHandle::new(Strategy::Standard, spec, &EnvsConfig::from_env());
//! env.create()?;
//! println!("{}", env.exe("python").display());
//! # Ok::<(), venvkit_env::EnvError>(())
//! ```

pub mod error;
pub mod handle;
pub mod interpreter;
pub mod log;
pub mod paths;
pub mod process;
pub mod spec;

pub use error::{EnvError, Result, SpecFileError};
pub use handle::{EnvironmentHandle, Provision};
pub use process::{Invocation, ProcessRunner, SystemRunner};
pub use spec::{EnvSpec, Strategy};
