use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use venvkit_env::Strategy;

/// venvkit - disposable Python environments for test suites and sub-tools
#[derive(Parser, Debug)]
#[command(name = "venvkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand that targets an environment.
#[derive(Args, Debug, Clone, Default)]
pub struct EnvArgs {
    /// YAML or JSON file declaring the environment (flags below override it)
    #[arg(long, value_name = "FILE")]
    pub spec: Option<PathBuf>,

    /// standard (virtualenv), lightweight (venv) or delegated (tox). Default: standard
    #[arg(long, short = 's')]
    pub strategy: Option<Strategy>,

    /// Environment name, a directory under the root (default: .venv)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Root directory (default: $VENVKIT_SERVICES_ROOT, or .tox for delegated)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Interpreter the environment is built for (passed as --python)
    #[arg(long, value_name = "PYTHON")]
    pub python: Option<PathBuf>,

    /// Extra creation flag, repeatable (e.g. --create-opt=--system-site-packages)
    #[arg(long = "create-opt", value_name = "OPT", allow_hyphen_values = true)]
    pub create_opts: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the environment if missing, then install the requirement
    Create {
        #[command(flatten)]
        env: EnvArgs,

        /// Requirement passed verbatim to `pip install`
        #[arg(long, short = 'r')]
        requirement: Option<String>,

        /// Extra variable for the install step, KEY=VALUE (repeatable)
        #[arg(long = "install-env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        install_env: Vec<(String, String)>,

        /// Add the strategy's flags for an environment without bundled pip/setuptools
        #[arg(long)]
        clean: bool,
    },

    /// Print the path of an executable inside the environment
    Exe {
        #[command(flatten)]
        env: EnvArgs,

        /// Executable name
        #[arg(value_name = "COMMAND", default_value = "python")]
        command: String,
    },

    /// Print the variables needed to use the environment, as JSON
    EnvVars {
        #[command(flatten)]
        env: EnvArgs,
    },

    /// Print the resolved environment (strategy, directory, spec) as JSON
    Show {
        #[command(flatten)]
        env: EnvArgs,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
