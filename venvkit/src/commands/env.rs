//! Environment commands: create, exe, env-vars, show.
//!
//! Each command resolves an `EnvironmentHandle` from an optional spec file,
//! CLI flags and `EnvsConfig::from_env()`, in that order of precedence
//! (flags win over the file, the file wins over config defaults).

use anyhow::{Context, Result};
use serde_json::json;
use venvkit_core::config::EnvsConfig;
use venvkit_env::spec::SpecFile;
use venvkit_env::{EnvSpec, EnvironmentHandle, Provision, Strategy};

use crate::cli::EnvArgs;

/// Merge the spec file (if any) with CLI flags into a strategy and spec.
pub fn resolve_spec(args: &EnvArgs) -> Result<(Strategy, EnvSpec)> {
    let (file_strategy, mut spec) = match args.spec {
        Some(ref path) => {
            let file = SpecFile::from_path(path)
                .with_context(|| format!("Load environment spec {}", path.display()))?;
            (file.strategy, file.env)
        }
        None => (None, EnvSpec::default()),
    };

    if let Some(ref name) = args.name {
        spec.name = name.clone();
    }
    if let Some(ref root) = args.root {
        spec.root = Some(root.clone());
    }
    if let Some(ref python) = args.python {
        spec.python = Some(python.clone());
    }
    if !args.create_opts.is_empty() {
        spec.create_opts
            .get_or_insert_with(Vec::new)
            .extend(args.create_opts.iter().cloned());
    }

    let strategy = args.strategy.or(file_strategy).unwrap_or_default();
    Ok((strategy, spec))
}

fn resolve_handle(args: &EnvArgs, config: &EnvsConfig) -> Result<EnvironmentHandle> {
    let (strategy, spec) = resolve_spec(args)?;
    Ok(EnvironmentHandle::new(strategy, spec, config))
}

/// `venvkit create`
pub fn cmd_create(
    args: &EnvArgs,
    config: &EnvsConfig,
    requirement: Option<String>,
    install_env: Vec<(String, String)>,
    clean: bool,
) -> Result<()> {
    let (strategy, mut spec) = resolve_spec(args)?;
    if requirement.is_some() {
        spec.requirement = requirement;
    }
    for (key, value) in install_env {
        spec = spec.with_install_env(key, value);
    }
    if clean && !strategy.clean_opts().is_empty() {
        spec.create_opts
            .get_or_insert_with(Vec::new)
            .extend(strategy.clean_opts().iter().map(|s| s.to_string()));
    }

    let env = EnvironmentHandle::new(strategy, spec, config);
    env.create().with_context(|| {
        format!(
            "Provision {} environment '{}' at {}",
            strategy,
            env.name(),
            env.directory().display()
        )
    })?;
    tracing::info!(dir = %env.directory().display(), "environment ready");
    println!("{}", env.directory().display());
    Ok(())
}

/// `venvkit exe`
pub fn cmd_exe(args: &EnvArgs, config: &EnvsConfig, command: &str) -> Result<()> {
    let env = resolve_handle(args, config)?;
    println!("{}", env.exe(command).display());
    Ok(())
}

/// `venvkit env-vars`
pub fn cmd_env_vars(args: &EnvArgs, config: &EnvsConfig) -> Result<()> {
    let env = resolve_handle(args, config)?;
    println!("{}", serde_json::to_string_pretty(&env.env_vars())?);
    Ok(())
}

/// `venvkit show`
pub fn cmd_show(args: &EnvArgs, config: &EnvsConfig) -> Result<()> {
    let env = resolve_handle(args, config)?;
    let out = json!({
        "strategy": env.strategy(),
        "directory": env.directory(),
        "exists": env.directory().exists(),
        "python": env.python(),
        "spec": env.spec(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
