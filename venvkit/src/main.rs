mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use venvkit_core::config::EnvsConfig;
use venvkit_core::observability;

fn main() -> Result<()> {
    observability::init_tracing();
    let cli = Cli::parse();
    // Roots and interpreter are read from the environment once, here.
    let config = EnvsConfig::from_env();

    match cli.command {
        Commands::Create {
            env,
            requirement,
            install_env,
            clean,
        } => commands::env::cmd_create(&env, &config, requirement, install_env, clean)?,
        Commands::Exe { env, command } => commands::env::cmd_exe(&env, &config, &command)?,
        Commands::EnvVars { env } => commands::env::cmd_env_vars(&env, &config)?,
        Commands::Show { env } => commands::env::cmd_show(&env, &config)?,
    }

    Ok(())
}
