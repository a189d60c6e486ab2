mod cli;
mod config;
mod engine;
mod repl;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use engine::context::ShellContext;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref())?;
    config::apply_env_files(&config)?;
    let mut ctx = ShellContext::from_config(&config)?;

    let status = match cli.command {
        Some(line) => repl::run_once(&line, &mut ctx),
        None => repl::run_interactive(&mut ctx)?,
    };
    std::process::exit(status);
}
