use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "minish", version, about = "minish: a minimal command interpreter")]
pub struct Cli {
    /// Run a single command line and exit with its status
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub command: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
