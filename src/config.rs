use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use crate::engine::dirstack::DEFAULT_CAPACITY;

const CONFIG_ENV: &str = "MINISH_CONFIG";
const DEFAULT_FILE: &str = ".minish.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub dir_stack_capacity: usize,
    pub history_file: Option<PathBuf>,
    pub env_files: Vec<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            dir_stack_capacity: DEFAULT_CAPACITY,
            history_file: None,
            env_files: Vec::new(),
        }
    }
}

/// Resolves the configuration: explicit path, then `$MINISH_CONFIG`, then
/// `~/.minish.toml`, then defaults. Only the last source is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<ShellConfig> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    let path = match named {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {}", path.display());
            }
            path
        }
        None => match env::var_os("HOME").map(|home| Path::new(&home).join(DEFAULT_FILE)) {
            Some(path) if path.exists() => path,
            _ => {
                debug!("no configuration file, using defaults");
                return Ok(ShellConfig::default());
            }
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    info!("loaded configuration from {}", path.display());
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<ShellConfig> {
    let config: ShellConfig = toml::from_str(content)?;
    if config.dir_stack_capacity == 0 {
        bail!("dir_stack_capacity must be at least 1");
    }
    Ok(config)
}

/// Loads the configured dotenv files into the process environment. Variables
/// that are already set keep their value.
pub fn apply_env_files(config: &ShellConfig) -> Result<()> {
    for path in &config.env_files {
        if !path.exists() {
            debug!("env file {} not found, skipping", path.display());
            continue;
        }
        dotenvy::from_path(path).with_context(|| format!("Failed to load env file: {}", path.display()))?;
        info!("loaded environment from {}", path.display());
    }
    Ok(())
}
