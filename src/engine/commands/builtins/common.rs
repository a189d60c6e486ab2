use anyhow::{Result, anyhow};
use std::env;
use std::path::Path;

pub fn change_dir(path: &Path) -> Result<()> {
    env::set_current_dir(path).map_err(|e| anyhow!("{}: {}", path.display(), e))
}
