// Cd command

use crate::engine::commands::Executable;
use crate::engine::commands::builtins::common::change_dir;
use crate::engine::context::ShellContext;
use anyhow::{Context, Result};
use std::env;
use std::io::Write;
use std::path::PathBuf;

pub struct CdCommand;
impl Executable for CdCommand {
    fn execute(
        &self,
        args: &[String],
        _ctx: &mut ShellContext,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<i32> {
        // args[0] is "cd". args[1] is path.
        let target = match args.get(1) {
            Some(dir) => PathBuf::from(dir),
            None => env::var_os("HOME").map(PathBuf::from).context("HOME not set")?,
        };
        change_dir(&target)?;
        Ok(0)
    }
}
