use crate::engine::commands::Executable;
use crate::engine::context::ShellContext;
use anyhow::{Context, Result};
use std::env;
use std::io::Write;

pub struct PwdCommand;

impl Executable for PwdCommand {
    fn execute(
        &self,
        _args: &[String],
        _ctx: &mut ShellContext,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<i32> {
        let cwd = env::current_dir().context("cannot read current directory")?;
        writeln!(stdout, "{}", cwd.display())?;
        Ok(0)
    }
}
