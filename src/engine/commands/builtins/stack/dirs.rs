// Dirs command

use crate::engine::commands::Executable;
use crate::engine::context::ShellContext;
use anyhow::{Result, bail};
use std::io::Write;

pub struct DirsCommand;
impl Executable for DirsCommand {
    fn execute(
        &self,
        _args: &[String],
        ctx: &mut ShellContext,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<i32> {
        if ctx.dirs.is_empty() {
            bail!("directory stack empty");
        }
        for dir in ctx.dirs.iter() {
            writeln!(stdout, "{}", dir.display())?;
        }
        Ok(0)
    }
}
