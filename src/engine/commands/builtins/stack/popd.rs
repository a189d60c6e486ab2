// Popd command

use crate::engine::commands::Executable;
use crate::engine::commands::builtins::common::change_dir;
use crate::engine::context::ShellContext;
use anyhow::{Result, bail};
use std::io::Write;

pub struct PopdCommand;
impl Executable for PopdCommand {
    fn execute(
        &self,
        _args: &[String],
        ctx: &mut ShellContext,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<i32> {
        let Some(dir) = ctx.dirs.pop() else {
            bail!("directory stack empty");
        };
        change_dir(&dir)?;
        Ok(0)
    }
}
