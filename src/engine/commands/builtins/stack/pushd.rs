// Pushd command

use crate::engine::commands::Executable;
use crate::engine::commands::builtins::common::change_dir;
use crate::engine::context::ShellContext;
use anyhow::{Context, Result};
use std::env;
use std::io::Write;
use std::path::Path;

pub struct PushdCommand;
impl Executable for PushdCommand {
    fn execute(
        &self,
        args: &[String],
        ctx: &mut ShellContext,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<i32> {
        if args.len() != 2 {
            writeln!(stderr, "usage: pushd <dir>")?;
            return Ok(1);
        }

        let cwd = env::current_dir().context("cannot read current directory")?;
        ctx.dirs.push(cwd)?;

        // Roll the push back so the stack only holds directories we left.
        if let Err(e) = change_dir(Path::new(&args[1])) {
            ctx.dirs.pop();
            return Err(e);
        }
        Ok(0)
    }
}
