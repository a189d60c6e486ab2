pub mod builtin;
pub mod builtins;
pub mod system;

use crate::engine::context::ShellContext;
use anyhow::Result;
use std::io::Write;

/// A command that runs inside the interpreter's own process.
///
/// `args[0]` is the command name. Output goes to `stdout`/`stderr`, which
/// already honour the command's redirections.
pub trait Executable: Send + Sync {
    fn execute(
        &self,
        args: &[String],
        ctx: &mut ShellContext,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<i32>;
}
