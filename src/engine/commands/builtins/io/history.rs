use crate::engine::commands::Executable;
use crate::engine::context::ShellContext;
use anyhow::Result;
use std::io::Write;

pub struct HistoryCommand;

impl Executable for HistoryCommand {
    fn execute(
        &self,
        _args: &[String],
        ctx: &mut ShellContext,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<i32> {
        for (idx, line) in ctx.history.entries().iter().enumerate() {
            writeln!(stdout, "{:5}  {}", idx + 1, line)?;
        }
        Ok(0)
    }
}
