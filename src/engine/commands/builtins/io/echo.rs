// Echo command

use crate::engine::commands::Executable;
use crate::engine::context::ShellContext;
use anyhow::Result;
use std::io::Write;

pub struct EchoCommand;

impl Executable for EchoCommand {
    fn execute(
        &self,
        args: &[String],
        _ctx: &mut ShellContext,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<i32> {
        // Skip "echo" in args[0]
        let output = args[1..].join(" ");
        writeln!(stdout, "{}", output)?;
        Ok(0)
    }
}
