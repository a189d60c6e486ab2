// Exit command

use crate::engine::commands::Executable;
use crate::engine::context::ShellContext;
use anyhow::Result;
use log::warn;
use std::io::Write;

pub struct ExitCommand;
impl Executable for ExitCommand {
    fn execute(
        &self,
        args: &[String],
        ctx: &mut ShellContext,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<i32> {
        let exit_code = if args.len() > 1 {
            args[1].parse::<i32>().unwrap_or(0)
        } else {
            0
        };
        if let Err(e) = ctx.history.flush() {
            warn!("history not saved: {:#}", e);
        }
        stdout.flush().ok();
        std::process::exit(exit_code);
    }
}
