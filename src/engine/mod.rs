pub mod ast;
pub mod commands;
pub mod context;
pub mod dirstack;
pub mod executor;
pub mod expand;
pub mod history;
pub mod parser;
pub mod redirect;

use anyhow::Result;
use context::ShellContext;

pub use executor::run_cmd;


/// Parses and runs one line. A blank line is a successful no-op.
pub fn run_command_line(line: &str, ctx: &mut ShellContext) -> Result<i32> {
    match parser::parse_line(line)? {
        Some(tree) => run_cmd(&tree, ctx),
        None => Ok(0),
    }
}
