// Builtin dispatch
use crate::engine::ast::SimpleCommand;
use crate::engine::context::ShellContext;
use crate::engine::expand::{build_args, expand_word};
use crate::engine::redirect::{Redirections, report};
use log::debug;
use std::io::Write;

/// Whether `cmd` has to go through the in-process dispatcher.
///
/// That is the case for a verb that literally names a builtin, and for any
/// verb made of several parts (assignments such as `X=1`, or names that are
/// only known after expansion).
pub fn is_builtin(cmd: &SimpleCommand, ctx: &ShellContext) -> bool {
    if cmd.verb.is_compound() {
        return true;
    }
    matches!(cmd.verb.parts.first(), Some(part) if !part.expand && ctx.is_builtin(&part.text))
}

/// Runs `cmd` in-process and returns its status, or `None` when the expanded
/// verb turns out not to be a builtin.
pub fn run_builtin(cmd: &SimpleCommand, ctx: &mut ShellContext) -> Option<i32> {
    let verb = expand_word(&cmd.verb);
    if verb.is_empty() {
        return Some(0);
    }
    let registry = ctx.registry.clone();
    let builtin = registry.get(&verb)?;

    let args = build_args(cmd);
    let (mut out, mut err) = match Redirections::open(cmd).and_then(Redirections::into_sinks) {
        Ok(sinks) => sinks,
        Err(e) => {
            report(&format!("{}: {:#}", verb, e));
            return Some(1);
        }
    };

    debug!("builtin {} {:?}", verb, &args[1..]);
    let status = match builtin.execute(&args, ctx, &mut out, &mut err) {
        Ok(code) => code,
        Err(e) => {
            writeln!(err, "{}: {:#}", verb, e).ok();
            1
        }
    };
    Some(status)
}
