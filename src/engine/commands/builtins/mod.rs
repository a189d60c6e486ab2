pub mod env;
pub mod io;
pub mod stack;
pub mod common; // Private helpers

use crate::engine::context::ShellContext;

/// Helper to register all built-in commands at once
pub fn register_all_builtins(ctx: &mut ShellContext) {
    // Process / navigation
    ctx.register_command("exit", Box::new(env::exit::ExitCommand));
    ctx.register_command("quit", Box::new(env::exit::ExitCommand));
    ctx.register_command("cd", Box::new(env::cd::CdCommand));

    // Directory stack
    ctx.register_command("pushd", Box::new(stack::pushd::PushdCommand));
    ctx.register_command("popd", Box::new(stack::popd::PopdCommand));
    ctx.register_command("dirs", Box::new(stack::dirs::DirsCommand));

    // IO
    ctx.register_command("echo", Box::new(io::echo::EchoCommand));
    ctx.register_command("pwd", Box::new(io::pwd::PwdCommand));
    ctx.register_command("history", Box::new(io::history::HistoryCommand));
}
