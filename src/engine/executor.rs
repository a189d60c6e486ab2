use crate::engine::ast::{CommandTree, Operator, SimpleCommand};
use crate::engine::commands::builtin::{is_builtin, run_builtin};
use crate::engine::commands::system::{run_external, wait_status};
use crate::engine::context::ShellContext;
use crate::engine::expand::{build_args, expand_word};
use crate::engine::redirect::{enter_child, exit_child, flush_std_streams, report};
use anyhow::{Context, Result};
use log::debug;
use nix::fcntl::{FcntlArg, FdFlag, fcntl};
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::{ForkResult, Pid, dup2, fork, pipe};
use std::os::fd::{AsRawFd, OwnedFd};

/// Evaluates a command tree and returns its exit status.
///
/// Only `&` and `|` fork; `;`, `&&` and `||` recurse in the current process.
pub fn run_cmd(tree: &CommandTree, ctx: &mut ShellContext) -> Result<i32> {
    match tree {
        CommandTree::Simple(cmd) => run_simple(cmd, ctx),
        CommandTree::Compound { op, left, right } => match op {
            Operator::Sequential => handle_sequence(left, right, ctx, SequenceMode::Always),
            Operator::AndThen => handle_sequence(left, right, ctx, SequenceMode::And),
            Operator::OrElse => handle_sequence(left, right, ctx, SequenceMode::Or),
            Operator::Parallel => run_parallel(left, right, ctx),
            Operator::Pipe => run_pipe(left, right, ctx),
        },
    }
}

fn run_simple(cmd: &SimpleCommand, ctx: &mut ShellContext) -> Result<i32> {
    if is_builtin(cmd, ctx) {
        if let Some(status) = run_builtin(cmd, ctx) {
            return Ok(status);
        }
    }

    let args = build_args(cmd);
    let verb = expand_word(&cmd.verb);
    if verb.is_empty() {
        return Ok(0);
    }
    run_external(cmd, &verb, &args)
}

#[derive(PartialEq)]
enum SequenceMode {
    And,
    Or,
    Always,
}

fn handle_sequence(
    left: &CommandTree,
    right: &CommandTree,
    ctx: &mut ShellContext,
    mode: SequenceMode,
) -> Result<i32> {
    let left_res = match run_cmd(left, ctx) {
        Ok(status) => status,
        // "a ; b" still runs b when a could not even start
        Err(e) if mode == SequenceMode::Always => {
            report(&format!("{:#}", e));
            1
        }
        Err(e) => return Err(e),
    };

    let proceed = match mode {
        SequenceMode::And => left_res == 0,
        SequenceMode::Or => left_res != 0,
        SequenceMode::Always => true,
    };

    if proceed { run_cmd(right, ctx) } else { Ok(left_res) }
}

fn run_parallel(left: &CommandTree, right: &CommandTree, ctx: &mut ShellContext) -> Result<i32> {
    let first = spawn_branch(left, ctx, || Ok(()))?;
    let second = match spawn_branch(right, ctx, || Ok(())) {
        Ok(pid) => pid,
        Err(e) => {
            let _ = wait_status(first);
            return Err(e);
        }
    };
    debug!("parallel branches: {} {}", first, second);

    let first_res = wait_status(first);
    let second_res = wait_status(second);
    Ok(first_res? | second_res?)
}

fn run_pipe(left: &CommandTree, right: &CommandTree, ctx: &mut ShellContext) -> Result<i32> {
    let mut pipe = Pipe::open()?;
    let producer = spawn_branch(left, ctx, || pipe.attach(PipeEnd::Write))?;
    let consumer = match spawn_branch(right, ctx, || pipe.attach(PipeEnd::Read)) {
        Ok(pid) => pid,
        Err(e) => {
            pipe.close();
            let _ = wait_status(producer);
            return Err(e);
        }
    };
    // Both ends must be gone from this process or the consumer never sees EOF
    pipe.close();
    debug!("pipe: {} | {}", producer, consumer);

    let produced = wait_status(producer);
    let consumed = wait_status(consumer);
    produced?;
    consumed
}

/// Forks a branch process that wires its standard streams, evaluates `tree`
/// and exits with the resulting status. Only the parent returns.
fn spawn_branch<F>(tree: &CommandTree, ctx: &mut ShellContext, wire: F) -> Result<Pid>
where
    F: FnOnce() -> Result<()>,
{
    flush_std_streams();
    // SAFETY: the interpreter is single-threaded and the child leaves via _exit.
    match unsafe { fork() }.context("fork failed")? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => {
            enter_child();
            ctx.history.detach();
            let status = match wire().and_then(|()| run_cmd(tree, ctx)) {
                Ok(status) => status,
                Err(e) => {
                    report(&format!("{:#}", e));
                    1
                }
            };
            exit_child(status & 0xff)
        }
    }
}

#[derive(Clone, Copy)]
enum PipeEnd {
    Read,
    Write,
}

struct Pipe {
    reader: Option<OwnedFd>,
    writer: Option<OwnedFd>,
}

impl Pipe {
    fn open() -> Result<Self> {
        let (reader, writer) = pipe().context("pipe failed")?;
        // Keep the raw ends out of anything a branch execs
        for fd in [&reader, &writer] {
            fcntl(fd.as_raw_fd(), FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC)).context("fcntl failed")?;
        }
        Ok(Self {
            reader: Some(reader),
            writer: Some(writer),
        })
    }

    /// Rebinds stdin or stdout to one end, then drops both original handles.
    fn attach(&mut self, end: PipeEnd) -> Result<()> {
        let (fd, target) = match end {
            PipeEnd::Read => (&self.reader, STDIN_FILENO),
            PipeEnd::Write => (&self.writer, STDOUT_FILENO),
        };
        if let Some(fd) = fd {
            dup2(fd.as_raw_fd(), target).context("dup2 failed")?;
        }
        self.close();
        Ok(())
    }

    fn close(&mut self) {
        self.reader.take();
        self.writer.take();
    }
}
