// System command
use crate::engine::ast::SimpleCommand;
use crate::engine::redirect::{Redirections, enter_child, exit_child, flush_std_streams, report};
use anyhow::{Context, Result};
use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, execvp, fork};
use std::ffi::{CStr, CString};

/// Status reported when a child did not terminate through a normal exit.
pub const RUNNER_FAILURE: i32 = -1;

/// Forks and execs `verb` with `args`, applying the command's redirections in
/// the child only, and waits for it.
pub fn run_external(cmd: &SimpleCommand, verb: &str, args: &[String]) -> Result<i32> {
    let program = CString::new(verb).with_context(|| format!("invalid command name: {:?}", verb))?;
    let argv = args
        .iter()
        .map(|a| CString::new(a.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("{}: argument contains a NUL byte", verb))?;

    flush_std_streams();
    // SAFETY: the child only opens files, rebinds descriptors and execs.
    match unsafe { fork() }.with_context(|| format!("fork failed for '{}'", verb))? {
        ForkResult::Child => exec_child(cmd, &program, &argv),
        ForkResult::Parent { child } => {
            debug!("spawned '{}' as pid {}", verb, child);
            let status = wait_status(child)?;
            debug!("pid {} ('{}') finished with {}", child, verb, status);
            Ok(status)
        }
    }
}

fn exec_child(cmd: &SimpleCommand, program: &CStr, argv: &[CString]) -> ! {
    enter_child();
    if let Err(e) = Redirections::open(cmd).and_then(Redirections::install) {
        report(&format!("{:#}", e));
        exit_child(1);
    }

    // The runtime ignores SIGPIPE; exec'd programs get the default back.
    // SAFETY: SIG_DFL installs no handler code.
    if let Err(e) = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) } {
        warn!("could not restore SIGPIPE: {}", e);
    }

    let Err(errno) = execvp(program, argv);
    report(&format!("Execution failed for '{}': {}", cmd.verb.name(), errno.desc()));
    exit_child(if errno == Errno::ENOENT { 127 } else { 126 })
}

/// Blocks until `pid` terminates and maps the outcome to a status.
pub fn wait_status(pid: Pid) -> Result<i32> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                warn!("pid {} terminated by {}", pid, sig);
                return Ok(RUNNER_FAILURE);
            }
            Ok(other) => {
                warn!("pid {} ended abnormally: {:?}", pid, other);
                return Ok(RUNNER_FAILURE);
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e).with_context(|| format!("waitpid failed for pid {}", pid)),
        }
    }
}
