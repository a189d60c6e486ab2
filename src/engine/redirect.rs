use crate::engine::ast::SimpleCommand;
use crate::engine::expand::expand_word;
use anyhow::{Context, Result};
use nix::libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::dup2;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsFd, AsRawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::sync::atomic::{AtomicBool, Ordering};

const FILE_MODE: u32 = 0o644;

pub enum ErrTarget {
    // "&> file": stderr shares the stdout handle
    SameAsStdout,
    File(File),
}

/// The files a simple command's redirections resolve to.
#[derive(Default)]
pub struct Redirections {
    pub stdin: Option<File>,
    pub stdout: Option<File>,
    pub stderr: Option<ErrTarget>,
}

impl Redirections {
    /// Expands and opens the targets in order: input, output, error.
    pub fn open(cmd: &SimpleCommand) -> Result<Self> {
        let mut redirs = Redirections::default();

        if let Some(word) = &cmd.input {
            let path = expand_word(word);
            let file = File::open(&path).with_context(|| format!("{}: cannot open for reading", path))?;
            redirs.stdin = Some(file);
        }

        let mut out_path = None;
        if let Some(word) = &cmd.output {
            let path = expand_word(word);
            redirs.stdout = Some(open_for_write(&path, cmd.io_flags.out_append)?);
            out_path = Some(path);
        }

        if let Some(word) = &cmd.error {
            let path = expand_word(word);
            if out_path.as_deref() == Some(path.as_str()) {
                redirs.stderr = Some(ErrTarget::SameAsStdout);
            } else {
                redirs.stderr = Some(ErrTarget::File(open_for_write(&path, cmd.io_flags.err_append)?));
            }
        }

        Ok(redirs)
    }

    /// Rebinds the standard descriptors of the current process. Only ever
    /// called in a freshly forked child.
    pub fn install(self) -> Result<()> {
        if let Some(file) = &self.stdin {
            dup2(file.as_raw_fd(), STDIN_FILENO).context("dup2 stdin")?;
        }
        if let Some(file) = &self.stdout {
            dup2(file.as_raw_fd(), STDOUT_FILENO).context("dup2 stdout")?;
        }
        match &self.stderr {
            Some(ErrTarget::SameAsStdout) => {
                dup2(STDOUT_FILENO, STDERR_FILENO).context("dup2 stderr")?;
            }
            Some(ErrTarget::File(file)) => {
                dup2(file.as_raw_fd(), STDERR_FILENO).context("dup2 stderr")?;
            }
            None => {}
        }
        // The originals close here; the dup'd descriptors stay open.
        Ok(())
    }

    /// Output and error sinks for a builtin running in-process.
    pub fn into_sinks(self) -> Result<(File, File)> {
        let out = match self.stdout {
            Some(file) => file,
            None => stdout_file()?,
        };
        let err = match self.stderr {
            Some(ErrTarget::SameAsStdout) => out.try_clone()?,
            Some(ErrTarget::File(file)) => file,
            None => stderr_file()?,
        };
        Ok((out, err))
    }
}

fn open_for_write(path: &str, append: bool) -> Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).mode(FILE_MODE);
    if append {
        opts.append(true);
    } else {
        opts.truncate(true);
    }
    opts.open(path).with_context(|| format!("{}: cannot open for writing", path))
}

/// An owned, unbuffered handle on descriptor 1.
///
/// Writing through a duplicate of the raw descriptor skips the std stdout
/// lock and its line buffer, both of which a forked child must not rely on.
pub fn stdout_file() -> Result<File> {
    let fd = io::stdout().as_fd().try_clone_to_owned().context("dup stdout")?;
    Ok(File::from(fd))
}

pub fn stderr_file() -> Result<File> {
    let fd = io::stderr().as_fd().try_clone_to_owned().context("dup stderr")?;
    Ok(File::from(fd))
}

static IN_CHILD: AtomicBool = AtomicBool::new(false);

/// Marks the current process as a forked child. Call first thing after `fork`.
pub fn enter_child() {
    IN_CHILD.store(true, Ordering::Relaxed);
}

/// Flushes whatever the std handles still buffer, so a fork does not copy
/// pending output. A no-op in forked children: they never write through the
/// std handles and their locks may belong to a thread that was not forked.
pub fn flush_std_streams() {
    if IN_CHILD.load(Ordering::Relaxed) {
        return;
    }
    io::stdout().flush().ok();
    io::stderr().flush().ok();
}

/// Leaves a forked child immediately, without exit handlers or stdio flushing.
pub fn exit_child(code: i32) -> ! {
    // SAFETY: _exit is async-signal-safe and takes no locks.
    unsafe { nix::libc::_exit(code) }
}

/// Best-effort diagnostic on descriptor 2.
pub fn report(msg: &str) {
    if let Ok(mut err) = stderr_file() {
        writeln!(err, "{}", msg).ok();
    }
}
