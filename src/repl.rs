use crate::engine::context::ShellContext;
use crate::engine::redirect::flush_std_streams;
use crate::engine::run_command_line;
use anyhow::Result;
use colored::*;
use log::warn;
use std::env;
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::os::fd::AsFd;

/// Runs one line (`-c`) and maps the outcome to a process exit status.
pub fn run_once(line: &str, ctx: &mut ShellContext) -> i32 {
    ctx.history.record(line);
    let status = match run_command_line(line, ctx) {
        Ok(status) => status & 0xff,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red(), e);
            1
        }
    };
    save_history(ctx);
    status
}

/// Reads lines from stdin until EOF, running each one. Failures are reported
/// and the loop carries on; only `exit`/`quit` end it early.
pub fn run_interactive(ctx: &mut ShellContext) -> Result<i32> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut input = File::from(stdin.as_fd().try_clone_to_owned()?);
    let mut line = String::new();

    loop {
        if interactive {
            print_prompt();
        }
        line.clear();
        if read_line_raw(&mut input, &mut line)? == 0 {
            break;
        }

        ctx.history.record(&line);
        if let Err(e) = run_command_line(&line, ctx) {
            flush_std_streams();
            eprintln!("{} {:#}", "error:".red(), e);
        }
    }

    save_history(ctx);
    Ok(0)
}

/// Reads one line a byte at a time, leaving everything after the newline
/// unread for the commands this line starts.
fn read_line_raw(input: &mut impl Read, line: &mut String) -> io::Result<usize> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                bytes.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    line.push_str(&String::from_utf8_lossy(&bytes));
    Ok(bytes.len())
}

fn print_prompt() {
    let cwd = env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "?".to_string());
    print!("{} #> ", cwd);
    io::stdout().flush().ok();
}

fn save_history(ctx: &mut ShellContext) {
    if let Err(e) = ctx.history.flush() {
        warn!("history not saved: {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{Seek, SeekFrom};

    #[test]
    fn reads_one_line_without_reading_ahead() {
        let _guard = crate::engine::tests::serial();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script");
        fs::write(&path, "echo a\ncat\nleft for cat\nlast").unwrap();
        let mut input = File::open(&path).unwrap();
        let mut line = String::new();

        assert_eq!(read_line_raw(&mut input, &mut line).unwrap(), 7);
        assert_eq!(line, "echo a\n");
        line.clear();
        read_line_raw(&mut input, &mut line).unwrap();
        assert_eq!(line, "cat\n");
        assert_eq!(input.stream_position().unwrap(), 11);

        let mut rest = String::new();
        input.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "left for cat\nlast");

        input.seek(SeekFrom::Start(24)).unwrap();
        line.clear();
        assert_eq!(read_line_raw(&mut input, &mut line).unwrap(), 4);
        assert_eq!(line, "last");
        line.clear();
        assert_eq!(read_line_raw(&mut input, &mut line).unwrap(), 0);
    }
}
