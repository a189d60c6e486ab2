use crate::engine::ast::{SimpleCommand, Word, WordPart};
use log::trace;
use std::env;

/// Expands a word against the process environment.
///
/// The assignment form (`NAME = value`) sets the variable as a side effect
/// and expands to nothing, so it never shows up in an argument list.
pub fn expand_word(word: &Word) -> String {
    if word.is_assignment() {
        let value = concat_parts(&word.parts[2..]);
        trace!("assign {}={}", word.name(), value);
        // SAFETY: the interpreter is single-threaded; forked branches get
        // their own copy of the environment.
        unsafe { env::set_var(word.name(), value) };
        return String::new();
    }
    concat_parts(&word.parts)
}

fn concat_parts(parts: &[WordPart]) -> String {
    let mut res = String::new();
    for part in parts {
        if part.expand {
            // Unset variables contribute nothing
            if let Some(val) = env::var_os(&part.text) {
                res.push_str(&val.to_string_lossy());
            }
        } else {
            res.push_str(&part.text);
        }
    }
    res
}

/// Builds the argument vector for a simple command.
///
/// `args[0]` is the verb's unexpanded name; parameters follow in order, with
/// every parameter that expands to the empty string left out.
pub fn build_args(cmd: &SimpleCommand) -> Vec<String> {
    let mut args = Vec::with_capacity(cmd.params.len() + 1);
    args.push(cmd.verb.name().to_string());
    for param in &cmd.params {
        let arg = expand_word(param);
        if !arg.is_empty() {
            args.push(arg);
        }
    }
    trace!("argv: {:?}", args);
    args
}
