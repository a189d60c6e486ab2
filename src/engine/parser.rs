use crate::engine::ast::{CommandTree, Operator, SimpleCommand, Word, WordPart};
use anyhow::{Result, bail};
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Redir {
    In,        // <
    Out,       // >
    Append,    // >>
    Stderr,    // 2>
    StderrApp, // 2>>
    Both,      // &>
    BothApp,   // &>>
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(Word),
    Redirect(Redir),
    Op(Operator),
    Semi,
}

/// Parses one input line into a command tree. `Ok(None)` means the line was
/// blank or only a comment.
pub fn parse_line(line: &str) -> Result<Option<CommandTree>> {
    let tokens = tokenize(line)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let mut parser = Parser { tokens, pos: 0, end: line.len() };
    let tree = parser.sequence()?;
    if let Some((_, at)) = parser.tokens.get(parser.pos) {
        bail!("parse error near {}: unexpected token", at);
    }
    Ok(Some(tree))
}

fn tokenize(line: &str) -> Result<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(at, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => break,
            ';' => {
                chars.next();
                tokens.push((Token::Semi, at));
            }
            '|' => {
                chars.next();
                if chars.next_if(|&(_, n)| n == '|').is_some() {
                    tokens.push((Token::Op(Operator::OrElse), at));
                } else {
                    tokens.push((Token::Op(Operator::Pipe), at));
                }
            }
            '&' => {
                chars.next();
                if chars.next_if(|&(_, n)| n == '&').is_some() {
                    tokens.push((Token::Op(Operator::AndThen), at));
                } else if chars.next_if(|&(_, n)| n == '>').is_some() {
                    let kind = if chars.next_if(|&(_, n)| n == '>').is_some() { Redir::BothApp } else { Redir::Both };
                    tokens.push((Token::Redirect(kind), at));
                } else {
                    tokens.push((Token::Op(Operator::Parallel), at));
                }
            }
            '<' => {
                chars.next();
                tokens.push((Token::Redirect(Redir::In), at));
            }
            '>' => {
                chars.next();
                let kind = if chars.next_if(|&(_, n)| n == '>').is_some() { Redir::Append } else { Redir::Out };
                tokens.push((Token::Redirect(kind), at));
            }
            '2' if line[at + 1..].starts_with('>') => {
                chars.next();
                chars.next();
                let kind = if chars.next_if(|&(_, n)| n == '>').is_some() { Redir::StderrApp } else { Redir::Stderr };
                tokens.push((Token::Redirect(kind), at));
            }
            _ => {
                let word = lex_word(&mut chars)?;
                tokens.push((Token::Word(word), at));
            }
        }
    }
    Ok(tokens)
}

fn is_word_break(c: char) -> bool {
    c.is_whitespace() || matches!(c, ';' | '&' | '|' | '<' | '>')
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Accumulates the parts of one word while it is being lexed.
#[derive(Default)]
struct WordBuilder {
    parts: Vec<WordPart>,
    buf: String,
    quoted: bool,
    assigned: bool,
}

impl WordBuilder {
    fn flush_literal(&mut self) {
        if !self.buf.is_empty() {
            self.parts.push(WordPart::literal(std::mem::take(&mut self.buf)));
        }
    }

    fn push_var(&mut self, name: String) {
        self.flush_literal();
        self.parts.push(WordPart::var(name));
    }

    fn push_equals(&mut self) {
        // Only a bare, unquoted NAME before the first '=' makes an assignment.
        if !self.assigned && !self.quoted && self.parts.is_empty() && is_name(&self.buf) {
            self.flush_literal();
            self.parts.push(WordPart::literal("="));
            self.assigned = true;
        } else {
            self.buf.push('=');
        }
    }

    fn finish(mut self) -> Word {
        if self.buf.is_empty() && self.parts.is_empty() && self.quoted {
            // "" is still a word
            self.parts.push(WordPart::literal(""));
        }
        self.flush_literal();
        Word::new(self.parts)
    }
}

fn lex_word(chars: &mut Peekable<CharIndices>) -> Result<Word> {
    let mut word = WordBuilder::default();

    while let Some(&(at, c)) = chars.peek() {
        if is_word_break(c) {
            break;
        }
        chars.next();
        match c {
            '\'' => {
                word.quoted = true;
                loop {
                    match chars.next() {
                        Some((_, '\'')) => break,
                        Some((_, ch)) => word.buf.push(ch),
                        None => bail!("parse error near {}: unterminated single quote", at),
                    }
                }
            }
            '"' => {
                word.quoted = true;
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next_if(|&(_, n)| matches!(n, '"' | '\\' | '$')) {
                            Some((_, esc)) => word.buf.push(esc),
                            None => word.buf.push('\\'),
                        },
                        Some((_, '$')) => lex_dollar(chars, &mut word, at)?,
                        Some((_, ch)) => word.buf.push(ch),
                        None => bail!("parse error near {}: unterminated double quote", at),
                    }
                }
            }
            '\\' => {
                word.quoted = true;
                match chars.next() {
                    Some((_, ch)) => word.buf.push(ch),
                    None => word.buf.push('\\'),
                }
            }
            '$' => lex_dollar(chars, &mut word, at)?,
            '=' => word.push_equals(),
            ch => word.buf.push(ch),
        }
    }
    Ok(word.finish())
}

fn lex_dollar(chars: &mut Peekable<CharIndices>, word: &mut WordBuilder, at: usize) -> Result<()> {
    if chars.next_if(|&(_, n)| n == '{').is_some() {
        let mut name = String::new();
        loop {
            match chars.next() {
                Some((_, '}')) => break,
                Some((_, ch)) => name.push(ch),
                None => bail!("parse error near {}: unterminated ${{", at),
            }
        }
        if !is_name(&name) {
            bail!("parse error near {}: bad substitution ${{{}}}", at, name);
        }
        word.push_var(name);
        return Ok(());
    }

    let mut name = String::new();
    if chars.peek().is_some_and(|&(_, n)| n.is_ascii_alphabetic() || n == '_') {
        while let Some((_, ch)) = chars.next_if(|&(_, n)| n.is_ascii_alphanumeric() || n == '_') {
            name.push(ch);
        }
    }
    if name.is_empty() {
        word.buf.push('$');
    } else {
        word.push_var(name);
    }
    Ok(())
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|(_, at)| *at).unwrap_or(self.end)
    }

    // seq := par (';' par)* [';']
    fn sequence(&mut self) -> Result<CommandTree> {
        let mut tree = self.parallel()?;
        while self.peek() == Some(&Token::Semi) {
            self.pos += 1;
            if self.peek().is_none() {
                break;
            }
            let right = self.parallel()?;
            tree = CommandTree::compound(Operator::Sequential, tree, right);
        }
        Ok(tree)
    }

    // par := cond ('&' cond)*
    fn parallel(&mut self) -> Result<CommandTree> {
        let mut tree = self.conditional()?;
        while self.peek() == Some(&Token::Op(Operator::Parallel)) {
            self.pos += 1;
            if self.peek().is_none() {
                bail!("parse error near {}: background jobs are not supported", self.offset());
            }
            let right = self.conditional()?;
            tree = CommandTree::compound(Operator::Parallel, tree, right);
        }
        Ok(tree)
    }

    // cond := pipe (('&&' | '||') pipe)*
    fn conditional(&mut self) -> Result<CommandTree> {
        let mut tree = self.pipeline()?;
        while let Some(Token::Op(op @ (Operator::AndThen | Operator::OrElse))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let right = self.pipeline()?;
            tree = CommandTree::compound(op, tree, right);
        }
        Ok(tree)
    }

    // pipe := simple ('|' simple)*
    fn pipeline(&mut self) -> Result<CommandTree> {
        let mut tree = self.simple()?;
        while self.peek() == Some(&Token::Op(Operator::Pipe)) {
            self.pos += 1;
            let right = self.simple()?;
            tree = CommandTree::compound(Operator::Pipe, tree, right);
        }
        Ok(tree)
    }

    fn simple(&mut self) -> Result<CommandTree> {
        let start = self.offset();
        let mut words = Vec::new();
        let mut redirects = Vec::new();

        loop {
            match self.peek() {
                Some(Token::Word(w)) => {
                    words.push(w.clone());
                    self.pos += 1;
                }
                Some(Token::Redirect(kind)) => {
                    let kind = *kind;
                    self.pos += 1;
                    match self.peek() {
                        Some(Token::Word(target)) => {
                            redirects.push((kind, target.clone()));
                            self.pos += 1;
                        }
                        _ => bail!("parse error near {}: missing redirection target", self.offset()),
                    }
                }
                _ => break,
            }
        }

        let mut words = words.into_iter();
        let Some(verb) = words.next() else {
            bail!("parse error near {}: expected a command", start);
        };
        let mut cmd = SimpleCommand::new(verb);
        cmd.params.extend(words);
        for (kind, target) in redirects {
            cmd = match kind {
                Redir::In => cmd.stdin_from(target),
                Redir::Out => cmd.stdout_to(target, false),
                Redir::Append => cmd.stdout_to(target, true),
                Redir::Stderr => cmd.stderr_to(target, false),
                Redir::StderrApp => cmd.stderr_to(target, true),
                Redir::Both => cmd.stdout_to(target.clone(), false).stderr_to(target, false),
                Redir::BothApp => cmd.stdout_to(target.clone(), true).stderr_to(target, true),
            };
        }
        Ok(CommandTree::Simple(cmd))
    }
}
