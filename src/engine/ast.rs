/// One piece of a word: either literal text or the name of an environment
/// variable to substitute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPart {
    pub text: String,
    pub expand: bool,
}

impl WordPart {
    pub fn literal(text: impl Into<String>) -> Self {
        Self { text: text.into(), expand: false }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self { text: name.into(), expand: true }
    }
}

/// A single logical token made of parts that concatenate left to right.
///
/// A word whose second part is the literal `=` is an environment assignment:
/// the first part names the variable and the parts after `=` form the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    pub fn new(parts: Vec<WordPart>) -> Self {
        Self { parts }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(vec![WordPart::literal(text)])
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::new(vec![WordPart::var(name)])
    }

    /// `NAME=value` with a literal value.
    pub fn assignment(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(vec![
            WordPart::literal(name),
            WordPart::literal("="),
            WordPart::literal(value),
        ])
    }

    /// Text of the first part, unexpanded. Empty for a word with no parts.
    pub fn name(&self) -> &str {
        self.parts.first().map(|p| p.text.as_str()).unwrap_or("")
    }

    pub fn is_assignment(&self) -> bool {
        matches!(self.parts.get(1), Some(p) if !p.expand && p.text == "=")
    }

    /// Verbs made of more than one part are always routed through the
    /// builtin dispatcher, which expands them first.
    pub fn is_compound(&self) -> bool {
        self.parts.len() > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IoFlags {
    pub out_append: bool,
    pub err_append: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCommand {
    pub verb: Word,
    pub params: Vec<Word>,
    pub input: Option<Word>,
    pub output: Option<Word>,
    pub error: Option<Word>,
    pub io_flags: IoFlags,
}

impl SimpleCommand {
    pub fn new(verb: Word) -> Self {
        Self {
            verb,
            params: Vec::new(),
            input: None,
            output: None,
            error: None,
            io_flags: IoFlags::default(),
        }
    }

    pub fn arg(mut self, word: Word) -> Self {
        self.params.push(word);
        self
    }

    pub fn stdin_from(mut self, target: Word) -> Self {
        self.input = Some(target);
        self
    }

    pub fn stdout_to(mut self, target: Word, append: bool) -> Self {
        self.output = Some(target);
        self.io_flags.out_append = append;
        self
    }

    pub fn stderr_to(mut self, target: Word, append: bool) -> Self {
        self.error = Some(target);
        self.io_flags.err_append = append;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    // "a ; b"
    Sequential,
    // "a & b"
    Parallel,
    // "a && b"
    AndThen,
    // "a || b"
    OrElse,
    // "a | b"
    Pipe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTree {
    Simple(SimpleCommand),
    Compound {
        op: Operator,
        left: Box<CommandTree>,
        right: Box<CommandTree>,
    },
}

impl CommandTree {
    pub fn compound(op: Operator, left: CommandTree, right: CommandTree) -> Self {
        CommandTree::Compound {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl From<SimpleCommand> for CommandTree {
    fn from(cmd: SimpleCommand) -> Self {
        CommandTree::Simple(cmd)
    }
}
