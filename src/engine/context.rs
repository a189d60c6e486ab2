use crate::config::ShellConfig;
use crate::engine::commands::Executable;
use crate::engine::dirstack::DirStack;
use crate::engine::history::History;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-session interpreter state, threaded by reference through the
/// evaluator, the runner and every builtin.
///
/// A forked branch works on its own copy; nothing it changes here is seen by
/// the parent.
#[derive(Clone)]
pub struct ShellContext {
    pub dirs: DirStack,
    pub history: History,
    pub registry: Arc<HashMap<String, Box<dyn Executable>>>,
}

impl ShellContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            dirs: DirStack::default(),
            history: History::new(),
            registry: Arc::new(HashMap::new()),
        };
        crate::engine::commands::builtins::register_all_builtins(&mut ctx);
        ctx
    }

    pub fn from_config(config: &ShellConfig) -> Result<Self> {
        let mut ctx = Self::new();
        ctx.dirs = DirStack::new(config.dir_stack_capacity);
        if let Some(path) = &config.history_file {
            ctx.history = History::load(path)?;
        }
        Ok(ctx)
    }

    pub fn register_command(&mut self, name: &str, command: Box<dyn Executable>) {
        if let Some(map) = Arc::get_mut(&mut self.registry) {
            map.insert(name.to_string(), command);
        } else {
            // Registration only happens while the context is being built
            panic!("Cannot register command: Registry is shared");
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }
}

impl Default for ShellContext {
    fn default() -> Self {
        Self::new()
    }
}
