use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_CAPACITY: usize = 128;

/// Returned by [`DirStack::push`] when the stack is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackFull {
    pub capacity: usize,
}

impl fmt::Display for StackFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "directory stack full ({} entries)", self.capacity)
    }
}

impl std::error::Error for StackFull {}

/// Bounded LIFO of working directories backing `pushd`, `popd` and `dirs`.
#[derive(Debug, Clone)]
pub struct DirStack {
    dirs: Vec<PathBuf>,
    capacity: usize,
}

impl DirStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            dirs: Vec::new(),
            capacity,
        }
    }

    pub fn init(&mut self) {
        self.dirs.clear();
    }

    /// Pushes `path` and returns the new depth. A full stack is left untouched.
    pub fn push(&mut self, path: PathBuf) -> Result<usize, StackFull> {
        if self.dirs.len() >= self.capacity {
            return Err(StackFull { capacity: self.capacity });
        }
        self.dirs.push(path);
        Ok(self.dirs.len())
    }

    pub fn pop(&mut self) -> Option<PathBuf> {
        self.dirs.pop()
    }

    /// Top of the stack first.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.dirs.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DirStack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_on_full_stack_fails_without_mutation() {
        let _guard = crate::engine::tests::serial();
        let mut ds = DirStack::new(2);
        ds.push(PathBuf::from("/a")).unwrap();
        ds.push(PathBuf::from("/b")).unwrap();

        let err = ds.push(PathBuf::from("/c")).unwrap_err();
        assert_eq!(err, StackFull { capacity: 2 });
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.iter().next().unwrap(), &PathBuf::from("/b"));
    }

    #[test]
    fn pop_on_empty_stack() {
        let _guard = crate::engine::tests::serial();
        let mut ds = DirStack::default();
        assert!(ds.pop().is_none());
        assert!(ds.is_empty());
    }

    #[test]
    fn pops_in_reverse_insertion_order() {
        let _guard = crate::engine::tests::serial();
        let mut ds = DirStack::default();
        let paths: Vec<PathBuf> = (0..10).map(|i| PathBuf::from(format!("/d{}", i))).collect();
        for (i, p) in paths.iter().enumerate() {
            assert_eq!(ds.push(p.clone()), Ok(i + 1));
        }

        let listed: Vec<&PathBuf> = ds.iter().collect();
        assert_eq!(listed.first(), Some(&&paths[9]));

        let popped: Vec<PathBuf> = std::iter::from_fn(|| ds.pop()).collect();
        let expected: Vec<PathBuf> = paths.into_iter().rev().collect();
        assert_eq!(popped, expected);
    }

    #[test]
    fn init_resets() {
        let _guard = crate::engine::tests::serial();
        let mut ds = DirStack::new(4);
        ds.push(PathBuf::from("/x")).unwrap();
        ds.init();
        assert!(ds.is_empty());
        assert_eq!(ds.capacity(), 4);
    }
}
