use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Ordered log of the lines entered in this session.
///
/// When backed by a file, earlier sessions are loaded on start and new
/// entries are appended on [`History::flush`].
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    path: Option<PathBuf>,
    flushed: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read history file: {}", path.display()))?;
            content.lines().filter(|l| !l.trim().is_empty()).map(String::from).collect()
        } else {
            Vec::new()
        };
        let flushed = entries.len();
        Ok(Self {
            entries,
            path: Some(path.to_path_buf()),
            flushed,
        })
    }

    pub fn record(&mut self, line: &str) {
        let line = line.trim_end_matches(['\n', '\r']);
        if !line.trim().is_empty() {
            self.entries.push(line.to_string());
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Drops the backing file. Forked branches call this so only the
    /// interactive process ever appends to it.
    pub fn detach(&mut self) {
        self.path = None;
    }

    pub fn flush(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if self.flushed == self.entries.len() {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open history file: {}", path.display()))?;
        for line in &self.entries[self.flushed..] {
            writeln!(file, "{}", line)?;
        }
        self.flushed = self.entries.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines() {
        let _guard = crate::engine::tests::serial();
        let mut h = History::new();
        h.record("ls -l\n");
        h.record("   ");
        h.record("");
        assert_eq!(h.entries(), &["ls -l".to_string()]);
    }

    #[test]
    fn flush_appends_only_new_entries() {
        let _guard = crate::engine::tests::serial();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        fs::write(&path, "old\n").unwrap();

        let mut h = History::load(&path).unwrap();
        assert_eq!(h.entries().len(), 1);
        h.record("first");
        h.flush().unwrap();
        h.record("second");
        h.flush().unwrap();
        h.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nfirst\nsecond\n");
    }

    #[test]
    fn flush_without_file_is_noop() {
        let _guard = crate::engine::tests::serial();
        let mut h = History::new();
        h.record("echo hi");
        assert!(h.flush().is_ok());
    }

    #[test]
    fn detached_history_never_writes() {
        let _guard = crate::engine::tests::serial();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");

        let mut h = History::load(&path).unwrap();
        h.record("in a branch");
        h.detach();
        h.flush().unwrap();

        assert!(!path.exists());
        assert_eq!(h.entries().len(), 1);
    }
}
