#![allow(dead_code)]
//! Test fixtures - files on disk in a private temp directory

use regex::Regex;
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;
use tempfile::TempDir;

/// A file written into its own temporary directory
pub struct TestFixture {
    /// Kept alive so the directory outlives the test
    _temp_dir: TempDir,
    /// Path to the file
    pub path: PathBuf,
}

impl TestFixture {
    /// Create `filename` with exactly `content`
    pub fn new(filename: &str, content: &str) -> io::Result<Self> {
        Self::from_bytes(filename, content.as_bytes())
    }

    pub fn from_bytes(filename: &str, content: &[u8]) -> io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(filename);
        std::fs::write(&path, content)?;
        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    /// Create `filename` with each of `lines` followed by a newline
    pub fn with_lines(filename: &str, lines: &[&str]) -> io::Result<Self> {
        let content: String = lines.iter().map(|line| format!("{line}\n")).collect();
        Self::new(filename, &content)
    }

    /// Write another file next to this one
    pub fn sibling(&self, filename: &str, content: &str) -> io::Result<PathBuf> {
        let path = self._temp_dir.path().join(filename);
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

/// Remove SGR color sequences from rendered text, leaving tabs and `\r` alone
pub fn strip_ansi(text: &str) -> String {
    static SGR: OnceLock<Regex> = OnceLock::new();
    let sgr = SGR.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid SGR pattern"));
    sgr.replace_all(text, "").into_owned()
}
