//! Line window renderers
//!
//! A renderer is built from `(path, window)`, initialized once, then queried with
//! [`LineRenderer::format_line`] for each line number in [`LineRenderer::window`].
//!
//! # Variants
//! - [`PlainRenderer`] streams only the requested slice of the file. Its realized
//!   window ends at `start + lines_read`, and lines are looked up relative to
//!   `start`. `start` itself is never clamped.
//! - [`HighlightingRenderer`] highlights the *whole* file (tokenizing needs full
//!   context), splits the result back into lines and then clamps the requested
//!   window against that line count. Lines are looked up by absolute number, so it
//!   answers for any line in the file, inside the window or not.
//!
//! For a given file both variants realize the same window whenever the requested
//! start is inside the file and not past the requested end. Otherwise they
//! disagree: the plain renderer reports `start..start`, the highlighting one an
//! empty range at the clamped end.
//!
//! Querying before `initialize` always gives no content.

use crate::primitives::highlighter::{FormatterTarget, Highlighter, DEFAULT_THEME};
use crate::primitives::lexer::{LexerChoice, LexerResolver, LexerStrategy};
use crate::primitives::line_source::{self, split_lines, LineSource};
use crate::view::window::LineWindow;
use anyhow::{Context, Result};
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use syntect::parsing::SyntaxSet;

/// Everything that picks and configures a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Use the highlighting renderer
    pub highlight: bool,
    pub lexer_strategy: LexerStrategy,
    pub formatter: FormatterTarget,
    pub theme: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            highlight: true,
            lexer_strategy: LexerStrategy::default(),
            formatter: FormatterTarget::default(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn plain() -> Self {
        Self {
            highlight: false,
            formatter: FormatterTarget::Plain,
            ..Self::default()
        }
    }
}

/// Renders the requested slice of a file as-is
#[derive(Debug)]
pub struct PlainRenderer {
    path: PathBuf,
    requested: LineWindow,
    /// Lines `start..start + len`, None until initialized
    lines: Option<Vec<String>>,
}

impl PlainRenderer {
    pub fn new(path: impl Into<PathBuf>, window: LineWindow) -> Self {
        Self {
            path: path.into(),
            requested: window,
            lines: None,
        }
    }

    /// Read the lines inside the requested window
    ///
    /// Calling this again re-reads the same window from disk.
    pub fn initialize(&mut self) -> Result<()> {
        if self.lines.is_some() {
            tracing::warn!("PlainRenderer for {} initialized twice", self.path.display());
        }

        let lines = LineSource::open(&self.path, self.requested)
            .with_context(|| format!("Failed to open {}", self.path.display()))?
            .map(|line| line.map(|line| line.text))
            .collect::<io::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        tracing::debug!(
            "PlainRenderer: read {} lines of {} for window {}",
            lines.len(),
            self.path.display(),
            self.requested
        );
        self.lines = Some(lines);
        Ok(())
    }

    pub fn format_line(&self, line: usize) -> Option<&str> {
        let lines = self.lines.as_ref()?;
        let idx = line.checked_sub(self.requested.start)?;
        lines.get(idx).map(String::as_str)
    }

    pub fn window(&self) -> Range<usize> {
        let start = self.requested.start;
        start..start + self.lines.as_ref().map_or(0, Vec::len)
    }

    pub fn is_initialized(&self) -> bool {
        self.lines.is_some()
    }
}

/// State produced by [`HighlightingRenderer::initialize`]
struct HighlightedFile {
    lexer: LexerChoice,
    lines: Vec<String>,
    window: Range<usize>,
}

/// Highlights the whole file and serves a window of it
pub struct HighlightingRenderer {
    path: PathBuf,
    requested: LineWindow,
    resolver: LexerResolver,
    highlighter: Highlighter,
    realized: Option<HighlightedFile>,
}

impl HighlightingRenderer {
    pub fn new(
        path: impl Into<PathBuf>,
        window: LineWindow,
        resolver: LexerResolver,
        highlighter: Highlighter,
    ) -> Self {
        Self {
            path: path.into(),
            requested: window,
            resolver,
            highlighter,
            realized: None,
        }
    }

    /// Resolve the lexer, highlight the whole file, split it and clamp the window
    ///
    /// Calling this again redoes all of it from the originally requested window.
    pub fn initialize(&mut self) -> Result<()> {
        if self.realized.is_some() {
            tracing::warn!(
                "HighlightingRenderer for {} initialized twice",
                self.path.display()
            );
        }

        let lexer = self.resolver.resolve(&self.path);
        let source = line_source::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let highlighted = self.highlighter.highlight(&source, &lexer);
        let lines: Vec<String> = split_lines(&highlighted).map(str::to_owned).collect();

        let source_count = split_lines(&source).count();
        if lines.len() != source_count {
            tracing::warn!(
                "Highlighting {} with {:?} produced {} lines, source has {}",
                self.path.display(),
                lexer.name(),
                lines.len(),
                source_count
            );
        }

        let window = self.requested.clamp_to(lines.len());
        tracing::debug!(
            "HighlightingRenderer: {} lines of {}, window {} clamped to {:?}",
            lines.len(),
            self.path.display(),
            self.requested,
            window
        );

        self.realized = Some(HighlightedFile {
            lexer,
            lines,
            window,
        });
        Ok(())
    }

    /// Line `line` of the highlighted file, by absolute number
    pub fn format_line(&self, line: usize) -> Option<&str> {
        self.realized
            .as_ref()?
            .lines
            .get(line)
            .map(String::as_str)
    }

    pub fn window(&self) -> Range<usize> {
        match &self.realized {
            Some(file) => file.window.clone(),
            None => self.requested.start..self.requested.start,
        }
    }

    /// Number of lines in the highlighted file, 0 before initialization
    pub fn total_line_count(&self) -> usize {
        self.realized.as_ref().map_or(0, |file| file.lines.len())
    }

    /// The lexer picked during initialization
    pub fn lexer(&self) -> Option<&LexerChoice> {
        self.realized.as_ref().map(|file| &file.lexer)
    }

    pub fn is_initialized(&self) -> bool {
        self.realized.is_some()
    }
}

/// One of the two renderer variants, picked by the caller
pub enum LineRenderer {
    Plain(PlainRenderer),
    Highlighting(HighlightingRenderer),
}

impl LineRenderer {
    /// Build the renderer `options` asks for
    ///
    /// The highlighting variant loads syntect's bundled syntaxes and themes here.
    pub fn new(path: impl Into<PathBuf>, window: LineWindow, options: &RenderOptions) -> Self {
        if !options.highlight {
            return Self::Plain(PlainRenderer::new(path, window));
        }

        let syntax_set = Arc::new(SyntaxSet::load_defaults_newlines());
        let resolver = LexerResolver::new(Arc::clone(&syntax_set), options.lexer_strategy);
        let highlighter = Highlighter::new(syntax_set, &options.theme, options.formatter);
        Self::Highlighting(HighlightingRenderer::new(
            path,
            window,
            resolver,
            highlighter,
        ))
    }

    pub fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Plain(renderer) => renderer.initialize(),
            Self::Highlighting(renderer) => renderer.initialize(),
        }
    }

    pub fn format_line(&self, line: usize) -> Option<&str> {
        match self {
            Self::Plain(renderer) => renderer.format_line(line),
            Self::Highlighting(renderer) => renderer.format_line(line),
        }
    }

    /// The realized window
    pub fn window(&self) -> Range<usize> {
        match self {
            Self::Plain(renderer) => renderer.window(),
            Self::Highlighting(renderer) => renderer.window(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        match self {
            Self::Plain(renderer) => renderer.is_initialized(),
            Self::Highlighting(renderer) => renderer.is_initialized(),
        }
    }

    /// `(line number, text)` for every line in the realized window
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.window()
            .map(move |line| (line, self.format_line(line).unwrap_or("")))
    }
}

/// Render the lines of `path` inside `window`
///
/// Returns `(line number, text)` pairs in order. Presentation (number columns,
/// separators) is left to the caller.
pub fn render(
    path: &Path,
    window: LineWindow,
    options: &RenderOptions,
) -> Result<Vec<(usize, String)>> {
    let mut renderer = LineRenderer::new(path, window, options);
    renderer.initialize()?;
    Ok(renderer
        .lines()
        .map(|(line, text)| (line, text.to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(content: &str, name: &str) -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_plain_before_initialize_is_empty() {
        let (_dir, path) = write_file("a\nb\n", "f.txt");
        let renderer = PlainRenderer::new(&path, LineWindow::bounded(0, 2));
        assert!(!renderer.is_initialized());
        assert_eq!(renderer.format_line(0), None);
        assert_eq!(renderer.window(), 0..0);
    }

    #[test]
    fn test_plain_relative_indexing() {
        let (_dir, path) = write_file("a\nb\nc\nd\n", "f.txt");
        let mut renderer = PlainRenderer::new(&path, LineWindow::bounded(1, 3));
        renderer.initialize().unwrap();

        assert_eq!(renderer.window(), 1..3);
        assert_eq!(renderer.format_line(0), None);
        assert_eq!(renderer.format_line(1), Some("b"));
        assert_eq!(renderer.format_line(2), Some("c"));
        assert_eq!(renderer.format_line(3), None);
    }

    #[test]
    fn test_plain_start_not_clamped() {
        let (_dir, path) = write_file("a\nb\n", "f.txt");
        let mut renderer = PlainRenderer::new(&path, LineWindow::from_start(10));
        renderer.initialize().unwrap();
        assert_eq!(renderer.window(), 10..10);
    }

    #[test]
    fn test_plain_reinitialize_rereads_requested_window() {
        let (_dir, path) = write_file("a\nb\nc\n", "f.txt");
        let mut renderer = PlainRenderer::new(&path, LineWindow::from_start(1));
        renderer.initialize().unwrap();
        std::fs::write(&path, "a\nB\nc\nd\n").unwrap();
        renderer.initialize().unwrap();

        assert_eq!(renderer.window(), 1..4);
        assert_eq!(renderer.format_line(1), Some("B"));
    }

    #[test]
    fn test_plain_missing_file_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("gone.txt");
        let mut renderer = PlainRenderer::new(&path, LineWindow::whole_file());
        let err = renderer.initialize().unwrap_err();
        assert!(err.to_string().contains("gone.txt"));
        assert!(!renderer.is_initialized());
    }

    #[test]
    fn test_highlighting_absolute_indexing() {
        let (_dir, path) = write_file("a\nb\nc\nd\n", "f.txt");
        let mut renderer =
            LineRenderer::new(&path, LineWindow::bounded(1, 3), &RenderOptions::default());
        renderer.initialize().unwrap();

        assert_eq!(renderer.window(), 1..3);
        // Answers outside the window, unlike the plain renderer
        assert_eq!(renderer.format_line(0), Some("a"));
        assert_eq!(renderer.format_line(3), Some("d"));
        assert_eq!(renderer.format_line(4), None);
    }

    #[test]
    fn test_highlighting_records_lexer() {
        let (_dir, path) = write_file("x = 1\n", "f.py");
        let LineRenderer::Highlighting(mut renderer) =
            LineRenderer::new(&path, LineWindow::whole_file(), &RenderOptions::default())
        else {
            panic!("expected the highlighting renderer");
        };
        assert_eq!(renderer.lexer(), None);
        assert_eq!(renderer.window(), 0..0);

        renderer.initialize().unwrap();
        assert_eq!(renderer.lexer(), Some(&LexerChoice::Syntax("Python".into())));
        assert_eq!(renderer.total_line_count(), 1);
    }

    #[test]
    fn test_options_pick_variant() {
        let path = Path::new("unused.txt");
        assert!(matches!(
            LineRenderer::new(path, LineWindow::whole_file(), &RenderOptions::plain()),
            LineRenderer::Plain(_)
        ));
        assert!(matches!(
            LineRenderer::new(path, LineWindow::whole_file(), &RenderOptions::default()),
            LineRenderer::Highlighting(_)
        ));
    }

    #[test]
    fn test_lines_fill_window() {
        let (_dir, path) = write_file("a\nb\nc\n", "f.txt");
        let mut renderer =
            LineRenderer::new(&path, LineWindow::from_start(1), &RenderOptions::plain());
        renderer.initialize().unwrap();
        let lines: Vec<(usize, &str)> = renderer.lines().collect();
        assert_eq!(lines, vec![(1, "b"), (2, "c")]);
    }
}
