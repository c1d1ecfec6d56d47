//! Syntax highlighting with syntect
//!
//! # Design
//! - **Whole-text input**: callers pass the entire file so multi-line constructs
//!   (block comments, strings) tokenize correctly.
//! - **Line breaks preserved**: the output has exactly as many `\n` as the input.
//!   Every highlighted line ends with a reset so styling never bleeds across lines.
//! - **Never fails**: unknown syntaxes, missing themes and per-line highlight errors
//!   all degrade to unstyled text.

use crate::primitives::lexer::LexerChoice;
use crate::primitives::line_source::trim_line_ending;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

/// Theme used when none is configured or the configured one is unknown
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// SGR reset, appended after each styled line
const RESET: &str = "\x1b[0m";

/// Where highlighted text is going
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormatterTarget {
    /// 24-bit ANSI escapes for a terminal
    #[default]
    Terminal,
    /// No escapes; text passes through unchanged
    Plain,
}

/// Names of the bundled themes
pub fn theme_names() -> Vec<String> {
    ThemeSet::load_defaults().themes.into_keys().collect()
}

/// Highlights whole texts with a fixed theme and output target
pub struct Highlighter {
    syntax_set: Arc<SyntaxSet>,
    /// None only if syntect was built without any themes
    theme: Option<Theme>,
    target: FormatterTarget,
}

impl Highlighter {
    /// Create a highlighter using one of the bundled themes
    pub fn new(syntax_set: Arc<SyntaxSet>, theme_name: &str, target: FormatterTarget) -> Self {
        Self::with_theme_set(syntax_set, &ThemeSet::load_defaults(), theme_name, target)
    }

    pub fn with_theme_set(
        syntax_set: Arc<SyntaxSet>,
        themes: &ThemeSet,
        theme_name: &str,
        target: FormatterTarget,
    ) -> Self {
        let theme = match themes.themes.get(theme_name) {
            Some(theme) => Some(theme.clone()),
            None => {
                tracing::warn!(
                    "Unknown theme {:?}, falling back to {:?}",
                    theme_name,
                    DEFAULT_THEME
                );
                themes.themes.get(DEFAULT_THEME).cloned()
            }
        };

        Self {
            syntax_set,
            theme,
            target,
        }
    }

    /// Highlight `text` with `lexer`
    ///
    /// The result splits into the same number of lines as `text`.
    pub fn highlight(&self, text: &str, lexer: &LexerChoice) -> String {
        if self.target == FormatterTarget::Plain {
            return text.to_string();
        }

        let syntax = match lexer {
            LexerChoice::PlainText => return text.to_string(),
            LexerChoice::Syntax(name) => match self.syntax_set.find_syntax_by_name(name) {
                Some(syntax) => syntax,
                None => {
                    tracing::warn!("Syntax {:?} is not in the catalog, not highlighting", name);
                    return text.to_string();
                }
            },
        };

        let Some(theme) = &self.theme else {
            return text.to_string();
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut out = String::with_capacity(text.len() * 2);

        for (line_num, line) in LinesWithEndings::from(text).enumerate() {
            let body = trim_line_ending(line);
            let ending = &line[body.len()..];

            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    let ranges = clip_ranges(ranges, body.len());
                    if !ranges.is_empty() {
                        out.push_str(&as_24_bit_terminal_escaped(&ranges, false));
                        out.push_str(RESET);
                    }
                }
                Err(e) => {
                    tracing::warn!("Highlight error on line {}: {}", line_num, e);
                    out.push_str(body);
                }
            }
            out.push_str(ending);
        }

        out
    }
}

/// Keep only the first `len` bytes of highlighted text, dropping the line ending
fn clip_ranges(ranges: Vec<(Style, &str)>, len: usize) -> Vec<(Style, &str)> {
    let mut remaining = len;
    ranges
        .into_iter()
        .filter_map(|(style, text)| {
            if remaining == 0 || text.is_empty() {
                return None;
            }
            let take = text.len().min(remaining);
            remaining -= take;
            Some((style, &text[..take]))
        })
        .collect()
}
