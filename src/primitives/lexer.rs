//! Lexer resolution: which grammar should highlight a file
//!
//! Two strategies, both total:
//! - **Fast**: a short, ordered chain of extension matchers for the most common
//!   languages. First match wins; order is significant.
//! - **Exhaustive**: syntect's catalog lookup (extension, file name, first line).
//!
//! Anything unmatched resolves to [`LexerChoice::PlainText`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use syntect::parsing::SyntaxSet;

/// Name of syntect's built-in plain text syntax
pub const PLAIN_TEXT_NAME: &str = "Plain Text";

/// How to tokenize a file, resolved once per render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerChoice {
    /// A syntax from the catalog, by display name (e.g. "Python", "C++")
    Syntax(String),
    /// No tokenization; text passes through unstyled
    PlainText,
}

impl LexerChoice {
    pub fn name(&self) -> &str {
        match self {
            Self::Syntax(name) => name,
            Self::PlainText => PLAIN_TEXT_NAME,
        }
    }
}

/// Lexer lookup strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LexerStrategy {
    /// Fixed-priority extension chain (Python, C/C++, Java)
    #[default]
    Fast,
    /// Full catalog lookup, including first-line detection
    Exhaustive,
}

type Matcher = fn(&str) -> bool;

/// Fast strategy matchers, in priority order
const FAST_MATCHERS: &[(Matcher, &str)] = &[
    (is_python, "Python"),
    (is_c_family, "C++"),
    (is_java, "Java"),
];

const C_FAMILY_SUFFIXES: &[&str] = &[
    ".c", ".h", ".cpp", ".hpp", ".cc", ".hh", ".cxx", ".hxx", ".c++", ".h++",
];

fn is_python(file_name: &str) -> bool {
    file_name.ends_with(".py")
}

fn is_c_family(file_name: &str) -> bool {
    C_FAMILY_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
}

fn is_java(file_name: &str) -> bool {
    file_name.ends_with(".java")
}

/// Resolve with the fast matcher chain only; needs no catalog
pub fn resolve_fast(path: &Path) -> LexerChoice {
    let Some(file_name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return LexerChoice::PlainText;
    };

    FAST_MATCHERS
        .iter()
        .find(|(matches, _)| matches(&file_name))
        .map_or(LexerChoice::PlainText, |(_, name)| {
            LexerChoice::Syntax((*name).to_string())
        })
}

/// Resolves a [`LexerChoice`] for a path using the configured strategy
pub struct LexerResolver {
    syntax_set: Arc<SyntaxSet>,
    strategy: LexerStrategy,
}

impl LexerResolver {
    pub fn new(syntax_set: Arc<SyntaxSet>, strategy: LexerStrategy) -> Self {
        Self {
            syntax_set,
            strategy,
        }
    }

    pub fn resolve(&self, path: &Path) -> LexerChoice {
        let choice = match self.strategy {
            LexerStrategy::Fast => resolve_fast(path),
            LexerStrategy::Exhaustive => self.resolve_exhaustive(path),
        };
        tracing::debug!(
            "Resolved lexer {:?} for {} ({:?} strategy)",
            choice.name(),
            path.display(),
            self.strategy
        );
        choice
    }

    fn resolve_exhaustive(&self, path: &Path) -> LexerChoice {
        // find_syntax_for_file reads the first line when the extension is unknown
        let found = match self.syntax_set.find_syntax_for_file(path) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(
                    "First-line detection failed for {}: {}, using extension only",
                    path.display(),
                    e
                );
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(|ext| self.syntax_set.find_syntax_by_extension(ext))
            }
        };

        match found {
            Some(syntax) if syntax.name != PLAIN_TEXT_NAME => {
                LexerChoice::Syntax(syntax.name.clone())
            }
            _ => LexerChoice::PlainText,
        }
    }
}
