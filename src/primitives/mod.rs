//! Low-level primitives
//!
//! Line reading, lexer resolution and the syntect highlighting bridge.

pub mod highlighter;
pub mod lexer;
pub mod line_source;
