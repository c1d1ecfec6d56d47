//! Print a window of a file's lines, each prefixed with its line number,
//! optionally syntax highlighted.
//!
//! The interesting part lives in [`view::renderer`]: a [`LineRenderer`]
//! either streams the requested slice of the file as-is, or highlights the
//! whole file and then serves the requested window out of the highlighted
//! lines.

pub mod config;
pub mod primitives;
pub mod services;
pub mod view;

pub use view::renderer::{render, LineRenderer, RenderOptions};
pub use view::window::LineWindow;
