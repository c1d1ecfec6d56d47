//! View layer
//!
//! Line windows and the renderers that realize them.

pub mod renderer;
pub mod window;
