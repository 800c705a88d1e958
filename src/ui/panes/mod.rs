//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting and the
//!   selected node's position marked
//! - [`tree`]: The rendered syntax tree with row selection
//! - [`status`]: Status bar with keybindings and parse state
//!
//! Each pane module exports a primary `render_*` function plus the state
//! types it scrolls with.

pub mod source;
pub mod status;
pub mod tree;

// Re-export render functions for convenience
pub use source::{render_source_pane, SourceRenderData, SourceScrollState};
pub use status::render_status_bar;
pub use tree::render_tree_pane;
