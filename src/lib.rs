//! # Introduction
//!
//! treeform parses a small object-oriented, C-family language into a typed
//! abstract syntax tree and renders that tree as box-drawing text. The tree
//! can be printed or browsed next to its source in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Grammar (nom) → Binder → AST → Renderer → stdout | TUI
//! ```
//!
//! 1. [`parser`]: the grammar matches terminals directly on the source,
//!    each named rule's parts are turned into a node by the binder, and
//!    every node is stamped with the line and column of its first token.
//! 2. [`parser::render`]: one line per node, depth-first, with `├ └ │`
//!    prefixes.
//! 3. [`semantic`]: the type and access-modifier vocabulary leaf nodes
//!    resolve against.
//! 4. [`config`]: command-line options for the `treeform` binary.
//! 5. [`ui`]: ratatui-based explorer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let program = treeform::parser::parse("a = 1 + 2;").unwrap();
//! assert_eq!(program.tree(), vec!["...", "└ =", "  ├ a", "  └ +", "    ├ 1", "    └ 2"]);
//! ```

pub mod config;
pub mod parser;
pub mod semantic;
pub mod ui;
