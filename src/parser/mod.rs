//! Source parser for a small object-oriented language
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexical`]: trivia and terminals, matched directly on the source text
//! - [`grammar`]: layered-precedence rules composed from nom combinators
//! - [`binder`]: maps each named rule to the AST node it constructs
//! - [`parse`]: the [`parse()`](parse::parse) entry point, context and errors
//! - [`ast`]: AST node definitions
//! - [`render`]: box-drawing tree rendering
//!
//! # Supported Language
//!
//! - Declarations: classes, functions with modifiers, typed variables
//! - Statements: assignment, `return`, `if`/`else`, `for`, blocks
//! - Expressions: arithmetic, comparison, logical, compound assignment,
//!   calls, `new`, dotted member chains
//! - Literals: numbers, double-quoted strings, `true`/`false`
//!
//! Relational (`<`, `>`, ...) and equality (`==`, `!=`) operators do not
//! chain: `a < b < c` is a syntax error.

pub mod ast;
pub mod binder;
pub mod grammar;
pub mod lexical;
pub mod literal;
pub mod location;
pub mod parse;
pub mod render;

pub use parse::{parse, ParseError, ParseErrorKind};
