//! Main parser coordinator
//!
//! This module provides the [`parse`] entry point and the shared parsing
//! infrastructure: the [`ParseContext`] threaded through every grammar rule,
//! the nom error type [`Fault`], and the user-facing [`ParseError`].
//!
//! # Parser Architecture
//!
//! - [`lexical`](super::lexical): trivia and terminal matching
//! - [`grammar`](super::grammar): rule functions composed from nom combinators
//! - [`binder`](super::binder): turns each rule's matched parts into a node
//! - This module: context, error classification and coordination
//!
//! # Parse Context
//!
//! The context replaces any ambient parser state. It owns the offset →
//! (line, column) table used to stamp node positions, a reference to the
//! binding table, and the furthest-failure record used for diagnostics.
//! One context lives exactly as long as one call to [`parse`], so
//! independent parses never share state.
//!
//! # Nesting
//!
//! Every rule application counts one nesting level. A parenthesised
//! expression costs one level per precedence layer it passes through, and a
//! nested block costs two. Past [`MAX_NESTING`] levels the parse stops with
//! a syntax error; below it the stack grows on demand.

use super::ast::{AstNode, StmtList};
use super::binder::{self, Binder, BindError, Bound, Part, Parts, Rule};
use super::grammar;
use super::lexical::Token;
use super::location::{LineIndex, SourceLocation};
use log::{debug, trace};
use nom::error::ErrorKind;
use nom::IResult;
use std::cell::{Cell, RefCell};
use std::fmt;
use thiserror::Error;

/// Deepest rule nesting accepted before the parse is stopped
pub const MAX_NESTING: usize = 1000;

/// Remaining stack below which a rule moves onto a fresh segment
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each stack segment allocated for deep input
pub const STACK_SEGMENT: usize = 1024 * 1024;

/// Result of every grammar rule
pub type PResult<'s, O = Parts<'s>> = IResult<&'s str, O, Fault>;

/// nom error type used by the grammar.
///
/// `Backtrack` carries nothing: where a failure happened is recorded in the
/// [`ParseContext`] instead. `Abort` stops the whole parse with a finished
/// diagnostic and is always raised as `nom::Err::Failure`.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    Backtrack,
    Abort(Box<ParseError>),
}

impl<'s> nom::error::ParseError<&'s str> for Fault {
    fn from_error_kind(_input: &'s str, _kind: ErrorKind) -> Self {
        Fault::Backtrack
    }

    fn append(_input: &'s str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

/// Parse failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// No grammar alternative matched the token at the error position
    LexicalMismatch,
    /// A prefix of the input parsed, but not all of it
    IncompleteParse,
    /// A literal matched but its value could not be computed
    LiteralEvaluation,
    /// The rule-to-node binding table is miswired
    Binder,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::LexicalMismatch => write!(f, "Syntax error"),
            ParseErrorKind::IncompleteParse => write!(f, "Incomplete parse"),
            ParseErrorKind::LiteralEvaluation => write!(f, "Invalid literal"),
            ParseErrorKind::Binder => write!(f, "Binder error"),
        }
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset of the error anchor
    pub offset: usize,
    pub location: SourceLocation,
    /// Unparsed text from the anchor to the end of its line
    pub remainder: String,
    /// Terminals that would have been accepted at the anchor
    pub expected: Vec<Token>,
    pub message: String,
}

/// Explicit parser state for one parse call
pub struct ParseContext<'s> {
    source: &'s str,
    lines: LineIndex,
    binder: &'static Binder,
    furthest: Cell<usize>,
    expected: RefCell<Vec<Token>>,
    depth: Cell<usize>,
}

/// One entered nesting level; leaving the rule releases it.
pub(crate) struct DepthGuard<'c> {
    depth: &'c Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

impl<'s> ParseContext<'s> {
    pub fn new(source: &'s str, binder: &'static Binder) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            binder,
            furthest: Cell::new(0),
            expected: RefCell::new(Vec::new()),
            depth: Cell::new(0),
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Offset of `rest` within the source; `rest` must be a suffix of it.
    pub fn offset(&self, rest: &str) -> usize {
        self.source.len().saturating_sub(rest.len())
    }

    pub fn location(&self, offset: usize) -> SourceLocation {
        self.lines.locate(offset)
    }

    /// Record that `token` was tried and failed at the start of `rest`.
    pub(crate) fn expect(&self, rest: &str, token: Token) {
        let offset = self.offset(rest);
        let furthest = self.furthest.get();
        let mut expected = self.expected.borrow_mut();
        if offset > furthest {
            self.furthest.set(offset);
            expected.clear();
            expected.push(token);
        } else if offset == furthest && !expected.contains(&token) {
            expected.push(token);
        }
    }

    /// Enter one nesting level for a rule starting at `offset`.
    pub(crate) fn enter(&self, offset: usize) -> Result<DepthGuard<'_>, nom::Err<Fault>> {
        let depth = self.depth.get() + 1;
        if depth > MAX_NESTING {
            return Err(self.abort(
                ParseErrorKind::LexicalMismatch,
                offset,
                format!("nesting too deep (more than {} levels)", MAX_NESTING),
            ));
        }
        self.depth.set(depth);
        Ok(DepthGuard { depth: &self.depth })
    }

    /// Apply `rule`'s binding to its matched parts. A built node is stamped
    /// with the location of the rule's first token.
    pub(crate) fn bind(
        &self,
        rule: Rule,
        start: usize,
        parts: Parts<'s>,
    ) -> Result<Parts<'s>, nom::Err<Fault>> {
        match self.binder.apply(rule, parts) {
            Ok(Bound::Passed(parts)) => Ok(parts),
            Ok(Bound::Built(mut node)) => {
                let location = self.location(start);
                node.set_location(location);
                trace!(
                    "{} -> {} `{}` at {}",
                    rule,
                    node.as_node_ref().kind_name(),
                    node.label(),
                    location
                );
                Ok(vec![Part::Node(node)])
            }
            Err(BindError::Literal(err)) => Err(self.abort(
                ParseErrorKind::LiteralEvaluation,
                start,
                err.to_string(),
            )),
            Err(err) => Err(self.abort(ParseErrorKind::Binder, start, err.to_string())),
        }
    }

    /// Build a diagnostic anchored at `offset`.
    pub fn error(
        &self,
        kind: ParseErrorKind,
        offset: usize,
        expected: Vec<Token>,
        message: String,
    ) -> ParseError {
        let offset = offset.min(self.source.len());
        let rest = self.source.get(offset..).unwrap_or_default();
        let remainder = rest.lines().next().unwrap_or_default().trim_end().to_string();
        ParseError {
            kind,
            offset,
            location: self.location(offset),
            remainder,
            expected,
            message,
        }
    }

    /// Stop the parse with a finished diagnostic.
    pub(crate) fn abort(&self, kind: ParseErrorKind, offset: usize, message: String) -> nom::Err<Fault> {
        nom::Err::Failure(Fault::Abort(Box::new(self.error(kind, offset, Vec::new(), message))))
    }

    /// Diagnostic for a parse that backtracked out of the program rule.
    ///
    /// Anchored at the furthest offset any terminal was tried. End of input
    /// is only tried where the statement sequence stopped, so when it is
    /// among the expected terminals nothing got further than that prefix.
    fn syntax_error(&self) -> ParseError {
        let offset = self.furthest.get();
        let expected = self.expected.borrow().clone();
        let kind = if expected.contains(&Token::Eof) {
            ParseErrorKind::IncompleteParse
        } else {
            ParseErrorKind::LexicalMismatch
        };
        let found = match self.source.get(offset..).and_then(|rest| rest.chars().next()) {
            Some(_) => {
                let line = self.error(kind, offset, Vec::new(), String::new()).remainder;
                format!("`{}`", line)
            }
            None => Token::Eof.to_string(),
        };
        let message = describe_expected(&expected, &found);
        self.error(kind, offset, expected, message)
    }
}

fn describe_expected(expected: &[Token], found: &str) -> String {
    let wanted: Vec<String> = expected
        .iter()
        .filter(|token| **token != Token::Eof)
        .map(Token::to_string)
        .collect();
    match wanted.as_slice() {
        [] => format!("unexpected {}", found),
        [one] => format!("expected {}, found {}", one, found),
        many => format!("expected one of {}, found {}", many.join(", "), found),
    }
}

/// Parse a whole program.
///
/// Returns the root statement list (with `is_program` set) or the first
/// error; no partial tree is ever returned.
pub fn parse(source: &str) -> Result<StmtList, ParseError> {
    let binder = binder::binder().map_err(|err| ParseError {
        kind: ParseErrorKind::Binder,
        offset: 0,
        location: SourceLocation::new(1, 1),
        remainder: source.lines().next().unwrap_or_default().to_string(),
        expected: Vec::new(),
        message: err.to_string(),
    })?;

    let cx = ParseContext::new(source, binder);
    debug!("Parsing {} bytes", source.len());

    let parts = match grammar::program(&cx, source) {
        Ok((_, parts)) => parts,
        Err(nom::Err::Failure(Fault::Abort(err))) | Err(nom::Err::Error(Fault::Abort(err))) => {
            debug!("Parse aborted: {}", err);
            return Err(*err);
        }
        Err(_) => {
            let err = cx.syntax_error();
            debug!("Parse failed: {}", err);
            return Err(err);
        }
    };

    let mut parts = parts.into_iter();
    match (parts.next(), parts.next()) {
        (Some(Part::Node(AstNode::StmtList(mut program))), None) => {
            program.is_program = true;
            debug!("Parsed {} top-level statements", program.statements.len());
            Ok(program)
        }
        _ => Err(cx.error(
            ParseErrorKind::Binder,
            0,
            Vec::new(),
            format!("rule `{}` did not produce a single statement list", Rule::Program),
        )),
    }
}
