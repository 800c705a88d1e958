//! Lexical layer of the grammar
//!
//! There is no separate token stream: the grammar matches terminals directly
//! against the source text. Every terminal first skips trivia (whitespace,
//! `//` line comments, `/* */` block comments), then tries to match, and on
//! failure reports itself to the [`ParseContext`] so the furthest failure can
//! name what was expected there.

use super::parse::{Fault, PResult, ParseContext, ParseErrorKind};
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_while};
use nom::character::complete::{anychar, char, digit0, digit1, multispace0, one_of, satisfy};
use nom::combinator::{eof, not, opt, recognize, verify};
use nom::multi::many0_count;
use nom::sequence::{delimited, pair, terminated, tuple};
use nom::IResult;
use std::fmt;

/// Words that can never be identifiers
pub const RESERVED: [&str; 8] = ["if", "else", "for", "return", "new", "class", "true", "false"];

/// Terminal symbols of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Lexeme classes
    Ident,
    Number,
    StringLit,

    // Keywords
    If,
    Else,
    For,
    Return,
    New,
    Class,
    True,
    False,

    // Modifiers, recognised by position only
    Public,
    Protected,
    Private,
    Static,
    Async,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||

    // Assignment
    Eq,      // =
    PlusEq,  // +=
    MinusEq, // -=
    StarEq,  // *=
    SlashEq, // /=

    // Punctuation
    Dot,       // .
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,

    Eof,
}

impl Token {
    /// Fixed source text of the token, `None` for lexeme classes and end of input
    pub fn text(self) -> Option<&'static str> {
        Some(match self {
            Token::Ident | Token::Number | Token::StringLit | Token::Eof => return None,
            Token::If => "if",
            Token::Else => "else",
            Token::For => "for",
            Token::Return => "return",
            Token::New => "new",
            Token::Class => "class",
            Token::True => "true",
            Token::False => "false",
            Token::Public => "public",
            Token::Protected => "protected",
            Token::Private => "private",
            Token::Static => "static",
            Token::Async => "async",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::Le => "<=",
            Token::Gt => ">",
            Token::Ge => ">=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Eq => "=",
            Token::PlusEq => "+=",
            Token::MinusEq => "-=",
            Token::StarEq => "*=",
            Token::SlashEq => "/=",
            Token::Dot => ".",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Semicolon => ";",
            Token::Comma => ",",
        })
    }

    /// Keywords and modifiers must not run into a following identifier character.
    pub fn is_word(self) -> bool {
        self.text()
            .is_some_and(|text| text.starts_with(|c: char| c.is_ascii_alphabetic()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident => write!(f, "identifier"),
            Token::Number => write!(f, "number"),
            Token::StringLit => write!(f, "string literal"),
            Token::Eof => write!(f, "end of input"),
            other => match other.text() {
                Some(text) => write!(f, "'{}'", text),
                None => write!(f, "{:?}", other),
            },
        }
    }
}

pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Skip whitespace and comments. An unterminated block comment aborts the
/// parse at the comment's start.
pub fn trivia<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s, ()> {
    let mut input = input;
    loop {
        let (rest, _) = multispace0::<_, Fault>(input)?;
        input = rest;

        if let Some(comment) = input.strip_prefix("//") {
            let end = comment.find('\n').unwrap_or(comment.len());
            input = &comment[end..];
        } else if let Some(comment) = input.strip_prefix("/*") {
            match comment.find("*/") {
                Some(end) => input = &comment[end + 2..],
                None => {
                    return Err(cx.abort(
                        ParseErrorKind::LexicalMismatch,
                        cx.offset(input),
                        "unterminated block comment".to_string(),
                    ))
                }
            }
        } else {
            return Ok((input, ()));
        }
    }
}

/// Match one terminal after skipping trivia; yields the matched text.
pub fn terminal<'c, 's>(
    cx: &'c ParseContext<'s>,
    token: Token,
) -> impl Fn(&'s str) -> PResult<'s, &'s str> + 'c {
    move |input| {
        let (input, ()) = trivia(cx, input)?;
        let matched = match token {
            Token::Ident => identifier(input),
            Token::Number => number(input),
            Token::StringLit => string(input),
            Token::Eof => eof(input),
            fixed => match fixed.text() {
                Some(text) if fixed.is_word() => word(text)(input),
                Some(text) => tag(text)(input),
                None => Err(nom::Err::Error(Fault::Backtrack)),
            },
        };
        if let Err(nom::Err::Error(_)) = matched {
            cx.expect(input, token);
        }
        matched
    }
}

fn word<'s>(text: &'static str) -> impl Fn(&'s str) -> IResult<&'s str, &'s str, Fault> {
    move |input| terminated(tag(text), not(satisfy(is_ident_char)))(input)
}

/// `[A-Za-z_][A-Za-z0-9_]*`, excluding reserved words
fn identifier(input: &str) -> IResult<&str, &str, Fault> {
    verify(
        recognize(pair(
            satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
            take_while(is_ident_char),
        )),
        |word: &str| !is_reserved(word),
    )(input)
}

/// `[+-]?\d+\.?\d*([eE][+-]?\d+)?`
fn number(input: &str) -> IResult<&str, &str, Fault> {
    recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(char('.')),
        digit0,
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

/// Double-quoted string on a single line, quotes included. Escapes are
/// only skipped here; they are decoded when the literal is evaluated.
fn string(input: &str) -> IResult<&str, &str, Fault> {
    recognize(delimited(
        char('"'),
        many0_count(alt((recognize(pair(char('\\'), anychar)), is_not("\\\"\n")))),
        char('"'),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::binder;

    fn run<'s>(source: &'s str, token: Token) -> Option<(&'s str, &'s str)> {
        let binder = binder::binder().unwrap();
        let cx = ParseContext::new(source, binder);
        let result = terminal(&cx, token)(source).ok();
        result
    }

    #[test]
    fn test_identifier() {
        assert_eq!(run("foo_1 bar", Token::Ident), Some((" bar", "foo_1")));
        assert_eq!(run("_x", Token::Ident), Some(("", "_x")));
        assert_eq!(run("1abc", Token::Ident), None);
    }

    #[test]
    fn test_reserved_words_are_not_identifiers() {
        assert_eq!(run("return", Token::Ident), None);
        assert_eq!(run("returned", Token::Ident), Some(("", "returned")));
        // Modifiers are not reserved
        assert_eq!(run("public", Token::Ident), Some(("", "public")));
    }

    #[test]
    fn test_keyword_boundary() {
        assert_eq!(run("if (", Token::If), Some((" (", "if")));
        assert_eq!(run("iffy", Token::If), None);
        assert_eq!(run("new_thing", Token::New), None);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(run("42;", Token::Number), Some((";", "42")));
        assert_eq!(run("-3.25e+2)", Token::Number), Some((")", "-3.25e+2")));
        assert_eq!(run("7.", Token::Number), Some(("", "7.")));
        assert_eq!(run(".5", Token::Number), None);
    }

    #[test]
    fn test_strings_keep_quotes() {
        assert_eq!(
            run(r#""a \"b\"" + 1"#, Token::StringLit),
            Some((" + 1", r#""a \"b\"""#))
        );
        assert_eq!(run("\"open", Token::StringLit), None);
        assert_eq!(run("\"two\nlines\"", Token::StringLit), None);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            run("  // note\n /* block\n comment */ x", Token::Ident),
            Some(("", "x"))
        );
    }

    #[test]
    fn test_unterminated_block_comment_aborts() {
        let binder = binder::binder().unwrap();
        let source = "a /* never closed";
        let cx = ParseContext::new(source, binder);
        let result = terminal(&cx, Token::Ident)(&source[1..]);
        let Err(nom::Err::Failure(Fault::Abort(err))) = result else {
            panic!("Expected an aborted parse");
        };
        assert_eq!(err.kind, ParseErrorKind::LexicalMismatch);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_operators_match_by_prefix() {
        assert_eq!(run(">= b", Token::Gt), Some(("= b", ">")));
        assert_eq!(run(">= b", Token::Ge), Some((" b", ">=")));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::Semicolon.to_string(), "';'");
        assert_eq!(Token::LBrace.to_string(), "'{'");
        assert_eq!(Token::Ident.to_string(), "identifier");
        assert_eq!(Token::Eof.to_string(), "end of input");
        assert!(Token::Static.is_word());
        assert!(!Token::AndAnd.is_word());
    }
}
