//! Grammar
//!
//! Each named rule is a function `(context, input) -> PResult` built from
//! nom combinators. Rules call each other directly, so recursion needs no
//! forward declarations. The [`rule`] wrapper skips leading trivia, records
//! where the rule's first token starts, runs the rule body and hands the
//! collected parts to the binder.
//!
//! # Expression precedence
//!
//! Loosest binding last; every level folds left.
//!
//! | Rule | Operators | Repetition |
//! |---|---|---|
//! | `group` | literal, dotted chain, `( expr )` | |
//! | `dot` | `.` between `new`-calls, calls, identifiers | repeated |
//! | `mult` | `*` `/` `%` | repeated |
//! | `add` | `+` `-` | repeated |
//! | `compare1` | `>=` `<=` `>` `<` | at most once |
//! | `compare2` | `==` `!=` | at most once |
//! | `logical_and` | `&&` | repeated |
//! | `logical_or` | `\|\|` | repeated |
//! | `op_assign` | `*=` `/=` `+=` `-=` | repeated |

use super::binder::{Lexeme, LexemeClass, Part, Parts, Rule};
use super::lexical::{terminal, trivia, Token};
use super::parse::{Fault, PResult, ParseContext, STACK_RED_ZONE, STACK_SEGMENT};
use nom::branch::alt;
use nom::combinator::opt;
use nom::multi::{many0, separated_list0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated};
use stacker::maybe_grow;

/// Signature shared by all rule functions
type RuleFn<'s> = fn(&ParseContext<'s>, &'s str) -> PResult<'s>;

const MULT_OPS: &[Token] = &[Token::Star, Token::Slash, Token::Percent];
const ADD_OPS: &[Token] = &[Token::Plus, Token::Minus];
// Longest first: `>` must not claim the start of `>=`
const COMPARE_OPS: &[Token] = &[Token::Ge, Token::Le, Token::Gt, Token::Lt];
const EQUALITY_OPS: &[Token] = &[Token::EqEq, Token::NotEq];
const AND_OPS: &[Token] = &[Token::AndAnd];
const OR_OPS: &[Token] = &[Token::OrOr];
const ASSIGN_OPS: &[Token] = &[Token::StarEq, Token::SlashEq, Token::PlusEq, Token::MinusEq];

/// Run `inner` as the body of `rule` and bind its parts. Each call counts
/// one nesting level against [`MAX_NESTING`](super::parse::MAX_NESTING).
fn rule<'s, F>(cx: &ParseContext<'s>, rule: Rule, input: &'s str, mut inner: F) -> PResult<'s>
where
    F: FnMut(&'s str) -> PResult<'s>,
{
    let (input, ()) = trivia(cx, input)?;
    let start = cx.offset(input);
    let _depth = cx.enter(start)?;
    maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
        let (rest, parts) = inner(input)?;
        let parts = cx.bind(rule, start, parts)?;
        Ok((rest, parts))
    })
}

/// Match a terminal and drop it
fn punct<'c, 's>(cx: &'c ParseContext<'s>, token: Token) -> impl Fn(&'s str) -> PResult<'s, ()> + 'c {
    let matcher = terminal(cx, token);
    move |input| matcher(input).map(|(rest, _)| (rest, ()))
}

/// Match a terminal and keep its text
fn lexeme<'c, 's>(
    cx: &'c ParseContext<'s>,
    token: Token,
    class: LexemeClass,
) -> impl Fn(&'s str) -> PResult<'s> + 'c {
    let matcher = terminal(cx, token);
    move |input| {
        let (rest, text) = matcher(input)?;
        Ok((rest, vec![Part::Lexeme(Lexeme::new(text, class))]))
    }
}

/// First matching operator of `ops`
fn operator<'c, 's>(cx: &'c ParseContext<'s>, ops: &'static [Token]) -> impl Fn(&'s str) -> PResult<'s> + 'c {
    move |input| {
        for &op in ops {
            match lexeme(cx, op, LexemeClass::Operator)(input) {
                Err(nom::Err::Error(_)) => continue,
                result => return result,
            }
        }
        Err(nom::Err::Error(Fault::Backtrack))
    }
}

/// An optional slot that matched nothing
fn empty(input: &str) -> PResult<'_> {
    Ok((input, vec![Part::Empty]))
}

fn join<'s>(groups: impl IntoIterator<Item = Parts<'s>>) -> Parts<'s> {
    groups.into_iter().flatten().collect()
}

/// `operand (op operand)*`
fn repeated<'s>(cx: &ParseContext<'s>, input: &'s str, operand: RuleFn<'s>, ops: &'static [Token]) -> PResult<'s> {
    let (input, first) = operand(cx, input)?;
    let (input, tail) = many0(pair(operator(cx, ops), |i| operand(cx, i)))(input)?;
    Ok((input, join(std::iter::once(first).chain(tail.into_iter().flat_map(|(op, rhs)| [op, rhs])))))
}

/// `operand (op operand)?`
fn at_most_once<'s>(cx: &ParseContext<'s>, input: &'s str, operand: RuleFn<'s>, ops: &'static [Token]) -> PResult<'s> {
    let (input, first) = operand(cx, input)?;
    let (input, tail) = opt(pair(operator(cx, ops), |i| operand(cx, i)))(input)?;
    Ok((input, join(std::iter::once(first).chain(tail.into_iter().flat_map(|(op, rhs)| [op, rhs])))))
}

// ===== Leaves =====

/// Number, string or boolean literal
pub fn literal<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Literal, input, |i| {
        alt((
            lexeme(cx, Token::Number, LexemeClass::Number),
            lexeme(cx, Token::StringLit, LexemeClass::String),
            lexeme(cx, Token::True, LexemeClass::Boolean),
            lexeme(cx, Token::False, LexemeClass::Boolean),
        ))(i)
    })
}

pub fn ident<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Ident, input, lexeme(cx, Token::Ident, LexemeClass::Word))
}

/// Type name with an optional `[]` suffix
pub fn type_ref<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Type, input, |i| {
        let (i, mut parts) = lexeme(cx, Token::Ident, LexemeClass::Word)(i)?;
        let (i, suffix) = opt(pair(punct(cx, Token::LBracket), punct(cx, Token::RBracket)))(i)?;
        if suffix.is_some() {
            parts.push(Part::Lexeme(Lexeme::new("[]", LexemeClass::Symbol)));
        }
        Ok((i, parts))
    })
}

fn access<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Access, input, |i| {
        alt((
            lexeme(cx, Token::Public, LexemeClass::Word),
            lexeme(cx, Token::Protected, LexemeClass::Word),
            lexeme(cx, Token::Private, LexemeClass::Word),
        ))(i)
    })
}

fn async_modifier<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Async, input, lexeme(cx, Token::Async, LexemeClass::Word))
}

fn static_modifier<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Static, input, lexeme(cx, Token::Static, LexemeClass::Word))
}

// ===== Expressions =====

/// `ident ( expr, ... )`
pub fn call<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Call, input, |i| {
        let (i, callee) = ident(cx, i)?;
        let (i, args) = delimited(
            punct(cx, Token::LParen),
            separated_list0(punct(cx, Token::Comma), |i| expr(cx, i)),
            punct(cx, Token::RParen),
        )(i)?;
        Ok((i, join(std::iter::once(callee).chain(args))))
    })
}

fn new<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::New, input, |i| preceded(punct(cx, Token::New), |i| call(cx, i))(i))
}

/// Calls are tried before bare identifiers, which share their prefix.
fn segment<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    alt((|i| new(cx, i), |i| call(cx, i), |i| ident(cx, i)))(input)
}

fn dot<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Dot, input, |i| {
        let (i, first) = segment(cx, i)?;
        let (i, rest) = many0(preceded(punct(cx, Token::Dot), |i| segment(cx, i)))(i)?;
        Ok((i, join(std::iter::once(first).chain(rest))))
    })
}

fn group<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Group, input, |i| {
        alt((
            |i| literal(cx, i),
            |i| dot(cx, i),
            delimited(punct(cx, Token::LParen), |i| expr(cx, i), punct(cx, Token::RParen)),
        ))(i)
    })
}

fn mult<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Mult, input, |i| repeated(cx, i, group, MULT_OPS))
}

fn add<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Add, input, |i| repeated(cx, i, mult, ADD_OPS))
}

fn compare1<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Compare1, input, |i| at_most_once(cx, i, add, COMPARE_OPS))
}

fn compare2<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Compare2, input, |i| at_most_once(cx, i, compare1, EQUALITY_OPS))
}

fn logical_and<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::LogicalAnd, input, |i| repeated(cx, i, compare2, AND_OPS))
}

fn logical_or<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::LogicalOr, input, |i| repeated(cx, i, logical_and, OR_OPS))
}

fn op_assign<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::OpAssign, input, |i| repeated(cx, i, logical_or, ASSIGN_OPS))
}

pub fn expr<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Expr, input, |i| op_assign(cx, i))
}

// ===== Statements =====

/// `ident = expr`
fn assign<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Assign, input, |i| {
        let (i, target) = ident(cx, i)?;
        let (i, value) = preceded(punct(cx, Token::Eq), |i| expr(cx, i))(i)?;
        Ok((i, join([target, value])))
    })
}

fn var_inner<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::VarInner, input, |i| alt((|i| assign(cx, i), |i| ident(cx, i)))(i))
}

/// `type binding, ...` without the terminating `;`
fn vars<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Vars, input, |i| {
        let (i, ty) = type_ref(cx, i)?;
        let (i, bindings) = separated_list1(punct(cx, Token::Comma), |i| var_inner(cx, i))(i)?;
        Ok((i, join(std::iter::once(ty).chain(bindings))))
    })
}

fn param<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Param, input, |i| {
        let (i, ty) = type_ref(cx, i)?;
        let (i, name) = ident(cx, i)?;
        Ok((i, join([ty, name])))
    })
}

fn params<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Params, input, |i| {
        let (i, params) = separated_list0(punct(cx, Token::Comma), |i| param(cx, i))(i)?;
        Ok((i, join(params)))
    })
}

/// `[async] [public|protected|private] [static] type name ( params ) { ... }`
fn func<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Func, input, |i| {
        let (i, is_async) = alt((|i| async_modifier(cx, i), empty))(i)?;
        let (i, access) = alt((|i| access(cx, i), empty))(i)?;
        let (i, is_static) = alt((|i| static_modifier(cx, i), empty))(i)?;
        let (i, return_type) = type_ref(cx, i)?;
        let (i, name) = ident(cx, i)?;
        let (i, params) = delimited(
            punct(cx, Token::LParen),
            |i| params(cx, i),
            punct(cx, Token::RParen),
        )(i)?;
        let (i, body) = func_body(cx, i)?;
        Ok((i, join([is_async, access, is_static, return_type, name, params, body])))
    })
}

fn return_stmt<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Return, input, |i| preceded(punct(cx, Token::Return), |i| expr(cx, i))(i))
}

/// `if ( expr ) { ... } [else if ... | else { ... }]`
fn if_stmt<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::If, input, |i| {
        let (i, cond) = preceded(
            punct(cx, Token::If),
            delimited(punct(cx, Token::LParen), |i| expr(cx, i), punct(cx, Token::RParen)),
        )(i)?;
        let (i, then_branch) = func_body(cx, i)?;
        let (i, else_branch) = opt(|i| else_branch(cx, i))(i)?;
        Ok((i, join([cond, then_branch, else_branch.unwrap_or_default()])))
    })
}

/// An `else if` nests a further `if` as the else branch.
fn else_branch<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Else, input, |i| {
        preceded(
            punct(cx, Token::Else),
            alt((|i| if_stmt(cx, i), |i| func_body(cx, i))),
        )(i)
    })
}

fn simple_stmt<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::SimpleStmt, input, |i| {
        alt((|i| new(cx, i), |i| assign(cx, i), |i| call(cx, i), |i| expr(cx, i)))(i)
    })
}

fn for_stmt_list<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::ForStmtList, input, |i| {
        let (i, statements) = separated_list1(punct(cx, Token::Comma), |i| simple_stmt(cx, i))(i)?;
        Ok((i, join(statements)))
    })
}

/// Init or step clause of a `for`; may be blank
fn for_clause<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    alt((|i| vars(cx, i), |i| for_stmt_list(cx, i), empty))(input)
}

fn for_cond<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::ForCond, input, |i| alt((|i| expr(cx, i), empty))(i))
}

/// `for ( init ; cond ; step ) { ... }`
fn for_stmt<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::For, input, |i| {
        let (i, _) = pair(punct(cx, Token::For), punct(cx, Token::LParen))(i)?;
        let (i, init) = terminated(|i| for_clause(cx, i), punct(cx, Token::Semicolon))(i)?;
        let (i, cond) = terminated(|i| for_cond(cx, i), punct(cx, Token::Semicolon))(i)?;
        let (i, step) = terminated(|i| for_clause(cx, i), punct(cx, Token::RParen))(i)?;
        let (i, body) = func_body(cx, i)?;
        Ok((i, join([init, cond, step, body])))
    })
}

/// `class name { ... }` inside a function body
fn func_class_init<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::FuncClassInit, input, |i| {
        let (i, name) = preceded(punct(cx, Token::Class), |i| ident(cx, i))(i)?;
        let (i, body) = body(cx, i)?;
        Ok((i, join([name, body])))
    })
}

/// `[access] class name { ... }`
fn class_init<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::ClassInit, input, |i| {
        let (i, modifier) = alt((|i| access(cx, i), empty))(i)?;
        let (i, name) = preceded(punct(cx, Token::Class), |i| ident(cx, i))(i)?;
        let (i, body) = body(cx, i)?;
        Ok((i, join([modifier, name, body])))
    })
}

/// Statement allowed at class level. A bare block here holds
/// function-level statements.
fn stmt<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Stmt, input, |i| {
        alt((
            |i| class_init(cx, i),
            |i| func(cx, i),
            terminated(|i| vars(cx, i), punct(cx, Token::Semicolon)),
            |i| func_body(cx, i),
        ))(i)
    })
}

/// Statement allowed inside a function body
fn func_stmt<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::FuncStmt, input, |i| {
        alt((
            |i| func_class_init(cx, i),
            terminated(|i| vars(cx, i), punct(cx, Token::Semicolon)),
            terminated(|i| call(cx, i), punct(cx, Token::Semicolon)),
            terminated(|i| new(cx, i), punct(cx, Token::Semicolon)),
            terminated(|i| expr(cx, i), punct(cx, Token::Semicolon)),
            |i| func_body(cx, i),
            terminated(|i| assign(cx, i), punct(cx, Token::Semicolon)),
            terminated(|i| return_stmt(cx, i), punct(cx, Token::Semicolon)),
            |i| if_stmt(cx, i),
            |i| for_stmt(cx, i),
        ))(i)
    })
}

/// Class-level block
fn body<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Body, input, |i| {
        let (i, statements) = delimited(
            punct(cx, Token::LBrace),
            many0(|i| stmt(cx, i)),
            punct(cx, Token::RBrace),
        )(i)?;
        Ok((i, join(statements)))
    })
}

/// Function-level block
fn func_body<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::FuncBody, input, |i| {
        let (i, statements) = delimited(
            punct(cx, Token::LBrace),
            many0(|i| func_stmt(cx, i)),
            punct(cx, Token::RBrace),
        )(i)?;
        Ok((i, join(statements)))
    })
}

/// Whole input: statements of either level, then end of input.
pub fn program<'s>(cx: &ParseContext<'s>, input: &'s str) -> PResult<'s> {
    rule(cx, Rule::Program, input, |i| {
        let (i, statements) = many0(alt((|i| stmt(cx, i), |i| func_stmt(cx, i))))(i)?;
        let (i, _) = punct(cx, Token::Eof)(i)?;
        Ok((i, join(statements)))
    })
}
