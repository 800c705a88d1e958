//! Rule-to-node binder
//!
//! Every named grammar rule is bound to one of two actions: build a node
//! from the rule's matched parts, or pass the parts through unchanged. The
//! node type is derived from the rule's name (or its alias) by a fixed
//! naming transform, `snake_case` → `PascalCase` + `Node`, and looked up in
//! a static registry of node types. Rules whose derived type is abstract
//! pass through; rules whose derived type does not exist must be listed as
//! pass-through explicitly.
//!
//! The table is built once, on first use, and any rule without a valid
//! binding path fails that build. Parsing never consults rule names.

use super::ast::{
    AccessRef, Assign, AstNode, BinOp, BinOpKind, Binding, Call, Chain, ClassDecl, For, FuncDecl,
    Ident, If, Literal, Modifiers, New, Param, Return, Segment, StmtList, TypeRef, VarDecl,
};
use super::literal::{LiteralClass, LiteralError};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Lexical class of a kept terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeClass {
    Word,
    Number,
    String,
    Boolean,
    Operator,
    Symbol,
}

/// Matched source text kept for a builder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lexeme<'s> {
    pub text: &'s str,
    pub class: LexemeClass,
}

impl<'s> Lexeme<'s> {
    pub fn new(text: &'s str, class: LexemeClass) -> Self {
        Self { text, class }
    }
}

/// One matched sub-result of a rule
#[derive(Debug, Clone, PartialEq)]
pub enum Part<'s> {
    Node(AstNode),
    Lexeme(Lexeme<'s>),
    /// An optional slot that matched nothing
    Empty,
}

impl Part<'_> {
    fn describe(&self) -> String {
        match self {
            Part::Node(node) => node.as_node_ref().kind_name().to_string(),
            Part::Lexeme(lexeme) => format!("`{}`", lexeme.text),
            Part::Empty => "empty slot".to_string(),
        }
    }
}

pub type Parts<'s> = Vec<Part<'s>>;

/// Named grammar rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Literal,
    Ident,
    Type,
    Access,
    Async,
    Static,
    Call,
    New,
    Dot,
    Group,
    Mult,
    Add,
    Compare1,
    Compare2,
    LogicalAnd,
    LogicalOr,
    OpAssign,
    Expr,
    Assign,
    VarInner,
    Vars,
    Param,
    Params,
    Func,
    Return,
    If,
    Else,
    SimpleStmt,
    ForStmtList,
    ForCond,
    For,
    Stmt,
    FuncStmt,
    Body,
    FuncBody,
    ClassInit,
    FuncClassInit,
    Program,
}

impl Rule {
    pub const ALL: [Rule; 38] = [
        Rule::Literal,
        Rule::Ident,
        Rule::Type,
        Rule::Access,
        Rule::Async,
        Rule::Static,
        Rule::Call,
        Rule::New,
        Rule::Dot,
        Rule::Group,
        Rule::Mult,
        Rule::Add,
        Rule::Compare1,
        Rule::Compare2,
        Rule::LogicalAnd,
        Rule::LogicalOr,
        Rule::OpAssign,
        Rule::Expr,
        Rule::Assign,
        Rule::VarInner,
        Rule::Vars,
        Rule::Param,
        Rule::Params,
        Rule::Func,
        Rule::Return,
        Rule::If,
        Rule::Else,
        Rule::SimpleStmt,
        Rule::ForStmtList,
        Rule::ForCond,
        Rule::For,
        Rule::Stmt,
        Rule::FuncStmt,
        Rule::Body,
        Rule::FuncBody,
        Rule::ClassInit,
        Rule::FuncClassInit,
        Rule::Program,
    ];

    /// Rule name as written in the grammar
    pub fn name(self) -> &'static str {
        match self {
            Rule::Literal => "literal",
            Rule::Ident => "ident",
            Rule::Type => "type_",
            Rule::Access => "access",
            Rule::Async => "async_",
            Rule::Static => "static_",
            Rule::Call => "call",
            Rule::New => "new",
            Rule::Dot => "dot",
            Rule::Group => "group",
            Rule::Mult => "mult",
            Rule::Add => "add",
            Rule::Compare1 => "compare1",
            Rule::Compare2 => "compare2",
            Rule::LogicalAnd => "logical_and",
            Rule::LogicalOr => "logical_or",
            Rule::OpAssign => "op_assign",
            Rule::Expr => "expr",
            Rule::Assign => "assign",
            Rule::VarInner => "var_inner",
            Rule::Vars => "vars_",
            Rule::Param => "param",
            Rule::Params => "params",
            Rule::Func => "func",
            Rule::Return => "return_",
            Rule::If => "if_",
            Rule::Else => "else_",
            Rule::SimpleStmt => "simple_stmt",
            Rule::ForStmtList => "for_stmt_list",
            Rule::ForCond => "for_cond",
            Rule::For => "for_",
            Rule::Stmt => "stmt",
            Rule::FuncStmt => "func_stmt",
            Rule::Body => "body",
            Rule::FuncBody => "func_body",
            Rule::ClassInit => "class_init",
            Rule::FuncClassInit => "func_class_init",
            Rule::Program => "program",
        }
    }

    /// Display name overriding the rule name for binding purposes
    pub fn alias(self) -> Option<&'static str> {
        match self {
            Rule::Async | Rule::Static => Some("access"),
            Rule::Dot => Some("chain"),
            Rule::Mult
            | Rule::Add
            | Rule::Compare1
            | Rule::Compare2
            | Rule::LogicalAnd
            | Rule::LogicalOr
            | Rule::OpAssign => Some("bin_op"),
            Rule::ForStmtList | Rule::Body | Rule::FuncBody | Rule::Program => Some("stmt_list"),
            Rule::FuncClassInit => Some("class_init"),
            _ => None,
        }
    }

    pub fn binding_name(self) -> &'static str {
        self.alias().unwrap_or(self.name())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rules that deliberately construct nothing
const PASS_THROUGH: [Rule; 7] = [
    Rule::Group,
    Rule::VarInner,
    Rule::Params,
    Rule::Else,
    Rule::SimpleStmt,
    Rule::ForCond,
    Rule::FuncStmt,
];

/// `snake_case` rule name → node type name: `bin_op` → `BinOpNode`,
/// `vars_` → `VarsNode`.
pub fn node_type_name(rule_name: &str) -> String {
    let mut name: String = rule_name
        .split('_')
        .map(|piece| {
            let mut chars = piece.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect();
    name.push_str("Node");
    name
}

/// Builds one node from a rule's parts
pub type Builder = for<'s> fn(&mut PartReader<'s>) -> Result<AstNode, BindError>;

#[derive(Clone, Copy)]
pub enum NodeKind {
    /// Not a node of its own; rules resolving here pass through
    Abstract,
    /// Built from grammar matches
    Concrete(Builder),
    /// Only constructed directly, never by a rule
    Programmatic,
}

/// Registry entry for one node type
#[derive(Clone, Copy)]
pub struct NodeType {
    pub name: &'static str,
    pub kind: NodeKind,
}

impl NodeType {
    const fn new(name: &'static str, kind: NodeKind) -> Self {
        Self { name, kind }
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub static NODE_TYPES: [NodeType; 21] = [
    NodeType::new("AstNode", NodeKind::Abstract),
    NodeType::new("ExprNode", NodeKind::Abstract),
    NodeType::new("StmtNode", NodeKind::Abstract),
    NodeType::new("LiteralNode", NodeKind::Concrete(build_literal)),
    NodeType::new("IdentNode", NodeKind::Concrete(build_ident)),
    NodeType::new("TypeNode", NodeKind::Concrete(build_type)),
    NodeType::new("AccessNode", NodeKind::Concrete(build_access)),
    NodeType::new("CallNode", NodeKind::Concrete(build_call)),
    NodeType::new("ChainNode", NodeKind::Concrete(build_chain)),
    NodeType::new("ConvertNode", NodeKind::Programmatic),
    NodeType::new("AssignNode", NodeKind::Concrete(build_assign)),
    NodeType::new("VarsNode", NodeKind::Concrete(build_vars)),
    NodeType::new("NewNode", NodeKind::Concrete(build_new)),
    NodeType::new("ReturnNode", NodeKind::Concrete(build_return)),
    NodeType::new("IfNode", NodeKind::Concrete(build_if)),
    NodeType::new("ForNode", NodeKind::Concrete(build_for)),
    NodeType::new("ParamNode", NodeKind::Concrete(build_param)),
    NodeType::new("FuncNode", NodeKind::Concrete(build_func)),
    NodeType::new("ClassInitNode", NodeKind::Concrete(build_class_init)),
    NodeType::new("StmtListNode", NodeKind::Concrete(build_stmt_list)),
    NodeType::new("BinOpNode", NodeKind::Concrete(build_bin_op)),
];

/// Grammar/binder wiring mistakes, detected when the table is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinderError {
    #[error("rule `{rule}` resolves to unknown node type `{type_name}` and is not marked pass-through")]
    Unbound { rule: &'static str, type_name: String },

    #[error("rule `{rule}` is marked pass-through but resolves to node type `{type_name}`")]
    Conflict { rule: &'static str, type_name: String },

    #[error("rule `{rule}` resolves to `{type_name}`, which cannot be built from a match")]
    NotConstructible { rule: &'static str, type_name: String },

    #[error("rule name `{rule}` is defined twice")]
    DuplicateRule { rule: &'static str },
}

/// A rule's parts did not have the shape its builder expects
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error(transparent)]
    Literal(#[from] LiteralError),

    #[error("rule `{rule}` expected {expected}, found {found}")]
    Shape {
        rule: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("rule `{rule}` left {count} unused parts")]
    Trailing { rule: &'static str, count: usize },

    #[error("rule `{rule}` has no binding")]
    Unbound { rule: &'static str },
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Build(&'static NodeType),
    PassThrough,
}

/// Outcome of applying a rule's binding
#[derive(Debug)]
pub enum Bound<'s> {
    Built(AstNode),
    Passed(Parts<'s>),
}

/// Rule → action table
#[derive(Debug)]
pub struct Binder {
    actions: FxHashMap<Rule, Action>,
}

static BINDER: OnceLock<Result<Binder, BinderError>> = OnceLock::new();

/// The process-wide binding table, built on first use.
pub fn binder() -> Result<&'static Binder, &'static BinderError> {
    BINDER.get_or_init(Binder::build).as_ref()
}

impl Binder {
    /// Resolve every rule in [`Rule::ALL`] to an action.
    pub fn build() -> Result<Self, BinderError> {
        let registry: FxHashMap<&'static str, &'static NodeType> = NODE_TYPES
            .iter()
            .map(|node_type| (node_type.name, node_type))
            .collect();

        let mut seen = FxHashSet::default();
        let mut actions = FxHashMap::default();
        for rule in Rule::ALL {
            if !seen.insert(rule.name()) {
                return Err(BinderError::DuplicateRule { rule: rule.name() });
            }

            let type_name = node_type_name(rule.binding_name());
            let passes = PASS_THROUGH.contains(&rule);
            let action = match registry.get(type_name.as_str()).map(|t| (*t, t.kind)) {
                Some((_, NodeKind::Abstract)) => Action::PassThrough,
                Some((node_type, NodeKind::Concrete(_))) if !passes => Action::Build(node_type),
                Some((_, NodeKind::Concrete(_))) => {
                    return Err(BinderError::Conflict {
                        rule: rule.name(),
                        type_name,
                    })
                }
                Some((_, NodeKind::Programmatic)) => {
                    return Err(BinderError::NotConstructible {
                        rule: rule.name(),
                        type_name,
                    })
                }
                None if passes => Action::PassThrough,
                None => {
                    return Err(BinderError::Unbound {
                        rule: rule.name(),
                        type_name,
                    })
                }
            };
            actions.insert(rule, action);
        }

        let built = actions
            .values()
            .filter(|action| matches!(action, Action::Build(_)))
            .count();
        debug!(
            "Bound {} rules to node types, {} pass through",
            built,
            actions.len() - built
        );
        Ok(Self { actions })
    }

    /// Node type `rule` builds, or `None` if it passes through
    pub fn node_type(&self, rule: Rule) -> Option<&'static str> {
        match self.actions.get(&rule) {
            Some(Action::Build(node_type)) => Some(node_type.name),
            _ => None,
        }
    }

    /// Run `rule`'s action on its matched parts.
    pub fn apply<'s>(&self, rule: Rule, parts: Parts<'s>) -> Result<Bound<'s>, BindError> {
        match self.actions.get(&rule) {
            Some(Action::Build(node_type)) => {
                let NodeKind::Concrete(build) = node_type.kind else {
                    return Err(BindError::Unbound { rule: rule.name() });
                };
                let mut reader = PartReader::new(rule, parts);
                let node = build(&mut reader)?;
                reader.finish()?;
                Ok(Bound::Built(node))
            }
            Some(Action::PassThrough) => Ok(Bound::Passed(parts)),
            None => Err(BindError::Unbound { rule: rule.name() }),
        }
    }
}

/// Sequential access to a rule's parts, with shape errors naming the rule
pub struct PartReader<'s> {
    rule: Rule,
    parts: std::iter::Peekable<std::vec::IntoIter<Part<'s>>>,
}

impl<'s> PartReader<'s> {
    pub fn new(rule: Rule, parts: Parts<'s>) -> Self {
        Self {
            rule,
            parts: parts.into_iter().peekable(),
        }
    }

    fn shape(&self, expected: &'static str, found: Option<&Part<'_>>) -> BindError {
        BindError::Shape {
            rule: self.rule.name(),
            expected,
            found: found.map_or_else(|| "end of parts".to_string(), Part::describe),
        }
    }

    pub fn is_done(&mut self) -> bool {
        self.parts.peek().is_none()
    }

    pub fn peek(&mut self) -> Option<&Part<'s>> {
        self.parts.peek()
    }

    pub fn lexeme(&mut self) -> Result<Lexeme<'s>, BindError> {
        match self.parts.next() {
            Some(Part::Lexeme(lexeme)) => Ok(lexeme),
            other => Err(self.shape("a lexeme", other.as_ref())),
        }
    }

    pub fn node(&mut self) -> Result<AstNode, BindError> {
        match self.parts.next() {
            Some(Part::Node(node)) => Ok(node),
            other => Err(self.shape("a node", other.as_ref())),
        }
    }

    /// A node, or `None` for an empty slot
    pub fn optional(&mut self) -> Result<Option<AstNode>, BindError> {
        match self.parts.next() {
            Some(Part::Node(node)) => Ok(Some(node)),
            Some(Part::Empty) => Ok(None),
            other => Err(self.shape("a node or empty slot", other.as_ref())),
        }
    }

    /// All remaining nodes; empty slots are skipped
    pub fn nodes(&mut self) -> Result<Vec<AstNode>, BindError> {
        let mut nodes = Vec::new();
        while let Some(part) = self.parts.next() {
            match part {
                Part::Node(node) => nodes.push(node),
                Part::Empty => {}
                other => return Err(self.shape("a node", Some(&other))),
            }
        }
        Ok(nodes)
    }

    pub fn ident(&mut self) -> Result<Ident, BindError> {
        match self.parts.next() {
            Some(Part::Node(AstNode::Ident(ident))) => Ok(ident),
            other => Err(self.shape("an identifier", other.as_ref())),
        }
    }

    pub fn type_ref(&mut self) -> Result<TypeRef, BindError> {
        match self.parts.next() {
            Some(Part::Node(AstNode::TypeRef(ty))) => Ok(ty),
            other => Err(self.shape("a type", other.as_ref())),
        }
    }

    /// A modifier, or `None` for an empty slot
    pub fn access(&mut self) -> Result<Option<AccessRef>, BindError> {
        match self.parts.next() {
            Some(Part::Node(AstNode::AccessRef(access))) => Ok(Some(access)),
            Some(Part::Empty) => Ok(None),
            other => Err(self.shape("a modifier or empty slot", other.as_ref())),
        }
    }

    pub fn call(&mut self) -> Result<Call, BindError> {
        match self.parts.next() {
            Some(Part::Node(AstNode::Call(call))) => Ok(call),
            other => Err(self.shape("a call", other.as_ref())),
        }
    }

    pub fn stmt_list(&mut self) -> Result<StmtList, BindError> {
        match self.parts.next() {
            Some(Part::Node(AstNode::StmtList(list))) => Ok(list),
            other => Err(self.shape("a statement list", other.as_ref())),
        }
    }

    fn finish(mut self) -> Result<(), BindError> {
        let count = self.parts.by_ref().count();
        if count == 0 {
            Ok(())
        } else {
            Err(BindError::Trailing {
                rule: self.rule.name(),
                count,
            })
        }
    }
}

fn build_literal(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let lexeme = parts.lexeme()?;
    let class = match lexeme.class {
        LexemeClass::Number => LiteralClass::Number,
        LexemeClass::String => LiteralClass::String,
        LexemeClass::Boolean => LiteralClass::Boolean,
        _ => return Err(parts.shape("a literal lexeme", Some(&Part::Lexeme(lexeme)))),
    };
    Ok(AstNode::Literal(Literal::new(class, lexeme.text)?))
}

fn build_ident(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    Ok(AstNode::Ident(Ident::new(parts.lexeme()?.text)))
}

/// Name plus an optional `[]` suffix
fn build_type(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let mut name = parts.lexeme()?.text.to_string();
    if !parts.is_done() {
        name.push_str(parts.lexeme()?.text);
    }
    Ok(AstNode::TypeRef(TypeRef::new(name)))
}

fn build_access(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    Ok(AstNode::AccessRef(AccessRef::new(parts.lexeme()?.text)))
}

fn build_call(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let callee = parts.ident()?;
    let args = parts.nodes()?;
    Ok(AstNode::Call(Call::new(callee, args)))
}

/// A single segment is not a chain and passes through as itself.
fn build_chain(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let mut nodes = parts.nodes()?;
    if nodes.len() == 1 {
        if let Some(node) = nodes.pop() {
            return Ok(node);
        }
    }
    let segments = nodes
        .into_iter()
        .map(|node| match node {
            AstNode::New(new) => Ok(Segment::New(new)),
            AstNode::Call(call) => Ok(Segment::Call(call)),
            AstNode::Ident(ident) => Ok(Segment::Ident(ident)),
            other => Err(parts.shape("a chain segment", Some(&Part::Node(other)))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    if segments.is_empty() {
        return Err(parts.shape("a chain segment", None));
    }
    Ok(AstNode::Chain(Chain::new(segments)))
}

fn build_assign(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let target = parts.ident()?;
    let value = parts.node()?;
    Ok(AstNode::Assign(Assign::new(target, value)))
}

fn build_vars(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let ty = parts.type_ref()?;
    let bindings = parts
        .nodes()?
        .into_iter()
        .map(|node| match node {
            AstNode::Ident(ident) => Ok(Binding::Name(ident)),
            AstNode::Assign(assign) => Ok(Binding::Init(assign)),
            other => Err(parts.shape("a variable binding", Some(&Part::Node(other)))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AstNode::VarDecl(VarDecl::new(ty, bindings)))
}

fn build_new(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    Ok(AstNode::New(New::new(parts.call()?)))
}

fn build_return(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    Ok(AstNode::Return(Return::new(parts.node()?)))
}

fn build_if(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let cond = parts.node()?;
    let then_branch = parts.node()?;
    let else_branch = if parts.is_done() {
        None
    } else {
        Some(parts.node()?)
    };
    Ok(AstNode::If(If::new(cond, then_branch, else_branch)))
}

fn build_for(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let init = parts.optional()?;
    let cond = parts.optional()?;
    let step = parts.optional()?;
    let body = parts.optional()?;
    Ok(AstNode::For(For::new(init, cond, step, body)))
}

fn build_param(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let ty = parts.type_ref()?;
    let name = parts.ident()?;
    Ok(AstNode::Param(Param::new(ty, name)))
}

/// Parts arrive flattened as `async access static type name param* body`:
/// a fixed prefix, a variable run of parameters, and the body last.
fn build_func(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let modifiers = Modifiers {
        is_async: parts.access()?,
        access: parts.access()?,
        is_static: parts.access()?,
    };
    let return_type = parts.type_ref()?;
    let name = parts.ident()?;

    let mut rest = parts.nodes()?;
    let body = rest
        .pop()
        .ok_or_else(|| parts.shape("a function body", None))?;
    let params = rest
        .into_iter()
        .map(|node| match node {
            AstNode::Param(param) => Ok(param),
            other => Err(parts.shape("a parameter", Some(&Part::Node(other)))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AstNode::FuncDecl(FuncDecl::new(
        modifiers,
        return_type,
        name,
        params,
        body,
    )))
}

/// Class declarations nested in function bodies have no modifier slot.
fn build_class_init(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let access = match parts.peek() {
        Some(Part::Node(AstNode::Ident(_))) => None,
        _ => parts.access()?,
    };
    let name = parts.ident()?;
    let body = parts.stmt_list()?;
    Ok(AstNode::ClassDecl(ClassDecl::new(access, name, Some(body))))
}

fn build_stmt_list(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    Ok(AstNode::StmtList(StmtList::new(parts.nodes()?)))
}

/// Fold `a op b op c ...` to the left. A lone operand passes through.
fn build_bin_op(parts: &mut PartReader<'_>) -> Result<AstNode, BindError> {
    let mut left = parts.node()?;
    while !parts.is_done() {
        let lexeme = parts.lexeme()?;
        let op = BinOpKind::from_symbol(lexeme.text)
            .ok_or_else(|| parts.shape("a binary operator", Some(&Part::Lexeme(lexeme))))?;
        let right = parts.node()?;
        left = AstNode::BinOp(BinOp::new(op, left, right));
    }
    Ok(left)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Part<'_> {
        Part::Lexeme(Lexeme::new(text, LexemeClass::Word))
    }

    fn number(text: &str) -> Part<'_> {
        Part::Lexeme(Lexeme::new(text, LexemeClass::Number))
    }

    fn op(text: &str) -> Part<'_> {
        Part::Lexeme(Lexeme::new(text, LexemeClass::Operator))
    }

    fn built(rule: Rule, parts: Parts<'_>) -> AstNode {
        match binder().unwrap().apply(rule, parts).unwrap() {
            Bound::Built(node) => node,
            Bound::Passed(_) => panic!("Expected `{}` to build a node", rule),
        }
    }

    fn literal(text: &str) -> Part<'_> {
        Part::Node(built(Rule::Literal, vec![number(text)]))
    }

    #[test]
    fn test_naming_transform() {
        assert_eq!(node_type_name("bin_op"), "BinOpNode");
        assert_eq!(node_type_name("vars_"), "VarsNode");
        assert_eq!(node_type_name("class_init"), "ClassInitNode");
        assert_eq!(node_type_name("stmt_list"), "StmtListNode");
        assert_eq!(node_type_name("compare1"), "Compare1Node");
    }

    #[test]
    fn test_table_builds() {
        let binder = Binder::build().unwrap();
        assert_eq!(binder.node_type(Rule::Mult), Some("BinOpNode"));
        assert_eq!(binder.node_type(Rule::Dot), Some("ChainNode"));
        assert_eq!(binder.node_type(Rule::FuncClassInit), Some("ClassInitNode"));
        assert_eq!(binder.node_type(Rule::Static), Some("AccessNode"));
        assert_eq!(binder.node_type(Rule::Program), Some("StmtListNode"));
        // Abstract targets and explicit pass-through rules
        assert_eq!(binder.node_type(Rule::Expr), None);
        assert_eq!(binder.node_type(Rule::Stmt), None);
        assert_eq!(binder.node_type(Rule::Group), None);
    }

    #[test]
    fn test_every_rule_has_an_action() {
        let binder = Binder::build().unwrap();
        for rule in Rule::ALL {
            assert!(binder.actions.contains_key(&rule), "missing action for {}", rule);
        }
    }

    #[test]
    fn test_pass_through_keeps_parts() {
        let parts = vec![word("x"), Part::Empty];
        match binder().unwrap().apply(Rule::Group, parts.clone()).unwrap() {
            Bound::Passed(passed) => assert_eq!(passed, parts),
            Bound::Built(node) => panic!("Expected pass-through, got {:?}", node),
        }
    }

    #[test]
    fn test_bin_op_folds_left() {
        let node = built(
            Rule::Add,
            vec![literal("1"), op("+"), literal("2"), op("-"), literal("3")],
        );
        let AstNode::BinOp(outer) = node else {
            panic!("Expected binary operation");
        };
        assert_eq!(outer.op, BinOpKind::Sub);
        assert_eq!(outer.right.label(), "3");
        let AstNode::BinOp(inner) = *outer.left else {
            panic!("Expected nested binary operation");
        };
        assert_eq!(inner.op, BinOpKind::Add);
        assert_eq!(inner.left.label(), "1");
        assert_eq!(inner.right.label(), "2");
    }

    #[test]
    fn test_single_operand_passes_through() {
        let node = built(Rule::Mult, vec![literal("7")]);
        assert!(matches!(node, AstNode::Literal(_)));
    }

    #[test]
    fn test_type_suffix() {
        let node = built(
            Rule::Type,
            vec![word("int"), Part::Lexeme(Lexeme::new("[]", LexemeClass::Symbol))],
        );
        assert_eq!(node.label(), "int[]");
    }

    #[test]
    fn test_func_positional_remap() {
        let ident = |name: &str| Part::Node(AstNode::Ident(Ident::new(name)));
        let ty = |name: &str| Part::Node(AstNode::TypeRef(TypeRef::new(name)));
        let param = |t: &str, n: &str| Part::Node(AstNode::Param(Param::new(TypeRef::new(t), Ident::new(n))));
        let node = built(
            Rule::Func,
            vec![
                Part::Empty,
                Part::Node(AstNode::AccessRef(AccessRef::new("public"))),
                Part::Empty,
                ty("int"),
                ident("add"),
                param("int", "a"),
                param("int", "b"),
                Part::Node(AstNode::StmtList(StmtList::new(vec![]))),
            ],
        );
        let AstNode::FuncDecl(func) = node else {
            panic!("Expected function declaration");
        };
        assert_eq!(func.access().name, "public");
        assert!(func.is_async().is_empty());
        assert!(func.is_static().is_empty());
        assert_eq!(func.name.name, "add");
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[1].name.name, "b");
    }

    #[test]
    fn test_shape_errors_name_the_rule() {
        let err = binder()
            .unwrap()
            .apply(Rule::Assign, vec![number("1")])
            .unwrap_err();
        assert_eq!(
            err,
            BindError::Shape {
                rule: "assign",
                expected: "an identifier",
                found: "`1`".to_string(),
            }
        );
    }

    #[test]
    fn test_trailing_parts_are_rejected() {
        let err = binder()
            .unwrap()
            .apply(Rule::Ident, vec![word("a"), word("b")])
            .unwrap_err();
        assert!(matches!(err, BindError::Trailing { rule: "ident", count: 1 }));
    }

    #[test]
    fn test_literal_errors_surface() {
        let err = binder()
            .unwrap()
            .apply(Rule::Literal, vec![number("99999999999999999999")])
            .unwrap_err();
        assert!(matches!(err, BindError::Literal(LiteralError::InvalidInteger { .. })));
    }
}
