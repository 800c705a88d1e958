//! AST (Abstract Syntax Tree) definitions
//!
//! Nodes are plain typed structs gathered into the closed [`AstNode`] sum
//! type. Fields that the grammar always fills with one specific kind of node
//! (a call's callee, a declaration's type) are typed with that struct;
//! expression and statement slots hold an [`AstNode`].
//!
//! Every node owns its children. The only shared values are the canonical
//! empty placeholders ([`EMPTY_STMT_LIST`], [`EMPTY_STATEMENTS`],
//! [`EMPTY_ACCESS`]) which optional slots resolve to when they were left
//! blank in the source.
//!
//! [`NodeRef`] is a borrowed view over a node, extended with the display-only
//! [`Group`] used by the tree renderer to bundle related children.

use super::literal::{self, LiteralClass, LiteralError, LiteralValue};
pub use super::location::SourceLocation;
use crate::semantic::{self, AccessType, IdentDesc, TypeDesc};
use std::borrow::Cow;

/// Position and display annotations carried by every node.
///
/// `location` is written once, right after the node is built. The resolved
/// type/ident are never computed by the parser; a later semantic pass may
/// set them for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMeta {
    pub location: Option<SourceLocation>,
    pub resolved_type: Option<TypeDesc>,
    pub resolved_ident: Option<IdentDesc>,
}

impl NodeMeta {
    pub const EMPTY: NodeMeta = NodeMeta {
        location: None,
        resolved_type: None,
        resolved_ident: None,
    };
}

/// Binary operators, including the member-access dot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    Dot,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Neq,
    And,
    Or,
    // Compound assignment
    MulAssign,
    DivAssign,
    AddAssign,
    SubAssign,
}

impl BinOpKind {
    pub const ALL: [BinOpKind; 18] = [
        BinOpKind::Dot,
        BinOpKind::Add,
        BinOpKind::Sub,
        BinOpKind::Mul,
        BinOpKind::Div,
        BinOpKind::Mod,
        BinOpKind::Gt,
        BinOpKind::Lt,
        BinOpKind::Ge,
        BinOpKind::Le,
        BinOpKind::Eq,
        BinOpKind::Neq,
        BinOpKind::And,
        BinOpKind::Or,
        BinOpKind::MulAssign,
        BinOpKind::DivAssign,
        BinOpKind::AddAssign,
        BinOpKind::SubAssign,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinOpKind::Dot => ".",
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Mod => "%",
            BinOpKind::Gt => ">",
            BinOpKind::Lt => "<",
            BinOpKind::Ge => ">=",
            BinOpKind::Le => "<=",
            BinOpKind::Eq => "==",
            BinOpKind::Neq => "!=",
            BinOpKind::And => "&&",
            BinOpKind::Or => "||",
            BinOpKind::MulAssign => "*=",
            BinOpKind::DivAssign => "/=",
            BinOpKind::AddAssign => "+=",
            BinOpKind::SubAssign => "-=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

/// Literal: number, string or boolean
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub text: String,
    pub class: LiteralClass,
    pub value: LiteralValue,
    pub meta: NodeMeta,
}

impl Literal {
    /// Build a literal, evaluating its value from `text`.
    pub fn new(class: LiteralClass, text: impl Into<String>) -> Result<Self, LiteralError> {
        let text = text.into();
        let value = literal::evaluate(class, &text)?;
        Ok(Self {
            text,
            class,
            value,
            meta: NodeMeta::default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub meta: NodeMeta,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meta: NodeMeta::default(),
        }
    }
}

/// Reference to a type by name; `descriptor` is `None` when the name is not
/// a base type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: String,
    pub descriptor: Option<TypeDesc>,
    pub meta: NodeMeta,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let descriptor = semantic::resolve_base_type(&name);
        Self {
            name,
            descriptor,
            meta: NodeMeta::default(),
        }
    }
}

/// Reference to a modifier keyword (`public`, `static`, `async`, ...).
/// The empty name is the canonical "no modifier".
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRef {
    pub name: String,
    pub descriptor: Option<AccessType>,
    pub meta: NodeMeta,
}

impl AccessRef {
    pub const EMPTY: AccessRef = AccessRef {
        name: String::new(),
        descriptor: Some(AccessType::PackagePrivate),
        meta: NodeMeta::EMPTY,
    };

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let descriptor = semantic::resolve_access_modifier(&name);
        Self {
            name,
            descriptor,
            meta: NodeMeta::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Function call: `callee(args...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Ident,
    pub args: Vec<AstNode>,
    pub meta: NodeMeta,
}

impl Call {
    pub fn new(callee: Ident, args: Vec<AstNode>) -> Self {
        Self {
            callee,
            args,
            meta: NodeMeta::default(),
        }
    }
}

/// One link of a dotted chain
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    New(New),
    Call(Call),
    Ident(Ident),
}

/// Dotted member/call chain `a.b().c`, segments in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub segments: Vec<Segment>,
    pub meta: NodeMeta,
}

impl Chain {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            meta: NodeMeta::default(),
        }
    }
}

/// Explicit type coercion. Never produced by the grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct Convert {
    pub expr: Box<AstNode>,
    pub target: TypeDesc,
    pub meta: NodeMeta,
}

impl Convert {
    /// Wrap `expr`; the node's resolved type is the target type.
    pub fn new(expr: AstNode, target: TypeDesc) -> Self {
        let meta = NodeMeta {
            resolved_type: Some(target.clone()),
            ..NodeMeta::default()
        };
        Self {
            expr: Box::new(expr),
            target,
            meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Ident,
    pub value: Box<AstNode>,
    pub meta: NodeMeta,
}

impl Assign {
    pub fn new(target: Ident, value: AstNode) -> Self {
        Self {
            target,
            value: Box::new(value),
            meta: NodeMeta::default(),
        }
    }
}

/// One name introduced by a variable declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Name(Ident),
    Init(Assign),
}

impl Binding {
    pub fn name(&self) -> &str {
        match self {
            Binding::Name(ident) => &ident.name,
            Binding::Init(assign) => &assign.target.name,
        }
    }
}

/// `type a, b = expr, c;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeRef,
    pub bindings: Vec<Binding>,
    pub meta: NodeMeta,
}

impl VarDecl {
    pub fn new(ty: TypeRef, bindings: Vec<Binding>) -> Self {
        Self {
            ty,
            bindings,
            meta: NodeMeta::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct New {
    pub call: Call,
    pub meta: NodeMeta,
}

impl New {
    pub fn new(call: Call) -> Self {
        Self {
            call,
            meta: NodeMeta::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Box<AstNode>,
    pub meta: NodeMeta,
}

impl Return {
    pub fn new(value: AstNode) -> Self {
        Self {
            value: Box::new(value),
            meta: NodeMeta::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub cond: Box<AstNode>,
    pub then_branch: Box<AstNode>,
    pub else_branch: Option<Box<AstNode>>,
    pub meta: NodeMeta,
}

impl If {
    pub fn new(cond: AstNode, then_branch: AstNode, else_branch: Option<AstNode>) -> Self {
        Self {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
            meta: NodeMeta::default(),
        }
    }
}

/// `for (init; cond; step) body`. Blank clauses are stored as `None` and
/// read back as [`EMPTY_STMT_LIST`], so a `for` always has four children.
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    init: Option<Box<AstNode>>,
    cond: Option<Box<AstNode>>,
    step: Option<Box<AstNode>>,
    body: Option<Box<AstNode>>,
    pub meta: NodeMeta,
}

impl For {
    pub fn new(
        init: Option<AstNode>,
        cond: Option<AstNode>,
        step: Option<AstNode>,
        body: Option<AstNode>,
    ) -> Self {
        Self {
            init: init.map(Box::new),
            cond: cond.map(Box::new),
            step: step.map(Box::new),
            body: body.map(Box::new),
            meta: NodeMeta::default(),
        }
    }

    pub fn init(&self) -> &AstNode {
        self.init.as_deref().unwrap_or(&EMPTY_STMT_LIST)
    }

    pub fn cond(&self) -> &AstNode {
        self.cond.as_deref().unwrap_or(&EMPTY_STMT_LIST)
    }

    pub fn step(&self) -> &AstNode {
        self.step.as_deref().unwrap_or(&EMPTY_STMT_LIST)
    }

    pub fn body(&self) -> &AstNode {
        self.body.as_deref().unwrap_or(&EMPTY_STMT_LIST)
    }

    fn clauses_mut(&mut self) -> impl Iterator<Item = &mut AstNode> {
        [&mut self.init, &mut self.cond, &mut self.step, &mut self.body]
            .into_iter()
            .filter_map(|slot| slot.as_deref_mut())
    }
}

/// Function parameter: `type name`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: Ident,
    pub meta: NodeMeta,
}

impl Param {
    pub fn new(ty: TypeRef, name: Ident) -> Self {
        Self {
            ty,
            name,
            meta: NodeMeta::default(),
        }
    }
}

/// Modifiers that may precede a function declaration, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Modifiers {
    pub is_async: Option<AccessRef>,
    pub access: Option<AccessRef>,
    pub is_static: Option<AccessRef>,
}

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    modifiers: Modifiers,
    pub return_type: TypeRef,
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: Box<AstNode>,
    pub meta: NodeMeta,
}

impl FuncDecl {
    pub fn new(
        modifiers: Modifiers,
        return_type: TypeRef,
        name: Ident,
        params: Vec<Param>,
        body: AstNode,
    ) -> Self {
        Self {
            modifiers,
            return_type,
            name,
            params,
            body: Box::new(body),
            meta: NodeMeta::default(),
        }
    }

    pub fn is_async(&self) -> &AccessRef {
        self.modifiers.is_async.as_ref().unwrap_or(&EMPTY_ACCESS)
    }

    pub fn access(&self) -> &AccessRef {
        self.modifiers.access.as_ref().unwrap_or(&EMPTY_ACCESS)
    }

    pub fn is_static(&self) -> &AccessRef {
        self.modifiers.is_static.as_ref().unwrap_or(&EMPTY_ACCESS)
    }
}

/// Class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    access: Option<AccessRef>,
    pub name: Ident,
    body: Option<StmtList>,
    pub meta: NodeMeta,
}

impl ClassDecl {
    pub fn new(access: Option<AccessRef>, name: Ident, body: Option<StmtList>) -> Self {
        Self {
            access,
            name,
            body,
            meta: NodeMeta::default(),
        }
    }

    pub fn access(&self) -> &AccessRef {
        self.access.as_ref().unwrap_or(&EMPTY_ACCESS)
    }

    pub fn body(&self) -> &StmtList {
        self.body.as_ref().unwrap_or(&EMPTY_STATEMENTS)
    }
}

/// Sequence of statements; the root of a parse has `is_program` set.
#[derive(Debug, Clone, PartialEq)]
pub struct StmtList {
    pub statements: Vec<AstNode>,
    pub is_program: bool,
    pub meta: NodeMeta,
}

impl StmtList {
    pub const EMPTY: StmtList = StmtList {
        statements: Vec::new(),
        is_program: false,
        meta: NodeMeta::EMPTY,
    };

    pub fn new(statements: Vec<AstNode>) -> Self {
        Self {
            statements,
            is_program: false,
            meta: NodeMeta::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub op: BinOpKind,
    pub left: Box<AstNode>,
    pub right: Box<AstNode>,
    pub meta: NodeMeta,
}

impl BinOp {
    pub fn new(op: BinOpKind, left: AstNode, right: AstNode) -> Self {
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
            meta: NodeMeta::default(),
        }
    }
}

/// Canonical empty statement list for blank optional slots
pub static EMPTY_STMT_LIST: AstNode = AstNode::StmtList(StmtList::EMPTY);

/// Canonical empty body for declarations without one
pub static EMPTY_STATEMENTS: StmtList = StmtList::EMPTY;

/// Canonical "no modifier"
pub static EMPTY_ACCESS: AccessRef = AccessRef::EMPTY;

/// AST nodes representing expressions, statements and declarations
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    // Leaves
    Literal(Literal),
    Ident(Ident),
    TypeRef(TypeRef),
    AccessRef(AccessRef),

    // Expressions
    Call(Call),
    Chain(Chain),
    Convert(Convert),
    Assign(Assign),
    BinOp(BinOp),
    New(New),

    // Statements and declarations
    VarDecl(VarDecl),
    Return(Return),
    If(If),
    For(For),
    Param(Param),
    FuncDecl(FuncDecl),
    ClassDecl(ClassDecl),
    StmtList(StmtList),
}

impl AstNode {
    pub fn meta(&self) -> &NodeMeta {
        match self {
            AstNode::Literal(n) => &n.meta,
            AstNode::Ident(n) => &n.meta,
            AstNode::TypeRef(n) => &n.meta,
            AstNode::AccessRef(n) => &n.meta,
            AstNode::Call(n) => &n.meta,
            AstNode::Chain(n) => &n.meta,
            AstNode::Convert(n) => &n.meta,
            AstNode::Assign(n) => &n.meta,
            AstNode::BinOp(n) => &n.meta,
            AstNode::New(n) => &n.meta,
            AstNode::VarDecl(n) => &n.meta,
            AstNode::Return(n) => &n.meta,
            AstNode::If(n) => &n.meta,
            AstNode::For(n) => &n.meta,
            AstNode::Param(n) => &n.meta,
            AstNode::FuncDecl(n) => &n.meta,
            AstNode::ClassDecl(n) => &n.meta,
            AstNode::StmtList(n) => &n.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut NodeMeta {
        match self {
            AstNode::Literal(n) => &mut n.meta,
            AstNode::Ident(n) => &mut n.meta,
            AstNode::TypeRef(n) => &mut n.meta,
            AstNode::AccessRef(n) => &mut n.meta,
            AstNode::Call(n) => &mut n.meta,
            AstNode::Chain(n) => &mut n.meta,
            AstNode::Convert(n) => &mut n.meta,
            AstNode::Assign(n) => &mut n.meta,
            AstNode::BinOp(n) => &mut n.meta,
            AstNode::New(n) => &mut n.meta,
            AstNode::VarDecl(n) => &mut n.meta,
            AstNode::Return(n) => &mut n.meta,
            AstNode::If(n) => &mut n.meta,
            AstNode::For(n) => &mut n.meta,
            AstNode::Param(n) => &mut n.meta,
            AstNode::FuncDecl(n) => &mut n.meta,
            AstNode::ClassDecl(n) => &mut n.meta,
            AstNode::StmtList(n) => &mut n.meta,
        }
    }

    /// Source location of the node's first token, if it came from source
    pub fn location(&self) -> Option<SourceLocation> {
        self.meta().location
    }

    /// Stamp the node's position. Positions are written once: a node that
    /// already has one keeps it. Operator chains folded from a single rule
    /// match share the rule's position down their left spine.
    pub fn set_location(&mut self, location: SourceLocation) {
        if self.meta().location.is_some() {
            return;
        }
        self.meta_mut().location = Some(location);
        if let AstNode::BinOp(bin) = self {
            bin.left.set_location(location);
        }
    }

    pub fn set_resolved_type(&mut self, ty: TypeDesc) {
        self.meta_mut().resolved_type = Some(ty);
    }

    pub fn set_resolved_ident(&mut self, ident: IdentDesc) {
        self.meta_mut().resolved_ident = Some(ident);
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            AstNode::Literal(n) => NodeRef::Literal(n),
            AstNode::Ident(n) => NodeRef::Ident(n),
            AstNode::TypeRef(n) => NodeRef::TypeRef(n),
            AstNode::AccessRef(n) => NodeRef::AccessRef(n),
            AstNode::Call(n) => NodeRef::Call(n),
            AstNode::Chain(n) => NodeRef::Chain(n),
            AstNode::Convert(n) => NodeRef::Convert(n),
            AstNode::Assign(n) => NodeRef::Assign(n),
            AstNode::BinOp(n) => NodeRef::BinOp(n),
            AstNode::New(n) => NodeRef::New(n),
            AstNode::VarDecl(n) => NodeRef::VarDecl(n),
            AstNode::Return(n) => NodeRef::Return(n),
            AstNode::If(n) => NodeRef::If(n),
            AstNode::For(n) => NodeRef::For(n),
            AstNode::Param(n) => NodeRef::Param(n),
            AstNode::FuncDecl(n) => NodeRef::FuncDecl(n),
            AstNode::ClassDecl(n) => NodeRef::ClassDecl(n),
            AstNode::StmtList(n) => NodeRef::StmtList(n),
        }
    }

    pub fn label(&self) -> String {
        self.as_node_ref().label()
    }

    pub fn children(&self) -> Vec<NodeRef<'_>> {
        self.as_node_ref().children()
    }

    /// Direct owned child nodes, for passes that rewrite annotations.
    pub fn child_nodes_mut(&mut self) -> Vec<&mut AstNode> {
        match self {
            AstNode::Literal(_)
            | AstNode::Ident(_)
            | AstNode::TypeRef(_)
            | AstNode::AccessRef(_)
            | AstNode::Param(_) => Vec::new(),
            AstNode::Call(n) => n.args.iter_mut().collect(),
            AstNode::Chain(n) => n
                .segments
                .iter_mut()
                .flat_map(|segment| match segment {
                    Segment::New(new) => new.call.args.iter_mut().collect::<Vec<_>>(),
                    Segment::Call(call) => call.args.iter_mut().collect(),
                    Segment::Ident(_) => Vec::new(),
                })
                .collect(),
            AstNode::Convert(n) => vec![n.expr.as_mut()],
            AstNode::Assign(n) => vec![n.value.as_mut()],
            AstNode::BinOp(n) => vec![n.left.as_mut(), n.right.as_mut()],
            AstNode::New(n) => n.call.args.iter_mut().collect(),
            AstNode::VarDecl(n) => n
                .bindings
                .iter_mut()
                .filter_map(|binding| match binding {
                    Binding::Init(assign) => Some(assign.value.as_mut()),
                    Binding::Name(_) => None,
                })
                .collect(),
            AstNode::Return(n) => vec![n.value.as_mut()],
            AstNode::If(n) => {
                let mut nodes = vec![n.cond.as_mut(), n.then_branch.as_mut()];
                if let Some(else_branch) = n.else_branch.as_deref_mut() {
                    nodes.push(else_branch);
                }
                nodes
            }
            AstNode::For(n) => n.clauses_mut().collect(),
            AstNode::FuncDecl(n) => vec![n.body.as_mut()],
            AstNode::ClassDecl(n) => match n.body.as_mut() {
                Some(body) => body.statements.iter_mut().collect(),
                None => Vec::new(),
            },
            AstNode::StmtList(n) => n.statements.iter_mut().collect(),
        }
    }
}

/// Display-only grouping of children in the rendered tree. Has no
/// counterpart in the grammar and no source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub label: Cow<'a, str>,
    pub children: Vec<NodeRef<'a>>,
}

impl<'a> Group<'a> {
    pub fn new(label: impl Into<Cow<'a, str>>, children: Vec<NodeRef<'a>>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }
}

/// Borrowed view of a node, or of a display group
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRef<'a> {
    Literal(&'a Literal),
    Ident(&'a Ident),
    TypeRef(&'a TypeRef),
    AccessRef(&'a AccessRef),
    Call(&'a Call),
    Chain(&'a Chain),
    Convert(&'a Convert),
    Assign(&'a Assign),
    BinOp(&'a BinOp),
    New(&'a New),
    VarDecl(&'a VarDecl),
    Return(&'a Return),
    If(&'a If),
    For(&'a For),
    Param(&'a Param),
    FuncDecl(&'a FuncDecl),
    ClassDecl(&'a ClassDecl),
    StmtList(&'a StmtList),
    Group(Group<'a>),
}

impl<'a> NodeRef<'a> {
    /// Metadata of the viewed node; groups have none.
    pub fn meta(&self) -> Option<&'a NodeMeta> {
        Some(match self {
            NodeRef::Literal(n) => &n.meta,
            NodeRef::Ident(n) => &n.meta,
            NodeRef::TypeRef(n) => &n.meta,
            NodeRef::AccessRef(n) => &n.meta,
            NodeRef::Call(n) => &n.meta,
            NodeRef::Chain(n) => &n.meta,
            NodeRef::Convert(n) => &n.meta,
            NodeRef::Assign(n) => &n.meta,
            NodeRef::BinOp(n) => &n.meta,
            NodeRef::New(n) => &n.meta,
            NodeRef::VarDecl(n) => &n.meta,
            NodeRef::Return(n) => &n.meta,
            NodeRef::If(n) => &n.meta,
            NodeRef::For(n) => &n.meta,
            NodeRef::Param(n) => &n.meta,
            NodeRef::FuncDecl(n) => &n.meta,
            NodeRef::ClassDecl(n) => &n.meta,
            NodeRef::StmtList(n) => &n.meta,
            NodeRef::Group(_) => return None,
        })
    }

    pub fn location(&self) -> Option<SourceLocation> {
        self.meta().and_then(|meta| meta.location)
    }

    /// Variant name, for diagnostics and the explorer's status bar
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::Literal(_) => "Literal",
            NodeRef::Ident(_) => "Ident",
            NodeRef::TypeRef(_) => "TypeRef",
            NodeRef::AccessRef(_) => "AccessRef",
            NodeRef::Call(_) => "Call",
            NodeRef::Chain(_) => "Chain",
            NodeRef::Convert(_) => "Convert",
            NodeRef::Assign(_) => "Assign",
            NodeRef::BinOp(_) => "BinOp",
            NodeRef::New(_) => "New",
            NodeRef::VarDecl(_) => "VarDecl",
            NodeRef::Return(_) => "Return",
            NodeRef::If(_) => "If",
            NodeRef::For(_) => "For",
            NodeRef::Param(_) => "Param",
            NodeRef::FuncDecl(_) => "FuncDecl",
            NodeRef::ClassDecl(_) => "ClassDecl",
            NodeRef::StmtList(_) => "StmtList",
            NodeRef::Group(_) => "Group",
        }
    }

    /// Short one-line description
    pub fn label(&self) -> String {
        match self {
            NodeRef::Literal(n) => n.text.clone(),
            NodeRef::Ident(n) => n.name.clone(),
            NodeRef::TypeRef(n) => n.name.clone(),
            NodeRef::AccessRef(n) => n.name.clone(),
            NodeRef::Call(_) => "call".to_string(),
            NodeRef::Chain(_) => BinOpKind::Dot.symbol().to_string(),
            NodeRef::Convert(_) => "convert".to_string(),
            NodeRef::Assign(_) => "=".to_string(),
            NodeRef::BinOp(n) => n.op.symbol().to_string(),
            NodeRef::New(_) => "new".to_string(),
            NodeRef::VarDecl(n) => n.ty.name.clone(),
            NodeRef::Return(_) => "return".to_string(),
            NodeRef::If(_) => "if".to_string(),
            NodeRef::For(_) => "for".to_string(),
            NodeRef::Param(n) => n.ty.name.clone(),
            NodeRef::FuncDecl(_) => "function".to_string(),
            NodeRef::ClassDecl(_) => "class".to_string(),
            NodeRef::StmtList(_) => "...".to_string(),
            NodeRef::Group(g) => g.label.to_string(),
        }
    }

    /// Resolved ident or type for display, shown on expression nodes only
    pub fn annotation(&self) -> Option<String> {
        let meta = match self {
            NodeRef::Literal(_)
            | NodeRef::Ident(_)
            | NodeRef::Call(_)
            | NodeRef::Chain(_)
            | NodeRef::Convert(_)
            | NodeRef::Assign(_)
            | NodeRef::BinOp(_) => self.meta()?,
            _ => return None,
        };
        if let Some(ident) = &meta.resolved_ident {
            Some(ident.to_string())
        } else {
            meta.resolved_type.as_ref().map(|ty| ty.to_string())
        }
    }

    /// Ordered children, including display groups
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match self {
            NodeRef::Literal(_)
            | NodeRef::Ident(_)
            | NodeRef::TypeRef(_)
            | NodeRef::AccessRef(_) => Vec::new(),
            NodeRef::Call(n) => call_children(n),
            NodeRef::Chain(n) => n.segments.iter().map(NodeRef::from).collect(),
            NodeRef::Convert(n) => vec![NodeRef::Group(Group::new(
                n.target.to_string(),
                vec![n.expr.as_node_ref()],
            ))],
            NodeRef::Assign(n) => vec![NodeRef::Ident(&n.target), n.value.as_node_ref()],
            NodeRef::BinOp(n) => vec![n.left.as_node_ref(), n.right.as_node_ref()],
            NodeRef::New(n) => vec![NodeRef::Call(&n.call)],
            NodeRef::VarDecl(n) => n.bindings.iter().map(NodeRef::from).collect(),
            NodeRef::Return(n) => vec![n.value.as_node_ref()],
            NodeRef::If(n) => {
                let mut children = vec![n.cond.as_node_ref(), n.then_branch.as_node_ref()];
                if let Some(else_branch) = &n.else_branch {
                    children.push(else_branch.as_node_ref());
                }
                children
            }
            NodeRef::For(n) => vec![
                n.init().as_node_ref(),
                n.cond().as_node_ref(),
                n.step().as_node_ref(),
                n.body().as_node_ref(),
            ],
            NodeRef::Param(n) => vec![NodeRef::Ident(&n.name)],
            NodeRef::FuncDecl(n) => func_children(n),
            NodeRef::ClassDecl(n) => vec![
                NodeRef::Group(Group::new(
                    n.access().name.as_str(),
                    vec![NodeRef::Ident(&n.name)],
                )),
                NodeRef::StmtList(n.body()),
            ],
            NodeRef::StmtList(n) => n.statements.iter().map(AstNode::as_node_ref).collect(),
            NodeRef::Group(g) => g.children.clone(),
        }
    }
}

fn call_children(call: &Call) -> Vec<NodeRef<'_>> {
    vec![
        NodeRef::Ident(&call.callee),
        NodeRef::Group(Group::new(
            "params",
            call.args.iter().map(AstNode::as_node_ref).collect(),
        )),
    ]
}

/// Modifiers nest outermost-first down to the function name:
/// async → access → static → return type → name.
fn func_children(func: &FuncDecl) -> Vec<NodeRef<'_>> {
    let signature = Group::new(
        func.is_async().name.as_str(),
        vec![NodeRef::Group(Group::new(
            func.access().name.as_str(),
            vec![NodeRef::Group(Group::new(
                func.is_static().name.as_str(),
                vec![NodeRef::Group(Group::new(
                    func.return_type.name.as_str(),
                    vec![NodeRef::Ident(&func.name)],
                ))],
            ))],
        ))],
    );
    vec![
        NodeRef::Group(signature),
        NodeRef::Group(Group::new(
            "params",
            func.params.iter().map(NodeRef::Param).collect(),
        )),
        func.body.as_node_ref(),
    ]
}

impl<'a> From<&'a AstNode> for NodeRef<'a> {
    fn from(node: &'a AstNode) -> Self {
        node.as_node_ref()
    }
}

impl<'a> From<&'a Segment> for NodeRef<'a> {
    fn from(segment: &'a Segment) -> Self {
        match segment {
            Segment::New(n) => NodeRef::New(n),
            Segment::Call(n) => NodeRef::Call(n),
            Segment::Ident(n) => NodeRef::Ident(n),
        }
    }
}

impl<'a> From<&'a Binding> for NodeRef<'a> {
    fn from(binding: &'a Binding) -> Self {
        match binding {
            Binding::Name(n) => NodeRef::Ident(n),
            Binding::Init(n) => NodeRef::Assign(n),
        }
    }
}
