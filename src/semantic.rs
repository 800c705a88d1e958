//! Static type and access-modifier vocabulary
//!
//! Leaf nodes of the AST ([`TypeRef`](crate::parser::ast::TypeRef) and
//! [`AccessRef`](crate::parser::ast::AccessRef)) resolve their names against
//! this vocabulary when they are built. Resolution is total: names outside
//! the vocabulary yield `None` and the node simply renders as a plain
//! identifier.
//!
//! [`IdentDesc`] and [`TypeDesc`] are also the display annotations a later
//! semantic pass may attach to expression nodes.

use std::fmt;

/// Base data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Void,
    Int,
    Float,
    Bool,
    Str,
}

impl BaseType {
    pub const ALL: [BaseType; 5] = [
        BaseType::Void,
        BaseType::Int,
        BaseType::Float,
        BaseType::Bool,
        BaseType::Str,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BaseType::Void => "void",
            BaseType::Int => "int",
            BaseType::Float => "float",
            BaseType::Bool => "bool",
            BaseType::Str => "string",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type descriptor: a base type, or a function type with return and
/// parameter types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    Base(BaseType),
    Func {
        return_type: Box<TypeDesc>,
        params: Vec<TypeDesc>,
    },
}

impl TypeDesc {
    pub const VOID: TypeDesc = TypeDesc::Base(BaseType::Void);
    pub const INT: TypeDesc = TypeDesc::Base(BaseType::Int);
    pub const FLOAT: TypeDesc = TypeDesc::Base(BaseType::Float);
    pub const BOOL: TypeDesc = TypeDesc::Base(BaseType::Bool);
    pub const STR: TypeDesc = TypeDesc::Base(BaseType::Str);

    pub fn func(return_type: TypeDesc, params: Vec<TypeDesc>) -> Self {
        TypeDesc::Func {
            return_type: Box::new(return_type),
            params,
        }
    }

    pub fn is_func(&self) -> bool {
        matches!(self, TypeDesc::Func { .. })
    }

    pub fn is_simple(&self) -> bool {
        !self.is_func()
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Base(base) => write!(f, "{}", base),
            TypeDesc::Func {
                return_type,
                params,
            } => {
                write!(f, "{} (", return_type)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Access modifiers. The empty modifier means package-private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessType {
    Public,
    Protected,
    Private,
    PackagePrivate,
}

impl AccessType {
    pub fn keyword(self) -> &'static str {
        match self {
            AccessType::Public => "public",
            AccessType::Protected => "protected",
            AccessType::Private => "private",
            AccessType::PackagePrivate => "",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::PackagePrivate => f.write_str("package-private"),
            other => f.write_str(other.keyword()),
        }
    }
}

/// Where an identifier was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeType {
    Global,
    /// Global, but declared inside a nested block
    GlobalLocal,
    Param,
    Local,
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScopeType::Global => "global",
            ScopeType::GlobalLocal => "global.local",
            ScopeType::Param => "param",
            ScopeType::Local => "local",
        })
    }
}

/// Identifier descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentDesc {
    pub name: String,
    pub ty: TypeDesc,
    pub scope: ScopeType,
    pub index: usize,
    pub built_in: bool,
}

impl IdentDesc {
    pub fn new(name: impl Into<String>, ty: TypeDesc, scope: ScopeType, index: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            scope,
            index,
            built_in: false,
        }
    }
}

impl fmt::Display for IdentDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.built_in {
            write!(f, "{}, {}, built-in", self.ty, self.scope)
        } else {
            write!(f, "{}, {}, {}", self.ty, self.scope, self.index)
        }
    }
}

/// Look up a base type by its source name.
pub fn resolve_base_type(name: &str) -> Option<TypeDesc> {
    BaseType::ALL
        .into_iter()
        .find(|base| base.name() == name)
        .map(TypeDesc::Base)
}

/// Look up an access modifier by its keyword. `""` is package-private.
pub fn resolve_access_modifier(name: &str) -> Option<AccessType> {
    match name {
        "public" => Some(AccessType::Public),
        "protected" => Some(AccessType::Protected),
        "private" => Some(AccessType::Private),
        "" => Some(AccessType::PackagePrivate),
        _ => None,
    }
}
