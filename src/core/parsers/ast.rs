//! Typed Go syntax tree.
//!
//! Only the node shapes the extractors inspect are modelled. Everything else
//! lowers to an `Other` variant so that matching stays exhaustive without
//! carrying the full Go grammar around.

/// A lowered Go source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoFile {
    /// Top-level declarations in source order.
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// Function or method declaration.
    Func(FuncDecl),
    /// `type` declaration (one or more specs).
    Type(TypeDecl),
    /// Imports, vars, consts and anything else.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    /// Present for methods.
    pub receiver: Option<Receiver>,
    /// Joined leading comment block, comment markers stripped.
    pub doc: Option<String>,
    pub body: Vec<Stmt>,
}

/// Method receiver, reduced to its base type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    /// `T` for `(r *T)`, `(r T)` and `(r *T[M])`.
    pub type_name: String,
    pub pointer: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub doc: Option<String>,
    pub specs: Vec<TypeSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Struct(StructType),
    Ref(TypeRef),
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructType {
    pub fields: Vec<Field>,
}

impl StructType {
    /// Embedded (unnamed) fields in declaration order.
    pub fn embedded(&self) -> impl Iterator<Item = &TypeRef> {
        self.fields.iter().filter(|f| f.names.is_empty()).map(|f| &f.ty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Empty for embedded fields.
    pub names: Vec<String>,
    pub ty: TypeRef,
}

/// Syntactic type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// `Foo`
    Named(String),
    /// `pkg.Foo`
    Qualified { package: String, name: String },
    /// `*T`
    Pointer(Box<TypeRef>),
    /// `T[Args]`; arguments are kept as source text.
    Generic { base: Box<TypeRef>, args: String },
    /// Slices, maps, function types and the like, as source text.
    Other(String),
}

impl TypeRef {
    /// Package qualifier after peeling pointers and generic instantiation.
    pub fn package(&self) -> Option<&str> {
        match self {
            TypeRef::Qualified { package, .. } => Some(package),
            TypeRef::Pointer(inner) => inner.package(),
            TypeRef::Generic { base, .. } => base.package(),
            TypeRef::Named(_) | TypeRef::Other(_) => None,
        }
    }

    /// Base type name after peeling pointers and generic instantiation.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) | TypeRef::Qualified { name, .. } => Some(name),
            TypeRef::Pointer(inner) => inner.base_name(),
            TypeRef::Generic { base, .. } => base.base_name(),
            TypeRef::Other(_) => None,
        }
    }
}

/// Statements, reduced to what the return resolver needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `return a, b`
    Return(Vec<Expr>),
    /// `a, b := x, y`
    Define { names: Vec<String>, values: Vec<Expr> },
    /// `a, b = x, y` (only plain identifiers on the left are kept)
    Assign { names: Vec<String>, values: Vec<Expr> },
    /// `var a, b = x, y` (one entry per spec)
    Var(Vec<VarSpec>),
    /// Nested statement lists: blocks, if/else bodies, loop bodies, cases.
    Block(Vec<Stmt>),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarSpec {
    pub names: Vec<String>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    /// `operand.field`
    Selector { operand: Box<Expr>, field: String },
    Call { func: Box<Expr>, args: Vec<Expr> },
    Composite(CompositeLit),
    /// `&x`, `*x`, `-x`, ...
    Unary { op: String, operand: Box<Expr> },
    /// Unquoted value of an interpreted or raw string literal.
    StringLit(String),
    /// Function literal; bodies are not inspected.
    FuncLit,
    Other,
}

impl Expr {
    /// Peels `&` so that `&T{...}` and `T{...}` look alike.
    pub fn strip_address_of(&self) -> &Expr {
        match self {
            Expr::Unary { op, operand } if op == "&" => operand.strip_address_of(),
            other => other,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeLit> {
        match self.strip_address_of() {
            Expr::Composite(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_string_lit(&self) -> Option<&str> {
        match self {
            Expr::StringLit(value) => Some(value),
            _ => None,
        }
    }

    /// `(qualifier, symbol)` for `pkg.Symbol`.
    pub fn as_qualified(&self) -> Option<(&str, &str)> {
        match self {
            Expr::Selector { operand, field } => operand.as_ident().map(|pkg| (pkg, field.as_str())),
            _ => None,
        }
    }

    /// Last name segment of a call target: `Foo` for `Foo()` and `pkg.Foo()`.
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            Expr::Call { func, .. } => match func.as_ref() {
                Expr::Ident(name) => Some(name),
                Expr::Selector { field, .. } => Some(field),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLit {
    /// `None` for elided element literals such as `{Factory: f}` inside a slice.
    pub ty: Option<TypeRef>,
    pub elements: Vec<Element>,
}

impl CompositeLit {
    /// Keyed fields as `(key, value)` pairs in source order.
    pub fn keyed(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.elements.iter().filter_map(|e| match e {
            Element::Keyed { key, value } => Some((key.as_str(), value)),
            Element::Positional(_) => None,
        })
    }

    /// First value stored under `key`.
    pub fn field(&self, key: &str) -> Option<&Expr> {
        self.keyed().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn positional(&self) -> impl Iterator<Item = &Expr> {
        self.elements.iter().filter_map(|e| match e {
            Element::Positional(value) => Some(value),
            Element::Keyed { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Keyed { key: String, value: Expr },
    Positional(Expr),
}
