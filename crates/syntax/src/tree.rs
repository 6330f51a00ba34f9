//! Owned, comment-decorated Go syntax tree.
//!
//! Only the structure the canonicalizer reorders is modelled as nodes:
//! declarations, their specs, struct/interface member lists and statement
//! blocks. Everything else (expressions, signatures, non-struct types) is
//! kept as the exact source text the user wrote.
//!
//! Every movable item owns its [`Decorations`], so comments travel with the
//! item when a list is permuted.

use smallvec::SmallVec;
use tree_derive::Walk;

/// Vertical space the printer puts before an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Space {
    #[default]
    Line,
    /// An empty line separates the item from whatever precedes it.
    Blank,
}

/// A source comment, verbatim (`// ...` or `/* ... */`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    /// An empty line followed the comment in the source.
    pub blank_after: bool,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blank_after: false,
        }
    }
}

/// Spacing and comments attached to one item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decorations {
    pub before: Space,
    /// Comments on their own lines above the item.
    pub leading: Vec<Comment>,
    /// Comments on the item's last line, after it.
    pub trailing: Vec<String>,
}

impl Decorations {
    pub fn is_bare(&self) -> bool {
        self.before == Space::Line && self.leading.is_empty() && self.trailing.is_empty()
    }
}

/// Implemented by every node that owns its [`Decorations`].
pub trait Decorated {
    fn decorations(&self) -> &Decorations;
    fn decorations_mut(&mut self) -> &mut Decorations;
}

macro_rules! impl_decorated {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Decorated for $ty {
                #[inline]
                fn decorations(&self) -> &Decorations {
                    &self.decs
                }

                #[inline]
                fn decorations_mut(&mut self) -> &mut Decorations {
                    &mut self.decs
                }
            }
        )*
    };
}

impl_decorated!(
    PackageClause,
    ImportSpec,
    ValueSpec,
    TypeSpec,
    Field,
    FuncDecl,
    Stmt,
    CaseClause
);

/// A delimited, reorderable list: `( ... )`, `{ ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct List<T> {
    /// Comments right after the opening delimiter, on its line.
    pub opening: Vec<String>,
    pub items: Vec<T>,
    /// Space and comments before the closing delimiter.
    pub closing: Decorations,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> List<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            opening: Vec::new(),
            items,
            closing: Decorations::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct SourceFile {
    pub package: PackageClause,
    pub decls: Vec<Decl>,
    /// Comments after the last declaration.
    pub closing: Decorations,
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct PackageClause {
    pub decs: Decorations,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub enum Decl {
    Import(GenDecl<ImportSpec>),
    Const(GenDecl<ValueSpec>),
    Var(GenDecl<ValueSpec>),
    Type(GenDecl<TypeSpec>),
    Func(FuncDecl),
}

impl Decorated for Decl {
    fn decorations(&self) -> &Decorations {
        match self {
            Self::Import(d) => d.decorations(),
            Self::Const(d) | Self::Var(d) => d.decorations(),
            Self::Type(d) => d.decorations(),
            Self::Func(f) => f.decorations(),
        }
    }

    fn decorations_mut(&mut self) -> &mut Decorations {
        match self {
            Self::Import(d) => d.decorations_mut(),
            Self::Const(d) | Self::Var(d) => d.decorations_mut(),
            Self::Type(d) => d.decorations_mut(),
            Self::Func(f) => f.decorations_mut(),
        }
    }
}

/// `import`, `const`, `var` or `type` with one spec or a parenthesized group.
#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct GenDecl<S> {
    pub decs: Decorations,
    /// Written with parentheses. Always true when there is more than one spec.
    pub grouped: bool,
    pub specs: List<S>,
}

impl<S> Decorated for GenDecl<S> {
    #[inline]
    fn decorations(&self) -> &Decorations {
        &self.decs
    }

    #[inline]
    fn decorations_mut(&mut self) -> &mut Decorations {
        &mut self.decs
    }
}

impl<S> GenDecl<S> {
    pub fn single(spec: S) -> Self {
        Self {
            decs: Decorations::default(),
            grouped: false,
            specs: List::new(vec![spec]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct ImportSpec {
    pub decs: Decorations,
    /// Explicit alias, `_` or `.`.
    pub name: Option<String>,
    /// Quoted path as written.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct ValueSpec {
    pub decs: Decorations,
    pub names: SmallVec<[String; 1]>,
    pub ty: Option<String>,
    /// Right-hand side after `=`, as written.
    pub values: Option<String>,
    /// The right-hand side mentions the `iota` identifier.
    pub iota: bool,
}

impl ValueSpec {
    pub fn first_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct TypeSpec {
    pub decs: Decorations,
    pub name: String,
    /// Type parameter list including brackets.
    pub params: Option<String>,
    /// `type A = B`.
    pub alias: bool,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub enum TypeExpr {
    Struct(List<Field>),
    Interface(List<Field>),
    /// Interface method signature, `(params) results`.
    Signature(String),
    Text(String),
}

impl TypeExpr {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// A struct field or interface element. No names means embedded.
#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct Field {
    pub decs: Decorations,
    pub names: SmallVec<[String; 1]>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
}

impl Field {
    pub fn named(name: &str, ty: TypeExpr) -> Self {
        Self {
            decs: Decorations::default(),
            names: SmallVec::from_elem(name.to_string(), 1),
            ty,
            tag: None,
        }
    }

    pub fn embedded(ty: TypeExpr) -> Self {
        Self {
            decs: Decorations::default(),
            names: SmallVec::new(),
            ty,
            tag: None,
        }
    }

    #[inline]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct FuncDecl {
    pub decs: Decorations,
    /// Everything from after `func` up to the body, as written.
    pub signature: String,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Walk)]
#[walk(visit = visit_block)]
pub struct Block {
    pub opening: Vec<String>,
    pub stmts: Vec<Stmt>,
    pub closing: Decorations,
    /// Function body whose braces sat on one source line.
    pub one_line: bool,
}

/// Terminating statements the spacer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Return,
    Break,
    Continue,
    Goto,
    Fallthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StmtKind {
    #[default]
    Plain,
    Exit(Exit),
}

/// A statement: source text interleaved with nested blocks.
#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub struct Stmt {
    pub decs: Decorations,
    pub label: Option<String>,
    pub kind: StmtKind,
    pub parts: Vec<Part>,
}

impl Stmt {
    pub fn text(kind: StmtKind, text: &str) -> Self {
        Self {
            decs: Decorations::default(),
            label: None,
            kind,
            parts: vec![Part::Text(text.to_string())],
        }
    }

    #[inline]
    pub fn is_exit(&self) -> bool {
        matches!(self.kind, StmtKind::Exit(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
pub enum Part {
    Text(String),
    Block(Block),
    /// The `{ case ...: ... }` body of a switch or select.
    Cases(CaseBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Walk)]
pub struct CaseBody {
    pub opening: Vec<String>,
    pub clauses: Vec<CaseClause>,
    pub closing: Decorations,
}

#[derive(Debug, Clone, PartialEq, Eq, Walk)]
#[walk(visit = visit_case_clause)]
pub struct CaseClause {
    pub decs: Decorations,
    /// `case x, y` or `default`, without the colon.
    pub head: String,
    /// Comments after the colon, on its line.
    pub opening: Vec<String>,
    pub body: Vec<Stmt>,
}
