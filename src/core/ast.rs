//! Syntax tree of the analyzed program
//!
//! The tree is produced by an external front end and mirrors the statement
//! and expression forms of a Go-like language. Expressions carry a
//! [`NodeId`] so the type oracle can attach static types and bindings to
//! them; statements only carry a position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an expression or identifier node, unique within a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Source position within a file
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub id: NodeId,
    #[serde(default)]
    pub pos: Pos,
    pub name: String,
}

impl Ident {
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Quo => "/",
            BinaryOp::Rem => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::AndNot => "&^",
            BinaryOp::LAnd => "&&",
            BinaryOp::LOr => "||",
            BinaryOp::Eql => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lss => "<",
            BinaryOp::Leq => "<=",
            BinaryOp::Gtr => ">",
            BinaryOp::Geq => ">=",
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eql | BinaryOp::Neq)
    }

    /// Comparison and logical operators produce a boolean
    pub fn yields_bool(self) -> bool {
        matches!(
            self,
            BinaryOp::Eql
                | BinaryOp::Neq
                | BinaryOp::Lss
                | BinaryOp::Leq
                | BinaryOp::Gtr
                | BinaryOp::Geq
                | BinaryOp::LAnd
                | BinaryOp::LOr
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    Xor,
    /// `&x`
    Addr,
    /// `<-ch`
    Recv,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Xor => "^",
            UnaryOp::Addr => "&",
            UnaryOp::Recv => "<-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub id: NodeId,
    #[serde(default)]
    pub pos: Pos,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(id: NodeId, pos: Pos, kind: ExprKind) -> Self {
        Self { id, pos, kind }
    }

    /// The identifier this expression names, looking through parentheses
    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(ident),
            ExprKind::Paren(inner) => inner.as_ident(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    Ident(Ident),
    BasicLit {
        value: String,
    },
    Binary {
        op: BinaryOp,
        x: Box<Expr>,
        y: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        x: Box<Expr>,
    },
    Call {
        fun: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        /// Final argument is spread with `...`
        #[serde(default)]
        spread: bool,
    },
    CompositeLit {
        #[serde(default)]
        ty: Option<Box<Expr>>,
        #[serde(default)]
        elts: Vec<Element>,
    },
    FuncLit(FuncLit),
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
    },
    /// Generic instantiation with several type arguments
    IndexList {
        x: Box<Expr>,
        indices: Vec<Expr>,
    },
    Paren(Box<Expr>),
    Selector {
        x: Box<Expr>,
        sel: Ident,
    },
    Slice {
        x: Box<Expr>,
        #[serde(default)]
        low: Option<Box<Expr>>,
        #[serde(default)]
        high: Option<Box<Expr>>,
        #[serde(default)]
        max: Option<Box<Expr>>,
    },
    /// Pointer dereference or pointer type
    Star(Box<Expr>),
    /// `x.(T)`, or `x.(type)` in a type switch guard when `ty` is absent
    TypeAssert {
        x: Box<Expr>,
        #[serde(default)]
        ty: Option<Box<Expr>>,
    },
    Ellipsis(Option<Box<Expr>>),
    /// Type syntax the analysis never looks into
    TypeExpr {
        repr: String,
    },
}

impl ExprKind {
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Ident(_) => "ident",
            ExprKind::BasicLit { .. } => "basic_lit",
            ExprKind::Binary { .. } => "binary",
            ExprKind::Unary { .. } => "unary",
            ExprKind::Call { .. } => "call",
            ExprKind::CompositeLit { .. } => "composite_lit",
            ExprKind::FuncLit(_) => "func_lit",
            ExprKind::Index { .. } => "index",
            ExprKind::IndexList { .. } => "index_list",
            ExprKind::Paren(_) => "paren",
            ExprKind::Selector { .. } => "selector",
            ExprKind::Slice { .. } => "slice",
            ExprKind::Star(_) => "star",
            ExprKind::TypeAssert { .. } => "type_assert",
            ExprKind::Ellipsis(_) => "ellipsis",
            ExprKind::TypeExpr { .. } => "type_expr",
        }
    }
}

/// Element of a composite literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Value(Expr),
    KeyValue { key: Expr, value: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Empty for unnamed parameters and results
    #[serde(default)]
    pub names: Vec<Ident>,
    pub ty: Expr,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuncType {
    #[serde(default)]
    pub params: Vec<Field>,
    #[serde(default)]
    pub results: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncLit {
    #[serde(default)]
    pub ty: FuncType,
    pub body: Block,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignTok {
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `op=`
    Op(BinaryOp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchTok {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    #[serde(default)]
    pub pos: Pos,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            pos: Pos::default(),
            kind,
        }
    }

    pub fn at(pos: Pos, kind: StmtKind) -> Self {
        Self { pos, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    Assign {
        lhs: Vec<Expr>,
        tok: AssignTok,
        rhs: Vec<Expr>,
    },
    Block(Block),
    Branch {
        tok: BranchTok,
        #[serde(default)]
        label: Option<Ident>,
    },
    Decl(GenDecl),
    Defer(Expr),
    Go(Expr),
    Expr(Expr),
    For {
        #[serde(default)]
        init: Option<Box<Stmt>>,
        #[serde(default)]
        cond: Option<Expr>,
        #[serde(default)]
        post: Option<Box<Stmt>>,
        body: Block,
    },
    If {
        #[serde(default)]
        init: Option<Box<Stmt>>,
        cond: Expr,
        body: Block,
        #[serde(default)]
        els: Option<Box<Stmt>>,
    },
    IncDec {
        x: Expr,
        inc: bool,
    },
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
    },
    Range {
        #[serde(default)]
        key: Option<Expr>,
        #[serde(default)]
        value: Option<Expr>,
        #[serde(default)]
        define: bool,
        x: Expr,
        body: Block,
    },
    Return(Vec<Expr>),
    Select(Vec<CommClause>),
    Send {
        chan: Expr,
        value: Expr,
    },
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
    Empty,
}

impl StmtKind {
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Assign { .. } => "assign",
            StmtKind::Block(_) => "block",
            StmtKind::Branch { .. } => "branch",
            StmtKind::Decl(_) => "decl",
            StmtKind::Defer(_) => "defer",
            StmtKind::Go(_) => "go",
            StmtKind::Expr(_) => "expr",
            StmtKind::For { .. } => "for",
            StmtKind::If { .. } => "if",
            StmtKind::IncDec { .. } => "inc_dec",
            StmtKind::Labeled { .. } => "labeled",
            StmtKind::Range { .. } => "range",
            StmtKind::Return(_) => "return",
            StmtKind::Select(_) => "select",
            StmtKind::Send { .. } => "send",
            StmtKind::Switch(_) => "switch",
            StmtKind::TypeSwitch(_) => "type_switch",
            StmtKind::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStmt {
    #[serde(default)]
    pub init: Option<Box<Stmt>>,
    /// Absent for a boolean `switch { ... }`
    #[serde(default)]
    pub tag: Option<Expr>,
    #[serde(default)]
    pub clauses: Vec<CaseClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    #[serde(default)]
    pub pos: Pos,
    /// Empty for `default:`
    #[serde(default)]
    pub list: Vec<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSwitchStmt {
    #[serde(default)]
    pub init: Option<Box<Stmt>>,
    /// `v := x.(type)` or `x.(type)`
    pub assign: Box<Stmt>,
    #[serde(default)]
    pub clauses: Vec<TypeCaseClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCaseClause {
    #[serde(default)]
    pub types: Vec<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommClause {
    /// Send or receive statement; absent for `default:`
    #[serde(default)]
    pub comm: Option<Box<Stmt>>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenDecl {
    Var(Vec<ValueSpec>),
    Const(Vec<ValueSpec>),
    Type(Vec<TypeSpec>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    #[serde(default)]
    pub ty: Option<Expr>,
    #[serde(default)]
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: Ident,
    pub ty: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    #[serde(default)]
    pub pos: Pos,
    #[serde(default)]
    pub recv: Option<Field>,
    pub name: Ident,
    #[serde(default)]
    pub ty: FuncType,
    /// Absent for functions implemented outside the language
    #[serde(default)]
    pub body: Option<Block>,
}

impl FuncDecl {
    /// Named, non-blank parameters in declaration order
    pub fn params(&self) -> impl Iterator<Item = &Ident> {
        self.ty
            .params
            .iter()
            .flat_map(|field| field.names.iter())
            .filter(|name| !name.is_blank())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub path: String,
    #[serde(default)]
    pub decls: Vec<Decl>,
}

impl File {
    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            Decl::Gen(_) => None,
        })
    }
}
