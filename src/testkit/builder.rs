//! Fluent construction of corpora for tests.
//!
//! Hand-writing syntax trees together with the oracle tables that describe
//! them is tedious and error prone. [`PackageBuilder`] allocates node ids,
//! positions and objects, and records the static type of every expression
//! it builds, the way a type checker would.
//!
//! The builders panic on misuse (selecting a member that does not exist,
//! indexing a non-indexable value); they are meant for test code only.
//!
//! # Example
//!
//! ```rust,ignore
//! use decouple::testkit::{CorpusBuilder, Stdlib, stmt};
//!
//! let mut corpus = CorpusBuilder::new();
//! let std = Stdlib::install(&mut corpus);
//! let mut pkg = corpus.package("example.com/m");
//! pkg.import(std::IO);
//! pkg.func("F", &[("r", std.file_ptr)], &[], |pb, params| {
//!     let r = pb.ident(params[0]);
//!     let close = pb.select(r, "Close");
//!     let call = pb.call(close, vec![]);
//!     vec![stmt::expr(call)]
//! });
//! pkg.finish();
//! let corpus = corpus.build();
//! ```

use crate::core::ast::{
    BinaryOp, Block, Decl, Element, Expr, ExprKind, Field, File, FuncDecl, FuncLit, FuncType,
    GenDecl, Ident, NodeId, Pos, Stmt, StmtKind, UnaryOp, ValueSpec,
};
use crate::core::corpus::{Corpus, Package};
use crate::core::oracle::{Object, ObjectId, ObjectKind, SelectionKind};
use crate::core::types::{BasicKind, Type, TypeId, TypeTable};
use std::collections::HashMap;

/// Builds a [`Corpus`] package by package
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    corpus: Corpus,
    package_names: HashMap<String, ObjectId>,
    nil: Option<ObjectId>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn types(&mut self) -> &mut TypeTable {
        &mut self.corpus.types
    }

    pub fn object(&mut self, name: &str, kind: ObjectKind, ty: TypeId, package: &str) -> ObjectId {
        let id = ObjectId(self.corpus.objects.len() as u32);
        self.corpus.objects.push(Object {
            name: name.to_string(),
            kind,
            ty,
            package: package.to_string(),
        });
        id
    }

    /// A predeclared function such as `make` or `close`.
    ///
    /// Uses of a builtin carry a per-call signature, see
    /// [`PackageBuilder::ident_typed`].
    pub fn builtin(&mut self, name: &str) -> ObjectId {
        let invalid = self.corpus.types.basic(BasicKind::Invalid);
        self.object(name, ObjectKind::Builtin, invalid, "")
    }

    fn nil_object(&mut self) -> ObjectId {
        if let Some(id) = self.nil {
            return id;
        }
        let ty = self.corpus.types.basic(BasicKind::UntypedNil);
        let id = self.object("nil", ObjectKind::Nil, ty, "");
        self.nil = Some(id);
        id
    }

    fn package_name(&mut self, path: &str) -> ObjectId {
        if let Some(id) = self.package_names.get(path) {
            return *id;
        }
        let invalid = self.corpus.types.basic(BasicKind::Invalid);
        let name = last_segment(path).to_string();
        let id = self.object(&name, ObjectKind::PkgName, invalid, path);
        self.package_names.insert(path.to_string(), id);
        id
    }

    /// Start a package; its name is the last segment of `path`
    pub fn package(&mut self, path: &str) -> PackageBuilder<'_> {
        PackageBuilder {
            package: Package::new(path, last_segment(path)),
            corpus: self,
            next_id: 1,
            line: 0,
            column: 1,
        }
    }

    /// Restrict analysis to `path`; repeatable
    pub fn root(&mut self, path: &str) -> &mut Self {
        self.corpus.roots.push(path.to_string());
        self
    }

    pub fn build(self) -> Corpus {
        self.corpus
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Builds one package; call [`PackageBuilder::finish`] to add it to the corpus
pub struct PackageBuilder<'c> {
    corpus: &'c mut CorpusBuilder,
    package: Package,
    next_id: u32,
    line: u32,
    column: u32,
}

impl PackageBuilder<'_> {
    pub fn path(&self) -> &str {
        &self.package.path
    }

    pub fn types(&mut self) -> &mut TypeTable {
        self.corpus.types()
    }

    pub fn import(&mut self, path: &str) -> &mut Self {
        self.package.imports.push(path.to_string());
        self
    }

    /// Start a new source file; later declarations go into it
    pub fn file(&mut self, path: &str) -> &mut Self {
        self.package.files.push(File {
            path: path.to_string(),
            decls: Vec::new(),
        });
        self
    }

    pub fn finish(self) {
        self.corpus.corpus.packages.push(self.package);
    }

    fn node(&mut self) -> (NodeId, Pos) {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let pos = Pos::new(self.line, self.column);
        self.column += 1;
        (id, pos)
    }

    fn record(&mut self, id: NodeId, ty: TypeId) {
        self.package.info.types.insert(id, ty);
    }

    fn new_ident(&mut self, name: &str) -> Ident {
        let (id, pos) = self.node();
        Ident {
            id,
            pos,
            name: name.to_string(),
        }
    }

    fn object_of(&self, id: ObjectId) -> &Object {
        match self.corpus.corpus.objects.get(id.0 as usize) {
            Some(object) => object,
            None => panic!("unknown object {}", id.0),
        }
    }

    /// Static type recorded for an expression built here
    pub fn type_of(&self, expr: &Expr) -> Option<TypeId> {
        self.package.info.types.get(&expr.id).copied()
    }

    fn expect_type(&self, expr: &Expr) -> TypeId {
        match self.type_of(expr) {
            Some(ty) => ty,
            None => panic!("no type recorded for {} at {}", expr.kind.name(), expr.pos),
        }
    }

    fn add_decl(&mut self, decl: Decl) {
        if self.package.files.is_empty() {
            let path = format!("{}/{}.go", self.package.path, self.package.name);
            self.file(&path);
        }
        if let Some(file) = self.package.files.last_mut() {
            file.decls.push(decl);
        }
    }

    fn declare(&mut self, name: &str, kind: ObjectKind, ty: TypeId) -> ObjectId {
        let path = self.package.path.clone();
        let id = self.corpus.object(name, kind, ty, &path);
        self.package.scope.push(id);
        id
    }

    // Declarations

    /// A named type declared in this package
    pub fn named(&mut self, name: &str, underlying: TypeId) -> TypeId {
        let path = self.package.path.clone();
        let ty = self.types().named(&path, name, underlying);
        self.declare(name, ObjectKind::TypeName, ty);
        ty
    }

    /// A named interface type declared in this package
    pub fn interface(&mut self, name: &str, methods: &[(&str, TypeId)]) -> TypeId {
        let iface = self.types().interface(methods);
        self.named(name, iface)
    }

    /// A package-level function without syntax, as dependencies provide
    pub fn declare_func(&mut self, name: &str, sig: TypeId) -> ObjectId {
        self.declare(name, ObjectKind::Func, sig)
    }

    /// A local variable of the function being built
    pub fn local(&mut self, name: &str, ty: TypeId) -> ObjectId {
        let path = self.package.path.clone();
        self.corpus.object(name, ObjectKind::Var, ty, &path)
    }

    fn param_fields(&mut self, params: &[(&str, TypeId)]) -> (Vec<Field>, Vec<ObjectId>) {
        let path = self.package.path.clone();
        let mut fields = Vec::new();
        let mut objects = Vec::new();
        for (name, ty) in params {
            let ident = self.new_ident(name);
            if !ident.is_blank() {
                let object = self.corpus.object(name, ObjectKind::Param, *ty, &path);
                self.package.info.defs.insert(ident.id, object);
                objects.push(object);
            }
            let ty = self.type_expr(*ty);
            fields.push(Field {
                names: vec![ident],
                ty,
            });
        }
        (fields, objects)
    }

    fn result_fields(&mut self, results: &[TypeId]) -> Vec<Field> {
        results
            .iter()
            .map(|ty| Field {
                names: Vec::new(),
                ty: self.type_expr(*ty),
            })
            .collect()
    }

    fn func_decl<F>(
        &mut self,
        recv: Option<(TypeId, bool)>,
        name: &str,
        params: &[(&str, TypeId)],
        results: &[TypeId],
        body: Option<F>,
    ) -> ObjectId
    where
        F: FnOnce(&mut Self, &[ObjectId]) -> Vec<Stmt>,
    {
        self.line += 1;
        self.column = 1;
        let pos = Pos::new(self.line, 1);

        let param_types = params.iter().map(|(_, ty)| *ty).collect();
        let sig = self.types().signature(param_types, results.to_vec(), false);

        let recv = recv.map(|(ty, pointer)| {
            self.types().add_method(ty, name, sig, pointer);
            let recv_ty = if pointer { self.types().pointer(ty) } else { ty };
            let (mut fields, _) = self.param_fields(&[("recv", recv_ty)]);
            fields.remove(0)
        });

        let name_ident = self.new_ident(name);
        let path = self.package.path.clone();
        let object = if recv.is_some() {
            self.corpus.object(name, ObjectKind::Func, sig, &path)
        } else {
            self.declare(name, ObjectKind::Func, sig)
        };
        self.package.info.defs.insert(name_ident.id, object);

        let (param_fields, param_objects) = self.param_fields(params);
        let results = self.result_fields(results);
        let body = body.map(|build| Block::new(build(self, &param_objects)));

        self.add_decl(Decl::Func(FuncDecl {
            pos,
            recv,
            name: name_ident,
            ty: FuncType {
                params: param_fields,
                results,
            },
            body,
        }));
        object
    }

    /// A function with a body; `body` receives the parameter objects
    pub fn func<F>(
        &mut self,
        name: &str,
        params: &[(&str, TypeId)],
        results: &[TypeId],
        body: F,
    ) -> ObjectId
    where
        F: FnOnce(&mut Self, &[ObjectId]) -> Vec<Stmt>,
    {
        self.func_decl(None, name, params, results, Some(body))
    }

    /// A method of `recv`, with a pointer receiver when `pointer` is set
    pub fn method<F>(
        &mut self,
        recv: TypeId,
        pointer: bool,
        name: &str,
        params: &[(&str, TypeId)],
        results: &[TypeId],
        body: F,
    ) -> ObjectId
    where
        F: FnOnce(&mut Self, &[ObjectId]) -> Vec<Stmt>,
    {
        self.func_decl(Some((recv, pointer)), name, params, results, Some(body))
    }

    /// A function declared without a body
    pub fn extern_func(
        &mut self,
        name: &str,
        params: &[(&str, TypeId)],
        results: &[TypeId],
    ) -> ObjectId {
        self.func_decl::<fn(&mut Self, &[ObjectId]) -> Vec<Stmt>>(None, name, params, results, None)
    }

    // Expressions

    /// Reference to an object
    pub fn ident(&mut self, object: ObjectId) -> Expr {
        let ty = self.object_of(object).ty;
        let kind = self.object_of(object).kind;
        let expr = self.ident_untyped(object);
        if kind != ObjectKind::PkgName {
            self.record(expr.id, ty);
        }
        expr
    }

    /// Reference to an object whose use has its own type, like a builtin
    pub fn ident_typed(&mut self, object: ObjectId, ty: TypeId) -> Expr {
        let expr = self.ident_untyped(object);
        self.record(expr.id, ty);
        expr
    }

    fn ident_untyped(&mut self, object: ObjectId) -> Expr {
        let name = self.object_of(object).name.clone();
        let ident = self.new_ident(&name);
        self.package.info.uses.insert(ident.id, object);
        Expr::new(ident.id, ident.pos, ExprKind::Ident(ident))
    }

    /// Defining occurrence of a local, as on the left of `:=`
    pub fn def(&mut self, object: ObjectId) -> Expr {
        let ty = self.object_of(object).ty;
        let name = self.object_of(object).name.clone();
        let ident = self.new_ident(&name);
        self.package.info.defs.insert(ident.id, object);
        self.record(ident.id, ty);
        Expr::new(ident.id, ident.pos, ExprKind::Ident(ident))
    }

    /// An identifier the oracle knows nothing about, like a field name
    /// used as a struct literal key
    pub fn name(&mut self, name: &str) -> Expr {
        let ident = self.new_ident(name);
        Expr::new(ident.id, ident.pos, ExprKind::Ident(ident))
    }

    /// The blank identifier as an assignment target
    pub fn blank(&mut self) -> Expr {
        let ident = self.new_ident("_");
        Expr::new(ident.id, ident.pos, ExprKind::Ident(ident))
    }

    pub fn nil(&mut self) -> Expr {
        let nil = self.corpus.nil_object();
        self.ident(nil)
    }

    pub fn lit(&mut self, value: &str, ty: TypeId) -> Expr {
        let (id, pos) = self.node();
        self.record(id, ty);
        Expr::new(
            id,
            pos,
            ExprKind::BasicLit {
                value: value.to_string(),
            },
        )
    }

    pub fn int_lit(&mut self, value: i64) -> Expr {
        let ty = self.types().basic(BasicKind::UntypedInt);
        self.lit(&value.to_string(), ty)
    }

    pub fn type_expr(&mut self, ty: TypeId) -> Expr {
        let (id, pos) = self.node();
        let repr = self.corpus.corpus.types.display(ty).to_string();
        self.record(id, ty);
        Expr::new(id, pos, ExprKind::TypeExpr { repr })
    }

    pub fn paren(&mut self, x: Expr) -> Expr {
        let ty = self.type_of(&x);
        let (id, pos) = self.node();
        if let Some(ty) = ty {
            self.record(id, ty);
        }
        Expr::new(id, pos, ExprKind::Paren(Box::new(x)))
    }

    /// `pkg.Member` for an object declared in another package
    pub fn qualified(&mut self, member: ObjectId) -> Expr {
        let path = self.object_of(member).package.clone();
        let pkg = self.corpus.package_name(&path);
        let x = self.ident(pkg);
        let sel_ty = self.object_of(member).ty;
        let name = self.object_of(member).name.clone();
        let sel = self.new_ident(&name);
        self.package.info.uses.insert(sel.id, member);
        let (id, pos) = self.node();
        self.record(id, sel_ty);
        Expr::new(
            id,
            pos,
            ExprKind::Selector {
                x: Box::new(x),
                sel,
            },
        )
    }

    /// `x.name`, resolved to a method or a struct field
    pub fn select(&mut self, x: Expr, name: &str) -> Expr {
        let x_ty = self.expect_type(&x);
        let (kind, ty) = match self.resolve_selector(x_ty, name) {
            Some(found) => found,
            None => panic!(
                "no field or method {name} on {}",
                self.corpus.corpus.types.display(x_ty)
            ),
        };
        let sel = self.new_ident(name);
        let (id, pos) = self.node();
        self.record(id, ty);
        self.package.info.selections.insert(id, kind);
        Expr::new(
            id,
            pos,
            ExprKind::Selector {
                x: Box::new(x),
                sel,
            },
        )
    }

    fn resolve_selector(&self, ty: TypeId, name: &str) -> Option<(SelectionKind, TypeId)> {
        let types = &self.corpus.corpus.types;
        let base = match types.get(ty)? {
            Type::Pointer(elem) => *elem,
            _ => ty,
        };
        if let Some(Type::Named(named)) = types.get(base) {
            if let Some(method) = named.methods.iter().find(|m| m.name == name) {
                return Some((SelectionKind::MethodVal, method.sig));
            }
        }
        match types.underlying_type(base)? {
            Type::Interface(iface) => iface
                .method(name)
                .map(|m| (SelectionKind::MethodVal, m.sig)),
            Type::Struct(st) => st.field(name).map(|f| (SelectionKind::FieldVal, f.ty)),
            _ => None,
        }
    }

    pub fn call(&mut self, fun: Expr, args: Vec<Expr>) -> Expr {
        self.make_call(fun, args, false)
    }

    /// `fun(args...)` with the final argument spread
    pub fn call_spread(&mut self, fun: Expr, args: Vec<Expr>) -> Expr {
        self.make_call(fun, args, true)
    }

    fn make_call(&mut self, fun: Expr, args: Vec<Expr>, spread: bool) -> Expr {
        let fun_ty = self.type_of(&fun);
        let results = fun_ty.and_then(|ty| match self.corpus.corpus.types.underlying_type(ty) {
            Some(Type::Signature(sig)) => Some(sig.results.clone()),
            _ => None,
        });
        let ty = match (results, fun_ty) {
            (Some(results), _) if results.len() == 1 => Some(results[0]),
            (Some(results), _) => Some(self.types().tuple(results)),
            // conversion
            (None, ty) => ty,
        };
        let (id, pos) = self.node();
        if let Some(ty) = ty {
            self.record(id, ty);
        }
        Expr::new(
            id,
            pos,
            ExprKind::Call {
                fun: Box::new(fun),
                args,
                spread,
            },
        )
    }

    pub fn binary(&mut self, op: BinaryOp, x: Expr, y: Expr) -> Expr {
        let ty = if op.yields_bool() {
            self.types().basic(BasicKind::Bool)
        } else {
            self.expect_type(&x)
        };
        let (id, pos) = self.node();
        self.record(id, ty);
        Expr::new(
            id,
            pos,
            ExprKind::Binary {
                op,
                x: Box::new(x),
                y: Box::new(y),
            },
        )
    }

    pub fn unary(&mut self, op: UnaryOp, x: Expr) -> Expr {
        let x_ty = self.expect_type(&x);
        let ty = match op {
            UnaryOp::Addr => self.types().pointer(x_ty),
            UnaryOp::Recv => match self.corpus.corpus.types.underlying_type(x_ty) {
                Some(Type::Chan(chan)) => chan.elem,
                _ => panic!("receive from non-channel {}", self.corpus.corpus.types.display(x_ty)),
            },
            _ => x_ty,
        };
        let (id, pos) = self.node();
        self.record(id, ty);
        Expr::new(id, pos, ExprKind::Unary { op, x: Box::new(x) })
    }

    /// Pointer indirection `*x`
    pub fn star(&mut self, x: Expr) -> Expr {
        let x_ty = self.expect_type(&x);
        let ty = match self.corpus.corpus.types.get(x_ty) {
            Some(Type::Pointer(elem)) => *elem,
            _ => panic!("indirection of non-pointer {}", self.corpus.corpus.types.display(x_ty)),
        };
        let (id, pos) = self.node();
        self.record(id, ty);
        Expr::new(id, pos, ExprKind::Star(Box::new(x)))
    }

    pub fn index(&mut self, x: Expr, index: Expr) -> Expr {
        let x_ty = self.expect_type(&x);
        let ty = match self.corpus.corpus.types.underlying_type(x_ty) {
            Some(Type::Map(map)) => map.value,
            Some(Type::Slice(elem)) => *elem,
            Some(Type::Array(array)) => array.elem,
            _ => panic!("cannot index {}", self.corpus.corpus.types.display(x_ty)),
        };
        let (id, pos) = self.node();
        self.record(id, ty);
        Expr::new(
            id,
            pos,
            ExprKind::Index {
                x: Box::new(x),
                index: Box::new(index),
            },
        )
    }

    /// `x[low:high]`
    pub fn slice(&mut self, x: Expr, low: Option<Expr>, high: Option<Expr>) -> Expr {
        let ty = self.expect_type(&x);
        let (id, pos) = self.node();
        self.record(id, ty);
        Expr::new(
            id,
            pos,
            ExprKind::Slice {
                x: Box::new(x),
                low: low.map(Box::new),
                high: high.map(Box::new),
                max: None,
            },
        )
    }

    pub fn composite(&mut self, ty: TypeId, elts: Vec<Element>) -> Expr {
        let ty_expr = self.type_expr(ty);
        let (id, pos) = self.node();
        self.record(id, ty);
        Expr::new(
            id,
            pos,
            ExprKind::CompositeLit {
                ty: Some(Box::new(ty_expr)),
                elts,
            },
        )
    }

    /// `func() results { body }`
    pub fn func_lit(&mut self, results: &[TypeId], body: Vec<Stmt>) -> Expr {
        let sig = self.types().signature(Vec::new(), results.to_vec(), false);
        let results = self.result_fields(results);
        let (id, pos) = self.node();
        self.record(id, sig);
        Expr::new(
            id,
            pos,
            ExprKind::FuncLit(FuncLit {
                ty: FuncType {
                    params: Vec::new(),
                    results,
                },
                body: Block::new(body),
            }),
        )
    }

    /// `x.(T)`, or the type switch guard `x.(type)` when `ty` is `None`
    pub fn type_assert(&mut self, x: Expr, ty: Option<TypeId>) -> Expr {
        let ty_expr = ty.map(|ty| Box::new(self.type_expr(ty)));
        let (id, pos) = self.node();
        if let Some(ty) = ty {
            self.record(id, ty);
        }
        Expr::new(id, pos, ExprKind::TypeAssert { x: Box::new(x), ty: ty_expr })
    }

    // Statements needing identifiers

    /// `var name T = value`, `var name T` or `var name = value`
    pub fn var_decl(&mut self, object: ObjectId, ty: Option<TypeId>, value: Option<Expr>) -> Stmt {
        let object_name = self.object_of(object).name.clone();
        let name = self.new_ident(&object_name);
        self.package.info.defs.insert(name.id, object);
        let ty = ty.map(|ty| self.type_expr(ty));
        Stmt::at(
            name.pos,
            StmtKind::Decl(GenDecl::Var(vec![ValueSpec {
                names: vec![name],
                ty,
                values: value.into_iter().collect(),
            }])),
        )
    }

    pub fn labeled(&mut self, label: &str, stmt: Stmt) -> Stmt {
        let label = self.new_ident(label);
        Stmt::at(
            label.pos,
            StmtKind::Labeled {
                label,
                stmt: Box::new(stmt),
            },
        )
    }

    pub fn goto(&mut self, label: &str) -> Stmt {
        let label = self.new_ident(label);
        Stmt::at(
            label.pos,
            StmtKind::Branch {
                tok: crate::core::ast::BranchTok::Goto,
                label: Some(label),
            },
        )
    }
}

/// Plain constructors for statements and literal elements
pub mod stmt {
    use crate::core::ast::{
        AssignTok, BinaryOp, Block, CaseClause, CommClause, Element, Expr, Pos, Stmt, StmtKind,
        SwitchStmt, TypeCaseClause, TypeSwitchStmt,
    };

    fn first_pos(exprs: &[Expr]) -> Pos {
        exprs.first().map(|e| e.pos).unwrap_or_default()
    }

    pub fn expr(x: Expr) -> Stmt {
        Stmt::at(x.pos, StmtKind::Expr(x))
    }

    /// `lhs = rhs`
    pub fn assign(lhs: Vec<Expr>, rhs: Vec<Expr>) -> Stmt {
        let pos = first_pos(&lhs);
        Stmt::at(
            pos,
            StmtKind::Assign {
                lhs,
                tok: AssignTok::Assign,
                rhs,
            },
        )
    }

    /// `lhs := rhs`
    pub fn define(lhs: Vec<Expr>, rhs: Vec<Expr>) -> Stmt {
        let pos = first_pos(&lhs);
        Stmt::at(
            pos,
            StmtKind::Assign {
                lhs,
                tok: AssignTok::Define,
                rhs,
            },
        )
    }

    /// `lhs op= rhs`
    pub fn op_assign(op: BinaryOp, lhs: Expr, rhs: Expr) -> Stmt {
        Stmt::at(
            lhs.pos,
            StmtKind::Assign {
                lhs: vec![lhs],
                tok: AssignTok::Op(op),
                rhs: vec![rhs],
            },
        )
    }

    pub fn inc(x: Expr) -> Stmt {
        Stmt::at(x.pos, StmtKind::IncDec { x, inc: true })
    }

    pub fn ret(results: Vec<Expr>) -> Stmt {
        let pos = first_pos(&results);
        Stmt::at(pos, StmtKind::Return(results))
    }

    pub fn block(stmts: Vec<Stmt>) -> Stmt {
        Stmt::new(StmtKind::Block(Block::new(stmts)))
    }

    pub fn if_then(cond: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::at(
            cond.pos,
            StmtKind::If {
                init: None,
                cond,
                body: Block::new(body),
                els: None,
            },
        )
    }

    /// `if init; cond { body }`
    pub fn if_init(init: Stmt, cond: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::at(
            init.pos,
            StmtKind::If {
                init: Some(Box::new(init)),
                cond,
                body: Block::new(body),
                els: None,
            },
        )
    }

    pub fn defer(call: Expr) -> Stmt {
        Stmt::at(call.pos, StmtKind::Defer(call))
    }

    pub fn go(call: Expr) -> Stmt {
        Stmt::at(call.pos, StmtKind::Go(call))
    }

    pub fn send(chan: Expr, value: Expr) -> Stmt {
        Stmt::at(chan.pos, StmtKind::Send { chan, value })
    }

    /// `for { body }`
    pub fn forever(body: Vec<Stmt>) -> Stmt {
        Stmt::new(StmtKind::For {
            init: None,
            cond: None,
            post: None,
            body: Block::new(body),
        })
    }

    /// `for key, value := range x { body }`
    pub fn range(key: Option<Expr>, value: Option<Expr>, x: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::at(
            x.pos,
            StmtKind::Range {
                key,
                value,
                define: true,
                x,
                body: Block::new(body),
            },
        )
    }

    pub fn switch(tag: Option<Expr>, clauses: Vec<CaseClause>) -> Stmt {
        let pos = tag.as_ref().map(|e| e.pos).unwrap_or_default();
        Stmt::at(
            pos,
            StmtKind::Switch(SwitchStmt {
                init: None,
                tag,
                clauses,
            }),
        )
    }

    /// `case list...: body`, or `default:` for an empty list
    pub fn case(list: Vec<Expr>, body: Vec<Stmt>) -> CaseClause {
        CaseClause {
            pos: first_pos(&list),
            list,
            body,
        }
    }

    pub fn type_switch(assign: Stmt, clauses: Vec<TypeCaseClause>) -> Stmt {
        Stmt::at(
            assign.pos,
            StmtKind::TypeSwitch(TypeSwitchStmt {
                init: None,
                assign: Box::new(assign),
                clauses,
            }),
        )
    }

    pub fn type_case(types: Vec<Expr>, body: Vec<Stmt>) -> TypeCaseClause {
        TypeCaseClause { types, body }
    }

    pub fn select(clauses: Vec<CommClause>) -> Stmt {
        Stmt::new(StmtKind::Select(clauses))
    }

    pub fn comm(comm: Option<Stmt>, body: Vec<Stmt>) -> CommClause {
        CommClause {
            comm: comm.map(Box::new),
            body,
        }
    }

    pub fn empty() -> Stmt {
        Stmt::at(Pos::default(), StmtKind::Empty)
    }

    pub fn elem(value: Expr) -> Element {
        Element::Value(value)
    }

    pub fn kv(key: Expr, value: Expr) -> Element {
        Element::KeyValue { key, value }
    }
}
