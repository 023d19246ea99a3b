//! Parameter usage analysis.
//!
//! For one parameter of one function, walk the whole body and decide whether
//! every reference to the parameter is interface-compatible: a method call,
//! a comparison with an interface value, or a hand-off into an
//! interface-typed slot (assignment target, declared result, call argument,
//! channel element, composite literal slot, map key). Each hand-off forces
//! the parameter to satisfy the receiving interface, so that interface's
//! methods are added to the required set. Anything else disqualifies.
//!
//! The walk reports internal inconsistencies when the type oracle cannot
//! answer a query the syntax requires. Those are errors, never a reason to
//! call the parameter ineligible.

mod expr;
mod scope;
mod stmt;

pub use scope::{EnclosingFunc, Scope};

use crate::core::ast::{Expr, FuncDecl, Ident, Pos, Stmt};
use crate::core::errors::{Error, Result};
use crate::core::method_map::MethodMap;
use crate::core::oracle::{ObjectId, TypeOracle};
use crate::core::shape;
use crate::core::types::TypeId;
use tracing::trace;

/// Outcome of analyzing one parameter
#[derive(Debug, Clone)]
pub enum Eligibility {
    /// The parameter has to keep its declared type
    Ineligible,
    /// The parameter could be declared as any interface with these methods
    Eligible(MethodMap),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible(_))
    }

    pub fn methods(&self) -> Option<&MethodMap> {
        match self {
            Eligibility::Eligible(methods) => Some(methods),
            Eligibility::Ineligible => None,
        }
    }
}

/// Analyze how `func` uses its parameter `param`.
///
/// A parameter already declared with an interface type is only eligible
/// when its uses need strictly fewer methods than the interface declares.
pub fn analyze_param<O>(param: &Ident, func: &FuncDecl, oracle: &O) -> Result<Eligibility>
where
    O: TypeOracle + ?Sized,
{
    let object_id = oracle.def_of(param).ok_or_else(|| {
        Error::inconsistency(format!("no definition for parameter {}", param.name), param.pos)
    })?;
    let object = oracle.object(object_id).ok_or_else(|| {
        Error::inconsistency(format!("unknown object for parameter {}", param.name), param.pos)
    })?;
    let Some(body) = &func.body else {
        return Ok(Eligibility::Ineligible);
    };

    trace!(func = %func.name.name, param = %param.name, "analyzing parameter");

    let declared = shape::interface(oracle.types(), object.ty).map(|iface| iface.methods.len());
    let mut analyzer = UsageAnalyzer::new(oracle, object_id, object.ty);
    if !analyzer.stmts(&body.stmts, Scope::root(func))? {
        return Ok(Eligibility::Ineligible);
    }

    let methods = analyzer.into_methods();
    match declared {
        Some(count) if methods.len() >= count => Ok(Eligibility::Ineligible),
        _ => Ok(Eligibility::Eligible(methods)),
    }
}

/// Walk state for one parameter; never shared between analyses
struct UsageAnalyzer<'o, O: ?Sized> {
    oracle: &'o O,
    param: ObjectId,
    param_ty: TypeId,
    methods: MethodMap,
}

impl<'o, O: TypeOracle + ?Sized> UsageAnalyzer<'o, O> {
    fn new(oracle: &'o O, param: ObjectId, param_ty: TypeId) -> Self {
        Self {
            oracle,
            param,
            param_ty,
            methods: MethodMap::new(),
        }
    }

    fn into_methods(self) -> MethodMap {
        self.methods
    }

    /// Does `expr` denote the parameter, possibly parenthesized?
    fn is_param(&self, expr: &Expr) -> bool {
        expr.as_ident().is_some_and(|ident| self.is_param_ident(ident))
    }

    fn is_param_ident(&self, ident: &Ident) -> bool {
        self.oracle.use_of(ident) == Some(self.param)
    }

    fn type_of(&self, expr: &Expr, what: &str) -> Result<TypeId> {
        self.oracle
            .type_of(expr)
            .ok_or_else(|| Error::inconsistency(format!("no type info for {what}"), expr.pos))
    }

    /// Require the interface `ty` of the parameter, or report that `ty` is
    /// not an interface at all.
    fn record_interface(&mut self, ty: TypeId) -> bool {
        let oracle = self.oracle;
        match shape::interface(oracle.types(), ty) {
            Some(iface) => {
                self.methods.add_interface(iface);
                true
            }
            None => false,
        }
    }

    fn stmts<'a>(&mut self, stmts: &'a [Stmt], scope: Scope<'a>) -> Result<bool> {
        for stmt in stmts {
            if !self.stmt(stmt, scope)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn opt_stmt<'a>(&mut self, stmt: Option<&'a Stmt>, scope: Scope<'a>) -> Result<bool> {
        match stmt {
            Some(stmt) => self.stmt(stmt, scope),
            None => Ok(true),
        }
    }

    fn exprs<'a>(&mut self, exprs: &'a [Expr], scope: Scope<'a>) -> Result<bool> {
        for expr in exprs {
            if !self.expr(expr, scope)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn opt_expr<'a>(&mut self, expr: Option<&'a Expr>, scope: Scope<'a>) -> Result<bool> {
        match expr {
            Some(expr) => self.expr(expr, scope),
            None => Ok(true),
        }
    }

    fn disqualified(&self, scope: Scope<'_>, kind: &str, pos: Pos) {
        trace!(depth = scope.depth, kind, %pos, "parameter use is not interface-compatible");
    }
}
