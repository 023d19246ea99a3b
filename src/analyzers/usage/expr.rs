use super::{Scope, UsageAnalyzer};
use crate::core::ast::{BinaryOp, Element, Expr, ExprKind, Ident, Pos};
use crate::core::errors::{Error, Result};
use crate::core::oracle::{ObjectKind, SelectionKind, TypeOracle};
use crate::core::shape::{self, CompositeShape};
use crate::core::types::{Type, TypeId};
use tracing::trace;

impl<'o, O: TypeOracle + ?Sized> UsageAnalyzer<'o, O> {
    /// Walk an expression in a position where the parameter itself may not
    /// appear; positions that accept it are handled by the enclosing form.
    pub(super) fn expr<'a>(&mut self, expr: &'a Expr, scope: Scope<'a>) -> Result<bool> {
        let scope = scope.nested();
        trace!(depth = scope.depth, kind = expr.kind.name(), pos = %expr.pos, "expr");

        let ok = match &expr.kind {
            ExprKind::Ident(ident) => !self.is_param_ident(ident),
            ExprKind::BasicLit { .. } | ExprKind::TypeExpr { .. } => true,
            ExprKind::Binary { op, x, y } => self.binary(*op, x, y, scope)?,
            ExprKind::Unary { x, .. } | ExprKind::Star(x) | ExprKind::Paren(x) => {
                self.expr(x, scope)?
            }
            ExprKind::Call { fun, args, spread } => self.call(expr, fun, args, *spread, scope)?,
            ExprKind::CompositeLit { elts, .. } => self.composite_lit(expr, elts, scope)?,
            ExprKind::FuncLit(lit) => self.stmts(&lit.body.stmts, scope.in_func_lit(expr))?,
            ExprKind::Index { x, index } => self.index(x, index, scope)?,
            ExprKind::IndexList { x, indices } => {
                self.expr(x, scope)? && self.exprs(indices, scope)?
            }
            ExprKind::Selector { x, sel } => self.selector(expr, x, sel, scope)?,
            ExprKind::Slice { x, low, high, max } => {
                self.expr(x, scope)?
                    && self.opt_expr(low.as_deref(), scope)?
                    && self.opt_expr(high.as_deref(), scope)?
                    && self.opt_expr(max.as_deref(), scope)?
            }
            // The asserted type never mentions the parameter
            ExprKind::TypeAssert { x, .. } => self.expr(x, scope)?,
            ExprKind::Ellipsis(elt) => self.opt_expr(elt.as_deref(), scope)?,
        };

        if !ok {
            self.disqualified(scope, expr.kind.name(), expr.pos);
        }
        Ok(ok)
    }

    /// Only `==` and `!=` accept the parameter, and then the other operand
    /// must be an interface value the parameter can be compared with.
    fn binary<'a>(
        &mut self,
        op: BinaryOp,
        x: &'a Expr,
        y: &'a Expr,
        scope: Scope<'a>,
    ) -> Result<bool> {
        let other = match (self.is_param(x), self.is_param(y)) {
            (false, false) => return Ok(self.expr(x, scope)? && self.expr(y, scope)?),
            _ if !op.is_equality() => return Ok(false),
            (true, true) => return Ok(true),
            (true, false) => y,
            (false, true) => x,
        };
        let ty = self.type_of(other, "comparison operand")?;
        if !self.record_interface(ty) {
            return Ok(false);
        }
        self.expr(other, scope)
    }

    fn call<'a>(
        &mut self,
        call: &'a Expr,
        fun: &'a Expr,
        args: &'a [Expr],
        spread: bool,
        scope: Scope<'a>,
    ) -> Result<bool> {
        if !self.expr(fun, scope)? {
            return Ok(false);
        }
        for (i, arg) in args.iter().enumerate() {
            if !self.is_param(arg) {
                if !self.expr(arg, scope)? {
                    return Ok(false);
                }
                continue;
            }
            // `f(param...)` needs a slice
            if spread && i + 1 == args.len() {
                return Ok(false);
            }
            let Some(slot) = self.argument_slot(call, fun, args.len(), i)? else {
                return Ok(false);
            };
            if !self.record_interface(slot) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Declared type receiving argument `i`, or `None` when the call is a
    /// type conversion.
    fn argument_slot(
        &self,
        call: &Expr,
        fun: &Expr,
        nargs: usize,
        i: usize,
    ) -> Result<Option<TypeId>> {
        if self.is_type_name(fun) {
            return Ok(None);
        }
        let oracle = self.oracle;
        let types = oracle.types();
        let fun_ty = self.type_of(fun, "function in call expression")?;
        let Some(sig) = shape::signature(types, fun_ty) else {
            if nargs == 1 {
                return Ok(None);
            }
            return Err(Error::inconsistency(
                format!(
                    "got {}, want a signature for the function in call expression",
                    types.display(fun_ty)
                ),
                call.pos,
            ));
        };

        if sig.variadic && i + 1 >= sig.params.len() {
            let last = sig.params.last().copied().ok_or_else(|| {
                Error::inconsistency("variadic function without parameters", call.pos)
            })?;
            return match types.underlying_type(last) {
                Some(Type::Slice(elem)) => Ok(Some(*elem)),
                _ => Err(Error::inconsistency(
                    format!(
                        "got {}, want slice for final parameter of variadic function",
                        types.display(last)
                    ),
                    call.pos,
                )),
            };
        }
        match sig.params.get(i) {
            Some(param) => Ok(Some(*param)),
            None => Err(Error::inconsistency(
                format!(
                    "cannot send {} argument(s) to {}-parameter function",
                    i + 1,
                    sig.params.len()
                ),
                call.pos,
            )),
        }
    }

    /// Whether a callee names a type, making the call a conversion
    fn is_type_name(&self, fun: &Expr) -> bool {
        let names_type = |ident: &Ident| {
            self.oracle
                .use_of(ident)
                .and_then(|id| self.oracle.object(id))
                .is_some_and(|object| object.kind == ObjectKind::TypeName)
        };
        match &fun.kind {
            ExprKind::TypeExpr { .. } => true,
            ExprKind::Ident(ident) => names_type(ident),
            ExprKind::Selector { sel, .. } => names_type(sel),
            ExprKind::Paren(inner) | ExprKind::Star(inner) => self.is_type_name(inner),
            _ => false,
        }
    }

    fn composite_lit<'a>(
        &mut self,
        lit: &'a Expr,
        elts: &'a [Element],
        scope: Scope<'a>,
    ) -> Result<bool> {
        for (i, elt) in elts.iter().enumerate() {
            match elt {
                Element::Value(value) => {
                    if self.is_param(value) {
                        let slot = self.positional_slot(lit, i, value.pos)?;
                        if !self.record_interface(slot) {
                            return Ok(false);
                        }
                    } else if !self.expr(value, scope)? {
                        return Ok(false);
                    }
                }
                Element::KeyValue { key, value } => {
                    if self.is_param(key) {
                        let key_ty = match self.composite_shape(lit)? {
                            CompositeShape::Map(map) => map.key,
                            _ => return Ok(false),
                        };
                        if !self.record_interface(key_ty) {
                            return Ok(false);
                        }
                    } else if !self.expr(key, scope)? {
                        return Ok(false);
                    }

                    if self.is_param(value) {
                        let slot = self.keyed_slot(lit, key)?;
                        if !self.record_interface(slot) {
                            return Ok(false);
                        }
                    } else if !self.expr(value, scope)? {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }

    fn composite_shape(&self, lit: &Expr) -> Result<CompositeShape<'o>> {
        let oracle = self.oracle;
        let types = oracle.types();
        let ty = self.type_of(lit, "composite literal")?;
        shape::composite(types, ty).ok_or_else(|| {
            Error::inconsistency(
                format!(
                    "got {}, want struct, map, slice or array for composite literal",
                    types.display(ty)
                ),
                lit.pos,
            )
        })
    }

    fn positional_slot(&self, lit: &Expr, i: usize, pos: Pos) -> Result<TypeId> {
        match self.composite_shape(lit)? {
            CompositeShape::Struct(st) => st.fields.get(i).map(|field| field.ty).ok_or_else(|| {
                Error::inconsistency(
                    format!("cannot assign field {} of {}-field struct", i, st.fields.len()),
                    pos,
                )
            }),
            CompositeShape::Slice(elem) => Ok(elem),
            CompositeShape::Array(array) => Ok(array.elem),
            CompositeShape::Map(_) => Err(Error::inconsistency(
                "positional element in map literal",
                pos,
            )),
        }
    }

    fn keyed_slot(&self, lit: &Expr, key: &Expr) -> Result<TypeId> {
        match self.composite_shape(lit)? {
            CompositeShape::Map(map) => Ok(map.value),
            CompositeShape::Struct(st) => {
                let name = key.as_ident().ok_or_else(|| {
                    Error::inconsistency("want a field name as key in struct literal", key.pos)
                })?;
                st.field(&name.name).map(|field| field.ty).ok_or_else(|| {
                    Error::inconsistency(
                        format!("assignment to unknown struct field {}", name.name),
                        key.pos,
                    )
                })
            }
            CompositeShape::Slice(elem) => Ok(elem),
            CompositeShape::Array(array) => Ok(array.elem),
        }
    }

    /// `x[param]` is only acceptable as a lookup in a map keyed by an
    /// interface.
    fn index<'a>(&mut self, x: &'a Expr, index: &'a Expr, scope: Scope<'a>) -> Result<bool> {
        if !self.expr(x, scope)? {
            return Ok(false);
        }
        if !self.is_param(index) {
            return self.expr(index, scope);
        }
        let oracle = self.oracle;
        let ty = self.type_of(x, "indexed expression")?;
        match shape::map(oracle.types(), ty) {
            Some(map) => Ok(self.record_interface(map.key)),
            None => Ok(false),
        }
    }

    /// `param.M` records `M` when it is a method value
    fn selector<'a>(
        &mut self,
        expr: &'a Expr,
        x: &'a Expr,
        sel: &'a Ident,
        scope: Scope<'a>,
    ) -> Result<bool> {
        if !self.is_param(x) {
            return self.expr(x, scope);
        }
        let oracle = self.oracle;
        if matches!(
            oracle.selection(expr),
            Some(SelectionKind::FieldVal | SelectionKind::MethodExpr)
        ) {
            return Ok(false);
        }
        let types = oracle.types();
        let Some(sig) = oracle
            .type_of(expr)
            .filter(|ty| shape::signature(types, *ty).is_some())
        else {
            return Ok(false);
        };
        if self.needs_address(&sel.name) {
            return Ok(false);
        }
        self.methods.insert(sel.name.clone(), sig);
        Ok(true)
    }

    /// Calling a pointer-receiver method on a parameter of the named type
    /// itself takes the parameter's address.
    fn needs_address(&self, method: &str) -> bool {
        match self.oracle.types().get(self.param_ty) {
            Some(Type::Named(named)) => named
                .methods
                .iter()
                .any(|m| m.name == method && m.pointer_receiver),
            _ => false,
        }
    }
}
