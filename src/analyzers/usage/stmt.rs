use super::{EnclosingFunc, Scope, UsageAnalyzer};
use crate::core::ast::{
    AssignTok, CaseClause, CommClause, Expr, GenDecl, Ident, Pos, Stmt, StmtKind, SwitchStmt,
    TypeSwitchStmt,
};
use crate::core::errors::{Error, Result};
use crate::core::oracle::TypeOracle;
use crate::core::shape;
use crate::core::types::SignatureType;
use tracing::trace;

impl<'o, O: TypeOracle + ?Sized> UsageAnalyzer<'o, O> {
    pub(super) fn stmt<'a>(&mut self, stmt: &'a Stmt, scope: Scope<'a>) -> Result<bool> {
        let scope = scope.nested();
        trace!(depth = scope.depth, kind = stmt.kind.name(), pos = %stmt.pos, "stmt");

        let ok = match &stmt.kind {
            StmtKind::Assign { lhs, tok, rhs } => self.assign(stmt.pos, lhs, *tok, rhs, scope)?,
            StmtKind::Block(block) => self.stmts(&block.stmts, scope)?,
            StmtKind::Branch { .. } | StmtKind::Empty => true,
            StmtKind::Decl(decl) => self.decl(decl, scope)?,
            StmtKind::Defer(call) | StmtKind::Go(call) => self.expr(call, scope)?,
            StmtKind::Expr(expr) => self.expr(expr, scope)?,
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => {
                self.opt_stmt(init.as_deref(), scope)?
                    && self.opt_expr(cond.as_ref(), scope)?
                    && self.opt_stmt(post.as_deref(), scope)?
                    && self.stmts(&body.stmts, scope)?
            }
            StmtKind::If {
                init,
                cond,
                body,
                els,
            } => {
                self.opt_stmt(init.as_deref(), scope)?
                    && self.expr(cond, scope)?
                    && self.stmts(&body.stmts, scope)?
                    && self.opt_stmt(els.as_deref(), scope)?
            }
            StmtKind::IncDec { x, .. } => self.expr(x, scope)?,
            StmtKind::Labeled { stmt, .. } => self.stmt(stmt, scope)?,
            StmtKind::Range {
                key, value, x, body, ..
            } => {
                self.range_target(key.as_ref(), scope)?
                    && self.range_target(value.as_ref(), scope)?
                    && self.expr(x, scope)?
                    && self.stmts(&body.stmts, scope)?
            }
            StmtKind::Return(results) => self.return_stmt(stmt.pos, results, scope)?,
            StmtKind::Select(clauses) => self.select(clauses, scope)?,
            StmtKind::Send { chan, value } => self.send(stmt.pos, chan, value, scope)?,
            StmtKind::Switch(switch) => self.switch(switch, scope)?,
            StmtKind::TypeSwitch(switch) => self.type_switch(switch, scope)?,
        };

        if !ok {
            self.disqualified(scope, stmt.kind.name(), stmt.pos);
        }
        Ok(ok)
    }

    /// `lhs = rhs`, `lhs := rhs` and `lhs op= rhs`.
    ///
    /// Storing into the parameter is fine; only how its value flows out
    /// matters. The value may flow into an interface-typed target, but not
    /// into a new variable whose type would be inferred from it.
    fn assign<'a>(
        &mut self,
        pos: Pos,
        lhs: &'a [Expr],
        tok: AssignTok,
        rhs: &'a [Expr],
        scope: Scope<'a>,
    ) -> Result<bool> {
        for target in lhs {
            if self.is_param(target) {
                if matches!(tok, AssignTok::Op(_)) {
                    return Ok(false);
                }
                continue;
            }
            if !self.expr(target, scope)? {
                return Ok(false);
            }
        }

        for (i, value) in rhs.iter().enumerate() {
            if !self.is_param(value) {
                if !self.expr(value, scope)? {
                    return Ok(false);
                }
                continue;
            }
            if tok != AssignTok::Assign {
                return Ok(false);
            }
            let target = lhs.get(i).ok_or_else(|| {
                Error::inconsistency(format!("no target for value {} of assignment", i + 1), pos)
            })?;
            if target.as_ident().is_some_and(Ident::is_blank) {
                continue;
            }
            let ty = self.type_of(target, "assignment target")?;
            if !self.record_interface(ty) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn decl<'a>(&mut self, decl: &'a GenDecl, scope: Scope<'a>) -> Result<bool> {
        let GenDecl::Var(specs) = decl else {
            return Ok(true);
        };
        for spec in specs {
            for value in &spec.values {
                if !self.is_param(value) {
                    if !self.expr(value, scope)? {
                        return Ok(false);
                    }
                    continue;
                }
                // `var y = param` gives y the concrete type
                let Some(ty_expr) = &spec.ty else {
                    return Ok(false);
                };
                let ty = self.type_of(ty_expr, "variable declaration type")?;
                if !self.record_interface(ty) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn range_target<'a>(&mut self, target: Option<&'a Expr>, scope: Scope<'a>) -> Result<bool> {
        match target {
            Some(target) if self.is_param(target) => Ok(true),
            other => self.opt_expr(other, scope),
        }
    }

    fn return_stmt<'a>(&mut self, pos: Pos, results: &'a [Expr], scope: Scope<'a>) -> Result<bool> {
        for (i, result) in results.iter().enumerate() {
            if !self.is_param(result) {
                if !self.expr(result, scope)? {
                    return Ok(false);
                }
                continue;
            }
            let sig = self.enclosing_signature(scope, pos)?;
            let result_ty = sig.results.get(i).copied().ok_or_else(|| {
                Error::inconsistency(
                    format!(
                        "cannot return {} value(s) from {}-value-returning function",
                        i + 1,
                        sig.results.len()
                    ),
                    pos,
                )
            })?;
            if !self.record_interface(result_ty) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn enclosing_signature(&self, scope: Scope<'_>, pos: Pos) -> Result<&'o SignatureType> {
        let oracle = self.oracle;
        let ty = match scope.func {
            EnclosingFunc::Decl(decl) => oracle
                .def_of(&decl.name)
                .and_then(|id| oracle.object(id))
                .map(|object| object.ty),
            EnclosingFunc::Lit(lit) => oracle.type_of(lit),
        }
        .ok_or_else(|| {
            Error::inconsistency("no type info for function containing return statement", pos)
        })?;

        let types = oracle.types();
        shape::signature(types, ty).ok_or_else(|| {
            Error::inconsistency(
                format!("got {}, want a signature for the enclosing function", types.display(ty)),
                pos,
            )
        })
    }

    fn select<'a>(&mut self, clauses: &'a [CommClause], scope: Scope<'a>) -> Result<bool> {
        for clause in clauses {
            if !self.opt_stmt(clause.comm.as_deref(), scope)? || !self.stmts(&clause.body, scope)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn send<'a>(
        &mut self,
        pos: Pos,
        chan: &'a Expr,
        value: &'a Expr,
        scope: Scope<'a>,
    ) -> Result<bool> {
        if !self.expr(chan, scope)? {
            return Ok(false);
        }
        if !self.is_param(value) {
            return self.expr(value, scope);
        }

        let oracle = self.oracle;
        let types = oracle.types();
        let ty = self.type_of(chan, "channel in send statement")?;
        let elem = shape::chan(types, ty).map(|chan| chan.elem).ok_or_else(|| {
            Error::inconsistency(
                format!("got {}, want channel in send statement", types.display(ty)),
                pos,
            )
        })?;
        Ok(self.record_interface(elem))
    }

    fn switch<'a>(&mut self, switch: &'a SwitchStmt, scope: Scope<'a>) -> Result<bool> {
        let scope = scope.in_switch(switch);
        if !self.opt_stmt(switch.init.as_deref(), scope)? {
            return Ok(false);
        }
        // Switching on the parameter compares it with each case label
        let tag_is_param = switch.tag.as_ref().is_some_and(|tag| self.is_param(tag));
        if !tag_is_param && !self.opt_expr(switch.tag.as_ref(), scope)? {
            return Ok(false);
        }
        for clause in &switch.clauses {
            if !self.case_clause(clause, scope)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn case_clause<'a>(&mut self, clause: &'a CaseClause, scope: Scope<'a>) -> Result<bool> {
        let switch = scope.switch.ok_or_else(|| {
            Error::inconsistency("case clause with no enclosing switch statement", clause.pos)
        })?;
        let tag_is_param = switch.tag.as_ref().is_some_and(|tag| self.is_param(tag));

        for label in &clause.list {
            if self.is_param(label) {
                if !self.case_label_matches(switch)? {
                    return Ok(false);
                }
                continue;
            }
            if tag_is_param {
                let ty = self.type_of(label, "case label")?;
                if !self.record_interface(ty) {
                    return Ok(false);
                }
            }
            if !self.expr(label, scope)? {
                return Ok(false);
            }
        }
        self.stmts(&clause.body, scope)
    }

    /// The parameter as a case label is compared with the tag, which needs a
    /// tag of a mutually assignable type; a tagless switch would need it to
    /// be a boolean.
    fn case_label_matches(&self, switch: &SwitchStmt) -> Result<bool> {
        let Some(tag) = &switch.tag else {
            return Ok(false);
        };
        let tag_ty = self.type_of(tag, "switch tag")?;
        let types = self.oracle.types();
        Ok(types.assignable(self.param_ty, tag_ty) || types.assignable(tag_ty, self.param_ty))
    }

    fn type_switch<'a>(&mut self, switch: &'a TypeSwitchStmt, scope: Scope<'a>) -> Result<bool> {
        if !self.opt_stmt(switch.init.as_deref(), scope)? || !self.stmt(&switch.assign, scope)? {
            return Ok(false);
        }
        for clause in &switch.clauses {
            if !self.exprs(&clause.types, scope)? || !self.stmts(&clause.body, scope)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
