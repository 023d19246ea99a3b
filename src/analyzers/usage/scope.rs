//! Lexical context of the usage walk.
//!
//! A [`Scope`] is a small copyable value handed down the recursion. Entering
//! a function literal or a switch statement produces a new scope for the
//! nested walk; the caller's scope is untouched, so nothing has to be
//! restored on the way out.

use crate::core::ast::{Expr, FuncDecl, SwitchStmt};

/// Function whose `return` statements are being interpreted
#[derive(Debug, Clone, Copy)]
pub enum EnclosingFunc<'a> {
    Decl(&'a FuncDecl),
    /// The function literal expression
    Lit(&'a Expr),
}

#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub func: EnclosingFunc<'a>,
    /// Innermost value switch, for interpreting case labels
    pub switch: Option<&'a SwitchStmt>,
    /// Nesting depth, only used for tracing
    pub depth: usize,
}

impl<'a> Scope<'a> {
    pub fn root(func: &'a FuncDecl) -> Self {
        Self {
            func: EnclosingFunc::Decl(func),
            switch: None,
            depth: 0,
        }
    }

    /// One level deeper
    pub fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    pub fn in_func_lit(self, lit: &'a Expr) -> Self {
        Self {
            func: EnclosingFunc::Lit(lit),
            ..self.nested()
        }
    }

    pub fn in_switch(self, stmt: &'a SwitchStmt) -> Self {
        Self {
            switch: Some(stmt),
            ..self.nested()
        }
    }
}
