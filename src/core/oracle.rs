//! Type oracle: static types and bindings for syntax nodes
//!
//! The oracle is the analysis' only source of semantic information. It is
//! answered by the front end that parsed and type-checked the program; the
//! [`PackageOracle`] implementation reads the per-package tables a front end
//! serializes alongside the syntax tree.

use crate::core::ast::{Expr, Ident, NodeId};
use crate::core::types::{TypeId, TypeTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of an [`Object`] in a corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Var,
    Param,
    Const,
    Func,
    TypeName,
    PkgName,
    Builtin,
    Nil,
    Label,
}

/// A declared entity an identifier can bind to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    pub kind: ObjectKind,
    pub ty: TypeId,
    /// Import path of the declaring package
    #[serde(default)]
    pub package: String,
}

impl Object {
    /// Exported names start with an upper-case letter
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

/// How a selector expression `x.f` resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// `x.f` is a method bound to `x`
    MethodVal,
    /// `x.f` is a struct field
    FieldVal,
    /// `T.f` is a method expression
    MethodExpr,
}

/// Semantic facts recorded for one package, keyed by node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypesInfo {
    /// Static type of each expression
    #[serde(default)]
    pub types: HashMap<NodeId, TypeId>,
    /// Object declared by each defining identifier
    #[serde(default)]
    pub defs: HashMap<NodeId, ObjectId>,
    /// Object referenced by each using identifier
    #[serde(default)]
    pub uses: HashMap<NodeId, ObjectId>,
    /// Resolution of each selector expression
    #[serde(default)]
    pub selections: HashMap<NodeId, SelectionKind>,
}

/// Static semantic queries the usage analysis depends on
pub trait TypeOracle {
    /// Table every [`TypeId`] answered by this oracle refers into
    fn types(&self) -> &TypeTable;

    fn type_of(&self, expr: &Expr) -> Option<TypeId>;

    /// Object declared by a defining identifier
    fn def_of(&self, ident: &Ident) -> Option<ObjectId>;

    /// Object an identifier refers to
    fn use_of(&self, ident: &Ident) -> Option<ObjectId>;

    fn object(&self, id: ObjectId) -> Option<&Object>;

    /// How a selector expression resolved, when known
    fn selection(&self, _expr: &Expr) -> Option<SelectionKind> {
        None
    }
}

/// Oracle over one package's [`TypesInfo`] and the corpus-wide tables
#[derive(Debug, Clone, Copy)]
pub struct PackageOracle<'a> {
    types: &'a TypeTable,
    objects: &'a [Object],
    info: &'a TypesInfo,
}

impl<'a> PackageOracle<'a> {
    pub fn new(types: &'a TypeTable, objects: &'a [Object], info: &'a TypesInfo) -> Self {
        Self {
            types,
            objects,
            info,
        }
    }
}

impl TypeOracle for PackageOracle<'_> {
    fn types(&self) -> &TypeTable {
        self.types
    }

    fn type_of(&self, expr: &Expr) -> Option<TypeId> {
        self.info.types.get(&expr.id).copied()
    }

    fn def_of(&self, ident: &Ident) -> Option<ObjectId> {
        self.info.defs.get(&ident.id).copied()
    }

    fn use_of(&self, ident: &Ident) -> Option<ObjectId> {
        self.info.uses.get(&ident.id).copied()
    }

    fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0 as usize)
    }

    fn selection(&self, expr: &Expr) -> Option<SelectionKind> {
        self.info.selections.get(&expr.id).copied()
    }
}
