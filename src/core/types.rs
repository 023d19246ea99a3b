//! Static type model for the analyzed program
//!
//! Types live in a single arena, [`TypeTable`], and are referred to by
//! [`TypeId`]. The table is produced by the front end together with the
//! syntax trees; the analysis only reads it, apart from the constructors
//! used by front ends and the test kit.

use crate::core::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;

/// Index of a type in a [`TypeTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Predeclared basic types, including the untyped constant kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    Invalid,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    /// Alias of `uint8`, kept distinct for display
    Byte,
    /// Alias of `int32`, kept distinct for display
    Rune,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Invalid => "invalid type",
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::Byte => "byte",
            BasicKind::Rune => "rune",
            BasicKind::UntypedBool => "untyped bool",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedRune => "untyped rune",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedString => "untyped string",
            BasicKind::UntypedNil => "untyped nil",
        }
    }

    /// Resolve the `byte` and `rune` aliases
    pub fn canonical(self) -> BasicKind {
        match self {
            BasicKind::Byte => BasicKind::Uint8,
            BasicKind::Rune => BasicKind::Int32,
            other => other,
        }
    }

    pub fn is_untyped(self) -> bool {
        matches!(
            self,
            BasicKind::UntypedBool
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
                | BasicKind::UntypedFloat
                | BasicKind::UntypedString
                | BasicKind::UntypedNil
        )
    }

    fn is_integer(self) -> bool {
        matches!(
            self.canonical(),
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
        )
    }

    fn is_float(self) -> bool {
        matches!(self, BasicKind::Float32 | BasicKind::Float64)
    }

    fn is_complex(self) -> bool {
        matches!(self, BasicKind::Complex64 | BasicKind::Complex128)
    }

    /// Whether an untyped constant of this kind converts implicitly to `target`
    fn untyped_fits(self, target: BasicKind) -> bool {
        let target = target.canonical();
        match self {
            BasicKind::UntypedBool => target == BasicKind::Bool,
            BasicKind::UntypedInt | BasicKind::UntypedRune => {
                target.is_integer() || target.is_float() || target.is_complex()
            }
            BasicKind::UntypedFloat => target.is_float() || target.is_complex(),
            BasicKind::UntypedString => target == BasicKind::String,
            _ => false,
        }
    }
}

/// Channel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A method of a named type or an interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// Signature without the receiver
    pub sig: TypeId,
    /// Declared with a pointer receiver; never set for interface methods
    #[serde(default)]
    pub pointer_receiver: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    #[serde(default)]
    pub embedded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedType {
    /// Import path of the declaring package; empty for predeclared types
    pub package: String,
    pub name: String,
    pub underlying: TypeId,
    /// Declared methods, including promoted ones when the front end flattens them
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl NamedType {
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayType {
    pub len: u64,
    pub elem: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapType {
    pub key: TypeId,
    pub value: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChanType {
    pub dir: ChanDir,
    pub elem: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureType {
    pub params: Vec<TypeId>,
    pub results: Vec<TypeId>,
    /// The final parameter is a slice collecting the variadic arguments
    #[serde(default)]
    pub variadic: bool,
}

/// Interface with its complete method set; embedded interfaces are expected
/// to be flattened by the front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceType {
    pub methods: Vec<Method>,
}

impl InterfaceType {
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructType {
    pub fields: Vec<Field>,
}

impl StructType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Basic(BasicKind),
    Named(NamedType),
    Pointer(TypeId),
    Slice(TypeId),
    Array(ArrayType),
    Map(MapType),
    Chan(ChanType),
    Signature(SignatureType),
    /// Result list of a multi-value call
    Tuple(Vec<TypeId>),
    Interface(InterfaceType),
    Struct(StructType),
}

impl Type {
    /// Type ids this type refers to directly
    pub fn references(&self) -> Vec<TypeId> {
        match self {
            Type::Basic(_) => Vec::new(),
            Type::Named(named) => iter::once(named.underlying)
                .chain(named.methods.iter().map(|m| m.sig))
                .collect(),
            Type::Pointer(elem) | Type::Slice(elem) => vec![*elem],
            Type::Array(array) => vec![array.elem],
            Type::Map(map) => vec![map.key, map.value],
            Type::Chan(chan) => vec![chan.elem],
            Type::Signature(sig) => sig.params.iter().chain(&sig.results).copied().collect(),
            Type::Tuple(elems) => elems.clone(),
            Type::Interface(iface) => iface.methods.iter().map(|m| m.sig).collect(),
            Type::Struct(st) => st.fields.iter().map(|f| f.ty).collect(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

/// Arena of every type referenced by a corpus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTable {
    types: Vec<Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.index())
    }

    pub fn contains(&self, id: TypeId) -> bool {
        id.index() < self.types.len()
    }

    pub fn add(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Check the table is well formed: every nested id resolves, every named
    /// type reaches a non-named underlying type, and every cycle passes
    /// through a named type. Identity, assignability and display stop at
    /// named types, so they terminate on any table that passes.
    pub fn validate(&self) -> Result<()> {
        for (index, ty) in self.types.iter().enumerate() {
            if let Some(missing) = ty.references().into_iter().find(|id| !self.contains(*id)) {
                return Err(Error::corpus(
                    format!("type {index} refers to unknown type {}", missing.0),
                    None,
                ));
            }
            if let Type::Named(named) = ty {
                if self.underlying(TypeId(index as u32)).is_none() {
                    return Err(Error::corpus(
                        format!(
                            "named type {} has no underlying type",
                            named.qualified_name()
                        ),
                        None,
                    ));
                }
            }
        }

        match self.find_unnamed_cycle() {
            Some(id) => Err(Error::corpus(
                format!("type {} is defined in terms of itself", id.0),
                None,
            )),
            None => Ok(()),
        }
    }

    /// Edges followed by the structural walks; they never look past a named type
    fn structural_edges(&self, id: TypeId) -> Vec<TypeId> {
        match self.get(id) {
            Some(Type::Named(_)) | None => Vec::new(),
            Some(ty) => ty.references(),
        }
    }

    /// Depth-first search over structural edges, iterative so that deep
    /// tables cannot exhaust the stack. Expects every reference to resolve.
    fn find_unnamed_cycle(&self) -> Option<TypeId> {
        let mut marks = vec![Mark::Unvisited; self.types.len()];

        for start in 0..self.types.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            let start = TypeId(start as u32);
            marks[start.index()] = Mark::Active;
            let mut stack = vec![(start, self.structural_edges(start))];

            while let Some((node, pending)) = stack.last_mut() {
                let node = *node;
                let Some(next) = pending.pop() else {
                    marks[node.index()] = Mark::Done;
                    stack.pop();
                    continue;
                };
                match marks[next.index()] {
                    Mark::Active => return Some(next),
                    Mark::Done => {}
                    Mark::Unvisited => {
                        marks[next.index()] = Mark::Active;
                        stack.push((next, self.structural_edges(next)));
                    }
                }
            }
        }
        None
    }

    /// Find or insert a basic type
    pub fn basic(&mut self, kind: BasicKind) -> TypeId {
        let existing = self
            .types
            .iter()
            .position(|ty| matches!(ty, Type::Basic(k) if *k == kind));
        match existing {
            Some(index) => TypeId(index as u32),
            None => self.add(Type::Basic(kind)),
        }
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.add(Type::Pointer(elem))
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.add(Type::Slice(elem))
    }

    pub fn array(&mut self, len: u64, elem: TypeId) -> TypeId {
        self.add(Type::Array(ArrayType { len, elem }))
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.add(Type::Map(MapType { key, value }))
    }

    pub fn chan(&mut self, dir: ChanDir, elem: TypeId) -> TypeId {
        self.add(Type::Chan(ChanType { dir, elem }))
    }

    pub fn signature(
        &mut self,
        params: Vec<TypeId>,
        results: Vec<TypeId>,
        variadic: bool,
    ) -> TypeId {
        self.add(Type::Signature(SignatureType {
            params,
            results,
            variadic,
        }))
    }

    pub fn tuple(&mut self, elems: Vec<TypeId>) -> TypeId {
        self.add(Type::Tuple(elems))
    }

    pub fn interface(&mut self, methods: &[(&str, TypeId)]) -> TypeId {
        let methods = methods
            .iter()
            .map(|(name, sig)| Method {
                name: (*name).to_string(),
                sig: *sig,
                pointer_receiver: false,
            })
            .collect();
        self.add(Type::Interface(InterfaceType { methods }))
    }

    pub fn struct_type(&mut self, fields: &[(&str, TypeId)]) -> TypeId {
        let fields = fields
            .iter()
            .map(|(name, ty)| Field {
                name: (*name).to_string(),
                ty: *ty,
                embedded: false,
            })
            .collect();
        self.add(Type::Struct(StructType { fields }))
    }

    pub fn named(&mut self, package: &str, name: &str, underlying: TypeId) -> TypeId {
        self.add(Type::Named(NamedType {
            package: package.to_string(),
            name: name.to_string(),
            underlying,
            methods: Vec::new(),
        }))
    }

    /// Attach a method to a named type; ignored for any other type
    pub fn add_method(&mut self, named: TypeId, name: &str, sig: TypeId, pointer_receiver: bool) {
        if let Some(Type::Named(n)) = self.types.get_mut(named.index()) {
            n.methods.push(Method {
                name: name.to_string(),
                sig,
                pointer_receiver,
            });
        }
    }

    /// Find or insert the predeclared `error` interface
    pub fn error(&mut self) -> TypeId {
        let existing = self.types.iter().position(
            |ty| matches!(ty, Type::Named(n) if n.package.is_empty() && n.name == "error"),
        );
        if let Some(index) = existing {
            return TypeId(index as u32);
        }
        let string = self.basic(BasicKind::String);
        let sig = self.signature(Vec::new(), vec![string], false);
        let iface = self.interface(&[("Error", sig)]);
        self.named("", "error", iface)
    }

    /// Follow named types down to their underlying type.
    ///
    /// Chains of named types are followed until a non-named type is reached;
    /// a malformed cycle yields `None`.
    pub fn underlying(&self, id: TypeId) -> Option<TypeId> {
        let mut current = id;
        for _ in 0..=self.types.len() {
            match self.get(current)? {
                Type::Named(named) => current = named.underlying,
                _ => return Some(current),
            }
        }
        None
    }

    pub fn underlying_type(&self, id: TypeId) -> Option<&Type> {
        self.underlying(id).and_then(|u| self.get(u))
    }

    pub fn is_named(&self, id: TypeId) -> bool {
        matches!(self.get(id), Some(Type::Named(_)))
    }

    /// Structural type identity.
    ///
    /// Named types are identical only to themselves (same package and name);
    /// parameter names never take part since signatures do not record them.
    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (Some(x), Some(y)) => self.identical_types(x, y),
            _ => false,
        }
    }

    fn identical_types(&self, x: &Type, y: &Type) -> bool {
        match (x, y) {
            (Type::Basic(a), Type::Basic(b)) => a.canonical() == b.canonical(),
            (Type::Named(a), Type::Named(b)) => a.package == b.package && a.name == b.name,
            (Type::Pointer(a), Type::Pointer(b)) | (Type::Slice(a), Type::Slice(b)) => {
                self.identical(*a, *b)
            }
            (Type::Array(a), Type::Array(b)) => a.len == b.len && self.identical(a.elem, b.elem),
            (Type::Map(a), Type::Map(b)) => {
                self.identical(a.key, b.key) && self.identical(a.value, b.value)
            }
            (Type::Chan(a), Type::Chan(b)) => a.dir == b.dir && self.identical(a.elem, b.elem),
            (Type::Signature(a), Type::Signature(b)) => {
                a.variadic == b.variadic
                    && self.all_identical(&a.params, &b.params)
                    && self.all_identical(&a.results, &b.results)
            }
            (Type::Tuple(a), Type::Tuple(b)) => self.all_identical(a, b),
            (Type::Interface(a), Type::Interface(b)) => self.same_methods(&a.methods, &b.methods),
            (Type::Struct(a), Type::Struct(b)) => {
                a.fields.len() == b.fields.len()
                    && a.fields.iter().zip(&b.fields).all(|(f, g)| {
                        f.name == g.name && f.embedded == g.embedded && self.identical(f.ty, g.ty)
                    })
            }
            _ => false,
        }
    }

    fn all_identical(&self, a: &[TypeId], b: &[TypeId]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.identical(*x, *y))
    }

    fn same_methods(&self, a: &[Method], b: &[Method]) -> bool {
        a.len() == b.len()
            && a.iter().all(|m| {
                b.iter()
                    .find(|n| n.name == m.name)
                    .is_some_and(|n| self.identical(m.sig, n.sig))
            })
    }

    /// Look up a method in the method set of `id`.
    ///
    /// Values of a named type only carry value-receiver methods; pointers to
    /// a named type carry both. Interface types carry their own methods.
    pub fn lookup_method(&self, id: TypeId, name: &str) -> Option<&Method> {
        match self.get(id)? {
            Type::Named(named) => named
                .methods
                .iter()
                .find(|m| m.name == name && !m.pointer_receiver)
                .or_else(|| match self.underlying_type(id)? {
                    Type::Interface(iface) => iface.method(name),
                    _ => None,
                }),
            Type::Pointer(elem) => match self.get(*elem)? {
                Type::Named(named) => named.methods.iter().find(|m| m.name == name),
                _ => None,
            },
            Type::Interface(iface) => iface.method(name),
            _ => None,
        }
    }

    /// Whether values of type `v` satisfy `iface`
    pub fn implements(&self, v: TypeId, iface: &InterfaceType) -> bool {
        iface.methods.iter().all(|wanted| {
            self.lookup_method(v, &wanted.name)
                .is_some_and(|found| self.identical(found.sig, wanted.sig))
        })
    }

    /// Assignability of a value of type `v` to a variable of type `t`
    pub fn assignable(&self, v: TypeId, t: TypeId) -> bool {
        if self.identical(v, t) {
            return true;
        }
        let (Some(vu), Some(tu)) = (self.underlying_type(v), self.underlying_type(t)) else {
            return false;
        };

        if let Type::Basic(kind) = vu {
            if kind.is_untyped() {
                return match (kind, tu) {
                    (BasicKind::UntypedNil, target) => matches!(
                        target,
                        Type::Pointer(_)
                            | Type::Signature(_)
                            | Type::Slice(_)
                            | Type::Map(_)
                            | Type::Chan(_)
                            | Type::Interface(_)
                    ),
                    (_, Type::Interface(iface)) => iface.methods.is_empty(),
                    (kind, Type::Basic(target)) => kind.untyped_fits(*target),
                    _ => false,
                };
            }
        }

        if let Type::Interface(iface) = tu {
            return self.implements(v, iface);
        }

        let one_unnamed = !self.is_named(v) || !self.is_named(t);
        if one_unnamed && self.identical_types(vu, tu) {
            return true;
        }

        match (vu, tu) {
            (Type::Chan(vc), Type::Chan(tc)) => {
                one_unnamed && vc.dir == ChanDir::Both && self.identical(vc.elem, tc.elem)
            }
            _ => false,
        }
    }

    /// Render a type in Go syntax, e.g. `func([]byte) (int, error)`
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { table: self, id }
    }

    fn write_type(&self, f: &mut fmt::Formatter<'_>, id: TypeId) -> fmt::Result {
        let Some(ty) = self.get(id) else {
            return write!(f, "<invalid type {}>", id.0);
        };
        match ty {
            Type::Basic(kind) => f.write_str(kind.name()),
            Type::Named(named) => f.write_str(&named.qualified_name()),
            Type::Pointer(elem) => {
                f.write_str("*")?;
                self.write_type(f, *elem)
            }
            Type::Slice(elem) => {
                f.write_str("[]")?;
                self.write_type(f, *elem)
            }
            Type::Array(array) => {
                write!(f, "[{}]", array.len)?;
                self.write_type(f, array.elem)
            }
            Type::Map(map) => {
                f.write_str("map[")?;
                self.write_type(f, map.key)?;
                f.write_str("]")?;
                self.write_type(f, map.value)
            }
            Type::Chan(chan) => {
                f.write_str(match chan.dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                })?;
                self.write_type(f, chan.elem)
            }
            Type::Signature(sig) => {
                f.write_str("func")?;
                self.write_signature(f, sig)
            }
            Type::Tuple(elems) => {
                f.write_str("(")?;
                self.write_list(f, elems)?;
                f.write_str(")")
            }
            Type::Interface(iface) => {
                f.write_str("interface{")?;
                for (i, method) in iface.methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    f.write_str(&method.name)?;
                    match self.get(method.sig) {
                        Some(Type::Signature(sig)) => self.write_signature(f, sig)?,
                        _ => self.write_type(f, method.sig)?,
                    }
                }
                f.write_str("}")
            }
            Type::Struct(st) => {
                f.write_str("struct{")?;
                for (i, field) in st.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if !field.embedded {
                        write!(f, "{} ", field.name)?;
                    }
                    self.write_type(f, field.ty)?;
                }
                f.write_str("}")
            }
        }
    }

    fn write_list(&self, f: &mut fmt::Formatter<'_>, ids: &[TypeId]) -> fmt::Result {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.write_type(f, *id)?;
        }
        Ok(())
    }

    fn write_signature(&self, f: &mut fmt::Formatter<'_>, sig: &SignatureType) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in sig.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let last = i + 1 == sig.params.len();
            match self.get(*param) {
                Some(Type::Slice(elem)) if sig.variadic && last => {
                    f.write_str("...")?;
                    self.write_type(f, *elem)?;
                }
                _ => self.write_type(f, *param)?,
            }
        }
        f.write_str(")")?;
        match sig.results.as_slice() {
            [] => Ok(()),
            [single] => {
                f.write_str(" ")?;
                self.write_type(f, *single)
            }
            many => {
                f.write_str(" (")?;
                self.write_list(f, many)?;
                f.write_str(")")
            }
        }
    }
}

/// [`fmt::Display`] adapter returned by [`TypeTable::display`]
pub struct TypeDisplay<'t> {
    table: &'t TypeTable,
    id: TypeId,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.write_type(f, self.id)
    }
}
