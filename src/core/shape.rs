//! Shape utilities: what a type is once named types are unwrapped

use crate::core::types::{
    ArrayType, ChanType, InterfaceType, MapType, SignatureType, StructType, Type, TypeId,
    TypeTable,
};

pub fn interface(types: &TypeTable, ty: TypeId) -> Option<&InterfaceType> {
    match types.underlying_type(ty)? {
        Type::Interface(iface) => Some(iface),
        _ => None,
    }
}

pub fn map(types: &TypeTable, ty: TypeId) -> Option<&MapType> {
    match types.underlying_type(ty)? {
        Type::Map(map) => Some(map),
        _ => None,
    }
}

pub fn chan(types: &TypeTable, ty: TypeId) -> Option<&ChanType> {
    match types.underlying_type(ty)? {
        Type::Chan(chan) => Some(chan),
        _ => None,
    }
}

pub fn signature(types: &TypeTable, ty: TypeId) -> Option<&SignatureType> {
    match types.underlying_type(ty)? {
        Type::Signature(sig) => Some(sig),
        _ => None,
    }
}

/// Types a composite literal can build
#[derive(Debug, Clone, Copy)]
pub enum CompositeShape<'t> {
    Struct(&'t StructType),
    Map(&'t MapType),
    /// Element type of a slice literal
    Slice(TypeId),
    Array(&'t ArrayType),
}

/// Shape of a composite literal's type.
///
/// Literals with an elided `&T` inside another literal are typed as a
/// pointer, so one level of pointer is looked through.
pub fn composite(types: &TypeTable, ty: TypeId) -> Option<CompositeShape<'_>> {
    let shape = match types.underlying_type(ty)? {
        Type::Pointer(elem) => return composite_direct(types, *elem),
        other => other,
    };
    composite_of(shape)
}

fn composite_direct(types: &TypeTable, ty: TypeId) -> Option<CompositeShape<'_>> {
    composite_of(types.underlying_type(ty)?)
}

fn composite_of(ty: &Type) -> Option<CompositeShape<'_>> {
    match ty {
        Type::Struct(st) => Some(CompositeShape::Struct(st)),
        Type::Map(map) => Some(CompositeShape::Map(map)),
        Type::Slice(elem) => Some(CompositeShape::Slice(*elem)),
        Type::Array(array) => Some(CompositeShape::Array(array)),
        _ => None,
    }
}
