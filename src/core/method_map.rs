//! Method signature sets

use crate::core::types::{InterfaceType, TypeId, TypeTable};
use std::collections::BTreeMap;

/// Mapping from method name to calling signature.
///
/// Both the methods a parameter needs and the methods a declared interface
/// provides are expressed as method maps. Signatures are [`TypeId`]s into
/// the corpus type table, so comparing two maps goes through
/// [`MethodMap::equivalent`] rather than id equality.
#[derive(Debug, Clone, Default)]
pub struct MethodMap {
    methods: BTreeMap<String, TypeId>,
}

impl MethodMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// All methods of an interface
    pub fn from_interface(iface: &InterfaceType) -> Self {
        let mut map = Self::new();
        map.add_interface(iface);
        map
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, sig: TypeId) {
        self.methods.insert(name.into(), sig);
    }

    pub fn add_interface(&mut self, iface: &InterfaceType) {
        for method in &iface.methods {
            self.insert(method.name.clone(), method.sig);
        }
    }

    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.methods.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.methods.iter().map(|(name, sig)| (name.as_str(), *sig))
    }

    /// Same names, and type-identical signatures for each name
    pub fn equivalent(&self, other: &MethodMap, types: &TypeTable) -> bool {
        self.len() == other.len()
            && self.iter().all(|(name, sig)| {
                other
                    .get(name)
                    .is_some_and(|theirs| types.identical(sig, theirs))
            })
    }

    /// Render each signature in Go syntax
    pub fn signatures(&self, types: &TypeTable) -> BTreeMap<String, String> {
        self.iter()
            .map(|(name, sig)| (name.to_string(), types.display(sig).to_string()))
            .collect()
    }
}
