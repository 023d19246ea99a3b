//! Index of exported interfaces, for naming a required method set.

use crate::core::corpus::{Corpus, Package};
use crate::core::method_map::MethodMap;
use crate::core::oracle::ObjectKind;
use crate::core::shape;
use crate::core::types::TypeTable;
use std::collections::{BTreeMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// Exported interfaces declared in the analyzed packages and everything
/// they import, keyed by qualified name (`path.Name`).
///
/// Packages with an `internal` path segment contribute nothing, since code
/// outside their tree cannot name their interfaces, but their imports are
/// still followed.
#[derive(Debug, Clone, Default)]
pub struct InterfaceIndex {
    entries: BTreeMap<String, MethodMap>,
}

impl InterfaceIndex {
    pub fn build(corpus: &Corpus) -> Self {
        let mut index = Self::default();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&Package> = corpus.roots().collect();

        while let Some(pkg) = queue.pop_front() {
            if !seen.insert(pkg.path.as_str()) {
                continue;
            }
            if pkg.is_internal() {
                trace!(package = %pkg.path, "skipping internal package");
            } else {
                index.add_package(corpus, pkg);
            }
            queue.extend(pkg.imports.iter().filter_map(|path| corpus.package(path)));
        }

        debug!(
            packages = seen.len(),
            interfaces = index.len(),
            "built interface index"
        );
        index
    }

    fn add_package(&mut self, corpus: &Corpus, pkg: &Package) {
        for object in pkg.scope.iter().filter_map(|id| corpus.object(*id)) {
            if object.kind != ObjectKind::TypeName || !object.is_exported() {
                continue;
            }
            if let Some(iface) = shape::interface(&corpus.types, object.ty) {
                self.entries.insert(
                    format!("{}.{}", pkg.path, object.name),
                    MethodMap::from_interface(iface),
                );
            }
        }
    }

    /// Name of an interface with exactly these methods. When several match,
    /// the smallest qualified name wins.
    pub fn lookup(&self, methods: &MethodMap, types: &TypeTable) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, declared)| declared.equivalent(methods, types))
            .map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&MethodMap> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
