//! The loaded program: packages, their syntax and their semantic tables

use crate::core::ast::{File, FuncDecl};
use crate::core::errors::{Error, Result};
use crate::core::oracle::{Object, ObjectId, PackageOracle, TypesInfo};
use crate::core::types::TypeTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One package of the corpus.
///
/// Dependency packages usually come without files; only their scope is
/// needed to find the interfaces they declare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Import path
    pub path: String,
    /// Package name as written in its package clause
    pub name: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub files: Vec<File>,
    /// Package-level objects
    #[serde(default)]
    pub scope: Vec<ObjectId>,
    #[serde(default)]
    pub info: TypesInfo,
}

impl Package {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            imports: Vec::new(),
            files: Vec::new(),
            scope: Vec::new(),
            info: TypesInfo::default(),
        }
    }

    /// Whether the import path has an `internal` segment
    pub fn is_internal(&self) -> bool {
        self.path.split('/').any(|segment| segment == "internal")
    }

    /// Function and method declarations in file and declaration order
    pub fn functions(&self) -> impl Iterator<Item = (&File, &FuncDecl)> {
        self.files
            .iter()
            .flat_map(|file| file.functions().map(move |func| (file, func)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub types: TypeTable,
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub packages: Vec<Package>,
    /// Import paths to analyze; every package when empty
    #[serde(default)]
    pub roots: Vec<String>,
}

impl Corpus {
    /// Parse and validate a JSON corpus document
    pub fn from_json(contents: &str) -> Result<Self> {
        let corpus: Corpus = serde_json::from_str(contents)?;
        corpus.validate()?;
        Ok(corpus)
    }

    /// Read a JSON corpus document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::corpus(
                format!("cannot read {}: {e}", path.display()),
                Some(path.to_path_buf()),
            )
        })?;
        Self::from_json(&contents).map_err(|e| match e {
            Error::Corpus { message, .. } => Error::corpus(message, Some(path.to_path_buf())),
            other => Error::corpus(
                format!("{}: {other}", path.display()),
                Some(path.to_path_buf()),
            ),
        })
    }

    /// Check the cross references a front end is responsible for
    pub fn validate(&self) -> Result<()> {
        self.types.validate()?;

        let mut paths = HashSet::new();
        for pkg in &self.packages {
            if !paths.insert(pkg.path.as_str()) {
                return Err(Error::corpus(
                    format!("duplicate package {}", pkg.path),
                    None,
                ));
            }
        }
        for root in &self.roots {
            if !paths.contains(root.as_str()) {
                return Err(Error::corpus(format!("unknown root package {root}"), None));
            }
        }
        for pkg in &self.packages {
            if let Some(missing) = pkg.imports.iter().find(|i| !paths.contains(i.as_str())) {
                return Err(Error::corpus(
                    format!("package {} imports unknown package {missing}", pkg.path),
                    None,
                ));
            }
            let objects = pkg
                .scope
                .iter()
                .chain(pkg.info.defs.values())
                .chain(pkg.info.uses.values());
            for id in objects {
                if self.object(*id).is_none() {
                    return Err(Error::corpus(
                        format!("package {} refers to unknown object {}", pkg.path, id.0),
                        None,
                    ));
                }
            }
            if let Some(ty) = pkg.info.types.values().find(|ty| !self.types.contains(**ty)) {
                return Err(Error::corpus(
                    format!("package {} refers to unknown type {}", pkg.path, ty.0),
                    None,
                ));
            }
        }
        if let Some(object) = self.objects.iter().find(|o| !self.types.contains(o.ty)) {
            return Err(Error::corpus(
                format!("object {} refers to unknown type {}", object.name, object.ty.0),
                None,
            ));
        }
        Ok(())
    }

    pub fn package(&self, path: &str) -> Option<&Package> {
        self.packages.iter().find(|pkg| pkg.path == path)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0 as usize)
    }

    /// Packages to analyze, in corpus order
    pub fn roots(&self) -> impl Iterator<Item = &Package> {
        self.packages
            .iter()
            .filter(|pkg| self.roots.is_empty() || self.roots.contains(&pkg.path))
    }

    pub fn oracle<'a>(&'a self, pkg: &'a Package) -> PackageOracle<'a> {
        PackageOracle::new(&self.types, &self.objects, &pkg.info)
    }
}
