//! Core data model: syntax, types, the type oracle and the loaded corpus.

pub mod ast;
pub mod corpus;
pub mod errors;
pub mod method_map;
pub mod oracle;
pub mod shape;
pub mod types;

pub use corpus::{Corpus, Package};
pub use errors::{Error, Result, ResultExt};
pub use method_map::MethodMap;
pub use oracle::{Object, ObjectId, ObjectKind, PackageOracle, TypeOracle, TypesInfo};
pub use types::{Type, TypeId, TypeTable};
