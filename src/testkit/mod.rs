//! Testing infrastructure for decouple.
//!
//! Analysis tests need a syntax tree and the type oracle's view of it. This
//! module builds both in memory, so tests never depend on a front end:
//!
//! - **[`CorpusBuilder`] / [`PackageBuilder`]**: allocate nodes and objects
//!   and record types as expressions are built
//! - **[`stmt`]**: constructors for statements that need no bookkeeping
//! - **[`Stdlib`]**: a miniature `io` / `os` / `context` / `fmt`
//! - **Assertion macros**: Result and eligibility assertions
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use decouple::analyzers::usage::analyze_param;
//! use decouple::testkit::{stmt, CorpusBuilder, Stdlib};
//!
//! let mut corpus = CorpusBuilder::new();
//! let std = Stdlib::install(&mut corpus);
//! let mut pkg = corpus.package("example.com/m");
//! pkg.func("F", &[("r", std.file_ptr)], &[], |pb, params| {
//!     let r = pb.ident(params[0]);
//!     let read_all = pb.qualified(std.read_all);
//!     vec![stmt::expr(pb.call(read_all, vec![r]))]
//! });
//! pkg.finish();
//!
//! let corpus = corpus.build();
//! let pkg = corpus.package("example.com/m").unwrap();
//! let (_, func) = pkg.functions().next().unwrap();
//! let param = func.params().next().unwrap();
//! let result = analyze_param(param, func, &corpus.oracle(pkg)).unwrap();
//! assert_eligible!(result, ["Read"]);
//! ```

pub mod assertions;
pub mod builder;
pub mod fixtures;

pub use builder::{stmt, CorpusBuilder, PackageBuilder};
pub use fixtures::Stdlib;

use crate::analyzers::usage::{analyze_param, Eligibility};
use crate::core::corpus::Corpus;
use crate::core::errors::Result;

/// Analyze parameter `param` of function `func` in package `package`.
///
/// Panics when the package, function or parameter does not exist.
pub fn analyze(corpus: &Corpus, package: &str, func: &str, param: &str) -> Result<Eligibility> {
    let Some(pkg) = corpus.package(package) else {
        panic!("no package {package}");
    };
    let Some((_, decl)) = pkg.functions().find(|(_, f)| f.name.name == func) else {
        panic!("no function {func} in {package}");
    };
    let Some(ident) = decl.params().find(|p| p.name == param) else {
        panic!("no parameter {param} in {func}");
    };
    analyze_param(ident, decl, &corpus.oracle(pkg))
}
