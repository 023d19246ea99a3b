//! Per-parameter analyzers.
//!
//! An analyzer answers one question about one parameter of one function,
//! using only the syntax tree and a [`TypeOracle`](crate::core::oracle::TypeOracle).
//! The checker in [`crate::analysis`] decides which parameters to ask about
//! and what to do with the answers.

pub mod usage;

pub use usage::{analyze_param, Eligibility};
