// Export modules for library usage
pub mod analysis;
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{Corpus, Error, MethodMap, Package, Result};

pub use crate::analysis::{CheckOutcome, Checker, FunctionReport, InterfaceIndex, ParamReport};

pub use crate::analyzers::{analyze_param, Eligibility};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
