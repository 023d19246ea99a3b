//! Whole-corpus analysis: which parameters of which functions could take an
//! interface, and which declared interface fits.

pub mod checker;
pub mod interface_index;

pub use checker::{AnalysisFailure, CheckOutcome, Checker, FunctionReport, ParamReport};
pub use interface_index::InterfaceIndex;
