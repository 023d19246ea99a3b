//! `.decouple.toml` configuration.
//!
//! The file is looked up in the current directory and its ancestors. A
//! missing or unreadable file means defaults; command-line flags override
//! whatever the file sets.

mod core;
mod loader;

pub use core::{AnalysisSettings, DecoupleConfig, OutputConfig, MAX_JOBS};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
