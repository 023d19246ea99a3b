use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::{AnalysisSettings, DecoupleConfig};
use crate::core::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".decouple.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a config from TOML, replacing invalid sections with defaults
pub fn parse_and_validate_config(contents: &str) -> Result<DecoupleConfig> {
    let mut config = toml::from_str::<DecoupleConfig>(contents)
        .map_err(|e| Error::Configuration(format!("failed to parse {CONFIG_FILE_NAME}: {e}")))?;

    if let Err(e) = config.analysis.validate() {
        log::warn!("Invalid [analysis] settings: {e}. Using defaults.");
        config.analysis = AnalysisSettings::default();
    }

    Ok(config)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<DecoupleConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{e}. Using defaults.");
            None
        }
    }
}

/// Only log actual errors, not "file not found"
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and its parents, nearest first, at most `max_depth` of them
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load an explicitly named config file; unlike discovery, every failure
/// is an error.
pub fn load_config_from_path(path: &Path) -> Result<DecoupleConfig> {
    let contents = read_config_file(path)
        .map_err(|e| Error::Configuration(format!("cannot read {}: {e}", path.display())))?;
    parse_and_validate_config(&contents)
}

/// Search `start` and its ancestors for `.decouple.toml`
pub fn load_config_from(start: &Path) -> DecoupleConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DecoupleConfig::default()
        })
}

pub fn load_config() -> DecoupleConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            DecoupleConfig::default()
        }
    }
}
