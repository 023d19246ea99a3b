use serde::{Deserialize, Serialize};

use crate::formatting::ColorMode;
use crate::io::output::OutputFormat;

/// Upper bound accepted for `analysis.jobs`
pub const MAX_JOBS: usize = 1024;

fn default_parallel() -> bool {
    true
}

fn default_include_unused() -> bool {
    true
}

fn default_suggest_names() -> bool {
    true
}

/// Root configuration structure for decouple
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DecoupleConfig {
    /// What the checker analyzes and reports
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Report formatting
    #[serde(default)]
    pub output: OutputConfig,
}

/// Checker behaviour.
///
/// # Example
///
/// ```rust
/// use decouple::config::AnalysisSettings;
///
/// let settings = AnalysisSettings {
///     parallel: false,
///     fail_fast: true,
///     ..Default::default()
/// };
/// assert!(settings.include_unused);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Analyze functions on the rayon pool (default: true)
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Worker threads; 0 means one per core
    #[serde(default)]
    pub jobs: usize,

    /// Report functions that have no eligible parameters
    #[serde(default)]
    pub include_empty: bool,

    /// Report parameters that are eligible with no methods at all, i.e.
    /// could be the empty interface (default: true)
    #[serde(default = "default_include_unused")]
    pub include_unused: bool,

    /// Attach the name of an exported interface with exactly the required
    /// methods (default: true)
    #[serde(default = "default_suggest_names")]
    pub suggest_names: bool,

    /// Stop at the first internal inconsistency instead of collecting them
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            jobs: 0,
            include_empty: false,
            include_unused: default_include_unused(),
            suggest_names: default_suggest_names(),
            fail_fast: false,
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.jobs > MAX_JOBS {
            return Err(format!("jobs = {} exceeds the maximum of {MAX_JOBS}", self.jobs));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Colored plain output (default: auto-detect based on TTY)
    #[serde(default)]
    pub color: ColorMode,
}
