// Test utility module for decouple integration tests
#![allow(dead_code)]

pub mod fixture;

use decouple::config::AnalysisSettings;
use decouple::Checker;

pub use fixture::M;

/// Checker over the fixture package, skipping parameters that need no
/// methods at all
pub fn fixture_checker(no_names: bool) -> Checker {
    let settings = AnalysisSettings {
        include_unused: false,
        suggest_names: !no_names,
        ..Default::default()
    };
    Checker::new(fixture::corpus(), settings)
}

/// The fixture corpus as the JSON a front end would write
pub fn fixture_json() -> String {
    match serde_json::to_string(&fixture::corpus()) {
        Ok(json) => json,
        Err(e) => panic!("cannot serialize fixture corpus: {e}"),
    }
}
