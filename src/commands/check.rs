use crate::analysis::{CheckOutcome, Checker};
use crate::cli;
use crate::config::{self, AnalysisSettings, DecoupleConfig, OutputConfig};
use crate::core::Corpus;
use crate::formatting::{ColorMode, FormattingConfig};
use crate::io::output::{create_writer, OutputFormat};
use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Everything `decouple check` was invoked with
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    pub corpus: PathBuf,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub include_empty: bool,
    pub exclude_unused: bool,
    pub no_names: bool,
    pub no_parallel: bool,
    pub jobs: Option<usize>,
    pub fail_fast: bool,
    pub color: Option<ColorMode>,
    pub plain: bool,
}

impl CheckConfig {
    /// Apply command-line overrides on top of the file configuration.
    ///
    /// Flags only ever switch a setting away from its default, so an
    /// absent flag leaves the file's value alone.
    pub fn resolve(&self, file: DecoupleConfig) -> (AnalysisSettings, OutputConfig) {
        let mut analysis = file.analysis;
        let mut output = file.output;

        analysis.include_empty |= self.include_empty;
        analysis.fail_fast |= self.fail_fast;
        if self.exclude_unused {
            analysis.include_unused = false;
        }
        if self.no_names {
            analysis.suggest_names = false;
        }
        if self.no_parallel {
            analysis.parallel = false;
        }
        if let Some(jobs) = self.jobs {
            analysis.jobs = jobs;
        }

        if let Some(format) = self.format {
            output.format = format;
        }
        if self.plain {
            output.color = ColorMode::Never;
        } else if let Some(color) = self.color {
            output.color = color;
        }

        (analysis, output)
    }

    fn load_file_config(&self) -> Result<DecoupleConfig> {
        match &self.config {
            Some(path) => Ok(config::load_config_from_path(path)?),
            None => Ok(config::load_config()),
        }
    }
}

pub fn handle_check(config: CheckConfig) -> Result<()> {
    let (settings, output) = config.resolve(config.load_file_config()?);
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid analysis settings: {e}"))?;

    if settings.parallel {
        cli::configure_thread_pool(settings.jobs);
    }

    let corpus = Corpus::load(&config.corpus)
        .with_context(|| format!("Failed to load corpus {}", config.corpus.display()))?;

    let checker = Checker::new(corpus, settings);
    let outcome = checker.check();
    info!(
        functions = outcome.reports.len(),
        failures = outcome.failures.len(),
        "check finished"
    );

    write_reports(&outcome, output, config.output.as_ref())?;
    report_failures(&outcome);

    if !outcome.is_clean() {
        anyhow::bail!(
            "{} parameter(s) could not be analyzed",
            outcome.failures.len()
        );
    }
    Ok(())
}

fn write_reports(
    outcome: &CheckOutcome,
    output: OutputConfig,
    path: Option<&PathBuf>,
) -> Result<()> {
    let (sink, color): (Box<dyn Write>, bool) = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            (Box::new(BufWriter::new(file)), false)
        }
        None => {
            let formatting = FormattingConfig::from_env(output.color);
            formatting.apply();
            (
                Box::new(io::stdout().lock()),
                formatting.color.should_use_color(),
            )
        }
    };

    let mut writer = create_writer(output.format, sink, color);
    writer.write_reports(&outcome.reports)
}

fn report_failures(outcome: &CheckOutcome) {
    for failure in &outcome.failures {
        eprintln!("{} {}", "error:".red().bold(), failure);
    }
}
