use crate::analysis::FunctionReport;
use crate::io::writers::{JsonWriter, PlainWriter};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `file:line:col: Func` followed by one line per parameter
    #[default]
    Plain,
    /// One JSON object per function, one per line
    Json,
}

pub trait OutputWriter {
    fn write_reports(&mut self, reports: &[FunctionReport]) -> anyhow::Result<()>;
}

pub fn create_writer(
    format: OutputFormat,
    out: Box<dyn Write>,
    color: bool,
) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Plain => Box::new(PlainWriter::new(out, color)),
        OutputFormat::Json => Box::new(JsonWriter::new(out)),
    }
}

/// Reports ordered by file, then position
pub fn sorted_by_position(reports: &[FunctionReport]) -> Vec<&FunctionReport> {
    let mut sorted: Vec<&FunctionReport> = reports.iter().collect();
    sorted.sort_by(|a, b| a.file.cmp(&b.file).then(a.pos.cmp(&b.pos)));
    sorted
}
