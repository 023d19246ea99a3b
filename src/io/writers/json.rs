use crate::analysis::FunctionReport;
use crate::io::output::{sorted_by_position, OutputWriter};
use std::io::Write;

/// Newline-delimited JSON: one object per function, in position order
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_reports(&mut self, reports: &[FunctionReport]) -> anyhow::Result<()> {
        for report in sorted_by_position(reports) {
            serde_json::to_writer(&mut self.writer, report)?;
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
