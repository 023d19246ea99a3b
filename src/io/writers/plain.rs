use crate::analysis::{FunctionReport, ParamReport};
use crate::io::output::{sorted_by_position, OutputWriter};
use colored::*;
use std::io::Write;

/// The classic line-oriented report:
///
/// ```text
/// pkg/file.go:12:6: Copy
///     dst: [Write] (io.Writer)
///     src: [Close Read] (io.ReadCloser)
/// ```
pub struct PlainWriter<W: Write> {
    writer: W,
    color: bool,
}

impl<W: Write> PlainWriter<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_function(&mut self, report: &FunctionReport) -> anyhow::Result<()> {
        let location = format!("{}:{}", report.file, report.pos);
        if self.color {
            writeln!(self.writer, "{}: {}", location.dimmed(), report.function.bold())?;
        } else {
            writeln!(self.writer, "{}: {}", location, report.function)?;
        }

        let mut params: Vec<&ParamReport> = report.params.iter().collect();
        params.sort_by(|a, b| a.name.cmp(&b.name));
        for param in params {
            self.write_param(param)?;
        }
        Ok(())
    }

    fn write_param(&mut self, param: &ParamReport) -> anyhow::Result<()> {
        let methods = format!("[{}]", param.methods.join(" "));
        match (&param.interface, self.color) {
            (Some(iface), true) => writeln!(
                self.writer,
                "    {}: {} ({})",
                param.name.cyan(),
                methods,
                iface.green()
            )?,
            (Some(iface), false) => {
                writeln!(self.writer, "    {}: {} ({})", param.name, methods, iface)?
            }
            (None, true) => writeln!(self.writer, "    {}: {}", param.name.cyan(), methods)?,
            (None, false) => writeln!(self.writer, "    {}: {}", param.name, methods)?,
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for PlainWriter<W> {
    fn write_reports(&mut self, reports: &[FunctionReport]) -> anyhow::Result<()> {
        for report in sorted_by_position(reports) {
            self.write_function(report)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
