pub mod output;
pub mod writers;

pub use output::{create_writer, sorted_by_position, OutputFormat, OutputWriter};
