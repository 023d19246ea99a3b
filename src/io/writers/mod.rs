pub mod json;
pub mod plain;

pub use json::JsonWriter;
pub use plain::PlainWriter;
