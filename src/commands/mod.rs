pub mod check;
pub mod init;

pub use check::{handle_check, CheckConfig};
