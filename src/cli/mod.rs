//! CLI module for decouple
//!
//! - Argument parsing (`args`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod setup;

pub use args::{parse_args, Cli, Commands};
pub use setup::{configure_thread_pool, get_worker_count};
