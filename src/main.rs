use anyhow::Result;
use decouple::cli::{parse_args, Commands};
use decouple::commands::{check, init};
use decouple::observability;

fn main() -> Result<()> {
    let cli = parse_args();
    observability::init_logging(cli.command.verbosity());

    match cli.command {
        Commands::Check {
            corpus,
            format,
            output,
            config,
            include_empty,
            exclude_unused,
            no_names,
            no_parallel,
            jobs,
            fail_fast,
            color,
            plain,
            verbosity: _,
        } => check::handle_check(check::CheckConfig {
            corpus,
            format,
            output,
            config,
            include_empty,
            exclude_unused,
            no_names,
            no_parallel,
            jobs,
            fail_fast,
            color,
            plain,
        }),
        Commands::Init { force } => init::init_config(force),
    }
}
