use clap::error::ErrorKind;
use clap::Parser;
use concat::{logging, Cli, Concat, OutputFormatter, OutputMode};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return handle_usage_error(&e),
    };

    logging::init_logging(cli.verbose, cli.quiet);

    let concat = match Concat::from_cli(&cli) {
        Ok(concat) => concat,
        Err(e) => {
            OutputFormatter::new(OutputMode::Human, 0, false).print_user_friendly_error(&e);
            return e.exit_code();
        }
    };

    let root = match cli.root_directory() {
        Ok(root) => root,
        Err(e) => {
            concat.handle_error(&e);
            return e.exit_code();
        }
    };

    let result = if cli.dry_run {
        concat.plan(&root, &cli.extension)
    } else {
        concat.concatenate(&root, &cli.extension)
    };

    match result {
        Ok(report) => {
            concat.output_formatter().print_concat_report(&report);
            0
        }
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            concat.handle_error(&e);
            e.exit_code()
        }
    }
}

/// Help and version requests exit successfully; every other parse failure
/// prints usage on stdout and exits with status 1.
fn handle_usage_error(error: &clap::Error) -> i32 {
    print!("{}", error.render());

    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}
