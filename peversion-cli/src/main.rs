mod app;
mod output;

use std::process::ExitCode;

use clap::Parser;

use crate::app::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // Help and version text also arrive here
            let _ = error.print();
            return ExitCode::from(app::usage_exit_code(&error));
        }
    };

    // Show peversion warnings on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        };
        env_logger::Builder::new()
            .filter_module("peversion", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let code = app::exit_code(&error);
            if code == app::EXIT_NO_VERSION {
                eprintln!("No version information: {}", cli.path.display());
            } else {
                eprintln!("Error: {error:#}");
            }
            ExitCode::from(code)
        }
    }
}
