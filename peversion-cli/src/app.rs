use std::{fs, io::BufReader, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use peversion::VersionInfo;

use crate::output::{print_output, Report};

/// peversion - print the version information of a Windows PE executable
#[derive(Debug, Parser)]
#[command(name = "peversion", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Read the file as a forward-only stream instead of memory-mapping it.
    #[arg(long)]
    pub stream: bool,

    /// Path to the executable or DLL.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

/// Options controlling output and logging.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Invalid command line.
pub const EXIT_USAGE: u8 = 1;
/// The file holds no version resource.
pub const EXIT_NO_VERSION: u8 = 2;
/// The file could not be read or is not a valid PE32 image.
pub const EXIT_FAILURE: u8 = 3;

/// Decode the file named on the command line and print the result.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let path = &cli.path;

    let info = if cli.stream {
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open file: {}", path.display()))?;
        VersionInfo::from_reader(BufReader::new(file))
    } else {
        VersionInfo::from_file(path)
    }
    .with_context(|| format!("failed to read version information: {}", path.display()))?;

    let report = Report::new(path, info);
    print_output(&report, &cli.global, Report::print)
}

/// Map a command-line parse failure to the process exit code.
///
/// `--help` and `--version` surface as clap errors printed on stdout; they exit successfully.
pub fn usage_exit_code(error: &clap::Error) -> u8 {
    if error.use_stderr() {
        EXIT_USAGE
    } else {
        0
    }
}

/// Map a failed run to the process exit code.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<peversion::Error>() {
        Some(e) if e.is_not_found() => EXIT_NO_VERSION,
        _ => EXIT_FAILURE,
    }
}
