//! Command line interface of the factorial demo.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Compute factorials with a recursively memoized function", long_about = None)]
pub struct Args {
    #[arg(value_name = "N", allow_negative_numbers = true, help = "Compute N!")]
    pub n: i128,

    #[arg(long, help = "Print every factorial from 0! up to N!")]
    pub upto: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase verbosity level"
    )]
    pub verbosity: u8,

    #[arg(
        long,
        short = 'l',
        value_name = "LOG_FILE",
        help = "Optional path to the log file. Defaults to stderr if not specified."
    )]
    pub log_output: Option<PathBuf>,
}
