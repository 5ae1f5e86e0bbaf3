//! Logger setup for the command line tool.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::File;
use std::path::Path;

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Log to `log_output` if given and writable, to stderr otherwise.
/// `RUST_LOG` is read first; `verbosity` overrides its global level.
pub fn setup_logger(verbosity: u8, log_output: Option<&Path>) {
    let mut builder = Builder::from_default_env();
    builder
        .format_timestamp(None)
        .filter_level(level_for(verbosity));

    let target = match log_output.map(|path| (path, File::create(path))) {
        Some((_, Ok(file))) => Target::Pipe(Box::new(file)),
        Some((path, Err(err))) => {
            eprintln!("cannot log to {}: {}; using stderr", path.display(), err);
            Target::Stderr
        }
        None => Target::Stderr,
    };
    builder.target(target).init();
}
