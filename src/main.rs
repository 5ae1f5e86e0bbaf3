use clap::Parser;
use itertools::Itertools;
use log::{debug, info};
use once_cell::unsync::OnceCell;
use std::fmt;
use std::process;

use memoizer::{memoize_fallible, Memoized};
mod cli;
mod logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Overflow(i128);

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}! does not fit in 128 bits", self.0)
    }
}

/// Largest `n` with `n!` below `i128::MAX`.
const LARGEST_INPUT: i128 = 33;

/// Factorial whose recursive calls go through its own memoized wrapper.
#[derive(Default)]
struct Factorial {
    memoized: OnceCell<Memoized<Factorial, (i128,), i128, Overflow>>,
}

impl Factorial {
    fn get(&self, n: i128) -> Result<i128, Overflow> {
        // rejected before recursing, so the stack depth stays bounded
        if n > LARGEST_INPUT {
            return Err(Overflow(n));
        }
        self.memoized
            .get_or_init(|| memoize_fallible(Self::compute))
            .try_call(self, (n,))
    }

    fn compute(&self, (n,): (i128,)) -> Result<i128, Overflow> {
        debug!("computing {}!", n);
        if n < 0 {
            Ok(-1)
        } else if n == 0 {
            Ok(1)
        } else {
            let previous = self.get(n - 1)?;
            n.checked_mul(previous).ok_or(Overflow(n))
        }
    }

    fn log_stats(&self) {
        if let Some(memoized) = self.memoized.get() {
            info!("cache: {}", memoized.stats());
        }
    }
}

fn main() {
    let args = cli::Args::parse();
    logging::setup_logger(args.verbosity, args.log_output.as_deref());

    let factorial = Factorial::default();
    let output = if args.upto {
        (0..=args.n)
            .map(|n| factorial.get(n).map(|value| format!("{}! = {}", n, value)))
            .collect::<Result<Vec<_>, _>>()
            .map(|lines| lines.into_iter().join("\n"))
    } else {
        factorial.get(args.n).map(|value| value.to_string())
    };
    factorial.log_stats();

    match output {
        Ok(text) => println!("{}", text),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}
