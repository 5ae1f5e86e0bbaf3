//! Memoization of functions that take an explicit invocation context.
//!
//! ```
//! use memoizer::memoize;
//!
//! let square = memoize(|_: &(), (x,): (u64,)| x * x);
//! assert_eq!(square.get((12,)), 144);
//! assert_eq!(square.get((12,)), 144);
//! assert_eq!(square.stats().hits, 1);
//! ```

pub mod args;
pub mod cache;
pub mod key;
pub mod memoizer;

pub use crate::args::Arguments;
pub use crate::cache::CacheStats;
pub use crate::key::{CacheKey, ToCacheKey};
pub use crate::memoizer::{
    memoize, memoize_fallible, memoize_fallible_with, memoize_with, Bound, Memoized,
};
