//! Function-wrapping cache.
//!
//! [`memoize`] turns a function of a context `&C` and an argument tuple `A`
//! into a [`Memoized`] wrapper with the same call shape. Every wrapper owns a
//! private cache, keyed by the first argument unless a resolver is supplied.

use crate::args::Arguments;
use crate::cache::{CacheStats, KeyedCache};
use crate::key::{CacheKey, ToCacheKey};
use log::{debug, trace};
use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;

type Target<C, A, R, E> = Box<dyn Fn(&C, A) -> Result<R, E>>;
type Resolver<C, A> = Box<dyn Fn(&C, &A) -> CacheKey>;

/// A memoized function.
///
/// The cache is not borrowed while the wrapped function runs, so the function
/// may call its own wrapper recursively. The wrapper is `!Sync`.
pub struct Memoized<C, A, R, E = Infallible> {
    cache: RefCell<KeyedCache<R>>,
    target: Target<C, A, R, E>,
    resolver: Option<Resolver<C, A>>,
}

/// Memoize `target`, keying the cache by its first argument.
pub fn memoize<C, A, R, F>(target: F) -> Memoized<C, A, R>
where
    A: Arguments,
    R: Clone,
    F: Fn(&C, A) -> R + 'static,
{
    Memoized::new(
        Box::new(move |ctx: &C, args: A| Ok(target(ctx, args))),
        None,
    )
}

/// Memoize `target`, keying the cache by whatever `resolver` returns for the
/// same context and arguments.
pub fn memoize_with<C, A, R, K, F, G>(target: F, resolver: G) -> Memoized<C, A, R>
where
    A: Arguments,
    R: Clone,
    K: ToCacheKey,
    F: Fn(&C, A) -> R + 'static,
    G: Fn(&C, &A) -> K + 'static,
{
    Memoized::new(
        Box::new(move |ctx: &C, args: A| Ok(target(ctx, args))),
        Some(Box::new(move |ctx: &C, args: &A| {
            resolver(ctx, args).to_cache_key()
        })),
    )
}

/// Memoize a fallible `target`. Only `Ok` results are cached.
pub fn memoize_fallible<C, A, R, E, F>(target: F) -> Memoized<C, A, R, E>
where
    A: Arguments,
    R: Clone,
    F: Fn(&C, A) -> Result<R, E> + 'static,
{
    Memoized::new(Box::new(target), None)
}

pub fn memoize_fallible_with<C, A, R, E, K, F, G>(target: F, resolver: G) -> Memoized<C, A, R, E>
where
    A: Arguments,
    R: Clone,
    K: ToCacheKey,
    F: Fn(&C, A) -> Result<R, E> + 'static,
    G: Fn(&C, &A) -> K + 'static,
{
    Memoized::new(
        Box::new(target),
        Some(Box::new(move |ctx: &C, args: &A| {
            resolver(ctx, args).to_cache_key()
        })),
    )
}

impl<C, A, R, E> Memoized<C, A, R, E>
where
    A: Arguments,
    R: Clone,
{
    fn new(target: Target<C, A, R, E>, resolver: Option<Resolver<C, A>>) -> Self {
        debug!(
            "new memoized function keyed by {}",
            if resolver.is_some() {
                "resolver"
            } else {
                "first argument"
            }
        );
        Memoized {
            cache: RefCell::new(KeyedCache::new()),
            target,
            resolver,
        }
    }

    fn resolve(&self, ctx: &C, args: &A) -> CacheKey {
        match &self.resolver {
            Some(resolver) => resolver(ctx, args),
            None => args.first_key(),
        }
    }

    /// Call through the cache, propagating the wrapped function's error.
    ///
    /// An error is never cached: the next call with the same key tries again.
    pub fn try_call(&self, ctx: &C, args: A) -> Result<R, E> {
        let key = self.resolve(ctx, &args);
        if let Some(value) = self.cache.borrow_mut().get(&key) {
            trace!("hit {}", key);
            return Ok(value.clone());
        }
        trace!("miss {}", key);
        let value = (self.target)(ctx, args)?;
        self.cache.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    /// Attach a context, giving a callable that only takes arguments.
    pub fn bind<'m, 'c>(&'m self, ctx: &'c C) -> Bound<'m, 'c, C, A, R, E> {
        Bound {
            memoized: self,
            ctx,
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.borrow().stats()
    }
}

impl<C, A, R> Memoized<C, A, R, Infallible>
where
    A: Arguments,
    R: Clone,
{
    pub fn call(&self, ctx: &C, args: A) -> R {
        match self.try_call(ctx, args) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<A, R> Memoized<(), A, R, Infallible>
where
    A: Arguments,
    R: Clone,
{
    /// Call a context-free memoized function.
    pub fn get(&self, args: A) -> R {
        self.call(&(), args)
    }
}

impl<C, A, R, E> fmt::Debug for Memoized<C, A, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("resolver", &self.resolver.is_some())
            .field("entries", &self.cache.borrow().len())
            .finish()
    }
}

/// A memoized function together with the context it is invoked on.
pub struct Bound<'m, 'c, C, A, R, E = Infallible> {
    memoized: &'m Memoized<C, A, R, E>,
    ctx: &'c C,
}

impl<C, A, R, E> Bound<'_, '_, C, A, R, E>
where
    A: Arguments,
    R: Clone,
{
    pub fn try_call(&self, args: A) -> Result<R, E> {
        self.memoized.try_call(self.ctx, args)
    }
}

impl<C, A, R> Bound<'_, '_, C, A, R, Infallible>
where
    A: Arguments,
    R: Clone,
{
    pub fn call(&self, args: A) -> R {
        self.memoized.call(self.ctx, args)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (calls.clone(), calls)
    }

    #[test]
    fn calls_the_target_once_per_key() {
        let (calls, seen) = counter();
        let memoized = memoize(move |_: &(), (x,): (i32,)| {
            calls.set(calls.get() + 1);
            x
        });
        assert_eq!(memoized.get((3,)), 3);
        assert_eq!(memoized.get((3,)), 3);
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn keeps_entries_for_every_key() {
        let (calls, seen) = counter();
        let memoized = memoize(move |_: &(), (x,): (i32,)| {
            calls.set(calls.get() + 1);
            x
        });
        assert_eq!(memoized.get((3,)), 3);
        assert_eq!(memoized.get((4,)), 4);
        assert_eq!(memoized.get((3,)), 3);
        assert_eq!(seen.get(), 2);
        assert_eq!(
            memoized.stats(),
            CacheStats {
                hits: 1,
                misses: 2,
                entries: 2
            }
        );
    }

    #[test]
    fn no_arguments_share_the_missing_key() {
        let (calls, seen) = counter();
        let memoized = memoize(move |_: &(), (): ()| {
            calls.set(calls.get() + 1);
            "computed"
        });
        assert_eq!(memoized.get(()), "computed");
        assert_eq!(memoized.get(()), "computed");
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let (calls, seen) = counter();
        let memoized = memoize_fallible(move |_: &(), (x,): (i32,)| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(format!("first attempt for {}", x))
            } else {
                Ok(x * 2)
            }
        });
        assert_eq!(memoized.try_call(&(), (5,)), Err("first attempt for 5".to_string()));
        assert_eq!(memoized.try_call(&(), (5,)), Ok(10));
        assert_eq!(memoized.try_call(&(), (5,)), Ok(10));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn fallible_with_resolver() {
        let memoized = memoize_fallible_with(
            |_: &(), (a, b): (i32, i32)| a.checked_div(b).ok_or("division by zero"),
            |_: &(), (a, b): &(i32, i32)| format!("{}/{}", a, b),
        );
        assert_eq!(memoized.try_call(&(), (6, 3)), Ok(2));
        assert_eq!(memoized.try_call(&(), (6, 2)), Ok(3));
        assert_eq!(memoized.try_call(&(), (6, 0)), Err("division by zero"));
        assert_eq!(memoized.stats().entries, 2);
    }

    #[test]
    fn panics_leave_the_cache_untouched() {
        let (calls, seen) = counter();
        let memoized = memoize(move |_: &(), (x,): (i32,)| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                panic!("boom");
            }
            x
        });
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| memoized.get((1,))));
        assert!(outcome.is_err());
        assert_eq!(memoized.stats().entries, 0);
        assert_eq!(memoized.get((1,)), 1);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn bound_wrapper_forwards_context() {
        struct Offset(i32);
        let memoized = memoize_with(
            |ctx: &Offset, (a,): (i32,)| a + ctx.0,
            |ctx: &Offset, (a,): &(i32,)| a + ctx.0,
        );
        let two = Offset(2);
        let ten = Offset(10);
        assert_eq!(memoized.bind(&two).call((1,)), 3);
        assert_eq!(memoized.bind(&ten).call((1,)), 11);
        assert_eq!(memoized.stats().misses, 2);
    }

    #[test]
    fn debug_shows_entries() {
        let memoized = memoize(|_: &(), (x,): (u8,)| x);
        memoized.get((1,));
        assert_eq!(format!("{:?}", memoized), "Memoized { resolver: false, entries: 1 }");
    }
}
