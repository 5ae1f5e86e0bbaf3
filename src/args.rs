use crate::key::{CacheKey, ToCacheKey};

/// An argument list passed to a memoized function.
///
/// Implemented for tuples up to eight elements. Only the first element has to
/// be convertible into a key, since that is what the default keying uses.
pub trait Arguments {
    /// Key of the first positional argument, or [`CacheKey::MISSING`] for `()`.
    fn first_key(&self) -> CacheKey;
}

impl Arguments for () {
    fn first_key(&self) -> CacheKey {
        CacheKey::MISSING
    }
}

macro_rules! tuple_arguments {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: ToCacheKey $(, $rest)*> Arguments for ($first, $($rest,)*) {
            fn first_key(&self) -> CacheKey {
                self.0.to_cache_key()
            }
        }
    };
}

tuple_arguments!(A0);
tuple_arguments!(A0, A1);
tuple_arguments!(A0, A1, A2);
tuple_arguments!(A0, A1, A2, A3);
tuple_arguments!(A0, A1, A2, A3, A4);
tuple_arguments!(A0, A1, A2, A3, A4, A5);
tuple_arguments!(A0, A1, A2, A3, A4, A5, A6);
tuple_arguments!(A0, A1, A2, A3, A4, A5, A6, A7);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_arguments_are_missing() {
        assert_eq!(().first_key(), CacheKey::MISSING);
    }

    #[test]
    fn only_the_first_argument_counts() {
        assert_eq!((1i32, 2i32).first_key(), (1i32, 3i32).first_key());
        assert_eq!((1u8, "a", vec![0u8]).first_key(), (1i64,).first_key());
        assert_ne!((1i32, 2i32).first_key(), (2i32, 2i32).first_key());
    }
}
