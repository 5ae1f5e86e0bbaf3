//! Cache keys.
//!
//! A key is either a primitive, compared by value, or an object, compared by
//! the identity of its allocation. Callers never pick the category: it follows
//! from the type being converted through [`ToCacheKey`].

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

/// A key derived from the arguments of a memoized call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Primitive(Primitive),
    Object(ObjectKey),
}

impl CacheKey {
    /// The key used when a call has no first argument.
    pub const MISSING: CacheKey = CacheKey::Primitive(Primitive::Missing);
}

/// Value-compared keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// No argument was passed.
    Missing,
    Null,
    Bool(bool),
    /// All integer widths share this variant, so `1u8` and `1i64` collide.
    /// Integral floats land here too: `3.0` is the key `3`.
    Int(i128),
    /// Unsigned integers above `i128::MAX`.
    Wide(u128),
    /// Bit pattern of a non-integral `f64`, see [`Primitive::float`].
    Float(u64),
    Char(char),
    Str(String),
}

impl Primitive {
    /// Numbers compare by value: every `NaN` is one key, `-0.0` is `0.0`,
    /// and a float holding an integer is that integer.
    pub fn float(value: f64) -> Self {
        if value.is_nan() {
            return Primitive::Float(f64::NAN.to_bits());
        }
        // i128::MAX as f64 rounds up to 2^127, which is out of range
        if value.fract() == 0.0 && value >= i128::MIN as f64 && value < i128::MAX as f64 {
            return Primitive::Int(value as i128);
        }
        Primitive::Float(value.to_bits())
    }
}

/// Identity-compared key.
///
/// Holds a strong reference to the object so the address stays reserved for
/// as long as the key lives.
#[derive(Clone)]
pub struct ObjectKey {
    address: usize,
    _anchor: Rc<dyn Any>,
}

impl ObjectKey {
    fn new(address: *const (), anchor: Rc<dyn Any>) -> Self {
        ObjectKey {
            address: address as usize,
            _anchor: anchor,
        }
    }
}

impl PartialEq for ObjectKey {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for ObjectKey {}

impl Hash for ObjectKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ObjectKey({:#x})", self.address)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CacheKey::Primitive(Primitive::Missing) => write!(f, "<missing>"),
            CacheKey::Primitive(Primitive::Null) => write!(f, "null"),
            CacheKey::Primitive(Primitive::Bool(b)) => write!(f, "{}", b),
            CacheKey::Primitive(Primitive::Int(i)) => write!(f, "{}", i),
            CacheKey::Primitive(Primitive::Wide(u)) => write!(f, "{}", u),
            CacheKey::Primitive(Primitive::Float(bits)) => write!(f, "{}", f64::from_bits(*bits)),
            CacheKey::Primitive(Primitive::Char(c)) => write!(f, "{:?}", c),
            CacheKey::Primitive(Primitive::Str(s)) => write!(f, "{:?}", s),
            CacheKey::Object(o) => write!(f, "object@{:#x}", o.address),
        }
    }
}

/// Conversion of a value into the key it is cached under.
pub trait ToCacheKey {
    fn to_cache_key(&self) -> CacheKey;
}

impl ToCacheKey for CacheKey {
    fn to_cache_key(&self) -> CacheKey {
        self.clone()
    }
}

impl<T: ToCacheKey + ?Sized> ToCacheKey for &T {
    fn to_cache_key(&self) -> CacheKey {
        (**self).to_cache_key()
    }
}

macro_rules! int_keys {
    ($($t:ty),*) => {
        $(
            impl ToCacheKey for $t {
                fn to_cache_key(&self) -> CacheKey {
                    CacheKey::Primitive(Primitive::Int(*self as i128))
                }
            }
        )*
    };
}

int_keys!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl ToCacheKey for u128 {
    fn to_cache_key(&self) -> CacheKey {
        match i128::try_from(*self) {
            Ok(i) => CacheKey::Primitive(Primitive::Int(i)),
            Err(_) => CacheKey::Primitive(Primitive::Wide(*self)),
        }
    }
}

impl ToCacheKey for f64 {
    fn to_cache_key(&self) -> CacheKey {
        CacheKey::Primitive(Primitive::float(*self))
    }
}

impl ToCacheKey for f32 {
    fn to_cache_key(&self) -> CacheKey {
        CacheKey::Primitive(Primitive::float(*self as f64))
    }
}

impl ToCacheKey for bool {
    fn to_cache_key(&self) -> CacheKey {
        CacheKey::Primitive(Primitive::Bool(*self))
    }
}

impl ToCacheKey for char {
    fn to_cache_key(&self) -> CacheKey {
        CacheKey::Primitive(Primitive::Char(*self))
    }
}

impl ToCacheKey for str {
    fn to_cache_key(&self) -> CacheKey {
        CacheKey::Primitive(Primitive::Str(self.to_string()))
    }
}

impl ToCacheKey for String {
    fn to_cache_key(&self) -> CacheKey {
        self.as_str().to_cache_key()
    }
}

impl ToCacheKey for () {
    fn to_cache_key(&self) -> CacheKey {
        CacheKey::Primitive(Primitive::Null)
    }
}

impl<T: ToCacheKey> ToCacheKey for Option<T> {
    fn to_cache_key(&self) -> CacheKey {
        match self {
            Some(value) => value.to_cache_key(),
            None => CacheKey::Primitive(Primitive::Null),
        }
    }
}

impl<T: ?Sized + 'static> ToCacheKey for Rc<T> {
    fn to_cache_key(&self) -> CacheKey {
        let anchor: Rc<dyn Any> = Rc::new(Rc::clone(self));
        CacheKey::Object(ObjectKey::new(Rc::as_ptr(self).cast::<()>(), anchor))
    }
}

impl<T: ?Sized + 'static> ToCacheKey for Arc<T> {
    fn to_cache_key(&self) -> CacheKey {
        let anchor: Rc<dyn Any> = Rc::new(Arc::clone(self));
        CacheKey::Object(ObjectKey::new(Arc::as_ptr(self).cast::<()>(), anchor))
    }
}
