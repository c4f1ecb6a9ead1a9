/// The fractional part of the golden ratio, used to scatter keys across buckets
pub const GOLDEN_FRACTION: f64 = 0.6180339887;

/// A key that can be placed in a bucket with multiplicative hashing
///
/// The key is converted to a floating point scalar before it is scaled. Integers with a magnitude
/// up to 2^53 convert exactly. Larger integers lose their lowest bits, which only affects how
/// evenly they spread across buckets, never whether they can be found again.
pub trait FibonacciKey: Eq {
    /// Returns the key as a scalar to be scaled by [`GOLDEN_FRACTION`]
    fn scalar(&self) -> f64;
}

macro_rules! impl_fibonacci_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FibonacciKey for $ty {
                #[inline]
                fn scalar(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_fibonacci_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Returns the bucket in `[0, capacity)` where the probe sequence for `key` starts
///
/// The key is scaled by [`GOLDEN_FRACTION`], the fractional part of the product (taken as
/// `x - floor(x)`, so negative keys also land in `[0, 1)`) is scaled by `capacity`, and the result
/// is truncated.
pub fn bucket<K: FibonacciKey + ?Sized>(key: &K, capacity: usize) -> usize {
    let product = key.scalar() * GOLDEN_FRACTION;
    let fraction = product - product.floor();
    let index = (fraction * capacity as f64) as usize;

    // `fraction < 1.0`, but the final multiplication can still round up to `capacity`
    index.min(capacity.saturating_sub(1))
}
