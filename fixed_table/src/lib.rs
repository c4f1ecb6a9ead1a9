//! A fixed-capacity hash table using open addressing
//!
//! Keys are placed with multiplicative (Fibonacci) hashing and collisions are resolved with
//! linear probing. The table never grows: once every slot is filled, inserting a new key fails
//! with [`Error::Full`].

mod error;
mod hash;
mod map;

pub use error::{Error, Result};
pub use hash::{bucket, FibonacciKey, GOLDEN_FRACTION};
pub use map::{FixedHashMap, Iter, DEFAULT_CAPACITY};
