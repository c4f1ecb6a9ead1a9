use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the mutating operations of a `FixedHashMap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// Every slot on the probe sequence was filled with some other key
    #[error("hash table is full (capacity {capacity})")]
    Full {
        capacity: usize,
    },
}
