//! Configuration errors reported by `Builder::build`.

/// Rejected table configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("bucket array capacity must be at least 1")]
    ZeroCapacity,

    #[error("load factor must be finite and positive, got {0}")]
    InvalidLoadFactor(f32),

    #[error("growth policy must use a finite amount, got {0}")]
    InvalidGrowth(f32),

    #[error("no hash function configured")]
    MissingHashFn,

    #[error("no compare function configured")]
    MissingCompareFn,
}
