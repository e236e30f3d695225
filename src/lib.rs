//! # Byte Bloom
//!
//! A Bloom filter over raw byte elements. A single FNV-1a digest per element is
//! expanded into `k` bit positions with enhanced double hashing, so every
//! `add`/`test` costs one hash computation regardless of `k`.
//!
//! ```
//! use byte_bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(0.01, 10_000)?;
//! filter.add(b"A")?;
//!
//! assert!(filter.test(b"A")?);
//! assert!(!filter.test(b"B")?);
//!
//! let restored = BloomFilter::deserialize(&filter.serialize())?;
//! assert!(restored.test(b"A")?);
//! # Ok::<(), byte_bloom::BloomError>(())
//! ```
//!
//! The filter is a plain mutable value with no internal locking. Share it
//! between threads behind a `RwLock` (or similar) if needed.

pub mod bloom;
pub mod hash;
pub mod serialization;
pub mod utils;

pub use bloom::{BloomFilter, BloomStats};
pub use hash::DoubleHashIndices;
pub use utils::{optimal_bloom_parameters, BloomParameters};

// Python bindings
#[cfg(feature = "python")]
pub mod python_module;

/// Common error types for the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BloomError {
    /// A construction argument is outside its valid domain.
    InvalidParameter(String),
    /// The bit-vector for the requested sizing cannot be allocated.
    Allocation(String),
    /// Hashing an element failed while its bytes were being consumed.
    Hash(String),
    /// Serialized input is truncated, malformed or internally inconsistent.
    Decode(String),
}

impl std::fmt::Display for BloomError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BloomError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            BloomError::Allocation(msg) => write!(f, "Memory allocation error: {}", msg),
            BloomError::Hash(msg) => write!(f, "Hash function error: {}", msg),
            BloomError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for BloomError {}

pub type Result<T> = std::result::Result<T, BloomError>;
