//! Hashing for Bloom filters
//!
//! Each element is hashed exactly once with 64-bit FNV-1a. The digest is split
//! into two 32-bit halves that seed an enhanced double hashing sequence
//! `g_i = upper + lower * i + i^2 (mod m)`, which stands in for `k`
//! independent hash functions.

use crate::{BloomError, Result};
use fnv::FnvHasher;
use std::hash::Hasher;
use std::io::{self, Read};

const READ_CHUNK: usize = 8 * 1024;

/// 64-bit FNV-1a digest of an element's raw bytes.
///
/// No length prefix is mixed in, so the digest depends only on the bytes.
pub fn digest(element: &[u8]) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(element);
    hasher.finish()
}

/// Streaming variant of [`digest`]. Equal to `digest` over the concatenation
/// of everything the reader yields.
///
/// # Errors
///
/// Any read error other than `Interrupted` becomes [`BloomError::Hash`].
pub fn digest_reader<R: Read>(mut reader: R) -> Result<u64> {
    let mut hasher = FnvHasher::default();
    let mut buf = [0u8; READ_CHUNK];

    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(BloomError::Hash(format!(
                    "failed to read element bytes: {}",
                    e
                )))
            }
        };
        hasher.write(&buf[..read]);
    }

    Ok(hasher.finish())
}

/// Iterator over the `k` bit positions derived from one digest.
#[derive(Debug, Clone)]
pub struct DoubleHashIndices {
    upper: u64,
    lower: u64,
    num_bits: u64,
    num_hashes: u64,
    round: u64,
}

impl DoubleHashIndices {
    /// Positions for `digest` in a bit-vector of `num_bits` bits.
    ///
    /// `num_bits` must be non-zero.
    pub fn new(digest: u64, num_hashes: u32, num_bits: u64) -> Self {
        debug_assert!(num_bits > 0, "bit-vector must not be empty");

        DoubleHashIndices {
            upper: (digest >> 32) << 32,
            lower: (digest << 32) >> 32,
            num_bits,
            num_hashes: num_hashes as u64,
            round: 0,
        }
    }
}

impl Iterator for DoubleHashIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.round >= self.num_hashes {
            return None;
        }

        let i = self.round;
        self.round += 1;

        // Arithmetic wraps at 2^64 before the reduction
        let combined = self
            .upper
            .wrapping_add(self.lower.wrapping_mul(i))
            .wrapping_add(i.wrapping_mul(i));
        Some((combined % self.num_bits) as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.num_hashes - self.round) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DoubleHashIndices {}
