//! Standard Bloom filter over byte elements
//!
//! A space-efficient probabilistic data structure for membership testing.
//! `test` may return false positives but never false negatives.

use crate::hash::{self, DoubleHashIndices};
use crate::utils::{self, MAX_NUM_BITS};
use crate::{BloomError, Result};
use bit_vec::BitVec;
use std::io::Read;

/// A standard Bloom filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    /// Bit array storing the filter data
    bits: BitVec,
    /// Number of positions probed per element
    num_hashes: u32,
    /// Number of `add` calls, duplicates included
    count: u64,
}

impl BloomFilter {
    /// Create a new Bloom filter sized for `expected_elements` insertions at
    /// `false_positive_rate`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless `0 < false_positive_rate < 1` and
    /// `expected_elements > 0`; `Allocation` when the bit-vector cannot be
    /// allocated.
    pub fn new(false_positive_rate: f64, expected_elements: usize) -> Result<Self> {
        let params = utils::optimal_bloom_parameters(false_positive_rate, expected_elements)
            .inspect_err(|e| {
                if let BloomError::Allocation(_) = e {
                    tracing::warn!(
                        false_positive_rate,
                        expected_elements,
                        "refusing to size bloom filter beyond addressable memory"
                    );
                }
            })?;

        let bits = allocate_bits(params.num_bits)?;

        tracing::debug!(
            num_bits = params.num_bits,
            num_hashes = params.num_hashes,
            false_positive_rate,
            expected_elements,
            "created bloom filter"
        );

        Ok(BloomFilter {
            bits,
            num_hashes: params.num_hashes,
            count: 0,
        })
    }

    /// Create a Bloom filter with specific parameters
    pub fn with_size(num_bits: u64, num_hashes: u32) -> Result<Self> {
        if num_bits == 0 {
            return Err(BloomError::InvalidParameter(
                "Bit count must be > 0".to_string(),
            ));
        }
        if num_hashes == 0 {
            return Err(BloomError::InvalidParameter(
                "Number of hashes must be > 0".to_string(),
            ));
        }
        if num_hashes as u64 > num_bits {
            return Err(BloomError::InvalidParameter(format!(
                "Number of hashes ({}) must not exceed bit count ({})",
                num_hashes, num_bits
            )));
        }

        let bits = allocate_bits(num_bits)?;

        tracing::debug!(num_bits, num_hashes, "created bloom filter");

        Ok(BloomFilter {
            bits,
            num_hashes,
            count: 0,
        })
    }

    /// Reassemble a filter from decoded parts. Callers have checked the shape.
    pub(crate) fn from_parts(bits: BitVec, num_hashes: u32, count: u64) -> Self {
        BloomFilter {
            bits,
            num_hashes,
            count,
        }
    }

    /// Insert an element into the filter
    ///
    /// Adding an element twice leaves the bits unchanged but still counts as
    /// two insertions for [`fill_ratio`](Self::fill_ratio) and
    /// [`estimated_false_positive_rate`](Self::estimated_false_positive_rate).
    ///
    /// # Errors
    ///
    /// Hashing an in-memory slice cannot fail; the `Result` matches
    /// [`add_reader`](Self::add_reader).
    pub fn add(&mut self, element: &[u8]) -> Result<()> {
        self.insert_digest(hash::digest(element));
        Ok(())
    }

    /// Insert an element whose bytes are streamed from `reader`.
    ///
    /// # Errors
    ///
    /// `Hash` if the reader fails; the filter is left untouched.
    pub fn add_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        let digest = hash::digest_reader(reader)?;
        self.insert_digest(digest);
        Ok(())
    }

    /// Check if an element might be in the filter
    /// Returns true if the element might be present (with possible false positives)
    /// Returns false if the element is definitely not present
    pub fn test(&self, element: &[u8]) -> Result<bool> {
        Ok(self.contains_digest(hash::digest(element)))
    }

    /// Membership test for an element streamed from `reader`.
    ///
    /// # Errors
    ///
    /// `Hash` if the reader fails.
    pub fn test_reader<R: Read>(&self, reader: R) -> Result<bool> {
        let digest = hash::digest_reader(reader)?;
        Ok(self.contains_digest(digest))
    }

    fn indices(&self, digest: u64) -> DoubleHashIndices {
        DoubleHashIndices::new(digest, self.num_hashes, self.bits.len() as u64)
    }

    fn insert_digest(&mut self, digest: u64) {
        for idx in self.indices(digest) {
            self.bits.set(idx, true);
        }

        self.count += 1;
    }

    fn contains_digest(&self, digest: u64) -> bool {
        for idx in self.indices(digest) {
            if !self.bits.get(idx).unwrap_or(false) {
                return false;
            }
        }

        true
    }

    /// Expected fraction of set bits after [`len`](Self::len) insertions,
    /// `1 - (1 - 1/m)^n`.
    ///
    /// This is analytic, not a scan of the bits, and it over-estimates once
    /// duplicates have been added. See [`load_factor`](Self::load_factor) for
    /// the measured value.
    ///
    /// The result is below 1.0 except for a 1-bit filter, which reaches 1.0
    /// after its first insertion.
    pub fn fill_ratio(&self) -> f64 {
        let m = self.bits.len() as f64;
        1.0 - (1.0 - 1.0 / m).powf(self.count as f64)
    }

    /// Current false positive probability estimate, `(1 - e^(-k*n/m))^k` with
    /// `n` the number of insertions.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        utils::expected_false_positive_rate(self.bits.len() as u64, self.num_hashes, self.count)
    }

    /// Get the current load factor (fraction of bits set)
    pub fn load_factor(&self) -> f64 {
        let set_bits = self.bits.iter().filter(|&bit| bit).count();
        set_bits as f64 / self.bits.len() as f64
    }

    /// Get statistics about the filter
    pub fn stats(&self) -> BloomStats {
        BloomStats {
            num_bits: self.num_bits(),
            num_hashes: self.num_hashes,
            elements_inserted: self.count,
            fill_ratio: self.fill_ratio(),
            load_factor: self.load_factor(),
            estimated_fpr: self.estimated_false_positive_rate(),
        }
    }

    /// Number of `add` calls so far
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Length of the bit-vector
    pub fn num_bits(&self) -> u64 {
        self.bits.len() as u64
    }

    /// Get the number of hash functions
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    pub(crate) fn bits(&self) -> &BitVec {
        &self.bits
    }
}

/// Zeroed bit-vector of `num_bits` bits, or `Allocation` if the memory is not
/// available.
fn allocate_bits(num_bits: u64) -> Result<BitVec> {
    let too_large = || {
        BloomError::Allocation(format!(
            "cannot allocate a bit-vector of {} bits; \
             reduce the expected element count or raise the false positive rate",
            num_bits
        ))
    };

    if num_bits > MAX_NUM_BITS {
        return Err(too_large());
    }
    let len = usize::try_from(num_bits).map_err(|_| too_large())?;

    // Probe with the same word storage bit-vec uses, since `from_elem` aborts on OOM
    let mut probe: Vec<u32> = Vec::new();
    probe.try_reserve_exact(len.div_ceil(32)).map_err(|_| {
        tracing::warn!(num_bits, "bit-vector allocation failed");
        too_large()
    })?;
    drop(probe);

    Ok(BitVec::from_elem(len, false))
}

/// Statistics about a Bloom filter
#[derive(Debug, Clone)]
pub struct BloomStats {
    pub num_bits: u64,
    pub num_hashes: u32,
    pub elements_inserted: u64,
    pub fill_ratio: f64,
    pub load_factor: f64,
    pub estimated_fpr: f64,
}

impl std::fmt::Display for BloomStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter Stats:\n\
             - Capacity: {} bits\n\
             - Hash functions: {}\n\
             - Elements inserted: {}\n\
             - Fill ratio: {:.3}\n\
             - Load factor: {:.3}\n\
             - Estimated FPR: {:.6}",
            self.num_bits,
            self.num_hashes,
            self.elements_inserted,
            self.fill_ratio,
            self.load_factor,
            self.estimated_fpr
        )
    }
}
