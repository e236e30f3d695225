//! Sizing of Bloom filters from a target false positive rate

use crate::{BloomError, Result};

/// Largest bit-vector this crate will try to allocate.
///
/// Bit positions are `usize` and the backing storage must fit in `isize::MAX` bytes.
pub const MAX_NUM_BITS: u64 = isize::MAX as u64;

/// Optimal Bloom filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomParameters {
    pub num_bits: u64,
    pub num_hashes: u32,
    pub expected_fpr: f64,
}

/// Calculate optimal Bloom filter parameters for a target false positive rate
/// `false_positive_rate` and `expected_elements` insertions.
///
/// * `m = ceil(-n * ln(p) / (ln 2)^2)`
/// * `k = round(m / n * ln 2)`, at least 1
///
/// # Errors
///
/// `InvalidParameter` unless `0 < p < 1` and `n > 0`. `Allocation` when `m`
/// exceeds [`MAX_NUM_BITS`].
pub fn optimal_bloom_parameters(
    false_positive_rate: f64,
    expected_elements: usize,
) -> Result<BloomParameters> {
    // NaN fails this check too
    if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
        return Err(BloomError::InvalidParameter(format!(
            "False positive rate must be in (0, 1), got {}",
            false_positive_rate
        )));
    }
    if expected_elements == 0 {
        return Err(BloomError::InvalidParameter(
            "Expected elements must be > 0".to_string(),
        ));
    }

    let n = expected_elements as f64;
    let p = false_positive_rate;

    let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;
    let optimal_bits = (-n * p.ln() / ln2_squared).ceil();

    if !optimal_bits.is_finite() || optimal_bits > MAX_NUM_BITS as f64 {
        return Err(BloomError::Allocation(format!(
            "{} elements at false positive rate {} need {:e} bits, more than the addressable {}; \
             reduce the expected element count or raise the false positive rate",
            expected_elements, false_positive_rate, optimal_bits, MAX_NUM_BITS
        )));
    }

    let num_bits = (optimal_bits as u64).max(1);
    let m = num_bits as f64;
    let num_hashes = ((m / n) * std::f64::consts::LN_2).round().max(1.0) as u32;

    Ok(BloomParameters {
        num_bits,
        num_hashes,
        expected_fpr: expected_false_positive_rate(num_bits, num_hashes, expected_elements as u64),
    })
}

/// `(1 - e^(-k * n / m))^k`, the false positive probability after `n` insertions.
pub(crate) fn expected_false_positive_rate(num_bits: u64, num_hashes: u32, inserted: u64) -> f64 {
    let k = num_hashes as f64;
    let exponent = -k * inserted as f64 / num_bits as f64;
    // powf: a u32 hash count does not fit powi's i32 exponent
    (1.0 - exponent.exp()).powf(k)
}
