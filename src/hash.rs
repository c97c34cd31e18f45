use fnv::FnvHasher;
use murmur3::murmur3_x64_128;
use std::hash::Hasher;
use std::io::Cursor;

/// A type alias for the function that maps a fingerprint to Bloom filter
/// bit positions.
///
/// **Parameters:**
///
/// - `item: &[u8]`
///   - Bytes to hash, usually the 32 bytes of a [`crate::Fingerprint`].
/// - `num_hashes: usize`
///   - The number of bit positions to compute.
/// - `bit_vector_size: usize`
///   - Size of the filter's bit vector; every index is in `[0, bit_vector_size)`.
///
/// **Returns:**
///
/// - `Vec<u64>`
///   - One bit index per hash function.
pub type HashFunction = fn(&[u8], usize, usize) -> Vec<u64>;

pub(crate) fn hash_murmur64(key: &[u8]) -> u64 {
    let mut cursor = Cursor::new(key);
    // reading from an in-memory cursor cannot fail
    murmur3_x64_128(&mut cursor, 0).unwrap_or_default() as u64
}

pub(crate) fn hash_fnv64(key: &[u8]) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(key);
    hasher.finish()
}

/// Double hashing (Kirsch-Mitzenmacher): `h1 + i * h2 mod m`, in 64 bits so
/// filters larger than `u32::MAX` bits use their whole bit vector.
pub fn default_hash_function(
    item: &[u8],
    num_hashes: usize,
    bit_vector_size: usize,
) -> Vec<u64> {
    let h1 = hash_murmur64(item);
    let h2 = hash_fnv64(item);
    let m = bit_vector_size as u64;
    (0..num_hashes as u64)
        .map(|i| h1.wrapping_add(i.wrapping_mul(h2)) % m)
        .collect()
}

pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    let m = ((-(n as f64) * fpr.ln()) / (ln2 * ln2)).ceil() as usize;
    m.max(1)
}

pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    let k = ((m as f64 / n as f64) * std::f64::consts::LN_2).round() as usize;
    k.max(1)
}

/// Per-filter false positive rate such that a query fanned out over
/// `filters` independent filters stays within `target` overall.
///
/// `1 - (1 - p_f)^filters = target`, so `p_f = 1 - (1 - target)^(1 / filters)`.
/// For small targets this is close to `target / filters`. Evaluated through
/// `ln_1p`/`exp_m1` so rates near zero do not cancel to `0.0`.
pub fn per_filter_fpr(target: f64, filters: usize) -> f64 {
    -((-target).ln_1p() / filters as f64).exp_m1()
}

/// Overall false positive rate of `filters` filters each at `per_filter`.
pub fn compound_fpr(per_filter: f64, filters: usize) -> f64 {
    -((-per_filter).ln_1p() * filters as f64).exp_m1()
}
