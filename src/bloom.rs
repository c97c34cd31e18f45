//! Single bit-vector Bloom filter, the building block of the probabilistic
//! witness bank.

use crate::config::validate_fpr;
use crate::error::{Result, WitnessError};
use crate::hash::{
    HashFunction, default_hash_function, optimal_bit_vector_size,
    optimal_num_hashes,
};
use bitvec::{bitvec, order::Lsb0, vec::BitVec};

/// Derived sizing parameters for a filter of a given capacity and rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomParams {
    pub capacity: usize,
    pub false_positive_rate: f64,
    pub bit_vector_size: usize,
    pub num_hashes: usize,
}

impl BloomParams {
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(WitnessError::ZeroCapacity);
        }
        validate_fpr(false_positive_rate)?;

        let bit_vector_size =
            optimal_bit_vector_size(capacity, false_positive_rate);
        let num_hashes = optimal_num_hashes(capacity, bit_vector_size);

        Ok(Self {
            capacity,
            false_positive_rate,
            bit_vector_size,
            num_hashes,
        })
    }

    /// Bytes taken by the bit vector.
    pub fn memory_bytes(&self) -> usize {
        self.bit_vector_size.div_ceil(8)
    }
}

pub struct BloomFilter {
    params: BloomParams,
    hash_function: HashFunction,
    bits: BitVec<usize, Lsb0>,
    insert_count: usize,
}

impl BloomFilter {
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self> {
        Ok(Self::with_params(BloomParams::new(
            capacity,
            false_positive_rate,
        )?))
    }

    pub fn with_params(params: BloomParams) -> Self {
        Self {
            params,
            hash_function: default_hash_function,
            bits: bitvec![usize, Lsb0; 0; params.bit_vector_size],
            insert_count: 0,
        }
    }

    pub fn insert(&mut self, item: &[u8]) {
        let indices = (self.hash_function)(
            item,
            self.params.num_hashes,
            self.params.bit_vector_size,
        );
        for idx in indices {
            self.bits.set(idx as usize, true);
        }
        self.insert_count += 1;
    }

    pub fn contains(&self, item: &[u8]) -> bool {
        (self.hash_function)(
            item,
            self.params.num_hashes,
            self.params.bit_vector_size,
        )
        .into_iter()
        .all(|idx| self.bits[idx as usize])
    }

    /// Reset to an empty filter, keeping the allocation.
    pub fn clear(&mut self) {
        self.bits.fill(false);
        self.insert_count = 0;
    }

    pub fn params(&self) -> &BloomParams {
        &self.params
    }

    pub fn insert_count(&self) -> usize {
        self.insert_count
    }

    pub fn is_empty(&self) -> bool {
        self.insert_count == 0
    }

    pub fn memory_bytes(&self) -> usize {
        self.params.memory_bytes()
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter {{ capacity: {}, false_positive_rate: {}, bits: {}, num_hashes: {}, inserted: {} }}",
            self.params.capacity,
            self.params.false_positive_rate,
            self.params.bit_vector_size,
            self.params.num_hashes,
            self.insert_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut filter = BloomFilter::new(1000, 0.0001).unwrap();

        filter.insert(b"some data");
        filter.insert(b"another data");
        assert!(filter.contains(b"some data"));
        assert!(filter.contains(b"another data"));
        assert!(!filter.contains(b"some"));
        assert!(!filter.contains(b"another"));
        assert_eq!(filter.insert_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut filter = BloomFilter::new(100, 0.01).unwrap();
        filter.insert(b"item1");
        assert!(filter.contains(b"item1"));

        filter.clear();
        assert!(filter.is_empty());
        assert!(!filter.contains(b"item1"));
    }

    #[test]
    fn test_invalid_params() {
        assert!(matches!(
            BloomFilter::new(0, 0.01),
            Err(WitnessError::ZeroCapacity)
        ));
        for rate in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                BloomFilter::new(10, rate),
                Err(WitnessError::InvalidFalsePositiveRate { .. })
            ));
        }
    }

    #[test]
    fn test_memory_matches_bit_vector() {
        let params = BloomParams::new(1000, 0.01).unwrap();
        assert_eq!(params.memory_bytes(), params.bit_vector_size.div_ceil(8));
    }
}
