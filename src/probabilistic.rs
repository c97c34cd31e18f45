//! Approximate witness memory backed by a rotating bank of Bloom filters.
//!
//! HowTo:
//!    * Bank: `K` live filters plus one being filled, each sized for
//!      `ceil(capacity / K)` entries.
//!    * Insertion: a fingerprint always goes into the active filter, even when
//!      an older filter already knows it, so it survives that filter's rotation.
//!    * Query: positive if any filter in the bank reports positive.
//!    * Rotation: once the active filter took its quota, the next slot in the
//!      bank is cleared and becomes active. The filter cleared is the oldest,
//!      which is how entries age out.
//!
//! False positives compound over the `K + 1` filters, so each filter is built
//! with [`per_filter_fpr`] of the requested overall rate.

use crate::bloom::{BloomFilter, BloomParams};
use crate::config::{DEFAULT_LIVE_FILTERS, validate_fpr};
use crate::error::{Result, WitnessError};
use crate::fingerprint::Fingerprint;
use crate::hash::per_filter_fpr;
use crate::witness::{Witness, WitnessStats};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

struct FilterBank {
    filters: Vec<BloomFilter>,
    active: usize,
    active_count: usize,
    admissions: u64,
    rotations: u64,
}

impl FilterBank {
    fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.filters
            .iter()
            .any(|filter| filter.contains(fingerprint.as_ref()))
    }

    fn admit(&mut self, fingerprint: &Fingerprint, quota: usize) -> bool {
        let familiar = self.contains(fingerprint);

        self.filters[self.active].insert(fingerprint.as_ref());
        self.active_count += 1;
        self.admissions += 1;

        if self.active_count >= quota {
            self.rotate();
        }

        familiar
    }

    fn rotate(&mut self) {
        self.active = (self.active + 1) % self.filters.len();
        self.filters[self.active].clear();
        self.active_count = 0;
        self.rotations += 1;
        trace!(
            active = self.active,
            rotations = self.rotations,
            "rotated filter bank"
        );
    }
}

/// Bloom filter bank witness memory. No false negatives for entries still in
/// the window; false positives bounded by the configured rate.
pub struct ProbabilisticWitness {
    capacity: usize,
    false_positive_rate: f64,
    live_filters: usize,
    quota: usize,
    params: BloomParams,
    bank: Mutex<FilterBank>,
}

impl ProbabilisticWitness {
    /// Remember roughly the most recent `capacity` admissions with an overall
    /// false positive rate of `false_positive_rate`, using the default number
    /// of live filters.
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self> {
        Self::with_live_filters(
            capacity,
            false_positive_rate,
            DEFAULT_LIVE_FILTERS,
        )
    }

    pub fn with_live_filters(
        capacity: usize,
        false_positive_rate: f64,
        live_filters: usize,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(WitnessError::ZeroCapacity);
        }
        if live_filters == 0 {
            return Err(WitnessError::ZeroLiveFilters);
        }
        validate_fpr(false_positive_rate)?;

        let quota = capacity.div_ceil(live_filters);
        let total_filters = live_filters + 1;
        let params = BloomParams::new(
            quota,
            per_filter_fpr(false_positive_rate, total_filters),
        )?;

        debug!(
            capacity,
            false_positive_rate,
            live_filters,
            quota,
            bits_per_filter = params.bit_vector_size,
            hashes_per_filter = params.num_hashes,
            "creating probabilistic witness memory"
        );

        let filters = (0..total_filters)
            .map(|_| BloomFilter::with_params(params))
            .collect();

        Ok(Self {
            capacity,
            false_positive_rate,
            live_filters,
            quota,
            params,
            bank: Mutex::new(FilterBank {
                filters,
                active: 0,
                active_count: 0,
                admissions: 0,
                rotations: 0,
            }),
        })
    }

    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    pub fn live_filters(&self) -> usize {
        self.live_filters
    }

    /// Filters allocated in the bank, live ones plus the one being filled.
    pub fn filter_count(&self) -> usize {
        self.live_filters + 1
    }

    /// Admissions each filter takes before the bank rotates.
    pub fn quota(&self) -> usize {
        self.quota
    }

    pub fn per_filter_params(&self) -> &BloomParams {
        &self.params
    }

    pub fn active_filter(&self) -> usize {
        self.lock().active
    }

    pub fn active_count(&self) -> usize {
        self.lock().active_count
    }

    pub fn rotations(&self) -> u64 {
        self.lock().rotations
    }

    fn lock(&self) -> MutexGuard<'_, FilterBank> {
        // no panicking code runs while the bank is held
        self.bank.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Witness for ProbabilisticWitness {
    fn witness_digest(&self, fingerprint: &Fingerprint) -> bool {
        self.lock().admit(fingerprint, self.quota)
    }
}

impl WitnessStats for ProbabilisticWitness {
    fn contains_digest(&self, fingerprint: &Fingerprint) -> bool {
        self.lock().contains(fingerprint)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn admissions(&self) -> u64 {
        self.lock().admissions
    }

    fn memory_bytes(&self) -> usize {
        self.filter_count() * self.params.memory_bytes()
    }
}

impl std::fmt::Debug for ProbabilisticWitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bank = self.lock();
        f.debug_struct("ProbabilisticWitness")
            .field("capacity", &self.capacity)
            .field("false_positive_rate", &self.false_positive_rate)
            .field("live_filters", &self.live_filters)
            .field("quota", &self.quota)
            .field("bits_per_filter", &self.params.bit_vector_size)
            .field("active", &bank.active)
            .field("active_count", &bank.active_count)
            .field("admissions", &bank.admissions)
            .finish()
    }
}
