//! Exact witness memory over the last `capacity` admissions.
//!
//! Fingerprints live in a ring buffer. A side index maps every resident
//! fingerprint to the newest slot holding it, so lookups and eviction
//! bookkeeping are O(1). The ring is authoritative; the index only ever points
//! at slots whose current value is the key.

use crate::error::{Result, WitnessError};
use crate::fingerprint::{FINGERPRINT_LEN, Fingerprint};
use crate::witness::{Witness, WitnessStats};
use fnv::FnvBuildHasher;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

struct Ring {
    slots: Vec<Fingerprint>,
    cursor: usize,
    index: HashMap<Fingerprint, usize, FnvBuildHasher>,
    admissions: u64,
}

impl Ring {
    fn admit(&mut self, fingerprint: Fingerprint, capacity: usize) -> bool {
        let familiar = self.index.contains_key(&fingerprint);
        let slot = self.cursor;

        if self.slots.len() < capacity {
            // still filling, nothing to overwrite
            self.slots.push(fingerprint);
        } else {
            let evicted = self.slots[slot];
            if self.index.get(&evicted) == Some(&slot) {
                self.index.remove(&evicted);
                trace!(slot, fingerprint = %evicted, "evicted from ring");
            }
            self.slots[slot] = fingerprint;
        }

        self.index.insert(fingerprint, slot);
        self.cursor = (slot + 1) % capacity;
        self.admissions += 1;

        familiar
    }
}

/// Ring buffer witness memory with exact answers.
pub struct DeterministicWitness {
    capacity: usize,
    ring: Mutex<Ring>,
}

impl DeterministicWitness {
    /// Remember the most recent `capacity` admissions. Zero is rejected.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(WitnessError::ZeroCapacity);
        }

        debug!(capacity, "creating deterministic witness memory");

        Ok(Self {
            capacity,
            ring: Mutex::new(Ring {
                slots: Vec::with_capacity(capacity),
                cursor: 0,
                index: HashMap::with_capacity_and_hasher(
                    capacity,
                    FnvBuildHasher::default(),
                ),
                admissions: 0,
            }),
        })
    }

    /// Number of distinct fingerprints currently in the window.
    pub fn len(&self) -> usize {
        self.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }

    /// Slot the next admission will overwrite.
    pub fn cursor(&self) -> usize {
        self.lock().cursor
    }

    fn lock(&self) -> MutexGuard<'_, Ring> {
        // admit() never panics midway, so a poisoned ring is still consistent
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Witness for DeterministicWitness {
    fn witness_digest(&self, fingerprint: &Fingerprint) -> bool {
        self.lock().admit(*fingerprint, self.capacity)
    }
}

impl WitnessStats for DeterministicWitness {
    fn contains_digest(&self, fingerprint: &Fingerprint) -> bool {
        self.lock().index.contains_key(fingerprint)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn admissions(&self) -> u64 {
        self.lock().admissions
    }

    fn memory_bytes(&self) -> usize {
        let ring = self.lock();
        let slot_bytes = ring.slots.capacity() * FINGERPRINT_LEN;
        // key + slot + one control byte per bucket
        let entry_bytes = FINGERPRINT_LEN + std::mem::size_of::<usize>() + 1;
        slot_bytes + ring.index.capacity() * entry_bytes
    }
}

impl std::fmt::Debug for DeterministicWitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ring = self.lock();
        f.debug_struct("DeterministicWitness")
            .field("capacity", &self.capacity)
            .field("filled", &ring.slots.len())
            .field("resident", &ring.index.len())
            .field("cursor", &ring.cursor)
            .field("admissions", &ring.admissions)
            .finish()
    }
}
