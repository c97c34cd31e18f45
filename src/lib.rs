//! Sliding-window witness memory: "has this data been seen recently?"
//!
//! Records are reduced to SHA-256 fingerprints and checked against a bounded
//! window of the most recent admissions. Witnessing both answers and admits,
//! so a stream can be deduplicated by witnessing each record once.
//!
//! Two memories implement [`Witness`]:
//!    * [`DeterministicWitness`]: ring buffer of fingerprints plus an index.
//!      Exact answers over the last `capacity` admissions. A repeated record
//!      refreshes its residency, so it never ages out while it keeps coming.
//!    * [`ProbabilisticWitness`]: bank of `K + 1` Bloom filters rotated every
//!      `capacity / K` admissions. An order of magnitude less memory, no false
//!      negatives inside the window, false positives bounded by the configured
//!      rate.
//!
//! Both are thread safe: each keeps its state behind one mutex, and every
//! witness call is a single critical section.
//!
//! ```
//! use witness_memory::{DeterministicWitness, Witness};
//!
//! let memory = DeterministicWitness::new(1024).unwrap();
//! assert!(!memory.witness(b"foo"));
//! assert!(memory.witness(b"foo"));
//! ```

pub mod bloom;
pub mod common;
mod config;
mod deterministic;
mod engine;
mod error;
mod estimate;
mod fingerprint;
mod hash;
mod probabilistic;
pub mod stream;
mod witness;

pub use config::{
    DEFAULT_LIVE_FILTERS, Strategy, WitnessConfig, WitnessConfigBuilder,
    WitnessConfigBuilderError,
};
pub use deterministic::DeterministicWitness;
pub use engine::WitnessEngine;
pub use error::{Result, WitnessError};
pub use estimate::{MemoryEstimate, estimate_memory};
pub use fingerprint::{FINGERPRINT_LEN, Fingerprint};
pub use hash::{
    HashFunction, compound_fpr, default_hash_function, optimal_bit_vector_size,
    optimal_num_hashes, per_filter_fpr,
};
pub use probabilistic::ProbabilisticWitness;
pub use witness::{Witness, WitnessStats};

/// Crate version, as reported by the `witness` binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
