mod common;

use common::test_utils::generate_test_items;
use witness_memory::{
    DeterministicWitness, Fingerprint, Witness, WitnessError, WitnessStats,
};

fn create_test_memory(capacity: usize) -> DeterministicWitness {
    DeterministicWitness::new(capacity)
        .expect("Failed to create deterministic memory")
}

#[cfg(test)]
mod basic_operations_tests {
    use super::*;

    #[test]
    fn test_first_sighting_is_unfamiliar() {
        let memory = create_test_memory(1024);
        assert!(!memory.witness(b"foo"), "foo was never witnessed");
        assert!(memory.witness(b"foo"), "foo was just witnessed");
    }

    #[test]
    fn test_empty_record_is_witnessed() {
        let memory = create_test_memory(4);
        assert!(!memory.witness(b""));
        assert!(memory.witness(b""));
    }

    #[test]
    fn test_digest_matches_hashing_path() {
        let memory = create_test_memory(16);
        let fp = Fingerprint::of(b"payload");

        assert!(!memory.witness_digest(&fp));
        assert!(memory.witness(b"payload"));

        let other = create_test_memory(16);
        assert!(!other.witness(b"payload"));
        assert!(other.witness_digest(&fp));
    }

    #[test]
    fn test_zero_capacity_is_config_error() {
        let err = DeterministicWitness::new(0).unwrap_err();
        assert!(matches!(err, WitnessError::ZeroCapacity));
        assert!(err.is_config_error());
    }
}

#[cfg(test)]
mod window_tests {
    use super::*;

    #[test]
    fn test_forgets_oldest_after_wrap() {
        let memory = create_test_memory(3);

        assert!(!memory.witness(b"foo"));
        assert!(!memory.witness(b"bar"));

        // remembers entry, refreshing it
        assert!(memory.witness(b"bar"));

        // remembers oldest entry before it gets overwritten
        assert!(memory.witness(b"foo"));

        assert!(!memory.witness(b"bam"));
        assert!(!memory.witness(b"baz"));

        // both bar slots overwritten by now
        assert!(!memory.witness(b"bar"));
    }

    #[test]
    fn test_refreshed_entry_outlives_older_one() {
        let memory = create_test_memory(2);

        assert!(!memory.witness(b"a"));
        assert!(!memory.witness(b"b"));
        assert!(memory.witness(b"a"));
        // overwrites b's slot, a was refreshed more recently
        assert!(!memory.witness(b"c"));
        assert!(!memory.witness(b"b"));
    }

    #[test]
    fn test_exact_within_window() {
        let capacity = 100;
        let memory = create_test_memory(capacity);
        let items = generate_test_items(capacity);

        for item in &items {
            assert!(!memory.witness(item));
        }
        for item in &items {
            assert!(memory.contains(item), "no false negatives in window");
        }
        assert_eq!(memory.len(), capacity);

        // one more distinct admission evicts exactly the oldest
        assert!(!memory.witness(b"newcomer"));
        assert!(!memory.contains(&items[0]));
        assert!(items[1..].iter().all(|item| memory.contains(item)));
    }

    #[test]
    fn test_never_false_positive() {
        let memory = create_test_memory(1000);
        for item in generate_test_items(5000) {
            memory.witness(&item);
        }
        for i in 0..5000 {
            let unseen = format!("unseen_{i}");
            assert!(!memory.contains(unseen.as_bytes()));
        }
    }

    #[test]
    fn test_idempotent_refresh_keeps_entry_resident() {
        let capacity = 8;
        let memory = create_test_memory(capacity);
        assert!(!memory.witness(b"keep"));

        // re-admit once per capacity - 1 distinct records, forever resident
        for round in 0..50 {
            for i in 0..capacity - 1 {
                memory.witness(format!("filler_{round}_{i}").as_bytes());
            }
            assert!(memory.witness(b"keep"), "evicted in round {round}");
        }
    }

    #[test]
    fn test_unrefreshed_entry_ages_out_after_capacity_admissions() {
        let capacity = 8;
        let memory = create_test_memory(capacity);
        memory.witness(b"once");
        for i in 0..capacity - 1 {
            memory.witness(format!("filler_{i}").as_bytes());
        }
        assert!(memory.contains(b"once"));

        memory.witness(b"one more");
        assert!(!memory.contains(b"once"));
    }
}

#[cfg(test)]
mod memory_bound_tests {
    use super::*;

    #[test]
    fn test_resident_count_never_exceeds_capacity() {
        let capacity = 64;
        let memory = create_test_memory(capacity);
        let baseline = memory.memory_bytes();

        for item in generate_test_items(10_000) {
            memory.witness(&item);
            assert!(memory.len() <= capacity);
        }
        assert_eq!(memory.len(), capacity);
        assert_eq!(memory.admissions(), 10_000);
        // bounded by capacity, not by input size
        assert!(memory.memory_bytes() <= baseline * 3);
    }

    #[test]
    fn test_repeats_shrink_resident_count() {
        let memory = create_test_memory(10);
        for _ in 0..10 {
            memory.witness(b"same");
        }
        assert_eq!(memory.len(), 1);
        assert!(!memory.is_empty());
    }
}
