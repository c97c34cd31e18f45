//! Memory footprint estimates for a configuration, without allocating it.

use crate::bloom::BloomParams;
use crate::common::bytes2hr;
use crate::config::{Strategy, WitnessConfig};
use crate::error::{Result, WitnessError};
use crate::fingerprint::FINGERPRINT_LEN;
use crate::hash::per_filter_fpr;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryEstimate {
    pub strategy: Strategy,
    pub capacity: usize,
    pub bytes: usize,
    pub human: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits_per_filter: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes_per_filter: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_filter_fpr: Option<f64>,
}

pub fn estimate_memory(config: &WitnessConfig) -> Result<MemoryEstimate> {
    config.validate()?;

    let estimate = match config.strategy {
        Strategy::Deterministic => {
            // hash map entries: key, slot and a control byte, at 7/8 load
            let entry = FINGERPRINT_LEN + std::mem::size_of::<usize>() + 1;
            let bytes = config
                .capacity
                .checked_mul(entry)
                .and_then(|index| index.div_ceil(7).checked_mul(8))
                .and_then(|index| {
                    config
                        .capacity
                        .checked_mul(FINGERPRINT_LEN)?
                        .checked_add(index)
                })
                .ok_or_else(|| too_large(config))?;

            MemoryEstimate {
                strategy: config.strategy,
                capacity: config.capacity,
                bytes,
                human: bytes2hr(bytes),
                filters: None,
                bits_per_filter: None,
                hashes_per_filter: None,
                per_filter_fpr: None,
            }
        }
        Strategy::Probabilistic => {
            let filters = config.live_filters + 1;
            let params = BloomParams::new(
                config.capacity.div_ceil(config.live_filters),
                per_filter_fpr(config.false_positive_rate, filters),
            )?;
            let bytes = filters
                .checked_mul(params.memory_bytes())
                .ok_or_else(|| too_large(config))?;

            MemoryEstimate {
                strategy: config.strategy,
                capacity: config.capacity,
                bytes,
                human: bytes2hr(bytes),
                filters: Some(filters),
                bits_per_filter: Some(params.bit_vector_size),
                hashes_per_filter: Some(params.num_hashes),
                per_filter_fpr: Some(params.false_positive_rate),
            }
        }
    };

    Ok(estimate)
}

fn too_large(config: &WitnessConfig) -> WitnessError {
    WitnessError::InvalidConfig(format!(
        "memory for capacity {} exceeds the address space",
        config.capacity
    ))
}

impl std::fmt::Display for MemoryEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Strategy: {}", self.strategy)?;
        writeln!(f, "Capacity: {}", self.capacity)?;
        if let (Some(filters), Some(bits), Some(hashes), Some(fpr)) = (
            self.filters,
            self.bits_per_filter,
            self.hashes_per_filter,
            self.per_filter_fpr,
        ) {
            writeln!(f, "Filters: {filters}")?;
            writeln!(f, "Bits per filter: {bits}")?;
            writeln!(f, "Hashes per filter: {hashes}")?;
            writeln!(f, "False positive rate per filter: {fpr:.3e}")?;
        }
        write!(f, "Estimated memory: {} ({} bytes)", self.human, self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WitnessConfigBuilder;
    use crate::{DeterministicWitness, ProbabilisticWitness, WitnessStats};

    #[test]
    fn test_probabilistic_estimate_matches_engine() {
        let config = WitnessConfigBuilder::default()
            .capacity(10_000)
            .false_positive_rate(0.001)
            .build()
            .unwrap();
        let estimate = estimate_memory(&config).unwrap();
        let memory = ProbabilisticWitness::new(10_000, 0.001).unwrap();

        assert_eq!(estimate.bytes, memory.memory_bytes());
        assert_eq!(estimate.filters, Some(9));
    }

    #[test]
    fn test_deterministic_estimate_in_range_of_engine() {
        let config = WitnessConfigBuilder::default()
            .strategy(Strategy::Deterministic)
            .capacity(10_000)
            .build()
            .unwrap();
        let estimate = estimate_memory(&config).unwrap();
        let memory = DeterministicWitness::new(10_000).unwrap();

        let actual = memory.memory_bytes() as f64;
        let ratio = estimate.bytes as f64 / actual;
        assert!((0.5..2.0).contains(&ratio), "ratio {ratio}");
        assert!(estimate.filters.is_none());
    }

    #[test]
    fn test_probabilistic_is_much_smaller() {
        let base = WitnessConfigBuilder::default().capacity(1_000_000);
        let probabilistic = estimate_memory(&base.clone().build().unwrap())
            .unwrap()
            .bytes;
        let deterministic = estimate_memory(
            &base.strategy(Strategy::Deterministic).build().unwrap(),
        )
        .unwrap()
        .bytes;
        assert!(probabilistic * 10 < deterministic);
    }

    #[test]
    fn test_capacity_beyond_address_space_is_config_error() {
        for strategy in [Strategy::Deterministic, Strategy::Probabilistic] {
            let config = WitnessConfigBuilder::default()
                .strategy(strategy)
                .capacity(usize::MAX)
                .build()
                .unwrap();
            let err = estimate_memory(&config).unwrap_err();
            assert!(matches!(err, WitnessError::InvalidConfig(_)), "{err:?}");
        }
    }

    #[test]
    fn test_json_skips_filter_fields_for_deterministic() {
        let config = WitnessConfigBuilder::default()
            .strategy(Strategy::Deterministic)
            .capacity(8)
            .build()
            .unwrap();
        let json =
            serde_json::to_string(&estimate_memory(&config).unwrap()).unwrap();
        assert!(json.contains("\"strategy\":\"deterministic\""));
        assert!(!json.contains("filters"));
    }
}
