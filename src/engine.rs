use crate::config::{Strategy, WitnessConfig};
use crate::deterministic::DeterministicWitness;
use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::probabilistic::ProbabilisticWitness;
use crate::witness::{Witness, WitnessStats};

/// Either witness memory, chosen once from a [`WitnessConfig`].
#[derive(Debug)]
pub enum WitnessEngine {
    Deterministic(DeterministicWitness),
    Probabilistic(ProbabilisticWitness),
}

impl WitnessEngine {
    pub fn new(config: &WitnessConfig) -> Result<Self> {
        config.validate()?;

        Ok(match config.strategy {
            Strategy::Deterministic => Self::Deterministic(
                DeterministicWitness::new(config.capacity)?,
            ),
            Strategy::Probabilistic => {
                Self::Probabilistic(ProbabilisticWitness::with_live_filters(
                    config.capacity,
                    config.false_positive_rate,
                    config.live_filters,
                )?)
            }
        })
    }

    pub fn deterministic(capacity: usize) -> Result<Self> {
        Ok(Self::Deterministic(DeterministicWitness::new(capacity)?))
    }

    pub fn probabilistic(
        capacity: usize,
        false_positive_rate: f64,
    ) -> Result<Self> {
        Ok(Self::Probabilistic(ProbabilisticWitness::new(
            capacity,
            false_positive_rate,
        )?))
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Deterministic(_) => Strategy::Deterministic,
            Self::Probabilistic(_) => Strategy::Probabilistic,
        }
    }
}

impl From<DeterministicWitness> for WitnessEngine {
    fn from(memory: DeterministicWitness) -> Self {
        Self::Deterministic(memory)
    }
}

impl From<ProbabilisticWitness> for WitnessEngine {
    fn from(memory: ProbabilisticWitness) -> Self {
        Self::Probabilistic(memory)
    }
}

impl Witness for WitnessEngine {
    fn witness_digest(&self, fingerprint: &Fingerprint) -> bool {
        match self {
            Self::Deterministic(memory) => memory.witness_digest(fingerprint),
            Self::Probabilistic(memory) => memory.witness_digest(fingerprint),
        }
    }
}

impl WitnessStats for WitnessEngine {
    fn contains_digest(&self, fingerprint: &Fingerprint) -> bool {
        match self {
            Self::Deterministic(memory) => memory.contains_digest(fingerprint),
            Self::Probabilistic(memory) => memory.contains_digest(fingerprint),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            Self::Deterministic(memory) => memory.capacity(),
            Self::Probabilistic(memory) => memory.capacity(),
        }
    }

    fn admissions(&self) -> u64 {
        match self {
            Self::Deterministic(memory) => memory.admissions(),
            Self::Probabilistic(memory) => memory.admissions(),
        }
    }

    fn memory_bytes(&self) -> usize {
        match self {
            Self::Deterministic(memory) => memory.memory_bytes(),
            Self::Probabilistic(memory) => memory.memory_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WitnessConfigBuilder;
    use crate::error::WitnessError;

    #[test]
    fn test_strategy_selected_from_config() {
        let config = WitnessConfigBuilder::default()
            .strategy(Strategy::Deterministic)
            .capacity(16)
            .build()
            .unwrap();
        let engine = WitnessEngine::new(&config).unwrap();
        assert_eq!(engine.strategy(), Strategy::Deterministic);
        assert_eq!(engine.capacity(), 16);

        let config = WitnessConfigBuilder::default()
            .capacity(16)
            .false_positive_rate(0.01)
            .build()
            .unwrap();
        let engine = WitnessEngine::new(&config).unwrap();
        assert_eq!(engine.strategy(), Strategy::Probabilistic);
    }

    #[test]
    fn test_deterministic_ignores_fpr() {
        // rate is only meaningful for the probabilistic strategy
        let config = WitnessConfigBuilder::default()
            .strategy(Strategy::Deterministic)
            .capacity(4)
            .false_positive_rate(0.0)
            .build()
            .unwrap();
        assert!(WitnessEngine::new(&config).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WitnessConfigBuilder::default()
            .capacity(0)
            .build()
            .unwrap();
        assert!(matches!(
            WitnessEngine::new(&config),
            Err(WitnessError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_witness_dispatch() {
        for engine in [
            WitnessEngine::deterministic(8).unwrap(),
            WitnessEngine::probabilistic(8, 0.001).unwrap(),
        ] {
            assert!(!engine.witness(b"x"));
            assert!(engine.witness(b"x"));
            assert!(engine.witness_digest(&Fingerprint::of(b"x")));
            assert_eq!(engine.admissions(), 3);
        }
    }
}
