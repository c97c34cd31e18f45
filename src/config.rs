use crate::error::{Result, WitnessError};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Live filters in the probabilistic bank when not configured otherwise.
pub const DEFAULT_LIVE_FILTERS: usize = 8;

/// Which witness memory to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Ring buffer of fingerprints, exact answers.
    Deterministic,
    /// Rotating Bloom filter bank, false positives possible.
    #[default]
    Probabilistic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Deterministic => f.write_str("deterministic"),
            Strategy::Probabilistic => f.write_str("probabilistic"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deterministic" | "d" => Ok(Strategy::Deterministic),
            "probabilistic" | "p" => Ok(Strategy::Probabilistic),
            other => Err(format!(
                "unknown strategy '{other}', expected 'deterministic' or 'probabilistic'"
            )),
        }
    }
}

/// Configuration for building a [`crate::WitnessEngine`].
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned", derive(Clone))]
pub struct WitnessConfig {
    #[builder(default)]
    pub strategy: Strategy,

    /// Number of most recent admissions the memory remembers
    #[builder(default = "1_000_000")]
    pub capacity: usize,

    /// Target overall false positive rate (probabilistic only)
    #[builder(default = "0.000_001")]
    pub false_positive_rate: f64,

    /// Live filters K in the probabilistic bank (K + 1 are allocated)
    #[builder(default = "DEFAULT_LIVE_FILTERS")]
    pub live_filters: usize,
}

impl Default for WitnessConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            capacity: 1_000_000,
            false_positive_rate: 0.000_001,
            live_filters: DEFAULT_LIVE_FILTERS,
        }
    }
}

impl WitnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(WitnessError::ZeroCapacity);
        }
        if self.strategy == Strategy::Probabilistic {
            if self.live_filters == 0 {
                return Err(WitnessError::ZeroLiveFilters);
            }
            validate_fpr(self.false_positive_rate)?;
        }
        Ok(())
    }

    /// Build a config from `WITNESS_*` environment variables, loading `.env`
    /// first. Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`WitnessConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            strategy: parse_var(&lookup, "WITNESS_STRATEGY", defaults.strategy)?,
            capacity: parse_var(&lookup, "WITNESS_CAPACITY", defaults.capacity)?,
            false_positive_rate: parse_var(
                &lookup,
                "WITNESS_FALSE_POSITIVE_RATE",
                defaults.false_positive_rate,
            )?,
            live_filters: parse_var(
                &lookup,
                "WITNESS_LIVE_FILTERS",
                defaults.live_filters,
            )?,
        })
    }
}

pub(crate) fn validate_fpr(rate: f64) -> Result<()> {
    // written so NaN is rejected too
    if !(rate > 0.0 && rate < 1.0) {
        return Err(WitnessError::InvalidFalsePositiveRate { rate });
    }
    Ok(())
}

fn parse_var<F, T>(lookup: &F, var_name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(var_name) {
        Some(value) => {
            value
                .trim()
                .parse()
                .map_err(|e: T::Err| WitnessError::EnvParseError {
                    var_name: var_name.to_string(),
                    value: value.clone(),
                    error: e.to_string(),
                })
        }
        None => Ok(default),
    }
}
