use thiserror::Error;

pub type Result<T> = std::result::Result<T, WitnessError>;

#[derive(Error, Debug)]
pub enum WitnessError {
    #[error("Capacity must be greater than 0")]
    ZeroCapacity,

    #[error("Number of live filters must be greater than 0")]
    ZeroLiveFilters,

    #[error("False positive rate must be between 0 and 1, got {rate}")]
    InvalidFalsePositiveRate { rate: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse environment variable {var_name}: value '{value}' - {error}")]
    EnvParseError {
        var_name: String,
        value: String,
        error: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WitnessError {
    /// True for every variant raised by config validation.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            WitnessError::ZeroCapacity
                | WitnessError::ZeroLiveFilters
                | WitnessError::InvalidFalsePositiveRate { .. }
                | WitnessError::InvalidConfig(_)
                | WitnessError::EnvParseError { .. }
        )
    }
}
