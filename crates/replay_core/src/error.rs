use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No timeline events to analyze")]
    MissingTimeline,

    #[error("Invalid match duration: {duration}")]
    InvalidDuration { duration: f64 },

    #[error("Player not found in replay: slot {slot}")]
    PlayerNotFound { slot: u32 },

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Whether a batch run may skip the failing player and keep going.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AnalysisError::MissingTimeline => true,
            AnalysisError::InvalidDuration { .. } => true,
            AnalysisError::PlayerNotFound { .. } => true,
            AnalysisError::Cancelled => false,
            AnalysisError::Serialization(_) => false,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
