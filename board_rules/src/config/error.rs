//! Configuration errors.

/// Reasons a [`BoardConfig`](super::BoardConfig) is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("level schedule is empty")]
    EmptySchedule,

    #[error("level {level} has no nodes")]
    EmptyLevelCount { level: usize },

    #[error("level 0 must hold exactly one start node, found {count}")]
    StartLevelNotSingular { count: usize },

    #[error("{tag} level {level} is outside the schedule (1..={levels})")]
    TaggedLevelOutOfRange {
        tag: &'static str,
        level: usize,
        levels: usize,
    },

    #[error("double edge probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("failed to parse board configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read board configuration: {0}")]
    Io(#[from] std::io::Error),
}
