//! Board configuration - the parameters every generation stage reads.

mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::node_types::{CategoryWeights, NodeCategory};

/// Default per-level node counts.
pub const DEFAULT_LEVEL_SCHEDULE: [usize; 17] = [1, 1, 3, 3, 3, 1, 1, 3, 4, 4, 3, 1, 1, 3, 3, 3, 1];

/// Default probability that a node draws two outgoing edges.
pub const DEFAULT_DOUBLE_EDGE_PROBABILITY: f64 = 0.18;

/// Role a level plays on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LevelKind {
    #[default]
    Normal,
    Boss,
    Gambling,
}

impl LevelKind {
    /// Kind of the level at a 0-based index, given 1-based tag sets.
    /// Boss wins over gambling when both tag a level.
    pub fn for_level(
        level_index: usize,
        boss_levels: &BTreeSet<usize>,
        gambling_levels: &BTreeSet<usize>,
    ) -> Self {
        let number = level_index + 1;
        if boss_levels.contains(&number) {
            LevelKind::Boss
        } else if gambling_levels.contains(&number) {
            LevelKind::Gambling
        } else {
            LevelKind::Normal
        }
    }
}

/// Generator parameters.
///
/// Boss and gambling levels are 1-based level numbers: `3` tags the level at index 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Node count of each level, in level order.
    pub level_schedule: Vec<usize>,

    /// 1-based levels whose nodes are all typed `Boss`.
    pub boss_levels: BTreeSet<usize>,

    /// 1-based levels whose nodes are all typed `Gambling`.
    pub gambling_levels: BTreeSet<usize>,

    pub category_weights: CategoryWeights,

    /// Probability that a node draws two outgoing edges instead of one.
    pub double_edge_probability: f64,

    /// Bound of the uniform lateral jitter, applied as `[-jitter, jitter]`.
    pub jitter: f64,

    /// Distance between evenly spaced nodes of a level before jitter.
    pub lateral_spacing: f64,

    /// Seed for reproducible boards. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            level_schedule: DEFAULT_LEVEL_SCHEDULE.to_vec(),
            boss_levels: [6, 12, 17].into_iter().collect(),
            gambling_levels: [7, 13].into_iter().collect(),
            category_weights: CategoryWeights::default(),
            double_edge_probability: DEFAULT_DOUBLE_EDGE_PROBABILITY,
            jitter: 0.35,
            lateral_spacing: 1.0,
            seed: None,
        }
    }
}

impl BoardConfig {
    /// Create a configuration with the given schedule and default everything else,
    /// including no boss or gambling levels.
    pub fn with_schedule(level_schedule: Vec<usize>) -> Self {
        Self {
            level_schedule,
            boss_levels: BTreeSet::new(),
            gambling_levels: BTreeSet::new(),
            ..Default::default()
        }
    }

    /// Tag 1-based levels as boss levels.
    pub fn with_boss_levels(mut self, levels: impl IntoIterator<Item = usize>) -> Self {
        self.boss_levels = levels.into_iter().collect();
        self
    }

    /// Tag 1-based levels as gambling levels.
    pub fn with_gambling_levels(mut self, levels: impl IntoIterator<Item = usize>) -> Self {
        self.gambling_levels = levels.into_iter().collect();
        self
    }

    /// Set the double edge probability.
    pub fn with_double_edge_probability(mut self, probability: f64) -> Self {
        self.double_edge_probability = probability;
        self
    }

    /// Set the category weights.
    pub fn with_category_weights(mut self, weights: CategoryWeights) -> Self {
        self.category_weights = weights;
        self
    }

    /// Set the jitter bound.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Number of levels on the board.
    pub fn level_count(&self) -> usize {
        self.level_schedule.len()
    }

    /// Kind of the level at a 0-based index.
    pub fn level_kind(&self, level_index: usize) -> LevelKind {
        LevelKind::for_level(level_index, &self.boss_levels, &self.gambling_levels)
    }

    /// Check every parameter. Nothing may be generated from a configuration that fails here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level_schedule.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        if let Some(level) = self.level_schedule.iter().position(|count| *count == 0) {
            return Err(ConfigError::EmptyLevelCount { level });
        }
        if self.level_schedule[0] != 1 {
            return Err(ConfigError::StartLevelNotSingular {
                count: self.level_schedule[0],
            });
        }

        let levels = self.level_count();
        for (tag, set) in [("boss", &self.boss_levels), ("gambling", &self.gambling_levels)] {
            if let Some(level) = set.iter().find(|level| **level == 0 || **level > levels) {
                return Err(ConfigError::TaggedLevelOutOfRange {
                    tag,
                    level: *level,
                    levels,
                });
            }
        }

        if !(0.0..=1.0).contains(&self.double_edge_probability) {
            return Err(ConfigError::InvalidProbability(self.double_edge_probability));
        }

        for category in NodeCategory::ALL {
            let weight = self.category_weights.weight(category);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "category_weights",
                    message: format!("{:?} weight must be finite and non-negative, got {}", category, weight),
                });
            }
        }
        if self.category_weights.total() <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "category_weights",
                message: "at least one category needs a positive weight".to_string(),
            });
        }

        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "jitter",
                message: format!("must be finite and non-negative, got {}", self.jitter),
            });
        }
        if !self.lateral_spacing.is_finite() || self.lateral_spacing <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "lateral_spacing",
                message: format!("must be finite and positive, got {}", self.lateral_spacing),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.level_count(), 17);
        assert_eq!(config.double_edge_probability, 0.18);
    }

    #[test]
    fn test_level_kind_is_one_based() {
        let config = BoardConfig::with_schedule(vec![1, 3, 1]).with_boss_levels([3]);
        assert_eq!(config.level_kind(0), LevelKind::Normal);
        assert_eq!(config.level_kind(1), LevelKind::Normal);
        assert_eq!(config.level_kind(2), LevelKind::Boss);
    }

    #[test]
    fn test_boss_wins_over_gambling() {
        let config = BoardConfig::with_schedule(vec![1, 2])
            .with_boss_levels([2])
            .with_gambling_levels([2]);
        assert_eq!(config.level_kind(1), LevelKind::Boss);
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let config = BoardConfig::with_schedule(Vec::new());
        assert!(matches!(config.validate(), Err(ConfigError::EmptySchedule)));
    }

    #[test]
    fn test_zero_count_level_rejected() {
        let config = BoardConfig::with_schedule(vec![1, 2, 0, 1]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyLevelCount { level: 2 })
        ));
    }

    #[test]
    fn test_start_level_must_be_singular() {
        let config = BoardConfig::with_schedule(vec![2, 1]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartLevelNotSingular { count: 2 })
        ));
    }

    #[test]
    fn test_tagged_level_out_of_range() {
        let config = BoardConfig::with_schedule(vec![1, 1]).with_gambling_levels([3]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TaggedLevelOutOfRange { tag: "gambling", level: 3, .. })
        ));
    }

    #[test]
    fn test_bad_probability_rejected() {
        let config = BoardConfig::with_schedule(vec![1, 1]).with_double_edge_probability(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_bad_weights_rejected() {
        let negative = BoardConfig::with_schedule(vec![1, 1]).with_category_weights(CategoryWeights {
            good: -0.1,
            neutral: 0.5,
            bad: 0.5,
        });
        assert!(matches!(negative.validate(), Err(ConfigError::InvalidValue { field: "category_weights", .. })));

        let all_zero = BoardConfig::with_schedule(vec![1, 1]).with_category_weights(CategoryWeights {
            good: 0.0,
            neutral: 0.0,
            bad: 0.0,
        });
        assert!(all_zero.validate().is_err());
    }

    #[test]
    fn test_negative_jitter_rejected() {
        let config = BoardConfig::with_schedule(vec![1, 1]).with_jitter(-1.0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { field: "jitter", .. })));
    }

    #[test]
    fn test_from_toml_partial_document() {
        let config = BoardConfig::from_toml_str(
            r#"
            level_schedule = [1, 3, 1]
            boss_levels = [3]
            gambling_levels = []
            seed = 42

            [category_weights]
            neutral = 0.1
            "#,
        )
        .unwrap();

        assert_eq!(config.level_schedule, vec![1, 3, 1]);
        assert_eq!(config.level_kind(2), LevelKind::Boss);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.category_weights.neutral, 0.1);
        assert_eq!(config.category_weights.good, 0.3);
        assert_eq!(config.double_edge_probability, DEFAULT_DOUBLE_EDGE_PROBABILITY);
    }

    #[test]
    fn test_from_toml_validates() {
        let result = BoardConfig::from_toml_str("level_schedule = []");
        assert!(matches!(result, Err(ConfigError::EmptySchedule)));

        let result = BoardConfig::from_toml_str("level_schedule = \"nope\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
