//! Configuration types for detection, deduplication and batch parsing.

use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

/// Configuration for provider detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum confidence a provider must reach to be reported.
    ///
    /// Default: 0.3.
    pub min_confidence: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
        }
    }
}

/// Tolerances for the confirmatory event similarity check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Minimum text similarity (0.0 to 1.0) between two `details` strings.
    ///
    /// Default: 0.5.
    pub text_threshold: f64,

    /// Maximum odometer difference in miles when both readings are present.
    ///
    /// Default: 1000.
    pub odometer_tolerance: u32,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            text_threshold: 0.5,
            odometer_tolerance: 1000,
        }
    }
}

/// Configuration for batch ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum documents parsed at once on the blocking pool.
    ///
    /// Default: 4.
    pub max_concurrent_parses: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_concurrent_parses: 4,
        }
    }
}

/// Top-level configuration for the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub detection: DetectionConfig,
    pub similarity: SimilarityConfig,
    pub ingest: IngestConfig,
}

impl CoreConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load defaults overridden by environment variables.
    ///
    /// Reads `.env` if present, then `VHR_MIN_CONFIDENCE`,
    /// `VHR_SIMILARITY_THRESHOLD`, `VHR_ODOMETER_TOLERANCE` and
    /// `VHR_MAX_CONCURRENT_PARSES`. Unset variables keep their defaults.
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`CoreConfig::from_env`] but with an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var::<f32>(&lookup, "VHR_MIN_CONFIDENCE")? {
            config = config.with_min_confidence(v);
        }
        if let Some(v) = parse_var::<f64>(&lookup, "VHR_SIMILARITY_THRESHOLD")? {
            config = config.with_similarity_threshold(v);
        }
        if let Some(v) = parse_var::<u32>(&lookup, "VHR_ODOMETER_TOLERANCE")? {
            config = config.with_odometer_tolerance(v);
        }
        if let Some(v) = parse_var::<usize>(&lookup, "VHR_MAX_CONCURRENT_PARSES")? {
            config = config.with_max_concurrent_parses(v);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the detection confidence floor.
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.detection.min_confidence = min_confidence;
        self
    }

    /// Set the text similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity.text_threshold = threshold;
        self
    }

    /// Set the odometer tolerance for similar events.
    pub fn with_odometer_tolerance(mut self, miles: u32) -> Self {
        self.similarity.odometer_tolerance = miles;
        self
    }

    /// Set the batch parse concurrency.
    pub fn with_max_concurrent_parses(mut self, max: usize) -> Self {
        self.ingest.max_concurrent_parses = max;
        self
    }

    /// Check that every value is within its allowed range.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.detection.min_confidence) {
            return Err(ConfigError::OutOfRange {
                key: "VHR_MIN_CONFIDENCE".to_string(),
                reason: "must be between 0 and 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.similarity.text_threshold) {
            return Err(ConfigError::OutOfRange {
                key: "VHR_SIMILARITY_THRESHOLD".to_string(),
                reason: "must be between 0 and 1".to_string(),
            });
        }
        if self.ingest.max_concurrent_parses == 0 {
            return Err(ConfigError::OutOfRange {
                key: "VHR_MAX_CONCURRENT_PARSES".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> ConfigResult<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}
