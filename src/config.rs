//! Analyzer configuration
//!
//! Weights and strategy are fixed for the lifetime of an analyzer. Every way
//! of obtaining an [`AnalyzerConfig`] (builder, JSON) validates it, so weight
//! errors surface at load time and never during a query.
//!
//! ```rust
//! use bloodline::config::AnalyzerConfig;
//! use bloodline::derivation::DerivationStrategy;
//!
//! let config = AnalyzerConfig::from_json_str(
//!     r#"{ "strategy": "relative_cross_trait" }"#,
//! )?;
//! assert_eq!(config.strategy, DerivationStrategy::RelativeCrossTrait);
//! # Ok::<(), bloodline::Error>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateWeights;
use crate::blend::BlendWeights;
use crate::derivation::DerivationStrategy;
use crate::{Error, Result};

/// Full engine configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Sire/damsire weights for the trait blend
    pub blend: BlendWeights,
    /// Derivation algorithm
    pub strategy: DerivationStrategy,
    /// Bloodline index weights
    pub aggregate: AggregateWeights,
}

impl AnalyzerConfig {
    /// Create a configuration builder
    #[must_use]
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Check every weight set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeights` on the first failing weight set.
    pub fn validate(&self) -> Result<()> {
        self.blend.validate()?;
        self.aggregate.validate()
    }

    /// Parse and validate a JSON configuration.
    ///
    /// Missing sections fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `Json` on malformed input and `InvalidWeights` on bad weights.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as [`Self::from_json_str`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Builder for `AnalyzerConfig`
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    blend: Option<(f64, f64)>,
    strategy: DerivationStrategy,
    aggregate: AggregateWeights,
}

impl AnalyzerConfigBuilder {
    /// Set sire/damsire weights (default 0.6 / 0.4)
    #[must_use]
    pub const fn blend_weights(mut self, sire: f64, damsire: f64) -> Self {
        self.blend = Some((sire, damsire));
        self
    }

    /// Set the derivation strategy (default direct-weighted)
    #[must_use]
    pub const fn strategy(mut self, strategy: DerivationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the bloodline index weights (default: without distance)
    #[must_use]
    pub const fn aggregate_weights(mut self, weights: AggregateWeights) -> Self {
        self.aggregate = weights;
        self
    }

    /// Shorthand for the index scheme with a distance term
    #[must_use]
    pub const fn with_distance_term(self) -> Self {
        self.aggregate_weights(AggregateWeights::with_distance())
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeights` if any weight set is rejected
    pub fn build(self) -> Result<AnalyzerConfig> {
        let blend = match self.blend {
            Some((sire, damsire)) => BlendWeights::new(sire, damsire)?,
            None => BlendWeights::default(),
        };
        let config = AnalyzerConfig {
            blend,
            strategy: self.strategy,
            aggregate: self.aggregate,
        };
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<&str> for AnalyzerConfig {
    type Error = Error;

    fn try_from(json: &str) -> Result<Self> {
        Self::from_json_str(json)
    }
}
