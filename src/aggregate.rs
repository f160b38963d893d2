//! Bloodline index: weighted sum of trait and aptitude scores
//!
//! Two weighting schemes are in use, with and without a distance term.
//! Weights are validated when the scorer is built, never per query.

use serde::{Deserialize, Serialize};

use crate::attributes::{round2, TraitKey, TraitVector};
use crate::{Error, Result};

/// Tolerance for the weights-sum-to-one check
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weights of the bloodline index.
///
/// `distance` is `None` for the scheme without a distance term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateWeights {
    /// Speed weight
    pub speed: f64,
    /// Stamina weight
    pub stamina: f64,
    /// Power weight
    pub power: f64,
    /// Chosen-surface aptitude weight
    pub surface: f64,
    /// Chosen-distance aptitude weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl AggregateWeights {
    /// speed 0.25, stamina 0.25, power 0.2, surface 0.3
    #[must_use]
    pub const fn without_distance() -> Self {
        Self {
            speed: 0.25,
            stamina: 0.25,
            power: 0.2,
            surface: 0.3,
            distance: None,
        }
    }

    /// speed 0.2, stamina 0.25, power 0.15, surface 0.2, distance 0.2
    #[must_use]
    pub const fn with_distance() -> Self {
        Self {
            speed: 0.2,
            stamina: 0.25,
            power: 0.15,
            surface: 0.2,
            distance: Some(0.2),
        }
    }

    /// True if the scheme has a distance term.
    #[must_use]
    pub const fn uses_distance(&self) -> bool {
        self.distance.is_some()
    }

    /// Check that every weight is non-negative and they sum to 1.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeights` otherwise.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("speed", self.speed),
            ("stamina", self.stamina),
            ("power", self.power),
            ("surface", self.surface),
            ("distance", self.distance.unwrap_or(0.0)),
        ];

        if let Some((name, weight)) = named.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidWeights(format!(
                "{name} weight must be a non-negative number, got {weight}"
            )));
        }

        let sum: f64 = named.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidWeights(format!(
                "index weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

impl Default for AggregateWeights {
    fn default() -> Self {
        Self::without_distance()
    }
}

/// Computes the bloodline index from validated weights
#[derive(Debug, Clone, Copy)]
pub struct AggregateScorer {
    weights: AggregateWeights,
}

impl AggregateScorer {
    /// Create a scorer, validating the weights.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeights` if the weights are negative or do not sum to 1.
    pub fn new(weights: AggregateWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Weights in use.
    #[must_use]
    pub const fn weights(&self) -> &AggregateWeights {
        &self.weights
    }

    /// Overall index, rounded to two decimals.
    ///
    /// `traits` must hold speed, stamina and power on the 1–5 axis. `distance`
    /// is ignored by the scheme without a distance term.
    ///
    /// # Errors
    ///
    /// Returns `MissingKey` if a weighted trait is absent, and `MissingField`
    /// if the scheme needs a distance score and none was given.
    pub fn score(&self, traits: &TraitVector, surface: f64, distance: Option<f64>) -> Result<f64> {
        let w = &self.weights;
        let mut index = traits.require(TraitKey::Speed, "trait scores")? * w.speed
            + traits.require(TraitKey::Stamina, "trait scores")? * w.stamina
            + traits.require(TraitKey::Power, "trait scores")? * w.power
            + surface * w.surface;

        if let Some(weight) = w.distance {
            let distance = distance.ok_or_else(|| Error::MissingField {
                record: "query".to_string(),
                field: "distance".to_string(),
            })?;
            index += distance * weight;
        }

        Ok(round2(index))
    }
}

impl Default for AggregateScorer {
    fn default() -> Self {
        Self {
            weights: AggregateWeights::default(),
        }
    }
}
