//! Sire/damsire trait blending
//!
//! The blended profile is a weighted sum of the two parent vectors, taken
//! per trait over the fixed six-key set and rounded to two decimals.

use serde::{Deserialize, Serialize};

use crate::attributes::{round2, TraitKey, TraitVector};
use crate::{Error, Result};

/// Default sire weight
pub const DEFAULT_SIRE_WEIGHT: f64 = 0.6;

/// Default damsire weight
pub const DEFAULT_DAMSIRE_WEIGHT: f64 = 0.4;

/// Parent weights for blending.
///
/// Both weights must be finite and non-negative. They are not required to
/// sum to 1; a sum above 1 simply scales the profile up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    sire: f64,
    damsire: f64,
}

impl BlendWeights {
    /// Create validated blend weights.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeights` if either weight is negative or not finite.
    pub fn new(sire: f64, damsire: f64) -> Result<Self> {
        let weights = Self { sire, damsire };
        weights.validate()?;
        Ok(weights)
    }

    /// Check the weights (used after deserialization).
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeights` if either weight is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        for (role, weight) in [("sire", self.sire), ("damsire", self.damsire)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidWeights(format!(
                    "{role} weight must be a non-negative number, got {weight}"
                )));
            }
        }
        Ok(())
    }

    /// Sire weight.
    #[must_use]
    pub const fn sire(&self) -> f64 {
        self.sire
    }

    /// Damsire weight.
    #[must_use]
    pub const fn damsire(&self) -> f64 {
        self.damsire
    }

    /// Weighted, rounded combination of two parent values.
    #[must_use]
    pub fn combine(&self, sire: f64, damsire: f64) -> f64 {
        round2(sire.mul_add(self.sire, damsire * self.damsire))
    }
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            sire: DEFAULT_SIRE_WEIGHT,
            damsire: DEFAULT_DAMSIRE_WEIGHT,
        }
    }
}

/// Blend the sire and damsire trait vectors into one profile.
///
/// # Errors
///
/// Returns `MissingKey` if any of the six base traits is absent from either
/// parent.
///
/// # Example
///
/// ```rust
/// use bloodline::attributes::{TraitKey, TraitVector};
/// use bloodline::blend::{blend, BlendWeights};
///
/// let sire = TraitVector::from_array([5.0, 3.0, 4.0, 2.0, 1.0, 5.0]);
/// let damsire = TraitVector::from_array([3.0, 5.0, 2.0, 4.0, 3.0, 1.0]);
///
/// let blended = blend(&sire, &damsire, BlendWeights::default())?;
/// assert_eq!(blended.value(TraitKey::Speed), Some(4.2));
/// # Ok::<(), bloodline::Error>(())
/// ```
pub fn blend(sire: &TraitVector, damsire: &TraitVector, weights: BlendWeights) -> Result<TraitVector> {
    let mut blended = TraitVector::new();
    for key in TraitKey::ALL {
        let s = sire.require(key, "sire")?;
        let d = damsire.require(key, "damsire")?;
        blended.insert(key, weights.combine(s, d));
    }
    Ok(blended)
}
