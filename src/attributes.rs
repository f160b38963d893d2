//! Base trait keys and trait vectors
//!
//! Every stallion record carries six base trait scores. A `TraitVector` maps
//! a subset of those keys to values; absent keys are reported as
//! [`Error::MissingKey`] by the engine rather than defaulted.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One of the six base traits of a stallion record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitKey {
    /// Early pace and acceleration
    Speed,
    /// Staying power over distance
    Stamina,
    /// Raw power, heavy-going ability
    Power,
    /// European racing aptitude
    Europe,
    /// American racing aptitude
    Usa,
    /// Japanese racing aptitude
    Japan,
}

impl TraitKey {
    /// All six keys in canonical (chart axis) order.
    pub const ALL: [Self; 6] = [
        Self::Speed,
        Self::Stamina,
        Self::Power,
        Self::Europe,
        Self::Usa,
        Self::Japan,
    ];

    /// Column / JSON name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Stamina => "stamina",
            Self::Power => "power",
            Self::Europe => "europe",
            Self::Usa => "usa",
            Self::Japan => "japan",
        }
    }
}

impl fmt::Display for TraitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TraitKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown trait '{s}'")))
    }
}

/// Mapping from trait key to score.
///
/// Used for raw parent traits, the blended profile, and the 1–5 scoring
/// traits alike. Iteration order is the canonical key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitVector {
    values: BTreeMap<TraitKey, f64>,
}

impl TraitVector {
    /// Create an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a complete vector from values in [`TraitKey::ALL`] order.
    #[must_use]
    pub fn from_array(values: [f64; 6]) -> Self {
        TraitKey::ALL.into_iter().zip(values).collect()
    }

    /// Set a trait value, replacing any previous one.
    pub fn insert(&mut self, key: TraitKey, value: f64) {
        self.values.insert(key, value);
    }

    /// Value for `key`, if present.
    #[must_use]
    pub fn value(&self, key: TraitKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    /// Value for `key`, or [`Error::MissingKey`] attributed to `record`.
    ///
    /// # Errors
    ///
    /// Returns `MissingKey` if the key is absent.
    pub fn require(&self, key: TraitKey, record: &str) -> Result<f64> {
        self.value(key).ok_or_else(|| Error::MissingKey {
            record: record.to_string(),
            key: key.as_str().to_string(),
        })
    }

    /// True if all six base traits are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        TraitKey::ALL.iter().all(|key| self.values.contains_key(key))
    }

    /// Number of traits present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no traits are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(key, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TraitKey, f64)> + '_ {
        self.values.iter().map(|(key, value)| (*key, *value))
    }
}

impl FromIterator<(TraitKey, f64)> for TraitVector {
    fn from_iter<I: IntoIterator<Item = (TraitKey, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Round to two decimal places (half away from zero).
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
