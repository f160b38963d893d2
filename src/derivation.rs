//! Surface and distance aptitude derivation
//!
//! Two strategies, selected by configuration:
//!
//! - [`DerivationStrategy::DirectWeighted`]: surface aptitude blends the
//!   parents' precomputed turf/dirt scores; distance aptitude is a weighted
//!   mix of blended traits. Everything stays on the 1–5 axis.
//! - [`DerivationStrategy::RelativeCrossTrait`]: each trait gets a raw score
//!   from cross-weighted blended traits, raw scores are min-max normalized to
//!   integer 1–5 ratings, and surface/distance are reported as raw sums
//!   (relative, not absolute).
//!
//! Raw relative scores and their 1–5 counterparts are kept in separate fields
//! of [`DerivedMetrics`]; downstream scoring only ever reads the 1–5 fields.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attributes::{round2, TraitKey, TraitVector};
use crate::blend::BlendWeights;
use crate::store::{AttributeRecord, Record};
use crate::{Error, Result};

/// Midpoint rating used when the normalization range collapses
pub const DEGENERATE_RATING: u8 = 3;

/// Racing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Grass
    Turf,
    /// Dirt
    Dirt,
}

impl Surface {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Turf => "turf",
            Self::Dirt => "dirt",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "turf" => Ok(Self::Turf),
            "dirt" => Ok(Self::Dirt),
            other => Err(Error::InvalidInput(format!(
                "unknown surface '{other}' (expected turf or dirt)"
            ))),
        }
    }
}

/// Race distance category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceCategory {
    /// Sprint
    Short,
    /// Mile to intermediate
    Middle,
    /// Staying trip
    Long,
}

impl DistanceCategory {
    /// All categories, shortest first.
    pub const ALL: [Self; 3] = [Self::Short, Self::Middle, Self::Long];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Middle => "middle",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for DistanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "middle" => Ok(Self::Middle),
            "long" => Ok(Self::Long),
            other => Err(Error::InvalidInput(format!(
                "unknown distance '{other}' (expected short, middle or long)"
            ))),
        }
    }
}

/// Turf and dirt aptitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceScores {
    /// Turf aptitude
    pub turf: f64,
    /// Dirt aptitude
    pub dirt: f64,
}

impl SurfaceScores {
    /// Score for one surface.
    #[must_use]
    pub const fn get(&self, surface: Surface) -> f64 {
        match surface {
            Surface::Turf => self.turf,
            Surface::Dirt => self.dirt,
        }
    }
}

/// Short / middle / long aptitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceScores {
    /// Sprint aptitude
    pub short: f64,
    /// Middle-distance aptitude
    pub middle: f64,
    /// Staying aptitude
    pub long: f64,
}

impl DistanceScores {
    /// Score for one category.
    #[must_use]
    pub const fn get(&self, category: DistanceCategory) -> f64 {
        match category {
            DistanceCategory::Short => self.short,
            DistanceCategory::Middle => self.middle,
            DistanceCategory::Long => self.long,
        }
    }
}

/// Derivation algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationStrategy {
    /// Surface from parents' precomputed fields, distance from blended traits
    #[default]
    DirectWeighted,
    /// Cross-weighted raw scores, min-max normalized to 1–5
    RelativeCrossTrait,
}

/// Output of the derivation stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Strategy that produced these metrics
    pub strategy: DerivationStrategy,
    /// Surface aptitude at the strategy's native scale
    pub surface: SurfaceScores,
    /// Distance aptitude at the strategy's native scale
    pub distance: DistanceScores,
    /// Surface aptitude on the 1–5 axis
    pub rated_surface: SurfaceScores,
    /// Distance aptitude on the 1–5 axis
    pub rated_distance: DistanceScores,
    /// Per-trait scores on the 1–5 axis fed to scoring and commentary
    pub trait_scores: TraitVector,
    /// Cross-weighted raw trait scores (relative strategy only)
    pub raw_scores: Option<TraitVector>,
    /// Integer 1–5 trait ratings (relative strategy only)
    pub ratings: Option<BTreeMap<TraitKey, u8>>,
}

/// Cross-weighting: raw = primary×2 + secondary + tertiary×0.5
const CROSS_WEIGHTS: [(TraitKey, TraitKey, TraitKey); 6] = [
    (TraitKey::Speed, TraitKey::Japan, TraitKey::Usa),
    (TraitKey::Stamina, TraitKey::Europe, TraitKey::Power),
    (TraitKey::Power, TraitKey::Usa, TraitKey::Stamina),
    (TraitKey::Europe, TraitKey::Stamina, TraitKey::Power),
    (TraitKey::Usa, TraitKey::Power, TraitKey::Speed),
    (TraitKey::Japan, TraitKey::Speed, TraitKey::Stamina),
];

/// Derivation stage of the pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivationEngine {
    strategy: DerivationStrategy,
}

impl DerivationEngine {
    /// Create an engine for one strategy.
    #[must_use]
    pub const fn new(strategy: DerivationStrategy) -> Self {
        Self { strategy }
    }

    /// Configured strategy.
    #[must_use]
    pub const fn strategy(&self) -> DerivationStrategy {
        self.strategy
    }

    /// Derive surface/distance aptitude and 1–5 trait scores.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if the direct-weighted strategy needs a turf or
    /// dirt score a parent lacks, and `MissingKey` if `blended` is incomplete.
    pub fn derive(
        &self,
        blended: &TraitVector,
        sire: &AttributeRecord,
        damsire: &AttributeRecord,
    ) -> Result<DerivedMetrics> {
        match self.strategy {
            DerivationStrategy::DirectWeighted => direct_weighted(blended, sire, damsire),
            DerivationStrategy::RelativeCrossTrait => relative_cross_trait(blended),
        }
    }
}

fn direct_weighted(
    blended: &TraitVector,
    sire: &AttributeRecord,
    damsire: &AttributeRecord,
) -> Result<DerivedMetrics> {
    // Parent surface fields always blend 0.6/0.4, whatever the trait blend
    let weights = BlendWeights::default();
    let surface = SurfaceScores {
        turf: weights.combine(
            surface_field(sire, "turf", AttributeRecord::turf)?,
            surface_field(damsire, "turf", AttributeRecord::turf)?,
        ),
        dirt: weights.combine(
            surface_field(sire, "dirt", AttributeRecord::dirt)?,
            surface_field(damsire, "dirt", AttributeRecord::dirt)?,
        ),
    };

    let get = |key| blended.require(key, "blended profile");
    let speed = get(TraitKey::Speed)?;
    let stamina = get(TraitKey::Stamina)?;
    let power = get(TraitKey::Power)?;
    let europe = get(TraitKey::Europe)?;

    let distance = DistanceScores {
        short: round2(speed.mul_add(0.6, power * 0.4)),
        middle: round2(speed.mul_add(0.5, stamina * 0.5)),
        long: round2(stamina.mul_add(0.6, europe * 0.4)),
    };

    Ok(DerivedMetrics {
        strategy: DerivationStrategy::DirectWeighted,
        surface,
        distance,
        rated_surface: surface,
        rated_distance: distance,
        trait_scores: blended.clone(),
        raw_scores: None,
        ratings: None,
    })
}

fn surface_field(
    record: &AttributeRecord,
    field: &str,
    read: fn(&AttributeRecord) -> Option<f64>,
) -> Result<f64> {
    read(record).ok_or_else(|| Error::MissingField {
        record: record.name().to_string(),
        field: field.to_string(),
    })
}

fn relative_cross_trait(blended: &TraitVector) -> Result<DerivedMetrics> {
    let mut raw = TraitVector::new();
    for (primary, secondary, tertiary) in CROSS_WEIGHTS {
        let get = |key| blended.require(key, "blended profile");
        raw.insert(
            primary,
            get(primary)?.mul_add(2.0, get(tertiary)?.mul_add(0.5, get(secondary)?)),
        );
    }

    let raw_of = |key| raw.value(key).unwrap_or_default();
    let speed = raw_of(TraitKey::Speed);
    let stamina = raw_of(TraitKey::Stamina);
    let power = raw_of(TraitKey::Power);
    let japan = raw_of(TraitKey::Japan);
    let usa = raw_of(TraitKey::Usa);

    let turf = speed + stamina + japan;
    let dirt = power + usa;
    let short = speed + power;
    let middle = speed + stamina;
    let long = stamina * 2.0;

    let raw_values: Vec<f64> = raw.iter().map(|(_, v)| v).collect();
    let (min, max) = min_max(&raw_values);
    let ratings: BTreeMap<TraitKey, u8> = raw
        .iter()
        .map(|(key, v)| (key, to_rating(rescale(v, min, max))))
        .collect();

    // Averages of raw trait scores sit inside [min, max], so they share the axis.
    let rated = |sum: f64, terms: f64| round2(rescale(sum / terms, min, max));

    Ok(DerivedMetrics {
        strategy: DerivationStrategy::RelativeCrossTrait,
        surface: SurfaceScores {
            turf: round2(turf),
            dirt: round2(dirt),
        },
        distance: DistanceScores {
            short: round2(short),
            middle: round2(middle),
            long: round2(long),
        },
        rated_surface: SurfaceScores {
            turf: rated(turf, 3.0),
            dirt: rated(dirt, 2.0),
        },
        rated_distance: DistanceScores {
            short: rated(short, 2.0),
            middle: rated(middle, 2.0),
            long: rated(long, 2.0),
        },
        trait_scores: ratings
            .iter()
            .map(|(key, rating)| (*key, f64::from(*rating)))
            .collect(),
        raw_scores: Some(raw.iter().map(|(key, v)| (key, round2(v))).collect()),
        ratings: Some(ratings),
    })
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[allow(clippy::float_cmp)]
fn rescale(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return f64::from(DEGENERATE_RATING);
    }
    4.0f64.mul_add((value - min) / (max - min), 1.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_rating(scaled: f64) -> u8 {
    scaled.round().clamp(1.0, 5.0) as u8
}

/// Map values onto the integer 1–5 scale by min-max normalization.
///
/// The minimum maps to 1 and the maximum to 5. If every value is equal the
/// range is degenerate and every value maps to [`DEGENERATE_RATING`].
///
/// ```rust
/// use bloodline::derivation::normalize_scale;
///
/// assert_eq!(normalize_scale(&[2.0, 4.0, 6.0]), vec![1, 3, 5]);
/// assert_eq!(normalize_scale(&[2.0, 2.0]), vec![3, 3]);
/// ```
#[must_use]
pub fn normalize_scale(values: &[f64]) -> Vec<u8> {
    let (min, max) = min_max(values);
    values
        .iter()
        .map(|&v| to_rating(rescale(v, min, max)))
        .collect()
}
