//! Narrative commentary: type tags and tier label
//!
//! Rules are fixed thresholds on the 1–5 axis, evaluated independently per
//! trait, so any number of type tags may fire.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::{TraitKey, TraitVector};
use crate::derivation::{DistanceCategory, Surface};

/// A trait at or above this rating earns its type tag
pub const TYPE_TAG_THRESHOLD: f64 = 4.0;

/// Separator between tags in the rendered text
pub const TAG_SEPARATOR: &str = "・";

const TYPE_TAGS: [(TraitKey, &str); 3] = [
    (TraitKey::Speed, "speed-type"),
    (TraitKey::Stamina, "stamina-type"),
    (TraitKey::Power, "power-type"),
];

/// Class level implied by the bloodline index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// index < 3.2
    #[serde(rename = "developing tier")]
    Developing,
    /// 3.2 ≤ index < 3.8
    #[serde(rename = "conditions tier")]
    Conditions,
    /// 3.8 ≤ index < 4.5
    #[serde(rename = "graded tier")]
    Graded,
    /// index ≥ 4.5
    #[serde(rename = "elite tier")]
    Elite,
}

impl Tier {
    /// Classify an index, highest threshold first.
    #[must_use]
    pub fn from_index(index: f64) -> Self {
        if index >= 4.5 {
            Self::Elite
        } else if index >= 3.8 {
            Self::Graded
        } else if index >= 3.2 {
            Self::Conditions
        } else {
            Self::Developing
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Elite => "elite tier",
            Self::Graded => "graded tier",
            Self::Conditions => "conditions tier",
            Self::Developing => "developing tier",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tags, tier and composed text for one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commentary {
    /// Type tags, then the surface tag, then the optional distance tag
    pub tags: Vec<String>,
    /// Tier from the index
    pub level: Tier,
    /// `tags` joined with `・`, then `, <level>.`
    pub text: String,
}

/// Surface tag text.
#[must_use]
pub const fn surface_tag(surface: Surface) -> &'static str {
    match surface {
        Surface::Turf => "turf-oriented",
        Surface::Dirt => "dirt-oriented",
    }
}

/// Build commentary for 1–5 trait scores, chosen surface/distance and index.
///
/// Traits absent from `traits` simply earn no tag.
///
/// ```rust
/// use bloodline::attributes::TraitVector;
/// use bloodline::comment::comment;
/// use bloodline::derivation::Surface;
///
/// let traits = TraitVector::from_array([4.2, 3.8, 3.2, 2.8, 1.8, 3.4]);
/// let c = comment(&traits, Surface::Turf, 3.81, None);
/// assert_eq!(c.text, "speed-type・turf-oriented, graded tier.");
/// ```
#[must_use]
pub fn comment(
    traits: &TraitVector,
    surface: Surface,
    total_index: f64,
    distance: Option<DistanceCategory>,
) -> Commentary {
    let mut tags: Vec<String> = TYPE_TAGS
        .iter()
        .filter(|(key, _)| traits.value(*key).is_some_and(|v| v >= TYPE_TAG_THRESHOLD))
        .map(|(_, tag)| (*tag).to_string())
        .collect();
    tags.push(surface_tag(surface).to_string());
    if let Some(distance) = distance {
        tags.push(distance.as_str().to_string());
    }

    let level = Tier::from_index(total_index);
    let text = format!("{}, {}.", tags.join(TAG_SEPARATOR), level.label());

    Commentary { tags, level, text }
}
