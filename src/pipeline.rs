//! End-to-end pedigree analysis
//!
//! One query runs synchronously through:
//!
//! ```text
//! HorseStore ──> AttributeStore (sire, damsire)
//!                    │
//!                    ▼
//!              blend ──> derive ──> aggregate ──> comment ──> Analysis
//! ```
//!
//! Lookups fail fast: an unresolved name returns before any trait
//! computation runs, so no partial report is ever produced.

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateScorer;
use crate::attributes::TraitVector;
use crate::blend::{blend, BlendWeights};
use crate::comment::{comment, Tier};
use crate::config::AnalyzerConfig;
use crate::derivation::{DerivationEngine, DerivedMetrics, DistanceCategory, Surface};
use crate::error::RecordKind;
use crate::store::{AttributeRecord, HorseRecord, Record, RecordStore};
use crate::{Error, Result};

/// One user query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Exact horse name
    pub horse_name: String,
    /// Surface to evaluate
    pub surface: Surface,
    /// Distance category to evaluate, if chosen
    pub distance: Option<DistanceCategory>,
}

impl Query {
    /// Query for a horse on a surface, no distance chosen.
    #[must_use]
    pub fn new(horse_name: impl Into<String>, surface: Surface) -> Self {
        Self {
            horse_name: horse_name.into(),
            surface,
            distance: None,
        }
    }

    /// Set the distance category.
    #[must_use]
    pub const fn with_distance(mut self, distance: DistanceCategory) -> Self {
        self.distance = Some(distance);
        self
    }
}

/// Terminal output of the scoring engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Bloodline index
    pub index: f64,
    /// Type, surface and distance tags
    pub tags: Vec<String>,
    /// Tier from the index
    pub level: Tier,
    /// Composed narrative
    pub text: String,
}

/// Everything computed for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Horse record, when the query went through the horse table
    pub horse: Option<HorseRecord>,
    /// Resolved sire
    pub sire: AttributeRecord,
    /// Resolved damsire
    pub damsire: AttributeRecord,
    /// Surface evaluated
    pub surface: Surface,
    /// Distance evaluated
    pub distance: Option<DistanceCategory>,
    /// Weighted sire/damsire blend
    pub blended: TraitVector,
    /// Surface/distance aptitude and 1–5 trait scores
    pub metrics: DerivedMetrics,
    /// Index and commentary
    pub report: ScoreReport,
}

/// Runs queries against read-only stores with a fixed configuration.
///
/// Holds no mutable state; the same query always yields the same
/// [`Analysis`] for the same store contents.
#[derive(Debug)]
pub struct PedigreeAnalyzer<H, A> {
    horses: H,
    stallions: A,
    blend_weights: BlendWeights,
    derivation: DerivationEngine,
    scorer: AggregateScorer,
}

impl<H, A> PedigreeAnalyzer<H, A>
where
    H: RecordStore<Record = HorseRecord>,
    A: RecordStore<Record = AttributeRecord>,
{
    /// Create an analyzer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeights` if the configuration does not validate.
    pub fn new(horses: H, stallions: A, config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            horses,
            stallions,
            blend_weights: config.blend,
            derivation: DerivationEngine::new(config.strategy),
            scorer: AggregateScorer::new(config.aggregate)?,
        })
    }

    /// Horse table.
    #[must_use]
    pub const fn horses(&self) -> &H {
        &self.horses
    }

    /// Stallion table.
    #[must_use]
    pub const fn stallions(&self) -> &A {
        &self.stallions
    }

    /// Analyze a horse by name.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the horse, its sire or its damsire does not resolve
    /// - `MissingField` / `MissingKey` if a resolved record lacks data the
    ///   configured computation needs
    pub fn analyze(&self, query: &Query) -> Result<Analysis> {
        let span = tracing::info_span!("analyze", horse = %query.horse_name);
        let _enter = span.enter();

        let horse = self.horses.get(&query.horse_name).ok_or_else(|| {
            tracing::debug!("horse not found");
            Error::NotFound {
                kind: RecordKind::Horse,
                name: query.horse_name.clone(),
            }
        })?;

        let sire = self.resolve_parent(&horse, "sire", HorseRecord::sire)?;
        let damsire = self.resolve_parent(&horse, "dam_sire", HorseRecord::damsire)?;

        let mut analysis = self.analyze_parents(&sire, &damsire, query.surface, query.distance)?;
        analysis.horse = Some((*horse).clone());
        Ok(analysis)
    }

    /// Analyze an explicit sire/damsire pair without the horse table.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` / `MissingKey` if either record lacks data the
    /// configured computation needs.
    pub fn analyze_parents(
        &self,
        sire: &AttributeRecord,
        damsire: &AttributeRecord,
        surface: Surface,
        distance: Option<DistanceCategory>,
    ) -> Result<Analysis> {
        let blended = blend(sire.traits(), damsire.traits(), self.blend_weights)
            .map_err(|e| attribute_to(e, sire, damsire))?;
        tracing::debug!(?blended, "blended profile");

        let metrics = self.derivation.derive(&blended, sire, damsire)?;
        tracing::debug!(strategy = ?metrics.strategy, "derived metrics");

        let surface_score = metrics.rated_surface.get(surface);
        let distance_score = distance.map(|d| metrics.rated_distance.get(d));
        let index = self
            .scorer
            .score(&metrics.trait_scores, surface_score, distance_score)?;

        let commentary = comment(&metrics.trait_scores, surface, index, distance);
        tracing::debug!(index, level = %commentary.level, "scored");

        Ok(Analysis {
            horse: None,
            sire: sire.clone(),
            damsire: damsire.clone(),
            surface,
            distance,
            blended,
            metrics,
            report: ScoreReport {
                index,
                tags: commentary.tags,
                level: commentary.level,
                text: commentary.text,
            },
        })
    }

    fn resolve_parent(
        &self,
        horse: &HorseRecord,
        field: &str,
        parent: fn(&HorseRecord) -> Option<&str>,
    ) -> Result<AttributeRecord> {
        let name = parent(horse).ok_or_else(|| Error::MissingField {
            record: horse.name().to_string(),
            field: field.to_string(),
        })?;

        let record = self.stallions.get(name).ok_or_else(|| {
            tracing::debug!(stallion = name, "stallion not found");
            Error::NotFound {
                kind: RecordKind::Stallion,
                name: name.to_string(),
            }
        })?;
        Ok((*record).clone())
    }
}

/// Name the stallion instead of the parent role in blend errors.
fn attribute_to(err: Error, sire: &AttributeRecord, damsire: &AttributeRecord) -> Error {
    match err {
        Error::MissingKey { record, key } => {
            let record = match record.as_str() {
                "sire" => sire.name().to_string(),
                "damsire" => damsire.name().to_string(),
                _ => record,
            };
            Error::MissingKey { record, key }
        }
        other => other,
    }
}
