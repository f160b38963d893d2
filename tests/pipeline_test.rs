//! Integration tests for the full analysis pipeline
//!
//! Uses the sample datasets under `data/`:
//! 1. Load horse and stallion CSVs
//! 2. Run queries end to end
//! 3. Check error short-circuiting and determinism

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bloodline::attributes::{TraitKey, TraitVector};
use bloodline::comment::Tier;
use bloodline::config::AnalyzerConfig;
use bloodline::derivation::{DerivationStrategy, DistanceCategory, Surface};
use bloodline::error::RecordKind;
use bloodline::pipeline::{PedigreeAnalyzer, Query};
use bloodline::present::{render_error, RadarChart};
use bloodline::store::{AttributeRecord, AttributeStore, HorseRecord, HorseStore, RecordStore};
use bloodline::Error;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn load_stores() -> (Arc<HorseStore>, Arc<AttributeStore>) {
    let horses = HorseStore::load_csv(data_dir().join("horses.csv")).unwrap();
    let stallions = AttributeStore::load_csv(data_dir().join("stallions.csv")).unwrap();
    (Arc::new(horses), Arc::new(stallions))
}

fn analyzer(
    config: AnalyzerConfig,
) -> PedigreeAnalyzer<Arc<HorseStore>, Arc<AttributeStore>> {
    let (horses, stallions) = load_stores();
    PedigreeAnalyzer::new(horses, stallions, config).unwrap()
}

/// Attribute store that counts lookups
struct CountingStore {
    inner: AttributeStore,
    lookups: AtomicUsize,
}

impl RecordStore for CountingStore {
    type Record = AttributeRecord;

    fn get(&self, name: &str) -> Option<Arc<AttributeRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get(name)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[test]
fn test_sample_datasets_load() {
    let (horses, stallions) = load_stores();
    assert_eq!(horses.len(), 7);
    assert_eq!(stallions.len(), 11);
    assert!(stallions.get("Heart's Cry").is_some());
}

#[test]
fn test_equinox_default_config() {
    let analysis = analyzer(AnalyzerConfig::default())
        .analyze(&Query::new("Equinox", Surface::Turf))
        .unwrap();

    assert_eq!(analysis.sire.traits().value(TraitKey::Speed), Some(4.0));
    assert_eq!(analysis.blended.value(TraitKey::Speed), Some(4.4));
    assert_eq!(analysis.blended.value(TraitKey::Stamina), Some(3.8));
    assert_eq!(analysis.blended.value(TraitKey::Japan), Some(4.6));
    assert!((analysis.metrics.surface.turf - 4.56).abs() < 1e-9);
    assert!((analysis.metrics.surface.dirt - 2.84).abs() < 1e-9);
    assert!((analysis.report.index - 4.14).abs() < 1e-9);
    assert_eq!(analysis.report.level, Tier::Graded);
    assert_eq!(analysis.report.text, "speed-type・turf-oriented, graded tier.");
}

#[test]
fn test_equinox_with_distance_config_file() {
    let config = AnalyzerConfig::from_json_file(data_dir().join("analyzer.json")).unwrap();
    let analysis = analyzer(config)
        .analyze(&Query::new("Equinox", Surface::Turf).with_distance(DistanceCategory::Middle))
        .unwrap();

    assert!((analysis.metrics.distance.short - 4.08).abs() < 1e-9);
    assert!((analysis.metrics.distance.middle - 4.1).abs() < 1e-9);
    assert!((analysis.metrics.distance.long - 3.32).abs() < 1e-9);
    assert!((analysis.report.index - 4.1).abs() < 1e-9);
    assert_eq!(
        analysis.report.text,
        "speed-type・turf-oriented・middle, graded tier."
    );
}

#[test]
fn test_reference_parents_blend() {
    let sire = AttributeRecord::new("S", TraitVector::from_array([5.0, 3.0, 4.0, 2.0, 1.0, 5.0]))
        .with_surface(Some(4.0), Some(3.0));
    let damsire = AttributeRecord::new("D", TraitVector::from_array([3.0, 5.0, 2.0, 4.0, 3.0, 1.0]))
        .with_surface(Some(4.0), Some(3.0));

    let analysis = analyzer(AnalyzerConfig::default())
        .analyze_parents(&sire, &damsire, Surface::Dirt, None)
        .unwrap();

    assert_eq!(analysis.blended.value(TraitKey::Speed), Some(4.2));
    assert_eq!(analysis.blended.value(TraitKey::Stamina), Some(3.8));
    assert_eq!(analysis.blended.value(TraitKey::Power), Some(3.2));
    assert!(analysis.horse.is_none());
}

#[test]
fn test_unknown_horse_short_circuits() {
    let (horses, stallions) = load_stores();
    let counting = Arc::new(CountingStore {
        inner: AttributeStore::from_records(
            stallions
                .snapshot()
                .get("King Halo")
                .map(|r| (**r).clone()),
        ),
        lookups: AtomicUsize::new(0),
    });
    let analyzer =
        PedigreeAnalyzer::new(horses, Arc::clone(&counting), AnalyzerConfig::default()).unwrap();

    let err = analyzer
        .analyze(&Query::new("No Such Horse", Surface::Turf))
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { kind: RecordKind::Horse, .. }));
    assert_eq!(counting.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(render_error(&err), "No matching horse found: No Such Horse");
}

#[test]
fn test_lookup_is_exact() {
    let err = analyzer(AnalyzerConfig::default())
        .analyze(&Query::new("equinox", Surface::Turf))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_unresolved_sire() {
    let err = analyzer(AnalyzerConfig::default())
        .analyze(&Query::new("Unknown Sire Colt", Surface::Turf))
        .unwrap_err();

    match err {
        Error::NotFound { kind, name } => {
            assert_eq!(kind, RecordKind::Stallion);
            assert_eq!(name, "Mystery Stallion");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_blank_damsire_is_insufficient_data() {
    let err = analyzer(AnalyzerConfig::default())
        .analyze(&Query::new("Half Record Filly", Surface::Turf))
        .unwrap_err();

    assert!(err.is_insufficient_data());
    assert!(render_error(&err).starts_with("Insufficient pedigree data"));
}

#[test]
fn test_relative_strategy_on_dataset() {
    let config = AnalyzerConfig::builder()
        .strategy(DerivationStrategy::RelativeCrossTrait)
        .with_distance_term()
        .build()
        .unwrap();
    let analysis = analyzer(config)
        .analyze(&Query::new("Lemon Pop", Surface::Dirt).with_distance(DistanceCategory::Short))
        .unwrap();

    let ratings = analysis.metrics.ratings.as_ref().unwrap();
    assert_eq!(ratings.len(), 6);
    assert!(ratings.values().any(|&r| r == 1));
    assert!(ratings.values().any(|&r| r == 5));
    // Native relative scale stays separate from the rated one
    assert!(analysis.metrics.surface.dirt > 5.0);
    assert!(analysis.metrics.rated_surface.dirt <= 5.0);
    assert!((1.0..=5.0).contains(&analysis.report.index));
}

#[test]
fn test_pipeline_is_deterministic() {
    let analyzer = analyzer(AnalyzerConfig::builder().with_distance_term().build().unwrap());
    let query = Query::new("Do Deuce", Surface::Turf).with_distance(DistanceCategory::Long);

    let first = analyzer.analyze(&query).unwrap();
    let second = analyzer.analyze(&query).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.report.index.to_bits(), second.report.index.to_bits());
}

#[test]
fn test_radar_chart_from_analysis() {
    let analysis = analyzer(AnalyzerConfig::default())
        .analyze(&Query::new("Liberty Island", Surface::Turf))
        .unwrap();
    let chart = RadarChart::from_traits(&analysis.metrics.trait_scores);

    assert_eq!(chart.axes().len(), 6);
    assert!(chart.axes().iter().all(|a| (0.0..=5.0).contains(&a.value)));
    assert_eq!(chart.polygon(1.0).len(), 7);
}

#[test]
fn test_in_memory_fixture_stores() {
    let horses = HorseStore::from_records(vec![HorseRecord::new("Fixture", "A", "B")]);
    let stallions = AttributeStore::from_records(vec![
        AttributeRecord::new("A", TraitVector::from_array([2.0; 6])),
        AttributeRecord::new("B", TraitVector::from_array([2.0; 6])),
    ]);
    let config = AnalyzerConfig::builder()
        .strategy(DerivationStrategy::RelativeCrossTrait)
        .build()
        .unwrap();

    let analysis = PedigreeAnalyzer::new(horses, stallions, config)
        .unwrap()
        .analyze(&Query::new("Fixture", Surface::Turf))
        .unwrap();

    // Flat profile: every rating sits at the midpoint
    assert!(analysis
        .metrics
        .ratings
        .unwrap()
        .values()
        .all(|&r| r == 3));
    assert!((analysis.report.index - 3.0).abs() < 1e-9);
    assert_eq!(analysis.report.level, Tier::Developing);
}
