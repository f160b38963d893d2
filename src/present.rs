//! Presentation contract: text, stars, metric widgets, radar chart
//!
//! Pure projections of an [`Analysis`]; nothing here feeds back into
//! scoring. The radar chart exposes an ordered axis list with values clamped
//! to `[0, 5]` and a closed polygon, leaving drawing to the caller.

use std::f64::consts::TAU;
use std::fmt::Write as _;

use serde::Serialize;

use crate::attributes::{TraitKey, TraitVector};
use crate::pipeline::Analysis;
use crate::store::Record;
use crate::Error;

/// Glyph repeated by [`stars`]
pub const STAR: char = '★';

/// Upper bound of the chart axis and star scale
pub const SCALE_MAX: f64 = 5.0;

/// `round(score)` stars, clamped to 1–5.
///
/// ```rust
/// use bloodline::present::stars;
///
/// assert_eq!(stars(4.2), "★★★★");
/// assert_eq!(stars(0.3), "★");
/// assert_eq!(stars(9.0), "★★★★★");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn stars(score: f64) -> String {
    let count = score.round().clamp(1.0, SCALE_MAX) as usize;
    std::iter::repeat(STAR).take(count).collect()
}

/// One labelled numeric widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    /// Display label
    pub label: String,
    /// Value
    pub value: f64,
}

/// Headline metrics: index, chosen surface, chosen distance.
#[must_use]
pub fn metrics(analysis: &Analysis) -> Vec<Metric> {
    let mut out = vec![
        Metric {
            label: "Bloodline index".to_string(),
            value: analysis.report.index,
        },
        Metric {
            label: format!("{} aptitude", analysis.surface),
            value: analysis.metrics.surface.get(analysis.surface),
        },
    ];
    if let Some(distance) = analysis.distance {
        out.push(Metric {
            label: format!("{distance} aptitude"),
            value: analysis.metrics.distance.get(distance),
        });
    }
    out
}

/// A chart axis and its clamped value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarAxis {
    /// Trait on this axis
    pub key: TraitKey,
    /// Value in `[0, 5]`
    pub value: f64,
}

/// Radar chart over the six base traits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    axes: Vec<RadarAxis>,
}

impl RadarChart {
    /// Project trait scores onto the six axes in canonical order.
    ///
    /// Missing traits sit at the centre.
    #[must_use]
    pub fn from_traits(traits: &TraitVector) -> Self {
        let axes = TraitKey::ALL
            .into_iter()
            .map(|key| RadarAxis {
                key,
                value: traits.value(key).unwrap_or(0.0).clamp(0.0, SCALE_MAX),
            })
            .collect();
        Self { axes }
    }

    /// Axes in drawing order.
    #[must_use]
    pub fn axes(&self) -> &[RadarAxis] {
        &self.axes
    }

    /// Closed polygon for a chart of the given outer `radius`.
    ///
    /// The first axis points straight up and axes run clockwise; the first
    /// vertex is repeated at the end.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn polygon(&self, radius: f64) -> Vec<(f64, f64)> {
        let n = self.axes.len() as f64;
        let mut points: Vec<(f64, f64)> = self
            .axes
            .iter()
            .enumerate()
            .map(|(i, axis)| {
                let angle = TAU * i as f64 / n;
                let r = radius * axis.value / SCALE_MAX;
                (r * angle.sin(), r * angle.cos())
            })
            .collect();
        if let Some(&first) = points.first() {
            points.push(first);
        }
        points
    }
}

/// Key-value text report.
#[must_use]
pub fn render_text(analysis: &Analysis) -> String {
    let mut out = String::new();
    if let Some(horse) = &analysis.horse {
        let _ = writeln!(out, "Horse: {}", horse.name());
    }
    let _ = writeln!(out, "Sire: {}", analysis.sire.name());
    let _ = writeln!(out, "Damsire: {}", analysis.damsire.name());
    out.push('\n');

    for (key, score) in analysis.metrics.trait_scores.iter() {
        let _ = writeln!(out, "{key:<8} {score:>5.2}  {}", stars(score));
    }
    out.push('\n');

    let surface = analysis.metrics.surface;
    let _ = writeln!(out, "Turf: {:.2}  Dirt: {:.2}", surface.turf, surface.dirt);
    let distance = analysis.metrics.distance;
    let _ = writeln!(
        out,
        "Short: {:.2}  Middle: {:.2}  Long: {:.2}",
        distance.short, distance.middle, distance.long
    );
    for metric in metrics(analysis) {
        let _ = writeln!(out, "{}: {:.2}", metric.label, metric.value);
    }
    let _ = writeln!(out, "Comment: {}", analysis.report.text);
    out
}

/// Plain user-facing message for a failed query.
#[must_use]
pub fn render_error(error: &Error) -> String {
    match error {
        Error::NotFound { kind, name } => format!("No matching {kind} found: {name}"),
        Error::InvalidInput(_) => error.to_string(),
        e if e.is_insufficient_data() => e.to_string(),
        other => format!("Analysis failed: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::derivation::{DistanceCategory, Surface};
    use crate::error::RecordKind;
    use crate::pipeline::{PedigreeAnalyzer, Query};
    use crate::store::{AttributeRecord, AttributeStore, HorseRecord, HorseStore};

    fn analysis() -> Analysis {
        let horses = HorseStore::from_records(vec![HorseRecord::new("Runner", "S", "D")]);
        let stallions = AttributeStore::from_records(vec![
            AttributeRecord::new("S", TraitVector::from_array([5.0, 3.0, 4.0, 2.0, 1.0, 5.0]))
                .with_surface(Some(4.5), Some(2.0)),
            AttributeRecord::new("D", TraitVector::from_array([3.0, 5.0, 2.0, 4.0, 3.0, 1.0]))
                .with_surface(Some(3.0), Some(4.0)),
        ]);
        PedigreeAnalyzer::new(horses, stallions, AnalyzerConfig::default())
            .unwrap()
            .analyze(&Query::new("Runner", Surface::Turf).with_distance(DistanceCategory::Long))
            .unwrap()
    }

    #[test]
    fn test_stars_rounding_and_clamp() {
        assert_eq!(stars(1.0), "★");
        assert_eq!(stars(2.5), "★★★");
        assert_eq!(stars(2.49), "★★");
        assert_eq!(stars(-3.0), "★");
        assert_eq!(stars(5.4), "★★★★★");
    }

    #[test]
    fn test_radar_axes_ordered_and_clamped() {
        let traits = TraitVector::from_array([6.0, -1.0, 3.0, 2.0, 1.0, 5.0]);
        let chart = RadarChart::from_traits(&traits);

        let keys: Vec<TraitKey> = chart.axes().iter().map(|a| a.key).collect();
        assert_eq!(keys, TraitKey::ALL.to_vec());
        assert!((chart.axes()[0].value - 5.0).abs() < f64::EPSILON);
        assert!(chart.axes()[1].value.abs() < f64::EPSILON);
    }

    #[test]
    fn test_radar_polygon_is_closed() {
        let chart = RadarChart::from_traits(&TraitVector::from_array([5.0; 6]));
        let points = chart.polygon(100.0);

        assert_eq!(points.len(), 7);
        assert_eq!(points.first(), points.last());
        // First axis points straight up at full radius
        assert!(points[0].0.abs() < 1e-9);
        assert!((points[0].1 - 100.0).abs() < 1e-9);
        for (x, y) in &points {
            assert!((x.hypot(*y) - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_radar_missing_traits_at_centre() {
        let chart = RadarChart::from_traits(&TraitVector::new());
        assert!(chart.polygon(10.0).iter().all(|(x, y)| x.abs() < 1e-12 && y.abs() < 1e-12));
    }

    #[test]
    fn test_metrics_include_chosen_distance() {
        let m = metrics(&analysis());
        assert_eq!(m.len(), 3);
        assert_eq!(m[1].label, "turf aptitude");
        assert!((m[1].value - 3.9).abs() < 1e-9);
        assert_eq!(m[2].label, "long aptitude");
        assert!((m[2].value - 3.4).abs() < 1e-9);
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&analysis());
        assert!(text.contains("Horse: Runner"));
        assert!(text.contains("Sire: S"));
        assert!(text.contains("Damsire: D"));
        assert!(text.contains("speed     4.20  ★★★★"));
        assert!(text.contains("Comment: speed-type・turf-oriented・long, graded tier."));
    }

    #[test]
    fn test_render_error_messages() {
        let not_found = Error::NotFound {
            kind: RecordKind::Horse,
            name: "Ghost".to_string(),
        };
        assert_eq!(render_error(&not_found), "No matching horse found: Ghost");

        let missing = Error::MissingField {
            record: "S".to_string(),
            field: "turf".to_string(),
        };
        assert!(render_error(&missing).starts_with("Insufficient pedigree data"));

        let other = Error::Other("boom".to_string());
        assert_eq!(render_error(&other), "Analysis failed: boom");
    }

    #[test]
    fn test_render_error_for_bad_form_input() {
        let err = "sand".parse::<Surface>().unwrap_err();
        assert_eq!(
            render_error(&err),
            "Invalid input: unknown surface 'sand' (expected turf or dirt)"
        );

        let err = "sprint".parse::<DistanceCategory>().unwrap_err();
        assert!(render_error(&err).starts_with("Invalid input: unknown distance 'sprint'"));
    }
}
