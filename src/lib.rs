//! # Bloodline: Pedigree-Based Aptitude Scoring
//!
//! Bloodline looks up a racehorse's sire and damsire in a stallion dataset,
//! blends their trait scores into a predicted ability profile, derives
//! surface and distance aptitude, and condenses everything into a single
//! bloodline index with a short narrative.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Poka-Yoke**: Weight errors are rejected at configuration time, never mid-query
//! - **Jidoka**: Missing pedigree data stops the pipeline with a distinct error
//!   instead of being silently defaulted
//! - **Heijunka**: Every stage is a pure function of its inputs; identical
//!   queries give bit-identical reports
//!
//! ## Example Usage
//!
//! ```rust
//! use bloodline::attributes::TraitVector;
//! use bloodline::config::AnalyzerConfig;
//! use bloodline::derivation::Surface;
//! use bloodline::pipeline::{PedigreeAnalyzer, Query};
//! use bloodline::store::{AttributeRecord, AttributeStore, HorseRecord, HorseStore};
//!
//! let horses = HorseStore::from_records(vec![
//!     HorseRecord::new("Runner", "Sire A", "Damsire B"),
//! ]);
//! let stallions = AttributeStore::from_records(vec![
//!     AttributeRecord::new("Sire A", TraitVector::from_array([5.0, 3.0, 4.0, 2.0, 1.0, 5.0]))
//!         .with_surface(Some(4.5), Some(2.0)),
//!     AttributeRecord::new("Damsire B", TraitVector::from_array([3.0, 5.0, 2.0, 4.0, 3.0, 1.0]))
//!         .with_surface(Some(3.0), Some(4.0)),
//! ]);
//!
//! let analyzer = PedigreeAnalyzer::new(horses, stallions, AnalyzerConfig::default())?;
//! let analysis = analyzer.analyze(&Query::new("Runner", Surface::Turf))?;
//!
//! assert_eq!(analysis.report.text, "speed-type・turf-oriented, graded tier.");
//! # Ok::<(), bloodline::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod attributes;
pub mod blend;
pub mod comment;
pub mod config;
pub mod derivation;
pub mod error;
pub mod pipeline;
pub mod present;
pub mod store;

pub use error::{Error, Result};
