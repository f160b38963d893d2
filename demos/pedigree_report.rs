//! Pedigree Report Demo - interactive horse lookup
//!
//! Run with: `cargo run --example pedigree_report`
//!
//! Loads the sample datasets in `data/`, then asks for a horse name, a
//! surface and a distance category (middle if left blank), and prints the text report
//! and radar chart vertices. Set `RUST_LOG=bloodline=debug` to trace the
//! pipeline stages. An empty horse name exits.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use bloodline::config::AnalyzerConfig;
use bloodline::derivation::{DistanceCategory, Surface};
use bloodline::pipeline::{PedigreeAnalyzer, Query};
use bloodline::present::{render_error, render_text, RadarChart};
use bloodline::store::{AttributeStore, HorseStore, RecordStore};
use bloodline::Error;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let horses = Arc::new(HorseStore::load_csv(data.join("horses.csv")).context("loading horses.csv")?);
    let stallions =
        Arc::new(AttributeStore::load_csv(data.join("stallions.csv")).context("loading stallions.csv")?);
    let config =
        AnalyzerConfig::from_json_file(data.join("analyzer.json")).context("loading analyzer.json")?;

    println!("=== Bloodline Pedigree Analysis ===");
    println!("{} horses, {} stallions loaded\n", horses.len(), stallions.len());

    let analyzer = PedigreeAnalyzer::new(horses, stallions, config)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let Some(name) = prompt(&mut lines, "Horse name: ")? else {
            break;
        };
        if name.is_empty() {
            break;
        }

        let Some(surface) = prompt_choice(&mut lines, "Surface [turf/dirt]: ", Surface::Turf)? else {
            break;
        };
        let Some(distance) =
            prompt_choice(&mut lines, "Distance [short/middle/long]: ", DistanceCategory::Middle)?
        else {
            break;
        };

        let query = Query::new(name, surface).with_distance(distance);

        match analyzer.analyze(&query) {
            Ok(analysis) => {
                println!("\n{}", render_text(&analysis));
                let chart = RadarChart::from_traits(&analysis.metrics.trait_scores);
                println!("Radar polygon (r=100):");
                for (x, y) in chart.polygon(100.0) {
                    println!("   ({x:7.2}, {y:7.2})");
                }
                println!();
            }
            Err(e) => println!("\n{}\n", render_error(&e)),
        }
    }

    Ok(())
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> anyhow::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    Ok(lines.next().transpose()?.map(|line| line.trim().to_string()))
}

/// Ask until the answer parses; blank takes `default`, end of input gives `None`.
fn prompt_choice<T: FromStr<Err = Error>>(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
    default: T,
) -> anyhow::Result<Option<T>> {
    loop {
        match prompt(lines, label)? {
            None => return Ok(None),
            Some(answer) if answer.is_empty() => return Ok(Some(default)),
            Some(answer) => match answer.parse() {
                Ok(choice) => return Ok(Some(choice)),
                Err(e) => println!("{}", render_error(&e)),
            },
        }
    }
}
