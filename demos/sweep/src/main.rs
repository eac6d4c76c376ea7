//! sweep: end-to-end staffing study for one city.
//!
//! Samples demand inside a city polygon, places dark stores with k-means,
//! then sweeps agent counts for one store and prints the comparison table
//! with the recommended staffing level.
//!
//! ```text
//! RUST_LOG=info cargo run -p sweep --release -- [scenario.json] [results.json]
//! ```
//!
//! Without a scenario file the built-in Chandigarh scenario is used.  Any
//! field missing from the file keeps its default.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

use ds_core::{FacilityId, GeoPoint, Polygon, SimRng};
use ds_optimize::{AggregatedResult, OptimizerConfig, Recommendation, Sweep, WorkforceOptimizer};
use ds_spatial::{DemandProfile, Hotspot, KMeans, generate_demand};

// ── Scenario ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct Scenario {
    /// Seeds demand sampling and clustering; the sweep has its own seed.
    seed:       u64,
    polygon:    Polygon,
    demand:     DemandProfile,
    clustering: KMeans,
    /// Index of the store to staff, into the clustered facility list.
    facility:   u32,
    optimizer:  OptimizerConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            seed:       42,
            polygon:    chandigarh(),
            demand:     DemandProfile {
                background_count: 500,
                hotspots:         vec![
                    // Sector 17 market.
                    Hotspot { center: GeoPoint::new(30.7410, 76.7790), sigma_deg: 0.008, count: 300 },
                    // Sector 35.
                    Hotspot { center: GeoPoint::new(30.7225, 76.7600), sigma_deg: 0.008, count: 200 },
                    // Industrial Area.
                    Hotspot { center: GeoPoint::new(30.7056, 76.8013), sigma_deg: 0.006, count: 200 },
                ],
            },
            clustering: KMeans::new(5),
            facility:   0,
            optimizer:  OptimizerConfig { agent_range: 2..=12, ..OptimizerConfig::default() },
        }
    }
}

/// Rough outline of the Chandigarh sector grid.
fn chandigarh() -> Polygon {
    Polygon::new(vec![
        GeoPoint::new(30.6790, 76.7290),
        GeoPoint::new(30.6880, 76.8240),
        GeoPoint::new(30.7150, 76.8520),
        GeoPoint::new(30.7660, 76.8210),
        GeoPoint::new(30.7980, 76.7800),
        GeoPoint::new(30.7810, 76.7250),
        GeoPoint::new(30.7320, 76.7020),
    ])
}

fn load_scenario(path: Option<&str>) -> Result<Scenario> {
    let Some(path) = path else {
        return Ok(Scenario::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading scenario {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenario {path}"))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let scenario = load_scenario(args.first().map(String::as_str))?;
    let mut rng = SimRng::new(scenario.seed);

    // ── Demand and facility placement ─────────────────────────────────────
    let t0 = Instant::now();
    let demand = generate_demand(&scenario.demand, &scenario.polygon, &mut rng.child(1));
    info!(requested = demand.requested, generated = demand.generated(), "demand sampled");

    let outcome = scenario
        .clustering
        .cluster(&demand.locations(), &scenario.polygon, &mut rng.child(2));
    info!(
        facilities = outcome.effective_k(),
        iterations = outcome.iterations,
        converged  = outcome.converged,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "facilities placed"
    );
    if outcome.facilities.is_empty() {
        bail!("clustering produced no facilities; check the polygon and demand profile");
    }
    for f in &outcome.facilities {
        println!("  {}  {}", f, f.location);
    }

    // ── Workforce sweep ───────────────────────────────────────────────────
    let t1 = Instant::now();
    let selected = FacilityId(scenario.facility);
    let sweep = WorkforceOptimizer::new(scenario.optimizer)
        .optimize(&outcome.facilities, selected, &scenario.polygon)?;
    info!(elapsed_ms = t1.elapsed().as_millis() as u64, "sweep finished");

    print_table(&sweep.results);
    print_recommendation(&sweep);

    if let Some(out) = args.get(1) {
        write_results(Path::new(out), &sweep)?;
    }
    Ok(())
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn na(v: Option<f64>, decimals: usize) -> String {
    v.map_or_else(|| "N/A".to_string(), |x| format!("{x:.decimals$}"))
}

fn print_table(results: &[AggregatedResult]) {
    println!();
    println!(
        "{:>6} {:>9} {:>8} {:>5} {:>5} {:>6} {:>6} {:>6} {:>10}",
        "agents", "delivered", "avg min", "min", "max", "sd", "sla %", "util %", "cost/order"
    );
    for r in results {
        let d = r.delivery_time;
        println!(
            "{:>6} {:>9.1} {:>8} {:>5} {:>5} {:>6} {:>6} {:>6} {:>10}",
            r.agent_count,
            r.avg_orders_delivered,
            na(d.map(|d| d.mean), 1),
            d.map_or_else(|| "N/A".to_string(), |d| d.min.to_string()),
            d.map_or_else(|| "N/A".to_string(), |d| d.max.to_string()),
            na(d.map(|d| d.std_dev), 1),
            na(r.sla_attainment_pct, 1),
            na(r.avg_utilization.map(|u| u * 100.0), 1),
            na(r.average_cost_per_order, 2),
        );
    }
}

fn print_recommendation(sweep: &Sweep) {
    println!();
    if sweep.cancelled {
        println!("Sweep cancelled: counts with truncated runs were not considered");
    }
    match sweep.recommendation {
        Recommendation::Feasible { agent_count, average_cost_per_order } => {
            println!("Recommended: {agent_count} agents at {average_cost_per_order:.2} per order");
        }
        Recommendation::NoFeasibleConfiguration => {
            println!("No feasible configuration: no agent count delivered any order");
        }
    }
}

fn write_results(path: &Path, sweep: &Sweep) -> Result<()> {
    let json = serde_json::to_string_pretty(sweep)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "results written");
    Ok(())
}
