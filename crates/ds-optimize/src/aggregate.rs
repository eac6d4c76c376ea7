//! Combine repeated runs of one staffing level into a single result.

use ds_sim::{RunEnd, RunStatistics};

use crate::{CostBreakdown, CostRates};

/// Delivery-time distribution over every delivered order of every run.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryTimeStats {
    pub mean:    f64,
    pub min:     u64,
    pub max:     u64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl DeliveryTimeStats {
    /// `None` for an empty sample.
    pub fn from_minutes(times: &[u64]) -> Option<Self> {
        let min = *times.iter().min()?;
        let max = *times.iter().max()?;
        let n = times.len() as f64;
        let mean = times.iter().sum::<u64>() as f64 / n;
        let var = times.iter().map(|&t| (t as f64 - mean).powi(2)).sum::<f64>() / n;
        Some(Self { mean, min, max, std_dev: var.sqrt() })
    }
}

/// One row of the sweep: averages and derived metrics across all runs of
/// one agent count.
///
/// Metrics that are undefined for the inputs (nothing delivered, no agents)
/// are `None` rather than zero.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregatedResult {
    pub agent_count: usize,
    pub runs:        usize,
    /// Runs that delivered their full quota before the horizon.
    pub completed_runs: usize,
    /// Runs stopped by the cancellation flag.  Such a row describes a
    /// truncated run and is never recommended.
    pub cancelled_runs: usize,

    // ── Per-run averages of counts ────────────────────────────────────────
    pub avg_orders_generated: f64,
    pub avg_orders_assigned:  f64,
    pub avg_orders_delivered: f64,
    pub avg_undelivered:      f64,
    pub avg_distance_km:      f64,

    // ── Derived ───────────────────────────────────────────────────────────
    pub delivery_time:      Option<DeliveryTimeStats>,
    /// Share of delivered orders within the SLA, in percent.
    pub sla_attainment_pct: Option<f64>,
    /// Mean minutes from placement to assignment.
    pub avg_wait_minutes:   Option<f64>,
    /// Mean of per-run busy fraction.
    pub avg_utilization:    Option<f64>,

    // ── Cost ──────────────────────────────────────────────────────────────
    pub avg_cost:               CostBreakdown,
    /// Total cost over total delivered orders.
    pub average_cost_per_order: Option<f64>,
}

impl AggregatedResult {
    #[inline]
    pub fn avg_delivery_minutes(&self) -> Option<f64> {
        self.delivery_time.map(|d| d.mean)
    }

    /// `true` when the cost objective is defined.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.average_cost_per_order.is_some()
    }
}

/// Aggregate `runs` (all with `agent_count` agents) under `rates`.
///
/// Delivery times are pooled across runs before computing min/max/std-dev,
/// so a single slow run widens the distribution instead of being averaged
/// away.
pub fn aggregate(agent_count: usize, runs: &[RunStatistics], rates: &CostRates) -> AggregatedResult {
    let n = runs.len();
    let per_run = |sum: f64| if n > 0 { sum / n as f64 } else { 0.0 };

    let generated: u64 = runs.iter().map(|r| r.orders_generated as u64).sum();
    let assigned: u64 = runs.iter().map(|r| r.orders_assigned as u64).sum();
    let delivered: u64 = runs.iter().map(|r| r.orders_delivered as u64).sum();
    let sla_hits: u64 = runs.iter().map(|r| r.sla_hits as u64).sum();
    let wait: u64 = runs.iter().map(|r| r.total_wait_minutes).sum();
    let distance_km: f64 = runs.iter().map(|r| r.distance_km).sum();

    let pooled: Vec<u64> = runs.iter().flat_map(|r| r.delivery_times.iter().copied()).collect();

    let utilizations: Vec<f64> = runs.iter().filter_map(RunStatistics::utilization).collect();
    let avg_utilization = (!utilizations.is_empty())
        .then(|| utilizations.iter().sum::<f64>() / utilizations.len() as f64);

    let total_cost = runs
        .iter()
        .map(|r| CostBreakdown::for_run(r, rates))
        .fold(CostBreakdown::default(), |acc, c| acc + c);
    let avg_cost = if n > 0 { total_cost.scaled(1.0 / n as f64) } else { CostBreakdown::default() };

    AggregatedResult {
        agent_count,
        runs: n,
        completed_runs: runs.iter().filter(|r| r.end == RunEnd::Completed).count(),
        cancelled_runs: runs.iter().filter(|r| r.end == RunEnd::Cancelled).count(),
        avg_orders_generated: per_run(generated as f64),
        avg_orders_assigned: per_run(assigned as f64),
        avg_orders_delivered: per_run(delivered as f64),
        avg_undelivered: per_run(generated.saturating_sub(delivered) as f64),
        avg_distance_km: per_run(distance_km),
        delivery_time: DeliveryTimeStats::from_minutes(&pooled),
        sla_attainment_pct: (delivered > 0).then(|| sla_hits as f64 / delivered as f64 * 100.0),
        avg_wait_minutes: (assigned > 0).then(|| wait as f64 / assigned as f64),
        avg_utilization,
        avg_cost,
        average_cost_per_order: (delivered > 0).then(|| total_cost.total() / delivered as f64),
    }
}
