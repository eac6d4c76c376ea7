//! Agent-count sweep and cost-based recommendation.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use ds_core::{Facility, FacilityId, Polygon, SimRng};
use ds_sim::{DispatchConfig, DispatchSimBuilder, NoopObserver, RunStatistics, SimResult};
use tracing::{info, warn};

use crate::{AggregatedResult, CostRates, OptimizeError, OptimizeResult, aggregate};

/// Sweep parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizerConfig {
    /// Agent counts to test, inclusive.  Default: `1..=15`.
    pub agent_range:    RangeInclusive<usize>,
    /// Independent runs per agent count.  Default: 10.
    pub runs_per_count: usize,
    /// Root of every run's RNG stream.
    pub seed:           u64,
    pub dispatch:       DispatchConfig,
    pub rates:          CostRates,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            agent_range:    1..=15,
            runs_per_count: 10,
            seed:           42,
            dispatch:       DispatchConfig::default(),
            rates:          CostRates::default(),
        }
    }
}

/// The sweep's verdict.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recommendation {
    /// Cheapest agent count per delivered order.
    Feasible { agent_count: usize, average_cost_per_order: f64 },
    /// No fully simulated count delivered anything, or nothing was tested.
    NoFeasibleConfiguration,
}

impl Recommendation {
    /// Pick the entry with the lowest cost per order.  `None` costs count as
    /// +∞; the earliest (lowest agent count) entry wins a tie.  Entries with
    /// any cancelled run are skipped.
    pub fn select(results: &[AggregatedResult]) -> Recommendation {
        let mut best: Option<(usize, f64)> = None;
        for r in results {
            if r.cancelled_runs > 0 {
                continue;
            }
            let Some(cost) = r.average_cost_per_order else { continue };
            if best.is_none_or(|(_, b)| cost < b) {
                best = Some((r.agent_count, cost));
            }
        }
        match best {
            Some((agent_count, average_cost_per_order)) => {
                Recommendation::Feasible { agent_count, average_cost_per_order }
            }
            None => Recommendation::NoFeasibleConfiguration,
        }
    }

    pub fn agent_count(&self) -> Option<usize> {
        match self {
            Recommendation::Feasible { agent_count, .. } => Some(*agent_count),
            Recommendation::NoFeasibleConfiguration => None,
        }
    }
}

/// Result of [`WorkforceOptimizer::optimize`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sweep {
    /// One entry per tested agent count, ascending.
    pub results:        Vec<AggregatedResult>,
    pub recommendation: Recommendation,
    /// `true` if at least one run was stopped by the cancellation flag.
    pub cancelled:      bool,
}

impl Sweep {
    /// The result row behind the recommendation.
    pub fn recommended(&self) -> Option<&AggregatedResult> {
        let count = self.recommendation.agent_count()?;
        self.results.iter().find(|r| r.agent_count == count)
    }
}

/// Runs every `(agent count, run)` job of a sweep and aggregates per count.
///
/// Each job is a fresh [`DispatchSim`][ds_sim::DispatchSim] seeded from
/// `SimRng::stream(seed, count << 32 | run)`, so results are identical
/// whether jobs run sequentially or (with the `parallel` feature) on Rayon's
/// pool.
pub struct WorkforceOptimizer {
    pub config: OptimizerConfig,
    cancel:     Option<Arc<AtomicBool>>,
}

impl WorkforceOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config, cancel: None }
    }

    /// Every run stops at its next tick boundary once `flag` is set.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Sweep the agent range for `selected`, drawing order locations inside
    /// `polygon`.
    pub fn optimize(
        &self,
        facilities: &[Facility],
        selected:   FacilityId,
        polygon:    &Polygon,
    ) -> OptimizeResult<Sweep> {
        let cfg = &self.config;
        let facility = facilities.iter().find(|f| f.id == selected).ok_or_else(|| {
            OptimizeError::InvalidSelection(format!(
                "{selected} is not among {} facilities",
                facilities.len()
            ))
        })?;
        if cfg.agent_range.start() > cfg.agent_range.end() {
            return Err(OptimizeError::InvalidSelection(format!(
                "agent range {}..={} is inverted",
                cfg.agent_range.start(),
                cfg.agent_range.end()
            )));
        }
        cfg.dispatch.validate()?;

        let runs = cfg.runs_per_count;
        if runs == 0 {
            warn!("runs_per_count is 0; nothing to simulate");
            return Ok(Sweep {
                results:        Vec::new(),
                recommendation: Recommendation::NoFeasibleConfiguration,
                cancelled:      false,
            });
        }

        let jobs: Vec<(usize, usize)> = cfg
            .agent_range
            .clone()
            .flat_map(|count| (0..runs).map(move |run| (count, run)))
            .collect();
        info!(
            facility = %facility.name,
            counts   = jobs.len() / runs,
            runs,
            "starting workforce sweep"
        );

        let stats = self.run_jobs(&jobs, facility, polygon)?;

        let mut results = Vec::with_capacity(jobs.len() / runs);
        for (count, chunk) in cfg.agent_range.clone().zip(stats.chunks(runs)) {
            let result = aggregate(count, chunk, &cfg.rates);
            info!(
                agents         = count,
                avg_minutes    = ?result.avg_delivery_minutes(),
                sla_pct        = ?result.sla_attainment_pct,
                cost_per_order = ?result.average_cost_per_order,
                "aggregated agent count"
            );
            results.push(result);
        }

        let cancelled = results.iter().any(|r| r.cancelled_runs > 0);
        if cancelled {
            let truncated = results.iter().filter(|r| r.cancelled_runs > 0).count();
            warn!(truncated, counts = results.len(), "sweep cancelled; truncated counts are not recommended");
        }

        let recommendation = Recommendation::select(&results);
        match recommendation {
            Recommendation::Feasible { agent_count, average_cost_per_order } => {
                info!(agent_count, average_cost_per_order, "recommended staffing");
            }
            Recommendation::NoFeasibleConfiguration => {
                warn!("no fully simulated agent count delivered any order");
            }
        }
        Ok(Sweep { results, recommendation, cancelled })
    }

    /// Run every job; results come back in `jobs` order.
    fn run_jobs(
        &self,
        jobs:     &[(usize, usize)],
        facility: &Facility,
        polygon:  &Polygon,
    ) -> SimResult<Vec<RunStatistics>> {
        let run_one = |&(count, run): &(usize, usize)| -> SimResult<RunStatistics> {
            let rng = SimRng::stream(self.config.seed, ((count as u64) << 32) | run as u64);
            let mut builder = DispatchSimBuilder::new(
                self.config.dispatch.clone(),
                facility.clone(),
                polygon.clone(),
                count,
                rng,
            );
            if let Some(flag) = &self.cancel {
                builder = builder.cancel_flag(Arc::clone(flag));
            }
            let mut sim = builder.build()?;
            sim.run(&mut NoopObserver);
            Ok(sim.into_stats())
        };

        #[cfg(not(feature = "parallel"))]
        {
            jobs.iter().map(run_one).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Indexed collect keeps job order regardless of completion order.
            jobs.par_iter().map(run_one).collect()
        }
    }
}
