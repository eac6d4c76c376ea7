//! Per-run statistics.

use ds_core::AgentId;

/// Why a run stopped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunEnd {
    /// Full order quota generated and delivered before the horizon.
    Completed,
    /// Horizon reached; any unresolved orders count as undelivered.
    #[default]
    TimeExhausted,
    /// Cooperative cancellation flag observed between ticks.
    Cancelled,
}

/// Final per-agent counters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentOutcome {
    pub id:             AgentId,
    pub deliveries:     u32,
    pub distance_km:    f64,
    pub active_minutes: u64,
}

/// Accumulator owned by one run; read-only once the run ends.
///
/// Invariant: `orders_delivered ≤ orders_assigned ≤ orders_generated`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStatistics {
    pub agent_count: usize,
    /// Ticks actually simulated (≤ `max_sim_time`).
    pub sim_minutes: u64,
    pub end:         RunEnd,

    // ── Counts ────────────────────────────────────────────────────────────
    pub orders_generated: u32,
    pub orders_assigned:  u32,
    pub orders_delivered: u32,
    pub sla_hits:         u32,

    // ── Sums ──────────────────────────────────────────────────────────────
    pub total_delivery_minutes: u64,
    pub total_wait_minutes:     u64,
    pub active_agent_minutes:   u64,
    pub distance_km:            f64,

    /// Every delivered order's placement-to-delivery time, in delivery
    /// order.  Kept raw so aggregates can compute exact min/max/std-dev.
    pub delivery_times: Vec<u64>,

    pub agents: Vec<AgentOutcome>,
}

impl RunStatistics {
    pub fn new(agent_count: usize) -> Self {
        Self { agent_count, ..Self::default() }
    }

    /// Orders generated but not delivered by the end of the run.
    pub fn undelivered(&self) -> u32 {
        self.orders_generated.saturating_sub(self.orders_delivered)
    }

    pub fn average_delivery_minutes(&self) -> Option<f64> {
        (self.orders_delivered > 0)
            .then(|| self.total_delivery_minutes as f64 / self.orders_delivered as f64)
    }

    /// Fraction of agent-time spent busy, or `None` with no agents or no
    /// simulated time.
    pub fn utilization(&self) -> Option<f64> {
        let capacity = self.agent_count as u64 * self.sim_minutes;
        (capacity > 0).then(|| self.active_agent_minutes as f64 / capacity as f64)
    }

    pub(crate) fn record_assignment(&mut self, wait_minutes: u64) {
        self.orders_assigned += 1;
        self.total_wait_minutes += wait_minutes;
    }

    pub(crate) fn record_delivery(&mut self, minutes: u64, sla_minutes: u64) {
        self.orders_delivered += 1;
        self.total_delivery_minutes += minutes;
        self.delivery_times.push(minutes);
        if minutes <= sla_minutes {
            self.sla_hits += 1;
        }
    }
}
