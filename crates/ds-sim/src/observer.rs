//! Simulation observer trait for progress reporting and visualization feeds.

use ds_core::{AgentId, GeoPoint, OrderId, Tick};

use crate::{Agent, AgentStatus, Order, OrderStatus, RunStatistics};

/// What happened during one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub tick:             Tick,
    pub orders_generated: usize,
    pub assignments:      usize,
    pub deliveries:       usize,
    /// Orders still waiting for an agent at the end of the tick.
    pub pending_orders:   usize,
    /// Agents not `Available` at the end of the tick.
    pub busy_agents:      usize,
}

/// Callbacks invoked by [`DispatchSim::run`][crate::DispatchSim::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_tick_end(&mut self, s: &TickSummary) {
///         if s.tick.0 % 60 == 0 {
///             println!("{}: {} busy, {} pending", s.tick, s.busy_agents, s.pending_orders);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called every `snapshot_interval` ticks and once more with the final
    /// state.  Read-only access so visualization layers can copy what they
    /// need without the simulator knowing about any output format.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[Agent], _orders: &[Order]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _stats: &RunStatistics) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

// ── SnapshotRecorder ──────────────────────────────────────────────────────────

/// One agent's visible state.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshotRow {
    pub agent_id:       AgentId,
    pub location:       GeoPoint,
    pub status:         AgentStatus,
    pub leg_progress:   f64,
    pub assigned_order: Option<OrderId>,
}

/// One order's visible state.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderSnapshotRow {
    pub order_id: OrderId,
    pub location: GeoPoint,
    pub status:   OrderStatus,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub tick:   Tick,
    pub agents: Vec<AgentSnapshotRow>,
    pub orders: Vec<OrderSnapshotRow>,
}

/// Collects every snapshot in memory, e.g. for a map replay.
#[derive(Default)]
pub struct SnapshotRecorder {
    pub snapshots: Vec<Snapshot>,
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimObserver for SnapshotRecorder {
    fn on_snapshot(&mut self, tick: Tick, agents: &[Agent], orders: &[Order]) {
        self.snapshots.push(Snapshot {
            tick,
            agents: agents
                .iter()
                .map(|a| AgentSnapshotRow {
                    agent_id:       a.id,
                    location:       a.location,
                    status:         a.status,
                    leg_progress:   a.leg_progress,
                    assigned_order: a.assigned_order,
                })
                .collect(),
            orders: orders
                .iter()
                .map(|o| OrderSnapshotRow { order_id: o.id, location: o.location, status: o.status })
                .collect(),
        });
    }
}
