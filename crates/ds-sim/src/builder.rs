//! Fluent builder for constructing a [`DispatchSim`].

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use ds_core::{AgentId, DistanceModel, Facility, GeoPoint, Haversine, Polygon, SimClock, SimRng};
use ds_spatial::point_in_disk;

use crate::config::PLACEMENT_ATTEMPTS;
use crate::{Agent, AgentPlacement, DispatchConfig, DispatchSim, RunStatistics, SimError, SimResult};

/// Fluent builder for [`DispatchSim<D>`].
///
/// # Required inputs
///
/// - [`DispatchConfig`]: horizon, order quota, speeds, handling time, …
/// - the [`Facility`] the run serves and the domain [`Polygon`]
/// - the agent count and the run's [`SimRng`] stream
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                       |
/// |-------------------------|-----------------------------------------------|
/// | `.distance_model(d)`    | [`Haversine`]                                 |
/// | `.initial_positions(v)` | From `config.placement`                       |
/// | `.speeds(v)`            | Uniform draw from `config.speed_range_kmph`   |
/// | `.cancel_flag(f)`       | None (run is never cancelled)                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = DispatchSimBuilder::new(config, facility, polygon, 8, SimRng::stream(seed, 0))
///     .build()?;
/// sim.run(&mut NoopObserver);
/// let stats = sim.into_stats();
/// ```
pub struct DispatchSimBuilder<D: DistanceModel = Haversine> {
    config:      DispatchConfig,
    facility:    Facility,
    polygon:     Polygon,
    agent_count: usize,
    rng:         SimRng,
    distance:    D,
    positions:   Option<Vec<GeoPoint>>,
    speeds:      Option<Vec<f64>>,
    cancel:      Option<Arc<AtomicBool>>,
}

impl DispatchSimBuilder<Haversine> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:      DispatchConfig,
        facility:    Facility,
        polygon:     Polygon,
        agent_count: usize,
        rng:         SimRng,
    ) -> Self {
        Self {
            config,
            facility,
            polygon,
            agent_count,
            rng,
            distance:  Haversine,
            positions: None,
            speeds:    None,
            cancel:    None,
        }
    }
}

impl<D: DistanceModel> DispatchSimBuilder<D> {
    /// Replace the great-circle distance with another model.
    pub fn distance_model<D2: DistanceModel>(self, distance: D2) -> DispatchSimBuilder<D2> {
        DispatchSimBuilder {
            config:      self.config,
            facility:    self.facility,
            polygon:     self.polygon,
            agent_count: self.agent_count,
            rng:         self.rng,
            distance,
            positions:   self.positions,
            speeds:      self.speeds,
            cancel:      self.cancel,
        }
    }

    /// Supply each agent's starting location (must be length `agent_count`).
    pub fn initial_positions(mut self, positions: Vec<GeoPoint>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Supply each agent's speed in km/h (must be length `agent_count`).
    pub fn speeds(mut self, speeds: Vec<f64>) -> Self {
        self.speeds = Some(speeds);
        self
    }

    /// Stop the run at the next tick boundary once `flag` is set.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Validate inputs, place the agents, and return a ready-to-run
    /// [`DispatchSim`].
    pub fn build(mut self) -> SimResult<DispatchSim<D>> {
        self.config.validate()?;
        let agent_count = self.agent_count;

        // ── Validate and resolve optional inputs ──────────────────────────
        if let Some(p) = &self.positions {
            if p.len() != agent_count {
                return Err(SimError::AgentCountMismatch {
                    expected: agent_count,
                    got:      p.len(),
                    what:     "initial positions",
                });
            }
        }
        if let Some(s) = &self.speeds {
            if s.len() != agent_count {
                return Err(SimError::AgentCountMismatch {
                    expected: agent_count,
                    got:      s.len(),
                    what:     "speeds",
                });
            }
            if let Some(bad) = s.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
                return Err(SimError::Config(format!("agent speed must be positive, got {bad}")));
            }
        }

        // ── Place agents ──────────────────────────────────────────────────
        let home = self.facility.location;
        let (lo, hi) = self.config.speed_range_kmph;
        let mut agents = Vec::with_capacity(agent_count);
        for i in 0..agent_count {
            let location = match (&self.positions, self.config.placement) {
                (Some(p), _) => p[i],
                (None, AgentPlacement::AtFacility) => home,
                (None, AgentPlacement::Scattered) => point_in_disk(
                    home,
                    self.config.order_radius_km,
                    &self.polygon,
                    PLACEMENT_ATTEMPTS,
                    &mut self.rng,
                )
                .unwrap_or(home),
            };
            let speed = match &self.speeds {
                Some(s) => s[i],
                None => self.rng.uniform(lo, hi),
            };
            agents.push(Agent::new(AgentId(i as u32), location, speed));
        }

        let order_accumulator = self.config.order_interval().unwrap_or(0.0);

        Ok(DispatchSim {
            clock:    SimClock::new(),
            stats:    RunStatistics::new(agent_count),
            config:   self.config,
            facility: self.facility,
            polygon:  self.polygon,
            agents,
            orders:   Vec::new(),
            distance: self.distance,
            rng:      self.rng,
            order_accumulator,
            cancel:   self.cancel,
        })
    }
}
