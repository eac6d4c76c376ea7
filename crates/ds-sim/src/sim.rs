//! The `DispatchSim` struct and its tick loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ds_core::{AgentId, DistanceModel, Facility, GeoPoint, Haversine, OrderId, Polygon, SimClock, SimRng, Tick};
use ds_spatial::point_in_disk;
use tracing::{debug, trace};

use crate::agent::Motion;
use crate::config::PLACEMENT_ATTEMPTS;
use crate::{Agent, AgentOutcome, DispatchConfig, Order, RunEnd, RunStatistics, SimObserver, StepEvent, TickSummary};

/// One simulated staffing scenario: a facility, `N` agents, and a stream of
/// orders over a fixed horizon.
///
/// `DispatchSim<D>` owns all run state and drives the three-phase tick loop:
///
/// 1. **Generate**: place orders at a steady rate until the quota is met.
/// 2. **Dispatch** (snapshot-then-apply): every pending order, in ascending
///    id, claims the unclaimed available agent with the lowest ETA.
/// 3. **Move**: every busy agent takes one state-machine step; deliveries
///    are recorded at the tick they happen.
///
/// The run stops once every generated order of a full quota is delivered,
/// at `max_sim_time`, or when the cancel flag is raised.
///
/// Create via [`DispatchSimBuilder`][crate::DispatchSimBuilder].
pub struct DispatchSim<D: DistanceModel = Haversine> {
    pub config:   DispatchConfig,
    pub clock:    SimClock,
    pub facility: Facility,
    /// Order locations are clipped to this polygon.
    pub polygon:  Polygon,
    /// Indexed by `AgentId`.
    pub agents:   Vec<Agent>,
    /// Indexed by `OrderId`, in generation order.
    pub orders:   Vec<Order>,
    pub stats:    RunStatistics,
    pub distance: D,

    pub(crate) rng:               SimRng,
    /// Fractional orders owed; one fires each time it reaches the interval.
    pub(crate) order_accumulator: f64,
    pub(crate) cancel:            Option<Arc<AtomicBool>>,
}

impl<D: DistanceModel> DispatchSim<D> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick until the run ends, calling observer hooks
    /// at every tick boundary.
    ///
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> RunEnd {
        let end = loop {
            if self.quota_complete() {
                break RunEnd::Completed;
            }
            if self.is_cancelled() {
                break RunEnd::Cancelled;
            }
            let now = self.clock.current_tick;
            if now.0 >= self.config.max_sim_time {
                break RunEnd::TimeExhausted;
            }

            observer.on_tick_start(now);
            let summary = self.process_tick(now);
            observer.on_tick_end(&summary);
            let interval = self.config.snapshot_interval;
            if interval > 0 && now.0.is_multiple_of(interval) {
                observer.on_snapshot(now, &self.agents, &self.orders);
            }

            self.clock.advance();
        };

        self.finish(end);
        observer.on_snapshot(self.clock.current_tick, &self.agents, &self.orders);
        observer.on_sim_end(&self.stats);
        end
    }

    /// Agent by id, if it exists.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    /// Consume the run and keep only its statistics.
    pub fn into_stats(self) -> RunStatistics {
        self.stats
    }

    /// Estimated minutes for `agent` to pick up at the facility and reach
    /// `customer`.
    pub fn eta_minutes(&self, agent: &Agent, customer: GeoPoint) -> f64 {
        let home = self.facility.location;
        let to_store_km = self.distance.distance_km(agent.location, home);
        let to_store = if to_store_km <= self.config.at_facility_tolerance_km {
            0.0
        } else {
            self.config.travel_minutes(to_store_km, agent.speed_kmph)
        };
        let to_customer_km = self.distance.distance_km(home, customer);
        to_store
            + self.config.handling_minutes as f64
            + self.config.travel_minutes(to_customer_km, agent.speed_kmph)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> TickSummary {
        let orders_generated = self.generate_orders(now);
        let assignments = self.dispatch(now);
        let deliveries = self.move_agents(now);

        TickSummary {
            tick: now,
            orders_generated,
            assignments,
            deliveries,
            pending_orders: self.orders.iter().filter(|o| o.is_pending()).count(),
            busy_agents:    self.agents.iter().filter(|a| !a.is_available()).count(),
        }
    }

    /// Phase 1.  Several orders may fire in one tick when the interval is
    /// shorter than a minute.
    fn generate_orders(&mut self, now: Tick) -> usize {
        let Some(interval) = self.config.order_interval() else {
            return 0;
        };
        let mut fired = 0;
        while self.order_accumulator >= interval
            && self.stats.orders_generated < self.config.target_orders
        {
            self.spawn_order(now);
            self.order_accumulator -= interval;
            fired += 1;
        }
        self.order_accumulator += 1.0;
        fired
    }

    fn spawn_order(&mut self, now: Tick) {
        let home = self.facility.location;
        let location = point_in_disk(
            home,
            self.config.order_radius_km,
            &self.polygon,
            PLACEMENT_ATTEMPTS,
            &mut self.rng,
        )
        .unwrap_or_else(|| {
            trace!(tick = now.0, "order placement fell back to facility");
            home
        });
        let id = OrderId(self.orders.len() as u32);
        self.orders.push(Order::new(id, location, now));
        self.stats.orders_generated += 1;
    }

    /// Phase 2.  Decisions are taken against a snapshot of pending orders and
    /// available agents, then applied together.
    fn dispatch(&mut self, now: Tick) -> usize {
        let mut available: Vec<usize> = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_available())
            .map(|(i, _)| i)
            .collect();

        let mut decisions: Vec<(usize, usize)> = Vec::new();
        for (oi, order) in self.orders.iter().enumerate() {
            if available.is_empty() {
                break;
            }
            if !order.is_pending() {
                continue;
            }
            let mut best: Option<(usize, f64)> = None;
            for (pos, &ai) in available.iter().enumerate() {
                let eta = self.eta_minutes(&self.agents[ai], order.location);
                // Strict `<`: the lowest agent id wins a tie.
                if best.is_none_or(|(_, b)| eta < b) {
                    best = Some((pos, eta));
                }
            }
            if let Some((pos, _)) = best {
                decisions.push((oi, available.remove(pos)));
            }
        }

        let home = self.facility.location;
        for &(oi, ai) in &decisions {
            let order = &mut self.orders[oi];
            let agent = &mut self.agents[ai];
            agent.assign(order.id, home, order.location);
            order.assign(agent.id, now);
            self.stats.record_assignment(now.since(order.time_placed));
        }
        decisions.len()
    }

    /// Phase 3.  Returns the number of deliveries completed this tick.
    fn move_agents(&mut self, now: Tick) -> usize {
        let motion = Motion {
            distance:         &self.distance,
            traffic_factor:   self.config.traffic_factor,
            handling_minutes: self.config.handling_minutes,
            tolerance_km:     self.config.at_facility_tolerance_km,
        };

        let mut delivered: Vec<OrderId> = Vec::new();
        for agent in self.agents.iter_mut().filter(|a| !a.is_available()) {
            agent.active_minutes += 1;
            self.stats.active_agent_minutes += 1;

            let before_km = agent.distance_km;
            if let StepEvent::Delivered(order) = agent.step(&motion) {
                delivered.push(order);
            }
            self.stats.distance_km += agent.distance_km - before_km;
        }

        for &id in &delivered {
            let order = &mut self.orders[id.index()];
            order.deliver(now);
            self.stats
                .record_delivery(now.since(order.time_placed), self.config.sla_minutes);
        }
        delivered.len()
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn quota_complete(&self) -> bool {
        self.stats.orders_generated >= self.config.target_orders
            && self.stats.orders_delivered == self.stats.orders_generated
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn finish(&mut self, end: RunEnd) {
        self.stats.sim_minutes = self.clock.current_tick.0;
        self.stats.end = end;
        self.stats.agents = self
            .agents
            .iter()
            .map(|a| AgentOutcome {
                id:             a.id,
                deliveries:     a.deliveries,
                distance_km:    a.distance_km,
                active_minutes: a.active_minutes,
            })
            .collect();

        debug!(
            agents    = self.agents.len(),
            minutes   = self.stats.sim_minutes,
            generated = self.stats.orders_generated,
            delivered = self.stats.orders_delivered,
            end       = ?end,
            "dispatch run finished"
        );
    }
}
