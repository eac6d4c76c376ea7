//! Delivery agents and their state machine.

use ds_core::{AgentId, DistanceModel, GeoPoint, OrderId};

/// Progress this close to 1 counts as arrival; absorbs float drift from
/// accumulating `step / leg` over many ticks.
const ARRIVAL_EPSILON: f64 = 1e-9;

// ── AgentStatus ───────────────────────────────────────────────────────────────

/// The agent life cycle.
///
/// ```text
/// Available ──assign──▶ ToStore ──leg 0 done──▶ AtStore ──dwell ≥ handling──▶ ToCustomer
///     ▲                                                                         │
///     └──────────────────────────── leg 1 done (delivery) ◀──────────────────────┘
/// ```
///
/// The cycle is strict: every status has exactly one successor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentStatus {
    #[default]
    Available,
    ToStore,
    AtStore,
    ToCustomer,
}

impl AgentStatus {
    pub const ALL: [AgentStatus; 4] = [
        AgentStatus::Available,
        AgentStatus::ToStore,
        AgentStatus::AtStore,
        AgentStatus::ToCustomer,
    ];

    /// The only status reachable from `self`.
    pub fn next(self) -> AgentStatus {
        match self {
            AgentStatus::Available  => AgentStatus::ToStore,
            AgentStatus::ToStore    => AgentStatus::AtStore,
            AgentStatus::AtStore    => AgentStatus::ToCustomer,
            AgentStatus::ToCustomer => AgentStatus::Available,
        }
    }

    #[inline]
    pub fn can_transition_to(self, to: AgentStatus) -> bool {
        self.next() == to
    }

    /// Route leg traversed in this status: 0 = agent → facility,
    /// 1 = facility → customer.
    pub fn leg(self) -> Option<usize> {
        match self {
            AgentStatus::ToStore    => Some(0),
            AgentStatus::ToCustomer => Some(1),
            AgentStatus::Available | AgentStatus::AtStore => None,
        }
    }

    /// Human-readable label for snapshots and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Available  => "available",
            AgentStatus::ToStore    => "to_store",
            AgentStatus::AtStore    => "at_store",
            AgentStatus::ToCustomer => "to_customer",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// Per-tick movement parameters shared by every agent of a run.
pub(crate) struct Motion<'a, D: DistanceModel> {
    pub distance:         &'a D,
    pub traffic_factor:   f64,
    pub handling_minutes: u64,
    pub tolerance_km:     f64,
}

/// What happened to an agent during one [`Agent::step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepEvent {
    Idle,
    Travelling,
    ArrivedAtStore,
    Dwelling,
    LeftStore,
    Delivered(OrderId),
}

/// A delivery agent.  Owned by exactly one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:             AgentId,
    pub location:       GeoPoint,
    pub speed_kmph:     f64,
    pub status:         AgentStatus,
    pub assigned_order: Option<OrderId>,
    /// `[start, facility, customer]` while busy; empty when available.
    pub route:          Vec<GeoPoint>,
    /// Fraction of the current leg covered, in `[0, 1]`.
    pub leg_progress:   f64,
    /// Ticks spent at the facility for the current order.
    pub dwell_ticks:    u64,

    // ── Outcome counters ──────────────────────────────────────────────────
    pub deliveries:     u32,
    pub distance_km:    f64,
    pub active_minutes: u64,
}

impl Agent {
    pub fn new(id: AgentId, location: GeoPoint, speed_kmph: f64) -> Self {
        Self {
            id,
            location,
            speed_kmph,
            status:         AgentStatus::Available,
            assigned_order: None,
            route:          Vec::new(),
            leg_progress:   0.0,
            dwell_ticks:    0,
            deliveries:     0,
            distance_km:    0.0,
            active_minutes: 0,
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == AgentStatus::Available
    }

    /// Endpoints of the leg being traversed, if any.
    pub fn current_leg(&self) -> Option<(GeoPoint, GeoPoint)> {
        let leg = self.status.leg()?;
        Some((*self.route.get(leg)?, *self.route.get(leg + 1)?))
    }

    /// Available → ToStore with route `[here, facility, customer]`.
    pub(crate) fn assign(&mut self, order: OrderId, facility: GeoPoint, customer: GeoPoint) {
        debug_assert!(self.is_available());
        self.status = AgentStatus::ToStore;
        self.assigned_order = Some(order);
        self.route = vec![self.location, facility, customer];
        self.leg_progress = 0.0;
        self.dwell_ticks = 0;
    }

    /// Advance one tick through the state machine.
    ///
    /// At most one leg completes per tick and progress never overshoots 1.
    /// Zero-length legs (within the facility tolerance) complete on the
    /// tick they are entered.
    pub(crate) fn step<D: DistanceModel>(&mut self, motion: &Motion<'_, D>) -> StepEvent {
        match self.status {
            AgentStatus::Available => StepEvent::Idle,

            AgentStatus::ToStore => {
                if !self.advance_leg(motion) {
                    return StepEvent::Travelling;
                }
                self.status = AgentStatus::AtStore;
                self.dwell_ticks = 0;
                if motion.handling_minutes == 0 {
                    self.leave_store();
                    return StepEvent::LeftStore;
                }
                StepEvent::ArrivedAtStore
            }

            AgentStatus::AtStore => {
                self.dwell_ticks += 1;
                if self.dwell_ticks >= motion.handling_minutes {
                    self.leave_store();
                    StepEvent::LeftStore
                } else {
                    StepEvent::Dwelling
                }
            }

            AgentStatus::ToCustomer => {
                if !self.advance_leg(motion) {
                    return StepEvent::Travelling;
                }
                let order = self.assigned_order.take();
                self.status = AgentStatus::Available;
                self.route.clear();
                self.leg_progress = 0.0;
                self.dwell_ticks = 0;
                match order {
                    Some(order) => {
                        self.deliveries += 1;
                        StepEvent::Delivered(order)
                    }
                    None => StepEvent::Idle,
                }
            }
        }
    }

    fn leave_store(&mut self) {
        self.status = AgentStatus::ToCustomer;
        self.leg_progress = 0.0;
    }

    /// Move along the current leg.  Returns `true` when the leg is complete.
    fn advance_leg<D: DistanceModel>(&mut self, motion: &Motion<'_, D>) -> bool {
        let Some((from, to)) = self.current_leg() else {
            return true;
        };
        let leg_km = motion.distance.distance_km(from, to);
        if leg_km <= motion.tolerance_km {
            self.leg_progress = 1.0;
            self.location = to;
            return true;
        }

        let step_km = self.speed_kmph * motion.traffic_factor / 60.0;
        let remaining_km = (1.0 - self.leg_progress) * leg_km;
        self.distance_km += step_km.min(remaining_km);

        self.leg_progress = (self.leg_progress + step_km / leg_km).min(1.0);
        if 1.0 - self.leg_progress < ARRIVAL_EPSILON {
            self.leg_progress = 1.0;
        }
        if self.leg_progress >= 1.0 {
            self.location = to;
            return true;
        }
        self.location = from.lerp(to, self.leg_progress);
        false
    }
}
