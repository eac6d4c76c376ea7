//! Per-run dispatch configuration.

use crate::{SimError, SimResult};

/// Polygon re-sampling budget for one order or agent location.
pub const PLACEMENT_ATTEMPTS: usize = 100;

/// Where agents start a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentPlacement {
    /// Every agent starts at the facility.
    AtFacility,
    /// Uniformly inside the order disk around the facility (clipped to the
    /// domain polygon).  Fresh positions every run.
    #[default]
    Scattered,
}

/// Numeric parameters of one simulation run.
///
/// Typically deserialized from a scenario file by the application (enable
/// the `serde` feature) and shared read-only by every run of a sweep.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchConfig {
    /// Run horizon in ticks (minutes).  Default: 240.
    pub max_sim_time: u64,

    /// Orders generated per run, spread evenly over the horizon.
    /// Default: 60.
    pub target_orders: u32,

    /// Orders are placed uniformly within this radius of the facility.
    /// Default: 3 km.
    pub order_radius_km: f64,

    /// Minutes an agent spends at the facility picking up an order.
    /// Default: 5.
    pub handling_minutes: u64,

    /// Multiplier applied to agent speed to model congestion.  Must be > 0.
    /// Default: 1.0.
    pub traffic_factor: f64,

    /// Agent speeds are drawn uniformly from `[min, max]` km/h.
    /// Default: 15–25.
    pub speed_range_kmph: (f64, f64),

    /// Delivery-time target in minutes.  Default: 30.
    pub sla_minutes: u64,

    /// Agents closer than this to the facility count as already there
    /// (no travel time in the ETA, zero-length leg).  Default: 1 m.
    pub at_facility_tolerance_km: f64,

    pub placement: AgentPlacement,

    /// Emit an observer snapshot every N ticks; 0 = final tick only.
    pub snapshot_interval: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_sim_time:             240,
            target_orders:            60,
            order_radius_km:          3.0,
            handling_minutes:         5,
            traffic_factor:           1.0,
            speed_range_kmph:         (15.0, 25.0),
            sla_minutes:              30,
            at_facility_tolerance_km: 0.001,
            placement:                AgentPlacement::Scattered,
            snapshot_interval:        0,
        }
    }
}

impl DispatchConfig {
    /// Reject values that would make travel times infinite, negative, or NaN.
    pub fn validate(&self) -> SimResult<()> {
        let (lo, hi) = self.speed_range_kmph;
        if !(self.traffic_factor.is_finite() && self.traffic_factor > 0.0) {
            return Err(SimError::Config(format!(
                "traffic_factor must be positive, got {}",
                self.traffic_factor
            )));
        }
        if !(lo.is_finite() && hi.is_finite() && lo > 0.0) {
            return Err(SimError::Config(format!(
                "speed_range_kmph must be positive, got ({lo}, {hi})"
            )));
        }
        if hi < lo {
            return Err(SimError::Config(format!(
                "speed_range_kmph is inverted: ({lo}, {hi})"
            )));
        }
        if !(self.order_radius_km >= 0.0) {
            return Err(SimError::Config(format!(
                "order_radius_km must be non-negative, got {}",
                self.order_radius_km
            )));
        }
        if !(self.at_facility_tolerance_km >= 0.0) {
            return Err(SimError::Config(format!(
                "at_facility_tolerance_km must be non-negative, got {}",
                self.at_facility_tolerance_km
            )));
        }
        Ok(())
    }

    /// Ticks between order arrivals, or `None` when no orders are wanted.
    pub fn order_interval(&self) -> Option<f64> {
        (self.target_orders > 0).then(|| self.max_sim_time as f64 / self.target_orders as f64)
    }

    /// Minutes to cover `km` at `speed_kmph` under the traffic factor.
    #[inline]
    pub fn travel_minutes(&self, km: f64, speed_kmph: f64) -> f64 {
        km / (speed_kmph * self.traffic_factor) * 60.0
    }
}
