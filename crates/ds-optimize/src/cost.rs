//! Unit costs and per-run cost breakdown.

use ds_sim::RunStatistics;

/// Externally supplied unit costs, in one currency.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostRates {
    /// Per active agent-hour.  Idle time is not paid.
    pub agent_hour:   f64,
    /// Per kilometre travelled by any agent.
    pub per_km:       f64,
    /// Fixed amount per delivered order.
    pub per_delivery: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self { agent_hour: 150.0, per_km: 5.0, per_delivery: 10.0 }
    }
}

/// Operational cost split by driver.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    pub labor:    f64,
    pub distance: f64,
    pub fixed:    f64,
}

impl CostBreakdown {
    /// Cost of a single run.
    pub fn for_run(stats: &RunStatistics, rates: &CostRates) -> Self {
        Self {
            labor:    stats.active_agent_minutes as f64 / 60.0 * rates.agent_hour,
            distance: stats.distance_km * rates.per_km,
            fixed:    stats.orders_delivered as f64 * rates.per_delivery,
        }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.labor + self.distance + self.fixed
    }

    /// Component-wise `self * factor`.
    pub(crate) fn scaled(self, factor: f64) -> Self {
        Self {
            labor:    self.labor * factor,
            distance: self.distance * factor,
            fixed:    self.fixed * factor,
        }
    }
}

impl std::ops::Add for CostBreakdown {
    type Output = CostBreakdown;

    fn add(self, rhs: CostBreakdown) -> CostBreakdown {
        CostBreakdown {
            labor:    self.labor + rhs.labor,
            distance: self.distance + rhs.distance,
            fixed:    self.fixed + rhs.fixed,
        }
    }
}
