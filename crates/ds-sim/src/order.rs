//! Customer orders.

use ds_core::{AgentId, GeoPoint, OrderId, Tick};

/// Order life cycle: `Pending → Assigned → Delivered`.  `Delivered` is
/// terminal; an order still `Pending` or `Assigned` when the run ends is
/// undelivered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderStatus {
    #[default]
    Pending,
    Assigned,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending   => "pending",
            OrderStatus::Assigned  => "assigned",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer order.  `assigned_agent` is `Some` iff the status is
/// `Assigned` or `Delivered`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub id:              OrderId,
    pub location:        GeoPoint,
    pub status:          OrderStatus,
    pub time_placed:     Tick,
    pub assigned_agent:  Option<AgentId>,
    pub assignment_time: Option<Tick>,
    pub delivered_at:    Option<Tick>,
}

impl Order {
    pub fn new(id: OrderId, location: GeoPoint, time_placed: Tick) -> Self {
        Self {
            id,
            location,
            status:          OrderStatus::Pending,
            time_placed,
            assigned_agent:  None,
            assignment_time: None,
            delivered_at:    None,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Minutes from placement to delivery.
    pub fn delivery_minutes(&self) -> Option<u64> {
        self.delivered_at.map(|t| t.since(self.time_placed))
    }

    /// Minutes from placement to assignment.
    pub fn wait_minutes(&self) -> Option<u64> {
        self.assignment_time.map(|t| t.since(self.time_placed))
    }

    pub(crate) fn assign(&mut self, agent: AgentId, now: Tick) {
        debug_assert!(self.is_pending());
        self.status = OrderStatus::Assigned;
        self.assigned_agent = Some(agent);
        self.assignment_time = Some(now);
    }

    pub(crate) fn deliver(&mut self, now: Tick) {
        debug_assert_eq!(self.status, OrderStatus::Assigned);
        self.status = OrderStatus::Delivered;
        self.delivered_at = Some(now);
    }
}
