//! Dark-store facilities.

use crate::{FacilityId, GeoPoint};

/// A fulfillment point from which agents depart to deliver orders.
///
/// Produced by the clusterer after deduplication.  `id` is the 0-based
/// position in the facility list and stays stable for the simulator, the
/// optimizer, and any reporting layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facility {
    pub id:       FacilityId,
    pub name:     String,
    pub location: GeoPoint,
}

impl Facility {
    pub fn new(id: FacilityId, name: impl Into<String>, location: GeoPoint) -> Self {
        Self { id, name: name.into(), location }
    }
}

impl std::fmt::Display for Facility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{} at {}", self.name, self.id.0, self.location)
    }
}
