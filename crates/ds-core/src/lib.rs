//! `ds-core`: foundational types for the `darkstore` workforce planner.
//!
//! This crate is a dependency of every other `ds-*` crate.  It has no `ds-*`
//! dependencies and minimal external ones (only `rand`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `OrderId`, `FacilityId`                         |
//! | [`geo`]         | `GeoPoint`, `DistanceModel`, `Haversine`, `Equirectangular`|
//! | [`polygon`]     | `Polygon`, ray-casting containment, bounding box           |
//! | [`facility`]    | `Facility` (dark store)                                    |
//! | [`time`]        | `Tick`, `SimClock`                                         |
//! | [`rng`]         | `SimRng` (one independent stream per run)                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod facility;
pub mod geo;
pub mod ids;
pub mod polygon;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use facility::Facility;
pub use geo::{DistanceModel, Equirectangular, GeoPoint, Haversine};
pub use ids::{AgentId, FacilityId, OrderId};
pub use polygon::{BoundingBox, Polygon};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
