//! `ds-spatial`: demand generation and facility placement.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`sampler`]   | Rejection samplers: uniform, Gaussian (Box–Muller), disk        |
//! | [`demand`]    | `DemandProfile`, `DemandPoint`, `generate_demand`               |
//! | [`cluster`]   | `KMeans` facility clusterer, `ClusterOutcome`                   |
//!
//! # Degraded results
//!
//! Nothing in this crate fails for lack of data.  Samplers stop after a
//! fixed attempt budget and return what they found; the clusterer lowers
//! `k` when there are fewer points than requested and collapses coincident
//! centroids.  The shortfall is reported in the returned structs
//! (`DemandSet::generated`, `ClusterOutcome::effective_k`) and logged with
//! `tracing::warn!`.

pub mod cluster;
pub mod demand;
pub mod sampler;

#[cfg(test)]
mod tests;

pub use cluster::{ClusterOutcome, KMeans};
pub use demand::{DemandKind, DemandPoint, DemandProfile, DemandSet, Hotspot, generate_demand};
pub use sampler::{
    ATTEMPTS_PER_POINT, gaussian_points_in_polygon, point_in_disk, uniform_points_in_polygon,
};
