//! K-means facility placement.
//!
//! # Algorithm
//!
//! Lloyd's iteration in an equirectangular plane anchored at the mean
//! latitude of the demand points:
//!
//! 1. Seed `k` centroids from distinct demand points (sampling without
//!    replacement).  `k` is capped at the number of distinct locations at
//!    `precision`, so repeated coordinates never yield demand-less stores.
//! 2. Assign every point to its nearest centroid.  The centroids are bulk
//!    loaded into an R-tree each iteration, so assignment is
//!    O(n · log k) instead of O(n · k).
//! 3. Move each centroid to the mean of its points.  A centroid that lost
//!    all of its points is reseeded uniformly inside the domain polygon.
//! 4. Stop when the summed centroid displacement drops below `tolerance`
//!    or after `max_iterations`.
//!
//! Centroids are then rounded and deduplicated; the facility count may end
//! up below `k` and is never padded back up.

use rand::seq::index;
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use ds_core::{Equirectangular, Facility, FacilityId, GeoPoint, Polygon, SimRng};

use crate::sampler::uniform_points_in_polygon;

// ── R-tree centroid entry ─────────────────────────────────────────────────────

/// Entry stored in the per-iteration R-tree: a projected `[x, y]` point with
/// the centroid's index.
#[derive(Clone)]
struct CentroidEntry {
    point: [f64; 2],
    index: usize,
}

impl RTreeObject for CentroidEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CentroidEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── KMeans ────────────────────────────────────────────────────────────────────

/// K-means clusterer configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KMeans {
    /// Requested number of facilities.
    pub k: usize,
    /// Hard iteration cap.  Default: 30.
    pub max_iterations: usize,
    /// Convergence threshold on total centroid displacement, in the same
    /// approximate-degree unit used for assignment.  Default: 1e-4.
    pub tolerance: f64,
    /// Decimal places centroids are rounded to before deduplication.
    /// Default: 5 (≈ 1 m).
    pub precision: u32,
    /// Facilities closer than this (approximate degrees) are collapsed into
    /// one.  Default: 1e-5.
    pub coincidence_tolerance: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            k:                     5,
            max_iterations:        30,
            tolerance:             1e-4,
            precision:             5,
            coincidence_tolerance: 1e-5,
        }
    }
}

/// Result of one clustering pass.
#[derive(Clone, Debug, Default)]
pub struct ClusterOutcome {
    /// Unique facilities, ids `0..len`.
    pub facilities:  Vec<Facility>,
    /// `k` as configured.
    pub requested_k: usize,
    /// `k` after capping to the number of distinct demand locations.
    pub seeded_k:    usize,
    /// Lloyd iterations executed (≤ `max_iterations`).
    pub iterations:  usize,
    /// `true` if the displacement threshold was reached before the cap.
    pub converged:   bool,
}

impl ClusterOutcome {
    /// Number of facilities actually produced.
    pub fn effective_k(&self) -> usize {
        self.facilities.len()
    }
}

impl KMeans {
    /// Defaults with `k` facilities.
    pub fn new(k: usize) -> Self {
        Self { k, ..Self::default() }
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Cluster `points` into at most `k` facilities.
    ///
    /// Never fails: `k = 0` or no points yields an empty outcome, and too
    /// few distinct points lowers `k` with a warning.
    pub fn cluster(&self, points: &[GeoPoint], polygon: &Polygon, rng: &mut SimRng) -> ClusterOutcome {
        let mut outcome = ClusterOutcome { requested_k: self.k, ..ClusterOutcome::default() };
        if self.k == 0 || points.is_empty() {
            return outcome;
        }

        let distinct = self.distinct_points(points);
        let k = if distinct.len() < self.k {
            warn!(
                requested = self.k,
                points    = points.len(),
                distinct  = distinct.len(),
                "fewer distinct demand points than facilities; reducing k"
            );
            distinct.len()
        } else {
            self.k
        };
        outcome.seeded_k = k;

        let proj = Equirectangular::centered_on(points);
        let mut centroids: Vec<GeoPoint> = index::sample(rng.inner(), distinct.len(), k)
            .into_iter()
            .map(|i| distinct[i])
            .collect();

        // (Σlat, Σlng, count) per centroid.
        let mut sums = vec![(0.0f64, 0.0f64, 0usize); k];

        while outcome.iterations < self.max_iterations {
            outcome.iterations += 1;

            let tree = RTree::bulk_load(
                centroids
                    .iter()
                    .enumerate()
                    .map(|(index, c)| CentroidEntry { point: proj.project(*c), index })
                    .collect(),
            );

            sums.iter_mut().for_each(|s| *s = (0.0, 0.0, 0));
            for p in points {
                if let Some(nearest) = tree.nearest_neighbor(&proj.project(*p)) {
                    let s = &mut sums[nearest.index];
                    s.0 += p.lat;
                    s.1 += p.lng;
                    s.2 += 1;
                }
            }

            let mut displacement = 0.0;
            for (centroid, &(sum_lat, sum_lng, count)) in centroids.iter_mut().zip(&sums) {
                let next = if count > 0 {
                    GeoPoint::new(sum_lat / count as f64, sum_lng / count as f64)
                } else {
                    reseed(points, polygon, rng)
                };
                displacement += proj.distance(*centroid, next);
                *centroid = next;
            }

            if displacement < self.tolerance {
                outcome.converged = true;
                break;
            }
        }

        outcome.facilities = self.deduplicate(&centroids, &proj);
        if outcome.facilities.len() < k {
            warn!(
                seeded = k,
                unique = outcome.facilities.len(),
                "coincident centroids collapsed"
            );
        }
        debug!(
            iterations = outcome.iterations,
            converged = outcome.converged,
            facilities = outcome.facilities.len(),
            "k-means finished"
        );
        outcome
    }

    /// First occurrence of every location, keyed at `precision`.
    fn distinct_points(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        let mut seen: FxHashSet<(i64, i64)> = FxHashSet::default();
        points.iter().copied().filter(|p| seen.insert(p.grid_key(self.precision))).collect()
    }

    /// Round, drop repeats of the same rounded coordinate, then drop anything
    /// within `coincidence_tolerance` of an already kept facility.
    fn deduplicate(&self, centroids: &[GeoPoint], proj: &Equirectangular) -> Vec<Facility> {
        let mut seen: FxHashSet<(i64, i64)> = FxHashSet::default();
        let mut kept: Vec<GeoPoint> = Vec::with_capacity(centroids.len());

        for c in centroids {
            let rounded = c.rounded(self.precision);
            if !seen.insert(rounded.grid_key(self.precision)) {
                continue;
            }
            if kept.iter().any(|k| proj.distance(*k, rounded) < self.coincidence_tolerance) {
                continue;
            }
            kept.push(rounded);
        }

        kept.into_iter()
            .enumerate()
            .map(|(i, location)| {
                Facility::new(FacilityId(i as u32), format!("Dark Store {}", i + 1), location)
            })
            .collect()
    }
}

/// Replacement for an empty cluster's centroid: a uniform sample inside the
/// domain, or a random demand point if the polygon yields nothing.
pub(crate) fn reseed(points: &[GeoPoint], polygon: &Polygon, rng: &mut SimRng) -> GeoPoint {
    if let Some(&p) = uniform_points_in_polygon(1, polygon, rng).first() {
        return p;
    }
    // `points` is non-empty whenever clustering runs.
    rng.choose(points).copied().unwrap_or(GeoPoint::new(0.0, 0.0))
}
