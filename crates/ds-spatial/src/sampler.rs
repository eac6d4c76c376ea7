//! Rejection samplers over an arbitrary simple polygon.
//!
//! Every sampler draws candidates from a cheap proposal distribution and
//! keeps those that pass [`Polygon::contains`].  The total number of
//! candidates is capped, so a degenerate (zero-area) polygon or a hotspot
//! centred far outside the boundary ends the loop with a short result
//! instead of spinning forever.

use std::f64::consts::TAU;

use ds_core::{GeoPoint, Polygon, SimRng};
use tracing::warn;

/// Candidate budget per requested point: `n` points get `500·n` attempts.
pub const ATTEMPTS_PER_POINT: usize = 500;

/// Up to `n` points uniformly distributed inside `polygon`.
///
/// Candidates are drawn uniformly from the polygon's bounding box.  Returns
/// fewer than `n` points if the attempt budget runs out; callers must
/// tolerate a short (possibly empty) result.
pub fn uniform_points_in_polygon(n: usize, polygon: &Polygon, rng: &mut SimRng) -> Vec<GeoPoint> {
    let Some(bbox) = polygon.bbox() else {
        return Vec::new();
    };
    rejection_sample(n, polygon, || {
        GeoPoint::new(
            rng.uniform(bbox.min_lat, bbox.max_lat),
            rng.uniform(bbox.min_lng, bbox.max_lng),
        )
    })
}

/// Up to `n` points normally distributed around `center` with standard
/// deviation `sigma_deg` (degrees, both axes), clipped to `polygon`.
///
/// Same attempt budget and short-result policy as
/// [`uniform_points_in_polygon`].
pub fn gaussian_points_in_polygon(
    center:    GeoPoint,
    sigma_deg: f64,
    n:         usize,
    polygon:   &Polygon,
    rng:       &mut SimRng,
) -> Vec<GeoPoint> {
    rejection_sample(n, polygon, || {
        let (z0, z1) = box_muller(rng);
        GeoPoint::new(center.lat + z0 * sigma_deg, center.lng + z1 * sigma_deg)
    })
}

/// One point uniformly distributed in the disk of `radius_km` around
/// `center` that also lies inside `polygon`.
///
/// Tries at most `attempts` candidates and returns `None` if all of them
/// fall outside; the caller picks the fallback.
pub fn point_in_disk(
    center:    GeoPoint,
    radius_km: f64,
    polygon:   &Polygon,
    attempts:  usize,
    rng:       &mut SimRng,
) -> Option<GeoPoint> {
    (0..attempts).find_map(|_| {
        // sqrt keeps the density uniform over the disk area.
        let r = radius_km * rng.random::<f64>().sqrt();
        let theta = rng.uniform(0.0, TAU);
        let p = center.offset_km(r * theta.cos(), r * theta.sin());
        polygon.contains(p).then_some(p)
    })
}

/// Two independent standard-normal samples from two uniforms.
fn box_muller(rng: &mut SimRng) -> (f64, f64) {
    let u1 = rng.unit_open_low();
    let u2 = rng.random::<f64>();
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = TAU * u2;
    (r * theta.cos(), r * theta.sin())
}

fn rejection_sample<F>(n: usize, polygon: &Polygon, mut candidate: F) -> Vec<GeoPoint>
where
    F: FnMut() -> GeoPoint,
{
    let budget = n.saturating_mul(ATTEMPTS_PER_POINT);
    let mut out = Vec::with_capacity(n);
    let mut attempts = 0usize;
    while out.len() < n && attempts < budget {
        attempts += 1;
        let p = candidate();
        if polygon.contains(p) {
            out.push(p);
        }
    }
    if out.len() < n {
        warn!(requested = n, generated = out.len(), attempts, "sampling budget exhausted");
    }
    out
}
