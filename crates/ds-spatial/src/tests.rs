//! Unit tests for ds-spatial.

use ds_core::{GeoPoint, Polygon};

/// ~0.1° square around central Chandigarh.
fn city() -> Polygon {
    Polygon::new(vec![
        GeoPoint::new(30.69, 76.73),
        GeoPoint::new(30.69, 76.83),
        GeoPoint::new(30.79, 76.83),
        GeoPoint::new(30.79, 76.73),
    ])
}

/// Three collinear vertices: zero area.
fn degenerate() -> Polygon {
    Polygon::new(vec![
        GeoPoint::new(30.70, 76.70),
        GeoPoint::new(30.75, 76.75),
        GeoPoint::new(30.80, 76.80),
    ])
}

// ── Samplers ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sampler_tests {
    use super::*;
    use ds_core::SimRng;

    use crate::{gaussian_points_in_polygon, point_in_disk, uniform_points_in_polygon};

    #[test]
    fn uniform_fills_request_inside_polygon() {
        let poly = city();
        let mut rng = SimRng::new(1);
        let pts = uniform_points_in_polygon(200, &poly, &mut rng);
        assert_eq!(pts.len(), 200);
        assert!(pts.iter().all(|p| poly.contains(*p)));
    }

    #[test]
    fn uniform_on_degenerate_polygon_is_empty() {
        let mut rng = SimRng::new(1);
        let pts = uniform_points_in_polygon(50, &degenerate(), &mut rng);
        assert!(pts.is_empty());
    }

    #[test]
    fn uniform_on_empty_polygon_is_empty() {
        let mut rng = SimRng::new(1);
        assert!(uniform_points_in_polygon(10, &Polygon::default(), &mut rng).is_empty());
    }

    #[test]
    fn zero_request_returns_nothing() {
        let mut rng = SimRng::new(1);
        assert!(uniform_points_in_polygon(0, &city(), &mut rng).is_empty());
        assert!(
            gaussian_points_in_polygon(GeoPoint::new(30.74, 76.78), 0.01, 0, &city(), &mut rng)
                .is_empty()
        );
    }

    #[test]
    fn gaussian_clusters_around_center() {
        let poly = city();
        let center = GeoPoint::new(30.74, 76.78);
        let mut rng = SimRng::new(7);
        let pts = gaussian_points_in_polygon(center, 0.005, 500, &poly, &mut rng);
        assert_eq!(pts.len(), 500);
        assert!(pts.iter().all(|p| poly.contains(*p)));

        let mean_lat = pts.iter().map(|p| p.lat).sum::<f64>() / pts.len() as f64;
        let mean_lng = pts.iter().map(|p| p.lng).sum::<f64>() / pts.len() as f64;
        assert!((mean_lat - center.lat).abs() < 0.002, "mean lat {mean_lat}");
        assert!((mean_lng - center.lng).abs() < 0.002, "mean lng {mean_lng}");
    }

    #[test]
    fn gaussian_far_outside_returns_short() {
        // Hotspot 10° away with a tiny sigma: nothing lands inside.
        let mut rng = SimRng::new(3);
        let pts = gaussian_points_in_polygon(GeoPoint::new(40.0, 86.0), 0.001, 5, &city(), &mut rng);
        assert!(pts.is_empty());
    }

    #[test]
    fn disk_point_within_radius() {
        let poly = city();
        let center = GeoPoint::new(30.74, 76.78);
        let mut rng = SimRng::new(11);
        for _ in 0..200 {
            let p = point_in_disk(center, 2.0, &poly, 100, &mut rng).unwrap();
            assert!(center.distance_km(p) <= 2.0 + 1e-2);
            assert!(poly.contains(p));
        }
    }

    #[test]
    fn disk_outside_polygon_gives_none() {
        let mut rng = SimRng::new(11);
        let far = GeoPoint::new(10.0, 10.0);
        assert!(point_in_disk(far, 1.0, &city(), 100, &mut rng).is_none());
    }
}

// ── Demand ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod demand_tests {
    use super::*;
    use ds_core::SimRng;

    use crate::{DemandKind, DemandProfile, Hotspot, generate_demand};

    #[test]
    fn background_then_hotspots_tagged() {
        let profile = DemandProfile {
            background_count: 30,
            hotspots: vec![Hotspot { center: GeoPoint::new(30.74, 76.78), sigma_deg: 0.004, count: 20 }],
        };
        let mut rng = SimRng::new(5);
        let set = generate_demand(&profile, &city(), &mut rng);
        assert_eq!(set.requested, 50);
        assert_eq!(set.generated(), 50);
        assert!(set.points[..30].iter().all(|p| p.kind == DemandKind::Background));
        assert!(set.points[30..].iter().all(|p| p.kind == DemandKind::Hotspot));
        assert_eq!(set.locations().len(), 50);
    }

    #[test]
    fn shortfall_is_reported_not_raised() {
        let profile = DemandProfile { background_count: 10, hotspots: vec![] };
        let mut rng = SimRng::new(5);
        let set = generate_demand(&profile, &degenerate(), &mut rng);
        assert_eq!(set.requested, 10);
        assert_eq!(set.generated(), 0);
    }
}

// ── K-means ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cluster_tests {
    use super::*;
    use ds_core::{Equirectangular, SimRng};

    use crate::{KMeans, gaussian_points_in_polygon, uniform_points_in_polygon};

    /// Three tight, well separated blobs.
    fn blobs(rng: &mut SimRng) -> (Vec<GeoPoint>, Vec<GeoPoint>) {
        let centers = vec![
            GeoPoint::new(30.71, 76.75),
            GeoPoint::new(30.77, 76.76),
            GeoPoint::new(30.72, 76.81),
        ];
        let poly = city();
        let mut pts = Vec::new();
        for c in &centers {
            pts.extend(gaussian_points_in_polygon(*c, 0.002, 100, &poly, rng));
        }
        (pts, centers)
    }

    #[test]
    fn k_zero_is_empty() {
        let mut rng = SimRng::new(1);
        let pts = uniform_points_in_polygon(20, &city(), &mut rng);
        let out = KMeans::new(0).cluster(&pts, &city(), &mut rng);
        assert!(out.facilities.is_empty());
        assert_eq!(out.iterations, 0);
    }

    #[test]
    fn no_points_is_empty() {
        let mut rng = SimRng::new(1);
        let out = KMeans::new(3).cluster(&[], &city(), &mut rng);
        assert!(out.facilities.is_empty());
        assert_eq!(out.requested_k, 3);
    }

    #[test]
    fn finds_separated_blobs() {
        let mut rng = SimRng::new(42);
        let (pts, centers) = blobs(&mut rng);
        // Many restarts: random seeding lands one seed per blob only ~22 %
        // of the time, and Lloyd cannot split a merged pair of blobs.
        let best = (0..40)
            .map(|s| KMeans::new(3).cluster(&pts, &city(), &mut SimRng::new(s)))
            .min_by(|a, b| {
                let err = |o: &crate::ClusterOutcome| {
                    centers
                        .iter()
                        .map(|c| {
                            o.facilities
                                .iter()
                                .map(|f| f.location.distance_km(*c))
                                .fold(f64::INFINITY, f64::min)
                        })
                        .sum::<f64>()
                };
                err(a).total_cmp(&err(b))
            })
            .unwrap();

        assert_eq!(best.effective_k(), 3);
        for c in &centers {
            let nearest = best
                .facilities
                .iter()
                .map(|f| f.location.distance_km(*c))
                .fold(f64::INFINITY, f64::min);
            assert!(nearest < 0.3, "blob at {c} missed by {nearest} km");
        }
    }

    #[test]
    fn fewer_points_than_k_reduces_k() {
        let pts = vec![
            GeoPoint::new(30.70, 76.74),
            GeoPoint::new(30.75, 76.79),
            GeoPoint::new(30.78, 76.82),
        ];
        let mut rng = SimRng::new(9);
        let out = KMeans::new(10).cluster(&pts, &city(), &mut rng);
        assert_eq!(out.requested_k, 10);
        assert_eq!(out.seeded_k, 3);
        assert_eq!(out.effective_k(), 3);
    }

    #[test]
    fn identical_points_collapse_to_one_facility() {
        let pts = vec![GeoPoint::new(30.74, 76.78); 12];
        let mut rng = SimRng::new(2);
        let out = KMeans::new(4).cluster(&pts, &degenerate(), &mut rng);
        assert_eq!(out.seeded_k, 1);
        assert_eq!(out.effective_k(), 1);
        assert_eq!(out.facilities[0].location, GeoPoint::new(30.74, 76.78));
        assert!(out.converged);
    }

    #[test]
    fn repeated_locations_cap_k_inside_valid_polygon() {
        let sites = [
            GeoPoint::new(30.71, 76.75),
            GeoPoint::new(30.77, 76.76),
        ];
        let pts: Vec<GeoPoint> = sites.iter().flat_map(|s| std::iter::repeat_n(*s, 6)).collect();
        let km = KMeans::new(4);

        let a = km.cluster(&pts, &city(), &mut SimRng::new(5));
        let b = km.cluster(&pts, &city(), &mut SimRng::new(5));
        assert_eq!(a.requested_k, 4);
        assert_eq!(a.seeded_k, 2);
        assert!(a.effective_k() <= 4);
        assert_eq!(a.effective_k(), 2);
        assert!(a.facilities.iter().all(|f| city().contains(f.location)));
        assert!(a.facilities.iter().all(|f| sites.contains(&f.location)));
        assert_eq!(a.facilities, b.facilities);
    }

    #[test]
    fn reseed_samples_inside_the_polygon() {
        let pts = vec![GeoPoint::new(30.74, 76.78); 3];
        let drawn: Vec<GeoPoint> = {
            let mut rng = SimRng::new(11);
            (0..20).map(|_| crate::cluster::reseed(&pts, &city(), &mut rng)).collect()
        };
        assert!(drawn.iter().all(|p| city().contains(*p)));
        // Uniform over the polygon, not pinned to the demand point.
        assert!(drawn.iter().any(|p| *p != pts[0]));

        let mut rng = SimRng::new(11);
        let again: Vec<GeoPoint> = (0..20).map(|_| crate::cluster::reseed(&pts, &city(), &mut rng)).collect();
        assert_eq!(drawn, again);
    }

    #[test]
    fn reseed_falls_back_to_a_demand_point() {
        let pts = vec![GeoPoint::new(30.70, 76.74), GeoPoint::new(30.78, 76.82)];
        let mut rng = SimRng::new(3);
        for _ in 0..10 {
            let p = crate::cluster::reseed(&pts, &degenerate(), &mut rng);
            assert!(pts.contains(&p));
        }
    }

    #[test]
    fn ids_are_dense_and_names_stable() {
        let mut rng = SimRng::new(4);
        let pts = uniform_points_in_polygon(300, &city(), &mut rng);
        let out = KMeans::new(6).cluster(&pts, &city(), &mut rng);
        for (i, f) in out.facilities.iter().enumerate() {
            assert_eq!(f.id.index(), i);
            assert_eq!(f.name, format!("Dark Store {}", i + 1));
        }
    }

    #[test]
    fn no_two_facilities_within_tolerance() {
        let km = KMeans::new(25);
        for seed in 0..5 {
            let mut rng = SimRng::new(seed);
            let pts = uniform_points_in_polygon(60, &city(), &mut rng);
            let out = km.cluster(&pts, &city(), &mut rng);
            let proj = Equirectangular::centered_on(&pts);
            assert!(out.effective_k() <= 25);
            for (i, a) in out.facilities.iter().enumerate() {
                for b in &out.facilities[i + 1..] {
                    assert!(
                        proj.distance(a.location, b.location) >= km.coincidence_tolerance,
                        "{} and {} coincide",
                        a.location,
                        b.location
                    );
                }
            }
        }
    }

    #[test]
    fn fixed_seed_is_deterministic_and_bounded() {
        let mut data_rng = SimRng::new(100);
        let pts = uniform_points_in_polygon(400, &city(), &mut data_rng);
        let km = KMeans::new(5).max_iterations(4);

        let a = km.cluster(&pts, &city(), &mut SimRng::new(8));
        let b = km.cluster(&pts, &city(), &mut SimRng::new(8));
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.converged, b.converged);
        assert_eq!(a.facilities, b.facilities);
        assert!(a.iterations <= 4);
    }

    #[test]
    fn converges_on_tight_blobs() {
        let mut rng = SimRng::new(42);
        let (pts, _) = blobs(&mut rng);
        let out = KMeans::new(3).cluster(&pts, &city(), &mut rng);
        assert!(out.converged);
        assert!(out.iterations < 30);
    }
}
