//! Unit tests for ds-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, FacilityId, OrderId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(OrderId(0) < OrderId(1));
        assert!(FacilityId(3) > FacilityId(2));
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(FacilityId(0).to_string(), "FacilityId(0)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{DistanceModel, Equirectangular, GeoPoint, Haversine};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(30.74, 76.78);
        assert!(p.distance_km(p) < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = GeoPoint::new(30.0, 76.0);
        let b = GeoPoint::new(31.0, 76.0);
        let d = Haversine.distance_km(a, b);
        assert!((d - 111.195).abs() < 0.5, "got {d}");
    }

    #[test]
    fn offset_km_matches_haversine() {
        let origin = GeoPoint::new(30.74, 76.78);
        let north = origin.offset_km(2.0, 0.0);
        let east = origin.offset_km(0.0, 2.0);
        assert!((origin.distance_km(north) - 2.0).abs() < 0.02);
        assert!((origin.distance_km(east) - 2.0).abs() < 0.02);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(2.0, 4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), GeoPoint::new(1.0, 2.0));
    }

    #[test]
    fn rounding_and_grid_key() {
        let p = GeoPoint::new(30.123_456_7, 76.987_654_3);
        assert_eq!(p.grid_key(5), (3_012_346, 7_698_765));
        let r = p.rounded(5);
        assert!((r.lat - 30.12346).abs() < 1e-12);
        assert_eq!(r.grid_key(5), p.grid_key(5));
    }

    #[test]
    fn equirectangular_shrinks_longitude() {
        let proj = Equirectangular::new(60.0);
        let a = GeoPoint::new(60.0, 10.0);
        let b = GeoPoint::new(60.0, 11.0);
        // cos(60°) = 0.5
        assert!((proj.distance(a, b) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn equirectangular_centered_on_empty_is_equator() {
        let proj = Equirectangular::centered_on(&[]);
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        assert!((proj.distance(a, b) - 1.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod polygon {
    use crate::{GeoPoint, Polygon};

    fn square() -> Polygon {
        Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(1.0, 0.0),
        ])
    }

    #[test]
    fn contains_interior_excludes_exterior() {
        let sq = square();
        assert!(sq.contains(GeoPoint::new(0.5, 0.5)));
        assert!(!sq.contains(GeoPoint::new(1.5, 0.5)));
        assert!(!sq.contains(GeoPoint::new(-0.1, 0.5)));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U-shape: the notch between the arms is outside.
        let u = Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 3.0),
            GeoPoint::new(3.0, 3.0),
            GeoPoint::new(3.0, 2.0),
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(3.0, 1.0),
            GeoPoint::new(3.0, 0.0),
        ]);
        assert!(!u.contains(GeoPoint::new(2.0, 1.5)));
        assert!(u.contains(GeoPoint::new(2.0, 0.5)));
        assert!(u.contains(GeoPoint::new(0.5, 1.5)));
    }

    #[test]
    fn fewer_than_three_vertices_contains_nothing() {
        let line = Polygon::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]);
        assert!(!line.contains(GeoPoint::new(0.5, 0.5)));
        assert!(!Polygon::default().contains(GeoPoint::new(0.0, 0.0)));
    }

    #[test]
    fn bbox_spans_vertices() {
        let b = square().bbox().unwrap();
        assert_eq!((b.min_lat, b.max_lat, b.min_lng, b.max_lng), (0.0, 1.0, 0.0, 1.0));

        let flat = Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 2.0),
        ]);
        let f = flat.bbox().unwrap();
        assert_eq!((f.min_lat, f.max_lat), (0.0, 0.0));
        assert!(Polygon::default().bbox().is_none());
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn since_saturates() {
        assert_eq!(Tick(15).since(Tick(10)), 5);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn clock_advance_and_display() {
        let mut clock = SimClock::new();
        for _ in 0..75 {
            clock.advance();
        }
        assert_eq!(clock.current_tick, Tick(75));
        assert_eq!(clock.elapsed_hm(), (1, 15));
        assert_eq!(clock.to_string(), "T75 (01:15)");
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_stream() {
        let mut r1 = SimRng::stream(12345, 7);
        let mut r2 = SimRng::stream(12345, 7);
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_streams_differ() {
        let mut r0 = SimRng::stream(1, 0);
        let mut r1 = SimRng::stream(1, 1);
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "adjacent streams should diverge");
    }

    #[test]
    fn uniform_handles_empty_span() {
        let mut rng = SimRng::new(0);
        assert_eq!(rng.uniform(5.0, 5.0), 5.0);
        assert_eq!(rng.uniform(5.0, 1.0), 5.0);
        for _ in 0..1000 {
            let v = rng.uniform(2.0, 3.0);
            assert!((2.0..3.0).contains(&v));
        }
    }

    #[test]
    fn unit_open_low_never_zero() {
        let mut rng = SimRng::new(9);
        for _ in 0..10_000 {
            let u = rng.unit_open_low();
            assert!(u > 0.0 && u <= 1.0);
        }
    }

    #[test]
    fn child_is_deterministic() {
        let mut a = SimRng::new(3);
        let mut b = SimRng::new(3);
        let x: u64 = a.child(1).random();
        let y: u64 = b.child(1).random();
        assert_eq!(x, y);
    }
}
