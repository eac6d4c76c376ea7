//! Domain boundary polygon.

use crate::GeoPoint;

/// Axis-aligned lat/lng bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// A simple (non-self-intersecting) polygon.  The last vertex implicitly
/// connects back to the first.
///
/// Used only for containment tests.  A polygon with fewer than three
/// vertices contains nothing.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    pub vertices: Vec<GeoPoint>,
}

impl Polygon {
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        Self { vertices }
    }

    /// Bounding box of all vertices, or `None` for an empty polygon.
    pub fn bbox(&self) -> Option<BoundingBox> {
        let first = self.vertices.first()?;
        let init = BoundingBox {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        Some(self.vertices.iter().skip(1).fold(init, |b, p| BoundingBox {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lng: b.min_lng.min(p.lng),
            max_lng: b.max_lng.max(p.lng),
        }))
    }

    /// Ray-casting parity test.
    ///
    /// Casts a ray towards +lng and counts edge crossings.  Points lying
    /// exactly on an edge or vertex may land on either side; callers must
    /// not rely on boundary inclusion.
    pub fn contains(&self, p: GeoPoint) -> bool {
        let v = &self.vertices;
        if v.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = v.len() - 1;
        for i in 0..v.len() {
            let (xi, yi) = (v[i].lng, v[i].lat);
            let (xj, yj) = (v[j].lng, v[j].lat);
            if (yi > p.lat) != (yj > p.lat)
                && p.lng < (xj - xi) * (p.lat - yi) / (yj - yi) + xi
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
