//! Synthetic demand: a uniform background plus Gaussian hotspots.

use ds_core::{GeoPoint, Polygon, SimRng};

use crate::sampler::{gaussian_points_in_polygon, uniform_points_in_polygon};

/// How a demand point was generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DemandKind {
    Background,
    Hotspot,
}

/// A demand location tagged with its generator.  Never mutated after
/// generation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemandPoint {
    pub location: GeoPoint,
    pub kind:     DemandKind,
}

/// A Gaussian concentration of demand.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hotspot {
    pub center:    GeoPoint,
    /// Standard deviation in degrees, applied to both axes.
    pub sigma_deg: f64,
    pub count:     usize,
}

/// Demand-profile parameters.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DemandProfile {
    /// Points spread uniformly over the whole domain.
    pub background_count: usize,
    pub hotspots:         Vec<Hotspot>,
}

impl DemandProfile {
    /// Total points the profile asks for.
    pub fn requested(&self) -> usize {
        self.background_count + self.hotspots.iter().map(|h| h.count).sum::<usize>()
    }
}

/// Output of [`generate_demand`].
#[derive(Clone, Debug, Default)]
pub struct DemandSet {
    pub points:    Vec<DemandPoint>,
    /// What the profile asked for.  Compare with [`generated`](Self::generated)
    /// to see how much the samplers fell short.
    pub requested: usize,
}

impl DemandSet {
    pub fn generated(&self) -> usize {
        self.points.len()
    }

    /// Bare locations, in generation order (background first).
    pub fn locations(&self) -> Vec<GeoPoint> {
        self.points.iter().map(|p| p.location).collect()
    }
}

/// Sample the background, then each hotspot in order.
pub fn generate_demand(profile: &DemandProfile, polygon: &Polygon, rng: &mut SimRng) -> DemandSet {
    let mut points: Vec<DemandPoint> =
        uniform_points_in_polygon(profile.background_count, polygon, rng)
            .into_iter()
            .map(|location| DemandPoint { location, kind: DemandKind::Background })
            .collect();

    for hotspot in &profile.hotspots {
        let sampled =
            gaussian_points_in_polygon(hotspot.center, hotspot.sigma_deg, hotspot.count, polygon, rng);
        points.extend(
            sampled
                .into_iter()
                .map(|location| DemandPoint { location, kind: DemandKind::Hotspot }),
        );
    }

    DemandSet { points, requested: profile.requested() }
}
