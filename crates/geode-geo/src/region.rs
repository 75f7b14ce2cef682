use geo::{Area, Centroid, Coord, Intersects, LineString, Point, Polygon};
use geode_core::error::{GeodeError, Result};
use geode_core::models::{BoundingBox, SamplePoint};

/// Minimum ring length: three distinct vertices plus the closing vertex
pub const MIN_RING_COORDINATES: usize = 4;

/// An immutable analysis region: a simple polygon in lon/lat degrees.
///
/// Self-intersection is not validated.
#[derive(Debug, Clone)]
pub struct Region {
    polygon: Polygon<f64>,
    bounds: BoundingBox,
}

impl Region {
    /// Build a region from an ordered `[lon, lat]` ring.
    ///
    /// An open ring is closed by repeating its first vertex.
    pub fn new(coordinates: Vec<[f64; 2]>) -> Result<Self> {
        if coordinates.len() < MIN_RING_COORDINATES {
            return Err(GeodeError::InvalidGeometry {
                reason: format!(
                    "Polygon ring must have at least {} coordinates, found {}",
                    MIN_RING_COORDINATES,
                    coordinates.len()
                ),
            });
        }

        for (i, [lon, lat]) in coordinates.iter().enumerate() {
            if !lon.is_finite() || !lat.is_finite() {
                return Err(GeodeError::InvalidGeometry {
                    reason: format!("Coordinate {} ({}, {}) is not finite", i, lon, lat),
                });
            }
        }

        let mut ring: Vec<Coord<f64>> =
            coordinates.iter().map(|c| Coord { x: c[0], y: c[1] }).collect();
        if ring.first() != ring.last() {
            ring.push(ring[0]);
        }

        let bounds = bounds_of(&ring);
        let polygon = Polygon::new(LineString::new(ring), vec![]);

        Ok(Self { polygon, bounds })
    }

    /// Point-in-polygon test; points on the boundary count as inside
    pub fn contains(&self, point: &SamplePoint) -> bool {
        self.polygon.intersects(&Point::new(point.lon, point.lat))
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Planar area in square degrees
    pub fn area(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    /// True when the ring encloses no area (collinear or repeated vertices)
    pub fn is_degenerate(&self) -> bool {
        let bbox_area = self.bounds.width() * self.bounds.height();
        self.area() <= f64::EPSILON * bbox_area
    }

    /// Area-weighted centroid, or the bounding box center for degenerate rings
    pub fn center(&self) -> SamplePoint {
        match self.polygon.centroid() {
            Some(c) if c.x().is_finite() && c.y().is_finite() => SamplePoint::new(c.x(), c.y()),
            _ => SamplePoint::new(
                (self.bounds.min_lon + self.bounds.max_lon) / 2.0,
                (self.bounds.min_lat + self.bounds.max_lat) / 2.0,
            ),
        }
    }

    /// Closed exterior ring as `[lon, lat]` pairs
    pub fn exterior(&self) -> Vec<[f64; 2]> {
        self.polygon.exterior().coords().map(|c| [c.x, c.y]).collect()
    }
}

fn bounds_of(ring: &[Coord<f64>]) -> BoundingBox {
    ring.iter().fold(
        BoundingBox {
            min_lon: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        },
        |acc, c| BoundingBox {
            min_lon: acc.min_lon.min(c.x),
            min_lat: acc.min_lat.min(c.y),
            max_lon: acc.max_lon.max(c.x),
            max_lat: acc.max_lat.max(c.y),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Region {
        Region::new(vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]).unwrap()
    }

    /// L-shaped ring with the upper-right quadrant cut out
    fn l_shape() -> Region {
        Region::new(vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 5.0],
            [5.0, 5.0],
            [5.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_contains_interior_and_exterior() {
        let region = square();
        assert!(region.contains(&SamplePoint::new(5.0, 5.0)));
        assert!(!region.contains(&SamplePoint::new(15.0, 15.0)));
        assert!(!region.contains(&SamplePoint::new(-0.001, 5.0)));
    }

    #[test]
    fn test_boundary_is_inside() {
        let region = square();
        assert!(region.contains(&SamplePoint::new(10.0, 5.0)), "edge point");
        assert!(region.contains(&SamplePoint::new(0.0, 0.0)), "vertex");
    }

    #[test]
    fn test_concave_notch_is_outside() {
        let region = l_shape();
        assert!(region.contains(&SamplePoint::new(2.0, 8.0)));
        assert!(region.contains(&SamplePoint::new(8.0, 2.0)));
        assert!(!region.contains(&SamplePoint::new(7.5, 7.5)));
    }

    #[test]
    fn test_bounds() {
        let bounds = l_shape().bounds();
        assert_eq!(bounds.to_array(), [0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn test_too_few_coordinates() {
        let result = Region::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]);
        assert!(matches!(result, Err(GeodeError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let result = Region::new(vec![[0.0, 0.0], [f64::NAN, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        assert!(matches!(result, Err(GeodeError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_open_ring_is_closed() {
        let region = Region::new(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]).unwrap();
        let ring = region.exterior();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert!((region.area() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_ring() {
        let line = Region::new(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [0.0, 0.0]]).unwrap();
        assert!(line.is_degenerate());

        let dot = Region::new(vec![[3.0, 3.0], [3.0, 3.0], [3.0, 3.0], [3.0, 3.0]]).unwrap();
        assert!(dot.is_degenerate());

        assert!(!square().is_degenerate());
    }

    #[test]
    fn test_center() {
        let center = square().center();
        assert!((center.lon - 5.0).abs() < 1e-9);
        assert!((center.lat - 5.0).abs() < 1e-9);
    }
}
