//! Planar coordinate types shared by the sampler, the analyzer, and the
//! imagery adapters. Coordinates are WGS 84 longitude/latitude in degrees.

use serde::{Deserialize, Serialize};

/// A sampled location inside an analysis region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub lon: f64,
    pub lat: f64,
}

impl SamplePoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Square window of `half_width` degrees around the point
    pub fn buffered(&self, half_width: f64) -> BoundingBox {
        BoundingBox {
            min_lon: self.lon - half_width,
            min_lat: self.lat - half_width,
            max_lon: self.lon + half_width,
            max_lat: self.lat + half_width,
        }
    }
}

/// Axis-aligned bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// `[west, south, east, north]`, the order STAC and GeoJSON use
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn contains(&self, point: &SamplePoint) -> bool {
        point.lon >= self.min_lon
            && point.lon <= self.max_lon
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }
}
