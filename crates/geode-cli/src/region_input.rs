//! Region polygon input
//!
//! Accepts a GeoJSON file (Polygon geometry, Feature, or FeatureCollection),
//! inline GeoJSON, or an inline coordinate array `[[lon, lat], ...]`.

use anyhow::{anyhow, bail, Context, Result};
use geode_geo::Region;
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

/// Load the region described by `input`
pub fn load_region(input: &str) -> Result<Region> {
    let trimmed = input.trim();

    let coordinates = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<[f64; 2]>>(trimmed)
            .context("Inline polygon must be a JSON array of [lon, lat] pairs")?
    } else if trimmed.starts_with('{') {
        ring_from_geojson(trimmed)?
    } else {
        let path = Path::new(trimmed);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read polygon file {}", path.display()))?;
        ring_from_geojson(&content)
            .with_context(|| format!("Failed to load polygon from {}", path.display()))?
    };

    Ok(Region::new(coordinates)?)
}

/// Exterior ring of the first polygon in a GeoJSON document
fn ring_from_geojson(content: &str) -> Result<Vec<[f64; 2]>> {
    let geojson: GeoJson = content.parse().context("Invalid GeoJSON")?;

    let geometry = match &geojson {
        GeoJson::Geometry(geometry) => Some(geometry),
        GeoJson::Feature(feature) => feature.geometry.as_ref(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .find(|geometry| is_areal(geometry)),
    };

    let geometry = geometry.ok_or_else(|| anyhow!("GeoJSON contains no polygon geometry"))?;

    let ring = match &geometry.value {
        Value::Polygon(rings) => rings.first(),
        Value::MultiPolygon(polygons) => {
            if polygons.len() > 1 {
                tracing::warn!(
                    "MultiPolygon has {} parts; only the first is analysed",
                    polygons.len()
                );
            }
            polygons.first().and_then(|rings| rings.first())
        }
        _ => bail!("Expected a Polygon or MultiPolygon geometry"),
    };

    let ring = ring.ok_or_else(|| anyhow!("Polygon has no exterior ring"))?;

    if let Value::Polygon(rings) = &geometry.value {
        if rings.len() > 1 {
            tracing::warn!("Ignoring {} interior ring(s)", rings.len() - 1);
        }
    }

    ring.iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok([*lon, *lat]),
            _ => Err(anyhow!("Position has fewer than two coordinates")),
        })
        .collect()
}

fn is_areal(geometry: &Geometry) -> bool {
    matches!(geometry.value, Value::Polygon(_) | Value::MultiPolygon(_))
}
