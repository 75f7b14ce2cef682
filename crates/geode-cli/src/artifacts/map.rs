use anyhow::Result;
use geode_core::models::{ChangeRecord, SIGNIFICANCE_THRESHOLD};
use geode_geo::Region;
use serde::Serialize;

pub const MAP_FILE: &str = "ndvi_map.html";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>NDVI Change Map</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const data = __DATA__;
const map = L.map('map').setView(data.center, 9);
const streets = L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
const imagery = L.tileLayer('https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}', {
  attribution: 'Esri'
});
const outline = L.polygon(data.outline, { color: 'red', fill: false, weight: 2 }).bindPopup('Analysis Region').addTo(map);
const samples = L.layerGroup(data.samples.map(s =>
  L.circleMarker([s.lat, s.lon], { radius: 8, color: s.color, fill: true })
    .bindPopup('<b>Sample Point</b><br>Start NDVI: ' + s.start.toFixed(3) +
      '<br>End NDVI: ' + s.end.toFixed(3) + '<br>Change: ' + s.change.toFixed(3))
    .bindTooltip('NDVI Change: ' + s.change.toFixed(3))
)).addTo(map);
const heat = L.heatLayer(data.samples.map(s => [s.lat, s.lon, s.weight]), { radius: 25 }).addTo(map);
L.control.layers(
  { 'Streets': streets, 'Satellite Imagery': imagery },
  { 'Analysis Region': outline, 'Sample Points': samples, 'Change Intensity': heat }
).addTo(map);
</script>
</body>
</html>
"#;

#[derive(Serialize)]
struct MapData {
    /// [lat, lon]
    center: [f64; 2],
    outline: Vec<[f64; 2]>,
    samples: Vec<MapSample>,
}

#[derive(Serialize)]
struct MapSample {
    lat: f64,
    lon: f64,
    start: f64,
    end: f64,
    change: f64,
    color: &'static str,
    weight: f64,
}

/// Marker colour for a change value
pub fn marker_color(change: f64) -> &'static str {
    if change < -SIGNIFICANCE_THRESHOLD {
        "red"
    } else if change < 0.0 {
        "orange"
    } else {
        "green"
    }
}

/// Standalone Leaflet page with the region outline, sample markers, and a
/// heat layer weighted by absolute change
pub fn render_map(region: &Region, records: &[ChangeRecord]) -> Result<String> {
    let center = region.center();
    let data = MapData {
        center: [center.lat, center.lon],
        outline: region.exterior().iter().map(|[lon, lat]| [*lat, *lon]).collect(),
        samples: records
            .iter()
            .map(|record| MapSample {
                lat: record.point().lat,
                lon: record.point().lon,
                start: record.start_index(),
                end: record.end_index(),
                change: record.change(),
                color: marker_color(record.change()),
                weight: record.change().abs(),
            })
            .collect(),
    };

    // Keep the payload from closing the script element
    let json = serde_json::to_string(&data)?.replace('<', "\\u003c");

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::tests::{record_at, region};

    fn payload(html: &str) -> serde_json::Value {
        let start = html.find("const data = ").unwrap() + "const data = ".len();
        let end = start + html[start..].find(";\n").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn test_marker_colors() {
        assert_eq!(marker_color(-0.3), "red");
        assert_eq!(marker_color(-0.1), "orange");
        assert_eq!(marker_color(-0.01), "orange");
        assert_eq!(marker_color(0.0), "green");
        assert_eq!(marker_color(0.2), "green");
    }

    #[test]
    fn test_map_payload() {
        let records = vec![record_at(-103.5, 44.0, -0.3), record_at(-103.2, 43.8, 0.1)];
        let html = render_map(&region(), &records).unwrap();

        assert!(html.contains("leaflet-heat.js"));

        let data = payload(&html);
        let center = data["center"].as_array().unwrap();
        assert!((center[0].as_f64().unwrap() - 44.0).abs() < 1e-9);
        assert!((center[1].as_f64().unwrap() - -103.5).abs() < 1e-9);

        let samples = data["samples"].as_array().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0]["color"], "red");
        assert_eq!(samples[1]["color"], "green");
        assert!((samples[0]["weight"].as_f64().unwrap() - 0.3).abs() < 1e-9);

        // Outline is [lat, lon]
        let first = data["outline"][0].as_array().unwrap();
        assert_eq!(first[0].as_f64(), Some(43.5));
        assert_eq!(first[1].as_f64(), Some(-104.0));
    }

    #[test]
    fn test_empty_records_still_render() {
        let html = render_map(&region(), &[]).unwrap();
        assert_eq!(payload(&html)["samples"].as_array().unwrap().len(), 0);
    }
}
