use geode_core::models::ChangeRecord;
use geode_geo::Region;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

pub const GEOJSON_FILE: &str = "ndvi_changes.geojson";

/// Feature collection with the region outline followed by one point per record
pub fn changes_collection(region: &Region, records: &[ChangeRecord]) -> FeatureCollection {
    let mut features = Vec::with_capacity(records.len() + 1);

    let ring = region.exterior().iter().map(|[lon, lat]| vec![*lon, *lat]).collect();
    let mut region_properties = Map::new();
    region_properties.insert("kind".to_string(), JsonValue::from("region"));
    features.push(Feature {
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        properties: Some(region_properties),
        id: None,
        bbox: None,
        foreign_members: None,
    });

    for record in records {
        let point = record.point();
        features.push(Feature {
            geometry: Some(Geometry::new(Value::Point(vec![point.lon, point.lat]))),
            properties: Some(record_properties(record)),
            id: None,
            bbox: None,
            foreign_members: None,
        });
    }

    FeatureCollection { features, bbox: None, foreign_members: None }
}

fn record_properties(record: &ChangeRecord) -> Map<String, JsonValue> {
    let mut properties = Map::new();
    properties.insert("kind".to_string(), JsonValue::from("sample"));
    properties.insert("start_year".to_string(), JsonValue::from(record.start_year()));
    properties.insert("end_year".to_string(), JsonValue::from(record.end_year()));
    properties.insert("start_ndvi".to_string(), JsonValue::from(record.start_index()));
    properties.insert("end_ndvi".to_string(), JsonValue::from(record.end_index()));
    properties.insert("ndvi_change".to_string(), JsonValue::from(record.change()));
    properties.insert("significant".to_string(), JsonValue::from(record.is_significant()));
    properties
        .insert("start_date".to_string(), JsonValue::from(record.start_acquired().to_rfc3339()));
    properties.insert("end_date".to_string(), JsonValue::from(record.end_acquired().to_rfc3339()));
    properties.insert("start_cloud_cover".to_string(), JsonValue::from(record.start_cloud_cover()));
    properties.insert("end_cloud_cover".to_string(), JsonValue::from(record.end_cloud_cover()));

    if let Some(preview) = record.start_preview() {
        properties.insert("start_preview".to_string(), JsonValue::from(preview));
    }
    if let Some(preview) = record.end_preview() {
        properties.insert("end_preview".to_string(), JsonValue::from(preview));
    }

    properties
}
