use choropleth::numeric::limits::MAX_FEATURES;
use choropleth::FeatureCollection;
use serde_json::json;

#[test]
fn feature_cap_exceeded() {
    let features: Vec<_> = (0..MAX_FEATURES + 1).map(|_| json!({"properties": {}})).collect();
    let v = json!({"type": "FeatureCollection", "features": features});
    let err = FeatureCollection::from_json_value(v).unwrap_err();
    assert_eq!(err.code(), "too_many_features");
}

#[test]
fn wrong_shapes_are_rejected() {
    assert!(FeatureCollection::from_json_str("[]").is_err());
    assert!(FeatureCollection::from_json_str("{\"type\":\"FeatureCollection\"}").is_err());
    assert!(FeatureCollection::from_json_str("{\"type\":\"FeatureCollection\",\"features\":[{\"properties\": 5}]}").is_err());
}

#[test]
fn untyped_collections_are_accepted() {
    let fc = FeatureCollection::from_json_str("{\"features\":[{\"properties\":{\"x\":\"7\"}},{}]}").unwrap();
    assert_eq!(fc.len(), 2);
    assert_eq!(fc.sample("x"), vec![7.0]);
}
