#![cfg(target_arch = "wasm32")]

use choropleth_wasm::{classify_sample, ChoroplethMap};
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_ok(v: &JsValue) -> bool { Reflect::get(v, &JsValue::from_str("ok")).ok().and_then(|x| x.as_bool()).unwrap_or(false) }
fn is_err_code(v: &JsValue, code: &str) -> bool {
    if is_ok(v) { return false; }
    if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
        if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) { return c.as_string().map_or(false, |s| s==code); }
    }
    false
}

#[wasm_bindgen_test]
fn bad_metric_and_payloads_return_typed_errors() {
    let mut m = ChoroplethMap::new();
    assert!(is_err_code(&m.load_features_json_res("Nope", "{\"features\":[]}"), "unknown_metric"));
    assert!(is_err_code(&m.load_features_json_res("Priority_Score_Norm", "{oops"), "invalid_json"));
    assert!(is_err_code(&m.load_features_json_res("Priority_Score_Norm", "{\"type\":\"Feature\"}"), "not_feature_collection"));
    assert!(is_err_code(&m.breaks_res("Nope"), "unknown_metric"));
    assert!(is_err_code(&m.status_res("Nope"), "unknown_metric"));
    assert!(is_err_code(&m.style_res("Nope", JsValue::NULL), "unknown_metric"));
    assert!(!m.load_features("Priority_Score_Norm", JsValue::from_f64(3.0)));
    assert_eq!(m.status("Priority_Score_Norm").as_deref(), Some("pending"));
}

#[wasm_bindgen_test]
fn empty_collection_is_not_an_error() {
    let mut m = ChoroplethMap::new();
    let r = m.load_features_json_res("Priority_Score_Norm", "{\"type\":\"FeatureCollection\",\"features\":[]}");
    assert!(is_ok(&r));
    assert_eq!(Reflect::get(&r, &JsValue::from_str("value")).unwrap().as_string().as_deref(), Some("empty_sample"));
}

#[wasm_bindgen_test]
fn config_validation() {
    let mut m = ChoroplethMap::new();
    let bad = js_sys::JSON::parse("{\"classes\": 99}").unwrap();
    assert!(is_err_code(&m.set_config_res(bad), "invalid_config"));
    let good = js_sys::JSON::parse("{\"classes\": 4}").unwrap();
    assert!(is_ok(&m.set_config_res(good)));
}

#[wasm_bindgen_test]
fn commit_rejects_malformed_worker_results() {
    let mut m = ChoroplethMap::new();
    let data = "{\"type\":\"FeatureCollection\",\"features\":[{\"properties\":{\"Priority_Score_Norm\":1.5}}]}";
    assert!(is_err_code(&m.prepare_json_res("Nope", data), "unknown_metric"));
    assert!(is_err_code(&m.prepare_json_res("Priority_Score_Norm", "{oops"), "invalid_json"));
    let job = Reflect::get(&m.prepare_json_res("Priority_Score_Norm", data), &JsValue::from_str("value")).unwrap();
    let generation = Reflect::get(&job, &JsValue::from_str("generation")).unwrap().as_f64().unwrap();

    assert!(is_err_code(&m.commit_res("Nope", generation, JsValue::NULL), "unknown_metric"));
    assert!(is_err_code(&m.commit_res("Priority_Score_Norm", -1.0, JsValue::NULL), "invalid_value"));
    assert!(is_err_code(&m.commit_res("Priority_Score_Norm", 0.5, JsValue::NULL), "invalid_value"));
    assert!(is_err_code(&m.commit_res("Priority_Score_Norm", generation, JsValue::from_str("1,2")), "invalid_value"));
    let descending = js_sys::JSON::parse("[3, 2, 1, 0, -1, -2]").unwrap();
    assert!(is_err_code(&m.commit_res("Priority_Score_Norm", generation, descending), "invalid_breaks"));
    let wrong_count = js_sys::JSON::parse("[0, 1, 2]").unwrap();
    assert!(is_err_code(&m.commit_res("Priority_Score_Norm", generation, wrong_count), "invalid_breaks"));
    assert_eq!(m.status("Priority_Score_Norm").as_deref(), Some("computing"));

    // Single-value sample pads to k classes.
    let padded = classify_sample(&[1.5], 5);
    assert!(is_ok(&m.commit_res("Priority_Score_Norm", generation, padded)));
    assert_eq!(m.status("Priority_Score_Norm").as_deref(), Some("ready"));
    assert!(classify_sample(&[], 5).is_null());
}
