use crate::interop::{new_obj, set_kv};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

/// Envelope for an engine error, keeping its stable code.
pub fn from_engine(e: &choropleth::Error) -> JsValue {
    match e {
        choropleth::Error::TooManyFeatures { got, max } => {
            let d = new_obj();
            set_kv(&d, "got", &JsValue::from_f64(*got as f64));
            set_kv(&d, "max", &JsValue::from_f64(*max as f64));
            err(e.code(), e.to_string(), Some(d.into()))
        }
        _ => err(e.code(), e.to_string(), None),
    }
}

#[inline]
pub fn unknown_metric(metric: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "metric", &JsValue::from_str(metric));
    err("unknown_metric", format!("unknown metric '{}'", metric), Some(d.into()))
}

#[inline]
pub fn invalid_value(param: &str, message: impl Into<String>) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("invalid_value", message, Some(d.into()))
}
