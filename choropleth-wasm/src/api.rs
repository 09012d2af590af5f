use crate::ChoroplethMap;
use choropleth::{BreakSet, ClassifyJob, CommitOutcome, Engine, EngineConfig, FeatureCollection, Properties, Ticket};
use js_sys::{Array, Float64Array};
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Natural breaks for a sample handed out by `prepare_res`. Needs no map
/// state, so a web worker can call it on its own instance of the module.
/// Returns a `Float64Array` of `k + 1` breaks, or `null` for an empty sample.
#[wasm_bindgen]
pub fn classify_sample(sample: &[f64], k: usize) -> JsValue {
    match choropleth::natural_breaks(sample, k) {
        Some(b) => crate::interop::arr_f64(b.as_slice()).into(),
        None => JsValue::NULL,
    }
}

fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    serde_wasm_bindgen::to_value(v).unwrap_or(JsValue::NULL)
}

fn outcome_str(o: CommitOutcome) -> &'static str {
    match o {
        CommitOutcome::Committed => "committed",
        CommitOutcome::EmptySample => "empty_sample",
        CommitOutcome::Superseded => "superseded",
        CommitOutcome::FixedDomain => "fixed_domain",
        CommitOutcome::Unknown => "unknown",
    }
}

fn props_from_js(v: JsValue) -> Option<Properties> {
    if v.is_null() || v.is_undefined() {
        return None;
    }
    serde_wasm_bindgen::from_value::<Properties>(v).ok()
}

fn collection_from_js(v: JsValue) -> Result<FeatureCollection, JsValue> {
    let value = serde_wasm_bindgen::from_value::<serde_json::Value>(v)
        .map_err(|e| error::invalid_value("collection", e.to_string()))?;
    FeatureCollection::from_json_value(value).map_err(|e| error::from_engine(&e))
}

fn job_to_js(job: &ClassifyJob) -> JsValue {
    let o = crate::interop::new_obj();
    crate::interop::set_kv(&o, "metric", &JsValue::from_str(&job.ticket.metric));
    crate::interop::set_kv(&o, "generation", &JsValue::from_f64(job.ticket.generation as f64));
    crate::interop::set_kv(&o, "classes", &JsValue::from_f64(job.classes as f64));
    crate::interop::set_kv(&o, "sample", &crate::interop::arr_f64(&job.sample).into());
    o.into()
}

// `null`/`undefined` is the empty-sample result.
fn breaks_from_js(v: JsValue) -> Result<Option<BreakSet>, JsValue> {
    if v.is_null() || v.is_undefined() {
        return Ok(None);
    }
    let values: Vec<f64> = if v.is_instance_of::<Float64Array>() {
        Float64Array::new(&v).to_vec()
    } else if Array::is_array(&v) {
        serde_wasm_bindgen::from_value(v).map_err(|e| error::invalid_value("breaks", e.to_string()))?
    } else {
        return Err(error::invalid_value("breaks", "expected an array of numbers or null"));
    };
    BreakSet::try_from(values).map(Some).map_err(|e| error::from_engine(&e))
}

impl ChoroplethMap {
    fn prepare(&mut self, metric: &str, fc: Result<FeatureCollection, JsValue>) -> JsValue {
        if self.inner.config().metric(metric).is_none() {
            return error::unknown_metric(metric);
        }
        let fc = match fc {
            Ok(fc) => fc,
            Err(e) => return e,
        };
        match self.inner.prepare(metric, &fc) {
            Ok(Some(job)) => error::ok(job_to_js(&job)),
            Ok(None) => error::ok(JsValue::NULL),
            Err(e) => error::from_engine(&e),
        }
    }

    fn load(&mut self, metric: &str, fc: Result<FeatureCollection, JsValue>) -> JsValue {
        if self.inner.config().metric(metric).is_none() {
            return error::unknown_metric(metric);
        }
        match fc {
            Ok(fc) => error::ok(JsValue::from_str(outcome_str(self.inner.on_data_loaded(metric, &fc)))),
            Err(e) => {
                web_sys::console::warn_2(&JsValue::from_str(&format!("choropleth: rejected data for {}", metric)), &e);
                e
            }
        }
    }
}

#[wasm_bindgen]
impl ChoroplethMap {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ChoroplethMap {
        crate::ChoroplethMap::rs_new()
    }

    /// Replace the configuration. Drops all classification state.
    pub fn set_config_res(&mut self, cfg: JsValue) -> JsValue {
        // Through JSON text so integral fields keep their integer type.
        let text: String = match js_sys::JSON::stringify(&cfg) {
            Ok(s) => s.into(),
            Err(_) => return error::invalid_value("config", "config is not JSON-serializable"),
        };
        match EngineConfig::from_json_str(&text).and_then(Engine::new) {
            Ok(engine) => {
                self.inner = engine;
                error::ok(JsValue::TRUE)
            }
            Err(e) => error::from_engine(&e),
        }
    }
    pub fn config(&self) -> JsValue {
        to_js(self.inner.config())
    }

    // Data events
    pub fn load_features(&mut self, metric: &str, fc: JsValue) -> bool {
        match collection_from_js(fc) {
            Ok(fc) => matches!(
                self.inner.on_data_loaded(metric, &fc),
                CommitOutcome::Committed | CommitOutcome::FixedDomain
            ),
            Err(_) => false,
        }
    }
    pub fn load_features_res(&mut self, metric: &str, fc: JsValue) -> JsValue {
        let parsed = collection_from_js(fc);
        self.load(metric, parsed)
    }
    pub fn load_features_json_res(&mut self, metric: &str, text: &str) -> JsValue {
        let parsed = FeatureCollection::from_json_str(text).map_err(|e| error::from_engine(&e));
        self.load(metric, parsed)
    }

    /// Start a recompute without running it: `{metric, generation, classes,
    /// sample}` for `classify_sample`, or `null` for fixed-domain metrics.
    pub fn prepare_res(&mut self, metric: &str, fc: JsValue) -> JsValue {
        let parsed = collection_from_js(fc);
        self.prepare(metric, parsed)
    }
    pub fn prepare_json_res(&mut self, metric: &str, text: &str) -> JsValue {
        let parsed = FeatureCollection::from_json_str(text).map_err(|e| error::from_engine(&e));
        self.prepare(metric, parsed)
    }
    /// Commit worker-computed breaks for a prepared generation. Resolves to
    /// `"superseded"` when a newer `prepare_res` was issued in the meantime.
    pub fn commit_res(&mut self, metric: &str, generation: f64, breaks: JsValue) -> JsValue {
        if self.inner.config().metric(metric).is_none() {
            return error::unknown_metric(metric);
        }
        if !generation.is_finite() || generation < 0.0 || generation.fract() != 0.0 {
            return error::invalid_value("generation", "generation must be a non-negative integer");
        }
        let breaks = match breaks_from_js(breaks) {
            Ok(b) => b,
            Err(e) => return e,
        };
        let ticket = Ticket { metric: metric.to_string(), generation: generation as u64 };
        match self.inner.commit_breaks(ticket, breaks) {
            Ok(outcome) => error::ok(JsValue::from_str(outcome_str(outcome))),
            Err(e) => error::from_engine(&e),
        }
    }
    /// Weights were revised; returns the metric layers to re-fetch.
    pub fn weights_revised(&mut self) -> Array {
        let keys = self.inner.on_weights_revised();
        crate::interop::arr_str(keys.iter().map(String::as_str))
    }

    // Overlay events
    pub fn overlay_added(&mut self, metric: &str) -> bool {
        self.inner.on_overlay_added(metric)
    }
    pub fn overlay_removed(&mut self, metric: &str) -> bool {
        self.inner.on_overlay_removed(metric)
    }
    pub fn active_metric(&self) -> String {
        self.rs_active_metric().to_string()
    }

    // Style + legend
    /// `{ color, weight, opacity }` for a feature's properties object.
    pub fn style(&self, metric: &str, props: JsValue) -> JsValue {
        let props = props_from_js(props);
        to_js(&self.inner.style(metric, props.as_ref()))
    }
    pub fn style_res(&self, metric: &str, props: JsValue) -> JsValue {
        if self.inner.config().metric(metric).is_none() {
            return error::unknown_metric(metric);
        }
        error::ok(self.style(metric, props))
    }
    pub fn color(&self, metric: &str, props: JsValue) -> String {
        let props = props_from_js(props);
        self.inner.style(metric, props.as_ref()).color.to_hex()
    }
    /// Legend markup for the active metric; replaces the container content.
    pub fn legend_html(&self) -> String {
        self.inner.legend()
    }

    // Inspection
    pub fn breaks(&self, metric: &str) -> JsValue {
        match self.inner.state(metric).and_then(|s| s.breaks()) {
            Some(b) => crate::interop::arr_f64(b.as_slice()).into(),
            None => JsValue::NULL,
        }
    }
    pub fn breaks_res(&self, metric: &str) -> JsValue {
        if self.inner.state(metric).is_none() {
            return error::unknown_metric(metric);
        }
        error::ok(self.breaks(metric))
    }
    pub fn status(&self, metric: &str) -> Option<String> {
        let s = self.inner.status(metric)?;
        serde_json::to_value(s).ok().and_then(|v| v.as_str().map(str::to_string))
    }
    pub fn status_res(&self, metric: &str) -> JsValue {
        match self.status(metric) {
            Some(s) => error::ok(JsValue::from_str(&s)),
            None => error::unknown_metric(metric),
        }
    }
}

impl Default for ChoroplethMap {
    fn default() -> Self {
        Self::new()
    }
}
