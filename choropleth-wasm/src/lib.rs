use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

pub use api::{classify_sample, set_panic_hook};

#[wasm_bindgen]
pub struct ChoroplethMap { pub(crate) inner: choropleth::Engine }

impl ChoroplethMap {
    pub fn rs_new() -> ChoroplethMap { ChoroplethMap { inner: choropleth::Engine::default() } }
    pub fn rs_active_metric(&self) -> &str { self.inner.active_metric() }
}
