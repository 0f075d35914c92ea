//! # client
//!
//! Leptos + WASM page for live video search. Hosts the `channel` state
//! machine on a browser WebSocket and renders each result batch reactively.

pub mod app;
pub mod components;
pub mod net;
pub mod state;

/// WASM entry point: install the panic hook and logger, then mount the page.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
