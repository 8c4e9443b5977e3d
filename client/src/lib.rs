//! Whiteboard canvas widgets.
//!
//! SYSTEM CONTEXT
//! ==============
//! Leptos components embedded by the canvas editor. Browser access is gated
//! behind the `hydrate` feature; the logic those components render from lives
//! in `util` and is tested natively.

pub mod components;
pub mod util;

/// Install the panic hook and console logger for the browser build.
#[cfg(feature = "hydrate")]
pub fn init_browser_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
