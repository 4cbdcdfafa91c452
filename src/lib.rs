pub mod announcement;
#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod app;
#[cfg(feature = "ssr")]
pub mod cms;
#[cfg(feature = "ssr")]
pub mod config;
pub mod contact;
pub mod content;
pub mod gate;
#[cfg(feature = "ssr")]
pub mod relay;
#[cfg(feature = "ssr")]
pub mod services;
pub mod session;
pub mod storage;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(console_log_level(cfg!(debug_assertions)));
    leptos::mount::hydrate_body(App);
}

/// Browser console verbosity. Release bundles stay at info.
#[cfg(any(feature = "hydrate", test))]
fn console_log_level(debug_build: bool) -> log::Level {
    if debug_build {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_console_skips_debug() {
        assert_eq!(console_log_level(false), log::Level::Info);
        assert_eq!(console_log_level(true), log::Level::Debug);
    }
}
