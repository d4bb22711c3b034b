//! Portfolio site: circular project gallery, wave-essence visualizer and
//! content panels. The geometry, animation and templating live in plain
//! modules so they can be tested on the host; the browser glue is wasm-only.

pub mod camera;
pub mod color;
pub mod config;
pub mod contact;
pub mod content;
pub mod error;
pub mod gallery;
pub mod particles;
pub mod viewer;
pub mod wave;

pub use config::VizConfig;
pub use error::{PortfolioError, PortfolioResult};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    mod dom;
    mod frame_loop;
    mod gallery_view;
    mod render;
    mod site;
    mod wave_view;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger already set: {err}").into());
        }

        spawn_local(async {
            if let Err(err) = site::start().await {
                log::error!("site failed to start: {err}");
            }
        });
        Ok(())
    }

    /// Mount a standalone wave viewer into `container`, with an optional
    /// JSON override of the defaults.
    #[wasm_bindgen(js_name = mountWaveViewer)]
    pub fn mount_wave_viewer(container: web_sys::HtmlElement, config: Option<String>) -> Result<(), JsValue> {
        let config = crate::VizConfig::from_attribute(config.as_deref());
        wave_view::mount(&container, config)?;
        Ok(())
    }
}
