#![cfg(target_arch = "wasm32")]

use portfolio_wasm::content::{render_statement_list, StatementIndex};
use portfolio_wasm::VizConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn statement_list_parses_as_dom() {
    let document = web_sys::window().unwrap().document().unwrap();
    let panel = document.create_element("div").unwrap();
    let index: StatementIndex =
        serde_json::from_str(r#"{"statements":[{"id":"7","title":"Room 404"},{"id":"8","title":"Ash"}]}"#)
            .unwrap();
    panel.set_inner_html(&render_statement_list(&index));

    let items = panel.query_selector_all(".statement-item").unwrap();
    assert_eq!(items.length(), 2);
    let first = items.item(0).unwrap().dyn_into::<web_sys::Element>().unwrap();
    assert_eq!(first.get_attribute("data-statement-id").as_deref(), Some("7"));
    assert!(first.query_selector("h3.number-fix .number-span").unwrap().is_some());
}

#[wasm_bindgen_test]
fn data_config_attribute_overrides_defaults() {
    let document = web_sys::window().unwrap().document().unwrap();
    let container = document.create_element("div").unwrap();
    container
        .set_attribute("data-config", r#"{"gallery":{"radius":6.0}}"#)
        .unwrap();
    let config = VizConfig::from_attribute(container.get_attribute("data-config").as_deref());
    assert_eq!(config.gallery.radius, 6.0);
    assert_eq!(config.gallery.frame_width, 1.2);
}
