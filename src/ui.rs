//! Page Helpers
//!
//! Small stateless utilities used by the same pages as the loaders.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::field::Field;

#[wasm_bindgen]
extern "C" {
    /// Bootstrap's tooltip widget, expected on `window.bootstrap`
    #[wasm_bindgen(js_namespace = bootstrap)]
    type Tooltip;

    #[wasm_bindgen(constructor, js_namespace = bootstrap, catch)]
    fn new(element: &Element) -> Result<Tooltip, JsValue>;
}

const TOOLTIP_SELECTOR: &str = r#"[data-bs-toggle="tooltip"]"#;

/// Attach a Bootstrap tooltip to every element marked with
/// `data-bs-toggle="tooltip"`. Returns how many were attached.
pub fn activate_tooltips() -> Result<usize, String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document available")?;
    let nodes = document
        .query_selector_all(TOOLTIP_SELECTOR)
        .map_err(|e| format!("{:?}", e))?;

    let mut attached = 0;
    for element in (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
    {
        Tooltip::new(&element).map_err(|e| format!("Tooltip init failed: {:?}", e))?;
        attached += 1;
    }
    Ok(attached)
}

/// Copy the source checkbox's state onto every checkbox of the group.
pub fn toggle_group<F: Field>(source: &dyn Field, group: &[F]) {
    let checked = source.is_checked();
    for checkbox in group {
        checkbox.set_checked(checked);
    }
}

pub fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}
