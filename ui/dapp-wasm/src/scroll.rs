//! Scroll-reveal animation.
//!
//! Elements tagged `.animated` start transparent and slide in once they
//! scroll into the viewport. Pure presentation, shared by every page.

use crate::dom;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

const REVEAL_MARGIN_PX: f64 = 60.0;

fn reveal_visible() {
    let window = dom::window();
    let viewport_bottom = window.inner_height().ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);

    for el in dom::query_all(".animated") {
        let rect = el.get_bounding_client_rect();
        if rect.top() < viewport_bottom - REVEAL_MARGIN_PX {
            reveal(&el);
        }
    }
}

fn reveal(el: &Element) {
    if let Some(html) = el.dyn_ref::<web_sys::HtmlElement>() {
        let style = html.style();
        let _ = style.set_property("opacity", "1");
        let _ = style.set_property("transform", "translateY(0)");
    }
}

/// Bind the reveal pass to scroll events and run it once for elements
/// already on screen.
pub fn bind() {
    let handler = Closure::<dyn FnMut()>::new(reveal_visible);
    let _ = dom::window()
        .add_event_listener_with_callback("scroll", handler.as_ref().unchecked_ref());
    handler.forget();
    reveal_visible();
}
