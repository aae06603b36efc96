use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = wasm_bindgen::closure::Closure::wrap(
            Box::new(move || handler()) as Box<dyn FnMut()>
        );
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Attribute on `<body>`, trimmed; empty values count as absent.
pub fn body_attribute(document: &web::Document, name: &str) -> Option<String> {
    document
        .body()
        .and_then(|b| b.get_attribute(name))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resize the canvas backing store to its CSS box times the device pixel
/// ratio. Returns the CSS size, which is what pointer coordinates use.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
    (rect.width() as f32, rect.height() as f32)
}
