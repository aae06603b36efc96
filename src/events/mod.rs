pub mod orientation;
pub mod pointer;

use crate::app::App;
use crate::constants::CONSENT_BUTTON_ID;
use crate::dom;
use panorama_core::Viewport;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire(app: &Rc<App>) {
    pointer::wire_input_handlers(app);
    wire_resize(app);
    wire_page_lifecycle(app);
}

/// Current layout viewport in CSS pixels.
pub fn window_viewport(window: &web::Window) -> Viewport {
    let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0) as f32;
    Viewport::new(size(window.inner_width()), size(window.inner_height()))
}

fn wire_resize(app: &Rc<App>) {
    let a = app.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&a.canvas);
        if let Some(w) = web::window() {
            if let Ok(mut s) = a.session.try_borrow_mut() {
                s.resize(window_viewport(&w));
            }
        }
        if let Ok(mut gpu) = a.gpu.try_borrow_mut() {
            if let Some(gpu) = gpu.as_mut() {
                gpu.resize(a.canvas.width(), a.canvas.height());
            }
        }
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

// A page leaving for the back-forward cache is torn down too; `pageshow`
// with `persisted` brings it back when the user returns.
fn wire_page_lifecycle(app: &Rc<App>) {
    let Some(window) = web::window() else {
        return;
    };
    let a = app.clone();
    let hide = Closure::wrap(Box::new(move |e: web::PageTransitionEvent| {
        log::info!("[session] pagehide persisted={}", e.persisted());
        a.dispatch(|s| s.teardown());
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("pagehide", hide.as_ref().unchecked_ref());
    hide.forget();

    let a = app.clone();
    let show = Closure::wrap(Box::new(move |e: web::PageTransitionEvent| {
        if e.persisted() {
            a.dispatch(|s| s.restore());
        }
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("pageshow", show.as_ref().unchecked_ref());
    show.forget();
}

/// The consent button exists only after the probe times out, so its
/// listener is attached when it is shown.
pub fn wire_consent(app: &Rc<App>) {
    let a = app.clone();
    dom::add_click_listener(&app.document, CONSENT_BUTTON_ID, move || {
        // the permission request must run inside this gesture
        a.dispatch(|s| s.on_consent_acknowledged());
    });
}
