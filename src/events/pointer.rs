use crate::app::App;
use crate::constants::CONSENT_BUTTON_ID;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_input_handlers(app: &Rc<App>) {
    wire_pointerdown(app);
    wire_pointermove(app);
    wire_pointerup(app);
    wire_click(app);
}

// Drags start on the canvas only; overlay controls keep their own clicks.
fn wire_pointerdown(app: &Rc<App>) {
    let a = app.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        a.drag
            .borrow_mut()
            .press(ev.client_x() as f32, ev.client_y() as f32);
        _ = a.canvas.set_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    _ = app
        .canvas
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(app: &Rc<App>) {
    let a = app.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let delta = a
            .drag
            .borrow_mut()
            .move_to(ev.client_x() as f32, ev.client_y() as f32);
        if let Some((dx, dy)) = delta {
            if let Ok(mut s) = a.session.try_borrow_mut() {
                s.on_drag(dx, dy);
            }
        }
    }) as Box<dyn FnMut(_)>);
    _ = app
        .canvas
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(app: &Rc<App>) {
    for kind in ["pointerup", "pointercancel"] {
        let a = app.clone();
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
                a.drag.borrow_mut().release();
                _ = a.canvas.release_pointer_capture(ev.pointer_id());
            }) as Box<dyn FnMut(_)>);
        _ = app
            .canvas
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

// Clicks are taken anywhere on the page and mapped against the window size.
fn wire_click(app: &Rc<App>) {
    let a = app.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        if !a.drag.borrow_mut().take_click() {
            return;
        }
        let on_consent = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .is_some_and(|el| el.id() == CONSENT_BUTTON_ID);
        if on_consent {
            return;
        }
        let accepts = a
            .session
            .try_borrow()
            .map(|s| s.accepts_clicks())
            .unwrap_or(false);
        if !accepts {
            return;
        }
        ev.prevent_default();
        let (x, y) = (ev.client_x() as f32, ev.client_y() as f32);
        a.dispatch(|s| s.on_click(x, y));
    }) as Box<dyn FnMut(_)>);
    _ = app
        .document
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
