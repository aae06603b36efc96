use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// One-shot `setTimeout`. Timers are never cancelled, so the handle is
/// dropped.
pub fn set_timeout(delay: Duration, f: impl FnOnce() + 'static) {
    let Some(w) = web::window() else {
        return;
    };
    let cb = Closure::once_into_js(f);
    let ms = delay.as_millis().min(i32::MAX as u128) as i32;
    if let Err(e) =
        w.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms)
    {
        log::error!("setTimeout failed: {:?}", e);
    }
}
