use crate::app::App;
use crate::host;
use panorama_core::OrientationSample;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Subscribe to `deviceorientation` for the rest of the page's life. Every
/// reading goes to the session, which decides whether it settles the probe,
/// drives the camera or is ignored.
pub fn listen(app: &Rc<App>) {
    let Some(window) = web::window() else {
        return;
    };
    let a = app.clone();
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::DeviceOrientationEvent| {
            let sample = OrientationSample {
                alpha: ev.alpha(),
                beta: ev.beta(),
                gamma: ev.gamma(),
            };
            let angle = host::screen_angle_deg();
            a.dispatch(|s| s.on_orientation(sample, angle));
        }) as Box<dyn FnMut(_)>);
    _ = window
        .add_event_listener_with_callback("deviceorientation", closure.as_ref().unchecked_ref());
    closure.forget();
    log::info!("[gyro] listening for device orientation");
}
