//! Thin wrappers over browser APIs the session asks for.

use js_sys::{Function, Promise, Reflect};
use panorama_core::{PermissionError, PermissionResponse};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

const MOTION_EVENT: &str = "DeviceMotionEvent";
const REQUEST_PERMISSION: &str = "requestPermission";

pub fn user_agent() -> String {
    web::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default()
}

fn permission_function() -> Option<(JsValue, Function)> {
    let global = js_sys::global();
    let class = Reflect::get(&global, &JsValue::from_str(MOTION_EVENT)).ok()?;
    if class.is_undefined() || class.is_null() {
        return None;
    }
    let f = Reflect::get(&class, &JsValue::from_str(REQUEST_PERMISSION)).ok()?;
    let f = f.dyn_into::<Function>().ok()?;
    Some((class, f))
}

/// True when the platform gates motion sensors behind an explicit request.
#[inline]
pub fn permission_api_callable() -> bool {
    permission_function().is_some()
}

/// Ask the platform for motion-sensor access. The call itself happens
/// synchronously so it stays inside the user gesture that triggered it.
pub fn request_motion_permission() -> Result<Promise, PermissionError> {
    let (class, f) = permission_function().ok_or(PermissionError::Unavailable)?;
    let value = f
        .call0(&class)
        .map_err(|e| PermissionError::Rejected(describe(&e)))?;
    value
        .dyn_into::<Promise>()
        .map_err(|v| PermissionError::Rejected(describe(&v)))
}

pub async fn await_permission(promise: Promise) -> Result<PermissionResponse, PermissionError> {
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| PermissionError::Rejected(describe(&e)))?;
    let state = value.as_string().unwrap_or_default();
    Ok(PermissionResponse::from_platform(&state))
}

/// Screen rotation in degrees (0, 90, 180, 270); 0 when unknown.
pub fn screen_angle_deg() -> f32 {
    let Some(w) = web::window() else {
        return 0.0;
    };
    if let Ok(screen) = w.screen() {
        if let Ok(angle) = screen.orientation().angle() {
            return angle as f32;
        }
    }
    // legacy window.orientation
    Reflect::get(&w, &JsValue::from_str("orientation"))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32
}

pub fn reload() {
    if let Some(w) = web::window() {
        _ = w.location().reload();
    }
}

pub fn navigate(destination: &str) {
    if let Some(w) = web::window() {
        _ = w.location().set_href(destination);
    }
}

fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
