use crate::constants::{CONSENT_BUTTON_ID, CONSENT_LABEL, CONSENT_STYLE, FADE_ID, FADE_TRANSITION};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Full-screen black layer used for the intro and navigation fades.
/// Created on first use if the page does not provide one.
fn fade_element(document: &web::Document) -> Option<web::HtmlElement> {
    if let Some(el) = document.get_element_by_id(FADE_ID) {
        return el.dyn_into::<web::HtmlElement>().ok();
    }
    let el = document
        .create_element("div")
        .ok()?
        .dyn_into::<web::HtmlElement>()
        .ok()?;
    el.set_id(FADE_ID);
    _ = el.set_attribute(
        "style",
        "position:fixed;inset:0;background:#000;opacity:0;pointer-events:none;z-index:999",
    );
    document.body()?.append_child(&el).ok()?;
    Some(el)
}

pub fn set_fade(document: &web::Document, opacity: f32) {
    if let Some(el) = fade_element(document) {
        let style = el.style();
        _ = style.set_property("transition", FADE_TRANSITION);
        _ = style.set_property("opacity", &format!("{}", opacity.clamp(0.0, 1.0)));
    }
}

/// Insert the gyroscope consent button. Returns false if it already exists.
pub fn show_consent(document: &web::Document) -> bool {
    if document.get_element_by_id(CONSENT_BUTTON_ID).is_some() {
        return false;
    }
    let Some(button) = document
        .create_element("button")
        .ok()
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
    else {
        return false;
    };
    button.set_id(CONSENT_BUTTON_ID);
    button.set_inner_text(CONSENT_LABEL);
    _ = button.set_attribute("style", CONSENT_STYLE);
    match document.body() {
        Some(body) => body.append_child(&button).is_ok(),
        None => false,
    }
}

#[inline]
pub fn hide_consent(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(CONSENT_BUTTON_ID) {
        el.remove();
    }
}
