// Host-side tests for page constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn dom_ids_are_distinct() {
    let ids = [CANVAS_ID, FADE_ID, CONSENT_BUTTON_ID];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn page_attributes_are_data_attributes() {
    for attr in [SCENE_ATTR, BACKGROUND_ATTR, MODEL_ATTR, GRANT_POLICY_ATTR] {
        assert!(attr.starts_with("data-"), "{attr}");
    }
}

#[test]
fn consent_button_is_centered_and_clamped() {
    assert!(CONSENT_STYLE.contains("position:fixed"));
    assert!(CONSENT_STYLE.contains("translate(-50%,-50%)"));
    assert!(CONSENT_STYLE.contains("width:45vw"));
    assert!(CONSENT_STYLE.contains("max-width:400px"));
    assert!(CONSENT_STYLE.contains("min-width:200px"));
    assert!(CONSENT_STYLE.contains("background:#007bff"));
    assert!(!CONSENT_LABEL.is_empty());
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn click_slop_is_a_few_pixels() {
    assert!(CLICK_SLOP_PX > 0.0 && CLICK_SLOP_PX < 20.0);
}

#[test]
fn clear_color_is_normalized() {
    assert!(CLEAR_RGB.iter().all(|c| (0.0..=1.0).contains(c)));
}
