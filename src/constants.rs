/// Page wiring and overlay styling constants.
///
/// Timings and camera parameters live in `panorama_core::constants`; this
/// file only holds what the browser page itself needs.

// DOM ids
pub const CANVAS_ID: &str = "app-canvas";
pub const FADE_ID: &str = "fade";
pub const CONSENT_BUTTON_ID: &str = "gyro-consent";

// Attributes on <body> that select and override the scene
pub const SCENE_ATTR: &str = "data-scene";
pub const BACKGROUND_ATTR: &str = "data-background";
pub const MODEL_ATTR: &str = "data-model";
pub const GRANT_POLICY_ATTR: &str = "data-grant";

// Fade overlay transition; matches the navigation delay so the page is dark
// when the location changes.
pub const FADE_TRANSITION: &str = "opacity 1s ease";

// Consent control
pub const CONSENT_LABEL: &str = "Разрешить гироскоп";
pub const CONSENT_STYLE: &str = "position:fixed;top:50%;left:50%;\
transform:translate(-50%,-50%);width:45vw;max-width:400px;min-width:200px;\
padding:15px;font-size:18px;background:#007bff;color:#fff;border:none;\
border-radius:10px;cursor:pointer;z-index:1000;\
box-shadow:0 4px 10px rgba(0,0,0,0.3)";

// Pointer travel (CSS px) below which a press-release counts as a click
// rather than a drag.
pub const CLICK_SLOP_PX: f32 = 5.0;

// Background panorama clear color while the texture is still loading
pub const CLEAR_RGB: [f64; 3] = [0.0, 0.0, 0.0];
