#![cfg(target_arch = "wasm32")]
use anyhow::anyhow;
use panorama_core::{Capability, SceneConfig, Session};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod constants;
mod dom;
mod events;
mod frame;
mod host;
mod input;
mod loader;
mod overlay;
mod render;
mod timers;

use constants::{BACKGROUND_ATTR, CANVAS_ID, GRANT_POLICY_ATTR, MODEL_ATTR, SCENE_ATTR};

fn scene_config(document: &web::Document) -> SceneConfig {
    let attr = |name| dom::body_attribute(document, name);
    let (scene, background, model, grant) = (
        attr(SCENE_ATTR),
        attr(BACKGROUND_ATTR),
        attr(MODEL_ATTR),
        attr(GRANT_POLICY_ATTR),
    );
    SceneConfig::resolve(
        scene.as_deref(),
        background.as_deref(),
        model.as_deref(),
        grant.as_deref(),
    )
}

// Use the page's canvas if it has one, otherwise add a full-window canvas.
fn find_or_create_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    if let Some(el) = document.get_element_by_id(CANVAS_ID) {
        return el
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|_| anyhow!("#{} is not a canvas", CANVAS_ID));
    }
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow!("created element is not a canvas"))?;
    canvas.set_id(CANVAS_ID);
    _ = canvas.set_attribute(
        "style",
        "position:fixed;inset:0;width:100vw;height:100vh;display:block;touch-action:none",
    );
    document
        .body()
        .ok_or_else(|| anyhow!("no body"))?
        .append_child(&canvas)
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(canvas)
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let document = window.document().ok_or_else(|| anyhow!("no document"))?;
    let canvas = find_or_create_canvas(&document)?;
    dom::sync_canvas_backing_size(&canvas);

    let config = scene_config(&document);
    let capability = Capability::detect(&host::user_agent(), host::permission_api_callable());
    let session = Session::new(config, capability, events::window_viewport(&window));
    let app = Rc::new(app::App::new(document, canvas.clone(), session));

    events::wire(&app);
    app.dispatch(|s| s.start());

    match frame::init_gpu(&canvas).await {
        Some(gpu) => {
            *app.gpu.borrow_mut() = Some(gpu);
            app::spawn_background(&app);
        }
        None => log::warn!("rendering disabled, controls and clicks still run"),
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(app)));
    frame::start_loop(frame_ctx);
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("panorama-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}
