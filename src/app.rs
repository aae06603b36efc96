//! Shared page state and the effect executor.

use crate::input::DragTracker;
use crate::render::GpuState;
use crate::{events, host, loader, overlay, timers};
use panorama_core::{Effect, Effects, Session};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub struct App {
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub session: RefCell<Session>,
    pub gpu: RefCell<Option<GpuState>>,
    pub drag: RefCell<DragTracker>,
    orientation_wired: Cell<bool>,
    consent_wired: Cell<bool>,
}

impl App {
    pub fn new(document: web::Document, canvas: web::HtmlCanvasElement, session: Session) -> Self {
        Self {
            document,
            canvas,
            session: RefCell::new(session),
            gpu: RefCell::new(None),
            drag: RefCell::new(DragTracker::default()),
            orientation_wired: Cell::new(false),
            consent_wired: Cell::new(false),
        }
    }

    /// Run a session input and perform what it asks for. The session borrow
    /// ends before any effect runs, so effects may call back in.
    pub fn dispatch(self: &Rc<Self>, f: impl FnOnce(&mut Session) -> Effects) {
        let fx = match self.session.try_borrow_mut() {
            Ok(mut s) => f(&mut s),
            Err(_) => {
                log::warn!("session busy, input dropped");
                return;
            }
        };
        apply(self, fx);
    }
}

pub fn apply(app: &Rc<App>, fx: Effects) {
    for effect in fx {
        perform(app, effect);
    }
}

fn perform(app: &Rc<App>, effect: Effect) {
    match effect {
        Effect::ListenOrientation => {
            if !app.orientation_wired.replace(true) {
                events::orientation::listen(app);
            }
        }
        Effect::StartTimer { timer, delay } => {
            let app = app.clone();
            timers::set_timeout(delay, move || app.dispatch(|s| s.on_timer(timer)));
        }
        Effect::SetFade(opacity) => overlay::set_fade(&app.document, opacity),
        Effect::ShowConsent => {
            if overlay::show_consent(&app.document) && !app.consent_wired.replace(true) {
                events::wire_consent(app);
            }
        }
        Effect::HideConsent => overlay::hide_consent(&app.document),
        Effect::RequestPermission => match host::request_motion_permission() {
            Ok(promise) => {
                let app = app.clone();
                spawn_local(async move {
                    let result = host::await_permission(promise).await;
                    app.dispatch(|s| s.on_permission_result(result));
                });
            }
            Err(e) => app.dispatch(|s| s.on_permission_result(Err(e))),
        },
        Effect::Reload => host::reload(),
        Effect::Navigate(destination) => host::navigate(&destination),
        Effect::LoadModel(path) => {
            let app = app.clone();
            spawn_local(async move {
                match loader::load_model(&path).await {
                    Ok(model) => app.dispatch(|s| s.on_model_loaded(model)),
                    Err(e) => app.dispatch(|s| s.on_model_failed(&e)),
                }
            });
        }
        Effect::LoadBackground => spawn_background(app),
        Effect::ReleaseBackground => {
            if let Ok(mut gpu) = app.gpu.try_borrow_mut() {
                if let Some(gpu) = gpu.as_mut() {
                    gpu.release_background();
                }
            }
        }
    }
}

/// Fetch and upload the panorama. Does nothing without a GPU.
pub fn spawn_background(app: &Rc<App>) {
    if app.gpu.borrow().is_none() {
        return;
    }
    let path = app.session.borrow().scene().background.clone();
    let app = app.clone();
    spawn_local(async move {
        let img = match loader::load_image(&path).await {
            Ok(img) => img,
            Err(e) => {
                log::error!("[load] background failed: {}", e);
                return;
            }
        };
        if app.session.borrow().is_torn_down() {
            return;
        }
        if let Some(gpu) = app.gpu.borrow_mut().as_mut() {
            gpu.set_background(img);
        }
    });
}
