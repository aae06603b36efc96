use crate::app::App;
use crate::render;
use panorama_core::FrameDriver;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub app: Rc<App>,
    pub driver: FrameDriver,
}

impl FrameContext {
    pub fn new(app: Rc<App>) -> Self {
        Self {
            app,
            driver: FrameDriver::new(),
        }
    }

    pub fn frame(&mut self) {
        let Ok(mut gpu) = self.app.gpu.try_borrow_mut() else {
            return;
        };
        let Ok(mut session) = self.app.session.try_borrow_mut() else {
            return;
        };
        match gpu.as_mut() {
            Some(gpu) => self.driver.tick(&mut session, gpu),
            None => self.driver.step(&mut session),
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState> {
    match render::GpuState::new(canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
