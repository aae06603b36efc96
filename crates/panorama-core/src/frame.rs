use crate::camera::Camera;
use crate::scene::Scene;
use crate::session::Session;
use instant::Instant;
use std::time::Duration;

/// Draws one frame of a scene from a camera. Owns all GPU resources.
pub trait Renderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()>;
}

/// Source of per-frame elapsed time.
pub trait Clock {
    /// Time since the previous call (zero on the first call).
    fn delta(&mut self) -> Duration;
}

/// Free-running wall clock.
pub struct SystemClock {
    last: Option<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let dt = self.last.map(|l| now - l).unwrap_or(Duration::ZERO);
        self.last = Some(now);
        dt
    }
}

// Log the first render failure, then one per this many frames.
const RENDER_ERROR_LOG_EVERY: u64 = 600;

/// Per-refresh driver: controller, then animation, then render.
pub struct FrameDriver<C: Clock = SystemClock> {
    clock: C,
    frames: u64,
    render_failures: u64,
}

impl FrameDriver<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for FrameDriver<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FrameDriver<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            frames: 0,
            render_failures: 0,
        }
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance controller and animation without drawing. Used when no
    /// renderer could be created, so picking still follows the camera.
    pub fn step(&mut self, session: &mut Session) {
        let dt = self.clock.delta();
        session.step_controls();
        session.step_animation(dt);
        self.frames += 1;
    }

    pub fn tick<R: Renderer + ?Sized>(&mut self, session: &mut Session, renderer: &mut R) {
        self.step(session);
        if let Err(e) = renderer.render(session.scene(), session.camera()) {
            if self.render_failures % RENDER_ERROR_LOG_EVERY == 0 {
                log::error!("render error: {:?}", e);
            }
            self.render_failures += 1;
        }
    }
}
