//! One page's worth of navigation state.
//!
//! The session owns the camera, the active controller, the permission
//! negotiator, the trigger registry and animation playback. Every input
//! (orientation reading, click, timer, load completion) goes through a
//! method that mutates state and returns the side effects the host must
//! perform. The host never has to keep a borrow across an effect.

use crate::animation::AnimationMixer;
use crate::camera::{Camera, Viewport};
use crate::capability::Capability;
use crate::constants::{GYRO_PROBE_TIMEOUT, INTRO_FADE_DELAY, INTRO_FADE_HOLD, NAVIGATION_DELAY};
use crate::controls::{
    plan_for, ActiveControls, ControlMode, ControlPlan, DeviceOrientationControls,
    OrbitControls, OrientationSample,
};
use crate::dispatcher::{DispatchOutcome, PointerDispatcher};
use crate::error::{LoadError, PermissionError};
use crate::model::LoadedModel;
use crate::permission::{NegotiationStep, PermissionNegotiator, PermissionResponse, PermissionState};
use crate::registry::TriggerRegistry;
use crate::scene::{GrantPolicy, Scene, SceneConfig};
use glam::Vec2;
use smallvec::{smallvec, SmallVec};
use std::time::Duration;

/// One-shot timers the host schedules on the session's behalf. None of them
/// is ever cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    GyroProbe,
    IntroFadeIn,
    IntroFadeOut,
    Navigation,
}

/// Side effect for the host to carry out.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Subscribe to device-orientation events for the rest of the session.
    ListenOrientation,
    StartTimer { timer: Timer, delay: Duration },
    SetFade(f32),
    ShowConsent,
    HideConsent,
    RequestPermission,
    Reload,
    Navigate(String),
    LoadModel(String),
    /// Fetch and upload the scene's background panorama.
    LoadBackground,
    ReleaseBackground,
}

pub type Effects = SmallVec<[Effect; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelState {
    Absent,
    Loading,
    Loaded,
    Failed,
}

pub struct Session {
    config: SceneConfig,
    capability: Capability,
    camera: Camera,
    viewport: Viewport,
    controls: Option<ActiveControls>,
    negotiator: Option<PermissionNegotiator>,
    registry: TriggerRegistry,
    dispatcher: PointerDispatcher,
    // mixer and the index of the model it poses
    mixer: Option<(usize, AnimationMixer)>,
    scene: Scene,
    model_state: ModelState,
    started: bool,
    torn_down: bool,
}

impl Session {
    pub fn new(config: SceneConfig, capability: Capability, viewport: Viewport) -> Self {
        let scene = Scene::new(config.background.clone());
        Self {
            capability,
            camera: Camera::new(viewport.aspect()),
            viewport,
            controls: None,
            negotiator: None,
            registry: TriggerRegistry::new(),
            dispatcher: PointerDispatcher::new(),
            mixer: None,
            scene,
            model_state: ModelState::Absent,
            started: false,
            torn_down: false,
            config,
        }
    }

    /// Select the control mode and kick off asset loading. Runs once; later
    /// calls return no effects.
    pub fn start(&mut self) -> Effects {
        if self.started {
            return Effects::new();
        }
        self.started = true;
        log::info!(
            "[session] scene={} capability={:?}",
            self.config.name,
            self.capability
        );

        let mut fx = Effects::new();
        match plan_for(self.capability) {
            ControlPlan::Activate(ControlMode::Orbit) => {
                self.controls = Some(ActiveControls::Orbit(OrbitControls::new(&mut self.camera)));
            }
            ControlPlan::Activate(ControlMode::DeviceOrientation) => {
                self.activate_orientation();
                fx.push(Effect::ListenOrientation);
            }
            ControlPlan::Activate(ControlMode::None) => {}
            ControlPlan::Negotiate => {
                self.negotiator = Some(PermissionNegotiator::new());
                fx.push(Effect::ListenOrientation);
                fx.push(Effect::StartTimer {
                    timer: Timer::GyroProbe,
                    delay: GYRO_PROBE_TIMEOUT,
                });
            }
        }

        match self.config.model.clone() {
            Some(path) => {
                self.model_state = ModelState::Loading;
                fx.push(Effect::LoadModel(path));
            }
            None => fx.push(intro_fade()),
        }
        fx
    }

    // ---------------- accessors ----------------

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn model_state(&self) -> ModelState {
        self.model_state
    }

    pub fn control_mode(&self) -> ControlMode {
        self.controls
            .as_ref()
            .map_or(ControlMode::None, ActiveControls::mode)
    }

    pub fn permission_state(&self) -> Option<PermissionState> {
        self.negotiator.as_ref().map(PermissionNegotiator::state)
    }

    pub fn has_animation(&self) -> bool {
        self.mixer.is_some()
    }

    pub fn navigation_pending(&self) -> bool {
        self.dispatcher.is_pending()
    }

    #[inline]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Clicks are consumed (default action prevented) only once triggers exist.
    pub fn accepts_clicks(&self) -> bool {
        !self.torn_down && !self.registry.is_empty()
    }

    // ---------------- inputs ----------------

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    pub fn on_model_loaded(&mut self, model: LoadedModel) -> Effects {
        let added = self
            .registry
            .append_matching(&model.objects, &self.config.trigger_names);
        log::info!(
            "[load] {} ready: {} objects, {} triggers, {} clips",
            model.source,
            model.objects.len(),
            added,
            model.clips.len()
        );
        let mixer = AnimationMixer::autoplay(&model.clips);
        let index = self.scene.add_model(model);
        self.mixer = mixer.map(|m| (index, m));
        self.model_state = ModelState::Loaded;
        smallvec![intro_fade()]
    }

    /// The scene stays without the model. The intro fade still runs so the
    /// panorama is revealed.
    pub fn on_model_failed(&mut self, err: &LoadError) -> Effects {
        log::error!("[load] model failed: {}", err);
        self.model_state = ModelState::Failed;
        smallvec![intro_fade()]
    }

    pub fn on_orientation(&mut self, sample: OrientationSample, screen_angle_deg: f32) -> Effects {
        let mut fx = Effects::new();
        let step = self
            .negotiator
            .as_mut()
            .map(|n| (n.consent_shown(), n.on_orientation(&sample)));
        if let Some((prompt_up, Some(NegotiationStep::ActivateOrientation))) = step {
            self.activate_orientation();
            if prompt_up {
                fx.push(Effect::HideConsent);
            }
        }
        if let Some(ActiveControls::DeviceOrientation(c)) = self.controls.as_mut() {
            c.set_sample(sample, screen_angle_deg);
        }
        fx
    }

    pub fn on_timer(&mut self, timer: Timer) -> Effects {
        match timer {
            Timer::GyroProbe => match self.negotiator.as_mut().and_then(|n| n.on_probe_timeout()) {
                Some(NegotiationStep::ShowConsent) => smallvec![Effect::ShowConsent],
                _ => Effects::new(),
            },
            Timer::IntroFadeIn => smallvec![
                Effect::SetFade(1.0),
                Effect::StartTimer {
                    timer: Timer::IntroFadeOut,
                    delay: INTRO_FADE_HOLD,
                }
            ],
            Timer::IntroFadeOut => smallvec![Effect::SetFade(0.0)],
            Timer::Navigation => match self.dispatcher.take_pending() {
                Some(dest) => {
                    log::info!("[nav] navigating to {}", dest);
                    smallvec![Effect::Navigate(dest)]
                }
                None => Effects::new(),
            },
        }
    }

    pub fn on_consent_acknowledged(&mut self) -> Effects {
        match self
            .negotiator
            .as_mut()
            .and_then(|n| n.on_consent_acknowledged())
        {
            Some(NegotiationStep::RequestPermission) => smallvec![Effect::RequestPermission],
            _ => Effects::new(),
        }
    }

    pub fn on_permission_result(
        &mut self,
        result: Result<PermissionResponse, PermissionError>,
    ) -> Effects {
        let step = self
            .negotiator
            .as_mut()
            .and_then(|n| n.on_permission_result(result));
        if step != Some(NegotiationStep::ConsentGranted) {
            return Effects::new();
        }
        match self.config.grant_policy {
            GrantPolicy::Reload => smallvec![Effect::Reload],
            GrantPolicy::ActivateInPlace => {
                self.activate_orientation();
                smallvec![Effect::HideConsent]
            }
        }
    }

    /// Pointer drag in CSS pixels. Only the orbit controller reacts.
    pub fn on_drag(&mut self, dx: f32, dy: f32) {
        if let Some(ActiveControls::Orbit(orbit)) = self.controls.as_mut() {
            orbit.rotate_by_pixels(dx, dy, self.viewport.height);
        }
    }

    pub fn on_click(&mut self, client_x: f32, client_y: f32) -> Effects {
        if self.torn_down {
            return Effects::new();
        }
        let outcome = self.dispatcher.handle(
            Vec2::new(client_x, client_y),
            self.viewport,
            &self.camera,
            &self.registry,
            &self.config.navigation,
        );
        match outcome {
            DispatchOutcome::Navigate { .. } => smallvec![
                Effect::SetFade(1.0),
                Effect::StartTimer {
                    timer: Timer::Navigation,
                    delay: NAVIGATION_DELAY,
                }
            ],
            _ => Effects::new(),
        }
    }

    /// Page is going away.
    pub fn teardown(&mut self) -> Effects {
        if self.torn_down {
            return Effects::new();
        }
        self.torn_down = true;
        smallvec![Effect::ReleaseBackground]
    }

    /// The page came back from the back-forward cache after a teardown.
    /// Clicks work again, the background is fetched anew and the fade left
    /// over from the navigation is cleared.
    pub fn restore(&mut self) -> Effects {
        if !self.torn_down {
            return Effects::new();
        }
        self.torn_down = false;
        log::info!("[session] restored from page cache");
        smallvec![Effect::SetFade(0.0), Effect::LoadBackground]
    }

    // ---------------- frame steps ----------------

    pub fn step_controls(&mut self) {
        if let Some(c) = self.controls.as_mut() {
            c.update(&mut self.camera);
        }
    }

    /// Advance playback and re-pose the model. Triggers are re-picked
    /// against the new pose.
    pub fn step_animation(&mut self, dt: Duration) {
        let Some((index, mixer)) = self.mixer.as_mut() else {
            return;
        };
        mixer.update(dt);
        let Some(model) = self.scene.model_mut(*index) else {
            return;
        };
        if mixer.apply(model) {
            self.registry.refresh(&model.objects);
            self.scene.touch();
        }
    }

    // Only the first activation counts; the mode never changes afterwards.
    fn activate_orientation(&mut self) {
        if self.controls.is_some() {
            return;
        }
        log::info!("[gyro] device-orientation controls active");
        self.controls = Some(ActiveControls::DeviceOrientation(
            DeviceOrientationControls::activate(&mut self.camera),
        ));
    }
}

fn intro_fade() -> Effect {
    Effect::StartTimer {
        timer: Timer::IntroFadeIn,
        delay: INTRO_FADE_DELAY,
    }
}
