//! Click → ray → trigger → navigation.

use crate::camera::{Camera, Viewport};
use crate::navigation::NavigationMap;
use crate::registry::TriggerRegistry;
use glam::Vec2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Registry still empty (model not loaded, or nothing matched).
    NotReady,
    Miss,
    /// Hit an object with no navigation entry.
    Unmapped(String),
    /// Start the fade and schedule navigation to `destination`.
    Navigate { target: String, destination: String },
    /// A navigation is already scheduled; this hit is dropped.
    AlreadyPending { target: String },
}

/// Resolves clicks against the trigger registry. At most one navigation is
/// pending at a time.
#[derive(Debug, Default)]
pub struct PointerDispatcher {
    pending: Option<String>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(
        &mut self,
        client: Vec2,
        viewport: Viewport,
        camera: &Camera,
        registry: &TriggerRegistry,
        navigation: &NavigationMap,
    ) -> DispatchOutcome {
        if registry.is_empty() {
            return DispatchOutcome::NotReady;
        }
        let ndc = viewport.ndc_from_client(client.x, client.y);
        let ray = camera.ray_from_ndc(ndc);
        let Some(hit) = registry.nearest_hit(&ray) else {
            return DispatchOutcome::Miss;
        };
        log::info!("[click] trigger pressed: {}", hit.id);

        let Some(destination) = navigation.destination(hit.id) else {
            return DispatchOutcome::Unmapped(hit.id.to_string());
        };
        if self.pending.is_some() {
            log::info!("[nav] navigation already pending, ignoring {}", hit.id);
            return DispatchOutcome::AlreadyPending {
                target: hit.id.to_string(),
            };
        }
        self.pending = Some(destination.to_string());
        DispatchOutcome::Navigate {
            target: hit.id.to_string(),
            destination: destination.to_string(),
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The navigation timer fired: hand out the destination exactly once.
    pub fn take_pending(&mut self) -> Option<String> {
        self.pending.take()
    }
}
