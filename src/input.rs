use crate::constants::CLICK_SLOP_PX;

/// Separates orbit drags from clicks for a single pointer.
///
/// Browsers still fire `click` after a drag; once the pointer has travelled
/// further than the slop the following click is swallowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragTracker {
    last: Option<(f32, f32)>,
    travelled: f32,
    suppress_click: bool,
}

impl DragTracker {
    pub fn press(&mut self, x: f32, y: f32) {
        self.last = Some((x, y));
        self.travelled = 0.0;
        self.suppress_click = false;
    }

    /// Movement since the previous position while pressed.
    pub fn move_to(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (lx, ly) = self.last?;
        let (dx, dy) = (x - lx, y - ly);
        self.travelled += (dx * dx + dy * dy).sqrt();
        self.last = Some((x, y));
        Some((dx, dy))
    }

    pub fn release(&mut self) {
        if self.last.take().is_some() {
            self.suppress_click = self.travelled > CLICK_SLOP_PX;
        }
    }

    /// Whether the click that follows a release should be handled. Resets
    /// the suppression either way.
    pub fn take_click(&mut self) -> bool {
        !std::mem::take(&mut self.suppress_click)
    }
}
