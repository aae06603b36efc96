//! Keyframe clips and the mixer that plays them.

use crate::constants::AUTOPLAY_CLIP_LIMIT;
use crate::model::{LoadedModel, NodeTransform};
use glam::{Quat, Vec3};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
    /// Stored as in-tangent, value, out-tangent per key. Only the values are
    /// interpolated; tangents are ignored.
    CubicSpline,
}

/// Output values of one channel, one entry per key (three for cubic splines).
#[derive(Clone, Debug, PartialEq)]
pub enum Keyframes {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

/// Animates one property of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    /// Index into [`LoadedModel::nodes`].
    pub node: usize,
    pub interpolation: Interpolation,
    pub times: Vec<f32>,
    pub keyframes: Keyframes,
}

impl Channel {
    /// Write the channel's value at `t` seconds into `local`.
    pub fn apply(&self, t: f32, local: &mut NodeTransform) {
        let Some(span) = self.span(t) else {
            return;
        };
        match &self.keyframes {
            Keyframes::Translation(v) => {
                if let Some(p) = self.sample(v, span, Vec3::lerp) {
                    local.translation = p;
                }
            }
            Keyframes::Rotation(v) => {
                if let Some(r) = self.sample(v, span, Quat::slerp) {
                    local.rotation = r.normalize();
                }
            }
            Keyframes::Scale(v) => {
                if let Some(s) = self.sample(v, span, Vec3::lerp) {
                    local.scale = s;
                }
            }
        }
    }

    // Keys to blend between and the blend factor. Clamps outside the key range.
    fn span(&self, t: f32) -> Option<(usize, usize, f32)> {
        let last = self.times.len().checked_sub(1)?;
        if t <= self.times[0] {
            return Some((0, 0, 0.0));
        }
        if t >= self.times[last] {
            return Some((last, last, 0.0));
        }
        let next = self.times.partition_point(|&k| k <= t).clamp(1, last);
        let prev = next - 1;
        if self.interpolation == Interpolation::Step {
            return Some((prev, prev, 0.0));
        }
        let (t0, t1) = (self.times[prev], self.times[next]);
        let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
        Some((prev, next, f))
    }

    fn sample<T: Copy>(
        &self,
        values: &[T],
        (a, b, f): (usize, usize, f32),
        mix: impl Fn(T, T, f32) -> T,
    ) -> Option<T> {
        Some(mix(self.key(values, a)?, self.key(values, b)?, f))
    }

    fn key<T: Copy>(&self, values: &[T], k: usize) -> Option<T> {
        let idx = match self.interpolation {
            Interpolation::CubicSpline => 3 * k + 1,
            _ => k,
        };
        values.get(idx).copied()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration_sec: f32,
    pub channels: Vec<Channel>,
}

/// Playback cursor for one clip. Clips loop.
#[derive(Clone, Copy, Debug)]
pub struct ClipAction {
    /// Index into [`LoadedModel::clips`].
    pub clip: usize,
    pub duration_sec: f32,
    pub time_sec: f32,
    pub playing: bool,
}

impl ClipAction {
    fn advance(&mut self, dt_sec: f32) {
        if !self.playing {
            return;
        }
        let d = self.duration_sec;
        self.time_sec = if d > 0.0 {
            (self.time_sec + dt_sec).rem_euclid(d)
        } else {
            0.0
        };
    }
}

/// Plays the model's first few clips at once. Clips touching the same node
/// property overwrite each other in clip order; there is no weighting.
#[derive(Clone, Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<ClipAction>,
}

impl AnimationMixer {
    /// Start the first few clips. Returns `None` when the model has no clips,
    /// so the frame driver has nothing to advance.
    pub fn autoplay(clips: &[AnimationClip]) -> Option<Self> {
        if clips.is_empty() {
            return None;
        }
        let actions = clips
            .iter()
            .take(AUTOPLAY_CLIP_LIMIT)
            .enumerate()
            .map(|(i, c)| ClipAction {
                clip: i,
                duration_sec: c.duration_sec,
                time_sec: 0.0,
                playing: true,
            })
            .collect();
        Some(Self { actions })
    }

    pub fn update(&mut self, dt: Duration) {
        let dt_sec = dt.as_secs_f32();
        for a in &mut self.actions {
            a.advance(dt_sec);
        }
    }

    /// Pose `model` at the current playback times. Returns whether any node
    /// was animated.
    pub fn apply(&self, model: &mut LoadedModel) -> bool {
        let mut posed = false;
        for a in self.actions.iter().filter(|a| a.playing) {
            posed |= model.apply_clip(a.clip, a.time_sec);
        }
        if posed {
            model.update_world();
        }
        posed
    }

    pub fn actions(&self) -> &[ClipAction] {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(name: &str, d: f32) -> AnimationClip {
        AnimationClip {
            name: name.into(),
            duration_sec: d,
            channels: Vec::new(),
        }
    }

    fn slide(interpolation: Interpolation, values: Vec<Vec3>) -> Channel {
        Channel {
            node: 0,
            interpolation,
            times: vec![0.0, 1.0, 3.0],
            keyframes: Keyframes::Translation(values),
        }
    }

    #[test]
    fn no_clips_no_mixer() {
        assert!(AnimationMixer::autoplay(&[]).is_none());
    }

    #[test]
    fn at_most_three_clips_start() {
        let clips: Vec<AnimationClip> = (0..5).map(|i| clip(&format!("c{i}"), 1.0)).collect();
        let mixer = AnimationMixer::autoplay(&clips).unwrap();
        assert_eq!(mixer.actions().len(), 3);
        assert_eq!(mixer.actions()[2].clip, 2);

        let one = AnimationMixer::autoplay(&clips[..1]).unwrap();
        assert_eq!(one.actions().len(), 1);
    }

    #[test]
    fn playback_wraps_at_clip_end() {
        let mut mixer = AnimationMixer::autoplay(&[clip("spin", 2.0), clip("still", 0.0)]).unwrap();
        mixer.update(Duration::from_millis(1500));
        mixer.update(Duration::from_millis(1000));
        let t = mixer.actions()[0].time_sec;
        assert!((t - 0.5).abs() < 1e-4, "t = {t}");
        assert_eq!(mixer.actions()[1].time_sec, 0.0);
    }

    #[test]
    fn linear_channel_interpolates_between_keys() {
        let ch = slide(
            Interpolation::Linear,
            vec![Vec3::ZERO, Vec3::X, Vec3::new(3.0, 0.0, 0.0)],
        );
        let mut local = NodeTransform::IDENTITY;
        ch.apply(0.5, &mut local);
        assert!((local.translation - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
        ch.apply(2.0, &mut local);
        assert!((local.translation - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        // clamps past the last key
        ch.apply(9.0, &mut local);
        assert_eq!(local.translation, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(local.scale, Vec3::ONE);
    }

    #[test]
    fn step_channel_holds_previous_key() {
        let ch = slide(Interpolation::Step, vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        let mut local = NodeTransform::IDENTITY;
        ch.apply(2.9, &mut local);
        assert_eq!(local.translation, Vec3::X);
    }

    #[test]
    fn cubic_spline_reads_values_between_tangents() {
        let t = Vec3::splat(100.0);
        let ch = slide(
            Interpolation::CubicSpline,
            vec![t, Vec3::ZERO, t, t, Vec3::X, t, t, Vec3::Y, t],
        );
        let mut local = NodeTransform::IDENTITY;
        ch.apply(1.0, &mut local);
        assert_eq!(local.translation, Vec3::X);
    }

    #[test]
    fn rotation_channel_slerps() {
        let quarter = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let ch = Channel {
            node: 0,
            interpolation: Interpolation::Linear,
            times: vec![0.0, 2.0],
            keyframes: Keyframes::Rotation(vec![Quat::IDENTITY, quarter]),
        };
        let mut local = NodeTransform::IDENTITY;
        ch.apply(1.0, &mut local);
        let eighth = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(local.rotation.angle_between(eighth) < 1e-4);
    }

    #[test]
    fn empty_channel_leaves_pose_alone() {
        let ch = Channel {
            node: 0,
            interpolation: Interpolation::Linear,
            times: Vec::new(),
            keyframes: Keyframes::Scale(Vec::new()),
        };
        let mut local = NodeTransform::IDENTITY;
        ch.apply(1.0, &mut local);
        assert_eq!(local, NodeTransform::IDENTITY);
    }
}
