//! Camera controllers and the selection rule between them.

use crate::camera::Camera;
use crate::capability::Capability;
use crate::constants::{
    ORBIT_DISTANCE, ORBIT_MAX_POLAR, ORBIT_MIN_POLAR, ORBIT_POLAR_EPSILON, ORBIT_ROTATE_SPEED,
    ORBIT_TARGET, ORIENTATION_CAMERA_POSITION,
};
use glam::{Quat, Vec2, Vec3};
use std::f32::consts::{FRAC_1_SQRT_2, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    Orbit,
    DeviceOrientation,
    None,
}

/// What the selector decided for a given host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlPlan {
    Activate(ControlMode),
    /// Sensor access must be negotiated before device-orientation can start.
    Negotiate,
}

pub fn plan_for(capability: Capability) -> ControlPlan {
    match capability {
        Capability::Desktop => ControlPlan::Activate(ControlMode::Orbit),
        Capability::MobileWithoutPermissionApi => {
            ControlPlan::Activate(ControlMode::DeviceOrientation)
        }
        Capability::MobileWithPermissionApi => ControlPlan::Negotiate,
    }
}

/// The single controller driving the camera.
#[derive(Clone, Debug)]
pub enum ActiveControls {
    Orbit(OrbitControls),
    DeviceOrientation(DeviceOrientationControls),
}

impl ActiveControls {
    pub fn mode(&self) -> ControlMode {
        match self {
            ActiveControls::Orbit(_) => ControlMode::Orbit,
            ActiveControls::DeviceOrientation(_) => ControlMode::DeviceOrientation,
        }
    }

    /// Advance one step, writing the resulting pose into `camera`.
    pub fn update(&mut self, camera: &mut Camera) {
        match self {
            ActiveControls::Orbit(c) => c.update(camera),
            ActiveControls::DeviceOrientation(c) => c.update(camera),
        }
    }
}

// ---------------- Orbit ----------------

/// Drag-to-rotate controller orbiting a fixed target at a fixed distance.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub rotate_speed: f32,
    // (theta, phi) accumulated since the last update
    pending: Vec2,
}

impl OrbitControls {
    /// Bind to `camera` and settle it onto the orbit sphere.
    pub fn new(camera: &mut Camera) -> Self {
        let mut controls = Self {
            target: ORBIT_TARGET,
            min_distance: ORBIT_DISTANCE,
            max_distance: ORBIT_DISTANCE,
            min_polar: ORBIT_MIN_POLAR,
            max_polar: ORBIT_MAX_POLAR,
            rotate_speed: ORBIT_ROTATE_SPEED,
            pending: Vec2::ZERO,
        };
        controls.update(camera);
        controls
    }

    /// Queue a rotation from a pointer drag of `(dx, dy)` CSS pixels. A drag
    /// across the full viewport height turns the view by one revolution.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.pending.x -= TAU * dx / h * self.rotate_speed;
        self.pending.y -= TAU * dy / h * self.rotate_speed;
    }

    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, 0.0)
        };

        theta += self.pending.x;
        phi += self.pending.y;
        self.pending = Vec2::ZERO;

        phi = phi.clamp(self.min_polar, self.max_polar);
        phi = phi.clamp(ORBIT_POLAR_EPSILON, std::f32::consts::PI - ORBIT_POLAR_EPSILON);
        let radius = radius.clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.look_at(self.target);
    }
}

// ---------------- Device orientation ----------------

/// One `deviceorientation` reading, in degrees. Any field may be missing on
/// hosts without the corresponding sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationSample {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl OrientationSample {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    /// All three angles present: evidence that the sensor is live.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.alpha.is_some() && self.beta.is_some() && self.gamma.is_some()
    }
}

/// Maps device attitude onto the camera orientation.
#[derive(Clone, Debug, Default)]
pub struct DeviceOrientationControls {
    pub alpha_offset: f32,
    latest: Option<OrientationSample>,
    screen_angle_deg: f32,
}

impl DeviceOrientationControls {
    /// Move the camera to the viewing point and start with no reading.
    pub fn activate(camera: &mut Camera) -> Self {
        camera.position = ORIENTATION_CAMERA_POSITION;
        Self::default()
    }

    pub fn set_sample(&mut self, sample: OrientationSample, screen_angle_deg: f32) {
        self.latest = Some(sample);
        self.screen_angle_deg = screen_angle_deg;
    }

    #[inline]
    pub fn has_sample(&self) -> bool {
        self.latest.is_some()
    }

    pub fn update(&mut self, camera: &mut Camera) {
        let Some(s) = self.latest else {
            return;
        };
        let alpha = s.alpha.map_or(0.0, |a| (a as f32).to_radians() + self.alpha_offset);
        let beta = s.beta.map_or(0.0, |b| (b as f32).to_radians());
        let gamma = s.gamma.map_or(0.0, |g| (g as f32).to_radians());
        let orient = self.screen_angle_deg.to_radians();
        camera.orientation = device_quaternion(alpha, beta, gamma, orient);
    }
}

/// Camera orientation for a device attitude given in radians.
///
/// Attitude is a YXZ rotation (alpha about Y, beta about X, -gamma about Z),
/// followed by -90° about X so the back of the device looks along -Z, and a
/// rotation about Z undoing the screen orientation.
pub fn device_quaternion(alpha: f32, beta: f32, gamma: f32, screen_orient: f32) -> Quat {
    let attitude =
        Quat::from_rotation_y(alpha) * Quat::from_rotation_x(beta) * Quat::from_rotation_z(-gamma);
    let back_to_front = Quat::from_xyzw(-FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2);
    (attitude * back_to_front * Quat::from_rotation_z(-screen_orient)).normalize()
}
