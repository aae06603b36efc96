use glam::Vec3;
use std::time::Duration;

// Shared camera, timing and detection constants used by the web frontend.

// Camera
pub const CAMERA_FOV_Y_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Orbit (desktop) controller
pub const ORBIT_TARGET: Vec3 = Vec3::new(0.0, 10.0, 0.0); // look-at point above the origin
pub const ORBIT_DISTANCE: f32 = 1.0; // min == max, zoom disabled
pub const ORBIT_MIN_POLAR: f32 = 0.0;
pub const ORBIT_MAX_POLAR: f32 = std::f32::consts::PI;
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_POLAR_EPSILON: f32 = 1.0e-6; // keeps the view off the exact poles

// Device-orientation (mobile) controller
pub const ORIENTATION_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 10.0, 0.0);

// Timings
pub const GYRO_PROBE_TIMEOUT: Duration = Duration::from_millis(1000);
pub const NAVIGATION_DELAY: Duration = Duration::from_millis(1000);
pub const INTRO_FADE_DELAY: Duration = Duration::from_millis(1000);
pub const INTRO_FADE_HOLD: Duration = Duration::from_millis(100);

// Capability detection
pub const MOBILE_MARKERS: [&str; 4] = ["android", "iphone", "ipad", "ipod"];

// Animation
pub const AUTOPLAY_CLIP_LIMIT: usize = 3; // clips started unconditionally on load

// Lighting
pub const AMBIENT_INTENSITY: f32 = 5.0;
