//! Perspective camera and viewport helpers.
//!
//! Camera pose is stored as position + orientation so that both controllers
//! can drive it: the orbit controller through [`Camera::look_at`] and the
//! device-orientation controller by writing `orientation` directly.

use crate::constants::{CAMERA_FAR, CAMERA_FOV_Y_DEG, CAMERA_NEAR};
use crate::picking::Ray;
use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

/// Right-handed perspective camera looking down its local -Z axis.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Default placement: at the origin, identity orientation.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            up: Vec3::Y,
            aspect: sanitize_aspect(aspect),
            fovy_radians: CAMERA_FOV_Y_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    /// Rotate the camera so its -Z axis points at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() <= f32::EPSILON {
            return;
        }
        self.orientation = look_rotation(forward, self.up);
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray from the camera through a point in normalized device
    /// coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let half_h = (self.fovy_radians * 0.5).tan();
        let half_w = half_h * self.aspect;
        let dir_view = Vec3::new(ndc.x * half_w, ndc.y * half_h, -1.0);
        Ray::new(self.position, self.orientation * dir_view)
    }

    /// Project a world-space point to NDC. Returns `None` for points behind
    /// the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Orientation whose -Z axis points along `forward`, with `up` as the
/// preferred vertical. Falls back to +Z as the reference when `forward` is
/// parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize();
    let mut right = f.cross(up);
    if right.length_squared() < 1.0e-12 {
        right = f.cross(Vec3::Z);
    }
    let right = right.normalize();
    let true_up = right.cross(f);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, -f)).normalize()
}

/// Size of the element receiving pointer input, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    /// Client coordinates to NDC: both axes in [-1, 1], y pointing up.
    #[inline]
    pub fn ndc_from_client(&self, client_x: f32, client_y: f32) -> Vec2 {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        Vec2::new((client_x / w) * 2.0 - 1.0, -(client_y / h) * 2.0 + 1.0)
    }

    /// Inverse of [`Viewport::ndc_from_client`].
    #[inline]
    pub fn client_from_ndc(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners_and_center() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.ndc_from_client(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.ndc_from_client(800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(vp.ndc_from_client(400.0, 300.0), Vec2::ZERO);
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut cam = Camera::new(1.0);
        cam.position = Vec3::new(0.0, 10.0, 5.0);
        cam.look_at(Vec3::new(0.0, 10.0, 0.0));
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-5);

        cam.look_at(Vec3::new(5.0, 10.0, 5.0));
        assert!((cam.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn look_at_straight_up_stays_finite() {
        let mut cam = Camera::new(1.0);
        cam.look_at(Vec3::new(0.0, 10.0, 0.0));
        assert!(cam.orientation.is_finite());
        assert!((cam.forward() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn center_ray_matches_forward() {
        let mut cam = Camera::new(16.0 / 9.0);
        cam.position = Vec3::new(1.0, 2.0, 3.0);
        cam.look_at(Vec3::new(4.0, 2.0, -1.0));
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, cam.position);
        assert!((ray.direction - cam.forward()).length() < 1e-5);
    }

    #[test]
    fn project_and_ray_agree() {
        let mut cam = Camera::new(4.0 / 3.0);
        cam.look_at(Vec3::new(0.0, 0.0, -1.0));
        let p = Vec3::new(3.0, -1.5, -20.0);
        let ndc = cam.project(p).expect("point in front of camera");
        let ray = cam.ray_from_ndc(ndc);
        let to_p = (p - ray.origin).normalize();
        assert!((to_p - ray.direction).length() < 1e-4);
    }

    #[test]
    fn points_behind_camera_do_not_project() {
        let cam = Camera::new(1.0);
        assert!(cam.project(Vec3::new(0.0, 0.0, 5.0)).is_none());
    }

    #[test]
    fn degenerate_aspect_is_replaced() {
        let cam = Camera::new(f32::NAN);
        assert_eq!(cam.aspect, 1.0);
    }
}
