use glam::Vec3;

/// World-space ray with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Loose bounding sphere around a point set: AABB center, farthest point
    /// as radius. Empty input yields a zero sphere at the origin.
    pub fn enclosing(points: impl IntoIterator<Item = Vec3>) -> Self {
        let pts: Vec<Vec3> = points.into_iter().collect();
        if pts.is_empty() {
            return Sphere {
                center: Vec3::ZERO,
                radius: 0.0,
            };
        }
        let (min, max) = pts
            .iter()
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });
        let center = (min + max) * 0.5;
        let radius = pts
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0_f32, f32::max);
        Sphere { center, radius }
    }
}

/// Nearest non-negative hit distance along the ray. A ray starting inside
/// the sphere reports its exit point.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t_near = -b - sq;
    if t_near >= 0.0 {
        return Some(t_near);
    }
    let t_far = -b + sq;
    (t_far >= 0.0).then_some(t_far)
}

/// Möller–Trumbore ray/triangle test, double-sided.
#[inline]
pub fn ray_triangle(ray: &Ray, tri: &[Vec3; 3]) -> Option<f32> {
    const EPS: f32 = 1.0e-7;
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - tri[0];
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// Pickable geometry of one scene object in world space.
///
/// The sphere rejects most rays cheaply; triangles, when present, give the
/// exact hit distance. Objects without triangles are picked by their sphere.
#[derive(Clone, Debug, Default)]
pub struct PickShape {
    pub bounds: Option<Sphere>,
    pub triangles: Vec<[Vec3; 3]>,
}

impl PickShape {
    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Self {
        let bounds = Sphere::enclosing(triangles.iter().flat_map(|t| t.iter().copied()));
        Self {
            bounds: Some(bounds),
            triangles,
        }
    }

    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self {
            bounds: Some(Sphere { center, radius }),
            triangles: Vec::new(),
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let bounds = self.bounds?;
        let t_bounds = ray_sphere(ray.origin, ray.direction, bounds.center, bounds.radius)?;
        if self.triangles.is_empty() {
            return Some(t_bounds);
        }
        self.triangles
            .iter()
            .filter_map(|tri| ray_triangle(ray, tri))
            .min_by(f32::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_at_z(z: f32, half: f32) -> Vec<[Vec3; 3]> {
        let a = Vec3::new(-half, -half, z);
        let b = Vec3::new(half, -half, z);
        let c = Vec3::new(half, half, z);
        let d = Vec3::new(-half, half, z);
        vec![[a, b, c], [a, c, d]]
    }

    #[test]
    fn sphere_hit_from_outside_and_inside() {
        let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0);
        assert!((t.unwrap() - 3.0).abs() < 1e-5);

        let t = ray_sphere(Vec3::new(0.0, 0.0, 5.0), Vec3::X, Vec3::new(0.0, 0.0, 5.0), 3.0);
        assert!((t.unwrap() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_behind_ray_is_missed() {
        assert!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
        assert!(ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());
    }

    #[test]
    fn triangle_hit_and_edge_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let tri = [
            Vec3::new(-1.0, -1.0, -4.0),
            Vec3::new(1.0, -1.0, -4.0),
            Vec3::new(0.0, 1.0, -4.0),
        ];
        assert!((ray_triangle(&ray, &tri).unwrap() - 4.0).abs() < 1e-5);

        let off = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(ray_triangle(&off, &tri).is_none());
    }

    #[test]
    fn shape_uses_triangles_inside_bounds() {
        let shape = PickShape::from_triangles(quad_at_z(-10.0, 1.0));
        // corner of the bounding sphere but outside the quad
        let grazing = Ray::new(Vec3::new(1.3, 0.0, 0.0), Vec3::NEG_Z);
        assert!(shape.intersect(&grazing).is_none());

        let center = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!((shape.intersect(&center).unwrap() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn empty_shape_is_never_hit() {
        let shape = PickShape::default();
        assert!(shape.intersect(&Ray::new(Vec3::ZERO, Vec3::Z)).is_none());
    }

    #[test]
    fn enclosing_sphere_contains_points() {
        let pts = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 2.0, 0.0), Vec3::ZERO];
        let s = Sphere::enclosing(pts);
        for p in pts {
            assert!(p.distance(s.center) <= s.radius + 1e-5);
        }
    }
}
