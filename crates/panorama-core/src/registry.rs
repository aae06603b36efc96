use crate::model::ModelObject;
use crate::picking::{PickShape, Ray};

/// One interactable object.
#[derive(Clone, Debug)]
pub struct Trigger {
    pub id: String,
    pub shape: PickShape,
}

/// Nearest intersection found by [`TriggerRegistry::nearest_hit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerHit<'a> {
    pub id: &'a str,
    pub distance: f32,
}

/// Append-only list of interactable objects. Empty until the model loader
/// resolves, and possibly forever.
#[derive(Clone, Debug, Default)]
pub struct TriggerRegistry {
    triggers: Vec<Trigger>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, id: impl Into<String>, shape: PickShape) {
        let id = id.into();
        log::info!("[trigger] added {}", id);
        self.triggers.push(Trigger { id, shape });
    }

    /// Append every object whose name is on the allow-list. Returns how many
    /// were registered.
    pub fn append_matching<'a>(
        &mut self,
        objects: impl IntoIterator<Item = &'a ModelObject>,
        allow_list: &[String],
    ) -> usize {
        let mut added = 0;
        for obj in objects {
            if allow_list.iter().any(|n| *n == obj.name) {
                self.append(obj.name.clone(), obj.pick_shape());
                added += 1;
            }
        }
        added
    }

    /// Re-derive pick shapes of registered objects from their current pose.
    pub fn refresh<'a>(&mut self, objects: impl IntoIterator<Item = &'a ModelObject>) {
        for obj in objects {
            for trig in self.triggers.iter_mut().filter(|t| t.id == obj.name) {
                trig.shape = obj.pick_shape();
            }
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    /// Closest registered object along `ray`. Ties keep the earlier entry.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<TriggerHit<'_>> {
        let mut best: Option<TriggerHit<'_>> = None;
        for trig in &self.triggers {
            if let Some(t) = trig.shape.intersect(ray) {
                match best {
                    Some(b) if t >= b.distance => {}
                    _ => {
                        best = Some(TriggerHit {
                            id: &trig.id,
                            distance: t,
                        })
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn nearest_of_two_overlapping_objects_wins() {
        let mut reg = TriggerRegistry::new();
        reg.append("Far", PickShape::from_sphere(Vec3::new(0.0, 0.0, -20.0), 1.0));
        reg.append("Near", PickShape::from_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0));
        let hit = reg
            .nearest_hit(&Ray::new(Vec3::ZERO, Vec3::NEG_Z))
            .expect("hit");
        assert_eq!(hit.id, "Near");
        assert!((hit.distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn empty_registry_never_hits() {
        let reg = TriggerRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.nearest_hit(&Ray::new(Vec3::ZERO, Vec3::X)).is_none());
    }

    #[test]
    fn allow_list_filters_objects() {
        let objects = vec![
            ModelObject::with_sphere("Mars", Vec3::new(0.0, 0.0, -5.0), 1.0),
            ModelObject::with_sphere("Rock", Vec3::new(2.0, 0.0, -5.0), 1.0),
            ModelObject::with_sphere("Moon", Vec3::new(-2.0, 0.0, -5.0), 1.0),
        ];
        let allow = vec!["Mars".to_string(), "Moon".to_string()];
        let mut reg = TriggerRegistry::new();
        assert_eq!(reg.append_matching(&objects, &allow), 2);
        let ids: Vec<&str> = reg.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["Mars", "Moon"]);
    }

    #[test]
    fn refresh_follows_moved_objects() {
        let mut mars = ModelObject::with_sphere("Mars", Vec3::ZERO, 1.0);
        let mut reg = TriggerRegistry::new();
        reg.append_matching([&mars], &["Mars".to_string()]);
        let down_z = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(reg.nearest_hit(&down_z).is_some());

        mars.world = glam::Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let rock = ModelObject::with_sphere("Rock", Vec3::ZERO, 1.0);
        reg.refresh([&mars, &rock]);
        assert_eq!(reg.len(), 1);
        assert!(reg.nearest_hit(&down_z).is_none());
        let shifted = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z);
        assert_eq!(reg.nearest_hit(&shifted).map(|h| h.id), Some("Mars"));
    }
}
