//! Loaded model representation.
//!
//! Geometry stays in mesh space. Each object follows a node whose world
//! matrix is recomputed whenever animation re-poses the hierarchy, so
//! picking and drawing both see the current pose.

use crate::animation::{AnimationClip, Channel, Interpolation, Keyframes};
use crate::error::LoadError;
use crate::picking::{PickShape, Sphere};
use fnv::FnvHashMap;
use glam::{Mat4, Quat, Vec3};
use gltf::animation::util::ReadOutputs;

/// Translation, rotation, scale of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl NodeTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Node of the model hierarchy. Parents always precede their children.
#[derive(Clone, Debug)]
pub struct ModelNode {
    pub name: Option<String>,
    pub parent: Option<usize>,
    pub local: NodeTransform,
    pub world: Mat4,
}

impl ModelNode {
    pub fn new(name: Option<String>, parent: Option<usize>, local: NodeTransform) -> Self {
        Self {
            name,
            parent,
            local,
            world: local.matrix(),
        }
    }
}

/// One triangle list with a flat material color, in mesh space.
#[derive(Clone, Debug, Default)]
pub struct Primitive {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

impl Primitive {
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            Some([
                *self.positions.get(tri[0] as usize)?,
                *self.positions.get(tri[1] as usize)?,
                *self.positions.get(tri[2] as usize)?,
            ])
        })
    }
}

/// A named mesh node from the model.
#[derive(Clone, Debug)]
pub struct ModelObject {
    pub name: String,
    pub primitives: Vec<Primitive>,
    /// Node the object follows, if any.
    pub node: Option<usize>,
    pub world: Mat4,
    // used when the object has no triangles of its own
    proxy_bounds: Option<Sphere>,
}

impl ModelObject {
    pub fn new(name: impl Into<String>, primitives: Vec<Primitive>) -> Self {
        Self {
            name: name.into(),
            primitives,
            node: None,
            world: Mat4::IDENTITY,
            proxy_bounds: None,
        }
    }

    /// An object picked by a sphere only, with nothing to draw.
    pub fn with_sphere(name: impl Into<String>, center: Vec3, radius: f32) -> Self {
        Self {
            proxy_bounds: Some(Sphere { center, radius }),
            ..Self::new(name, Vec::new())
        }
    }

    /// Attach the object to a node of its model.
    pub fn on_node(mut self, node: usize) -> Self {
        self.node = Some(node);
        self
    }

    /// Triangles of every primitive in world space, with their color.
    pub fn world_triangles(&self) -> impl Iterator<Item = ([Vec3; 3], [f32; 4])> + '_ {
        let world = self.world;
        self.primitives.iter().flat_map(move |p| {
            p.triangles()
                .map(move |t| (t.map(|v| world.transform_point3(v)), p.base_color))
        })
    }

    pub fn pick_shape(&self) -> PickShape {
        let triangles: Vec<[Vec3; 3]> = self.world_triangles().map(|(t, _)| t).collect();
        if !triangles.is_empty() {
            return PickShape::from_triangles(triangles);
        }
        match self.proxy_bounds {
            Some(s) => {
                let (scale, _, _) = self.world.to_scale_rotation_translation();
                PickShape::from_sphere(
                    self.world.transform_point3(s.center),
                    s.radius * scale.abs().max_element(),
                )
            }
            None => PickShape::default(),
        }
    }
}

/// Everything the scene needs from a resolved model.
#[derive(Clone, Debug, Default)]
pub struct LoadedModel {
    pub source: String,
    pub nodes: Vec<ModelNode>,
    pub objects: Vec<ModelObject>,
    pub clips: Vec<AnimationClip>,
}

impl LoadedModel {
    /// Assemble a model and compute its world pose.
    pub fn from_parts(
        source: impl Into<String>,
        nodes: Vec<ModelNode>,
        objects: Vec<ModelObject>,
        clips: Vec<AnimationClip>,
    ) -> Self {
        let mut model = Self {
            source: source.into(),
            nodes,
            objects,
            clips,
        };
        model.update_world();
        model
    }

    /// Decode a `.glb` or self-contained `.gltf` byte slice.
    pub fn from_gltf_slice(source: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let (doc, buffers, _images) = gltf::import_slice(bytes)?;
        let scene = doc
            .default_scene()
            .or_else(|| doc.scenes().next())
            .ok_or(LoadError::NoScene)?;

        let mut walk = NodeWalk {
            buffers: &buffers,
            nodes: Vec::new(),
            objects: Vec::new(),
            index_of: FnvHashMap::default(),
        };
        for node in scene.nodes() {
            walk.visit(&node, None);
        }
        let clips = doc
            .animations()
            .map(|anim| read_clip(&anim, &buffers, &walk.index_of))
            .collect();

        Ok(Self::from_parts(source, walk.nodes, walk.objects, clips))
    }

    pub fn object(&self, name: &str) -> Option<&ModelObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Write one clip's channels at `t` seconds into the node transforms.
    /// World matrices are stale until [`LoadedModel::update_world`].
    pub fn apply_clip(&mut self, clip: usize, t: f32) -> bool {
        let Some(clip) = self.clips.get(clip) else {
            return false;
        };
        let mut posed = false;
        for ch in &clip.channels {
            if let Some(node) = self.nodes.get_mut(ch.node) {
                ch.apply(t, &mut node.local);
                posed = true;
            }
        }
        posed
    }

    /// Recompute world matrices down the hierarchy and move objects along.
    pub fn update_world(&mut self) {
        for i in 0..self.nodes.len() {
            let parent = self.nodes[i]
                .parent
                .filter(|&p| p < i)
                .map_or(Mat4::IDENTITY, |p| self.nodes[p].world);
            let node = &mut self.nodes[i];
            node.world = parent * node.local.matrix();
        }
        for obj in &mut self.objects {
            if let Some(node) = obj.node.and_then(|n| self.nodes.get(n)) {
                obj.world = node.world;
            }
        }
    }
}

struct NodeWalk<'a> {
    buffers: &'a [gltf::buffer::Data],
    nodes: Vec<ModelNode>,
    objects: Vec<ModelObject>,
    // glTF node index -> index into `nodes`
    index_of: FnvHashMap<usize, usize>,
}

impl NodeWalk<'_> {
    fn visit(&mut self, node: &gltf::Node<'_>, parent: Option<usize>) {
        let (t, r, s) = node.transform().decomposed();
        let local = NodeTransform {
            translation: Vec3::from_array(t),
            rotation: Quat::from_array(r),
            scale: Vec3::from_array(s),
        };
        let index = self.nodes.len();
        self.nodes
            .push(ModelNode::new(node.name().map(str::to_owned), parent, local));
        self.index_of.insert(node.index(), index);

        if let Some(mesh) = node.mesh() {
            let name = node.name().or_else(|| mesh.name()).unwrap_or_default();
            let primitives = mesh
                .primitives()
                .filter_map(|prim| read_primitive(&prim, self.buffers, name))
                .collect();
            self.objects
                .push(ModelObject::new(name, primitives).on_node(index));
        }
        for child in node.children() {
            self.visit(&child, Some(index));
        }
    }
}

fn read_primitive(
    prim: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
    name: &str,
) -> Option<Primitive> {
    if prim.mode() != gltf::mesh::Mode::Triangles {
        log::debug!("[load] skipping non-triangle primitive on {}", name);
        return None;
    }
    let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
    let positions: Vec<Vec3> = reader.read_positions()?.map(Vec3::from_array).collect();
    let indices: Vec<u32> = match reader.read_indices() {
        Some(ix) => ix.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let base_color = prim
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();
    Some(Primitive {
        positions,
        indices,
        base_color,
    })
}

fn read_clip(
    anim: &gltf::Animation<'_>,
    buffers: &[gltf::buffer::Data],
    index_of: &FnvHashMap<usize, usize>,
) -> AnimationClip {
    let name = anim
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("clip{}", anim.index()));
    let mut duration_sec = 0.0_f32;
    let mut channels = Vec::new();
    for ch in anim.channels() {
        let reader = ch.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(inputs) = reader.read_inputs() else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        duration_sec = times.iter().copied().fold(duration_sec, f32::max);

        let Some(&node) = index_of.get(&ch.target().node().index()) else {
            continue;
        };
        let keyframes = match reader.read_outputs() {
            Some(ReadOutputs::Translations(it)) => {
                Keyframes::Translation(it.map(Vec3::from_array).collect())
            }
            Some(ReadOutputs::Rotations(it)) => Keyframes::Rotation(
                it.into_f32()
                    .map(|q| Quat::from_array(q).normalize())
                    .collect(),
            ),
            Some(ReadOutputs::Scales(it)) => Keyframes::Scale(it.map(Vec3::from_array).collect()),
            // morph weights have nothing to act on here
            Some(ReadOutputs::MorphTargetWeights(_)) | None => continue,
        };
        let interpolation = match ch.sampler().interpolation() {
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };
        channels.push(Channel {
            node,
            interpolation,
            times,
            keyframes,
        });
    }
    AnimationClip {
        name,
        duration_sec,
        channels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangles_skip_out_of_range_indices() {
        let prim = Primitive {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            indices: vec![0, 1, 2, 0, 1, 9],
            base_color: [1.0; 4],
        };
        assert_eq!(prim.triangles().count(), 1);
    }

    #[test]
    fn sphere_object_picks_by_sphere() {
        let obj = ModelObject::with_sphere("Mars", Vec3::new(1.0, 2.0, 3.0), 0.5);
        let shape = obj.pick_shape();
        assert!(shape.triangles.is_empty());
        assert_eq!(shape.bounds.map(|s| s.center), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn sphere_object_follows_its_node() {
        let nodes = vec![
            ModelNode::new(None, None, NodeTransform::from_translation(Vec3::Z)),
            ModelNode::new(
                Some("Mars".into()),
                Some(0),
                NodeTransform {
                    scale: Vec3::splat(2.0),
                    ..NodeTransform::from_translation(Vec3::X)
                },
            ),
        ];
        let objects = vec![ModelObject::with_sphere("Mars", Vec3::ZERO, 0.5).on_node(1)];
        let model = LoadedModel::from_parts("m.glb", nodes, objects, Vec::new());
        let bounds = model.objects[0].pick_shape().bounds.unwrap();
        assert!((bounds.center - Vec3::new(1.0, 0.0, 1.0)).length() < 1e-5);
        assert!((bounds.radius - 1.0).abs() < 1e-5);
    }

    #[test]
    fn clip_moves_child_through_parent() {
        let nodes = vec![
            ModelNode::new(None, None, NodeTransform::IDENTITY),
            ModelNode::new(None, Some(0), NodeTransform::from_translation(Vec3::Y)),
        ];
        let clip = AnimationClip {
            name: "drift".into(),
            duration_sec: 1.0,
            channels: vec![Channel {
                node: 0,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 1.0],
                keyframes: Keyframes::Translation(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]),
            }],
        };
        let objects = vec![ModelObject::with_sphere("Moon", Vec3::ZERO, 1.0).on_node(1)];
        let mut model = LoadedModel::from_parts("m.glb", nodes, objects, vec![clip]);

        assert!(model.apply_clip(0, 0.5));
        model.update_world();
        let center = model.objects[0].pick_shape().bounds.unwrap().center;
        assert!((center - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-5);
        assert!(!model.apply_clip(7, 0.5));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = LoadedModel::from_gltf_slice("bad.glb", b"not a model").unwrap_err();
        assert!(matches!(err, LoadError::Gltf(_)));
    }
}
