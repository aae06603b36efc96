// Host-side tests that decode a real glTF document and drive picking,
// dispatch and animation against its geometry.

use glam::{Vec2, Vec3};
use panorama_core::*;
use std::time::Duration;

static PLANETS: &[u8] = include_bytes!("fixtures/planets.gltf");

fn planets() -> LoadedModel {
    LoadedModel::from_gltf_slice("planets.gltf", PLANETS).expect("fixture decodes")
}

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

fn first_world_triangle(model: &LoadedModel, name: &str) -> [Vec3; 3] {
    let (tri, _) = model
        .object(name)
        .and_then(|o| o.world_triangles().next())
        .expect("object has a triangle");
    tri
}

#[test]
fn objects_carry_their_world_transform() {
    let model = planets();
    let names: Vec<&str> = model.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Mars", "Rock", "Moon"]);
    // the empty Orbit parent is kept as a node
    assert_eq!(model.nodes.len(), 4);

    let mars = model.object("Mars").unwrap();
    assert_eq!(mars.primitives.len(), 1);
    // mesh data stays local
    assert!(close(mars.primitives[0].positions[0], Vec3::new(-1.0, -1.0, 0.0)));
    let p = first_world_triangle(&model, "Mars");
    assert!(close(p[0], Vec3::new(-1.0, 9.0, -5.0)));
    assert!(close(p[2], Vec3::new(0.0, 11.0, -5.0)));

    // parent translation, own translation and scale all apply
    let p = first_world_triangle(&model, "Moon");
    assert!(close(p[0], Vec3::new(-6.0, 8.0, -30.0)));
    assert!(close(p[1], Vec3::new(-2.0, 8.0, -30.0)));
    assert!(close(p[2], Vec3::new(-4.0, 12.0, -30.0)));
}

#[test]
fn unindexed_primitive_gets_sequential_indices() {
    let model = planets();
    let prim = &model.object("Rock").unwrap().primitives[0];
    assert_eq!(prim.indices, vec![0, 1, 2]);
    assert_eq!(prim.triangles().count(), 1);
}

#[test]
fn material_color_is_carried() {
    let model = planets();
    let c = model.object("Mars").unwrap().primitives[0].base_color;
    assert!((c[0] - 0.8).abs() < 1e-6);
    assert!((c[1] - 0.3).abs() < 1e-6);
    assert!((c[2] - 0.2).abs() < 1e-6);
    assert_eq!(c[3], 1.0);
}

#[test]
fn clip_channels_are_read() {
    let model = planets();
    assert_eq!(model.clips.len(), 1);
    let spin = &model.clips[0];
    assert_eq!(spin.name, "Spin");
    assert_eq!(spin.duration_sec, 2.5);
    assert_eq!(
        spin.channels,
        vec![Channel {
            node: 0,
            interpolation: Interpolation::Linear,
            times: vec![0.0, 2.5],
            keyframes: Keyframes::Translation(vec![
                Vec3::new(0.0, 10.0, -5.0),
                Vec3::new(2.0, 10.0, -5.0),
            ]),
        }]
    );
    let mixer = AnimationMixer::autoplay(&model.clips).unwrap();
    assert_eq!(mixer.actions().len(), 1);
}

struct StepClock(Duration);

impl Clock for StepClock {
    fn delta(&mut self) -> Duration {
        self.0
    }
}

struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _scene: &Scene, _camera: &Camera) -> anyhow::Result<()> {
        Ok(())
    }
}

#[test]
fn playing_clip_moves_mars() {
    let mut s = Session::new(
        SceneConfig::field(),
        Capability::detect("Mozilla/5.0 (X11; Linux x86_64)", false),
        Viewport::new(1280.0, 720.0),
    );
    s.start();
    s.on_model_loaded(planets());
    let before = first_world_triangle(&s.scene().models()[0], "Mars");
    let revision = s.scene().revision();

    let mut driver = FrameDriver::with_clock(StepClock(Duration::from_millis(600)));
    for _ in 0..3 {
        driver.tick(&mut s, &mut NullRenderer);
    }

    // 1.8s of 2.5s from x=0 to x=2
    let after = first_world_triangle(&s.scene().models()[0], "Mars");
    let shift = Vec3::new(1.44, 0.0, 0.0);
    assert!(close(after[0], before[0] + shift), "{:?}", after);
    assert!(s.scene().revision() > revision);
    // Moon is not animated
    let moon = first_world_triangle(&s.scene().models()[0], "Moon");
    assert!(close(moon[0], Vec3::new(-6.0, 8.0, -30.0)));

    let eye = Vec3::new(1.44, 10.0, 0.0);
    let hit = s
        .registry()
        .nearest_hit(&Ray::new(eye, Vec3::NEG_Z))
        .expect("Mars at its new pose");
    assert_eq!(hit.id, "Mars");
}

#[test]
fn garbage_bytes_fail_cleanly() {
    let err = LoadedModel::from_gltf_slice("bad.glb", b"not a model").unwrap_err();
    assert!(matches!(err, LoadError::Gltf(_)));
}

#[test]
fn allow_list_registers_only_named_objects() {
    let model = planets();
    let mut registry = TriggerRegistry::new();
    let added = registry.append_matching(&model.objects, &SceneConfig::field().trigger_names);
    assert_eq!(added, 2);
    let ids: Vec<&str> = registry.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["Mars", "Moon"]);
}

#[test]
fn nearest_trigger_wins_along_a_ray() {
    let model = planets();
    let mut registry = TriggerRegistry::new();
    registry.append_matching(&model.objects, &["Mars".to_string(), "Moon".to_string()]);

    let eye = Vec3::new(0.0, 10.0, 0.0);
    let hit = registry
        .nearest_hit(&Ray::new(eye, Vec3::NEG_Z))
        .expect("Mars straight ahead");
    assert_eq!(hit.id, "Mars");
    assert!((hit.distance - 5.0).abs() < 1e-4);

    let to_moon = Vec3::new(-4.0, 10.0, -30.0) - eye;
    let hit = registry.nearest_hit(&Ray::new(eye, to_moon)).unwrap();
    assert_eq!(hit.id, "Moon");

    // the bounding sphere of Mars covers this ray, its triangle does not
    let grazing = Vec3::new(0.9, 10.9, -5.0) - eye;
    assert!(registry.nearest_hit(&Ray::new(eye, grazing)).is_none());
}

#[test]
fn gyro_view_click_at_screen_center_navigates_to_mars() {
    let mut s = Session::new(
        SceneConfig::field(),
        Capability::detect("Mozilla/5.0 (Linux; Android 14; Pixel 8)", false),
        Viewport::new(400.0, 800.0),
    );
    s.start();
    s.on_model_loaded(planets());
    // upright phone facing north looks down -Z
    s.on_orientation(OrientationSample::new(0.0, 90.0, 0.0), 0.0);
    s.step_controls();

    let center = s.viewport().client_from_ndc(Vec2::ZERO);
    let fx = s.on_click(center.x, center.y);
    assert_eq!(fx.len(), 2);
    assert_eq!(
        s.on_timer(Timer::Navigation).to_vec(),
        vec![Effect::Navigate("Mars.html".into())]
    );
}
