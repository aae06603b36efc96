//! Scene configuration and the renderable scene description.

use crate::constants::AMBIENT_INTENSITY;
use crate::model::LoadedModel;
use crate::navigation::NavigationMap;

/// What to do once the user grants sensor access through the consent control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrantPolicy {
    /// Reload the page; the next start finds the sensor live and activates
    /// device-orientation from the probe.
    #[default]
    Reload,
    /// Activate device-orientation in the running session.
    ActivateInPlace,
}

impl GrantPolicy {
    /// Page attribute value: `reload` or `in-place`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reload" => Some(GrantPolicy::Reload),
            "in-place" | "inplace" | "activate" => Some(GrantPolicy::ActivateInPlace),
            _ => None,
        }
    }
}

/// Everything that differs between scenes.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub name: String,
    pub background: String,
    pub model: Option<String>,
    pub navigation: NavigationMap,
    /// Object names registered as triggers when the model resolves.
    pub trigger_names: Vec<String>,
    pub grant_policy: GrantPolicy,
}

impl SceneConfig {
    /// Cloud field with the planet model; Mars and Moon lead to their pages.
    pub fn field() -> Self {
        let navigation = NavigationMap::new()
            .with("Mars", "Mars.html")
            .with("Moon", "Moon.html");
        Self {
            name: "field".into(),
            background: "./FieldWithClouds.png".into(),
            model: Some("./scene.glb".into()),
            trigger_names: navigation.ids(),
            navigation,
            grant_policy: GrantPolicy::default(),
        }
    }

    /// Martian surface, background only.
    pub fn mars() -> Self {
        Self {
            name: "mars".into(),
            background: "./Mars.png".into(),
            model: None,
            navigation: NavigationMap::new(),
            trigger_names: Vec::new(),
            grant_policy: GrantPolicy::default(),
        }
    }

    /// Look up a preset by name. Unknown names fall back to `None`.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "field" | "main" | "" => Some(Self::field()),
            "mars" => Some(Self::mars()),
            _ => None,
        }
    }

    /// Build the configuration a page asks for: a preset name plus optional
    /// overrides. Unknown presets and policies fall back to the defaults.
    pub fn resolve(
        preset: Option<&str>,
        background: Option<&str>,
        model: Option<&str>,
        grant_policy: Option<&str>,
    ) -> Self {
        let name = preset.unwrap_or_default();
        let mut cfg = Self::preset(name).unwrap_or_else(|| {
            log::warn!("[config] unknown scene {:?}, using field", name);
            Self::field()
        });
        if let Some(bg) = background {
            cfg = cfg.with_background(bg);
        }
        if let Some(m) = model {
            cfg = cfg.with_model(m);
        }
        match grant_policy.map(|g| (g, GrantPolicy::parse(g))) {
            Some((_, Some(policy))) => cfg = cfg.with_grant_policy(policy),
            Some((raw, None)) => log::warn!("[config] unknown grant policy {:?}", raw),
            None => {}
        }
        cfg
    }

    pub fn with_background(mut self, path: impl Into<String>) -> Self {
        self.background = path.into();
        self
    }

    /// Override the model; an empty path removes it.
    pub fn with_model(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.model = (!path.is_empty()).then_some(path);
        self
    }

    pub fn with_grant_policy(mut self, policy: GrantPolicy) -> Self {
        self.grant_policy = policy;
        self
    }
}

/// Renderable scene: background panorama plus merged models.
///
/// `revision` increments whenever content or pose changes so renderers can
/// upload lazily.
#[derive(Clone, Debug)]
pub struct Scene {
    pub background: String,
    pub ambient_intensity: f32,
    models: Vec<LoadedModel>,
    revision: u64,
}

impl Scene {
    pub fn new(background: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            ambient_intensity: AMBIENT_INTENSITY,
            models: Vec::new(),
            revision: 0,
        }
    }

    /// Returns the model's index for [`Scene::model_mut`].
    pub fn add_model(&mut self, model: LoadedModel) -> usize {
        self.models.push(model);
        self.revision += 1;
        self.models.len() - 1
    }

    pub fn models(&self) -> &[LoadedModel] {
        &self.models
    }

    /// Mutable access for re-posing. Call [`Scene::touch`] after changing it.
    pub fn model_mut(&mut self, index: usize) -> Option<&mut LoadedModel> {
        self.models.get_mut(index)
    }

    #[inline]
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
