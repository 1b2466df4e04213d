//=========================================================================
// Scene Debug Policy
//=========================================================================
//
// Policy module that overrides the landing scene and injects extra
// scenes into every transition while debugging.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::{ModuleKind, PolicyModule, PolicyModuleKind};

//=== StartMode ===========================================================

/// How the landing scene is chosen while the policy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum StartMode {
    /// Use the caller's target (or the fallback scene).
    #[default]
    Default,

    /// Land on `designated_scene_name` when it is non-empty.
    Designated,

    /// Land on the scene currently open in the authoring tool.
    Current,
}

//=== SceneRef ============================================================

/// Reference to a scene asset by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct SceneRef(String);

impl SceneRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

//=== SceneDebugPolicy ====================================================

/// Scene-related debug overrides.
///
/// Omitted fields take their default values when loaded from RON, so a
/// profile only needs to spell out what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SceneDebugPolicy {
    pub enabled: bool,

    /// Start play sessions from `master_scene` in the authoring tool.
    pub auto_load_master_scene: bool,
    pub master_scene: Option<SceneRef>,

    pub start_mode: StartMode,
    pub designated_scene_name: String,

    /// Loaded after the essential scenes on every transition, in order.
    pub required_scene_names: Vec<String>,
}

impl Default for SceneDebugPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_load_master_scene: false,
            master_scene: None,
            start_mode: StartMode::Default,
            designated_scene_name: String::new(),
            required_scene_names: Vec::new(),
        }
    }
}

impl SceneDebugPolicy {
    //--- Builders ---------------------------------------------------------

    pub fn designated(scene: impl Into<String>) -> Self {
        Self {
            start_mode: StartMode::Designated,
            designated_scene_name: scene.into(),
            ..Self::default()
        }
    }

    pub fn with_start_mode(mut self, mode: StartMode) -> Self {
        self.start_mode = mode;
        self
    }

    pub fn with_required_scenes<I, S>(mut self, scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_scene_names = scenes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_master_scene(mut self, scene: SceneRef, auto_load: bool) -> Self {
        self.master_scene = Some(scene);
        self.auto_load_master_scene = auto_load;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl PolicyModuleKind for SceneDebugPolicy {
    const KIND: ModuleKind = ModuleKind::Scene;

    fn from_module(module: &PolicyModule) -> Option<&Self> {
        match module {
            PolicyModule::Scene(policy) => Some(policy),
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_enabled_with_default_mode() {
        let policy = SceneDebugPolicy::default();
        assert!(policy.enabled);
        assert!(!policy.auto_load_master_scene);
        assert_eq!(policy.start_mode, StartMode::Default);
        assert!(policy.designated_scene_name.is_empty());
        assert!(policy.required_scene_names.is_empty());
    }

    #[test]
    fn designated_builder_sets_mode_and_name() {
        let policy = SceneDebugPolicy::designated("Bar").with_required_scenes(["DebugHUD"]);
        assert_eq!(policy.start_mode, StartMode::Designated);
        assert_eq!(policy.designated_scene_name, "Bar");
        assert_eq!(policy.required_scene_names, vec!["DebugHUD".to_string()]);
    }

    #[test]
    fn partial_ron_fills_defaults() {
        let policy: SceneDebugPolicy =
            ron::from_str(r#"(start_mode: Current, master_scene: Some("Master"))"#).unwrap();
        assert!(policy.enabled);
        assert_eq!(policy.start_mode, StartMode::Current);
        assert_eq!(policy.master_scene.as_ref().map(SceneRef::name), Some("Master"));
    }
}
