//=========================================================================
// Debug Policy
//=========================================================================
//
// Independently switchable configuration blocks that alter how scene
// transitions behave (landing scene, extra scenes to load).
//
// Architecture:
//   PolicyGate
//     └─ settings: Rc<PolicySettings>
//          ├─ global_enabled
//          ├─ modules: Vec<PolicyModule>
//          └─ lookup: ModuleKind → index (lazy, cleared on edit)
//
// Flow:
//   gate.is_active::<K>()  → global switch → lookup → module.enabled
//   gate.settings::<K>()   → lookup → registered module | K::default()
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::Deserialize;

//=== Module Declarations =================================================

mod gate;
mod scene_policy;
mod settings;

//=== Public API ==========================================================

pub use gate::PolicyGate;
pub use scene_policy::{SceneDebugPolicy, SceneRef, StartMode};
pub use settings::PolicySettings;

//=== ModuleKind ==========================================================

/// Closed set of policy module kinds.
///
/// Used as the key of the settings lookup table; at most one module per
/// kind is visible to lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Scene,
}

//=== PolicyModule ========================================================

/// A configured policy module as stored in [`PolicySettings`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum PolicyModule {
    Scene(SceneDebugPolicy),
}

impl PolicyModule {
    pub fn kind(&self) -> ModuleKind {
        match self {
            PolicyModule::Scene(_) => ModuleKind::Scene,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PolicyModule::Scene(_) => "SceneDebugPolicy",
        }
    }

    /// The module's own switch, independent of the global one.
    pub fn is_enabled(&self) -> bool {
        match self {
            PolicyModule::Scene(policy) => policy.enabled,
        }
    }
}

impl From<SceneDebugPolicy> for PolicyModule {
    fn from(policy: SceneDebugPolicy) -> Self {
        PolicyModule::Scene(policy)
    }
}

//=== PolicyModuleKind Trait ==============================================

/// Typed view over one [`PolicyModule`] variant.
///
/// Lets callers write `gate.is_active::<SceneDebugPolicy>()` while the
/// registry itself stays keyed by the closed [`ModuleKind`] enum.
pub trait PolicyModuleKind: Default + Clone + 'static {
    /// Registry key for this module type.
    const KIND: ModuleKind;

    /// Borrows the typed module out of a stored variant.
    fn from_module(module: &PolicyModule) -> Option<&Self>;

    fn is_enabled(&self) -> bool;
}
