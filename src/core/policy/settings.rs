//=========================================================================
// Policy Settings
//=========================================================================
//
// Aggregate of the global debug switch and the configured policy
// modules, plus the lazily built kind → module lookup table.
//
// The table is built on the first lookup and cleared by every edit, so
// the next lookup rebuilds it from the current module list. Later
// modules of the same kind overwrite earlier ones.
//
// Edits require `&mut self`; a settings value shared with a running
// transition (behind `Rc`) is therefore a read-only snapshot.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::{ModuleKind, PolicyModule, PolicyModuleKind, SceneDebugPolicy, SceneRef};
use crate::core::error::ConfigError;

//=== PolicySettings ======================================================

/// One debug profile: global switch plus its policy modules.
///
/// # Example
///
/// ```rust
/// # use scene_conductor::core::policy::{PolicySettings, SceneDebugPolicy};
/// let settings = PolicySettings::from_ron_str(r#"(
///     global_enabled: true,
///     modules: [
///         Scene((start_mode: Designated, designated_scene_name: "Arena")),
///     ],
/// )"#).unwrap();
///
/// let scene = settings.module::<SceneDebugPolicy>().unwrap();
/// assert_eq!(scene.designated_scene_name, "Arena");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    global_enabled: bool,

    /// Display-only flag for authoring overlays; never consulted by transitions.
    show_overlay: bool,

    modules: Vec<PolicyModule>,

    #[serde(skip)]
    lookup: RefCell<HashMap<ModuleKind, usize>>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            global_enabled: true,
            show_overlay: true,
            modules: Vec::new(),
            lookup: RefCell::new(HashMap::new()),
        }
    }
}

impl PolicySettings {
    //--- Construction -----------------------------------------------------

    pub fn new(global_enabled: bool) -> Self {
        Self {
            global_enabled,
            ..Self::default()
        }
    }

    /// Settings with the global switch off and no modules.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Parses a profile from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = ron::from_str(source)?;
        debug!(
            "Loaded policy settings: global={}, {} module(s)",
            settings.global_enabled,
            settings.modules.len()
        );
        Ok(settings)
    }

    /// Appends a module, builder style.
    pub fn with_module(mut self, module: impl Into<PolicyModule>) -> Self {
        self.push_module(module);
        self
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_globally_enabled(&self) -> bool {
        self.global_enabled
    }

    pub fn show_overlay(&self) -> bool {
        self.show_overlay
    }

    pub fn modules(&self) -> &[PolicyModule] {
        &self.modules
    }

    /// Returns the registered module of type `K`, if any.
    ///
    /// Builds the lookup table on first use.
    pub fn module<K: PolicyModuleKind>(&self) -> Option<&K> {
        self.ensure_lookup();
        let index = *self.lookup.borrow().get(&K::KIND)?;
        self.modules.get(index).and_then(K::from_module)
    }

    /// Start scene override for authoring-tool play sessions.
    ///
    /// Consults registration only; the global and per-module switches do
    /// not apply here.
    pub fn play_mode_start_scene(&self) -> Option<&SceneRef> {
        self.module::<SceneDebugPolicy>()
            .filter(|policy| policy.auto_load_master_scene)
            .and_then(|policy| policy.master_scene.as_ref())
    }

    //--- Edits ------------------------------------------------------------

    pub fn set_global_enabled(&mut self, enabled: bool) {
        self.global_enabled = enabled;
    }

    pub fn set_show_overlay(&mut self, show: bool) {
        self.show_overlay = show;
    }

    pub fn push_module(&mut self, module: impl Into<PolicyModule>) {
        self.modules.push(module.into());
        self.invalidate();
    }

    /// Replaces the whole module list (e.g. after copying a profile).
    pub fn reassign_modules(&mut self, modules: Vec<PolicyModule>) {
        self.modules = modules;
        self.invalidate();
    }

    /// Applies an arbitrary edit to the module list.
    pub fn edit_modules<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Vec<PolicyModule>),
    {
        edit(&mut self.modules);
        self.invalidate();
    }

    //--- Internal Helpers -------------------------------------------------

    fn invalidate(&mut self) {
        self.lookup.get_mut().clear();
    }

    fn ensure_lookup(&self) {
        let mut lookup = self.lookup.borrow_mut();
        if !lookup.is_empty() || self.modules.is_empty() {
            return;
        }

        for (index, module) in self.modules.iter().enumerate() {
            if lookup.insert(module.kind(), index).is_some() {
                warn!(
                    "Duplicate {} module at index {}, replacing the earlier one",
                    module.name(),
                    index
                );
            }
        }
    }
}

//=== Tests ===============================================================
