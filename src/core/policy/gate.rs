//=========================================================================
// Policy Gate
//=========================================================================
//
// Answers "is policy module K active" and hands out module settings.
//
// A missing module is never an error: `is_active` reports false and
// `settings` returns a fresh default-valued module, so callers never
// branch on absence.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::borrow::Cow;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{PolicyModuleKind, PolicySettings};

//=== PolicyGate ==========================================================

/// Read-only decision point over a shared [`PolicySettings`] snapshot.
#[derive(Debug, Clone)]
pub struct PolicyGate {
    settings: Rc<PolicySettings>,
}

impl PolicyGate {
    pub fn new(settings: PolicySettings) -> Self {
        Self::from_shared(Rc::new(settings))
    }

    pub fn from_shared(settings: Rc<PolicySettings>) -> Self {
        Self { settings }
    }

    /// A gate for which every module is inactive.
    pub fn disabled() -> Self {
        Self::new(PolicySettings::disabled())
    }

    pub fn policy_settings(&self) -> &PolicySettings {
        &self.settings
    }

    /// True only when the global switch is on, a module of kind `K` is
    /// registered, and that module is enabled.
    pub fn is_active<K: PolicyModuleKind>(&self) -> bool {
        if !self.settings.is_globally_enabled() {
            return false;
        }

        self.settings.module::<K>().map_or(false, K::is_enabled)
    }

    /// Returns the registered module of kind `K`, or a fresh default.
    ///
    /// The default is neither registered nor cached; every call without a
    /// registered module constructs a new one.
    pub fn settings<K: PolicyModuleKind>(&self) -> Cow<'_, K> {
        match self.settings.module::<K>() {
            Some(module) => Cow::Borrowed(module),
            None => Cow::Owned(K::default()),
        }
    }
}

impl Default for PolicyGate {
    fn default() -> Self {
        Self::new(PolicySettings::default())
    }
}

//=== Tests ===============================================================
