//=========================================================================
// Scene Transition Config
//=========================================================================
//
// Essential scene list, fade timings, and per-scene requirement
// metadata. Loaded from RON or built programmatically.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::error::ConfigError;

//=== SceneRequirement ====================================================

/// Data a scene expects to be available once it lands.
///
/// Transitions never act on it; the landing scene's entry is handed to
/// [`TransitionHooks::before_reveal`](super::TransitionHooks::before_reveal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SceneRequirement {
    pub needs_user_data: bool,
    pub needs_master_data: bool,
}

//=== SceneTransitionConfig ===============================================

/// Static configuration shared by every transition.
///
/// # Default Values
///
/// - **essential_scenes**: empty
/// - **fade_out_duration**: 0.5 seconds
/// - **fade_in_duration**: 0.5 seconds
///
/// # Example
///
/// ```rust
/// # use scene_conductor::core::scene::SceneTransitionConfig;
/// let config = SceneTransitionConfig::from_ron_str(r#"(
///     essential_scenes: ["Master", "Lobby"],
///     fade_out_duration: 0.25,
///     requirements: { "Game": (needs_user_data: true) },
/// )"#).unwrap();
///
/// assert_eq!(config.master_scene(), Some("Master"));
/// assert!(config.requirement("Game").unwrap().needs_user_data);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneTransitionConfig {
    /// Always loaded first, in this order. Index 0 is the master scene.
    pub essential_scenes: Vec<String>,

    /// Seconds.
    pub fade_out_duration: f32,

    /// Seconds.
    pub fade_in_duration: f32,

    pub requirements: BTreeMap<String, SceneRequirement>,
}

impl Default for SceneTransitionConfig {
    fn default() -> Self {
        Self {
            essential_scenes: Vec::new(),
            fade_out_duration: 0.5,
            fade_in_duration: 0.5,
            requirements: BTreeMap::new(),
        }
    }
}

impl SceneTransitionConfig {
    //--- Construction -----------------------------------------------------

    /// Parses and validates a config from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        debug!(
            "Loaded transition config: {} essential scene(s), fade {}s/{}s",
            config.essential_scenes.len(),
            config.fade_out_duration,
            config.fade_in_duration
        );
        Ok(config)
    }

    pub fn with_essential_scenes<I, S>(mut self, scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.essential_scenes = scenes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fade_durations(mut self, fade_out: f32, fade_in: f32) -> Self {
        self.fade_out_duration = fade_out;
        self.fade_in_duration = fade_in;
        self
    }

    pub fn with_requirement(mut self, scene: impl Into<String>, requirement: SceneRequirement) -> Self {
        self.requirements.insert(scene.into(), requirement);
        self
    }

    //--- Validation -------------------------------------------------------

    /// Fade durations must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (label, value) in [
            ("fade_out_duration", self.fade_out_duration),
            ("fade_in_duration", self.fade_in_duration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{label} must be a non-negative number of seconds, got {value}"
                )));
            }
        }
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    /// First essential scene, loaded exclusively on cold start.
    pub fn master_scene(&self) -> Option<&str> {
        self.essential_scenes.first().map(String::as_str)
    }

    pub fn requirement(&self, scene: &str) -> Option<&SceneRequirement> {
        self.requirements.get(scene)
    }

    /// Invalid durations clamp to zero.
    pub fn fade_out(&self) -> Duration {
        Duration::try_from_secs_f32(self.fade_out_duration).unwrap_or(Duration::ZERO)
    }

    /// Invalid durations clamp to zero.
    pub fn fade_in(&self) -> Duration {
        Duration::try_from_secs_f32(self.fade_in_duration).unwrap_or(Duration::ZERO)
    }
}

//=== Tests ===============================================================
