use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    choreography::{DEFAULT_DANCE_STEP_SECONDS, DEFAULT_MOVE_SECONDS},
    stage::{default_roster, DancerSpawn, StageBounds},
    Result,
};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub editor: EditorConfig,
    pub preview: PreviewConfig,
    pub stage: StageConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing sections fall back to defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Defaults applied by the "add block" entry paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub dance_step_seconds: f32,
    pub move_seconds: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            dance_step_seconds: DEFAULT_DANCE_STEP_SECONDS,
            move_seconds: DEFAULT_MOVE_SECONDS,
        }
    }
}

/// Headless preview settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub frame_rate: u32,
    /// Extra time simulated after the longest choreography should have ended.
    pub settle_seconds: f64,
}

impl PreviewConfig {
    pub fn frame_seconds(&self) -> f64 {
        1.0 / f64::from(self.frame_rate.max(1))
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            settle_seconds: 0.5,
        }
    }
}

/// Stage floor and the dancers standing on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub width: f32,
    pub depth: f32,
    pub roster: Vec<DancerSpawn>,
}

impl StageConfig {
    pub fn bounds(&self) -> StageBounds {
        StageBounds::new(self.width, self.depth)
    }

    pub fn dancer_ids(&self) -> impl Iterator<Item = &str> {
        self.roster.iter().map(|spawn| spawn.id.as_str())
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        let bounds = StageBounds::default();
        Self {
            width: bounds.width,
            depth: bounds.depth,
            roster: default_roster(),
        }
    }
}
