use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AltarError, Result};

/// Top-level configuration structure for the altar.
///
/// Every section falls back to its defaults when omitted, so a JSON file only
/// needs to spell out the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltarConfig {
    pub lighting: LightingConfig,
    pub chant: ChantConfig,
    pub layout: LayoutConfig,
    pub prayer: PrayerConfig,
    pub controls: ControlsConfig,
}

impl AltarConfig {
    /// Line-list prayers edited in a composer, grid layout, reset available.
    pub fn composer_revision() -> Self {
        Self::default()
    }

    /// Free-text prayer typed straight into a textarea; grid layout.
    pub fn free_text_revision() -> Self {
        Self {
            prayer: PrayerConfig {
                mode: PrayerMode::FreeText,
            },
            controls: ControlsConfig {
                reset: true,
                composer: false,
                gate_lighting_while_chanting: true,
            },
            ..Self::default()
        }
    }

    /// Free-text prayer, sticks spread along a single band with jittered
    /// rotation, no reset control.
    pub fn arc_revision() -> Self {
        Self {
            chant: ChantConfig {
                duration_ms: 30_000,
                ..ChantConfig::default()
            },
            layout: LayoutConfig {
                policy: LayoutPolicy::Arc,
                ..LayoutConfig::default()
            },
            prayer: PrayerConfig {
                mode: PrayerMode::FreeText,
            },
            controls: ControlsConfig {
                reset: false,
                composer: false,
                gate_lighting_while_chanting: false,
            },
            ..Self::default()
        }
    }

    /// Reads a JSON configuration file and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lighting.animation_ms == 0 {
            return Err(AltarError::InvalidConfig(
                "lighting.animation_ms must be greater than zero",
            ));
        }
        if self.chant.duration_ms == 0 {
            return Err(AltarError::InvalidConfig(
                "chant.duration_ms must be greater than zero",
            ));
        }
        if self.layout.max_sticks == 0 {
            return Err(AltarError::InvalidConfig(
                "layout.max_sticks must be greater than zero",
            ));
        }
        if self.layout.grid.columns == 0 {
            return Err(AltarError::InvalidConfig(
                "layout.grid.columns must be greater than zero",
            ));
        }
        if self.layout.arc.jitter_degrees < 0.0 {
            return Err(AltarError::InvalidConfig(
                "layout.arc.jitter_degrees must not be negative",
            ));
        }
        Ok(())
    }
}

/// Timing of the one-at-a-time lighting animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub animation_ms: u64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self { animation_ms: 1_000 }
    }
}

/// What `StartChant` does while a chant is already running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChantReentry {
    /// Cancel the running countdown and start a fresh one.
    #[default]
    Restart,
    /// Keep the running countdown untouched.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChantConfig {
    pub duration_ms: u64,
    pub reentry: ChantReentry,
}

impl Default for ChantConfig {
    fn default() -> Self {
        Self {
            duration_ms: 60_000,
            reentry: ChantReentry::Restart,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPolicy {
    #[default]
    Grid,
    Arc,
}

/// How often the arc layout draws its rotation jitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterMode {
    /// One draw per stick index, stable across recomputations.
    #[default]
    PerStick,
    /// Fresh randomness on every recomputation.
    PerFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub max_sticks: usize,
    pub policy: LayoutPolicy,
    pub jitter: JitterMode,
    pub seed: u64,
    pub grid: GridConfig,
    pub arc: ArcConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_sticks: 32,
            policy: LayoutPolicy::Grid,
            jitter: JitterMode::PerStick,
            seed: 0x1a5e_a17a,
            grid: GridConfig::default(),
            arc: ArcConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: usize,
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub base_y: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 8,
            spacing_x: 14.0,
            spacing_y: 12.0,
            base_y: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcConfig {
    pub spacing: f32,
    pub base_y: f32,
    /// Rotation offsets are drawn from `[-jitter_degrees, jitter_degrees)`.
    pub jitter_degrees: f32,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            base_y: 12.0,
            jitter_degrees: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrayerMode {
    #[default]
    LineList,
    FreeText,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrayerConfig {
    pub mode: PrayerMode,
}

/// Which optional controls exist and whether chanting gates the light button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub reset: bool,
    pub composer: bool,
    pub gate_lighting_while_chanting: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            reset: true,
            composer: true,
            gate_lighting_while_chanting: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_composer_revision() {
        let config = AltarConfig::default();
        assert_eq!(config.lighting.animation_ms, 1_000);
        assert_eq!(config.chant.duration_ms, 60_000);
        assert_eq!(config.layout.max_sticks, 32);
        assert_eq!(config.layout.grid.columns, 8);
        assert_eq!(config.prayer.mode, PrayerMode::LineList);
        assert!(config.controls.composer);
        assert_eq!(config, AltarConfig::composer_revision());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AltarConfig::from_json(
            r#"{ "chant": { "duration_ms": 5000 }, "layout": { "policy": "arc" } }"#,
        )
        .unwrap();

        assert_eq!(config.chant.duration_ms, 5_000);
        assert_eq!(config.chant.reentry, ChantReentry::Restart);
        assert_eq!(config.layout.policy, LayoutPolicy::Arc);
        assert_eq!(config.layout.grid.spacing_x, 14.0);
        assert_eq!(config.lighting.animation_ms, 1_000);
    }

    #[test]
    fn rejects_zero_durations() {
        let err = AltarConfig::from_json(r#"{ "lighting": { "animation_ms": 0 } }"#).unwrap_err();
        assert!(matches!(err, AltarError::InvalidConfig(_)));
        assert!(format!("{err}").contains("animation_ms"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = AltarConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AltarError::Config(_)));
    }

    #[test]
    fn revision_presets_validate() {
        for config in [
            AltarConfig::composer_revision(),
            AltarConfig::free_text_revision(),
            AltarConfig::arc_revision(),
        ] {
            config.validate().unwrap();
        }
    }
}
