use std::ops::RangeInclusive;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{gpu, EffectMode};

/// Runtime-adjustable tunables of the effect.
///
/// Read by [`crate::MotionBlur`] at dispatch time; hosts (e.g. a debug UI)
/// change them between frames through the setters, which clamp every value
/// into its documented range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EffectConfigRepr", into = "EffectConfigRepr")]
pub struct EffectConfig {
    motion_blur_enabled: bool,
    temporal_aa_enabled: bool,
    max_sample_count: u32,
    step_size: f32,
    temporal_blend_factor: f32,
}

impl EffectConfig {
    pub const MAX_SAMPLE_COUNT: RangeInclusive<u32> = 2..=32;
    pub const STEP_SIZE: RangeInclusive<f32> = 1.0..=8.0;
    pub const TEMPORAL_BLEND_FACTOR: RangeInclusive<f32> = 0.0..=1.0;

    pub fn motion_blur_enabled(&self) -> bool {
        self.motion_blur_enabled
    }

    pub fn temporal_aa_enabled(&self) -> bool {
        self.temporal_aa_enabled
    }

    /// Maximum number of taps the final blur pass takes in each direction.
    pub fn max_sample_count(&self) -> u32 {
        self.max_sample_count
    }

    /// Spacing between the blur taps, in pixels.
    pub fn step_size(&self) -> f32 {
        self.step_size
    }

    /// Maximum contribution the previous frame's history may have in the
    /// temporal blend.
    pub fn temporal_blend_factor(&self) -> f32 {
        self.temporal_blend_factor
    }

    pub fn mode(&self) -> EffectMode {
        EffectMode::select(self.motion_blur_enabled, self.temporal_aa_enabled)
    }

    pub fn set_motion_blur_enabled(&mut self, enabled: bool) -> &mut Self {
        self.motion_blur_enabled = enabled;
        self
    }

    pub fn set_temporal_aa_enabled(&mut self, enabled: bool) -> &mut Self {
        self.temporal_aa_enabled = enabled;
        self
    }

    pub fn set_max_sample_count(&mut self, count: i64) -> &mut Self {
        let (min, max) = Self::MAX_SAMPLE_COUNT.into_inner();

        self.max_sample_count = count.clamp(min as i64, max as i64) as u32;
        self
    }

    pub fn set_step_size(&mut self, step_size: f32) -> &mut Self {
        if let Some(step_size) = clamp(step_size, Self::STEP_SIZE) {
            self.step_size = step_size;
        } else {
            warn!("Ignoring invalid step size: {step_size}");
        }

        self
    }

    pub fn set_temporal_blend_factor(&mut self, factor: f32) -> &mut Self {
        if let Some(factor) = clamp(factor, Self::TEMPORAL_BLEND_FACTOR) {
            self.temporal_blend_factor = factor;
        } else {
            warn!("Ignoring invalid temporal blend factor: {factor}");
        }

        self
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            motion_blur_enabled: false,
            temporal_aa_enabled: false,
            max_sample_count: 10,
            step_size: 4.0,
            temporal_blend_factor: gpu::DEFAULT_TEMPORAL_BLEND,
        }
    }
}

fn clamp(value: f32, range: RangeInclusive<f32>) -> Option<f32> {
    if value.is_nan() {
        None
    } else {
        Some(value.clamp(*range.start(), *range.end()))
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be a number, got {value}")]
    NotANumber { field: &'static str, value: f32 },
}

/// Serialized form of [`EffectConfig`]; values are clamped on the way in.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct EffectConfigRepr {
    motion_blur_enabled: bool,
    temporal_aa_enabled: bool,
    max_sample_count: i64,
    step_size: f32,
    temporal_blend_factor: f32,
}

impl Default for EffectConfigRepr {
    fn default() -> Self {
        EffectConfig::default().into()
    }
}

impl TryFrom<EffectConfigRepr> for EffectConfig {
    type Error = ConfigError;

    fn try_from(repr: EffectConfigRepr) -> Result<Self, Self::Error> {
        for (field, value) in [
            ("step_size", repr.step_size),
            ("temporal_blend_factor", repr.temporal_blend_factor),
        ] {
            if value.is_nan() {
                return Err(ConfigError::NotANumber { field, value });
            }
        }

        let mut config = Self::default();

        config
            .set_motion_blur_enabled(repr.motion_blur_enabled)
            .set_temporal_aa_enabled(repr.temporal_aa_enabled)
            .set_max_sample_count(repr.max_sample_count)
            .set_step_size(repr.step_size)
            .set_temporal_blend_factor(repr.temporal_blend_factor);

        Ok(config)
    }
}

impl From<EffectConfig> for EffectConfigRepr {
    fn from(config: EffectConfig) -> Self {
        Self {
            motion_blur_enabled: config.motion_blur_enabled,
            temporal_aa_enabled: config.temporal_aa_enabled,
            max_sample_count: config.max_sample_count as i64,
            step_size: config.step_size,
            temporal_blend_factor: config.temporal_blend_factor,
        }
    }
}
