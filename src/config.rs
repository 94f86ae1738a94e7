use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::ensemble::{DEFAULT_BLEND_WEIGHT, validate_weight};
use crate::error::ValidationResult;
use crate::features::FeatureWindows;
use crate::scoring::{ScoringParams, ScoringVariant};
use crate::secondary::SecondaryModel;

const MAX_WINDOW: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub variant: ScoringVariant,
    pub secondary: SecondaryModel,
    /// Weight of the primary formula run when blending with the secondary model.
    pub blend_weight: f64,
    pub windows: FeatureWindows,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            variant: ScoringVariant::default(),
            secondary: SecondaryModel::default(),
            blend_weight: DEFAULT_BLEND_WEIGHT,
            windows: FeatureWindows::default(),
        }
    }
}

impl ModelConfig {
    /// Optional JSON file first, then `MATCHSTATS_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("read config {}", path.display()))?;
                serde_json::from_str::<ModelConfig>(&raw)
                    .with_context(|| format!("parse config {}", path.display()))?
            }
            None => ModelConfig::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = parse_var::<ScoringVariant>(&lookup, "MATCHSTATS_VARIANT") {
            self.variant = v;
        }
        if let Some(v) = parse_var::<SecondaryModel>(&lookup, "MATCHSTATS_SECONDARY") {
            self.secondary = v;
        }
        if let Some(v) = parse_var::<f64>(&lookup, "MATCHSTATS_BLEND_WEIGHT") {
            self.blend_weight = if v.is_finite() {
                v.clamp(0.0, 1.0)
            } else {
                DEFAULT_BLEND_WEIGHT
            };
        }

        let w = &mut self.windows;
        for (key, slot) in [
            ("MATCHSTATS_FORM_WINDOW", &mut w.form),
            ("MATCHSTATS_GOALS_WINDOW", &mut w.goals),
            ("MATCHSTATS_RATIO_WINDOW", &mut w.ratios),
            ("MATCHSTATS_EVENT_WINDOW", &mut w.events),
            ("MATCHSTATS_H2H_WINDOW", &mut w.head_to_head),
        ] {
            if let Some(v) = parse_var::<usize>(&lookup, key) {
                *slot = v.clamp(1, MAX_WINDOW);
            }
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_weight(self.blend_weight)?;
        self.windows.validate()
    }

    pub fn scoring_params(&self) -> ScoringParams {
        self.variant.params()
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {key}={trimmed:?}: not a valid value");
            None
        }
    }
}
