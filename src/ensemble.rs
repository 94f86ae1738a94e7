use crate::error::{ValidationError, ValidationResult};
use crate::scoring::{ExpectedGoals, ModelPrediction, normalize_outcomes};

pub const DEFAULT_BLEND_WEIGHT: f64 = 0.5;

/// `weight_a * a + (1 - weight_a) * b` for every field, then the outcome triple is
/// renormalised. Weights outside [0, 1] are clamped; a non-finite weight uses the default.
pub fn blend(a: &ModelPrediction, b: &ModelPrediction, weight_a: f64) -> ModelPrediction {
    let w = if weight_a.is_finite() {
        weight_a.clamp(0.0, 1.0)
    } else {
        DEFAULT_BLEND_WEIGHT
    };
    let mix = |x: f64, y: f64| w * x + (1.0 - w) * y;

    let (home_win, draw, away_win) = normalize_outcomes(
        mix(a.home_win, b.home_win),
        mix(a.draw, b.draw),
        mix(a.away_win, b.away_win),
    );

    ModelPrediction {
        home_win,
        draw,
        away_win,
        btts: mix(a.btts, b.btts),
        over25: mix(a.over25, b.over25),
        expected_goals: ExpectedGoals {
            home: mix(a.expected_goals.home, b.expected_goals.home),
            away: mix(a.expected_goals.away, b.expected_goals.away),
        },
        confidence: mix(a.confidence, b.confidence),
    }
}

pub fn validate_weight(weight: f64) -> ValidationResult<f64> {
    if weight.is_finite() && (0.0..=1.0).contains(&weight) {
        Ok(weight)
    } else {
        Err(ValidationError::BlendWeightOutOfRange(weight))
    }
}
