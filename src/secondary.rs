use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::features::MatchupFeatures;
use crate::scoring::{
    ExpectedGoals, ModelPrediction, ScoringParams, TeamInputs, clamp, confidence, expected_goals,
    normalize_outcomes,
};

const MAX_GOALS: u32 = 10;
// Pseudo-matches added to each h2h outcome bucket.
const H2H_PRIOR: f64 = 1.0;

/// The model blended against the primary formula run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryModel {
    #[default]
    HeadToHead,
    Poisson,
}

impl SecondaryModel {
    pub fn name(self) -> &'static str {
        match self {
            SecondaryModel::HeadToHead => "head_to_head",
            SecondaryModel::Poisson => "poisson",
        }
    }

    pub fn score(self, features: &MatchupFeatures, params: &ScoringParams) -> ModelPrediction {
        match self {
            SecondaryModel::HeadToHead => score_head_to_head(features, params),
            SecondaryModel::Poisson => score_poisson(features, params),
        }
    }
}

impl fmt::Display for SecondaryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SecondaryModel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "head_to_head" | "h2h" => Ok(SecondaryModel::HeadToHead),
            "poisson" => Ok(SecondaryModel::Poisson),
            other => Err(anyhow!("unknown secondary model: {other}")),
        }
    }
}

/// Outcome split of the shared history, smoothed toward uniform so a thin record
/// cannot produce certainties.
pub fn score_head_to_head(features: &MatchupFeatures, params: &ScoringParams) -> ModelPrediction {
    let h2h = &features.head_to_head;
    let n = h2h.total_matches as f64;
    let den = n + 3.0 * H2H_PRIOR;

    let (home_win, draw, away_win) = normalize_outcomes(
        (h2h.team_a_wins as f64 + H2H_PRIOR) / den,
        (h2h.draws as f64 + H2H_PRIOR) / den,
        (h2h.team_b_wins as f64 + H2H_PRIOR) / den,
    );

    let neutral = params.neutral.ratio;
    let smooth = |count: u32, total: u32| (count as f64 + 2.0 * neutral) / (total as f64 + 2.0);

    let expected_goals = if h2h.total_matches > 0 {
        ExpectedGoals {
            home: h2h.team_a_goals.mean().max(params.min_expected_goals),
            away: h2h.team_b_goals.mean().max(params.min_expected_goals),
        }
    } else {
        let home = TeamInputs::resolve(&features.home, &params.neutral);
        let away = TeamInputs::resolve(&features.away, &params.neutral);
        expected_goals(&home, &away, params)
    };

    ModelPrediction {
        home_win,
        draw,
        away_win,
        btts: params.btts_bounds.clamp(smooth(h2h.btts.count, h2h.btts.total)),
        over25: params
            .over25_bounds
            .clamp(smooth(h2h.over25.count, h2h.over25.total)),
        expected_goals,
        confidence: confidence(features, params, None),
    }
}

/// Independent Poisson scorelines from the variant's expected goals.
pub fn score_poisson(features: &MatchupFeatures, params: &ScoringParams) -> ModelPrediction {
    let home = TeamInputs::resolve(&features.home, &params.neutral);
    let away = TeamInputs::resolve(&features.away, &params.neutral);
    let xg = expected_goals(&home, &away, params);

    let (home_win, draw, away_win) = outcome_probs_poisson(xg.home, xg.away, MAX_GOALS);

    let btts = (1.0 - (-xg.home).exp()) * (1.0 - (-xg.away).exp());
    let total = poisson_pmf(xg.home + xg.away, MAX_GOALS);
    let under = total.iter().take(3).sum::<f64>();

    ModelPrediction {
        home_win,
        draw,
        away_win,
        btts: clamp(btts, 0.0, 1.0),
        over25: clamp(1.0 - under, 0.0, 1.0),
        expected_goals: xg,
        confidence: confidence(features, params, None),
    }
}

pub fn outcome_probs_poisson(lambda_home: f64, lambda_away: f64, max_goals: u32) -> (f64, f64, f64) {
    let pmf_h = poisson_pmf(lambda_home, max_goals);
    let pmf_a = poisson_pmf(lambda_away, max_goals);

    let mut p_home = 0.0;
    let mut p_draw = 0.0;
    let mut p_away = 0.0;

    for (i, p_i) in pmf_h.iter().enumerate() {
        for (j, p_j) in pmf_a.iter().enumerate() {
            let p = p_i * p_j;
            if i > j {
                p_home += p;
            } else if i < j {
                p_away += p;
            } else {
                p_draw += p;
            }
        }
    }

    normalize_outcomes(p_home, p_draw, p_away)
}

/// Probabilities for 0..=max_k goals; the tail mass is folded into the last bucket.
pub fn poisson_pmf(lambda: f64, max_k: u32) -> Vec<f64> {
    let max_k = max_k as usize;
    let mut out = vec![0.0; max_k + 1];
    let lambda = lambda.max(0.0);

    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }

    let sum: f64 = out.iter().sum();
    if sum < 1.0 {
        out[max_k] += 1.0 - sum;
    }
    out
}
