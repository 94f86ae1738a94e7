use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::features::{HeadToHead, MatchupFeatures, TeamFeatures};

/// Named formula sets. Each carries its own constants and confidence bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringVariant {
    /// Form-adjusted expected goals, confidence in [0.30, 0.95].
    #[default]
    Statistical,
    /// Poisson-ratio expected goals, confidence in [0.10, 0.95].
    Heuristic,
}

impl ScoringVariant {
    pub fn name(self) -> &'static str {
        match self {
            ScoringVariant::Statistical => "statistical",
            ScoringVariant::Heuristic => "heuristic",
        }
    }

    pub fn params(self) -> ScoringParams {
        match self {
            ScoringVariant::Statistical => ScoringParams::statistical(),
            ScoringVariant::Heuristic => ScoringParams::heuristic(),
        }
    }
}

impl fmt::Display for ScoringVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoringVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "statistical" | "stats" => Ok(ScoringVariant::Statistical),
            "heuristic" | "mock" => Ok(ScoringVariant::Heuristic),
            other => Err(anyhow!("unknown scoring variant: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lo: f64,
    pub hi: f64,
}

impl Bounds {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn clamp(&self, v: f64) -> f64 {
        clamp(v, self.lo, self.hi)
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.lo && v <= self.hi
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ExpectedGoalsStrategy {
    /// `avg_scored * (1 + (form - 0.5)) + comeback bonus - blown lead malus`.
    FormAdjusted {
        comeback_bonus: f64,
        blown_lead_malus: f64,
    },
    /// `avg_scored * factor`, with a separate factor per side.
    PoissonRatio { home_factor: f64, away_factor: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceParams {
    pub base: f64,
    pub coverage_weight: f64,
    pub coverage_matches: f64,
    pub agreement_weight: f64,
    pub h2h_bonus_per_match: f64,
    pub h2h_bonus_cap: f64,
    pub bounds: Bounds,
}

/// Stand-ins used when a team has no history at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeutralDefaults {
    pub form: f64,
    pub ratio: f64,
    pub avg_goals: f64,
}

impl Default for NeutralDefaults {
    fn default() -> Self {
        Self {
            form: 0.5,
            ratio: 0.5,
            avg_goals: 1.30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    pub variant: ScoringVariant,

    pub home_base: f64,
    pub form_weight: f64,
    pub goal_diff_weight: f64,
    pub comeback_weight: f64,
    pub blown_lead_weight: f64,
    pub home_advantage_weight: f64,
    pub h2h_home_weight: f64,
    pub h2h_min_sample: u32,
    pub home_bounds: Bounds,

    pub draw_base: f64,
    pub close_form_threshold: f64,
    pub close_form_bonus: f64,
    pub comeback_balance_threshold: f64,
    pub comeback_balance_bonus: f64,
    pub h2h_draw_weight: f64,
    pub draw_bounds: Bounds,

    pub btts_bonus: f64,
    pub btts_home_goals_threshold: f64,
    pub btts_away_goals_threshold: f64,
    pub btts_bounds: Bounds,

    pub over25_high_goals: f64,
    pub over25_high_bonus: f64,
    pub over25_low_goals: f64,
    pub over25_low_malus: f64,
    pub over25_bounds: Bounds,

    pub expected_goals: ExpectedGoalsStrategy,
    pub min_expected_goals: f64,

    pub confidence: ConfidenceParams,
    pub neutral: NeutralDefaults,
}

impl ScoringParams {
    pub fn statistical() -> Self {
        Self {
            variant: ScoringVariant::Statistical,
            home_base: 0.33,
            form_weight: 0.30,
            goal_diff_weight: 0.10,
            comeback_weight: 0.20,
            blown_lead_weight: 0.15,
            home_advantage_weight: 0.10,
            h2h_home_weight: 0.10,
            h2h_min_sample: 3,
            home_bounds: Bounds::new(0.05, 0.85),

            draw_base: 0.25,
            close_form_threshold: 0.20,
            close_form_bonus: 0.10,
            comeback_balance_threshold: 0.10,
            comeback_balance_bonus: 0.05,
            h2h_draw_weight: 0.15,
            draw_bounds: Bounds::new(0.15, 0.45),

            btts_bonus: 0.10,
            btts_home_goals_threshold: 1.5,
            btts_away_goals_threshold: 1.0,
            btts_bounds: Bounds::new(0.20, 0.80),

            over25_high_goals: 3.0,
            over25_high_bonus: 0.15,
            over25_low_goals: 2.0,
            over25_low_malus: 0.10,
            over25_bounds: Bounds::new(0.20, 0.80),

            expected_goals: ExpectedGoalsStrategy::FormAdjusted {
                comeback_bonus: 0.30,
                blown_lead_malus: 0.20,
            },
            min_expected_goals: 0.10,

            confidence: ConfidenceParams {
                base: 0.50,
                coverage_weight: 0.30,
                coverage_matches: 40.0,
                agreement_weight: 0.20,
                h2h_bonus_per_match: 0.01,
                h2h_bonus_cap: 0.05,
                bounds: Bounds::new(0.30, 0.95),
            },
            neutral: NeutralDefaults::default(),
        }
    }

    pub fn heuristic() -> Self {
        let base = Self::statistical();
        Self {
            variant: ScoringVariant::Heuristic,
            expected_goals: ExpectedGoalsStrategy::PoissonRatio {
                home_factor: 1.10,
                away_factor: 1.00,
            },
            confidence: ConfidenceParams {
                base: 0.30,
                bounds: Bounds::new(0.10, 0.95),
                ..base.confidence
            },
            ..base
        }
    }
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self::statistical()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub btts: f64,
    pub over25: f64,
    pub expected_goals: ExpectedGoals,
    pub confidence: f64,
}

impl ModelPrediction {
    pub fn outcome_sum(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }
}

/// Per-team scalars the formulas read, with neutral stand-ins for empty history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamInputs {
    pub form: f64,
    pub avg_scored: f64,
    pub avg_conceded: f64,
    pub btts: f64,
    pub over25: f64,
    pub comeback_win: f64,
    pub blown_lead: f64,
    pub home_advantage: f64,
}

impl TeamInputs {
    pub fn resolve(features: &TeamFeatures, neutral: &NeutralDefaults) -> Self {
        if !features.has_history() {
            return Self::neutral(neutral);
        }
        Self {
            form: features.form_index(),
            avg_scored: features.avg_goals_scored(),
            avg_conceded: features.avg_goals_conceded(),
            btts: features.btts.value(),
            over25: features.over25.value(),
            comeback_win: features.comeback_win.value(),
            blown_lead: features.blown_lead.value(),
            home_advantage: features.home_advantage(),
        }
    }

    pub fn neutral(neutral: &NeutralDefaults) -> Self {
        Self {
            form: neutral.form,
            avg_scored: neutral.avg_goals,
            avg_conceded: neutral.avg_goals,
            btts: neutral.ratio,
            over25: neutral.ratio,
            comeback_win: 0.0,
            blown_lead: 0.0,
            home_advantage: 0.0,
        }
    }
}

pub fn score(features: &MatchupFeatures, params: &ScoringParams) -> ModelPrediction {
    if !features.home.has_history() || !features.away.has_history() {
        warn!(
            "scoring {} vs {} with missing history; neutral defaults applied",
            features.home.team,
            features.away.team
        );
    }
    let home = TeamInputs::resolve(&features.home, &params.neutral);
    let away = TeamInputs::resolve(&features.away, &params.neutral);
    let h2h = &features.head_to_head;

    let home_win = home_win_probability(&home, &away, h2h, params);
    let draw = draw_probability(&home, &away, h2h, params);
    let away_win = (1.0 - home_win - draw).max(0.0);
    let (home_win, draw, away_win) = normalize_outcomes(home_win, draw, away_win);

    let prediction = ModelPrediction {
        home_win,
        draw,
        away_win,
        btts: btts_probability(&home, &away, params),
        over25: over25_probability(&home, &away, params),
        expected_goals: expected_goals(&home, &away, params),
        confidence: confidence(features, params, None),
    };
    debug!(
        "{} {} vs {}: H {:.3} D {:.3} A {:.3} conf {:.2}",
        params.variant,
        features.home.team,
        features.away.team,
        prediction.home_win,
        prediction.draw,
        prediction.away_win,
        prediction.confidence
    );
    prediction
}

/// Clamped, before renormalisation.
pub fn home_win_probability(
    home: &TeamInputs,
    away: &TeamInputs,
    h2h: &HeadToHead,
    params: &ScoringParams,
) -> f64 {
    let mut p = params.home_base;
    p += params.form_weight * (home.form - away.form);
    p += params.goal_diff_weight * (home.avg_scored - away.avg_scored);
    p += params.comeback_weight * home.comeback_win;
    p += params.blown_lead_weight * away.blown_lead;
    p += params.home_advantage_weight * home.home_advantage.max(0.0);
    if h2h.total_matches >= params.h2h_min_sample {
        p += params.h2h_home_weight * h2h.team_a_win_ratio();
    }
    params.home_bounds.clamp(p)
}

/// Clamped, before renormalisation.
pub fn draw_probability(
    home: &TeamInputs,
    away: &TeamInputs,
    h2h: &HeadToHead,
    params: &ScoringParams,
) -> f64 {
    let mut p = params.draw_base;
    if (home.form - away.form).abs() < params.close_form_threshold {
        p += params.close_form_bonus;
    }
    if (home.comeback_win - away.comeback_win).abs() < params.comeback_balance_threshold {
        p += params.comeback_balance_bonus;
    }
    if h2h.total_matches >= params.h2h_min_sample {
        p += params.h2h_draw_weight * h2h.draw_ratio();
    }
    params.draw_bounds.clamp(p)
}

/// Divides each outcome by the sum; a degenerate triple falls back to uniform.
pub fn normalize_outcomes(home: f64, draw: f64, away: f64) -> (f64, f64, f64) {
    let sum = home + draw + away;
    if sum > 0.0 && sum.is_finite() {
        (home / sum, draw / sum, away / sum)
    } else {
        (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }
}

pub fn btts_probability(home: &TeamInputs, away: &TeamInputs, params: &ScoringParams) -> f64 {
    let mut p = (home.btts + away.btts) / 2.0;
    if home.avg_scored >= params.btts_home_goals_threshold
        && away.avg_scored >= params.btts_away_goals_threshold
    {
        p += params.btts_bonus;
    }
    params.btts_bounds.clamp(p)
}

pub fn over25_probability(home: &TeamInputs, away: &TeamInputs, params: &ScoringParams) -> f64 {
    let mut p = (home.over25 + away.over25) / 2.0;
    let combined = home.avg_scored + away.avg_scored;
    if combined >= params.over25_high_goals {
        p += params.over25_high_bonus;
    } else if combined <= params.over25_low_goals {
        p -= params.over25_low_malus;
    }
    params.over25_bounds.clamp(p)
}

pub fn expected_goals(home: &TeamInputs, away: &TeamInputs, params: &ScoringParams) -> ExpectedGoals {
    let floor = params.min_expected_goals;
    match params.expected_goals {
        ExpectedGoalsStrategy::FormAdjusted {
            comeback_bonus,
            blown_lead_malus,
        } => {
            let adjust = |t: &TeamInputs| {
                let xg = t.avg_scored * (1.0 + (t.form - 0.5)) + comeback_bonus * t.comeback_win
                    - blown_lead_malus * t.blown_lead;
                xg.max(floor)
            };
            ExpectedGoals {
                home: adjust(home),
                away: adjust(away),
            }
        }
        ExpectedGoalsStrategy::PoissonRatio {
            home_factor,
            away_factor,
        } => ExpectedGoals {
            home: (home.avg_scored * home_factor).max(floor),
            away: (away.avg_scored * away_factor).max(floor),
        },
    }
}

/// `compare` carries the home-win probability of two sub-models; their agreement earns a bonus.
pub fn confidence(
    features: &MatchupFeatures,
    params: &ScoringParams,
    compare: Option<(f64, f64)>,
) -> f64 {
    let c = &params.confidence;
    let mut score = c.base;

    let observed = features.matches_observed() as f64;
    if c.coverage_matches > 0.0 {
        score += (observed / c.coverage_matches).min(1.0) * c.coverage_weight;
    }

    if let Some((a, b)) = compare {
        score += (1.0 - (a - b).abs()).max(0.0) * c.agreement_weight;
    }

    let h2h = features.head_to_head.total_matches as f64;
    score += (h2h * c.h2h_bonus_per_match).min(c.h2h_bonus_cap);

    c.bounds.clamp(score)
}

pub(crate) fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        return lo;
    }
    v.max(lo).min(hi)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::features::{Average, Ratio};
    use crate::matches::TeamId;

    pub(crate) fn team_features(name: &str, matches: u32) -> TeamFeatures {
        let mut t = TeamFeatures::empty(TeamId::new(name).unwrap());
        t.matches_considered = matches;
        t.form = Ratio::new(matches * 3 / 2, matches * 3);
        t.goals_scored = Average {
            sum: matches * 13 / 10,
            count: matches,
        };
        t.goals_conceded = t.goals_scored;
        t.btts = Ratio::new(matches / 2, matches);
        t.over25 = Ratio::new(matches / 2, matches);
        t.comeback_win = Ratio::new(0, matches);
        t.blown_lead = Ratio::new(0, matches);
        t.home_wins = Ratio::new(0, 0);
        t.away_wins = Ratio::new(0, 0);
        t
    }

    pub(crate) fn matchup(home: TeamFeatures, away: TeamFeatures) -> MatchupFeatures {
        let h2h = HeadToHead::empty(home.team.clone(), away.team.clone());
        MatchupFeatures {
            home,
            away,
            head_to_head: h2h,
        }
    }

    /// Extreme but reachable under the default windows: 20 matches read, 5 in form,
    /// 10 for goals and ratios, 20 for events.
    fn saturated(name: &str) -> TeamFeatures {
        let mut t = TeamFeatures::empty(TeamId::new(name).unwrap());
        t.matches_considered = 20;
        t.wins = 5;
        t.form = Ratio::new(15, 15);
        t.goals_scored = Average { sum: 100, count: 10 };
        t.goals_conceded = Average { sum: 0, count: 10 };
        t.btts = Ratio::new(10, 10);
        t.over25 = Ratio::new(10, 10);
        for r in [
            &mut t.comeback_win,
            &mut t.comeback_draw,
            &mut t.blown_lead,
            &mut t.ht_lead,
        ] {
            *r = Ratio::new(20, 20);
        }
        t.home_wins = Ratio::new(5, 5);
        t
    }

    fn aggregated_matchup(home_n: u32, away_n: u32, h2h_n: u32) -> MatchupFeatures {
        use crate::features::{FeatureWindows, aggregate_matchup};
        use crate::matches::tests::record;

        let home_rows: Vec<_> = (0..home_n)
            .map(|d| record(d, "Home", &format!("X{d}"), (1, 0), (2, 1)))
            .collect();
        let away_rows: Vec<_> = (0..away_n)
            .map(|d| record(d, &format!("Y{d}"), "Away", (0, 0), (1, 1)))
            .collect();
        let h2h_rows: Vec<_> = (0..h2h_n)
            .map(|d| record(100 + d, "Home", "Away", (0, 0), (1, 0)))
            .collect();
        aggregate_matchup(
            &home_rows,
            &away_rows,
            &h2h_rows,
            &TeamId::new("Home").unwrap(),
            &TeamId::new("Away").unwrap(),
            &FeatureWindows::default(),
        )
        .unwrap()
    }

    #[test]
    fn outcomes_sum_to_one() {
        for variant in [ScoringVariant::Statistical, ScoringVariant::Heuristic] {
            let params = variant.params();
            let p = score(&matchup(team_features("A", 10), team_features("B", 7)), &params);
            assert!((p.outcome_sum() - 1.0).abs() < 1e-6);

            let p = score(&matchup(saturated("A"), team_features("B", 0)), &params);
            assert!((p.outcome_sum() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn clamps_apply_before_normalisation() {
        let params = ScoringParams::statistical();
        let strong = TeamInputs::resolve(&saturated("A"), &params.neutral);
        let weak = TeamInputs::resolve(&TeamFeatures::empty(TeamId::new("B").unwrap()), &params.neutral);
        let h2h = HeadToHead::empty(TeamId::new("A").unwrap(), TeamId::new("B").unwrap());

        let home = home_win_probability(&strong, &weak, &h2h, &params);
        assert_eq!(home, 0.85);
        let home = home_win_probability(&weak, &strong, &h2h, &params);
        assert_eq!(home, 0.05);

        let draw = draw_probability(&strong, &strong, &h2h, &params);
        assert!(params.draw_bounds.contains(draw));
        let draw = draw_probability(&strong, &weak, &h2h, &params);
        assert_eq!(draw, 0.25);
    }

    #[test]
    fn good_form_lifts_home_win_above_base() {
        let params = ScoringParams::statistical();
        let mut home = TeamFeatures::empty(TeamId::new("Home").unwrap());
        home.matches_considered = 10;
        home.form = Ratio::new(20, 30);
        home.goals_scored = Average { sum: 13, count: 10 };
        home.goals_conceded = Average { sum: 13, count: 10 };
        home.btts = Ratio::new(5, 10);
        home.over25 = Ratio::new(5, 10);
        home.comeback_win = Ratio::new(0, 10);
        home.blown_lead = Ratio::new(0, 10);
        let away = TeamFeatures::empty(TeamId::new("Away").unwrap());
        let f = matchup(home, away);

        let h = TeamInputs::resolve(&f.home, &params.neutral);
        let a = TeamInputs::resolve(&f.away, &params.neutral);
        let p = home_win_probability(&h, &a, &f.head_to_head, &params);
        assert!(p > 0.33);
        assert!(p <= 0.85);
        assert!((p - (0.33 + 0.3 * (20.0 / 30.0 - 0.5))).abs() < 1e-9);
    }

    #[test]
    fn symmetric_features_isolate_home_advantage() {
        let params = ScoringParams::statistical();

        let p = score(&matchup(team_features("A", 10), team_features("B", 10)), &params);
        // 0.33 home, 0.25 + 0.10 + 0.05 draw, remainder away.
        let base_gap = 2.0 * 0.33 + 0.40 - 1.0;
        assert!(p.home_win > p.away_win);
        assert!((p.home_win - p.away_win - base_gap).abs() < 1e-9);

        let mut home = team_features("A", 10);
        home.home_wins = Ratio::new(4, 5);
        home.away_wins = Ratio::new(2, 5);
        let mut away = team_features("B", 10);
        away.home_wins = home.home_wins;
        away.away_wins = home.away_wins;
        let p = score(&matchup(home, away), &params);
        let advantage = 0.10 * 0.4;
        assert!((p.home_win - p.away_win - (base_gap + 2.0 * advantage)).abs() < 1e-9);
    }

    #[test]
    fn confidence_respects_variant_bounds() {
        for variant in [ScoringVariant::Statistical, ScoringVariant::Heuristic] {
            let params = variant.params();
            let bounds = params.confidence.bounds;

            let zero = matchup(
                TeamFeatures::empty(TeamId::new("A").unwrap()),
                TeamFeatures::empty(TeamId::new("B").unwrap()),
            );
            let c = confidence(&zero, &params, Some((0.0, 1.0)));
            assert!(bounds.contains(c), "{variant}: {c}");

            let full = aggregated_matchup(20, 20, 10);
            let c = confidence(&full, &params, Some((0.5, 0.5)));
            assert!(bounds.contains(c), "{variant}: {c}");
            if variant == ScoringVariant::Statistical {
                // 0.50 + 0.30 + 0.20 + 0.05 saturates the upper bound.
                assert_eq!(c, bounds.hi);
            }
        }
    }

    #[test]
    fn coverage_term_saturates_on_aggregated_history() {
        let params = ScoringParams::heuristic();

        let full = aggregated_matchup(20, 20, 10);
        assert_eq!(full.matches_observed(), 50);
        // base 0.30 + coverage 0.30 + h2h cap 0.05
        let c = confidence(&full, &params, None);
        assert!((c - 0.65).abs() < 1e-9, "{c}");

        let half = aggregated_matchup(10, 10, 0);
        assert_eq!(half.matches_observed(), 20);
        let c = confidence(&half, &params, None);
        assert!((c - 0.45).abs() < 1e-9, "{c}");
    }

    #[test]
    fn empty_history_gets_low_confidence() {
        let params = ScoringParams::heuristic();
        let empty = matchup(
            TeamFeatures::empty(TeamId::new("A").unwrap()),
            TeamFeatures::empty(TeamId::new("B").unwrap()),
        );
        let p = score(&empty, &params);
        assert!((p.confidence - 0.30).abs() < 1e-9);
        assert!((p.outcome_sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn h2h_applies_only_with_enough_sample() {
        let params = ScoringParams::statistical();
        let mut f = matchup(team_features("A", 10), team_features("B", 10));
        f.head_to_head.total_matches = 2;
        f.head_to_head.team_a_wins = 2;
        let h = TeamInputs::resolve(&f.home, &params.neutral);
        let a = TeamInputs::resolve(&f.away, &params.neutral);
        assert!((home_win_probability(&h, &a, &f.head_to_head, &params) - 0.33).abs() < 1e-9);

        f.head_to_head.total_matches = 3;
        f.head_to_head.team_a_wins = 3;
        assert!((home_win_probability(&h, &a, &f.head_to_head, &params) - 0.43).abs() < 1e-9);
    }

    #[test]
    fn btts_and_over25_thresholds() {
        let params = ScoringParams::statistical();
        let neutral = TeamInputs::neutral(&params.neutral);
        let scoring = TeamInputs {
            avg_scored: 1.6,
            ..neutral
        };
        assert!((btts_probability(&scoring, &neutral, &params) - 0.6).abs() < 1e-9);
        assert!((btts_probability(&neutral, &neutral, &params) - 0.5).abs() < 1e-9);

        let quiet = TeamInputs {
            avg_scored: 0.8,
            ..neutral
        };
        assert!((over25_probability(&quiet, &quiet, &params) - 0.4).abs() < 1e-9);
        let loud = TeamInputs {
            avg_scored: 1.8,
            over25: 0.9,
            ..neutral
        };
        assert_eq!(over25_probability(&loud, &loud, &params), 0.8);
    }

    #[test]
    fn expected_goals_strategies_floor_at_minimum() {
        let neutral = NeutralDefaults::default();
        let dry = TeamInputs {
            avg_scored: 0.0,
            form: 0.0,
            blown_lead: 1.0,
            ..TeamInputs::neutral(&neutral)
        };
        for variant in [ScoringVariant::Statistical, ScoringVariant::Heuristic] {
            let xg = expected_goals(&dry, &dry, &variant.params());
            assert_eq!(xg.home, 0.1);
            assert_eq!(xg.away, 0.1);
        }

        let t = TeamInputs {
            avg_scored: 2.0,
            form: 0.75,
            comeback_win: 0.5,
            ..TeamInputs::neutral(&neutral)
        };
        let xg = expected_goals(&t, &t, &ScoringParams::statistical());
        assert!((xg.home - (2.0 * 1.25 + 0.15)).abs() < 1e-9);
        let xg = expected_goals(&t, &t, &ScoringParams::heuristic());
        assert!((xg.home - 2.2).abs() < 1e-9);
        assert!((xg.away - 2.0).abs() < 1e-9);
    }

    #[test]
    fn variant_parses_from_str() {
        assert_eq!("Statistical".parse::<ScoringVariant>().unwrap(), ScoringVariant::Statistical);
        assert_eq!(" heuristic ".parse::<ScoringVariant>().unwrap(), ScoringVariant::Heuristic);
        assert!("elo".parse::<ScoringVariant>().is_err());
    }
}
