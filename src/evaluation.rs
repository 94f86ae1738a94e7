use anyhow::Result;
use serde::Serialize;

use crate::config::ModelConfig;
use crate::matches::{MatchRecord, Outcome, TeamId, sort_recent_first};
use crate::predictor::{Fixture, Predictor};
use crate::repository::InMemoryMatches;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prob3 {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl Prob3 {
    pub fn uniform() -> Self {
        Self {
            home: 1.0 / 3.0,
            draw: 1.0 / 3.0,
            away: 1.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub accuracy: f64,
}

pub fn empirical_outcome_probs(outcomes: &[Outcome]) -> Prob3 {
    if outcomes.is_empty() {
        return Prob3::uniform();
    }

    let mut home = 0usize;
    let mut draw = 0usize;
    let mut away = 0usize;
    for outcome in outcomes {
        match outcome {
            Outcome::Home => home += 1,
            Outcome::Draw => draw += 1,
            Outcome::Away => away += 1,
        }
    }
    let n = outcomes.len() as f64;
    Prob3 {
        home: home as f64 / n,
        draw: draw as f64 / n,
        away: away as f64 / n,
    }
}

pub fn evaluate_probs(predictions: &[Prob3], outcomes: &[Outcome]) -> Metrics {
    if predictions.is_empty() || outcomes.is_empty() || predictions.len() != outcomes.len() {
        return Metrics::default();
    }

    let mut brier_sum = 0.0_f64;
    let mut log_loss_sum = 0.0_f64;
    let mut correct = 0usize;

    for (p, outcome) in predictions.iter().zip(outcomes) {
        let y = one_hot(*outcome);
        brier_sum +=
            (p.home - y.home).powi(2) + (p.draw - y.draw).powi(2) + (p.away - y.away).powi(2);

        let actual_prob = match outcome {
            Outcome::Home => p.home,
            Outcome::Draw => p.draw,
            Outcome::Away => p.away,
        }
        .clamp(1e-12, 1.0);
        log_loss_sum += -actual_prob.ln();

        if argmax(*p) == *outcome {
            correct += 1;
        }
    }

    let n = predictions.len() as f64;
    Metrics {
        samples: predictions.len(),
        brier: brier_sum / n,
        log_loss: log_loss_sum / n,
        accuracy: correct as f64 / n,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub league: String,
    pub matches_total: usize,
    pub model: Metrics,
    /// Always predicting the league's running outcome frequencies.
    pub baseline: Metrics,
    pub mean_confidence: f64,
}

impl BacktestReport {
    pub fn brier_gain(&self) -> f64 {
        self.baseline.brier - self.model.brier
    }
}

/// Replays a league in time order, predicting each match from the matches before it.
/// Matches where either team has fewer than `min_history` prior games are skipped; the
/// count tops out at the longest feature window.
pub fn walk_forward(
    league: &str,
    matches: &[MatchRecord],
    config: &ModelConfig,
    min_history: u32,
) -> Result<BacktestReport> {
    let mut ordered: Vec<MatchRecord> = matches
        .iter()
        .filter(|m| m.league.trim().eq_ignore_ascii_case(league.trim()))
        .filter(|m| m.validate().is_ok())
        .cloned()
        .collect();
    sort_recent_first(&mut ordered);
    ordered.reverse();

    let predictor = Predictor::new(InMemoryMatches::new(ordered.clone()), *config);

    let mut preds = Vec::new();
    let mut baseline = Vec::new();
    let mut outcomes = Vec::new();
    // Baseline sees the same history as the model: only earlier kickoffs.
    let mut seen = Vec::new();
    let mut next_seen = 0;
    let mut confidence_sum = 0.0;

    for m in &ordered {
        while let Some(prior) = ordered.get(next_seen).filter(|p| p.match_time < m.match_time) {
            seen.push(prior.outcome());
            next_seen += 1;
        }
        let (Ok(home), Ok(away)) = (TeamId::new(&m.home_team), TeamId::new(&m.away_team)) else {
            continue;
        };
        let fixture = Fixture {
            home,
            away,
            league: league.trim().to_string(),
            kickoff: Some(m.match_time),
        };
        let prediction = predictor.predict(&fixture)?;
        let enough = prediction.features.home.matches_considered >= min_history
            && prediction.features.away.matches_considered >= min_history;

        if enough {
            preds.push(Prob3 {
                home: prediction.home_win,
                draw: prediction.draw,
                away: prediction.away_win,
            });
            baseline.push(empirical_outcome_probs(&seen));
            outcomes.push(m.outcome());
            confidence_sum += prediction.confidence;
        }
    }

    let scored = preds.len();
    Ok(BacktestReport {
        league: league.trim().to_string(),
        matches_total: ordered.len(),
        model: evaluate_probs(&preds, &outcomes),
        baseline: evaluate_probs(&baseline, &outcomes),
        mean_confidence: if scored > 0 {
            confidence_sum / scored as f64
        } else {
            0.0
        },
    })
}

fn argmax(p: Prob3) -> Outcome {
    if p.home >= p.draw && p.home >= p.away {
        Outcome::Home
    } else if p.draw >= p.away {
        Outcome::Draw
    } else {
        Outcome::Away
    }
}

fn one_hot(outcome: Outcome) -> Prob3 {
    match outcome {
        Outcome::Home => Prob3 {
            home: 1.0,
            draw: 0.0,
            away: 0.0,
        },
        Outcome::Draw => Prob3 {
            home: 0.0,
            draw: 1.0,
            away: 0.0,
        },
        Outcome::Away => Prob3 {
            home: 0.0,
            draw: 0.0,
            away: 1.0,
        },
    }
}
