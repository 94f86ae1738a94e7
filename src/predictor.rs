use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::ensemble::blend;
use crate::error::{ValidationError, ValidationResult};
use crate::features::{MatchupFeatures, aggregate_matchup};
use crate::matches::TeamId;
use crate::repository::{MatchQuery, MatchRepository};
use crate::scoring::{self, ExpectedGoals, ModelPrediction, ScoringVariant};
use crate::secondary::SecondaryModel;

/// An upcoming match to predict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: TeamId,
    pub away: TeamId,
    pub league: String,
    /// Only history strictly before this instant is used, when set.
    #[serde(default)]
    pub kickoff: Option<NaiveDateTime>,
}

impl Fixture {
    pub fn new(home: &str, away: &str, league: &str) -> ValidationResult<Self> {
        let home = TeamId::new(home)?;
        let away = TeamId::new(away)?;
        if home == away {
            return Err(ValidationError::SameTeam(home.to_string()));
        }
        let league = league.trim();
        if league.is_empty() {
            return Err(ValidationError::EmptyLeague);
        }
        Ok(Self {
            home,
            away,
            league: league.to_string(),
            kickoff: None,
        })
    }

    pub fn at(mut self, kickoff: NaiveDateTime) -> Self {
        self.kickoff = Some(kickoff);
        self
    }
}

/// The final blended output handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub fixture: Fixture,
    pub variant: ScoringVariant,
    pub secondary: SecondaryModel,
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub btts: f64,
    pub over25: f64,
    pub expected_goals: ExpectedGoals,
    pub confidence: f64,
    pub primary: ModelPrediction,
    pub secondary_prediction: ModelPrediction,
    pub features: MatchupFeatures,
}

pub struct Predictor<R> {
    repo: R,
    config: ModelConfig,
}

impl<R: MatchRepository> Predictor<R> {
    pub fn new(repo: R, config: ModelConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn features(&self, fixture: &Fixture) -> Result<MatchupFeatures> {
        let windows = &self.config.windows;
        let team_limit = windows.team_fetch_limit();

        let home_rows = self
            .repo
            .fetch_recent_matches(
                &MatchQuery::team(fixture.home.clone(), &fixture.league, team_limit)
                    .before(fixture.kickoff),
            )
            .with_context(|| format!("fetch recent matches for {}", fixture.home))?;
        let away_rows = self
            .repo
            .fetch_recent_matches(
                &MatchQuery::team(fixture.away.clone(), &fixture.league, team_limit)
                    .before(fixture.kickoff),
            )
            .with_context(|| format!("fetch recent matches for {}", fixture.away))?;
        let h2h_rows = self
            .repo
            .fetch_recent_matches(
                &MatchQuery::head_to_head(
                    fixture.home.clone(),
                    fixture.away.clone(),
                    &fixture.league,
                    windows.head_to_head,
                )
                .before(fixture.kickoff),
            )
            .with_context(|| {
                format!("fetch head-to-head for {} vs {}", fixture.home, fixture.away)
            })?;

        let features = aggregate_matchup(
            &home_rows,
            &away_rows,
            &h2h_rows,
            &fixture.home,
            &fixture.away,
            windows,
        )?;
        Ok(features)
    }

    pub fn predict(&self, fixture: &Fixture) -> Result<Prediction> {
        let features = self.features(fixture)?;
        Ok(predict_from_features(fixture.clone(), features, &self.config))
    }
}

/// Primary formula run, secondary model, blend, then confidence with the agreement bonus.
pub fn predict_from_features(
    fixture: Fixture,
    features: MatchupFeatures,
    config: &ModelConfig,
) -> Prediction {
    let params = config.scoring_params();
    let primary = scoring::score(&features, &params);
    let secondary = config.secondary.score(&features, &params);
    let blended = blend(&primary, &secondary, config.blend_weight);
    let confidence = scoring::confidence(
        &features,
        &params,
        Some((primary.home_win, secondary.home_win)),
    );

    debug!(
        "{} vs {} [{}+{} w={:.2}]: H {:.3} D {:.3} A {:.3} conf {:.2}",
        fixture.home,
        fixture.away,
        config.variant,
        config.secondary,
        config.blend_weight,
        blended.home_win,
        blended.draw,
        blended.away_win,
        confidence
    );

    Prediction {
        fixture,
        variant: config.variant,
        secondary: config.secondary,
        home_win: blended.home_win,
        draw: blended.draw,
        away_win: blended.away_win,
        btts: blended.btts,
        over25: blended.over25,
        expected_goals: blended.expected_goals,
        confidence,
        primary,
        secondary_prediction: secondary,
        features,
    }
}
