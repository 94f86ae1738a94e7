use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::matches::{MatchRecord, Side, TeamId, sort_recent_first};

/// A count over a total, kept together so callers can see the sample behind a rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub count: u32,
    pub total: u32,
}

impl Ratio {
    pub fn new(count: u32, total: u32) -> Self {
        Self { count, total }
    }

    pub fn value(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count as f64 / self.total as f64
        }
    }

    fn record(&mut self, hit: bool) {
        self.total += 1;
        if hit {
            self.count += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Average {
    pub sum: u32,
    pub count: u32,
}

impl Average {
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    fn add(&mut self, value: i32) {
        self.sum = self.sum.saturating_add(value.max(0) as u32);
        self.count = self.count.saturating_add(1);
    }
}

/// How many of the most recent matches feed each feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWindows {
    pub form: usize,
    pub goals: usize,
    pub ratios: usize,
    pub events: usize,
    pub head_to_head: usize,
}

impl Default for FeatureWindows {
    fn default() -> Self {
        Self {
            form: 5,
            goals: 10,
            ratios: 10,
            events: 20,
            head_to_head: 10,
        }
    }
}

impl FeatureWindows {
    pub fn validate(&self) -> ValidationResult<()> {
        for (name, value) in [
            ("form", self.form),
            ("goals", self.goals),
            ("ratios", self.ratios),
            ("events", self.events),
            ("head_to_head", self.head_to_head),
        ] {
            if value == 0 {
                return Err(ValidationError::EmptyWindow(name));
            }
        }
        Ok(())
    }

    /// Largest per-team window; the repository fetch limit.
    pub fn team_fetch_limit(&self) -> usize {
        self.form.max(self.goals).max(self.ratios).max(self.events)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamFeatures {
    pub team: TeamId,
    /// Matches read across all windows; W/D/L only cover the form window.
    pub matches_considered: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Points earned over points available (3 per match).
    pub form: Ratio,
    pub goals_scored: Average,
    pub goals_conceded: Average,
    pub btts: Ratio,
    pub over25: Ratio,
    pub comeback_win: Ratio,
    pub comeback_draw: Ratio,
    pub blown_lead: Ratio,
    pub ht_lead: Ratio,
    pub home_wins: Ratio,
    pub away_wins: Ratio,
}

impl TeamFeatures {
    pub fn empty(team: TeamId) -> Self {
        Self {
            team,
            matches_considered: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            form: Ratio::default(),
            goals_scored: Average::default(),
            goals_conceded: Average::default(),
            btts: Ratio::default(),
            over25: Ratio::default(),
            comeback_win: Ratio::default(),
            comeback_draw: Ratio::default(),
            blown_lead: Ratio::default(),
            ht_lead: Ratio::default(),
            home_wins: Ratio::default(),
            away_wins: Ratio::default(),
        }
    }

    pub fn form_index(&self) -> f64 {
        self.form.value()
    }

    pub fn avg_goals_scored(&self) -> f64 {
        self.goals_scored.mean()
    }

    pub fn avg_goals_conceded(&self) -> f64 {
        self.goals_conceded.mean()
    }

    /// Win rate at home minus win rate away.
    pub fn home_advantage(&self) -> f64 {
        self.home_wins.value() - self.away_wins.value()
    }

    pub fn has_history(&self) -> bool {
        self.matches_considered > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub total_matches: u32,
    pub team_a_wins: u32,
    pub team_b_wins: u32,
    pub draws: u32,
    pub goals: Average,
    pub team_a_goals: Average,
    pub team_b_goals: Average,
    pub btts: Ratio,
    pub over25: Ratio,
}

impl HeadToHead {
    pub fn empty(team_a: TeamId, team_b: TeamId) -> Self {
        Self {
            team_a,
            team_b,
            total_matches: 0,
            team_a_wins: 0,
            team_b_wins: 0,
            draws: 0,
            goals: Average::default(),
            team_a_goals: Average::default(),
            team_b_goals: Average::default(),
            btts: Ratio::default(),
            over25: Ratio::default(),
        }
    }

    pub fn team_a_win_ratio(&self) -> f64 {
        Ratio::new(self.team_a_wins, self.total_matches).value()
    }

    pub fn team_b_win_ratio(&self) -> f64 {
        Ratio::new(self.team_b_wins, self.total_matches).value()
    }

    pub fn draw_ratio(&self) -> f64 {
        Ratio::new(self.draws, self.total_matches).value()
    }

    pub fn avg_goals(&self) -> f64 {
        self.goals.mean()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub team: TeamFeatures,
    pub head_to_head: Option<HeadToHead>,
}

/// Both sides of a fixture plus their shared history. Input to the scoring model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupFeatures {
    pub home: TeamFeatures,
    pub away: TeamFeatures,
    pub head_to_head: HeadToHead,
}

impl MatchupFeatures {
    pub fn matches_observed(&self) -> u32 {
        self.home.matches_considered + self.away.matches_considered + self.head_to_head.total_matches
    }
}

/// Reduces `matches` to the feature set for `team`, plus head-to-head when `opponent` is given.
pub fn aggregate(
    matches: &[MatchRecord],
    team: &TeamId,
    opponent: Option<&TeamId>,
    windows: &FeatureWindows,
) -> ValidationResult<FeatureSet> {
    let team_features = aggregate_team(matches, team, windows)?;
    let head_to_head = match opponent {
        Some(opponent) => Some(aggregate_head_to_head(
            matches,
            team,
            opponent,
            windows.head_to_head,
        )?),
        None => None,
    };
    Ok(FeatureSet {
        team: team_features,
        head_to_head,
    })
}

/// Builds the scoring input for `home` vs `away` from each team's recent slice and
/// their shared history. The slices may overlap; each is filtered to the relevant team(s).
pub fn aggregate_matchup(
    home_matches: &[MatchRecord],
    away_matches: &[MatchRecord],
    h2h_matches: &[MatchRecord],
    home: &TeamId,
    away: &TeamId,
    windows: &FeatureWindows,
) -> ValidationResult<MatchupFeatures> {
    if home == away {
        return Err(ValidationError::SameTeam(home.to_string()));
    }
    Ok(MatchupFeatures {
        home: aggregate_team(home_matches, home, windows)?,
        away: aggregate_team(away_matches, away, windows)?,
        head_to_head: aggregate_head_to_head(h2h_matches, home, away, windows.head_to_head)?,
    })
}

pub fn aggregate_team(
    matches: &[MatchRecord],
    team: &TeamId,
    windows: &FeatureWindows,
) -> ValidationResult<TeamFeatures> {
    windows.validate()?;
    let recent = recent_for(matches, |m| m.involves(team))?;

    let mut out = TeamFeatures::empty(team.clone());
    let longest = windows.team_fetch_limit();

    for (idx, m) in recent.iter().take(longest).enumerate() {
        let Some(view) = m.perspective(team) else {
            continue;
        };
        out.matches_considered += 1;
        let total_goals = view.ft_for.saturating_add(view.ft_against);

        if idx < windows.form {
            out.form.count += view.points();
            out.form.total += 3;
            if view.won() {
                out.wins += 1;
            } else if view.drew() {
                out.draws += 1;
            } else {
                out.losses += 1;
            }
            match view.side {
                Side::Home => out.home_wins.record(view.won()),
                Side::Away => out.away_wins.record(view.won()),
            }
        }

        if idx < windows.goals {
            out.goals_scored.add(view.ft_for);
            out.goals_conceded.add(view.ft_against);
        }

        if idx < windows.ratios {
            out.btts.record(view.ft_for > 0 && view.ft_against > 0);
            out.over25.record(total_goals >= 3);
        }

        if idx < windows.events {
            out.comeback_win.record(view.is_comeback_win());
            out.comeback_draw.record(view.is_comeback_draw());
            out.blown_lead.record(view.is_blown_lead());
            out.ht_lead.record(view.led_at_half_time());
        }
    }

    debug!(
        "aggregated {}: matches={} form={:.3} gf={:.2} ga={:.2}",
        out.team,
        out.matches_considered,
        out.form_index(),
        out.avg_goals_scored(),
        out.avg_goals_conceded()
    );
    Ok(out)
}

pub fn aggregate_head_to_head(
    matches: &[MatchRecord],
    team_a: &TeamId,
    team_b: &TeamId,
    window: usize,
) -> ValidationResult<HeadToHead> {
    if team_a == team_b {
        return Err(ValidationError::SameTeam(team_a.to_string()));
    }
    if window == 0 {
        return Err(ValidationError::EmptyWindow("head_to_head"));
    }
    let recent = recent_for(matches, |m| m.is_between(team_a, team_b))?;

    let mut out = HeadToHead::empty(team_a.clone(), team_b.clone());
    for m in recent.iter().take(window) {
        let Some(view) = m.perspective(team_a) else {
            continue;
        };
        out.total_matches += 1;
        if view.won() {
            out.team_a_wins += 1;
        } else if view.drew() {
            out.draws += 1;
        } else {
            out.team_b_wins += 1;
        }
        let total_goals = view.ft_for.saturating_add(view.ft_against);
        out.goals.add(total_goals);
        out.team_a_goals.add(view.ft_for);
        out.team_b_goals.add(view.ft_against);
        out.btts.record(view.ft_for > 0 && view.ft_against > 0);
        out.over25.record(total_goals >= 3);
    }
    Ok(out)
}

fn recent_for(
    matches: &[MatchRecord],
    keep: impl Fn(&MatchRecord) -> bool,
) -> ValidationResult<Vec<MatchRecord>> {
    let mut out = Vec::new();
    for m in matches.iter().filter(|m| keep(m)) {
        m.validate()?;
        out.push(m.clone());
    }
    sort_recent_first(&mut out);
    Ok(out)
}
