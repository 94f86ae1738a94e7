use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Canonical team identity: trimmed, internal whitespace collapsed, ASCII lowercase.
///
/// Two names refer to the same team only when their canonical forms are equal.
/// "Madrid" never matches "Real Madrid".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(raw: &str) -> ValidationResult<Self> {
        let canonical = canonical_team_key(raw);
        if canonical.is_empty() {
            return Err(ValidationError::EmptyTeam);
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, raw: &str) -> bool {
        canonical_team_key(raw) == self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn canonical_team_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

pub fn classify_outcome(home_goals: i32, away_goals: i32) -> Outcome {
    if home_goals > away_goals {
        Outcome::Home
    } else if home_goals < away_goals {
        Outcome::Away
    } else {
        Outcome::Draw
    }
}

/// Upper bound on one side's goals in a single match; larger values are treated as corrupt rows.
pub const MAX_GOALS_PER_SIDE: i32 = 99;

/// A finished match as supplied by the match repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub league: String,
    pub match_time: NaiveDateTime,
    pub home_team: String,
    pub away_team: String,
    pub ht_home_goals: i32,
    pub ht_away_goals: i32,
    pub ft_home_goals: i32,
    pub ft_away_goals: i32,
}

impl MatchRecord {
    pub fn validate(&self) -> ValidationResult<()> {
        let home = canonical_team_key(&self.home_team);
        let away = canonical_team_key(&self.away_team);
        if home.is_empty() || away.is_empty() {
            return Err(ValidationError::EmptyTeam);
        }
        if home == away {
            return Err(ValidationError::SameTeam(home));
        }
        for (field, value) in [
            ("ht_home_goals", self.ht_home_goals),
            ("ht_away_goals", self.ht_away_goals),
            ("ft_home_goals", self.ft_home_goals),
            ("ft_away_goals", self.ft_away_goals),
        ] {
            if value < 0 {
                return Err(ValidationError::NegativeGoals { field, value });
            }
            if value > MAX_GOALS_PER_SIDE {
                return Err(ValidationError::ImplausibleGoals {
                    field,
                    value,
                    max: MAX_GOALS_PER_SIDE,
                });
            }
        }
        if self.ht_home_goals > self.ft_home_goals {
            return Err(ValidationError::HalfTimeExceedsFullTime {
                side: "home",
                half_time: self.ht_home_goals,
                full_time: self.ft_home_goals,
            });
        }
        if self.ht_away_goals > self.ft_away_goals {
            return Err(ValidationError::HalfTimeExceedsFullTime {
                side: "away",
                half_time: self.ht_away_goals,
                full_time: self.ft_away_goals,
            });
        }
        Ok(())
    }

    pub fn outcome(&self) -> Outcome {
        classify_outcome(self.ft_home_goals, self.ft_away_goals)
    }

    pub fn total_goals(&self) -> i32 {
        self.ft_home_goals.saturating_add(self.ft_away_goals)
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        self.side_of(team).is_some()
    }

    pub fn is_between(&self, a: &TeamId, b: &TeamId) -> bool {
        (a.matches(&self.home_team) && b.matches(&self.away_team))
            || (b.matches(&self.home_team) && a.matches(&self.away_team))
    }

    pub fn side_of(&self, team: &TeamId) -> Option<Side> {
        if team.matches(&self.home_team) {
            Some(Side::Home)
        } else if team.matches(&self.away_team) {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Score lines seen from `team`'s side, or `None` if it did not play.
    pub fn perspective(&self, team: &TeamId) -> Option<TeamPerspective> {
        let side = self.side_of(team)?;
        let view = match side {
            Side::Home => TeamPerspective {
                side,
                ht_for: self.ht_home_goals,
                ht_against: self.ht_away_goals,
                ft_for: self.ft_home_goals,
                ft_against: self.ft_away_goals,
            },
            Side::Away => TeamPerspective {
                side,
                ht_for: self.ht_away_goals,
                ht_against: self.ht_home_goals,
                ft_for: self.ft_away_goals,
                ft_against: self.ft_home_goals,
            },
        };
        Some(view)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPerspective {
    pub side: Side,
    pub ht_for: i32,
    pub ht_against: i32,
    pub ft_for: i32,
    pub ft_against: i32,
}

impl TeamPerspective {
    pub fn won(&self) -> bool {
        self.ft_for > self.ft_against
    }

    pub fn drew(&self) -> bool {
        self.ft_for == self.ft_against
    }

    pub fn led_at_half_time(&self) -> bool {
        self.ht_for > self.ht_against
    }

    pub fn trailed_at_half_time(&self) -> bool {
        self.ht_for < self.ht_against
    }

    pub fn is_comeback_win(&self) -> bool {
        self.trailed_at_half_time() && self.won()
    }

    pub fn is_comeback_draw(&self) -> bool {
        self.trailed_at_half_time() && self.drew()
    }

    pub fn is_blown_lead(&self) -> bool {
        self.led_at_half_time() && !self.won()
    }

    pub fn points(&self) -> u32 {
        if self.won() {
            3
        } else if self.drew() {
            1
        } else {
            0
        }
    }
}

/// Sorts most-recent-first; ties broken by id so the order is deterministic.
pub fn sort_recent_first(matches: &mut [MatchRecord]) {
    matches.sort_by(|a, b| b.match_time.cmp(&a.match_time).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.checked_add_days(chrono::Days::new(u64::from(day))))
            .and_then(|d| d.and_hms_opt(15, 0, 0))
            .expect("valid date")
    }

    pub(crate) fn record(day: u32, home: &str, away: &str, ht: (i32, i32), ft: (i32, i32)) -> MatchRecord {
        MatchRecord {
            id: Some(u64::from(day)),
            league: "Premier League".to_string(),
            match_time: at(day),
            home_team: home.to_string(),
            away_team: away.to_string(),
            ht_home_goals: ht.0,
            ht_away_goals: ht.1,
            ft_home_goals: ft.0,
            ft_away_goals: ft.1,
        }
    }

    #[test]
    fn team_id_is_exact_not_substring() {
        let madrid = TeamId::new("Madrid").unwrap();
        assert!(!madrid.matches("Real Madrid"));
        let real = TeamId::new("  real   MADRID ").unwrap();
        assert!(real.matches("Real Madrid"));
        assert_eq!(real.as_str(), "real madrid");
    }

    #[test]
    fn empty_team_is_rejected() {
        assert_eq!(TeamId::new("   "), Err(ValidationError::EmptyTeam));
    }

    #[test]
    fn absurd_goal_counts_are_rejected() {
        let m = record(0, "Home", "Away", (0, 0), (i32::MAX, 1));
        assert_eq!(
            m.validate(),
            Err(ValidationError::ImplausibleGoals {
                field: "ft_home_goals",
                value: i32::MAX,
                max: MAX_GOALS_PER_SIDE,
            })
        );
        assert_eq!(m.total_goals(), i32::MAX);
        assert!(record(0, "Home", "Away", (0, 0), (99, 99)).validate().is_ok());
    }

    #[test]
    fn home_comeback_win_detected() {
        let m = record(0, "Home", "Away", (0, 1), (2, 1));
        let home = m.perspective(&TeamId::new("Home").unwrap()).unwrap();
        assert!(home.is_comeback_win());
        assert!(!home.is_blown_lead());
        let away = m.perspective(&TeamId::new("Away").unwrap()).unwrap();
        assert!(away.is_blown_lead());
    }

    #[test]
    fn blown_lead_mirrors_comeback() {
        let m = record(0, "Home", "Away", (1, 0), (1, 2));
        let home = m.perspective(&TeamId::new("Home").unwrap()).unwrap();
        let away = m.perspective(&TeamId::new("Away").unwrap()).unwrap();
        assert!(home.is_blown_lead());
        assert!(away.is_comeback_win());
    }

    #[test]
    fn validate_rejects_malformed_rows() {
        let mut m = record(0, "Home", "Away", (0, 0), (1, 0));
        assert!(m.validate().is_ok());

        m.ft_away_goals = -1;
        assert!(matches!(
            m.validate(),
            Err(ValidationError::NegativeGoals { field: "ft_away_goals", .. })
        ));

        let m = record(0, "Home", "home ", (0, 0), (1, 0));
        assert!(matches!(m.validate(), Err(ValidationError::SameTeam(_))));

        let m = record(0, "Home", "Away", (2, 0), (1, 0));
        assert!(matches!(
            m.validate(),
            Err(ValidationError::HalfTimeExceedsFullTime { side: "home", .. })
        ));
    }

    #[test]
    fn sort_recent_first_orders_by_time_desc() {
        let mut rows = vec![
            record(1, "A", "B", (0, 0), (0, 0)),
            record(5, "A", "C", (0, 0), (0, 0)),
            record(3, "A", "D", (0, 0), (0, 0)),
        ];
        sort_recent_first(&mut rows);
        let days: Vec<u64> = rows.iter().filter_map(|m| m.id).collect();
        assert_eq!(days, vec![5, 3, 1]);
    }
}
