use serde::Serialize;

use crate::matches::{MatchRecord, Side, TeamId, sort_recent_first};

const RECENT_FORM_LEN: usize = 5;

/// Whole-history descriptive numbers for one team, as shown by `matchstats team`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub team: TeamId,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub home_played: u32,
    pub away_played: u32,
    pub clean_sheets: u32,
    pub failed_to_score: u32,
    pub btts: u32,
    pub over25: u32,
    pub comeback_wins: u32,
    pub blown_leads: u32,
    /// Most recent first, e.g. "WDLWW".
    pub recent_form: String,
}

impl TeamSummary {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    pub fn points_per_game(&self) -> f64 {
        per_game(self.points, self.played)
    }

    pub fn goals_for_per_game(&self) -> f64 {
        per_game(self.goals_for, self.played)
    }

    pub fn goals_against_per_game(&self) -> f64 {
        per_game(self.goals_against, self.played)
    }

    pub fn btts_rate(&self) -> f64 {
        per_game(self.btts, self.played)
    }

    pub fn over25_rate(&self) -> f64 {
        per_game(self.over25, self.played)
    }
}

fn per_game(n: u32, played: u32) -> f64 {
    if played == 0 {
        0.0
    } else {
        f64::from(n) / f64::from(played)
    }
}

/// Rows that fail validation or do not involve `team` are skipped.
pub fn summarize_team(matches: &[MatchRecord], team: &TeamId) -> TeamSummary {
    let mut rows: Vec<MatchRecord> = matches
        .iter()
        .filter(|m| m.involves(team) && m.validate().is_ok())
        .cloned()
        .collect();
    sort_recent_first(&mut rows);

    let mut s = TeamSummary {
        team: team.clone(),
        played: 0,
        wins: 0,
        draws: 0,
        losses: 0,
        points: 0,
        goals_for: 0,
        goals_against: 0,
        home_played: 0,
        away_played: 0,
        clean_sheets: 0,
        failed_to_score: 0,
        btts: 0,
        over25: 0,
        comeback_wins: 0,
        blown_leads: 0,
        recent_form: String::new(),
    };

    for m in &rows {
        let Some(p) = m.perspective(team) else {
            continue;
        };
        s.played += 1;
        match p.side {
            Side::Home => s.home_played += 1,
            Side::Away => s.away_played += 1,
        }
        let letter = if p.won() {
            s.wins += 1;
            'W'
        } else if p.drew() {
            s.draws += 1;
            'D'
        } else {
            s.losses += 1;
            'L'
        };
        if s.recent_form.len() < RECENT_FORM_LEN {
            s.recent_form.push(letter);
        }
        s.points += p.points();

        let scored = p.ft_for.max(0) as u32;
        let conceded = p.ft_against.max(0) as u32;
        s.goals_for = s.goals_for.saturating_add(scored);
        s.goals_against = s.goals_against.saturating_add(conceded);
        if conceded == 0 {
            s.clean_sheets += 1;
        }
        if scored == 0 {
            s.failed_to_score += 1;
        }
        if scored > 0 && conceded > 0 {
            s.btts += 1;
        }
        if scored.saturating_add(conceded) > 2 {
            s.over25 += 1;
        }
        if p.is_comeback_win() {
            s.comeback_wins += 1;
        }
        if p.is_blown_lead() {
            s.blown_leads += 1;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::tests::record;

    #[test]
    fn summary_counts_whole_history() {
        let team = TeamId::new("Arsenal").unwrap();
        let rows = vec![
            record(1, "Arsenal", "Chelsea", (0, 1), (2, 1)),
            record(2, "Spurs", "Arsenal", (0, 0), (0, 0)),
            record(3, "Arsenal", "Everton", (1, 0), (1, 2)),
            record(4, "Leeds", "Fulham", (0, 0), (3, 3)),
        ];
        let s = summarize_team(&rows, &team);
        assert_eq!(s.played, 3);
        assert_eq!((s.wins, s.draws, s.losses), (1, 1, 1));
        assert_eq!(s.points, 4);
        assert_eq!(s.goals_for, 3);
        assert_eq!(s.goals_against, 3);
        assert_eq!(s.goal_difference(), 0);
        assert_eq!(s.home_played, 2);
        assert_eq!(s.clean_sheets, 1);
        assert_eq!(s.failed_to_score, 1);
        assert_eq!(s.btts, 2);
        assert_eq!(s.over25, 2);
        assert_eq!(s.comeback_wins, 1);
        assert_eq!(s.blown_leads, 1);
        assert_eq!(s.recent_form, "LDW");
    }

    #[test]
    fn absurd_goal_rows_are_skipped() {
        let team = TeamId::new("Arsenal").unwrap();
        let rows = vec![
            record(1, "Arsenal", "Chelsea", (0, 0), (i32::MAX, 0)),
            record(2, "Chelsea", "Arsenal", (0, 0), (i32::MAX, i32::MAX)),
            record(3, "Arsenal", "Spurs", (0, 0), (1, 0)),
        ];
        let s = summarize_team(&rows, &team);
        assert_eq!(s.played, 1);
        assert_eq!(s.goals_for, 1);
    }

    #[test]
    fn empty_history_has_zero_rates() {
        let s = summarize_team(&[], &TeamId::new("Nobody").unwrap());
        assert_eq!(s.played, 0);
        assert_eq!(s.points_per_game(), 0.0);
        assert!(s.recent_form.is_empty());
    }
}
