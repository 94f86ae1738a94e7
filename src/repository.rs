use anyhow::Result;
use chrono::NaiveDateTime;

use crate::matches::{MatchRecord, TeamId, sort_recent_first};

/// What to fetch: a team's recent matches in one league, optionally only those against
/// `opponent`, optionally only those strictly before `before`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub team: TeamId,
    pub opponent: Option<TeamId>,
    pub league: String,
    pub limit: usize,
    pub before: Option<NaiveDateTime>,
}

impl MatchQuery {
    pub fn team(team: TeamId, league: &str, limit: usize) -> Self {
        Self {
            team,
            opponent: None,
            league: league.to_string(),
            limit,
            before: None,
        }
    }

    pub fn head_to_head(team: TeamId, opponent: TeamId, league: &str, limit: usize) -> Self {
        Self {
            opponent: Some(opponent),
            ..Self::team(team, league, limit)
        }
    }

    pub fn before(mut self, cutoff: Option<NaiveDateTime>) -> Self {
        self.before = cutoff;
        self
    }

    pub fn accepts(&self, m: &MatchRecord) -> bool {
        if !m.league.trim().eq_ignore_ascii_case(self.league.trim()) {
            return false;
        }
        if let Some(cutoff) = self.before {
            if m.match_time >= cutoff {
                return false;
            }
        }
        match &self.opponent {
            Some(opponent) => m.is_between(&self.team, opponent),
            None => m.involves(&self.team),
        }
    }
}

/// Source of historical matches. Results are ordered most-recent-first; an empty
/// result is valid.
pub trait MatchRepository {
    fn fetch_recent_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>>;
}

impl<R: MatchRepository + ?Sized> MatchRepository for &R {
    fn fetch_recent_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>> {
        (**self).fetch_recent_matches(query)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMatches {
    matches: Vec<MatchRecord>,
}

impl InMemoryMatches {
    pub fn new(mut matches: Vec<MatchRecord>) -> Self {
        sort_recent_first(&mut matches);
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn all(&self) -> &[MatchRecord] {
        &self.matches
    }
}

impl MatchRepository for InMemoryMatches {
    fn fetch_recent_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>> {
        Ok(self
            .matches
            .iter()
            .filter(|m| query.accepts(m))
            .take(query.limit)
            .cloned()
            .collect())
    }
}
