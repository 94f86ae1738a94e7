use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDateTime, Utc};
use log::{debug, info};
use rusqlite::{Connection, params};

use crate::matches::{MatchRecord, Outcome, TeamId, canonical_team_key};
use crate::repository::{MatchQuery, MatchRepository};

const DATA_DIR: &str = "matchstats";
const DB_FILE: &str = "matches.sqlite";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn app_data_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_DATA_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".local").join("share").join(DATA_DIR))
}

pub fn default_db_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(DB_FILE))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_seen: usize,
    pub matches_upserted: usize,
    pub rejected: Vec<String>,
}

/// SQLite-backed match repository.
pub struct SqliteMatchStore {
    conn: Connection,
}

impl SqliteMatchStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Validates and upserts every row in one transaction. Malformed rows are skipped
    /// and reported, not fatal.
    pub fn import_matches(&mut self, rows: &[MatchRecord]) -> Result<ImportSummary> {
        let mut summary = ImportSummary {
            rows_seen: rows.len(),
            ..ImportSummary::default()
        };
        let tx = self.conn.transaction().context("begin import transaction")?;
        for (idx, row) in rows.iter().enumerate() {
            if let Err(err) = row.validate() {
                summary.rejected.push(format!("row {idx}: {err}"));
                continue;
            }
            upsert_match(&tx, row)?;
            summary.matches_upserted += 1;
        }
        tx.commit().context("commit import transaction")?;
        info!(
            "imported {}/{} matches ({} rejected)",
            summary.matches_upserted,
            summary.rows_seen,
            summary.rejected.len()
        );
        Ok(summary)
    }

    pub fn leagues(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT league FROM matches ORDER BY league ASC")
            .context("prepare leagues query")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("query leagues")?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("decode league row")?);
        }
        Ok(out)
    }

    /// Every match of a league, oldest first.
    pub fn load_league_matches(&self, league: &str) -> Result<Vec<MatchRecord>> {
        let sql = format!(
            "{SELECT_MATCHES} WHERE league = ?1 COLLATE NOCASE ORDER BY match_time ASC, row_id ASC"
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .context("prepare league matches query")?;
        let rows = stmt
            .query_map(params![league.trim()], read_row)
            .context("query league matches")?;
        collect_rows(rows)
    }

    /// Team search: every match involving `team`, optionally restricted to a league,
    /// most recent first.
    pub fn search_team(&self, team: &TeamId, league: Option<&str>) -> Result<Vec<MatchRecord>> {
        let sql = format!(
            "{SELECT_MATCHES}
             WHERE (home_key = ?1 OR away_key = ?1)
               AND (?2 IS NULL OR league = ?2 COLLATE NOCASE)
             ORDER BY match_time DESC, row_id DESC"
        );
        let mut stmt = self.conn.prepare(&sql).context("prepare team search")?;
        let rows = stmt
            .query_map(params![team.as_str(), league.map(str::trim)], read_row)
            .context("query team search")?;
        collect_rows(rows)
    }
}

impl MatchRepository for SqliteMatchStore {
    fn fetch_recent_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>> {
        let before = query.before.map(|t| t.format(TIME_FORMAT).to_string());
        let opponent = query.opponent.as_ref().map(|t| t.as_str().to_string());
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);

        let sql = format!(
            "{SELECT_MATCHES}
             WHERE league = ?1 COLLATE NOCASE
               AND (?3 IS NULL OR match_time < ?3)
               AND (
                    (?4 IS NULL AND (home_key = ?2 OR away_key = ?2))
                 OR (home_key = ?2 AND away_key = ?4)
                 OR (home_key = ?4 AND away_key = ?2)
               )
             ORDER BY match_time DESC, row_id DESC
             LIMIT ?5"
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .context("prepare recent matches query")?;
        let rows = stmt
            .query_map(
                params![
                    query.league.trim(),
                    query.team.as_str(),
                    before,
                    opponent,
                    limit
                ],
                read_row,
            )
            .context("query recent matches")?;
        let out = collect_rows(rows)?;
        debug!(
            "fetched {} matches for {} (league={}, opponent={:?})",
            out.len(),
            query.team,
            query.league,
            query.opponent.as_ref().map(|t| t.as_str())
        );
        Ok(out)
    }
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS matches (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id INTEGER NULL,
            league TEXT NOT NULL COLLATE NOCASE,
            match_time TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_key TEXT NOT NULL,
            away_key TEXT NOT NULL,
            ht_home_goals INTEGER NOT NULL,
            ht_away_goals INTEGER NOT NULL,
            ft_home_goals INTEGER NOT NULL,
            ft_away_goals INTEGER NOT NULL,
            outcome TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (league, match_time, home_key, away_key)
        );
        CREATE INDEX IF NOT EXISTS idx_matches_league ON matches(league);
        CREATE INDEX IF NOT EXISTS idx_matches_time ON matches(match_time);
        CREATE INDEX IF NOT EXISTS idx_matches_home ON matches(home_key);
        CREATE INDEX IF NOT EXISTS idx_matches_away ON matches(away_key);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn load_matches_json(path: &Path) -> Result<Vec<MatchRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read match file {}", path.display()))?;
    parse_matches_json(&raw)
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("empty match file"));
    }
    serde_json::from_str::<Vec<MatchRecord>>(trimmed).context("invalid match json")
}

const SELECT_MATCHES: &str = r#"
    SELECT
        row_id, source_id, league, match_time, home_team, away_team,
        ht_home_goals, ht_away_goals, ft_home_goals, ft_away_goals
    FROM matches"#;

struct RawRow {
    row_id: i64,
    source_id: Option<i64>,
    league: String,
    match_time: String,
    home_team: String,
    away_team: String,
    goals: [i32; 4],
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        row_id: row.get(0)?,
        source_id: row.get(1)?,
        league: row.get(2)?,
        match_time: row.get(3)?,
        home_team: row.get(4)?,
        away_team: row.get(5)?,
        goals: [row.get(6)?, row.get(7)?, row.get(8)?, row.get(9)?],
    })
}

fn collect_rows(
    rows: impl Iterator<Item = rusqlite::Result<RawRow>>,
) -> Result<Vec<MatchRecord>> {
    let mut out = Vec::new();
    for row in rows {
        let raw = row.context("decode match row")?;
        out.push(into_record(raw)?);
    }
    Ok(out)
}

fn into_record(raw: RawRow) -> Result<MatchRecord> {
    let match_time = NaiveDateTime::parse_from_str(&raw.match_time, TIME_FORMAT)
        .with_context(|| format!("invalid match_time {:?}", raw.match_time))?;
    let id = raw.source_id.unwrap_or(raw.row_id);
    Ok(MatchRecord {
        id: u64::try_from(id).ok(),
        league: raw.league,
        match_time,
        home_team: raw.home_team,
        away_team: raw.away_team,
        ht_home_goals: raw.goals[0],
        ht_away_goals: raw.goals[1],
        ft_home_goals: raw.goals[2],
        ft_away_goals: raw.goals[3],
    })
}

fn upsert_match(tx: &rusqlite::Transaction<'_>, m: &MatchRecord) -> Result<()> {
    let outcome = match m.outcome() {
        Outcome::Home => "H",
        Outcome::Draw => "D",
        Outcome::Away => "A",
    };
    tx.execute(
        r#"
        INSERT INTO matches (
            source_id, league, match_time, home_team, away_team, home_key, away_key,
            ht_home_goals, ht_away_goals, ft_home_goals, ft_away_goals, outcome, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7,
            ?8, ?9, ?10, ?11, ?12, ?13
        )
        ON CONFLICT(league, match_time, home_key, away_key) DO UPDATE SET
            source_id = excluded.source_id,
            home_team = excluded.home_team,
            away_team = excluded.away_team,
            ht_home_goals = excluded.ht_home_goals,
            ht_away_goals = excluded.ht_away_goals,
            ft_home_goals = excluded.ft_home_goals,
            ft_away_goals = excluded.ft_away_goals,
            outcome = excluded.outcome,
            updated_at = excluded.updated_at
        "#,
        params![
            m.id.and_then(|id| i64::try_from(id).ok()),
            m.league.trim(),
            m.match_time.format(TIME_FORMAT).to_string(),
            m.home_team.trim(),
            m.away_team.trim(),
            canonical_team_key(&m.home_team),
            canonical_team_key(&m.away_team),
            m.ht_home_goals,
            m.ht_away_goals,
            m.ft_home_goals,
            m.ft_away_goals,
            outcome,
            Utc::now().to_rfc3339(),
        ],
    )
    .context("upsert match")?;
    Ok(())
}
