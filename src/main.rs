use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use log::info;

use matchstats::config::ModelConfig;
use matchstats::matches::TeamId;
use matchstats::predictor::{Fixture, Prediction, Predictor};
use matchstats::store::{self, SqliteMatchStore};
use matchstats::summary::summarize_team;

const DEFAULT_SEARCH_LIMIT: usize = 20;

const USAGE: &str = "usage: matchstats <command> [options]

commands:
  import <matches.json>                    upsert matches into the database
  leagues                                  list leagues in the database
  team --team NAME [--league L]            whole-history summary for a team
  search --team NAME [--league L] [--limit N]
                                           most recent matches for a team
  predict --home NAME --away NAME --league L [--config PATH] [--json]
                                           blended pre-match prediction

options:
  --db PATH        sqlite database (default: $MATCHSTATS_DB or the user data dir)";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some(command) = args.first().map(String::as_str) else {
        println!("{USAGE}");
        return Ok(());
    };

    match command {
        "import" => cmd_import(&args),
        "leagues" => cmd_leagues(&args),
        "team" => cmd_team(&args),
        "search" => cmd_search(&args),
        "predict" => cmd_predict(&args),
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        other => Err(anyhow!("unknown command {other:?}\n\n{USAGE}")),
    }
}

fn open_store(args: &[String]) -> Result<SqliteMatchStore> {
    let db_path = parse_db_path_arg(args)
        .or_else(|| std::env::var("MATCHSTATS_DB").ok().map(PathBuf::from))
        .or_else(store::default_db_path)
        .context("unable to resolve sqlite path")?;
    info!("using database {}", db_path.display());
    SqliteMatchStore::open(&db_path)
}

fn cmd_import(args: &[String]) -> Result<()> {
    let path = positional_arg(args).context("import needs a JSON file path")?;

    let rows = store::load_matches_json(&path)?;
    let mut db = open_store(args)?;
    let summary = db.import_matches(&rows)?;

    println!("File: {}", path.display());
    println!("Rows seen: {}", summary.rows_seen);
    println!("Matches upserted: {}", summary.matches_upserted);
    if !summary.rejected.is_empty() {
        println!("Rejected: {}", summary.rejected.len());
        for reason in &summary.rejected {
            println!("  {reason}");
        }
    }
    Ok(())
}

fn cmd_leagues(args: &[String]) -> Result<()> {
    let db = open_store(args)?;
    for league in db.leagues()? {
        println!("{league}");
    }
    Ok(())
}

fn cmd_team(args: &[String]) -> Result<()> {
    let team = required_team(args, "--team")?;
    let league = parse_str_arg(args, "--league");
    let db = open_store(args)?;
    let rows = db.search_team(&team, league.as_deref())?;
    let s = summarize_team(&rows, &team);

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&s)?);
        return Ok(());
    }

    println!("Team: {}", s.team);
    if let Some(league) = &league {
        println!("League: {league}");
    }
    println!(
        "Played {} (home {}, away {})  W{} D{} L{}  Pts {} ({:.2}/game)",
        s.played,
        s.home_played,
        s.away_played,
        s.wins,
        s.draws,
        s.losses,
        s.points,
        s.points_per_game()
    );
    println!(
        "Goals {}:{} ({:+})  for {:.2}/game  against {:.2}/game",
        s.goals_for,
        s.goals_against,
        s.goal_difference(),
        s.goals_for_per_game(),
        s.goals_against_per_game()
    );
    println!(
        "Clean sheets {}  Failed to score {}  BTTS {:.0}%  Over 2.5 {:.0}%",
        s.clean_sheets,
        s.failed_to_score,
        s.btts_rate() * 100.0,
        s.over25_rate() * 100.0
    );
    println!(
        "Comeback wins {}  Blown leads {}  Recent form {}",
        s.comeback_wins,
        s.blown_leads,
        if s.recent_form.is_empty() {
            "-"
        } else {
            s.recent_form.as_str()
        }
    );
    Ok(())
}

fn cmd_search(args: &[String]) -> Result<()> {
    let team = required_team(args, "--team")?;
    let league = parse_str_arg(args, "--league");
    let limit = parse_str_arg(args, "--limit")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .max(1);
    let db = open_store(args)?;
    let rows = db.search_team(&team, league.as_deref())?;

    if rows.is_empty() {
        println!("No matches for {team}");
        return Ok(());
    }
    for m in rows.iter().take(limit) {
        println!(
            "{}  {:<20} {:>24} {}-{} ({}-{}) {}",
            m.match_time.format("%Y-%m-%d"),
            m.league,
            m.home_team,
            m.ft_home_goals,
            m.ft_away_goals,
            m.ht_home_goals,
            m.ht_away_goals,
            m.away_team
        );
    }
    Ok(())
}

fn cmd_predict(args: &[String]) -> Result<()> {
    let home = parse_str_arg(args, "--home").context("--home is required")?;
    let away = parse_str_arg(args, "--away").context("--away is required")?;
    let league = parse_str_arg(args, "--league").context("--league is required")?;
    let config_path = parse_str_arg(args, "--config").map(PathBuf::from);

    let config = ModelConfig::load(config_path.as_deref())?;
    let fixture = Fixture::new(&home, &away, &league)?;
    let predictor = Predictor::new(open_store(args)?, config);
    let prediction = predictor.predict(&fixture)?;

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        print_prediction(&prediction);
    }
    Ok(())
}

fn print_prediction(p: &Prediction) {
    println!("{} vs {} ({})", p.fixture.home, p.fixture.away, p.fixture.league);
    println!("Model: {} blended with {}", p.variant, p.secondary);
    println!(
        "History: home {} matches, away {} matches, head-to-head {}",
        p.features.home.matches_considered,
        p.features.away.matches_considered,
        p.features.head_to_head.total_matches
    );
    println!("Home: {:.1}%", p.home_win * 100.0);
    println!("Draw: {:.1}%", p.draw * 100.0);
    println!("Away: {:.1}%", p.away_win * 100.0);
    println!("BTTS: {:.1}%", p.btts * 100.0);
    println!("Over 2.5: {:.1}%", p.over25 * 100.0);
    println!(
        "Expected goals: {:.2} - {:.2}",
        p.expected_goals.home, p.expected_goals.away
    );
    println!("Confidence: {:.0}%", p.confidence * 100.0);
}

fn required_team(args: &[String], name: &str) -> Result<TeamId> {
    let raw = parse_str_arg(args, name).with_context(|| format!("{name} is required"))?;
    Ok(TeamId::new(&raw)?)
}

fn parse_db_path_arg(args: &[String]) -> Option<PathBuf> {
    parse_str_arg(args, "--db").map(PathBuf::from)
}

fn parse_str_arg(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}=")) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

/// First bare argument after the command, skipping `--db PATH`.
fn positional_arg(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--db" {
            iter.next();
            continue;
        }
        if !arg.starts_with("--") {
            return Some(PathBuf::from(arg));
        }
    }
    None
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}
