use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

use matchstats::config::ModelConfig;
use matchstats::evaluation::{self, BacktestReport};
use matchstats::store::{self, SqliteMatchStore};

const DEFAULT_MIN_HISTORY: u32 = 5;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::init();

    let db_path = parse_db_path_arg()
        .or_else(|| std::env::var("MATCHSTATS_DB").ok().map(PathBuf::from))
        .or_else(store::default_db_path)
        .context("unable to resolve sqlite path")?;
    let config_path = parse_str_arg("--config").map(PathBuf::from);
    let config = ModelConfig::load(config_path.as_deref())?;
    let min_history = parse_str_arg("--min-history")
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(DEFAULT_MIN_HISTORY)
        .min(u32::try_from(config.windows.team_fetch_limit()).unwrap_or(u32::MAX));

    let db = SqliteMatchStore::open(&db_path)?;
    let leagues = match parse_str_arg("--league") {
        Some(league) => vec![league],
        None => db.leagues()?,
    };
    if leagues.is_empty() {
        return Err(anyhow!("no leagues in {}", db_path.display()));
    }

    // Connections stay on this thread; the replay itself runs in parallel.
    let mut datasets = Vec::with_capacity(leagues.len());
    for league in &leagues {
        let rows = db
            .load_league_matches(league)
            .with_context(|| format!("load matches for {league}"))?;
        datasets.push((league.clone(), rows));
    }

    let mut reports = datasets
        .par_iter()
        .map(|(league, rows)| evaluation::walk_forward(league, rows, &config, min_history))
        .collect::<Result<Vec<BacktestReport>>>()?;
    reports.sort_by(|a, b| a.league.cmp(&b.league));

    println!("Walk-forward backtest");
    println!("DB: {}", db_path.display());
    println!(
        "Model: {} + {} (weight {:.2}), min history {}",
        config.variant, config.secondary, config.blend_weight, min_history
    );
    println!();

    for r in &reports {
        println!(
            "{:<24} matches={} samples={} brier={:.4} base={:.4} gain={:+.4} ll={:.4} acc={:.3} conf={:.2}",
            r.league,
            r.matches_total,
            r.model.samples,
            r.model.brier,
            r.baseline.brier,
            r.brier_gain(),
            r.model.log_loss,
            r.model.accuracy,
            r.mean_confidence
        );
    }

    let total_samples: usize = reports.iter().map(|r| r.model.samples).sum();
    if total_samples == 0 {
        println!();
        println!("No match had enough history to score.");
        return Ok(());
    }
    let weighted = |f: fn(&BacktestReport) -> f64| {
        reports
            .iter()
            .map(|r| f(r) * r.model.samples as f64)
            .sum::<f64>()
            / total_samples as f64
    };

    println!();
    println!(
        "aggregate samples={} brier={:.4} base={:.4} ll={:.4} acc={:.3}",
        total_samples,
        weighted(|r| r.model.brier),
        weighted(|r| r.baseline.brier),
        weighted(|r| r.model.log_loss),
        weighted(|r| r.model.accuracy)
    );
    Ok(())
}

fn parse_db_path_arg() -> Option<PathBuf> {
    parse_str_arg("--db").map(PathBuf::from)
}

fn parse_str_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
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
