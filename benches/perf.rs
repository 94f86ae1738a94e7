use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use matchstats::config::ModelConfig;
use matchstats::evaluation::walk_forward;
use matchstats::features::{FeatureWindows, aggregate_matchup};
use matchstats::matches::{MatchRecord, TeamId};
use matchstats::predictor::{Fixture, Predictor};
use matchstats::repository::InMemoryMatches;
use matchstats::scoring::{self, ScoringParams};

const LEAGUE: &str = "Bench League";

fn season_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 8, 1)
        .and_then(|d| d.and_hms_opt(15, 0, 0))
        .expect("valid date")
}

/// Double round-robin between `teams` sides, repeated `seasons` times.
fn synthetic_matches(teams: usize, seasons: usize, seed: u64) -> Vec<MatchRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = (0..teams).map(|i| format!("Team {i:02}")).collect();
    let mut out = Vec::new();
    let mut day = 0i64;
    for _ in 0..seasons {
        for home in 0..teams {
            for away in 0..teams {
                if home == away {
                    continue;
                }
                let ht_home = rng.gen_range(0..=2);
                let ht_away = rng.gen_range(0..=2);
                let ft_home = ht_home + rng.gen_range(0..=2);
                let ft_away = ht_away + rng.gen_range(0..=2);
                out.push(MatchRecord {
                    id: Some(out.len() as u64 + 1),
                    league: LEAGUE.to_string(),
                    match_time: season_start() + Duration::hours(day * 6),
                    home_team: names[home].clone(),
                    away_team: names[away].clone(),
                    ht_home_goals: ht_home,
                    ht_away_goals: ht_away,
                    ft_home_goals: ft_home,
                    ft_away_goals: ft_away,
                });
                day += 1;
            }
        }
    }
    out
}

fn bench_aggregate_and_score(c: &mut Criterion) {
    let rows = synthetic_matches(20, 2, 7);
    let home = TeamId::new("Team 03").expect("team");
    let away = TeamId::new("Team 11").expect("team");
    let windows = FeatureWindows::default();
    let params = ScoringParams::statistical();

    c.bench_function("aggregate_and_score", |b| {
        b.iter(|| {
            let features =
                aggregate_matchup(black_box(&rows), &rows, &rows, &home, &away, &windows).unwrap();
            let p = scoring::score(&features, &params);
            black_box(p.home_win);
        })
    });
}

fn bench_predict_in_memory(c: &mut Criterion) {
    let repo = InMemoryMatches::new(synthetic_matches(20, 2, 11));
    let predictor = Predictor::new(repo, ModelConfig::default());
    let fixture = Fixture::new("Team 05", "Team 17", LEAGUE).expect("fixture");

    c.bench_function("predict_in_memory", |b| {
        b.iter(|| {
            let p = predictor.predict(black_box(&fixture)).unwrap();
            black_box(p.confidence);
        })
    });
}

fn bench_walk_forward(c: &mut Criterion) {
    let rows = synthetic_matches(10, 1, 23);
    let config = ModelConfig::default();

    c.bench_function("walk_forward_10_teams", |b| {
        b.iter(|| {
            let report = walk_forward(LEAGUE, black_box(&rows), &config, 3).unwrap();
            black_box(report.model.brier);
        })
    });
}

criterion_group!(
    perf,
    bench_aggregate_and_score,
    bench_predict_in_memory,
    bench_walk_forward
);
criterion_main!(perf);
