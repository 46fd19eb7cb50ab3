use crate::arena::ArenaConfig;
use crate::config::TacticsConfig;
use crate::runner::{run_session, write_json, SessionMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<TacticsConfig>,
    pub arena: ArenaConfig,
    pub seeds: Vec<u32>,
    pub max_ticks: u64,
    pub out_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunRecord {
    pub seed_hex: String,
    #[serde(flatten)]
    pub metrics: SessionMetrics,
}

#[derive(Clone, Debug, Serialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub runs: usize,
    pub avg_coins: f64,
    pub max_coins: u32,
    pub avg_hits: f64,
    pub avg_blocked_ticks: f64,
    pub avg_walls_inferred: f64,
    pub avg_dodges_started: f64,
    pub dodge_completion_rate: f64,
    pub waypoint_failures: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub max_ticks: u64,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunRecord>,
}

/// Resolves a comma-separated list of presets / `file:` configs.
pub fn resolve_bots(input: Option<&str>) -> Result<Vec<TacticsConfig>> {
    let Some(raw) = input else {
        return TacticsConfig::preset_names()
            .iter()
            .map(|name| TacticsConfig::resolve(name))
            .collect();
    };
    let bots = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(TacticsConfig::resolve)
        .collect::<Result<Vec<_>>>()?;
    if bots.is_empty() {
        return Err(anyhow!("--bots resolved to empty list"));
    }
    Ok(bots)
}

pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }

    let run_jobs: Vec<(&TacticsConfig, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot, *seed)))
        .collect();

    let run_one = |(bot, seed): &(&TacticsConfig, u32)| -> Result<RunRecord> {
        let artifact = run_session(bot, &config.arena, *seed, config.max_ticks).with_context(
            || format!("benchmark run failed for bot={} seed={seed:#x}", bot.id),
        )?;
        Ok(RunRecord {
            seed_hex: seed_to_hex(*seed),
            metrics: artifact.metrics,
        })
    };

    let results: Vec<Result<RunRecord>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };
    let runs = results.into_iter().collect::<Result<Vec<_>>>()?;

    let mut grouped: BTreeMap<&str, Vec<&SessionMetrics>> = BTreeMap::new();
    for run in &runs {
        grouped
            .entry(run.metrics.bot_id.as_str())
            .or_default()
            .push(&run.metrics);
    }
    let mut bot_rankings: Vec<BotAggregate> = grouped
        .into_iter()
        .map(|(bot_id, metrics)| aggregate(bot_id, &metrics))
        .collect();
    bot_rankings.sort_by(|a, b| b.avg_coins.total_cmp(&a.avg_coins));

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default(),
        max_ticks: config.max_ticks,
        seeds: config.seeds.clone(),
        run_count: runs.len(),
        bot_rankings,
        runs,
    };

    if let Some(out_dir) = &config.out_dir {
        write_json(&out_dir.join("summary.json"), &report)?;
    }
    Ok(report)
}

fn aggregate(bot_id: &str, runs: &[&SessionMetrics]) -> BotAggregate {
    let dodges_started: u64 = runs.iter().map(|m| m.telemetry.dodges_started).sum();
    let dodges_completed: u64 = runs.iter().map(|m| m.telemetry.dodges_completed).sum();

    BotAggregate {
        bot_id: bot_id.to_string(),
        runs: runs.len(),
        avg_coins: mean(runs, |m| m.coins_collected as f64),
        max_coins: runs.iter().map(|m| m.coins_collected).max().unwrap_or_default(),
        avg_hits: mean(runs, |m| m.hits as f64),
        avg_blocked_ticks: mean(runs, |m| m.blocked_ticks as f64),
        avg_walls_inferred: mean(runs, |m| m.telemetry.walls_inferred as f64),
        avg_dodges_started: mean(runs, |m| m.telemetry.dodges_started as f64),
        dodge_completion_rate: if dodges_started == 0 {
            0.0
        } else {
            dodges_completed as f64 / dodges_started as f64
        },
        waypoint_failures: runs.iter().map(|m| m.telemetry.waypoint_failures).sum(),
    }
}

fn mean(runs: &[&SessionMetrics], value: impl Fn(&SessionMetrics) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(|m| value(m)).sum::<f64>() / runs.len() as f64
}
