use anyhow::{Context, Result};
use arena_autopilot::arena::ArenaConfig;
use arena_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig};
use arena_autopilot::intent::SaveRecord;
use arena_autopilot::runner::{run_session, write_json};
use arena_autopilot::util::{parse_seed, resolve_seeds, seed_to_hex};
use arena_autopilot::TacticsConfig;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arena-autopilot")]
#[command(about = "Tactical coin-arena agent: local sessions, benchmarks and save-blob tools")]
struct Cli {
    /// Arena layout as JSON (defaults to a 100x100 arena with 12 hidden walls)
    #[arg(long, global = true)]
    arena: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List built-in tactic presets
    Presets,
    /// Play one session against the local arena
    Run {
        /// Preset name, or `file:<path>` for a JSON config
        #[arg(long, default_value = "tactical")]
        bot: String,
        #[arg(long, default_value = "1")]
        seed: String,
        #[arg(long, default_value_t = 2_000)]
        ticks: u64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run presets across many seeds in parallel
    Benchmark {
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 16)]
        seed_count: u32,
        #[arg(long, default_value_t = 2_000)]
        ticks: u64,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Decode an end-of-game save blob (file path or literal JSON)
    DecodeSave {
        input: String,
    },
}

fn load_arena(path: Option<&PathBuf>) -> Result<ArenaConfig> {
    let Some(path) = path else {
        return Ok(ArenaConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading arena {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed parsing arena {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli { arena, command } = Cli::parse();
    let arena = load_arena(arena.as_ref())?;

    match command {
        Commands::Presets => {
            for name in TacticsConfig::preset_names() {
                if let Some(config) = TacticsConfig::preset(name) {
                    println!("{name:10} {}", config.description);
                }
            }
        }
        Commands::Run {
            bot,
            seed,
            ticks,
            output,
        } => {
            let config = TacticsConfig::resolve(&bot)?;
            let seed = parse_seed(&seed)?;
            let artifact = run_session(&config, &arena, seed, ticks)?;
            let m = &artifact.metrics;

            println!("bot={}", m.bot_id);
            println!("seed={}", seed_to_hex(seed));
            println!("ticks={}", m.ticks);
            println!("coins={}", m.coins_collected);
            println!("hits={}/{}", m.hits, m.shots);
            println!("blocked_ticks={}", m.blocked_ticks);
            println!("walls_inferred={}", m.telemetry.walls_inferred);
            println!(
                "dodges={}/{}",
                m.telemetry.dodges_completed, m.telemetry.dodges_started
            );
            println!("save={}", String::from_utf8_lossy(&artifact.save_blob));
            if let Some(path) = output {
                write_json(&path, m)?;
                println!("output={}", path.display());
            }
        }
        Commands::Benchmark {
            bots,
            seeds,
            seed_start,
            seed_count,
            ticks,
            out_dir,
            jobs,
        } => {
            let report = run_benchmark(&BenchmarkConfig {
                bots: resolve_bots(bots.as_deref())?,
                arena,
                seeds: resolve_seeds(seeds.as_deref(), seed_start.as_deref(), seed_count)?,
                max_ticks: ticks,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("runs={}", report.run_count);
            for (rank, bot) in report.bot_rankings.iter().enumerate() {
                println!(
                    "#{} {:10} avg_coins={:.2} max_coins={} avg_hits={:.2} walls={:.1} dodge_completion={:.0}%",
                    rank + 1,
                    bot.bot_id,
                    bot.avg_coins,
                    bot.max_coins,
                    bot.avg_hits,
                    bot.avg_walls_inferred,
                    bot.dodge_completion_rate * 100.0
                );
            }
            if let Some(dir) = out_dir {
                println!("summary={}", dir.join("summary.json").display());
            }
        }
        Commands::DecodeSave { input } => {
            let bytes = match fs::read(&input) {
                Ok(bytes) => bytes,
                Err(_) => input.into_bytes(),
            };
            let record = SaveRecord::decode(&bytes)?;
            println!("coin_tally={}", record.coin_tally);
        }
    }

    Ok(())
}
