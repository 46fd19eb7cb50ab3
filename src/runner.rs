use crate::arena::{ArenaConfig, LiveArena};
use crate::bot::{ArenaBot, BotTelemetry, TacticalBot};
use crate::config::TacticsConfig;
use crate::intent::{Intent, SaveRecord};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize)]
pub struct SessionMetrics {
    pub bot_id: String,
    pub seed: u32,
    pub max_ticks: u64,
    pub ticks: u64,
    pub coins_collected: u32,
    pub coin_tally: u32,
    pub shots: u32,
    pub hits: u32,
    pub blocked_ticks: u32,
    pub move_intents: u32,
    pub weapon_selections: u32,
    pub hidden_walls: usize,
    pub telemetry: BotTelemetry,
}

#[derive(Clone, Debug)]
pub struct SessionArtifact {
    pub metrics: SessionMetrics,
    pub save_blob: Vec<u8>,
}

pub fn run_session(
    config: &TacticsConfig,
    arena: &ArenaConfig,
    seed: u32,
    max_ticks: u64,
) -> Result<SessionArtifact> {
    let mut bot = TacticalBot::new(config.clone(), seed);
    run_session_with(&mut bot, arena, seed, max_ticks, None)
}

/// Plays one session: `on_start`, `max_ticks` calls to `on_tick`, `on_end`.
/// `restored` is the save blob a previous session left behind, if any.
pub fn run_session_with(
    bot: &mut dyn ArenaBot,
    arena_cfg: &ArenaConfig,
    seed: u32,
    max_ticks: u64,
    restored: Option<&[u8]>,
) -> Result<SessionArtifact> {
    if max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }

    bot.reset(seed);
    let mut arena = LiveArena::new(arena_cfg.clone(), bot.self_name(), seed);
    bot.on_start(arena.bounds());
    if let Some(blob) = restored {
        let record = SaveRecord::decode(blob).context("failed restoring save blob")?;
        bot.restore(record);
    }

    let mut coins_collected = 0u32;
    let mut shots = 0u32;
    let mut hits = 0u32;
    let mut blocked_ticks = 0u32;
    let mut move_intents = 0u32;
    let mut weapon_selections = 0u32;

    while arena.tick() < max_ticks {
        let snapshot = arena.snapshot();
        let intents = bot.on_tick(&snapshot);
        for intent in &intents {
            match intent {
                Intent::MoveTo { .. } => move_intents += 1,
                Intent::AttackAt { .. } => shots += 1,
                Intent::SelectWeapon { .. } => weapon_selections += 1,
                Intent::RotateBlade { .. } | Intent::Persist { .. } => {}
            }
        }

        let outcome = arena.apply(&intents);
        if outcome.coins_collected > 0 {
            bot.record_coins(outcome.coins_collected);
            coins_collected += outcome.coins_collected;
        }
        hits += outcome.hits;
        if outcome.blocked {
            blocked_ticks += 1;
        }
    }

    arena.persist(&bot.on_end());
    let save_blob = arena
        .saved()
        .map(<[u8]>::to_vec)
        .ok_or_else(|| anyhow!("bot did not persist a save blob at game end"))?;
    let coin_tally = SaveRecord::decode(&save_blob)
        .context("bot persisted an unreadable save blob")?
        .coin_tally;

    tracing::info!(
        bot = bot.id(),
        seed = %seed_to_hex(seed),
        ticks = arena.tick(),
        coins_collected,
        walls_inferred = bot.telemetry().walls_inferred,
        "session finished"
    );

    Ok(SessionArtifact {
        metrics: SessionMetrics {
            bot_id: bot.id().to_string(),
            seed,
            max_ticks,
            ticks: arena.tick(),
            coins_collected,
            coin_tally,
            shots,
            hits,
            blocked_ticks,
            move_intents,
            weapon_selections,
            hidden_walls: arena.hidden_walls().len(),
            telemetry: bot.telemetry(),
        },
        save_blob,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(value)?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}
