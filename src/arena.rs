//! Local stand-in for the game server.
//!
//! Walls are grid-aligned and hidden from the agent; the only evidence it gets
//! is its own position failing to change. Movement intents are applied
//! last-write-wins, matching what the real session layer does with duplicates.

use crate::constants::GRID_CELL;
use crate::geometry::{segment_crosses_wall, Point, WallSegment};
use crate::intent::{Intent, Weapon};
use crate::rng::SeededRng;
use crate::snapshot::{Coin, GameSnapshot, MapBounds, Player};
use crate::walls::boundary_walls;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub bounds: MapBounds,
    pub hidden_walls: usize,
    pub coins: usize,
    pub enemies: usize,
    /// Max distance covered per tick. Keep at or below the wall-inference edge band
    /// so a blocked agent ends up next to the wall that stopped it.
    pub speed: f64,
    pub enemy_speed: f64,
    pub pickup_radius: f64,
    pub hit_radius: f64,
    /// Ticks before the agent appears in the player list.
    pub spawn_delay_ticks: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            bounds: MapBounds::default(),
            hidden_walls: 12,
            coins: 5,
            enemies: 3,
            speed: 1.0,
            enemy_speed: 0.5,
            pickup_radius: 1.0,
            hit_radius: 2.0,
            spawn_delay_ticks: 0,
        }
    }
}

/// What one call to [`LiveArena::apply`] changed for the agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub coins_collected: u32,
    pub hits: u32,
    pub blocked: bool,
}

pub struct LiveArena {
    cfg: ArenaConfig,
    rng: SeededRng,
    walls: Vec<WallSegment>,
    agent_name: String,
    agent_pos: Point,
    destination: Option<Point>,
    weapon: Weapon,
    enemies: Vec<Player>,
    coins: Vec<Coin>,
    next_coin_id: u64,
    tick: u64,
    saved: Option<Vec<u8>>,
}

impl LiveArena {
    pub fn new(cfg: ArenaConfig, agent_name: &str, seed: u32) -> Self {
        let mut rng = SeededRng::new(seed);
        let bounds = cfg.bounds;

        let mut walls = boundary_walls(bounds).to_vec();
        let mut layout_rng = rng.fork(0x57A1);
        for _ in 0..cfg.hidden_walls {
            let wall = random_grid_wall(&mut layout_rng, bounds);
            if !walls.contains(&wall) {
                walls.push(wall);
            }
        }

        let agent_pos = random_cell_center(&mut rng, bounds);
        let enemies = (0..cfg.enemies)
            .map(|idx| Player::new(format!("enemy-{idx}"), random_point(&mut rng, bounds)))
            .collect();

        let mut arena = Self {
            rng,
            walls,
            agent_name: agent_name.to_string(),
            agent_pos,
            destination: None,
            weapon: Weapon::Unarmed,
            enemies,
            coins: Vec::new(),
            next_coin_id: 0,
            tick: 0,
            saved: None,
            cfg,
        };
        for _ in 0..arena.cfg.coins {
            arena.spawn_coin();
        }
        arena
    }

    pub fn bounds(&self) -> MapBounds {
        self.cfg.bounds
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn agent_position(&self) -> Point {
        self.agent_pos
    }

    pub fn hidden_walls(&self) -> &[WallSegment] {
        &self.walls
    }

    pub fn saved(&self) -> Option<&[u8]> {
        self.saved.as_deref()
    }

    fn agent_spawned(&self) -> bool {
        self.tick >= self.cfg.spawn_delay_ticks
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut players = Vec::with_capacity(self.enemies.len() + 1);
        if self.agent_spawned() {
            players.push(Player::new(self.agent_name.clone(), self.agent_pos));
        }
        players.extend(self.enemies.iter().cloned());
        GameSnapshot {
            tick: self.tick,
            players,
            coins: self.coins.clone(),
        }
    }

    /// Applies a tick's intents, then advances the world by one tick.
    pub fn apply(&mut self, intents: &[Intent]) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for intent in intents {
            match intent {
                Intent::SelectWeapon { weapon } => self.weapon = *weapon,
                Intent::MoveTo { target } => self.destination = Some(*target),
                Intent::AttackAt { target } => {
                    if self.weapon.is_ranged() && self.agent_spawned() {
                        outcome.hits += self.resolve_shot(*target);
                    }
                }
                Intent::RotateBlade { .. } => {}
                Intent::Persist { bytes } => self.saved = Some(bytes.clone()),
            }
        }

        if self.agent_spawned() {
            outcome.blocked = self.move_agent();
            outcome.coins_collected = self.collect_coins();
        }
        self.wander_enemies();
        self.tick += 1;
        outcome
    }

    /// Records a persist intent delivered outside the tick loop (game end).
    pub fn persist(&mut self, intents: &[Intent]) {
        for intent in intents {
            if let Intent::Persist { bytes } = intent {
                self.saved = Some(bytes.clone());
            }
        }
    }

    fn move_agent(&mut self) -> bool {
        let Some(dest) = self.destination else {
            return false;
        };
        let dist = self.agent_pos.distance(dest);
        if dist <= f64::EPSILON {
            return false;
        }
        let step = dist.min(self.cfg.speed);
        let next = self.agent_pos.offset(
            (dest.x - self.agent_pos.x) / dist * step,
            (dest.y - self.agent_pos.y) / dist * step,
        );
        let from = self.agent_pos;
        if self
            .walls
            .iter()
            .any(|wall| segment_crosses_wall(from, next, wall))
        {
            return true;
        }
        self.agent_pos = next;
        false
    }

    fn collect_coins(&mut self) -> u32 {
        let before = self.coins.len();
        let pos = self.agent_pos;
        let radius = self.cfg.pickup_radius;
        self.coins.retain(|coin| coin.pos.distance(pos) > radius);
        let collected = before - self.coins.len();
        for _ in 0..collected {
            self.spawn_coin();
        }
        collected as u32
    }

    fn resolve_shot(&mut self, target: Point) -> u32 {
        let mut hits = 0;
        for enemy in &mut self.enemies {
            if enemy.pos.distance(target) <= self.cfg.hit_radius {
                hits += 1;
                enemy.pos = random_point(&mut self.rng, self.cfg.bounds);
            }
        }
        hits
    }

    fn wander_enemies(&mut self) {
        let bounds = self.cfg.bounds;
        let speed = self.cfg.enemy_speed;
        for enemy in &mut self.enemies {
            let dx = self.rng.uniform(-speed, speed);
            let dy = self.rng.uniform(-speed, speed);
            enemy.pos = bounds.clamp(enemy.pos.offset(dx, dy));
        }
    }

    fn spawn_coin(&mut self) {
        let pos = random_point(&mut self.rng, self.cfg.bounds);
        self.coins
            .push(Coin::new(format!("coin-{}", self.next_coin_id), pos));
        self.next_coin_id += 1;
    }
}

fn random_point(rng: &mut SeededRng, bounds: MapBounds) -> Point {
    Point::new(
        rng.uniform(1.0, bounds.width - 1.0),
        rng.uniform(1.0, bounds.height - 1.0),
    )
}

fn random_cell_center(rng: &mut SeededRng, bounds: MapBounds) -> Point {
    let cols = ((bounds.width / GRID_CELL) as u32).max(1);
    let rows = ((bounds.height / GRID_CELL) as u32).max(1);
    Point::new(
        (rng.next_below(cols) as f64 + 0.5) * GRID_CELL,
        (rng.next_below(rows) as f64 + 0.5) * GRID_CELL,
    )
}

/// One cell edge on an interior grid line.
fn random_grid_wall(rng: &mut SeededRng, bounds: MapBounds) -> WallSegment {
    let cols = ((bounds.width / GRID_CELL) as u32).max(2);
    let rows = ((bounds.height / GRID_CELL) as u32).max(2);
    if rng.next_below(2) == 0 {
        let x = (1 + rng.next_below(cols - 1)) as f64 * GRID_CELL;
        let y = rng.next_below(rows) as f64 * GRID_CELL;
        WallSegment::vertical(x, y, y + GRID_CELL)
    } else {
        let y = (1 + rng.next_below(rows - 1)) as f64 * GRID_CELL;
        let x = rng.next_below(cols) as f64 * GRID_CELL;
        WallSegment::horizontal(y, x, x + GRID_CELL)
    }
}
