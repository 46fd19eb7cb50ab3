use crate::constants::{
    DEFAULT_BOT_NAME, DODGE_TOLERANCE, GRID_CELL, GRID_EDGE_BAND, STALL_EPSILON,
    WAYPOINT_ATTEMPTS, WAYPOINT_DELTA, WAYPOINT_SHRINK_ROUNDS,
};
use crate::intent::Weapon;
use crate::walls::WallGrid;
use crate::waypoint::WaypointPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How movement decisions are written into a tick's intent list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveEmission {
    /// Exactly one `MoveTo`, already resolved by priority (coin < enemy < dodge).
    #[default]
    Single,
    /// Every movement decision in priority order; the consumer honors the last.
    All,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticsConfig {
    pub id: String,
    pub description: String,
    pub self_name: String,
    pub weapon: Weapon,
    pub engage_enemies: bool,
    pub move_emission: MoveEmission,

    // Wall inference
    pub stall_epsilon: f64,
    pub grid_cell: f64,
    pub grid_edge_band: f64,

    // Dodging
    pub waypoint_delta: f64,
    pub waypoint_attempts: u32,
    pub waypoint_shrink_rounds: u32,
    pub dodge_tolerance: f64,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            id: "tactical".to_string(),
            description: "Coin chaser that fires at the nearest enemy and dodges inferred walls."
                .to_string(),
            self_name: DEFAULT_BOT_NAME.to_string(),
            weapon: Weapon::Cannon,
            engage_enemies: true,
            move_emission: MoveEmission::Single,
            stall_epsilon: STALL_EPSILON,
            grid_cell: GRID_CELL,
            grid_edge_band: GRID_EDGE_BAND,
            waypoint_delta: WAYPOINT_DELTA,
            waypoint_attempts: WAYPOINT_ATTEMPTS,
            waypoint_shrink_rounds: WAYPOINT_SHRINK_ROUNDS,
            dodge_tolerance: DODGE_TOLERANCE,
        }
    }
}

impl TacticsConfig {
    pub fn preset_names() -> &'static [&'static str] {
        &["tactical", "cautious", "greedy"]
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "tactical" | "default" => Some(Self::default()),
            "cautious" => Some(Self {
                id: "cautious".to_string(),
                description: "Wider escape waypoints and a tighter arrival check.".to_string(),
                waypoint_delta: 15.0,
                waypoint_attempts: 128,
                waypoint_shrink_rounds: 3,
                dodge_tolerance: 0.75,
                stall_epsilon: 0.01,
                ..Self::default()
            }),
            "greedy" => Some(Self {
                id: "greedy".to_string(),
                description: "Ignores enemies and only chases coins.".to_string(),
                engage_enemies: false,
                waypoint_delta: 6.0,
                ..Self::default()
            }),
            _ => None,
        }
    }

    /// Resolves a preset name, or a path to a JSON config when prefixed with `file:`.
    pub fn resolve(spec: &str) -> Result<Self> {
        if let Some(path) = spec.strip_prefix("file:") {
            return Self::from_file(Path::new(path));
        }
        Self::preset(spec).with_context(|| {
            format!(
                "unknown preset '{spec}'. available: {}",
                Self::preset_names().join(", ")
            )
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading config {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing config {}", path.display()))?;
        config.clamp();
        Ok(config)
    }

    pub fn clamp(&mut self) {
        self.stall_epsilon = self.stall_epsilon.clamp(0.0, 0.5);
        self.grid_cell = self.grid_cell.clamp(1.0, 100.0);
        self.grid_edge_band = self.grid_edge_band.clamp(0.0, self.grid_cell / 2.0);
        self.waypoint_delta = self.waypoint_delta.clamp(1.0, 50.0);
        self.waypoint_attempts = self.waypoint_attempts.clamp(1, 4096);
        self.waypoint_shrink_rounds = self.waypoint_shrink_rounds.min(8);
        self.dodge_tolerance = self.dodge_tolerance.clamp(0.1, 10.0);
    }

    pub fn wall_grid(&self) -> WallGrid {
        WallGrid {
            cell: self.grid_cell,
            edge_band: self.grid_edge_band,
        }
    }

    pub fn waypoint_policy(&self) -> WaypointPolicy {
        WaypointPolicy {
            delta: self.waypoint_delta,
            attempts: self.waypoint_attempts,
            shrink_rounds: self.waypoint_shrink_rounds,
        }
    }
}
