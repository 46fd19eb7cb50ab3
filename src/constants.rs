// Arena
pub const ARENA_WIDTH: f64 = 100.0;
pub const ARENA_HEIGHT: f64 = 100.0;

// Wall inference grid
pub const GRID_CELL: f64 = 10.0;
pub const GRID_EDGE_BAND: f64 = 1.0;

// Stall detection
pub const STALL_EPSILON: f64 = 1e-3;

// Waypoints / dodge
pub const WAYPOINT_DELTA: f64 = 10.0;
pub const WAYPOINT_ATTEMPTS: u32 = 64;
pub const WAYPOINT_SHRINK_ROUNDS: u32 = 2;
pub const DODGE_TOLERANCE: f64 = 1.0;

// Server-side save slot
pub const SAVE_LIMIT_BYTES: usize = 100;

pub const DEFAULT_BOT_NAME: &str = "Bourré";
