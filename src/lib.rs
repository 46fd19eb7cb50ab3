pub mod arena;
pub mod benchmark;
pub mod bot;
pub mod config;
pub mod constants;
pub mod dodge;
pub mod error;
pub mod geometry;
pub mod intent;
pub mod rng;
pub mod runner;
pub mod selectors;
pub mod snapshot;
pub mod stall;
pub mod util;
pub mod walls;
pub mod waypoint;

pub use bot::{ArenaBot, BotRuntimeState, TacticalBot};
pub use config::TacticsConfig;
pub use error::TacticsError;
pub use geometry::{Point, WallSegment};
pub use intent::{Intent, SaveRecord, Weapon};
pub use snapshot::{Coin, GameSnapshot, MapBounds, Player};
