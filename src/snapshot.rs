use crate::constants::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub pos: Point,
}

impl Player {
    pub fn new(name: impl Into<String>, pos: Point) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub pos: Point,
}

impl Coin {
    pub fn new(id: impl Into<String>, pos: Point) -> Self {
        Self { id: id.into(), pos }
    }
}

/// World state delivered once per tick. Players and coins keep the order the
/// session layer sent them in; tie-breaking in the selectors depends on it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub tick: u64,
    pub players: Vec<Player>,
    pub coins: Vec<Coin>,
}

/// Playable area, origin at (0, 0).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl MapBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn clamp(&self, point: Point) -> Point {
        Point::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }
}
