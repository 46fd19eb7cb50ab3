use crate::geometry::{segment_crosses_wall, Point, WallSegment};
use crate::snapshot::MapBounds;
use serde::{Deserialize, Serialize};

/// Walls discovered so far. Starts with the four arena edges and only grows.
#[derive(Clone, Debug)]
pub struct WallMemory {
    walls: Vec<WallSegment>,
}

impl Default for WallMemory {
    fn default() -> Self {
        Self::new(MapBounds::default())
    }
}

impl WallMemory {
    pub fn new(bounds: MapBounds) -> Self {
        Self {
            walls: boundary_walls(bounds).to_vec(),
        }
    }

    /// Returns `true` when the wall was not known yet.
    pub fn add(&mut self, wall: WallSegment) -> bool {
        if self.walls.contains(&wall) {
            return false;
        }
        self.walls.push(wall);
        true
    }

    pub fn contains(&self, wall: &WallSegment) -> bool {
        self.walls.contains(wall)
    }

    pub fn any_crosses(&self, from: Point, to: Point) -> bool {
        self.walls
            .iter()
            .any(|wall| segment_crosses_wall(from, to, wall))
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

pub fn boundary_walls(bounds: MapBounds) -> [WallSegment; 4] {
    [
        WallSegment::vertical(0.0, 0.0, bounds.height),
        WallSegment::vertical(bounds.width, 0.0, bounds.height),
        WallSegment::horizontal(0.0, 0.0, bounds.width),
        WallSegment::horizontal(bounds.height, 0.0, bounds.width),
    ]
}

/// Grid the arena's obstacles are aligned to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallGrid {
    pub cell: f64,
    /// How close to a grid line (in world units) a stall must be to blame that line.
    pub edge_band: f64,
}

impl Default for WallGrid {
    fn default() -> Self {
        Self {
            cell: crate::constants::GRID_CELL,
            edge_band: crate::constants::GRID_EDGE_BAND,
        }
    }
}

/// Guesses which wall stopped the agent at `pos`.
///
/// Vertical grid lines are checked before horizontal ones. The wall spans the
/// grid cell containing `pos` along the other axis. Stalls in the middle of a
/// cell yield `None`.
pub fn infer_wall(pos: Point, grid: WallGrid) -> Option<WallSegment> {
    let cell = grid.cell;
    let x_in_cell = pos.x.rem_euclid(cell);
    let y_in_cell = pos.y.rem_euclid(cell);
    let y_span = (
        (pos.y / cell).floor() * cell,
        (pos.y / cell).ceil() * cell,
    );
    let x_span = (
        (pos.x / cell).floor() * cell,
        (pos.x / cell).ceil() * cell,
    );

    if x_in_cell <= grid.edge_band {
        Some(WallSegment::vertical(pos.x.floor(), y_span.0, y_span.1))
    } else if x_in_cell >= cell - grid.edge_band {
        Some(WallSegment::vertical(pos.x.ceil(), y_span.0, y_span.1))
    } else if y_in_cell <= grid.edge_band {
        Some(WallSegment::horizontal(pos.y.floor(), x_span.0, x_span.1))
    } else if y_in_cell >= cell - grid.edge_band {
        Some(WallSegment::horizontal(pos.y.ceil(), x_span.0, x_span.1))
    } else {
        None
    }
}
