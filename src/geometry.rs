use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned wall. Two walls are the same wall when every field matches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "axis", rename_all = "snake_case")]
pub enum WallSegment {
    Vertical { x: f64, y_bottom: f64, y_top: f64 },
    Horizontal { y: f64, x_left: f64, x_right: f64 },
}

impl WallSegment {
    pub fn vertical(x: f64, y_bottom: f64, y_top: f64) -> Self {
        Self::Vertical {
            x,
            y_bottom,
            y_top,
        }
    }

    pub fn horizontal(y: f64, x_left: f64, x_right: f64) -> Self {
        Self::Horizontal { y, x_left, x_right }
    }
}

/// Coarse span test between a movement `from -> to` and a wall.
///
/// A vertical wall is hit when the movement's x-span contains the wall's x and
/// the movement's y-span overlaps the wall's y-span (horizontal walls swap the
/// roles). This is a bounding-span check, not a true segment intersection, so
/// diagonal moves that pass close to a wall end are reported as crossings.
pub fn segment_crosses_wall(from: Point, to: Point, wall: &WallSegment) -> bool {
    match *wall {
        WallSegment::Vertical {
            x,
            y_bottom,
            y_top,
        } => span_contains(from.x, to.x, x) && spans_overlap(from.y, to.y, y_bottom, y_top),
        WallSegment::Horizontal { y, x_left, x_right } => {
            span_contains(from.y, to.y, y) && spans_overlap(from.x, to.x, x_left, x_right)
        }
    }
}

fn span_contains(a: f64, b: f64, value: f64) -> bool {
    a.min(b) <= value && value <= a.max(b)
}

fn spans_overlap(a: f64, b: f64, lo: f64, hi: f64) -> bool {
    a.min(b) <= hi.max(lo) && lo.min(hi) <= a.max(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_wall_blocks_horizontal_move_through_its_span() {
        let wall = WallSegment::vertical(50.0, 60.0, 70.0);
        assert!(segment_crosses_wall(
            Point::new(49.5, 65.0),
            Point::new(51.0, 65.0),
            &wall
        ));
        assert!(segment_crosses_wall(
            Point::new(51.0, 65.0),
            Point::new(49.5, 65.0),
            &wall
        ));
    }

    #[test]
    fn vertical_wall_ignores_moves_beside_or_past_its_span() {
        let wall = WallSegment::vertical(50.0, 60.0, 70.0);
        assert!(!segment_crosses_wall(
            Point::new(40.0, 65.0),
            Point::new(49.0, 65.0),
            &wall
        ));
        assert!(!segment_crosses_wall(
            Point::new(45.0, 71.0),
            Point::new(55.0, 80.0),
            &wall
        ));
    }

    #[test]
    fn horizontal_wall_swaps_axes() {
        let wall = WallSegment::horizontal(30.0, 10.0, 20.0);
        assert!(segment_crosses_wall(
            Point::new(15.0, 29.5),
            Point::new(15.0, 30.5),
            &wall
        ));
        assert!(!segment_crosses_wall(
            Point::new(25.0, 29.5),
            Point::new(25.0, 30.5),
            &wall
        ));
    }

    #[test]
    fn diagonal_near_miss_is_reported_as_crossing() {
        // The true segment passes above the wall's top end, the spans still overlap.
        let wall = WallSegment::vertical(50.0, 60.0, 70.0);
        let from = Point::new(45.0, 69.0);
        let to = Point::new(55.0, 79.0);
        assert!(segment_crosses_wall(from, to, &wall));
    }

    #[test]
    fn touching_the_wall_line_counts() {
        let wall = WallSegment::vertical(50.0, 60.0, 70.0);
        assert!(segment_crosses_wall(
            Point::new(45.0, 70.0),
            Point::new(50.0, 70.0),
            &wall
        ));
    }
}
