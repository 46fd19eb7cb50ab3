use crate::geometry::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DodgeState {
    #[default]
    Idle,
    Dodging { target: Point },
}

impl DodgeState {
    pub fn is_dodging(&self) -> bool {
        matches!(self, Self::Dodging { .. })
    }

    pub fn target(&self) -> Option<Point> {
        match *self {
            Self::Dodging { target } => Some(target),
            Self::Idle => None,
        }
    }

    /// Starts (or re-targets) an evasive move.
    pub fn begin(&mut self, target: Point) {
        *self = Self::Dodging { target };
    }

    /// Drops back to `Idle` once `current` is within `tolerance` of the target.
    /// Returns `true` on the tick the maneuver completes.
    pub fn settle(&mut self, current: Point, tolerance: f64) -> bool {
        match *self {
            Self::Dodging { target } if current.distance(target) <= tolerance => {
                *self = Self::Idle;
                true
            }
            _ => false,
        }
    }
}
