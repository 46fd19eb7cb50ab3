use crate::constants::{WAYPOINT_ATTEMPTS, WAYPOINT_DELTA, WAYPOINT_SHRINK_ROUNDS};
use crate::error::TacticsError;
use crate::geometry::Point;
use crate::rng::SeededRng;
use crate::walls::WallMemory;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaypointPolicy {
    /// Half-width of the square candidates are drawn from.
    pub delta: f64,
    /// Candidates tried per round.
    pub attempts: u32,
    /// Extra rounds after the first, each with half the previous delta.
    pub shrink_rounds: u32,
}

impl Default for WaypointPolicy {
    fn default() -> Self {
        Self {
            delta: WAYPOINT_DELTA,
            attempts: WAYPOINT_ATTEMPTS,
            shrink_rounds: WAYPOINT_SHRINK_ROUNDS,
        }
    }
}

/// Samples nearby escape points whose straight path from the origin does not
/// cross any remembered wall.
#[derive(Clone, Debug)]
pub struct WaypointGenerator {
    policy: WaypointPolicy,
    rng: SeededRng,
}

impl WaypointGenerator {
    pub fn new(policy: WaypointPolicy, rng: SeededRng) -> Self {
        Self { policy, rng }
    }

    pub fn generate(&mut self, origin: Point, walls: &WallMemory) -> Result<Point, TacticsError> {
        let mut delta = self.policy.delta;
        let mut tried = 0u32;
        for _round in 0..=self.policy.shrink_rounds {
            for _ in 0..self.policy.attempts {
                tried += 1;
                let candidate = origin.offset(
                    self.rng.uniform(-delta, delta),
                    self.rng.uniform(-delta, delta),
                );
                if !walls.any_crosses(origin, candidate) {
                    return Ok(candidate);
                }
            }
            delta *= 0.5;
        }

        Err(TacticsError::NoWaypointFound {
            attempts: tried,
            origin_x: origin.x,
            origin_y: origin.y,
        })
    }
}
