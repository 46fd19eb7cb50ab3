use std::fmt;

/// Per-tick conditions the tactical core recovers from. None of these ever
/// escape `on_tick`; they are logged and the tick emits fewer intents.
#[derive(Clone, Debug, PartialEq)]
pub enum TacticsError {
    SelfNotFound { name: String },
    NoWaypointFound { attempts: u32, origin_x: f64, origin_y: f64 },
    SavePayloadTooLarge { actual: usize, max: usize },
    SavePayloadInvalid { reason: String },
}

impl fmt::Display for TacticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfNotFound { name } => {
                write!(f, "player '{name}' is not present in the snapshot")
            }
            Self::NoWaypointFound {
                attempts,
                origin_x,
                origin_y,
            } => write!(
                f,
                "no unobstructed waypoint near ({origin_x:.2}, {origin_y:.2}) after {attempts} attempts"
            ),
            Self::SavePayloadTooLarge { actual, max } => {
                write!(f, "save payload too large: {actual} bytes (max {max})")
            }
            Self::SavePayloadInvalid { reason } => write!(f, "invalid save payload: {reason}"),
        }
    }
}

impl std::error::Error for TacticsError {}
