use crate::constants::SAVE_LIMIT_BYTES;
use crate::error::TacticsError;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weapon {
    Unarmed,
    Cannon,
    Blade,
}

impl Weapon {
    pub fn id(self) -> u8 {
        match self {
            Self::Unarmed => 0,
            Self::Cannon => 1,
            Self::Blade => 2,
        }
    }

    pub fn is_ranged(self) -> bool {
        matches!(self, Self::Cannon)
    }
}

/// One instruction for the session layer. A tick returns these in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    SelectWeapon { weapon: Weapon },
    MoveTo { target: Point },
    AttackAt { target: Point },
    RotateBlade { radians: f64 },
    Persist { bytes: Vec<u8> },
}

impl Intent {
    pub fn is_move(&self) -> bool {
        matches!(self, Self::MoveTo { .. })
    }

    pub fn move_target(&self) -> Option<Point> {
        match self {
            Self::MoveTo { target } => Some(*target),
            _ => None,
        }
    }
}

/// The only thing that survives a session: written once at game end, handed
/// back by the server on reconnect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    #[serde(rename = "coinTally")]
    pub coin_tally: u32,
}

impl SaveRecord {
    pub fn encode(&self) -> Result<Vec<u8>, TacticsError> {
        let bytes = serde_json::to_vec(self).map_err(|err| TacticsError::SavePayloadInvalid {
            reason: err.to_string(),
        })?;
        if bytes.len() > SAVE_LIMIT_BYTES {
            return Err(TacticsError::SavePayloadTooLarge {
                actual: bytes.len(),
                max: SAVE_LIMIT_BYTES,
            });
        }
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TacticsError> {
        if bytes.len() > SAVE_LIMIT_BYTES {
            return Err(TacticsError::SavePayloadTooLarge {
                actual: bytes.len(),
                max: SAVE_LIMIT_BYTES,
            });
        }
        serde_json::from_slice(bytes).map_err(|err| TacticsError::SavePayloadInvalid {
            reason: err.to_string(),
        })
    }
}
