//! Persisted pad state: the committed strokes plus the surface size they were
//! drawn at, so a recreated pad can rescale them to its new size.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::PAD_STATE_VERSION;
use crate::point::Stroke;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to encode or decode pad state: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported pad state version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Versioned snapshot of the path history.
///
/// Each stroke is an ordered list of `[x, y, velocity]` triples. Strokes with
/// fewer than two points are kept as-is; they simply draw nothing on replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadState {
    /// Schema version
    pub version: u32,
    /// Committed strokes in commit order
    pub strokes: Vec<Stroke>,
    /// Surface width when the state was saved
    pub width: u32,
    /// Surface height when the state was saved
    pub height: u32,
}

impl PadState {
    pub fn new(strokes: Vec<Stroke>, width: u32, height: u32) -> Self {
        Self {
            version: PAD_STATE_VERSION,
            strokes,
            width,
            height,
        }
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a saved state, rejecting schema versions this build cannot read
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let state: Self = serde_json::from_str(json)?;
        if state.version != PAD_STATE_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: state.version,
                expected: PAD_STATE_VERSION,
            });
        }
        Ok(state)
    }
}
