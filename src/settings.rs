//! Player preferences
//!
//! Persisted as part of the progress document.

use serde::{Deserialize, Serialize};

/// Beam glow radius used by renderers when motion effects are allowed
pub const BEAM_GLOW: f32 = 18.0;
/// Glow around hovered/selected pieces
pub const PIECE_GLOW: f32 = 12.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Play target pings and the completion chord
    pub sound: bool,
    /// High contrast piece colors
    pub high_contrast: bool,
    /// Reduced motion (no glow)
    pub reduced_motion: bool,
}

impl Settings {
    pub fn toggle_sound(&mut self) -> bool {
        self.sound = !self.sound;
        self.sound
    }

    pub fn toggle_high_contrast(&mut self) -> bool {
        self.high_contrast = !self.high_contrast;
        self.high_contrast
    }

    pub fn toggle_reduced_motion(&mut self) -> bool {
        self.reduced_motion = !self.reduced_motion;
        self.reduced_motion
    }

    /// Effective glow (respects reduced_motion)
    pub fn effective_glow(&self, base: f32) -> f32 {
        if self.reduced_motion { 0.0 } else { base }
    }
}
