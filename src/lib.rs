//! Mirror Maze - A light-beam puzzle engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, beam tracing, target evaluation)
//! - `history`: Undo/redo over piece placement snapshots
//! - `session`: Level lifecycle driven by the host's frame callback
//! - `persistence`: Progress document (placements, best times, settings)
//! - `platform`: Storage backends and the browser host API

pub mod best_times;
pub mod history;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use best_times::BestTimes;
pub use history::History;
pub use session::{Session, SessionEvent};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest wall-clock gap fed to the accumulator in one frame (tab suspend, debugger)
    pub const MAX_FRAME_DELTA: f32 = 0.25;

    /// Geometric tolerance: parallel test, self-intersection guard, satisfaction ceiling
    pub const EPS: f32 = 1e-4;

    /// Hard cap on rays processed per trace pass
    pub const MAX_RAYS: usize = 256;
    /// Rays deeper than this many bounces are dropped
    pub const MAX_BOUNCES: u32 = 64;
    /// Distance a child ray is pushed along its new direction
    pub const RAY_NUDGE: f32 = 0.01;
    /// Gap between a portal's rim and the spawn point of the exiting ray
    pub const PORTAL_EXIT_MARGIN: f32 = 1.0;
    /// Projection distance for rays that hit nothing
    pub const PROJECT_FAR: f32 = 9999.0;

    /// Target defaults
    pub const TARGET_RADIUS: f32 = 40.0;
    /// Seconds of continuous coverage before a target is satisfied
    pub const TARGET_HOLD_SECONDS: f32 = 1.0;

    /// Undo depth
    pub const HISTORY_CAP: usize = 100;

    /// Editing
    pub const PICK_RADIUS: f32 = 20.0;
    pub const CLAMP_MARGIN: f32 = 8.0;
    pub const ROTATE_STEP_DEG: f32 = 5.0;
    pub const ROTATE_SNAP_DEG: f32 = 15.0;
    pub const NUDGE_STEP: f32 = 1.0;
    pub const NUDGE_STEP_LARGE: f32 = 10.0;

    /// Spawn tray for fresh pieces (left edge of the board)
    pub const SPAWN_X: f32 = 140.0;
    pub const SPAWN_Y: f32 = 150.0;
    pub const SPAWN_GAP: f32 = 90.0;

    /// Hints
    pub const HINT_IDLE_SECONDS: f32 = 120.0;
    pub const HINT_DURATION: f32 = 3.0;

    /// Delay before loading the next level after a completion
    pub const ADVANCE_DELAY: f32 = 1.4;
    /// Delay before the finale after the last level
    pub const FINALE_DELAY: f32 = 0.8;
}

/// Unit direction for an angle in degrees (y grows downward on the board)
#[inline]
pub fn dir_from_degrees(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Round to the nearest multiple of `step` (radians)
#[inline]
pub fn snap_angle(angle: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return angle;
    }
    (angle / step).round() * step
}
