//! Deterministic simulation module
//!
//! All puzzle logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (pieces, then blockers, filters, portals, walls)
//! - No rendering or platform dependencies

pub mod edit;
pub mod geometry;
pub mod level;
pub mod state;
pub mod targets;
pub mod tick;
pub mod trace;

pub use geometry::{
    Rect, RayHit, WallHit, distance_to_segment, intersect_ray_circle, intersect_ray_rect,
    intersect_ray_rect_boundary, intersect_ray_segment, reflect, segment_hits_circle,
};
pub use level::{Bounds, CommonConfig, Level, LevelError, LevelSet};
pub use state::{
    BeamColor, BeamSegment, Piece, PieceKind, PieceRecord, Ray, Scene, Segment, Snapshot, Target,
    TargetColor,
};
pub use targets::{TargetReport, evaluate_targets};
pub use tick::{FrameClock, SimEvent, tick};
pub use trace::{Trace, trace};
