//! Scene model and core simulation types
//!
//! The `Scene` owns everything that lives for one level: the static level
//! description, the player's pieces, the targets and the last traced beams.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::{Bounds, CommonConfig, Level};
use crate::consts::*;

/// Beam colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeamColor {
    #[default]
    White,
    Red,
    Blue,
    Green,
    Yellow,
}

/// Target colors: a specific beam color or the `any` wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetColor {
    #[default]
    Any,
    White,
    Red,
    Blue,
    Green,
    Yellow,
}

impl TargetColor {
    /// Whether a beam of `beam` color can light this target
    pub fn accepts(self, beam: BeamColor) -> bool {
        match self {
            TargetColor::Any => true,
            TargetColor::White => beam == BeamColor::White,
            TargetColor::Red => beam == BeamColor::Red,
            TargetColor::Blue => beam == BeamColor::Blue,
            TargetColor::Green => beam == BeamColor::Green,
            TargetColor::Yellow => beam == BeamColor::Yellow,
        }
    }
}

/// Placeable piece types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Mirror,
    Splitter,
}

/// A piece's line segment, derived from its position and angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
    /// Unit normal (left-hand perpendicular of a→b); zero for a zero-length piece
    pub normal: Vec2,
}

/// A player-placed mirror or splitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: u32,
    pub kind: PieceKind,
    /// Center of the segment
    pub pos: Vec2,
    /// Orientation (radians)
    pub angle: f32,
    /// Determined by `kind`; rebuilt from the level set on restore
    pub length: f32,
}

impl Piece {
    pub fn new(id: u32, kind: PieceKind, pos: Vec2, angle: f32, common: &CommonConfig) -> Self {
        Self {
            id,
            kind,
            pos,
            angle,
            length: common.piece_length(kind),
        }
    }

    /// Endpoints and normal for the current pose (recomputed on every call)
    pub fn segment(&self) -> Segment {
        let half = Vec2::from_angle(self.angle) * (self.length / 2.0);
        let a = self.pos - half;
        let b = self.pos + half;
        let normal = (b - a).perp().normalize_or_zero();
        Segment { a, b, normal }
    }

    pub fn record(&self) -> PieceRecord {
        PieceRecord {
            id: self.id,
            kind: self.kind,
            x: self.pos.x,
            y: self.pos.y,
            angle: self.angle,
        }
    }
}

/// Serializable pose of one piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceRecord {
    #[serde(default)]
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

/// Copy of every piece's pose at one instant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub Vec<PieceRecord>);

impl Snapshot {
    pub fn of(pieces: &[Piece]) -> Self {
        Self(pieces.iter().map(Piece::record).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A board location that must be lit by a matching beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub color: TargetColor,
    pub radius: f32,
    /// Coverage confidence in [0, 1]
    pub hit_timer: f32,
    /// Lit during the last evaluated tick
    pub is_hit: bool,
    /// `hit_timer` at its ceiling
    pub satisfied: bool,
    /// Ping already emitted for the current coverage run
    pub pinged: bool,
}

impl Target {
    pub fn new(id: u32, pos: Vec2, color: TargetColor) -> Self {
        Self {
            id,
            pos,
            color,
            radius: TARGET_RADIUS,
            hit_timer: 0.0,
            is_hit: false,
            satisfied: false,
            pinged: false,
        }
    }
}

/// A ray in flight during one trace pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    /// Unit direction
    pub dir: Vec2,
    pub color: BeamColor,
    /// Reflections and splits so far
    pub bounces: u32,
}

/// Visible beam between a ray's origin and where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSegment {
    pub from: Vec2,
    pub to: Vec2,
    pub color: BeamColor,
}

/// Simulation context for one level
#[derive(Debug, Clone)]
pub struct Scene {
    pub bounds: Bounds,
    pub common: CommonConfig,
    pub level: Level,
    /// Player pieces (mutated by editing)
    pub pieces: Vec<Piece>,
    /// Targets with transient hit state
    pub targets: Vec<Target>,
    /// Beams from the most recent tick
    pub beams: Vec<BeamSegment>,
    /// Seconds played on this level (stops at completion)
    pub timer: f32,
    /// Completion latch; reset only by building a new scene
    pub completed: bool,
    /// Next piece ID
    next_id: u32,
}

impl Scene {
    /// Build the scene with no pieces placed
    pub fn new(level: Level, bounds: Bounds, common: CommonConfig) -> Self {
        let targets = level
            .targets
            .iter()
            .enumerate()
            .map(|(idx, t)| Target::new(idx as u32, Vec2::new(t.x, t.y), t.color))
            .collect();

        Self {
            bounds,
            common,
            level,
            pieces: Vec::new(),
            targets,
            beams: Vec::new(),
            timer: 0.0,
            completed: false,
            next_id: 1,
        }
    }

    /// Allocate a new piece ID
    pub fn next_piece_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Id the next allocated piece will get
    pub fn peek_next_id(&self) -> u32 {
        self.next_id
    }

    /// Never hand out ids below `next`
    pub fn reserve_ids(&mut self, next: u32) {
        self.next_id = self.next_id.max(next);
    }

    /// Add a piece at the given pose and return its id
    pub fn add_piece(&mut self, kind: PieceKind, pos: Vec2, angle: f32) -> u32 {
        let id = self.next_piece_id();
        self.pieces.push(Piece::new(id, kind, pos, angle, &self.common));
        id
    }

    /// Place the level's budgeted pieces in the spawn tray: mirrors first,
    /// then splitters, one slot apart, wrapping back to the top slot.
    pub fn spawn_pieces(&mut self) {
        let budget = self.level.available_pieces;
        let wrap_at = self.bounds.height - SPAWN_Y;
        let mut slot_y = SPAWN_Y;

        self.pieces.clear();
        let kinds = std::iter::repeat_n(PieceKind::Mirror, budget.mirrors as usize)
            .chain(std::iter::repeat_n(PieceKind::Splitter, budget.splitters as usize));
        for kind in kinds {
            self.add_piece(kind, Vec2::new(SPAWN_X, slot_y), 0.0);
            slot_y += SPAWN_GAP;
            if slot_y > wrap_at {
                slot_y = SPAWN_Y;
            }
        }
    }

    /// Poses of every piece
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.pieces)
    }

    /// Replace the live pieces with a snapshot; lengths come from the level
    /// set, records without an id get a fresh one.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        let max_id = snapshot.0.iter().map(|r| r.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id.saturating_add(1));

        let mut pieces = Vec::with_capacity(snapshot.len());
        for record in &snapshot.0 {
            let id = if record.id == 0 {
                self.next_piece_id()
            } else {
                record.id
            };
            pieces.push(Piece::new(
                id,
                record.kind,
                Vec2::new(record.x, record.y),
                record.angle,
                &self.common,
            ));
        }
        self.pieces = pieces;
    }

    pub fn piece(&self, id: u32) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn piece_mut(&mut self, id: u32) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.id == id)
    }

    /// Count of placed pieces of `kind`
    pub fn count(&self, kind: PieceKind) -> usize {
        self.pieces.iter().filter(|p| p.kind == kind).count()
    }
}
