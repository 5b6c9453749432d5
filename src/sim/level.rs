//! Static level descriptors
//!
//! A level set is loaded once from JSON and never mutated while a level is
//! being played. Keys follow the camelCase layout of the level files.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use super::state::{BeamColor, PieceKind, TargetColor};

/// Built-in level set shipped with the game
const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.json");

/// Level loading failures
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("malformed level data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level set contains no levels")]
    NoLevels,
    #[error("invalid bounds {width}x{height} with wall thickness {wall_thickness}")]
    InvalidBounds {
        width: f32,
        height: f32,
        wall_thickness: f32,
    },
    #[error("duplicate level id {0}")]
    DuplicateId(u32),
}

/// A point as written in level files
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Board size and wall thickness shared by every level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
}

impl Bounds {
    /// The area inside the walls; beams terminate on its edges
    pub fn playable(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height).inset(self.wall_thickness)
    }

    /// The full board including walls
    pub fn board(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            wall_thickness: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceDims {
    pub length: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterDims {
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalDims {
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStyle {
    pub beam_color: BeamColor,
    /// Beam stroke width for renderers
    pub thickness: f32,
}

/// Dimensions shared by all levels of a set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommonConfig {
    pub mirror: PieceDims,
    pub splitter: PieceDims,
    pub filter: FilterDims,
    pub portal: PortalDims,
    pub source: SourceStyle,
}

impl CommonConfig {
    /// A piece's length is a function of its kind alone
    pub fn piece_length(&self, kind: PieceKind) -> f32 {
        match kind {
            PieceKind::Mirror => self.mirror.length,
            PieceKind::Splitter => self.splitter.length,
        }
    }
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            mirror: PieceDims { length: 120.0 },
            splitter: PieceDims { length: 120.0 },
            filter: FilterDims { size: 60.0 },
            portal: PortalDims { radius: 36.0 },
            source: SourceStyle {
                beam_color: BeamColor::White,
                thickness: 6.0,
            },
        }
    }
}

/// The light source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub x: f32,
    pub y: f32,
    /// Emission direction in degrees (0 = right, 90 = down)
    pub dir_deg: f32,
    /// Overrides the set's beam color
    #[serde(default)]
    pub color: Option<BeamColor>,
}

impl Source {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn dir(&self) -> Vec2 {
        crate::dir_from_degrees(self.dir_deg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub x: f32,
    pub y: f32,
    pub color: TargetColor,
}

/// A color-changing square centered at (x, y)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub x: f32,
    pub y: f32,
    pub color: BeamColor,
}

impl Filter {
    pub fn rect(&self, size: f32) -> Rect {
        Rect::centered(Vec2::new(self.x, self.y), size)
    }
}

/// Two linked teleport rings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalPair {
    pub a: Point,
    pub b: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PieceBudget {
    #[serde(default)]
    pub mirrors: u32,
    #[serde(default)]
    pub splitters: u32,
}

/// One piece of a reference solution, shown as a ghost on request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintPiece {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub x: f32,
    pub y: f32,
    pub angle_deg: f32,
}

/// A single puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: u32,
    pub name: String,
    pub source: Source,
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    #[serde(default)]
    pub blockers: Vec<Rect>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub portals: Vec<PortalPair>,
    #[serde(default)]
    pub available_pieces: PieceBudget,
    #[serde(default)]
    pub hint_pieces: Vec<HintPiece>,
}

/// Every level plus the board and dimensions they share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub common: CommonConfig,
    pub levels: Vec<Level>,
}

impl LevelSet {
    /// Parse and validate a level set
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let set: LevelSet = serde_json::from_str(json)?;
        set.validate()?;
        log::info!("Loaded {} levels", set.levels.len());
        Ok(set)
    }

    /// The level set compiled into the crate
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    /// Structural checks only; odd geometry (zero-length pieces, overlapping
    /// blockers) is left to degrade into missed intersections.
    pub fn validate(&self) -> Result<(), LevelError> {
        let b = self.bounds;
        let finite = b.width.is_finite() && b.height.is_finite() && b.wall_thickness.is_finite();
        if !finite
            || b.wall_thickness < 0.0
            || b.width <= b.wall_thickness * 2.0
            || b.height <= b.wall_thickness * 2.0
        {
            return Err(LevelError::InvalidBounds {
                width: b.width,
                height: b.height,
                wall_thickness: b.wall_thickness,
            });
        }

        if self.levels.is_empty() {
            return Err(LevelError::NoLevels);
        }

        let mut seen = HashSet::new();
        for level in &self.levels {
            if !seen.insert(level.id) {
                return Err(LevelError::DuplicateId(level.id));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "bounds": { "width": 1000, "height": 1000, "wallThickness": 20 },
        "levels": [
            {
                "id": 1,
                "name": "First Light",
                "source": { "x": 100, "y": 100, "dirDeg": 0 },
                "targets": [ { "x": 500, "y": 100, "color": "any" } ],
                "filters": [ { "x": 300, "y": 300, "color": "red" } ],
                "portals": [ { "a": { "x": 200, "y": 700 }, "b": { "x": 800, "y": 700 } } ],
                "availablePieces": { "mirrors": 2 },
                "hintPieces": [ { "type": "mirror", "x": 400, "y": 100, "angleDeg": 45 } ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_minimal_set() {
        let set = LevelSet::from_json(MINIMAL).expect("valid set");
        assert_eq!(set.len(), 1);
        let level = &set.levels[0];
        assert_eq!(level.available_pieces.mirrors, 2);
        assert_eq!(level.available_pieces.splitters, 0);
        assert_eq!(level.targets[0].color, TargetColor::Any);
        assert_eq!(level.filters[0].color, BeamColor::Red);
        assert_eq!(level.hint_pieces[0].kind, PieceKind::Mirror);
        assert!(level.blockers.is_empty());
        // Missing `common` falls back to defaults
        assert_eq!(set.common, CommonConfig::default());
        assert_eq!(set.bounds.playable(), Rect::new(20.0, 20.0, 960.0, 960.0));
    }

    #[test]
    fn test_builtin_levels_load() {
        let set = LevelSet::builtin().expect("builtin set must be valid");
        assert!(!set.is_empty());
        for level in &set.levels {
            assert!(!level.targets.is_empty(), "level {} has no targets", level.id);
        }
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let json = r#"{ "bounds": { "width": 30, "height": 500, "wallThickness": 20 },
                        "levels": [ { "id": 1, "name": "x", "source": { "x": 0, "y": 0, "dirDeg": 0 } } ] }"#;
        assert!(matches!(
            LevelSet::from_json(json),
            Err(LevelError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            LevelSet::from_json(r#"{ "levels": [] }"#),
            Err(LevelError::NoLevels)
        ));

        let dup = r#"{ "levels": [
            { "id": 3, "name": "a", "source": { "x": 0, "y": 0, "dirDeg": 0 } },
            { "id": 3, "name": "b", "source": { "x": 0, "y": 0, "dirDeg": 0 } } ] }"#;
        assert!(matches!(
            LevelSet::from_json(dup),
            Err(LevelError::DuplicateId(3))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            LevelSet::from_json("{ not json"),
            Err(LevelError::Json(_))
        ));
    }
}
