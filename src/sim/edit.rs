//! Piece editing: picking, moving, nudging and rotating
//!
//! Every operation keeps the edited piece's segment inside the playable area.

use glam::Vec2;

use super::geometry::{Rect, distance_to_segment};
use super::state::{Piece, Scene};
use crate::consts::*;
use crate::snap_angle;

impl Scene {
    /// Topmost piece whose segment passes within `PICK_RADIUS` of `point`
    pub fn piece_at(&self, point: Vec2) -> Option<u32> {
        self.pieces
            .iter()
            .rev()
            .find(|piece| {
                let seg = piece.segment();
                distance_to_segment(point, seg.a, seg.b) <= PICK_RADIUS
            })
            .map(|piece| piece.id)
    }

    /// Center a piece on `pos`; returns false for an unknown id
    pub fn move_piece(&mut self, id: u32, pos: Vec2) -> bool {
        let area = self.bounds.playable().inset(CLAMP_MARGIN);
        match self.piece_mut(id) {
            Some(piece) => {
                piece.pos = pos;
                clamp_piece(piece, area);
                true
            }
            None => false,
        }
    }

    /// Shift a piece by `delta`
    pub fn nudge_piece(&mut self, id: u32, delta: Vec2) -> bool {
        match self.piece(id) {
            Some(piece) => {
                let pos = piece.pos + delta;
                self.move_piece(id, pos)
            }
            None => false,
        }
    }

    /// Rotate a piece by `degrees`, optionally snapping to `ROTATE_SNAP_DEG`
    pub fn rotate_piece(&mut self, id: u32, degrees: f32, snap: bool) -> bool {
        let area = self.bounds.playable().inset(CLAMP_MARGIN);
        match self.piece_mut(id) {
            Some(piece) => {
                piece.angle += degrees.to_radians();
                if snap {
                    piece.angle = snap_angle(piece.angle, ROTATE_SNAP_DEG.to_radians());
                }
                clamp_piece(piece, area);
                true
            }
            None => false,
        }
    }
}

/// Shift a piece so both endpoints sit inside `area`
///
/// At most two passes; a segment longer than the area stays overlapping.
fn clamp_piece(piece: &mut Piece, area: Rect) {
    let (lo, hi) = (area.min(), area.max());
    for _ in 0..2 {
        let seg = piece.segment();
        let min = seg.a.min(seg.b);
        let max = seg.a.max(seg.b);

        let shift_axis = |min: f32, max: f32, lo: f32, hi: f32| {
            if min < lo {
                lo - min
            } else if max > hi {
                hi - max
            } else {
                0.0
            }
        };
        let shift = Vec2::new(
            shift_axis(min.x, max.x, lo.x, hi.x),
            shift_axis(min.y, max.y, lo.y, hi.y),
        );
        if shift == Vec2::ZERO {
            break;
        }
        piece.pos += shift;
    }
}
