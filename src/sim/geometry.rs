//! Ray intersection primitives for the beam tracer
//!
//! Every query is total: parallel rays, zero-length segments and missed
//! circles produce `None`, never a panic. Hits at `t <= EPS` are rejected so
//! a ray never re-hits the surface it was spawned from.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::EPS;

/// Axis-aligned rectangle, top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.w - amount * 2.0,
            self.h - amount * 2.0,
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Clamp a point into the rectangle
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// A forward intersection along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the (unit) ray direction
    pub t: f32,
    pub point: Vec2,
}

impl RayHit {
    #[inline]
    fn at(origin: Vec2, dir: Vec2, t: f32) -> Self {
        Self {
            t,
            point: origin + dir * t,
        }
    }
}

/// Intersection with one of the playable-area walls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub hit: RayHit,
    /// Wall surface normal, facing into the playable area
    pub normal: Vec2,
}

/// Nearest forward intersection of a ray with the segment `a`-`b`
///
/// Solves `origin + t * dir = a + u * (b - a)`. Parallel rays
/// (`|denom| < EPS`) and hits outside `u ∈ [0, 1]` are misses.
pub fn intersect_ray_segment(origin: Vec2, dir: Vec2, a: Vec2, b: Vec2) -> Option<RayHit> {
    let s = b - a;
    let denom = dir.perp_dot(s);
    if denom.abs() < EPS {
        return None;
    }

    let ao = a - origin;
    let t = ao.perp_dot(s) / denom;
    let u = ao.perp_dot(dir) / denom;

    if t > EPS && (0.0..=1.0).contains(&u) {
        Some(RayHit::at(origin, dir, t))
    } else {
        None
    }
}

/// Slab test against a solid rectangle, returning the entry face hit
///
/// A ray starting inside the rectangle or already past it misses, which is
/// what lets a beam leave a filter it has just entered.
pub fn intersect_ray_rect(origin: Vec2, dir: Vec2, rect: &Rect) -> Option<RayHit> {
    let (min, max) = (rect.min(), rect.max());
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..2 {
        let (o, d) = (origin[axis], dir[axis]);
        if d.abs() < EPS {
            // Parallel to this slab: only a hit if already between its faces
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
    }

    if t_near > t_far || t_far < 0.0 {
        return None;
    }
    if !t_near.is_finite() || t_near < EPS {
        return None;
    }
    Some(RayHit::at(origin, dir, t_near))
}

/// Nearest hit on the four edges of `rect`, with the edge's inward-facing normal
pub fn intersect_ray_rect_boundary(origin: Vec2, dir: Vec2, rect: &Rect) -> Option<WallHit> {
    let (min, max) = (rect.min(), rect.max());
    let top_left = min;
    let top_right = Vec2::new(max.x, min.y);
    let bottom_right = max;
    let bottom_left = Vec2::new(min.x, max.y);

    let walls = [
        (top_left, top_right, Vec2::Y),
        (top_right, bottom_right, Vec2::NEG_X),
        (bottom_right, bottom_left, Vec2::NEG_Y),
        (bottom_left, top_left, Vec2::X),
    ];

    let mut closest: Option<WallHit> = None;
    for (a, b, normal) in walls {
        if let Some(hit) = intersect_ray_segment(origin, dir, a, b) {
            if closest.is_none_or(|c| hit.t < c.hit.t) {
                closest = Some(WallHit { hit, normal });
            }
        }
    }
    closest
}

/// Quadratic ray/circle solve; the smaller positive root wins
///
/// A ray starting inside the circle hits its far side.
pub fn intersect_ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<RayHit> {
    let a = dir.dot(dir);
    if a < EPS {
        return None;
    }
    let oc = origin - center;
    let b = 2.0 * oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    let t = if t1 > EPS {
        t1
    } else if t2 > EPS {
        t2
    } else {
        return None;
    };
    Some(RayHit::at(origin, dir, t))
}

/// Mirror `dir` about `normal`: d - 2(d·n)n, renormalized
///
/// A zero direction reflects to zero.
#[inline]
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    (dir - 2.0 * dir.dot(normal) * normal).normalize_or_zero()
}

/// Does the finite segment `a`-`b` touch the disc at `center`?
pub fn segment_hits_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let ab = b - a;
    let len = ab.length();
    if len < EPS {
        return false;
    }
    if a.distance_squared(center) <= radius * radius {
        return true;
    }
    match intersect_ray_circle(a, ab / len, center, radius) {
        Some(hit) => hit.t <= len + EPS,
        None => false,
    }
}

/// Shortest distance from `p` to the segment `a`-`b`
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < EPS * EPS {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
