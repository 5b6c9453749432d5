//! Beam tracing
//!
//! Breadth-first expansion of a ray worklist. Each dequeued ray is tested
//! against every surface in the scene, emits one visible segment up to the
//! nearest hit, and enqueues whatever rays that surface produces.

use std::collections::VecDeque;

use glam::Vec2;

use super::geometry::{
    intersect_ray_circle, intersect_ray_rect, intersect_ray_rect_boundary, intersect_ray_segment,
    reflect,
};
use super::state::{BeamColor, BeamSegment, PieceKind, Ray, Scene};
use crate::consts::*;

/// What a ray ran into
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Mirror { normal: Vec2 },
    Splitter { normal: Vec2 },
    Blocker,
    Filter { color: BeamColor },
    /// Entered a portal ring; `exit` is the paired ring's center
    Portal { exit: Vec2 },
    Wall { normal: Vec2 },
}

/// Nearest surface along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub t: f32,
    pub point: Vec2,
    pub surface: Surface,
}

/// Output of one trace pass
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub segments: Vec<BeamSegment>,
    /// Rays taken off the worklist (never above `MAX_RAYS`)
    pub rays_processed: usize,
    /// Rays still queued when the ray cap stopped the pass
    pub rays_dropped: usize,
}

impl Trace {
    pub fn truncated(&self) -> bool {
        self.rays_dropped > 0
    }
}

/// Trace the source beam through the scene
pub fn trace(scene: &Scene) -> Trace {
    let source = &scene.level.source;
    let mut queue = VecDeque::new();
    queue.push_back(Ray {
        origin: source.pos(),
        dir: source.dir(),
        color: source.color.unwrap_or(scene.common.source.beam_color),
        bounces: 0,
    });

    let mut out = Trace::default();
    while out.rays_processed < MAX_RAYS {
        let Some(ray) = queue.pop_front() else {
            break;
        };
        out.rays_processed += 1;
        cast_ray(scene, &ray, &mut out.segments, &mut queue);
    }

    out.rays_dropped = queue.len();
    if out.truncated() {
        log::debug!(
            "Trace hit ray cap: {} processed, {} dropped",
            out.rays_processed,
            out.rays_dropped
        );
    }
    out
}

/// Resolve a single ray: emit its visible segment and queue its children
fn cast_ray(scene: &Scene, ray: &Ray, segments: &mut Vec<BeamSegment>, queue: &mut VecDeque<Ray>) {
    if ray.bounces > MAX_BOUNCES {
        return;
    }

    let hit = find_nearest_hit(scene, ray.origin, ray.dir);
    let end = match &hit {
        Some(hit) => hit.point,
        None => project_to_bounds(scene, ray.origin, ray.dir),
    };
    segments.push(BeamSegment {
        from: ray.origin,
        to: end,
        color: ray.color,
    });

    if let Some(hit) = hit {
        spawn_children(scene, ray, &hit, queue);
    }
}

/// Queue the rays a surface produces from an incoming ray
pub(crate) fn spawn_children(scene: &Scene, ray: &Ray, hit: &Hit, queue: &mut VecDeque<Ray>) {
    let nudged = |dir: Vec2| hit.point + dir * RAY_NUDGE;

    match hit.surface {
        Surface::Mirror { normal } => {
            let reflected = reflect(ray.dir, normal);
            queue.push_back(Ray {
                origin: nudged(reflected),
                dir: reflected,
                color: ray.color,
                bounces: ray.bounces + 1,
            });
        }
        Surface::Splitter { normal } => {
            let reflected = reflect(ray.dir, normal);
            queue.push_back(Ray {
                origin: nudged(reflected),
                dir: reflected,
                color: ray.color,
                bounces: ray.bounces + 1,
            });
            queue.push_back(Ray {
                origin: nudged(ray.dir),
                dir: ray.dir,
                color: ray.color,
                bounces: ray.bounces + 1,
            });
        }
        Surface::Filter { color } => {
            // Filters recolor without counting as a bounce
            queue.push_back(Ray {
                origin: nudged(ray.dir),
                dir: ray.dir,
                color,
                bounces: ray.bounces,
            });
        }
        Surface::Portal { exit } => {
            let radius = scene.common.portal.radius;
            let tentative = exit + ray.dir * (radius + PORTAL_EXIT_MARGIN);
            queue.push_back(Ray {
                origin: scene.bounds.playable().clamp_point(tentative),
                dir: ray.dir,
                color: ray.color,
                bounces: ray.bounces,
            });
        }
        // Absorbed
        Surface::Blocker | Surface::Wall { .. } => {}
    }
}

/// Nearest intersection over every surface. Candidates are visited in a
/// fixed order (pieces, blockers, filters, portals, walls) and only a
/// strictly smaller `t` replaces the current best, so ties keep the first.
pub fn find_nearest_hit(scene: &Scene, origin: Vec2, dir: Vec2) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    let mut offer = |t: f32, point: Vec2, surface: Surface| {
        if best.is_none_or(|b| t < b.t) {
            best = Some(Hit { t, point, surface });
        }
    };

    for piece in &scene.pieces {
        let seg = piece.segment();
        if let Some(hit) = intersect_ray_segment(origin, dir, seg.a, seg.b) {
            let surface = match piece.kind {
                PieceKind::Mirror => Surface::Mirror { normal: seg.normal },
                PieceKind::Splitter => Surface::Splitter { normal: seg.normal },
            };
            offer(hit.t, hit.point, surface);
        }
    }

    for blocker in &scene.level.blockers {
        if let Some(hit) = intersect_ray_rect(origin, dir, blocker) {
            offer(hit.t, hit.point, Surface::Blocker);
        }
    }

    let filter_size = scene.common.filter.size;
    for filter in &scene.level.filters {
        if let Some(hit) = intersect_ray_rect(origin, dir, &filter.rect(filter_size)) {
            offer(hit.t, hit.point, Surface::Filter { color: filter.color });
        }
    }

    let portal_radius = scene.common.portal.radius;
    for pair in &scene.level.portals {
        let (a, b) = (Vec2::from(pair.a), Vec2::from(pair.b));
        for (entry, exit) in [(a, b), (b, a)] {
            if let Some(hit) = intersect_ray_circle(origin, dir, entry, portal_radius) {
                offer(hit.t, hit.point, Surface::Portal { exit });
            }
        }
    }

    if let Some(wall) = intersect_ray_rect_boundary(origin, dir, &scene.bounds.playable()) {
        offer(
            wall.hit.t,
            wall.hit.point,
            Surface::Wall {
                normal: wall.normal,
            },
        );
    }

    best
}

/// Where a ray that hit nothing leaves the board
fn project_to_bounds(scene: &Scene, origin: Vec2, dir: Vec2) -> Vec2 {
    scene
        .bounds
        .board()
        .clamp_point(origin + dir * PROJECT_FAR)
}
