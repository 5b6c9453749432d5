//! Target coverage evaluation
//!
//! Each tick a target is either lit by a matching beam (its timer climbs) or
//! not (its timer decays). A target is satisfied only while its timer sits at
//! the ceiling, so a single dark tick un-satisfies it.

use super::geometry::segment_hits_circle;
use super::state::{BeamSegment, Target};
use crate::consts::*;

/// What changed during one evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetReport {
    /// Targets that started a new coverage run this tick
    pub pinged: Vec<u32>,
    /// Every target satisfied at once (false for a level with no targets)
    pub all_satisfied: bool,
}

/// Advance every target's coverage timer by `dt` seconds of beam exposure
///
/// `hold_seconds` is the continuous coverage needed to reach the ceiling.
pub fn evaluate_targets(
    targets: &mut [Target],
    segments: &[BeamSegment],
    dt: f32,
    hold_seconds: f32,
) -> TargetReport {
    for target in targets.iter_mut() {
        target.is_hit = false;
    }

    for segment in segments {
        for target in targets.iter_mut() {
            if target.is_hit || !target.color.accepts(segment.color) {
                continue;
            }
            if segment_hits_circle(segment.from, segment.to, target.pos, target.radius) {
                target.is_hit = true;
            }
        }
    }

    let step = if hold_seconds > 0.0 {
        dt / hold_seconds
    } else {
        1.0
    };

    let mut report = TargetReport::default();
    for target in targets.iter_mut() {
        if target.is_hit {
            target.hit_timer = (target.hit_timer + step).min(1.0);
            if !target.pinged {
                target.pinged = true;
                report.pinged.push(target.id);
            }
        } else {
            target.hit_timer = (target.hit_timer - step).max(0.0);
            if target.hit_timer == 0.0 {
                target.pinged = false;
            }
        }
        target.satisfied = target.hit_timer >= 1.0 - EPS;
    }

    report.all_satisfied = !targets.is_empty() && targets.iter().all(|t| t.satisfied);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BeamColor, TargetColor};
    use glam::Vec2;

    fn beam(color: BeamColor) -> BeamSegment {
        BeamSegment {
            from: Vec2::new(0.0, 100.0),
            to: Vec2::new(1000.0, 100.0),
            color,
        }
    }

    fn target_on_beam(color: TargetColor) -> Target {
        Target::new(0, Vec2::new(500.0, 100.0), color)
    }

    #[test]
    fn test_satisfied_after_exactly_hold_duration() {
        let mut targets = vec![target_on_beam(TargetColor::Any)];
        let beams = [beam(BeamColor::White)];

        for tick in 1..60 {
            let report = evaluate_targets(&mut targets, &beams, SIM_DT, 1.0);
            assert!(targets[0].is_hit);
            assert!(!targets[0].satisfied, "satisfied early at tick {tick}");
            assert!(!report.all_satisfied);
        }
        let report = evaluate_targets(&mut targets, &beams, SIM_DT, 1.0);
        assert!(targets[0].satisfied);
        assert!(report.all_satisfied);
        assert!(targets[0].hit_timer <= 1.0);

        // One dark tick drops satisfaction immediately
        let report = evaluate_targets(&mut targets, &[], SIM_DT, 1.0);
        assert!(!targets[0].is_hit);
        assert!(!targets[0].satisfied);
        assert!(!report.all_satisfied);
        assert!(targets[0].hit_timer > 0.9);
    }

    #[test]
    fn test_color_mismatch_never_lights() {
        let mut targets = vec![target_on_beam(TargetColor::Red)];
        // Beam passing straight through the target's center
        let beams = [beam(BeamColor::Blue)];
        for _ in 0..120 {
            evaluate_targets(&mut targets, &beams, SIM_DT, 1.0);
        }
        assert!(!targets[0].is_hit);
        assert!(!targets[0].satisfied);
        assert_eq!(targets[0].hit_timer, 0.0);

        evaluate_targets(&mut targets, &[beam(BeamColor::Red)], SIM_DT, 1.0);
        assert!(targets[0].is_hit);
    }

    #[test]
    fn test_any_accepts_every_color() {
        for color in [BeamColor::Red, BeamColor::Yellow, BeamColor::Green] {
            let mut targets = vec![target_on_beam(TargetColor::Any)];
            evaluate_targets(&mut targets, &[beam(color)], SIM_DT, 1.0);
            assert!(targets[0].is_hit);
        }
    }

    #[test]
    fn test_ping_once_per_coverage_run() {
        let mut targets = vec![target_on_beam(TargetColor::Any)];
        let beams = [beam(BeamColor::White)];

        let report = evaluate_targets(&mut targets, &beams, SIM_DT, 1.0);
        assert_eq!(report.pinged, vec![0]);
        let report = evaluate_targets(&mut targets, &beams, SIM_DT, 1.0);
        assert!(report.pinged.is_empty());

        // Partial decay keeps the ping latched
        evaluate_targets(&mut targets, &[], SIM_DT, 1.0);
        let report = evaluate_targets(&mut targets, &beams, SIM_DT, 1.0);
        assert!(report.pinged.is_empty());

        // Full decay re-arms it
        for _ in 0..10 {
            evaluate_targets(&mut targets, &[], SIM_DT, 1.0);
        }
        assert_eq!(targets[0].hit_timer, 0.0);
        let report = evaluate_targets(&mut targets, &beams, SIM_DT, 1.0);
        assert_eq!(report.pinged, vec![0]);
    }

    #[test]
    fn test_segment_clipped_to_length() {
        let mut targets = vec![target_on_beam(TargetColor::Any)];
        let short = BeamSegment {
            from: Vec2::new(0.0, 100.0),
            to: Vec2::new(400.0, 100.0),
            color: BeamColor::White,
        };
        evaluate_targets(&mut targets, &[short], SIM_DT, 1.0);
        assert!(!targets[0].is_hit);
    }

    #[test]
    fn test_no_targets_never_complete() {
        let mut targets: Vec<Target> = Vec::new();
        let report = evaluate_targets(&mut targets, &[beam(BeamColor::White)], SIM_DT, 1.0);
        assert!(!report.all_satisfied);
    }

    #[test]
    fn test_all_targets_needed() {
        let mut targets = vec![
            target_on_beam(TargetColor::Any),
            Target::new(1, Vec2::new(500.0, 800.0), TargetColor::Any),
        ];
        let beams = [beam(BeamColor::White)];
        for _ in 0..120 {
            let report = evaluate_targets(&mut targets, &beams, SIM_DT, 1.0);
            assert!(!report.all_satisfied);
        }
        assert!(targets[0].satisfied);
        assert!(!targets[1].satisfied);
    }
}
