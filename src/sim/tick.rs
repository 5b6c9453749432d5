//! Fixed timestep simulation tick
//!
//! One tick retraces the beams and advances target coverage. The frame clock
//! turns irregular host frame times into a whole number of fixed ticks.

use super::state::Scene;
use super::targets::evaluate_targets;
use super::trace::trace;
use crate::consts::*;

/// Things the host may want to react to (sound, announcements, HUD)
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A target started being lit
    TargetPinged { target: u32 },
    /// Every target satisfied; fired once per scene
    LevelComplete { time: f32 },
}

/// Advance the scene by one fixed timestep
pub fn tick(scene: &mut Scene, dt: f32) -> Vec<SimEvent> {
    if !scene.completed {
        scene.timer += dt;
    }

    let traced = trace(scene);
    scene.beams = traced.segments;

    let report = evaluate_targets(&mut scene.targets, &scene.beams, dt, TARGET_HOLD_SECONDS);

    let mut events: Vec<SimEvent> = report
        .pinged
        .into_iter()
        .map(|target| SimEvent::TargetPinged { target })
        .collect();

    if report.all_satisfied && !scene.completed {
        scene.completed = true;
        log::info!(
            "Level {} complete in {:.2}s",
            scene.level.id,
            scene.timer
        );
        events.push(SimEvent::LevelComplete { time: scene.timer });
    }

    events
}

/// Fixed-step accumulator fed by the host's frame callback
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a host timestamp in milliseconds; returns the number of ticks to run
    ///
    /// The first call only establishes the time base.
    pub fn advance_to(&mut self, now_ms: f64) -> u32 {
        let elapsed = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.advance(elapsed)
    }

    /// Feed elapsed seconds; returns the number of ticks to run
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= SIM_DT {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }

    /// Leftover time below one tick
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    /// Forget the time base (after the host was suspended)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}
