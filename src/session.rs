//! Level lifecycle
//!
//! `Session` is the object a host drives: it owns the level set, the live
//! scene, undo history and persisted progress, turns frame callbacks into
//! fixed ticks, and reports what happened as `SessionEvent`s.

use glam::Vec2;
use serde::Serialize;
use thiserror::Error;

use crate::consts::*;
use crate::history::History;
use crate::persistence::Progress;
use crate::platform::Storage;
use crate::best_times::format_time;
use crate::settings::{BEAM_GLOW, PIECE_GLOW, Settings};
use crate::sim::level::PieceBudget;
use crate::sim::{
    BeamSegment, FrameClock, Level, LevelError, LevelSet, Piece, PieceKind, Scene, SimEvent,
    Snapshot, Target, tick,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("no level at index {index} (set has {count})")]
    NoSuchLevel { index: usize, count: usize },
}

/// Notifications for the host (announcements, sound, overlays)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    LevelLoaded { index: usize, id: u32, name: String },
    TargetPinged { target: u32 },
    LevelComplete { index: usize, time: f32, new_best: bool },
    /// The last level was completed
    AllLevelsComplete,
    HintUnlocked,
    /// `hint` indexes the level's hint pieces
    HintShown { hint: usize },
}

/// A hint piece projected on the board for a few seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HintGhost {
    pub piece: Piece,
    pub remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingAction {
    Advance(usize),
    Finale,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    action: PendingAction,
    remaining: f32,
}

#[derive(Debug, Clone)]
struct Drag {
    id: u32,
    /// Piece center minus the grab point
    offset: Vec2,
    before: Snapshot,
}

/// What a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<'a> {
    pub level_index: usize,
    pub level_id: u32,
    pub level_name: &'a str,
    pub timer: f32,
    /// `timer` as `MM:SS`
    pub timer_text: String,
    pub completed: bool,
    pub beams: &'a [BeamSegment],
    pub targets: &'a [Target],
    pub pieces: &'a [Piece],
    /// Placed mirrors and splitters, against the level's budget
    pub mirrors: usize,
    pub splitters: usize,
    pub available_pieces: PieceBudget,
    pub selected: Option<u32>,
    pub hint: Option<&'a Piece>,
    pub hint_unlocked: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub best_time: Option<f32>,
    pub settings: &'a Settings,
    /// Glow radii, zero under reduced motion
    pub beam_glow: f32,
    pub piece_glow: f32,
}

/// One player's run through a level set
pub struct Session {
    levels: LevelSet,
    level_index: usize,
    scene: Scene,
    history: History,
    clock: FrameClock,
    progress: Progress,
    storage: Box<dyn Storage>,
    /// Piece ids stay unique across every level of the session
    next_piece_id: u32,
    selected: Option<u32>,
    drag: Option<Drag>,
    idle: f32,
    hint_unlocked: bool,
    hint_index: usize,
    active_hint: Option<HintGhost>,
    pending: Option<Pending>,
    finished: bool,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Load progress from `storage` and open the level it points at
    pub fn new(levels: LevelSet, storage: Box<dyn Storage>) -> Result<Self, SessionError> {
        levels.validate()?;
        let progress = Progress::load(storage.as_ref());
        let index = progress.current_level_index.min(levels.len() - 1);
        let scene = Scene::new(levels.levels[index].clone(), levels.bounds, levels.common);

        let mut session = Self {
            levels,
            level_index: index,
            scene,
            history: History::new(),
            clock: FrameClock::new(),
            progress,
            storage,
            next_piece_id: 1,
            selected: None,
            drag: None,
            idle: 0.0,
            hint_unlocked: false,
            hint_index: 0,
            active_hint: None,
            pending: None,
            finished: false,
            events: Vec::new(),
        };
        session.load_level(index, false);
        Ok(session)
    }

    // === Level lifecycle ===

    /// Open a level; a saved placement is revived unless `force_fresh`
    pub fn start_level(&mut self, index: usize, force_fresh: bool) -> Result<(), SessionError> {
        if index >= self.levels.len() {
            return Err(SessionError::NoSuchLevel {
                index,
                count: self.levels.len(),
            });
        }
        self.load_level(index, force_fresh);
        Ok(())
    }

    /// Start the current level over with freshly spawned pieces
    pub fn restart(&mut self) {
        self.load_level(self.level_index, true);
    }

    /// Move on after a completion; on the last level this is the finale
    ///
    /// Returns false while the current level is unsolved.
    pub fn next_level(&mut self) -> bool {
        if !self.scene.completed {
            return false;
        }
        if self.is_last_level() {
            self.pending = None;
            self.finish();
        } else {
            self.load_level(self.level_index + 1, false);
        }
        true
    }

    fn load_level(&mut self, index: usize, force_fresh: bool) {
        let level = self.levels.levels[index].clone();
        let level_id = level.id;
        let name = level.name.clone();

        self.pending = None;
        self.finished = false;
        self.level_index = index;
        self.scene = Scene::new(level, self.levels.bounds, self.levels.common);
        self.scene.reserve_ids(self.next_piece_id);

        match self.progress.placement(level_id) {
            Some(saved) if !force_fresh => self.scene.restore(saved),
            _ => self.scene.spawn_pieces(),
        }

        self.history.clear();
        self.drag = None;
        self.selected = self.scene.pieces.first().map(|p| p.id);
        self.idle = 0.0;
        self.hint_unlocked = false;
        self.hint_index = 0;
        self.active_hint = None;

        self.progress.current_level_index = index;
        self.save_placement();

        log::info!("Level {} loaded: {}", level_id, name);
        self.events.push(SessionEvent::LevelLoaded {
            index,
            id: level_id,
            name,
        });
    }

    fn finish(&mut self) {
        self.finished = true;
        log::info!("All {} levels complete", self.levels.len());
        self.events.push(SessionEvent::AllLevelsComplete);
    }

    fn is_last_level(&self) -> bool {
        self.level_index + 1 >= self.levels.len()
    }

    // === Frame driving ===

    /// Feed elapsed wall-clock seconds; runs whole fixed ticks
    pub fn frame(&mut self, elapsed: f32) -> Vec<SessionEvent> {
        let steps = self.clock.advance(elapsed);
        self.run_steps(steps)
    }

    /// Feed a host timestamp in milliseconds (e.g. `requestAnimationFrame`)
    pub fn frame_at(&mut self, now_ms: f64) -> Vec<SessionEvent> {
        let steps = self.clock.advance_to(now_ms);
        self.run_steps(steps)
    }

    /// Events produced by edits since the last frame
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn run_steps(&mut self, steps: u32) -> Vec<SessionEvent> {
        for _ in 0..steps {
            self.step(SIM_DT);
        }
        self.take_events()
    }

    fn step(&mut self, dt: f32) {
        self.idle += dt;
        if self.idle >= HINT_IDLE_SECONDS && !self.hint_unlocked {
            self.unlock_hint();
        }

        if let Some(ghost) = &mut self.active_hint {
            ghost.remaining -= dt;
            if ghost.remaining <= 0.0 {
                self.active_hint = None;
            }
        }

        if let Some(pending) = &mut self.pending {
            pending.remaining -= dt;
            if pending.remaining <= 0.0 {
                let action = pending.action;
                self.pending = None;
                match action {
                    PendingAction::Advance(next) => self.load_level(next, false),
                    PendingAction::Finale => self.finish(),
                }
            }
        }

        for event in tick(&mut self.scene, dt) {
            match event {
                SimEvent::TargetPinged { target } => {
                    self.events.push(SessionEvent::TargetPinged { target });
                }
                SimEvent::LevelComplete { time } => self.complete_level(time),
            }
        }
    }

    fn complete_level(&mut self, time: f32) {
        let index = self.level_index;
        let new_best = self.progress.best_times.record(index, time);
        if new_best {
            log::info!("New best time for level {}: {:.2}s", self.scene.level.id, time);
        }
        self.events.push(SessionEvent::LevelComplete {
            index,
            time,
            new_best,
        });
        // Also persists the best time
        self.save_placement();

        self.pending = Some(if self.is_last_level() {
            Pending {
                action: PendingAction::Finale,
                remaining: FINALE_DELAY,
            }
        } else {
            Pending {
                action: PendingAction::Advance(index + 1),
                remaining: ADVANCE_DELAY,
            }
        });
    }

    // === Editing ===

    /// Select a piece by id (`None` clears the selection)
    pub fn select(&mut self, id: Option<u32>) -> bool {
        self.touch();
        match id {
            Some(id) if self.scene.piece(id).is_none() => false,
            _ => {
                self.selected = id;
                true
            }
        }
    }

    /// Pick the piece under `point` and start dragging it
    ///
    /// Clicking empty board clears the selection.
    pub fn begin_drag(&mut self, point: Vec2) -> bool {
        self.touch();
        let Some(id) = self.scene.piece_at(point) else {
            self.selected = None;
            return false;
        };
        let Some(piece) = self.scene.piece(id) else {
            return false;
        };
        self.selected = Some(id);
        self.drag = Some(Drag {
            id,
            offset: piece.pos - point,
            before: self.scene.snapshot(),
        });
        true
    }

    pub fn drag_to(&mut self, point: Vec2) -> bool {
        self.touch();
        match &self.drag {
            Some(drag) => {
                let (id, pos) = (drag.id, point + drag.offset);
                self.scene.move_piece(id, pos)
            }
            None => false,
        }
    }

    /// Finish a drag; only a drag that moved something becomes an undo step
    pub fn end_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.commit_edit(drag.before)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Rotate the selected piece by `degrees`
    pub fn rotate_selected(&mut self, degrees: f32, snap: bool) -> bool {
        self.touch();
        let Some(id) = self.selected else {
            return false;
        };
        let before = self.scene.snapshot();
        self.scene.rotate_piece(id, degrees, snap) && self.commit_edit(before)
    }

    /// Shift the selected piece by `delta`
    pub fn nudge_selected(&mut self, delta: Vec2) -> bool {
        self.touch();
        let Some(id) = self.selected else {
            return false;
        };
        let before = self.scene.snapshot();
        self.scene.nudge_piece(id, delta) && self.commit_edit(before)
    }

    pub fn undo(&mut self) -> bool {
        self.touch();
        match self.history.undo(self.scene.snapshot()) {
            Some(previous) => {
                self.restore(&previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.touch();
        match self.history.redo(self.scene.snapshot()) {
            Some(next) => {
                self.restore(&next);
                true
            }
            None => false,
        }
    }

    /// Move pieces onto the level's hint poses, matching by kind in order
    ///
    /// Returns how many pieces were placed. Recorded as a single undo step.
    pub fn apply_hint_solution(&mut self) -> usize {
        self.touch();
        let before = self.scene.snapshot();
        let mut placement = before.clone();
        let mut used = vec![false; placement.len()];
        let mut placed = 0;

        for hint in &self.scene.level.hint_pieces {
            let slot = placement
                .0
                .iter()
                .enumerate()
                .position(|(i, record)| !used[i] && record.kind == hint.kind);
            if let Some(i) = slot {
                used[i] = true;
                let record = &mut placement.0[i];
                record.x = hint.x;
                record.y = hint.y;
                record.angle = hint.angle_deg.to_radians();
                placed += 1;
            }
        }

        self.scene.restore(&placement);
        self.commit_edit(before);
        placed
    }

    fn commit_edit(&mut self, before: Snapshot) -> bool {
        if self.scene.snapshot() == before {
            return false;
        }
        self.history.record(before);
        self.save_placement();
        true
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.scene.restore(snapshot);
        if self.selected.is_some_and(|id| self.scene.piece(id).is_none()) {
            self.selected = self.scene.pieces.first().map(|p| p.id);
        }
        self.save_placement();
    }

    // === Hints ===

    /// Project the next hint piece; unlocks hints if still locked
    pub fn request_hint(&mut self) -> bool {
        self.touch();
        if !self.hint_unlocked {
            self.unlock_hint();
        }

        let hints = &self.scene.level.hint_pieces;
        if hints.is_empty() {
            return false;
        }
        if self.hint_index >= hints.len() {
            self.hint_index = 0;
        }
        let hint = hints[self.hint_index];
        let shown = self.hint_index;
        self.hint_index += 1;

        self.active_hint = Some(HintGhost {
            piece: Piece::new(
                0,
                hint.kind,
                Vec2::new(hint.x, hint.y),
                hint.angle_deg.to_radians(),
                &self.scene.common,
            ),
            remaining: HINT_DURATION,
        });
        self.events.push(SessionEvent::HintShown { hint: shown });
        true
    }

    fn unlock_hint(&mut self) {
        self.hint_unlocked = true;
        log::debug!("Hint unlocked on level {}", self.scene.level.id);
        self.events.push(SessionEvent::HintUnlocked);
    }

    /// Any player input resets the idle timer
    fn touch(&mut self) {
        self.idle = 0.0;
    }

    // === Settings ===

    /// Change settings and persist them
    pub fn update_settings(&mut self, update: impl FnOnce(&mut Settings)) {
        update(&mut self.progress.settings);
        self.persist();
    }

    // === Persistence ===

    fn save_placement(&mut self) {
        self.next_piece_id = self.next_piece_id.max(self.scene.peek_next_id());
        self.progress
            .set_placement(self.scene.level.id, self.scene.snapshot());
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.progress.save(self.storage.as_mut()) {
            log::warn!("Unable to save progress: {}", e);
        }
    }

    // === Accessors ===

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            level_index: self.level_index,
            level_id: self.scene.level.id,
            level_name: &self.scene.level.name,
            timer: self.scene.timer,
            timer_text: format_time(self.scene.timer),
            completed: self.scene.completed,
            beams: &self.scene.beams,
            targets: &self.scene.targets,
            pieces: &self.scene.pieces,
            mirrors: self.scene.count(PieceKind::Mirror),
            splitters: self.scene.count(PieceKind::Splitter),
            available_pieces: self.scene.level.available_pieces,
            selected: self.selected,
            hint: self.active_hint.as_ref().map(|g| &g.piece),
            hint_unlocked: self.hint_unlocked,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            best_time: self.progress.best_times.get(self.level_index),
            settings: &self.progress.settings,
            beam_glow: self.progress.settings.effective_glow(BEAM_GLOW),
            piece_glow: self.progress.settings.effective_glow(PIECE_GLOW),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn level(&self) -> &Level {
        &self.scene.level
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn settings(&self) -> &Settings {
        &self.progress.settings
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn active_hint(&self) -> Option<&HintGhost> {
        self.active_hint.as_ref()
    }

    pub fn hint_unlocked(&self) -> bool {
        self.hint_unlocked
    }

    /// The finale was reached
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
