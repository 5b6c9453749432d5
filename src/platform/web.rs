//! Browser host API
//!
//! The page owns the canvas, input handling and `requestAnimationFrame`;
//! it forwards timestamps and pointer/keyboard actions here and renders the
//! JSON view returned by `view()`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::LocalStorage;
use crate::consts::*;
use crate::session::Session;
use crate::sim::LevelSet;

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebSession {
    inner: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// Start a session over `levels_json`, or the built-in set when absent
    #[wasm_bindgen(constructor)]
    pub fn new(levels_json: Option<String>) -> Result<WebSession, JsValue> {
        console_error_panic_hook::set_once();
        // A second session on the same page keeps the first logger
        let _ = console_log::init_with_level(log::Level::Info);

        let levels = match levels_json {
            Some(json) => LevelSet::from_json(&json),
            None => LevelSet::builtin(),
        }
        .map_err(to_js)?;
        let inner = Session::new(levels, Box::new(LocalStorage)).map_err(to_js)?;
        log::info!("Mirror Maze running!");
        Ok(Self { inner })
    }

    /// Feed a `requestAnimationFrame` timestamp; returns the events as JSON
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let events = self.inner.frame_at(now_ms);
        serde_json::to_string(&events).map_err(to_js)
    }

    /// Everything needed to draw the current frame, as JSON
    pub fn view(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.view()).map_err(to_js)
    }

    pub fn start_level(&mut self, index: usize, force_fresh: bool) -> Result<(), JsValue> {
        self.inner.start_level(index, force_fresh).map_err(to_js)
    }

    pub fn restart(&mut self) {
        self.inner.restart();
    }

    pub fn next_level(&mut self) -> bool {
        self.inner.next_level()
    }

    // Pointer input, in board coordinates

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.inner.begin_drag(Vec2::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.inner.drag_to(Vec2::new(x, y))
    }

    pub fn pointer_up(&mut self) -> bool {
        self.inner.end_drag()
    }

    /// Mouse wheel / Q-E keys: `steps` of the rotate step, snapped when `snap`
    pub fn rotate(&mut self, steps: f32, snap: bool) -> bool {
        self.inner.rotate_selected(steps * ROTATE_STEP_DEG, snap)
    }

    /// Arrow keys; `large` for shift-held nudges
    pub fn nudge(&mut self, dx: f32, dy: f32, large: bool) -> bool {
        let step = if large { NUDGE_STEP_LARGE } else { NUDGE_STEP };
        self.inner.nudge_selected(Vec2::new(dx, dy) * step)
    }

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    pub fn request_hint(&mut self) -> bool {
        self.inner.request_hint()
    }

    pub fn toggle_sound(&mut self) -> bool {
        let mut on = false;
        self.inner.update_settings(|s| on = s.toggle_sound());
        on
    }

    pub fn toggle_high_contrast(&mut self) -> bool {
        let mut on = false;
        self.inner.update_settings(|s| on = s.toggle_high_contrast());
        on
    }

    pub fn toggle_reduced_motion(&mut self) -> bool {
        let mut on = false;
        self.inner.update_settings(|s| on = s.toggle_reduced_motion());
        on
    }
}
