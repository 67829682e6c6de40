//! Pointer input and burst spawn policy.
//!
//! The host feeds [`InputEvent`]s into an [`InputState`] each frame. The
//! state answers two questions for the frame loop: where the cursor trail
//! spawns, and where click bursts spawn under the active [`SpawnPolicy`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// When click bursts are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// One burst per primary-button press, at the press position.
    #[default]
    OneShotBurst,
    /// A burst at the cursor on every frame the primary button is held.
    WhileHeld,
}

/// Discrete input from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a position in scene coordinates
    PointerMoved(Vec2),
    /// Pointer left the scene
    PointerLeft,
    /// Primary button went down at a position
    PrimaryPressed(Vec2),
    /// Primary button went up
    PrimaryReleased,
    /// Host asked the loop to stop
    Quit,
}

/// Pointer state accumulated from input events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last known pointer position, `None` while outside the scene
    cursor: Option<Vec2>,
    /// Whether the primary button is down
    held: bool,
    /// Press positions seen this frame
    presses: Vec<Vec2>,
    /// Whether a quit was requested
    quit: bool,
}

impl InputState {
    /// Create an empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame edge state. Call before feeding the frame's events.
    pub fn begin_frame(&mut self) {
        self.presses.clear();
    }

    /// Applies one event.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved(pos) => self.cursor = Some(pos),
            InputEvent::PointerLeft => self.cursor = None,
            InputEvent::PrimaryPressed(pos) => {
                self.cursor = Some(pos);
                self.held = true;
                self.presses.push(pos);
            },
            InputEvent::PrimaryReleased => self.held = false,
            InputEvent::Quit => self.quit = true,
        }
    }

    /// Current pointer position.
    #[must_use]
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Whether the primary button is down.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Whether the host asked to stop.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Positions to emit a click burst from this frame.
    #[must_use]
    pub fn burst_origins(&self, policy: SpawnPolicy) -> Vec<Vec2> {
        match policy {
            SpawnPolicy::OneShotBurst => self.presses.clone(),
            SpawnPolicy::WhileHeld => {
                let active = self.held || !self.presses.is_empty();
                match (active, self.cursor.or_else(|| self.presses.last().copied())) {
                    (true, Some(pos)) => vec![pos],
                    _ => Vec::new(),
                }
            },
        }
    }
}

/// Synthetic pointer input for headless runs.
///
/// Sweeps the cursor along a Lissajous curve across the scene and taps the
/// primary button at a fixed interval.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    /// Scene size (width, height)
    size: Vec2,
    /// Frames between presses (0 = never press)
    click_interval: u64,
    /// Frames the button stays down after a press
    hold_frames: u64,
}

impl ScriptedInput {
    /// Create a script over a scene of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32, click_interval: u64, hold_frames: u64) -> Self {
        Self {
            size: Vec2::new(width as f32, height as f32),
            click_interval,
            hold_frames,
        }
    }

    /// Cursor position on a given frame.
    #[must_use]
    pub fn cursor_at(&self, frame: u64) -> Vec2 {
        let t = frame as f32;
        let center = self.size * 0.5;
        let reach = self.size * 0.4;
        Vec2::new(
            center.x + reach.x * (t * 0.031).sin(),
            center.y + reach.y * (t * 0.047).sin(),
        )
        .round()
    }

    /// Events the pointer generates on a given frame.
    #[must_use]
    pub fn events_for_frame(&self, frame: u64) -> Vec<InputEvent> {
        let cursor = self.cursor_at(frame);
        let mut events = vec![InputEvent::PointerMoved(cursor)];

        if self.click_interval > 0 {
            let phase = frame % self.click_interval;
            if phase == 0 {
                events.push(InputEvent::PrimaryPressed(cursor));
            }
            if phase == self.hold_frames.min(self.click_interval - 1).max(1) {
                events.push(InputEvent::PrimaryReleased);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(state: &mut InputState, events: &[InputEvent]) {
        state.begin_frame();
        for &event in events {
            state.handle(event);
        }
    }

    #[test]
    fn test_one_shot_bursts_once_per_press() {
        let mut state = InputState::new();
        let pos = Vec2::new(10.0, 20.0);

        frame(&mut state, &[InputEvent::PrimaryPressed(pos)]);
        assert_eq!(state.burst_origins(SpawnPolicy::OneShotBurst), vec![pos]);

        // Still held, but no new press
        frame(&mut state, &[InputEvent::PointerMoved(Vec2::new(30.0, 30.0))]);
        assert!(state.is_held());
        assert!(state.burst_origins(SpawnPolicy::OneShotBurst).is_empty());
    }

    #[test]
    fn test_one_shot_counts_every_press_in_a_frame() {
        let mut state = InputState::new();
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(2.0, 2.0);
        frame(
            &mut state,
            &[
                InputEvent::PrimaryPressed(a),
                InputEvent::PrimaryReleased,
                InputEvent::PrimaryPressed(b),
            ],
        );
        assert_eq!(state.burst_origins(SpawnPolicy::OneShotBurst), vec![a, b]);
    }

    #[test]
    fn test_while_held_follows_cursor() {
        let mut state = InputState::new();
        frame(&mut state, &[InputEvent::PrimaryPressed(Vec2::new(5.0, 5.0))]);
        assert_eq!(
            state.burst_origins(SpawnPolicy::WhileHeld),
            vec![Vec2::new(5.0, 5.0)]
        );

        let moved = Vec2::new(50.0, 60.0);
        frame(&mut state, &[InputEvent::PointerMoved(moved)]);
        assert_eq!(state.burst_origins(SpawnPolicy::WhileHeld), vec![moved]);

        frame(&mut state, &[InputEvent::PrimaryReleased]);
        assert!(state.burst_origins(SpawnPolicy::WhileHeld).is_empty());
    }

    #[test]
    fn test_quick_tap_still_bursts_while_held_policy() {
        let mut state = InputState::new();
        let pos = Vec2::new(7.0, 8.0);
        frame(
            &mut state,
            &[InputEvent::PrimaryPressed(pos), InputEvent::PrimaryReleased],
        );
        assert_eq!(state.burst_origins(SpawnPolicy::WhileHeld), vec![pos]);
    }

    #[test]
    fn test_pointer_left_clears_cursor_and_quit_sticks() {
        let mut state = InputState::new();
        frame(&mut state, &[InputEvent::PointerMoved(Vec2::ONE)]);
        assert_eq!(state.cursor(), Some(Vec2::ONE));

        frame(&mut state, &[InputEvent::PointerLeft, InputEvent::Quit]);
        assert_eq!(state.cursor(), None);
        assert!(state.quit_requested());

        frame(&mut state, &[]);
        assert!(state.quit_requested());
    }

    #[test]
    fn test_script_stays_inside_scene() {
        let script = ScriptedInput::new(800, 600, 0, 0);
        for f in 0..2000 {
            let pos = script.cursor_at(f);
            assert!((0.0..=800.0).contains(&pos.x));
            assert!((0.0..=600.0).contains(&pos.y));
        }
    }

    #[test]
    fn test_script_press_release_cycle() {
        let script = ScriptedInput::new(800, 600, 30, 5);
        let presses = |f| {
            script
                .events_for_frame(f)
                .iter()
                .filter(|e| matches!(e, InputEvent::PrimaryPressed(_)))
                .count()
        };
        assert_eq!(presses(0), 1);
        assert_eq!(presses(1), 0);
        assert_eq!(presses(30), 1);
        assert!(script
            .events_for_frame(5)
            .contains(&InputEvent::PrimaryReleased));
    }

    #[test]
    fn test_script_without_clicks() {
        let script = ScriptedInput::new(800, 600, 0, 10);
        for f in 0..100 {
            assert_eq!(script.events_for_frame(f).len(), 1);
        }
    }
}
