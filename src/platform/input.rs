//! Input mapping
//!
//! Raw key and mouse events are folded into one `FrameInput` per frame, so
//! the step sees every request exactly once.

use crate::sim::{FrameInput, ShotKind};

/// Angle change per key press (degrees)
pub const ANGLE_STEP: i32 = 5;

/// A raw event from the windowing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(char),
    MouseDown,
    MouseUp,
}

/// Accumulates events between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pending: FrameInput,
}

impl InputState {
    pub fn handle(&mut self, event: InputEvent) {
        let input = &mut self.pending;
        match event {
            InputEvent::MouseDown => input.fire += 1,
            InputEvent::MouseUp => {}
            InputEvent::Key(key) => match key.to_ascii_lowercase() {
                '1' => input.select_shot = Some(ShotKind::Pistol),
                '2' => input.select_shot = Some(ShotKind::Artillery),
                '3' => input.select_shot = Some(ShotKind::Fireball),
                '4' => input.select_shot = Some(ShotKind::Laser),
                '+' | '=' => input.power_delta += 1,
                '-' => input.power_delta -= 1,
                'w' => input.angle_delta += ANGLE_STEP,
                's' => input.angle_delta -= ANGLE_STEP,
                ']' => input.cycle_launcher += 1,
                '[' => input.cycle_launcher -= 1,
                // Two presses in one frame cancel out
                'p' => input.toggle_pause = !input.toggle_pause,
                'r' => input.reset = true,
                ' ' => input.fire += 1,
                _ => {}
            },
        }
    }

    /// Hand over everything collected since the last call
    pub fn take(&mut self) -> FrameInput {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_to_requests() {
        let mut state = InputState::default();
        for event in [
            InputEvent::Key('3'),
            InputEvent::Key('+'),
            InputEvent::Key('+'),
            InputEvent::Key('W'),
            InputEvent::MouseDown,
            InputEvent::MouseUp,
            InputEvent::MouseDown,
        ] {
            state.handle(event);
        }

        let input = state.take();
        assert_eq!(input.select_shot, Some(ShotKind::Fireball));
        assert_eq!(input.power_delta, 2);
        assert_eq!(input.angle_delta, ANGLE_STEP);
        assert_eq!(input.fire, 2);
        assert!(!state.has_pending());
    }

    #[test]
    fn test_last_selection_wins() {
        let mut state = InputState::default();
        state.handle(InputEvent::Key('1'));
        state.handle(InputEvent::Key('4'));
        assert_eq!(state.take().select_shot, Some(ShotKind::Laser));
    }

    #[test]
    fn test_double_pause_cancels() {
        let mut state = InputState::default();
        state.handle(InputEvent::Key('p'));
        state.handle(InputEvent::Key('p'));
        assert!(!state.take().toggle_pause);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut state = InputState::default();
        state.handle(InputEvent::Key('z'));
        assert!(!state.has_pending());
    }
}
