//! Per-frame input resource.
//!
//! Captures the actions the game cares about and exposes them to systems via
//! the [`InputState`] resource. Hardware polling lives outside the engine
//! core; the headless demo fills the state from a [`ScriptedInput`] timeline.
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Boolean action state with edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolState {
    /// Whether the action is currently active this frame.
    pub active: bool,
    /// Whether the action became active this frame.
    pub just_pressed: bool,
    /// Whether the action stopped being active this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Feed this frame's raw state, deriving the edges from the previous one.
    pub fn set(&mut self, active: bool) {
        self.just_pressed = active && !self.active;
        self.just_released = !active && self.active;
        self.active = active;
    }
}

/// Resource capturing the per-frame action state relevant to gameplay.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub up: BoolState,
    pub down: BoolState,
    pub left: BoolState,
    pub right: BoolState,
    pub attack: BoolState,
}

impl InputState {
    pub fn apply(&mut self, step: &ScriptStep) {
        self.up.set(step.up);
        self.down.set(step.down);
        self.left.set(step.left);
        self.right.set(step.right);
        self.attack.set(step.attack);
    }
}

/// Actions held for a number of frames.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptStep {
    pub frames: u32,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub attack: bool,
}

/// Timeline of input steps played back one frame at a time.
#[derive(Resource, Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    step: usize,
    frame_in_step: u32,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            step: 0,
            frame_in_step: 0,
        }
    }

    /// Index of the step the next frame plays, skipping exhausted ones.
    fn pending(&self) -> (usize, u32) {
        let (mut step, mut frame) = (self.step, self.frame_in_step);
        while step < self.steps.len() && frame >= self.steps[step].frames {
            step += 1;
            frame = 0;
        }
        (step, frame)
    }

    /// Step for the current frame, advancing the timeline. Returns `None`
    /// once every step has been played.
    pub fn next_frame(&mut self) -> Option<&ScriptStep> {
        let (step, frame) = self.pending();
        self.step = step;
        self.frame_in_step = frame.saturating_add(1);
        self.steps.get(step)
    }

    pub fn is_finished(&self) -> bool {
        self.pending().0 >= self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_derived_from_the_previous_frame() {
        let mut s = BoolState::default();
        s.set(true);
        assert!(s.active && s.just_pressed && !s.just_released);
        s.set(true);
        assert!(s.active && !s.just_pressed);
        s.set(false);
        assert!(!s.active && s.just_released);
    }

    #[test]
    fn script_plays_each_step_for_its_frames() {
        let mut script = ScriptedInput::new(vec![
            ScriptStep {
                frames: 2,
                right: true,
                ..Default::default()
            },
            ScriptStep {
                frames: 0,
                up: true,
                ..Default::default()
            },
            ScriptStep {
                frames: 1,
                attack: true,
                ..Default::default()
            },
        ]);
        assert!(script.next_frame().unwrap().right);
        assert!(script.next_frame().unwrap().right);
        assert!(!script.is_finished());
        assert!(script.next_frame().unwrap().attack);
        assert!(script.is_finished());
        assert!(script.next_frame().is_none());
    }
}
