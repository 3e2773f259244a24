//! Scripted input playback.
//!
//! Stands in for hardware polling in the headless demo: each frame the next
//! [`ScriptStep`](crate::resources::input::ScriptStep) is copied into
//! [`InputState`]. Once the script runs out every action is released.
use bevy_ecs::prelude::*;

use crate::resources::input::{InputState, ScriptStep, ScriptedInput};

pub fn play_scripted_input(mut script: ResMut<ScriptedInput>, mut input: ResMut<InputState>) {
    match script.next_frame() {
        Some(step) => input.apply(step),
        None => input.apply(&ScriptStep::default()),
    }
}
