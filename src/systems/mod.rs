//! Engine systems.
//!
//! This module groups all ECS systems that advance simulation and input.
//!
//! Submodules overview
//! - [`attack`] – enable the attack hitbox matching the facing direction
//! - [`camera`] – follow the camera target and clamp to the map
//! - [`collision`] – keep the collision grid in sync and detect hitbox overlaps
//! - [`input`] – feed scripted input into [`crate::resources::input::InputState`]
//! - [`inputsimplecontroller`] – translate input state into velocity on entities
//! - [`movement`] – resolve rigid body displacement against blocking colliders
//! - [`time`] – update simulation time and delta

pub mod attack;
pub mod camera;
pub mod collision;
pub mod input;
pub mod inputsimplecontroller;
pub mod movement;
pub mod time;
