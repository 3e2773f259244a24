//! tilebox library.
//!
//! A 2D axis-aligned collision and movement-resolution engine on top of
//! `bevy_ecs`: a uniform-grid broad-phase keyed by tagged colliders, a
//! per-axis sweep-and-resolve movement step, and the lifecycle systems that
//! keep the grid in step with the world every frame.
//!
//! - [`bounds`] – axis-aligned rectangle math
//! - [`components`] – colliders, positions, bodies and demo game components
//! - [`resources`] – the collision grid, time, input, camera and config
//! - [`systems`] – movement resolver, collision lifecycle and demo systems
//! - [`events`] – hitbox collision events and observers
//! - [`scene`] – world ownership and ordered frame phases
//! - [`level`], [`game`] – JSON level layout and demo setup

pub mod bounds;
pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod level;
pub mod resources;
pub mod scene;
pub mod systems;
