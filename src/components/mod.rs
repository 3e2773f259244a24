//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the game world.
//!
//! Submodules overview:
//! - [`attack`] – marker for entities whose hitboxes follow the attack input
//! - [`collider`] – tagged axis-aligned collider, tag bitmask and grid keys
//! - [`collidercollection`] – several colliders under one owner
//! - [`facing`] – direction an entity looks at
//! - [`health`] – hit points and death handling
//! - [`inputcontrolled`] – input-driven movement speed
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`rigidbody`] – simple kinematic body storing velocity

pub mod attack;
pub mod collider;
pub mod collidercollection;
pub mod facing;
pub mod health;
pub mod inputcontrolled;
pub mod mapposition;
pub mod rigidbody;
