//! Event types and observers used by the engine.
//!
//! Submodules:
//! - [`collision`] – hitbox overlap notifications and the default damage observer
pub mod collision;
