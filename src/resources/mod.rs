//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution.
//!
//! Overview
//! - `camera2d` – 2D camera following a target inside the map bounds
//! - `collisiongrid` – uniform-grid broad-phase over all active colliders
//! - `gameconfig` – settings loaded from `config.ini`
//! - `input` – per-frame action state and scripted input playback
//! - `worldtime` – simulation time and delta
pub mod camera2d;
pub mod collisiongrid;
pub mod gameconfig;
pub mod input;
pub mod worldtime;
