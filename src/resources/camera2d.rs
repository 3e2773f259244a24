//! Shared 2D camera resource.
//!
//! The camera position is the world point shown at the center of the screen.
//! When `bounds` is set the camera never shows anything outside them: its
//! position is clamped into `bounds` shrunk by half the visible area on each
//! side. A map narrower than the view is centered instead.

use bevy_ecs::prelude::{Entity, Resource};
use glam::Vec2;

use crate::bounds::Bounds;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// World point at the center of the screen.
    pub position: Vec2,
    pub zoom: f32,
    /// Render target size in pixels.
    pub viewport: Vec2,
    /// Area the camera may show.
    pub bounds: Option<Bounds>,
    /// Entity to keep centered.
    pub target: Option<Entity>,
}

impl Camera2D {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport,
            bounds: None,
            target: None,
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    /// World-space size of the visible area.
    pub fn view_size(&self) -> Vec2 {
        self.viewport / self.zoom.max(f32::EPSILON)
    }

    /// World-space rectangle currently on screen.
    pub fn visible_bounds(&self) -> Bounds {
        let view = self.view_size();
        Bounds::from_position_size(self.position - view * 0.5, view)
    }

    /// Positions the camera may take without showing anything outside `bounds`.
    pub fn position_bounds(&self) -> Option<Bounds> {
        let bounds = self.bounds?;
        let view = self.view_size();
        let axis = |lo: f32, len: f32, view: f32| {
            if len <= view {
                (lo + len * 0.5, 0.0)
            } else {
                (lo + view * 0.5, len - view)
            }
        };
        let (x, w) = axis(bounds.x, bounds.width, view.x);
        let (y, h) = axis(bounds.y, bounds.height, view.y);
        Some(Bounds::new(x, y, w, h))
    }

    pub fn center_on(&mut self, point: Vec2) {
        self.position = point;
        self.clamp_to_bounds();
    }

    pub fn clamp_to_bounds(&mut self) {
        if let Some(allowed) = self.position_bounds() {
            self.position = allowed.clamp(self.position);
        }
    }
}
