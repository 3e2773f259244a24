use bevy_ecs::prelude::Resource;

/// Longest step a single frame may take, in unscaled seconds. Longer frames
/// (debugger pauses, window drags) are cut down so movers cannot skip past
/// thin blockers in one step.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Simulation clock advanced once per scene tick.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Scaled seconds since the scene started.
    pub elapsed: f32,
    /// Scaled seconds of the current frame.
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Start a new frame of `dt` unscaled seconds and return the scaled delta.
    ///
    /// Negative or non-finite input counts as a zero-length frame.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };
        self.delta = dt * self.time_scale;
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_scales_and_counts_frames() {
        let mut time = WorldTime::default().with_time_scale(0.5);
        assert_eq!(time.advance(0.1), 0.05);
        assert_eq!(time.advance(0.1), 0.05);
        assert_eq!(time.frame_count, 2);
        assert!((time.elapsed - 0.1).abs() < 1e-6);
    }

    #[test]
    fn bad_deltas_are_tamed() {
        let mut time = WorldTime::default();
        assert_eq!(time.advance(f32::NAN), 0.0);
        assert_eq!(time.advance(-1.0), 0.0);
        assert_eq!(time.advance(10.0), MAX_FRAME_DELTA);
        assert_eq!(time.frame_count, 3);
    }
}
