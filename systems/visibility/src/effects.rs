use glam::Vec2;
use sanity_maze_core::{RandomSource, TileCoord, VisibilityTuning};

/// Light flicker applied to item tiles.
///
/// The intensity is re-rolled once the accumulated time exceeds the
/// interval, after which the accumulator restarts from zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Flicker {
    intensity: f32,
    elapsed: f32,
    interval: f32,
    min: f32,
    max: f32,
}

impl Flicker {
    /// Creates a steady flicker at full intensity.
    #[must_use]
    pub fn new(tuning: &VisibilityTuning) -> Self {
        Self {
            intensity: 1.0,
            elapsed: 0.0,
            interval: tuning.flicker_interval,
            min: tuning.flicker_min,
            max: tuning.flicker_max,
        }
    }

    /// Accumulates `dt` seconds, drawing a new intensity when the interval elapses.
    pub fn advance<R>(&mut self, dt: f32, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        self.elapsed += dt.max(0.0);
        if self.elapsed > self.interval {
            self.elapsed = 0.0;
            self.intensity = rng.range_f32(self.min, self.max);
        }
    }

    /// Current multiplier.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }
}

/// Wave distortion that shifts every tile by a time-varying offset.
#[derive(Clone, Debug, PartialEq)]
pub struct Distortion {
    enabled: bool,
    time: f32,
    intensity: f32,
}

impl Distortion {
    /// Creates the distortion described by `tuning`.
    #[must_use]
    pub fn new(tuning: &VisibilityTuning) -> Self {
        Self {
            enabled: tuning.distortion_enabled,
            time: 0.0,
            intensity: tuning.distortion_intensity,
        }
    }

    /// Advances the wave phase.
    pub fn advance(&mut self, dt: f32) {
        self.time += dt.max(0.0);
    }

    /// Turns the effect on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the effect is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Accumulated phase in seconds.
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    /// Pixel offset for `tile`; zero while disabled.
    #[must_use]
    pub fn offset(&self, tile: TileCoord, tile_size: f32) -> Vec2 {
        if !self.enabled {
            return Vec2::ZERO;
        }
        let amplitude = self.intensity * tile_size;
        Vec2::new(
            (self.time * 2.0 + tile.y() as f32 * 0.1).sin() * amplitude,
            (self.time * 3.0 + tile.x() as f32 * 0.1).cos() * amplitude,
        )
    }
}
