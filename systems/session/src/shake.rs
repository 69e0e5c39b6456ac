use glam::Vec2;
use sanity_maze_core::RandomSource;

/// Screen shake started when the player reaches an exit or collects an item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenShake {
    intensity: f32,
    remaining: f32,
}

impl ScreenShake {
    /// Shakes by up to `intensity` pixels for `duration` seconds.
    #[must_use]
    pub const fn new(intensity: f32, duration: f32) -> Self {
        Self {
            intensity,
            remaining: duration,
        }
    }

    /// Largest offset in pixels along each axis.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Seconds left before the shake stops.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whether the shake is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Counts `dt` seconds down.
    pub fn advance(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
    }

    /// Random viewport offset for this frame; zero once the shake is over.
    pub fn offset<R>(&self, rng: &mut R) -> Vec2
    where
        R: RandomSource + ?Sized,
    {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        Vec2::new(
            rng.range_f32(-self.intensity, self.intensity),
            rng.range_f32(-self.intensity, self.intensity),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn offset_spans_both_directions() {
        let shake = ScreenShake::new(10.0, 1.0);

        assert_eq!(shake.offset(&mut Fixed(0.0)), Vec2::splat(-10.0));
        assert_eq!(shake.offset(&mut Fixed(0.5)), Vec2::ZERO);
    }

    #[test]
    fn expires_after_duration() {
        let mut shake = ScreenShake::new(10.0, 1.0);
        shake.advance(0.6);
        assert!(shake.is_active());

        shake.advance(0.6);
        assert!(!shake.is_active());
        assert_eq!(shake.remaining(), 0.0);
        assert_eq!(shake.offset(&mut Fixed(0.0)), Vec2::ZERO);
    }
}
