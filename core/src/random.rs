//! Injectable entropy used by generation and flicker updates.

use rand::{Rng, RngCore};

/// Source of uniformly distributed randomness.
///
/// Implementors only provide [`RandomSource::next_unit`]; the helpers derive
/// every other draw from it so that scripted sources stay trivial. Every
/// [`RngCore`] is a random source, which lets callers hand in seeded
/// generators such as `ChaCha8Rng`.
pub trait RandomSource {
    /// Next float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Integer in `[min, max)`. Returns `min` when the range is empty.
    fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = f64::from(max) - f64::from(min);
        let offset = (self.next_unit() * span).floor() as i32;
        min.saturating_add(offset).min(max - 1)
    }

    /// Index in `[0, len)`. Returns zero for an empty range.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let index = (self.next_unit() * len as f64).floor() as usize;
        index.min(len - 1)
    }

    /// Float in `[min, max)`.
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        let unit = self.next_unit() as f32;
        min + (max - min) * unit
    }

    /// Returns `true` with the provided probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}

impl<R> RandomSource for R
where
    R: RngCore + ?Sized,
{
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::RandomSource;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn range_i32_stays_inside_half_open_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..1_000 {
            let value = rng.range_i32(-3, 4);
            assert!((-3..4).contains(&value));
        }
    }

    #[test]
    fn empty_ranges_collapse_to_lower_bound() {
        let mut source = Fixed(0.99);
        assert_eq!(source.range_i32(5, 5), 5);
        assert_eq!(source.range_i32(5, 2), 5);
        assert_eq!(source.index(0), 0);
    }

    #[test]
    fn upper_unit_draw_maps_to_last_slot() {
        let mut source = Fixed(0.999_999);
        assert_eq!(source.range_i32(0, 10), 9);
        assert_eq!(source.index(4), 3);
    }

    #[test]
    fn range_f32_interpolates_unit_draw() {
        let mut source = Fixed(0.5);
        assert!((source.range_f32(0.8, 1.2) - 1.0).abs() < 1e-6);
    }
}
