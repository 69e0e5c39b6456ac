use glam::Vec2;
use sanity_maze_core::VisibilityTuning;

/// Radial darkening drawn over the whole viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vignette {
    /// Centre of the gradient in viewport pixels.
    pub centre: Vec2,
    /// Radius inside which the view stays clear.
    pub inner_radius: f32,
    /// Radius at which darkness reaches `max_alpha`.
    pub outer_radius: f32,
    /// Opacity of the darkest ring.
    pub max_alpha: f32,
}

impl Vignette {
    /// Darkness at `point`, interpolated linearly between the two radii.
    #[must_use]
    pub fn alpha_at(&self, point: Vec2) -> f32 {
        let distance = point.distance(self.centre);
        let span = self.outer_radius - self.inner_radius;
        if span <= 0.0 {
            return if distance >= self.outer_radius {
                self.max_alpha
            } else {
                0.0
            };
        }
        ((distance - self.inner_radius) / span).clamp(0.0, 1.0) * self.max_alpha
    }
}

/// Colour channel split shown while sanity is low.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aberration {
    /// Shift as a fraction of the viewport size.
    pub intensity: f32,
    /// Whole-pixel shift derived from the viewport size.
    pub shift: Vec2,
}

/// Screen-space effects for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostProcessing {
    /// Always-on vignette.
    pub vignette: Vignette,
    /// Chromatic aberration, present below the sanity threshold.
    pub aberration: Option<Aberration>,
}

impl PostProcessing {
    /// Effects for a viewport of `viewport` pixels at the given sanity.
    #[must_use]
    pub fn for_sanity(
        viewport: Vec2,
        sanity: f32,
        sanity_max: f32,
        tuning: &VisibilityTuning,
    ) -> Self {
        let short_side = viewport.x.min(viewport.y);
        let vignette = Vignette {
            centre: viewport / 2.0,
            inner_radius: short_side * tuning.vignette_inner,
            outer_radius: short_side * tuning.vignette_outer,
            max_alpha: tuning.vignette_strength,
        };

        let ratio = if sanity_max > 0.0 {
            (sanity / sanity_max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let aberration = (ratio < tuning.aberration_threshold).then(|| {
            let intensity = tuning.aberration_base + (1.0 - ratio) * tuning.aberration_scale;
            Aberration {
                intensity,
                shift: (viewport * intensity).floor(),
            }
        });

        Self {
            vignette,
            aberration,
        }
    }
}
