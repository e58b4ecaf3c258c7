use brickyard_common::{Aabb, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Uniform scale plus translation that normalises a model: `p' = p * scale + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFit {
    pub scale: f32,
    pub translation: Vec3,
}

impl Default for ScaleFit {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ScaleFit {
    pub const IDENTITY: ScaleFit = ScaleFit {
        scale: 1.0,
        translation: Vec3::ZERO,
    };

    /// Map a point through the fit.
    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        p * self.scale + self.translation
    }

    /// Bounds of the fitted model.
    pub fn apply_to_bounds(&self, bounds: &Aabb) -> Aabb {
        bounds.scaled_translated(self.scale, self.translation)
    }

    /// Fit `self` first, then `next`.
    pub fn then(&self, next: &ScaleFit) -> ScaleFit {
        ScaleFit {
            scale: self.scale * next.scale,
            translation: self.translation * next.scale + next.translation,
        }
    }

    /// Root transform that places the normalised model with its ground-centre at `anchor`.
    pub fn to_transform(&self, anchor: Vec3) -> Transform {
        Transform {
            position: anchor + self.translation,
            scale: Vec3::splat(self.scale),
            ..Transform::default()
        }
    }
}

/// Fit a model so its height equals `target_height`, centred on the origin
/// horizontally and standing on `y = 0`.
pub fn auto_scale_to_height(bounds: &Aabb, target_height: f32) -> ScaleFit {
    fit_extent(bounds, bounds.size().y, target_height)
}

/// Fit a model so its longest axis equals `target_size`, centred on the
/// origin horizontally and standing on `y = 0`.
pub fn auto_scale_to_longest(bounds: &Aabb, target_size: f32) -> ScaleFit {
    fit_extent(bounds, bounds.size().max_element(), target_size)
}

fn fit_extent(bounds: &Aabb, extent: f32, target: f32) -> ScaleFit {
    if !bounds.min.is_finite() || !bounds.max.is_finite() {
        tracing::debug!(?bounds, "non-finite bounds, leaving model untouched");
        return ScaleFit::IDENTITY;
    }
    let scale = safe_ratio(target, extent);
    let center = bounds.center();
    ScaleFit {
        scale,
        translation: Vec3::new(-center.x * scale, -bounds.min.y * scale, -center.z * scale),
    }
}

/// `target / extent`, or 1 when either side would collapse or explode the model.
fn safe_ratio(target: f32, extent: f32) -> f32 {
    if !extent.is_finite() || extent <= 0.0 {
        tracing::debug!(extent, "degenerate extent, using unit scale");
        return 1.0;
    }
    let ratio = target / extent;
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        tracing::debug!(target, extent, "degenerate target, using unit scale");
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn sample() -> Aabb {
        Aabb::new(Vec3::new(2.0, -1.0, 4.0), Vec3::new(6.0, 9.0, 5.0))
    }

    #[test]
    fn height_fit_scales_and_grounds() {
        let fit = auto_scale_to_height(&sample(), 2.0);
        assert!(approx(fit.scale, 0.2));
        let out = fit.apply_to_bounds(&sample());
        assert!(approx(out.size().y, 2.0));
        assert!(approx(out.min.y, 0.0));
        assert!(approx(out.center().x, 0.0));
        assert!(approx(out.center().z, 0.0));
    }

    #[test]
    fn longest_fit_uses_largest_axis() {
        let b = Aabb::new(Vec3::ZERO, Vec3::new(8.0, 2.0, 1.0));
        let fit = auto_scale_to_longest(&b, 2.0);
        assert!(approx(fit.scale, 0.25));
        let out = fit.apply_to_bounds(&b);
        assert!(approx(out.size().max_element(), 2.0));
        assert!(approx(out.min.y, 0.0));
    }

    #[test]
    fn reapplying_a_fit_changes_nothing() {
        for target in [0.5_f32, 2.0, 7.5] {
            let first = auto_scale_to_height(&sample(), target);
            let fitted = first.apply_to_bounds(&sample());
            let second = auto_scale_to_height(&fitted, target);
            assert!(approx(second.scale, 1.0));
            assert!(second.translation.length() < 1e-4);
            let both = first.then(&second);
            assert!(approx(both.scale, first.scale));
            assert!((both.translation - first.translation).length() < 1e-4);

            let first = auto_scale_to_longest(&sample(), target);
            let fitted = first.apply_to_bounds(&sample());
            let second = auto_scale_to_longest(&fitted, target);
            assert!(approx(second.scale, 1.0));
            assert!(second.translation.length() < 1e-4);
        }
    }

    #[test]
    fn flat_model_keeps_unit_scale() {
        let flat = Aabb::new(Vec3::new(-1.0, 3.0, -1.0), Vec3::new(1.0, 3.0, 1.0));
        let fit = auto_scale_to_height(&flat, 2.0);
        assert_eq!(fit.scale, 1.0);
        // Still grounded.
        assert!(approx(fit.apply_to_bounds(&flat).min.y, 0.0));
    }

    #[test]
    fn degenerate_inputs_never_yield_bad_scale() {
        let cases = [
            Aabb::empty(),
            Aabb::new(Vec3::ZERO, Vec3::ZERO),
            Aabb::new(Vec3::splat(f32::NAN), Vec3::ONE),
            Aabb::new(Vec3::ZERO, Vec3::new(1.0, f32::INFINITY, 1.0)),
        ];
        for b in cases {
            for target in [0.0, -1.0, 2.0, f32::NAN, f32::INFINITY] {
                for fit in [auto_scale_to_height(&b, target), auto_scale_to_longest(&b, target)] {
                    assert!(fit.scale.is_finite());
                    assert!(fit.scale > 0.0);
                }
            }
        }
    }

    #[test]
    fn transform_places_model_at_anchor() {
        let fit = auto_scale_to_height(&sample(), 2.0);
        let t = fit.to_transform(Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(t.scale, Vec3::splat(fit.scale));
        assert!(approx(t.position.z, 4.0 + fit.translation.z));
    }
}
