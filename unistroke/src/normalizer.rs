//! Canonical-form normalization: resample, derotate, rescale, recenter.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point};

pub const DEFAULT_NUM_POINTS: usize = 64;
pub const DEFAULT_SQUARE_SIZE: f64 = 250.0;

/// The transforms removed from one stroke, enough to map canonical points
/// back into that stroke's original frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    /// Rotation removed, in radians.
    pub angle: f64,
    /// Uniform scale applied about the origin.
    pub scale: f64,
    /// Centroid after scaling, subtracted last.
    pub center: Point,
}

impl Default for NormalizationParams {
    fn default() -> Self {
        Self {
            angle: 0.0,
            scale: 1.0,
            center: Point::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    num_points: usize,
    square_size: f64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_POINTS, DEFAULT_SQUARE_SIZE)
    }
}

impl Normalizer {
    pub fn new(num_points: usize, square_size: f64) -> Self {
        assert!(num_points >= 2, "num_points must be at least 2");
        assert!(
            square_size.is_finite() && square_size > 0.0,
            "square_size must be finite and positive"
        );

        Self {
            num_points,
            square_size,
        }
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn square_size(&self) -> f64 {
        self.square_size
    }

    /// Maps a raw stroke to canonical form.
    ///
    /// The rotation step aligns the direction from the centroid to the first
    /// resampled point with angle 0. Strokes drawn from a different relative
    /// start point therefore do not line up; full rotation invariance is not
    /// attempted.
    pub fn normalize(&self, points: &[Point]) -> (Vec<Point>, NormalizationParams) {
        let resampled = geometry::resample(points, self.num_points);

        let center = geometry::centroid(&resampled);
        let start = resampled[0] - center;
        let angle = start.y.atan2(start.x);
        let rotated = geometry::rotate(&resampled, -angle, center);

        let scale = geometry::square_scale_factor(&rotated, self.square_size);
        let scaled: Vec<Point> = rotated.iter().map(|&p| p * scale).collect();

        let center = geometry::centroid(&scaled);
        let translated = scaled.iter().map(|&p| p - center).collect();

        (
            translated,
            NormalizationParams {
                angle,
                scale,
                center,
            },
        )
    }

    /// Inverts `params` on `points`: add the center, undo the scale, then
    /// rotate back about the restored centroid.
    ///
    /// `points` need not come from the stroke that produced `params`; a
    /// matched template projected this way lands in the candidate's frame.
    pub fn denormalize(&self, points: &[Point], params: &NormalizationParams) -> Vec<Point> {
        if points.is_empty() {
            return Vec::new();
        }

        let restored: Vec<Point> = points
            .iter()
            .map(|&p| (p + params.center) / params.scale)
            .collect();
        let center = geometry::centroid(&restored);
        geometry::rotate(&restored, params.angle, center)
    }
}
