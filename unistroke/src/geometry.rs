//! Pure point-set operations used by the normalizer.
//!
//! All functions take the points by slice and return new vectors; none of
//! them keep state between calls.

use glam::DVec2;

use common::EPSILON;

pub type Point = DVec2;

/// Arithmetic mean of all points.
///
/// Panics on an empty slice.
pub fn centroid(points: &[Point]) -> Point {
    assert!(!points.is_empty(), "centroid of an empty point set");

    let sum: Point = points.iter().copied().sum();
    sum / points.len() as f64
}

/// Rotates every point by `angle` radians (counter-clockwise for a y-up frame)
/// about `about`.
pub fn rotate(points: &[Point], angle: f64, about: Point) -> Vec<Point> {
    let (sin, cos) = angle.sin_cos();

    points
        .iter()
        .map(|&p| {
            let d = p - about;
            Point::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + about
        })
        .collect()
}

/// Total polyline length.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Resamples the polyline into exactly `n` points spaced evenly along its
/// arc length. Strokes with fewer than two points or zero length collapse to
/// `n` copies of the first point.
///
/// Panics if `points` is empty or `n < 2`.
pub fn resample(points: &[Point], n: usize) -> Vec<Point> {
    assert!(!points.is_empty(), "resample of an empty point set");
    assert!(n >= 2, "resample needs at least 2 output points, got {n}");

    let length = path_length(points);
    if points.len() < 2 || length < EPSILON {
        return vec![points[0]; n];
    }

    let interval = length / (n - 1) as f64;
    let mut resampled = Vec::with_capacity(n);
    resampled.push(points[0]);

    let mut accumulated = 0.0;
    let mut prev = points[0];
    let mut idx = 1;
    while idx < points.len() && resampled.len() < n {
        let next = points[idx];
        let dist = prev.distance(next);

        if dist > 0.0 && accumulated + dist >= interval {
            // The inserted point becomes the start of the remaining segment,
            // even when it lands exactly on `next`.
            let t = (interval - accumulated) / dist;
            let inserted = prev + (next - prev) * t;
            resampled.push(inserted);
            prev = inserted;
            accumulated = 0.0;
        } else {
            accumulated += dist;
            prev = next;
            idx += 1;
        }
    }

    // Rounding can leave the walk one point short of the end.
    let last = points[points.len() - 1];
    resampled.resize(n, last);
    resampled
}

/// Axis-aligned bounds as `(min, max)`.
pub fn bounding_box(points: &[Point]) -> (Point, Point) {
    assert!(!points.is_empty(), "bounding box of an empty point set");

    points.iter().skip(1).fold((points[0], points[0]), |(min, max), &p| {
        (min.min(p), max.max(p))
    })
}

/// Uniform factor that makes the longer bounding-box side equal `size`.
/// A set with no extent keeps scale 1.
pub fn square_scale_factor(points: &[Point], size: f64) -> f64 {
    let (min, max) = bounding_box(points);
    let extent = (max - min).max_element();
    if extent < EPSILON {
        1.0
    } else {
        size / extent
    }
}

/// Scales uniformly about the origin so the longer bounding-box side becomes
/// `size`, preserving the aspect ratio.
pub fn scale_to_square(points: &[Point], size: f64) -> Vec<Point> {
    let scale = square_scale_factor(points, size);
    points.iter().map(|&p| p * scale).collect()
}

/// Subtracts the centroid from every point.
pub fn translate_to_origin(points: &[Point]) -> Vec<Point> {
    let center = centroid(points);
    points.iter().map(|&p| p - center).collect()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!(
            a.distance(b) < 1e-9,
            "expected {b:?}, got {a:?} (distance {})",
            a.distance(b)
        );
    }

    fn zigzag() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(6.0, 0.0),
            Point::new(6.5, 0.1),
            Point::new(20.0, 7.0),
        ]
    }

    #[test]
    fn centroid_is_mean() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        assert_close(centroid(&points), Point::new(2.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "centroid of an empty point set")]
    fn centroid_rejects_empty() {
        centroid(&[]);
    }

    #[test]
    fn rotate_quarter_turn_about_center() {
        let rotated = rotate(&[Point::new(2.0, 1.0)], FRAC_PI_2, Point::new(1.0, 1.0));
        assert_close(rotated[0], Point::new(1.0, 2.0));
    }

    #[test]
    fn rotate_preserves_order_and_distances() {
        let points = zigzag();
        let rotated = rotate(&points, 0.7, centroid(&points));

        assert_eq!(rotated.len(), points.len());
        for (a, b) in points.windows(2).zip(rotated.windows(2)) {
            assert!((a[0].distance(a[1]) - b[0].distance(b[1])).abs() < 1e-9);
        }
    }

    #[test]
    fn resample_produces_exact_count() {
        let points = zigzag();
        for n in [2, 3, 7, 16, 64, 100, 257] {
            assert_eq!(resample(&points, n).len(), n, "n = {n}");
        }
    }

    #[test]
    fn resample_keeps_endpoints_and_spacing() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let resampled = resample(&points, 11);

        assert_close(resampled[0], Point::new(0.0, 0.0));
        assert_close(resampled[10], Point::new(10.0, 0.0));
        for w in resampled.windows(2) {
            assert!((w[0].distance(w[1]) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn resample_spacing_ignores_input_density() {
        // Dense first half, sparse second half.
        let mut points: Vec<Point> = (0..=50).map(|i| Point::new(i as f64 * 0.1, 0.0)).collect();
        points.push(Point::new(10.0, 0.0));

        let resampled = resample(&points, 5);
        let expected = [0.0, 2.5, 5.0, 7.5, 10.0];
        for (p, x) in resampled.iter().zip(expected) {
            assert_close(*p, Point::new(x, 0.0));
        }
    }

    #[test]
    fn resample_inserts_on_existing_vertex() {
        // Interval 1.0 lands exactly on the corner vertex (1, 0).
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        let resampled = resample(&points, 3);

        assert_close(resampled[0], Point::new(0.0, 0.0));
        assert_close(resampled[1], Point::new(1.0, 0.0));
        assert_close(resampled[2], Point::new(1.0, 1.0));
    }

    #[test]
    fn resample_degenerate_collapses() {
        let dwell = vec![Point::new(3.0, -2.0); 7];
        assert_eq!(resample(&dwell, 64), vec![Point::new(3.0, -2.0); 64]);

        let single = [Point::new(1.5, 1.5)];
        assert_eq!(resample(&single, 8), vec![Point::new(1.5, 1.5); 8]);
    }

    #[test]
    #[should_panic(expected = "resample of an empty point set")]
    fn resample_rejects_empty() {
        resample(&[], 64);
    }

    #[test]
    fn scale_to_square_preserves_aspect_ratio() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 5.0)];
        let scaled = scale_to_square(&points, 250.0);

        let (min, max) = bounding_box(&scaled);
        assert!(((max - min).x - 250.0).abs() < 1e-9);
        assert!(((max - min).y - 125.0).abs() < 1e-9);
    }

    #[test]
    fn scale_to_square_of_a_point_is_identity() {
        let points = [Point::new(4.0, 4.0), Point::new(4.0, 4.0)];
        assert_eq!(square_scale_factor(&points, 250.0), 1.0);
        assert_eq!(scale_to_square(&points, 250.0), points.to_vec());
    }

    #[test]
    fn translate_to_origin_centers_points() {
        let translated = translate_to_origin(&zigzag());
        assert_close(centroid(&translated), Point::ZERO);
    }

    #[test]
    fn half_turn_rotation_round_trips() {
        let points = zigzag();
        let center = centroid(&points);
        let back = rotate(&rotate(&points, PI, center), -PI, center);
        for (a, b) in points.iter().zip(back.iter()) {
            assert_close(*a, *b);
        }
    }
}
