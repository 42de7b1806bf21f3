use thiserror::Error;

use crate::geometry::Point;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrokeError {
    #[error("Stroke has no points")]
    EmptyStroke,
    #[error("Stroke point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("Stroke has {points} points but {timestamps} timestamps")]
    TimestampCountMismatch { points: usize, timestamps: usize },
    #[error("Stroke timestamp {index} is earlier than the one before it")]
    TimestampsNotMonotonic { index: usize },
}

pub type StrokeResult<T> = Result<T, StrokeError>;

/// A non-empty, drawing-ordered point sequence with optional per-point
/// capture times in milliseconds. Times are kept for persistence only.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    timestamps: Option<Vec<u64>>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> StrokeResult<Self> {
        Self::validate_points(&points)?;
        Ok(Self {
            points,
            timestamps: None,
        })
    }

    pub fn with_timestamps(points: Vec<Point>, timestamps: Vec<u64>) -> StrokeResult<Self> {
        Self::validate_points(&points)?;

        if timestamps.len() != points.len() {
            return Err(StrokeError::TimestampCountMismatch {
                points: points.len(),
                timestamps: timestamps.len(),
            });
        }
        if let Some(index) = timestamps.windows(2).position(|w| w[1] < w[0]) {
            return Err(StrokeError::TimestampsNotMonotonic { index: index + 1 });
        }

        Ok(Self {
            points,
            timestamps: Some(timestamps),
        })
    }

    pub fn from_xy<I>(coords: I) -> StrokeResult<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(coords.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }

    fn validate_points(points: &[Point]) -> StrokeResult<()> {
        if points.is_empty() {
            return Err(StrokeError::EmptyStroke);
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(StrokeError::NonFinitePoint { index });
        }
        Ok(())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn timestamps(&self) -> Option<&[u64]> {
        self.timestamps.as_deref()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        match self.timestamps.as_deref() {
            Some([first, .., last]) => last - first,
            _ => 0,
        }
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}
