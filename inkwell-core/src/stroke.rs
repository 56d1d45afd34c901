//! Strokes - the ink captured from the drawing board.

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// A point in canvas pixel space.
///
/// Serializes as `{"x": .., "y": ..}` and also accepts the `[x, y]` pair
/// shape that capture widgets emit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Point {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Pair([f32; 2]),
    Object { x: f32, y: f32 },
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Pair([x, y]) | PointRepr::Object { x, y } => Self { x, y },
        }
    }
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Check that both coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPoint`] for NaN or infinite coordinates.
    pub fn validate(&self) -> CoreResult<()> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(())
        } else {
            Err(CoreError::InvalidPoint {
                x: self.x,
                y: self.y,
            })
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// One continuous pen-down-to-pen-up path.
///
/// Strokes are immutable once recorded. Capture widgets may still hand over
/// an empty stroke; renderers skip those.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Create a stroke from its recorded points.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// The points in drawing order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the stroke has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point> for Stroke {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Ordered strokes of one character attempt, in drawing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeSequence {
    strokes: Vec<Stroke>,
}

impl StrokeSequence {
    /// Create a sequence from strokes.
    #[must_use]
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// Create an empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a sequence from JSON (`[[[x, y], ...], ...]` or point objects)
    /// and validate every coordinate.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a point is not finite.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let sequence: Self = serde_json::from_str(json)?;
        sequence.validate()?;
        Ok(sequence)
    }

    /// Check every point in the sequence.
    ///
    /// # Errors
    ///
    /// Returns the first [`CoreError::InvalidPoint`] found.
    pub fn validate(&self) -> CoreResult<()> {
        self.strokes
            .iter()
            .flat_map(Stroke::points)
            .try_for_each(Point::validate)
    }

    /// The strokes in drawing order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Iterate over the strokes.
    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    /// Number of strokes, empty ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Whether there are no strokes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Whether at least one stroke has points.
    #[must_use]
    pub fn has_ink(&self) -> bool {
        self.strokes.iter().any(|s| !s.is_empty())
    }

    /// Total number of points across all strokes.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }
}

impl From<Vec<Stroke>> for StrokeSequence {
    fn from(strokes: Vec<Stroke>) -> Self {
        Self::new(strokes)
    }
}

impl FromIterator<Stroke> for StrokeSequence {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StrokeSequence {
    type Item = &'a Stroke;
    type IntoIter = std::slice::Iter<'a, Stroke>;

    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}
