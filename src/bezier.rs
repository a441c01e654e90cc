//! Bezier curve and patch evaluation by de Casteljau's algorithm.
//!
//! Each de Casteljau step replaces `n` control points with the `n - 1`
//! points interpolated between neighbours; repeating until one point remains
//! evaluates the curve.

use nalgebra::{Point2, Point3};

use crate::error::{MeshError, Result};

/// Linear interpolation between two 2D points: `(1 - t) * p0 + t * p1`.
#[inline]
pub fn lerp2d(p0: &Point2<f64>, p1: &Point2<f64>, t: f64) -> Point2<f64> {
    Point2::from(p0.coords * (1.0 - t) + p1.coords * t)
}

/// Linear interpolation between two 3D points: `(1 - t) * p0 + t * p1`.
#[inline]
pub fn lerp3d(p0: &Point3<f64>, p1: &Point3<f64>, t: f64) -> Point3<f64> {
    Point3::from(p0.coords * (1.0 - t) + p1.coords * t)
}

/// A planar Bezier curve with a current evaluation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierCurve {
    control_points: Vec<Point2<f64>>,
    t: f64,
}

impl BezierCurve {
    /// Create a curve from its control polygon.
    ///
    /// # Errors
    /// Returns [`MeshError::InvalidParameter`] if `control_points` is empty.
    pub fn new(control_points: Vec<Point2<f64>>, t: f64) -> Result<Self> {
        if control_points.is_empty() {
            return Err(MeshError::invalid_param(
                "control_points",
                0,
                "need at least one control point",
            ));
        }
        Ok(Self { control_points, t })
    }

    /// The control polygon.
    pub fn control_points(&self) -> &[Point2<f64>] {
        &self.control_points
    }

    /// The evaluation parameter.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Set the evaluation parameter.
    pub fn set_t(&mut self, t: f64) {
        self.t = t;
    }

    /// One de Casteljau step at the curve's parameter.
    ///
    /// Returns one point fewer than given; a single point yields an empty
    /// vector.
    pub fn evaluate_step(&self, points: &[Point2<f64>]) -> Vec<Point2<f64>> {
        points
            .windows(2)
            .map(|pair| lerp2d(&pair[0], &pair[1], self.t))
            .collect()
    }

    /// Every level of the de Casteljau pyramid, from the control polygon
    /// down to the single point on the curve.
    pub fn levels(&self) -> Vec<Vec<Point2<f64>>> {
        let mut levels = vec![self.control_points.clone()];
        while let Some(last) = levels.last().filter(|level| level.len() > 1) {
            let next = self.evaluate_step(last);
            levels.push(next);
        }
        levels
    }

    /// The point on the curve at the current parameter.
    pub fn evaluate(&self) -> Point2<f64> {
        let mut points = self.control_points.clone();
        while points.len() > 1 {
            points = self.evaluate_step(&points);
        }
        // The constructor guarantees at least one control point.
        points.first().copied().unwrap_or_else(Point2::origin)
    }
}

/// A tensor-product Bezier patch given as rows of 3D control points.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPatch {
    control_points: Vec<Vec<Point3<f64>>>,
}

impl BezierPatch {
    /// Create a patch from a rectangular grid of control points.
    ///
    /// # Errors
    /// Returns [`MeshError::InvalidParameter`] if the grid is empty, has an
    /// empty row, or its rows differ in length.
    pub fn new(control_points: Vec<Vec<Point3<f64>>>) -> Result<Self> {
        let width = match control_points.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => {
                return Err(MeshError::invalid_param(
                    "control_points",
                    0,
                    "need at least one non-empty row",
                ))
            }
        };
        if let Some(row) = control_points.iter().find(|row| row.len() != width) {
            return Err(MeshError::invalid_param(
                "control_points",
                row.len(),
                "rows must all have the same length",
            ));
        }
        Ok(Self { control_points })
    }

    /// The control grid, row by row.
    pub fn control_points(&self) -> &[Vec<Point3<f64>>] {
        &self.control_points
    }

    /// One de Casteljau step at parameter `t`.
    pub fn evaluate_step(points: &[Point3<f64>], t: f64) -> Vec<Point3<f64>> {
        points
            .windows(2)
            .map(|pair| lerp3d(&pair[0], &pair[1], t))
            .collect()
    }

    /// Fully reduce a 1D control polygon at `t`. `None` for no points.
    pub fn evaluate_1d(points: &[Point3<f64>], t: f64) -> Option<Point3<f64>> {
        let mut current = points.to_vec();
        while current.len() > 1 {
            current = Self::evaluate_step(&current, t);
        }
        current.first().copied()
    }

    /// The point on the patch at `(u, v)`: every row is evaluated at `u`,
    /// then the resulting column at `v`.
    pub fn evaluate(&self, u: f64, v: f64) -> Point3<f64> {
        let column: Vec<Point3<f64>> = self
            .control_points
            .iter()
            .filter_map(|row| Self::evaluate_1d(row, u))
            .collect();
        // Rows are non-empty and there is at least one of them.
        Self::evaluate_1d(&column, v).unwrap_or_else(Point3::origin)
    }
}
