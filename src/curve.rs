//! Rational B-spline (NURBS) curves for slider paths
//!
//! Curves use a clamped uniform knot vector, so the first and last control
//! points are hit exactly at t = 0 and t = 1. The degree is capped at
//! `points - 1`: two points give a straight line, three a quadratic, four or
//! more a cubic spline.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Degree used by `Curve::new`
pub const DEFAULT_DEGREE: usize = 3;

/// Backward step used to estimate the direction of travel
pub const TANGENT_EPSILON: f32 = 0.001;

/// An immutable NURBS curve
///
/// Serialized as its control points, weights and degree. Deserializing goes
/// through `Curve::with_weights`, so a loaded curve is always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveDef", into = "CurveDef")]
pub struct Curve {
    points: Vec<Vec3>,
    weights: Vec<f32>,
    degree: usize,
    knots: Vec<f32>,
}

impl Curve {
    /// Non-rational cubic (or lower) curve through `points`
    pub fn new(points: Vec<Vec3>) -> Result<Self> {
        let weights = vec![1.0; points.len()];
        Self::with_weights(points, weights, DEFAULT_DEGREE)
    }

    /// Curve with explicit per-point weights and requested degree
    pub fn with_weights(points: Vec<Vec3>, weights: Vec<f32>, degree: usize) -> Result<Self> {
        let n = points.len();
        if n < 2 {
            return Err(ConfigError::TooFewControlPoints(n));
        }
        if weights.len() != n {
            return Err(ConfigError::InvalidWeights(format!(
                "{} weights for {} points",
                weights.len(),
                n
            )));
        }
        if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(ConfigError::InvalidWeights(format!("weight {w} is not positive")));
        }

        let degree = degree.clamp(1, n - 1);
        Ok(Self {
            knots: clamped_uniform_knots(n, degree),
            points,
            weights,
            degree,
        })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Position at parameter `t`, clamped to [0, 1]
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let p = self.degree;
        let k = self.find_span(t);

        // de Boor in homogeneous coordinates
        let mut d: Vec<Vec4> = (0..=p)
            .map(|j| {
                let i = j + k - p;
                let w = self.weights[i];
                (self.points[i] * w).extend(w)
            })
            .collect();

        for r in 1..=p {
            for j in (r..=p).rev() {
                let i = j + k - p;
                let denom = self.knots[i + p + 1 - r] - self.knots[i];
                let alpha = if denom > 0.0 { (t - self.knots[i]) / denom } else { 0.0 };
                d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
            }
        }

        let h = d[p];
        h.truncate() / h.w
    }

    /// Unit direction of travel at `t`, estimated from `t - TANGENT_EPSILON`
    ///
    /// Zero at t = 0, where both samples coincide.
    pub fn tangent(&self, t: f32) -> Vec3 {
        (self.evaluate(t) - self.evaluate(t - TANGENT_EPSILON)).normalize_or_zero()
    }

    /// Evenly spaced samples along the parameter range, for drawing
    pub fn sample(&self, num_points: usize) -> Vec<Vec3> {
        (0..num_points)
            .map(|i| {
                let t = i as f32 / (num_points - 1).max(1) as f32;
                self.evaluate(t)
            })
            .collect()
    }

    /// Knot span index `k` with `knots[k] <= t < knots[k + 1]`
    fn find_span(&self, t: f32) -> usize {
        let n = self.points.len();
        if t >= self.knots[n] {
            return n - 1;
        }
        let mut k = self.degree;
        while k < n - 1 && t >= self.knots[k + 1] {
            k += 1;
        }
        k
    }
}

/// On-disk form of a `Curve`; knots are always rebuilt
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurveDef {
    points: Vec<Vec3>,
    /// All 1.0 when omitted
    #[serde(default)]
    weights: Vec<f32>,
    #[serde(default = "default_degree")]
    degree: usize,
}

fn default_degree() -> usize {
    DEFAULT_DEGREE
}

impl TryFrom<CurveDef> for Curve {
    type Error = ConfigError;

    fn try_from(def: CurveDef) -> Result<Self> {
        let weights = if def.weights.is_empty() {
            vec![1.0; def.points.len()]
        } else {
            def.weights
        };
        Self::with_weights(def.points, weights, def.degree)
    }
}

impl From<Curve> for CurveDef {
    fn from(curve: Curve) -> Self {
        Self {
            points: curve.points,
            weights: curve.weights,
            degree: curve.degree,
        }
    }
}

fn clamped_uniform_knots(n: usize, degree: usize) -> Vec<f32> {
    let interior = n - degree - 1;
    let mut knots = vec![0.0; degree + 1];
    knots.extend((1..=interior).map(|i| i as f32 / (interior + 1) as f32));
    knots.extend(std::iter::repeat_n(1.0, degree + 1));
    knots
}
