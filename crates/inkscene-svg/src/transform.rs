//! 2D affine transforms and the SVG `transform` attribute grammar.

use std::f64::consts::PI;
use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::error::{parse_number, SceneError, SceneResult};
use crate::geometry::Shape;

/// 2D affine transform matrix.
///
/// Represents:
/// ```text
/// [a c e]
/// [b d f]
/// [0 0 1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Create a transform from its six components.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create identity transform.
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Create translation transform.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Create scale transform.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Create uniform scale transform.
    pub fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s)
    }

    /// Create rotation transform (degrees) about the origin.
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = (degrees * PI / 180.0).sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Create rotation transform (degrees) about the pivot `(cx, cy)`.
    pub fn rotate_about(degrees: f64, cx: f64, cy: f64) -> Self {
        Self::translate(cx, cy) * Self::rotate(degrees) * Self::translate(-cx, -cy)
    }

    /// Create skew X transform (degrees).
    pub fn skew_x(degrees: f64) -> Self {
        Self::new(1.0, 0.0, (degrees * PI / 180.0).tan(), 1.0, 0.0, 0.0)
    }

    /// Create skew Y transform (degrees).
    pub fn skew_y(degrees: f64) -> Self {
        Self::new(1.0, (degrees * PI / 180.0).tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Create horizontal flip transform.
    pub fn flip_x() -> Self {
        Self::scale(-1.0, 1.0)
    }

    /// Create vertical flip transform.
    pub fn flip_y() -> Self {
        Self::scale(1.0, -1.0)
    }

    /// Multiply two transforms.
    ///
    /// The result maps a point through `other` first, then through `self`.
    pub fn compose(&self, other: &Transform) -> Self {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Get a transformed copy of a shape.
    pub fn apply_shape(&self, shape: &Shape) -> Shape {
        shape.transform(self)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Self::new(
            a,
            b,
            c,
            d,
            -(a * self.e + c * self.f),
            -(b * self.e + d * self.f),
        ))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Compare component-wise within `tolerance`.
    pub fn approx_eq(&self, other: &Transform, tolerance: f64) -> bool {
        [
            self.a - other.a,
            self.b - other.b,
            self.c - other.c,
            self.d - other.d,
            self.e - other.e,
            self.f - other.f,
        ]
        .iter()
        .all(|delta| delta.abs() <= tolerance)
    }

    /// Parse an SVG transform list such as `translate(10,5) scale(2)`.
    ///
    /// Transforms compose in textual order, so the rightmost one is applied
    /// to a point first. An empty list yields the identity.
    pub fn parse(transform_list: &str) -> SceneResult<Self> {
        let normalized = transform_list.replace(',', " ");
        let mut fragments: Vec<&str> = normalized.split(')').collect();
        // Whatever follows the final ')' is not a complete transform.
        fragments.pop();

        let mut result = Self::IDENTITY;
        for fragment in fragments {
            let (name, args) = fragment
                .trim()
                .split_once('(')
                .ok_or_else(|| {
                    SceneError::parse(format!("invalid transform: {}", fragment.trim()))
                })?;
            let name = name.trim_end();
            let args = args
                .split_whitespace()
                .map(parse_number)
                .collect::<SceneResult<Vec<f64>>>()?;
            result = result * Self::from_function(name, &args)?;
        }
        Ok(result)
    }

    fn from_function(name: &str, args: &[f64]) -> SceneResult<Self> {
        let transform = match (name, args) {
            ("matrix", &[a, b, c, d, e, f]) => Self::new(a, b, c, d, e, f),
            ("translate", &[tx]) => Self::translate(tx, 0.0),
            ("translate", &[tx, ty]) => Self::translate(tx, ty),
            ("scale", &[s]) => Self::uniform_scale(s),
            ("scale", &[sx, sy]) => Self::scale(sx, sy),
            ("rotate", &[angle]) => Self::rotate(angle),
            ("rotate", &[angle, cx, cy]) => Self::rotate_about(angle, cx, cy),
            ("skewX", &[angle]) => Self::skew_x(angle),
            ("skewY", &[angle]) => Self::skew_y(angle),
            ("matrix" | "translate" | "scale" | "rotate" | "skewX" | "skewY", _) => {
                return Err(SceneError::parse(format!(
                    "wrong argument count for {name}: {}",
                    args.len()
                )));
            }
            _ => return Err(SceneError::parse(format!("invalid transform: {name}"))),
        };
        Ok(transform)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        self.compose(&rhs)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({} {} {} {} {} {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}
