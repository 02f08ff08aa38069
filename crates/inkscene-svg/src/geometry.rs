//! Geometric shape model.
//!
//! Every shape answers the same four questions: bounding box, area,
//! centroid, and "what do I look like under this transform". Shapes are
//! plain values; transforming one always produces a new, independent shape.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::transform::Transform;

// ==================== Point ====================

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Get a transformed copy of the point.
    pub fn transform(&self, transform: &Transform) -> Self {
        let (x, y) = transform.apply_point(self.x, self.y);
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        (other.x - self.x).powi(2) + (other.y - self.y).powi(2)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// ==================== Bounding Box ====================

/// An axis-aligned rectangle for representing shape boundaries.
///
/// The default box is empty: `min` is `+inf` and `max` is `-inf`, so adding
/// anything to it yields exactly that thing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn empty() -> Self {
        Self::EMPTY
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bounding_box = Self::EMPTY;
        for point in points {
            bounding_box.add_point(point.x, point.y);
        }
        bounding_box
    }

    pub fn from_shapes<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Self {
        let mut bounding_box = Self::EMPTY;
        for shape in shapes {
            bounding_box.add_box(&shape.bounding_box());
        }
        bounding_box
    }

    /// Is the bounding box non-empty?
    pub fn is_empty(&self) -> bool {
        !(self.min_x <= self.max_x && self.min_y <= self.max_y)
    }

    /// Expand the bounding box to contain the given point.
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Expand the bounding box to contain another one.
    pub fn add_box(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn union(mut self, other: &BoundingBox) -> Self {
        self.add_box(other);
        self
    }

    /// Do the two bounding boxes overlap with positive area?
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    pub fn centroid(&self) -> Point {
        Point::new(0.5 * (self.min_x + self.max_x), 0.5 * (self.min_y + self.max_y))
    }

    /// Bounding box of this box's four corners under `transform`.
    pub fn transform(&self, transform: &Transform) -> Self {
        if self.is_empty() {
            return *self;
        }
        let corners = [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
        .map(|corner| corner.transform(transform));
        Self::from_points(&corners)
    }
}

// ==================== Basic Shapes ====================

/// A line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            p1: Point::new(x1, y1),
            p2: Point::new(x2, y2),
        }
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(&self.p2)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points([&self.p1, &self.p2])
    }

    /// The center point of the line.
    pub fn centroid(&self) -> Point {
        self.p1.midpoint(&self.p2)
    }

    pub fn transform(&self, transform: &Transform) -> Self {
        Self {
            p1: self.p1.transform(transform),
            p2: self.p2.transform(transform),
        }
    }
}

/// An open line strip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Length-weighted mean of the segment midpoints.
    pub fn centroid(&self) -> Point {
        let mut total = 0.0;
        let (mut cx, mut cy) = (0.0, 0.0);
        for w in self.points.windows(2) {
            let length = w[0].distance(&w[1]);
            let mid = w[0].midpoint(&w[1]);
            cx += mid.x * length;
            cy += mid.y * length;
            total += length;
        }
        if total > 0.0 {
            Point::new(cx / total, cy / total)
        } else {
            vertex_mean(&self.points)
        }
    }

    pub fn transform(&self, transform: &Transform) -> Self {
        Self {
            points: self.points.iter().map(|p| p.transform(transform)).collect(),
        }
    }
}

/// A closed polygon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Signed area by the shoelace formula; positive for counter-clockwise
    /// winding in a y-up coordinate system.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut area = 0.0;
        for i in 0..n {
            let p1 = self.points[i];
            let p2 = self.points[(i + 1) % n];
            area += p1.x * p2.y - p2.x * p1.y;
        }
        area / 2.0
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Area centroid; the vertex mean for degenerate polygons.
    pub fn centroid(&self) -> Point {
        let n = self.points.len();
        let area = self.signed_area();
        if area == 0.0 {
            return vertex_mean(&self.points);
        }
        let (mut cx, mut cy) = (0.0, 0.0);
        for i in 0..n {
            let p1 = self.points[i];
            let p2 = self.points[(i + 1) % n];
            let cross = p1.x * p2.y - p2.x * p1.y;
            cx += (p1.x + p2.x) * cross;
            cy += (p1.y + p2.y) * cross;
        }
        Point::new(cx / (6.0 * area), cy / (6.0 * area))
    }

    /// Drop a closing vertex that duplicates the first one (within
    /// `epsilon`) and reverse the winding if the signed area is negative.
    pub fn repair(&mut self, epsilon: f64) {
        if self.points.len() >= 2 {
            let first = self.points[0];
            let last = self.points[self.points.len() - 1];
            if first.distance_squared(&last) <= epsilon * epsilon {
                self.points.pop();
            }
        }
        if self.signed_area() < 0.0 {
            self.points.reverse();
        }
    }

    pub fn transform(&self, transform: &Transform) -> Self {
        Self {
            points: self.points.iter().map(|p| p.transform(transform)).collect(),
        }
    }
}

/// A circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self { cx, cy, r }
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn area(&self) -> f64 {
        PI * self.r * self.r
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.cx - self.r, self.cy - self.r, self.cx + self.r, self.cy + self.r)
    }

    /// Get a transformed copy of the circle.
    ///
    /// The transform should only translate, rotate and uniformly scale. The
    /// new radius is measured from one sample point on the circumference, so
    /// skews and non-uniform scales give a radius along the x axis only.
    pub fn transform(&self, transform: &Transform) -> Self {
        let center = self.center().transform(transform);
        let rim = Point::new(self.cx + self.r, self.cy).transform(transform);
        Self {
            cx: center.x,
            cy: center.y,
            r: center.distance(&rim),
        }
    }
}

/// An axis-aligned rectangle with rounded corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: f64,
    pub ry: f64,
}

impl RoundedRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64, rx: f64, ry: f64) -> Self {
        Self { x, y, width, height, rx, ry }
    }

    /// Corner radii clamped to half of each side.
    pub fn effective_radii(&self) -> (f64, f64) {
        (
            self.rx.max(0.0).min(0.5 * self.width.abs()),
            self.ry.max(0.0).min(0.5 * self.height.abs()),
        )
    }

    pub fn area(&self) -> f64 {
        let (rx, ry) = self.effective_radii();
        (self.width * self.height).abs() - (4.0 - PI) * rx * ry
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn centroid(&self) -> Point {
        Point::new(self.x + 0.5 * self.width, self.y + 0.5 * self.height)
    }

    /// Get a transformed copy of the rectangle.
    ///
    /// Assumes the transform keeps the rectangle axis-aligned: the two
    /// opposite corners are mapped and re-normalized, and the radii are the
    /// extents of the mapped radius vectors, so quarter turns swap them.
    pub fn transform(&self, transform: &Transform) -> Self {
        let p1 = Point::new(self.x, self.y).transform(transform);
        let p2 = Point::new(self.x + self.width, self.y + self.height).transform(transform);
        let Transform { a, b, c, d, .. } = *transform;
        Self {
            x: p1.x.min(p2.x),
            y: p1.y.min(p2.y),
            width: (p2.x - p1.x).abs(),
            height: (p2.y - p1.y).abs(),
            rx: (a * self.rx).abs() + (c * self.ry).abs(),
            ry: (b * self.rx).abs() + (d * self.ry).abs(),
        }
    }
}

// ==================== Shape ====================

/// A closed set of shape variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Point(Point),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Circle(Circle),
    RoundedRect(RoundedRect),
    Group { children: Vec<Shape> },
}

impl Shape {
    /// Short lowercase name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Point(_) => "point",
            Shape::Line(_) => "line",
            Shape::Polyline(_) => "polyline",
            Shape::Polygon(_) => "polygon",
            Shape::Circle(_) => "circle",
            Shape::RoundedRect(_) => "rounded_rect",
            Shape::Group { .. } => "group",
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Shape::Point(p) => BoundingBox::new(p.x, p.y, p.x, p.y),
            Shape::Line(l) => l.bounding_box(),
            Shape::Polyline(p) => p.bounding_box(),
            Shape::Polygon(p) => p.bounding_box(),
            Shape::Circle(c) => c.bounding_box(),
            Shape::RoundedRect(r) => r.bounding_box(),
            Shape::Group { children } => BoundingBox::from_shapes(children),
        }
    }

    /// Area of the shape; signed for polygons, zero for points and lines.
    pub fn area(&self) -> f64 {
        match self {
            Shape::Point(_) | Shape::Line(_) | Shape::Polyline(_) => 0.0,
            Shape::Polygon(p) => p.signed_area(),
            Shape::Circle(c) => c.area(),
            Shape::RoundedRect(r) => r.area(),
            Shape::Group { children } => children.iter().map(Shape::area).sum(),
        }
    }

    /// The mass center of the shape.
    pub fn centroid(&self) -> Point {
        match self {
            Shape::Point(p) => *p,
            Shape::Line(l) => l.centroid(),
            Shape::Polyline(p) => p.centroid(),
            Shape::Polygon(p) => p.centroid(),
            Shape::Circle(c) => c.center(),
            Shape::RoundedRect(r) => r.centroid(),
            Shape::Group { children } => group_centroid(children),
        }
    }

    /// Get a transformed copy of the shape.
    pub fn transform(&self, transform: &Transform) -> Shape {
        match self {
            Shape::Point(p) => Shape::Point(p.transform(transform)),
            Shape::Line(l) => Shape::Line(l.transform(transform)),
            Shape::Polyline(p) => Shape::Polyline(p.transform(transform)),
            Shape::Polygon(p) => Shape::Polygon(p.transform(transform)),
            Shape::Circle(c) => Shape::Circle(c.transform(transform)),
            Shape::RoundedRect(r) => Shape::RoundedRect(r.transform(transform)),
            Shape::Group { children } => Shape::Group {
                children: children.iter().map(|c| c.transform(transform)).collect(),
            },
        }
    }

    /// Bounding box of the shape after applying `transform`.
    pub fn bounding_box_with(&self, transform: &Transform) -> BoundingBox {
        self.transform(transform).bounding_box()
    }
}

fn vertex_mean(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

fn group_centroid(children: &[Shape]) -> Point {
    let mut total = 0.0;
    let (mut cx, mut cy) = (0.0, 0.0);
    for child in children {
        let area = child.area().abs();
        let c = child.centroid();
        cx += c.x * area;
        cy += c.y * area;
        total += area;
    }
    if total > 0.0 {
        Point::new(cx / total, cy / total)
    } else {
        BoundingBox::from_shapes(children).centroid()
    }
}
