//! Scene building: flatten a document into absolutely positioned shapes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::config::SceneConfig;
use crate::document::{Document, Element};
use crate::error::SceneResult;
use crate::geometry::{BoundingBox, Point, Shape};
use crate::transform::Transform;

/// One renderable item: a shape in scene coordinates plus its paint.
///
/// A missing fill or stroke means that channel is not drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntry {
    pub shape: Shape,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

/// Framing of the scene in a viewport: the scene point shown at the
/// viewport centre and a uniform zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Camera {
    /// Centre `envelope` in a `width` x `height` viewport, scaled so that it
    /// covers `fill` of the tighter axis.
    ///
    /// Axes with zero extent do not constrain the scale; with no usable axis
    /// (or an empty envelope) the scale is 1.
    pub fn frame(envelope: &BoundingBox, width: f64, height: f64, fill: f64) -> Self {
        if envelope.is_empty() {
            return Self::default();
        }
        let center = envelope.centroid();
        let scale = [(width, envelope.width()), (height, envelope.height())]
            .into_iter()
            .filter(|&(_, extent)| extent > 0.0)
            .map(|(size, extent)| size / extent)
            .reduce(f64::min)
            .map_or(1.0, |s| fill * s);
        Self {
            center_x: center.x,
            center_y: center.y,
            scale,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Transform from scene space to viewport space.
    pub fn view_transform(&self, width: f64, height: f64) -> Transform {
        Transform::translate(width / 2.0, height / 2.0)
            * Transform::uniform_scale(self.scale)
            * Transform::translate(-self.center_x, -self.center_y)
    }
}

/// A flattened document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    entries: Vec<SceneEntry>,
    envelope: BoundingBox,
    background: Option<Color>,
    #[serde(skip)]
    config: SceneConfig,
}

impl Scene {
    /// Walk the document depth-first, composing transforms from the root
    /// down and emitting every attached shape in scene coordinates.
    pub fn build(document: &Document, config: &SceneConfig) -> SceneResult<Self> {
        let root_transform = if config.flip_y {
            Transform::flip_y()
        } else {
            Transform::IDENTITY
        };
        let background = match document.root().attribute("pagecolor") {
            Some(color) => Color::parse(color)?,
            None => None,
        };
        let mut scene = Self {
            entries: Vec::new(),
            envelope: BoundingBox::empty(),
            background,
            config: config.clone(),
        };
        scene.add_element(document.root(), &root_transform)?;
        debug!(
            entries = scene.entries.len(),
            width = scene.envelope.width(),
            height = scene.envelope.height(),
            "Scene built"
        );
        Ok(scene)
    }

    fn add_element(&mut self, element: &Element, parent: &Transform) -> SceneResult<()> {
        let transform = *parent * element.transform;
        let attributes = element.effective_attributes();
        let fill = paint(attributes.get("fill"))?;
        let stroke = paint(attributes.get("stroke"))?;

        for shape in element.basic_shapes(self.config.epsilon) {
            let shape = shape.transform(&transform);
            self.envelope.add_box(&shape.bounding_box());
            self.entries.push(SceneEntry { shape, fill, stroke });
        }
        for child in &element.children {
            self.add_element(child, &transform)?;
        }
        Ok(())
    }

    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bounding box of every emitted shape.
    pub fn envelope(&self) -> BoundingBox {
        self.envelope
    }

    pub fn centroid(&self) -> Point {
        self.envelope.centroid()
    }

    /// The page colour of the root element, if any.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Camera framing the scene in the configured viewport.
    pub fn camera(&self) -> Camera {
        self.camera_for(self.config.viewport_width, self.config.viewport_height)
    }

    pub fn camera_for(&self, width: f64, height: f64) -> Camera {
        Camera::frame(&self.envelope, width, height, self.config.frame_fill)
    }
}

fn paint(value: Option<&String>) -> SceneResult<Option<Color>> {
    match value {
        Some(value) => Color::parse(value),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Polygon};

    fn build(svg: &str) -> Scene {
        let document = Document::parse_str(svg).unwrap();
        Scene::build(&document, &SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_transform_stack() {
        let scene = build(
            r#"<svg transform="translate(100,0)">
                 <g transform="scale(2)">
                   <circle cx="1" cy="1" r="1" fill="red"/>
                 </g>
               </svg>"#,
        );
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.entries()[0].shape, Shape::Circle(Circle::new(102.0, 2.0, 2.0)));
        assert_eq!(scene.entries()[0].fill, Some(Color::from_rgb(255, 0, 0)));
        assert_eq!(scene.entries()[0].stroke, None);
    }

    #[test]
    fn test_paint_not_inherited() {
        let scene = build(r#"<svg><g fill="red"><rect width="1" height="1"/></g></svg>"#);
        assert_eq!(scene.entries()[0].fill, None);
    }

    #[test]
    fn test_style_under_attributes() {
        let scene = build(
            r#"<svg><rect width="1" height="1" fill="blue" style="fill:red;stroke:#0f0"/></svg>"#,
        );
        let entry = &scene.entries()[0];
        assert_eq!(entry.fill, Some(Color::from_rgb(0, 0, 255)));
        assert_eq!(entry.stroke, Some(Color::from_rgb(0, 255, 0)));
    }

    #[test]
    fn test_invalid_paint_fails() {
        let svg = r##"<svg><rect width="1" height="1" fill="#12"/></svg>"##;
        let document = Document::parse_str(svg).unwrap();
        assert!(Scene::build(&document, &SceneConfig::default()).is_err());
    }

    #[test]
    fn test_path_entries_and_envelope() {
        let scene =
            build(r#"<svg><path d="M0 0 L10 0 L10 10 Z M 20 20 L 30 40" stroke="black"/></svg>"#);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.entries()[0].shape.kind(), "polygon");
        assert_eq!(scene.entries()[1].shape.kind(), "line");
        assert_eq!(scene.envelope(), BoundingBox::new(0.0, 0.0, 30.0, 40.0));
        assert_eq!(scene.centroid(), Point::new(15.0, 20.0));
    }

    #[test]
    fn test_flip_y() {
        let document =
            Document::parse_str(r#"<svg><path d="M0 0 L0 10 L10 10 L10 0 Z"/></svg>"#).unwrap();
        let config = SceneConfig {
            flip_y: true,
            ..SceneConfig::default()
        };
        let scene = Scene::build(&document, &config).unwrap();
        assert_eq!(scene.envelope(), BoundingBox::new(0.0, -10.0, 10.0, 0.0));
        match &scene.entries()[0].shape {
            Shape::Polygon(Polygon { points }) => assert_eq!(points.len(), 4),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_camera() {
        let scene = build(r#"<svg><rect x="-50" y="0" width="100" height="300"/></svg>"#);
        let camera = scene.camera();
        assert_eq!(camera.center(), Point::new(0.0, 150.0));
        // min(800 / 100, 600 / 300) = 2
        assert!((camera.scale - 1.6).abs() < 1e-12);

        let camera = scene.camera_for(100.0, 3000.0);
        assert!((camera.scale - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_camera_view_transform() {
        let camera = Camera {
            center_x: 10.0,
            center_y: 20.0,
            scale: 2.0,
        };
        let t = camera.view_transform(800.0, 600.0);
        assert_eq!(t.apply_point(10.0, 20.0), (400.0, 300.0));
        assert_eq!(t.apply_point(11.0, 20.0), (402.0, 300.0));
    }

    #[test]
    fn test_camera_degenerate() {
        assert_eq!(Camera::frame(&BoundingBox::empty(), 800.0, 600.0, 0.8), Camera::default());

        // a horizontal line: only the x axis constrains the scale
        let line = BoundingBox::new(0.0, 5.0, 400.0, 5.0);
        let camera = Camera::frame(&line, 800.0, 600.0, 0.8);
        assert!((camera.scale - 1.6).abs() < 1e-12);
        assert_eq!(camera.center(), Point::new(200.0, 5.0));

        let point = BoundingBox::new(3.0, 4.0, 3.0, 4.0);
        assert_eq!(Camera::frame(&point, 800.0, 600.0, 0.8).scale, 1.0);
    }

    #[test]
    fn test_background() {
        let scene = build(
            r##"<svg xmlns="http://www.w3.org/2000/svg"
                    xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd">
                 <sodipodi:namedview pagecolor="#336699"/>
               </svg>"##,
        );
        assert_eq!(scene.background(), Some(Color::from_rgb(0x33, 0x66, 0x99)));
        assert!(scene.is_empty());
        assert!(scene.envelope().is_empty());
        assert_eq!(scene.camera(), Camera::default());
    }
}
