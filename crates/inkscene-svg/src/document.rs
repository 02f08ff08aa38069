//! Document loading: the tree reader interface and the element tree.
//!
//! A [`Document`] is built once from any tree implementing [`TreeNode`]
//! (roxmltree nodes out of the box) and owns its root [`Element`]. Elements
//! own their children; the id index only stores [`ElementPath`] handles.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{parse_number, SceneError, SceneResult};
use crate::geometry::{BoundingBox, Circle, Line, Point, Polygon, Polyline, RoundedRect, Shape};
use crate::path::Path;
use crate::style::merge_style;
use crate::transform::Transform;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Attributes copied verbatim from the source node, with their stored names.
const COPIED_ATTRIBUTES: &[(&str, &str)] = &[
    ("id", "id"),
    ("inkscape:label", "label"),
    ("style", "style"),
    ("fill", "fill"),
    ("stroke", "stroke"),
];

// ==================== Tree reader ====================

/// Read access to an XML element tree.
///
/// Names are qualified the way they are written in Inkscape documents:
/// `path`, `sodipodi:namedview`, `inkscape:label`.
pub trait TreeNode: Sized {
    /// Qualified tag name of the element.
    fn qualified_name(&self) -> String;

    /// Attribute value by qualified name.
    fn attr(&self, name: &str) -> Option<&str>;

    fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Child elements in document order. Text and comments are skipped.
    fn element_children(&self) -> Vec<Self>;

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self) -> String;
}

impl TreeNode for roxmltree::Node<'_, '_> {
    fn qualified_name(&self) -> String {
        let tag = self.tag_name();
        let prefix = tag
            .namespace()
            .filter(|uri| *uri != SVG_NAMESPACE)
            .and_then(|uri| self.lookup_prefix(uri));
        match prefix {
            Some(prefix) => format!("{}:{}", prefix, tag.name()),
            None => tag.name().to_string(),
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        match name.split_once(':') {
            Some((prefix, local)) => {
                let uri = self.lookup_namespace_uri(Some(prefix))?;
                self.attribute((uri, local))
            }
            None => self.attribute(name),
        }
    }

    fn element_children(&self) -> Vec<Self> {
        self.children().filter(|n| n.is_element()).collect()
    }

    fn text_content(&self) -> String {
        self.descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect()
    }
}

// ==================== Element tree ====================

/// Handle to an element: the child index at each level below the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ElementPath(pub Vec<usize>);

impl ElementPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// A node of the scene tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Qualified tag name of the source node.
    pub name: String,
    /// Transform from this element's space to its parent's.
    pub transform: Transform,
    /// Direct attributes (`id`, `label`, `style`, `fill`, `stroke`, `title`,
    /// `desc`, `pagecolor`).
    pub attributes: HashMap<String, String>,
    /// Shapes attached to this element, in local coordinates.
    pub shapes: Vec<Shape>,
    /// Path data of a `path` element, kept unlinearized.
    pub path: Option<Path>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Direct attributes with the `style` declarations merged underneath.
    pub fn effective_attributes(&self) -> HashMap<String, String> {
        merge_style(&self.attributes)
    }

    /// Basic shapes of this element in local coordinates; the path, if any,
    /// contributes its linearized subpaths after the attached shapes.
    pub fn basic_shapes(&self, epsilon: f64) -> Vec<Shape> {
        let mut shapes = self.shapes.clone();
        if let Some(path) = &self.path {
            shapes.extend(path.linearize_with_epsilon(epsilon));
        }
        shapes
    }

    /// Bounding box of the element and its descendants in parent space.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box_with(&Transform::IDENTITY)
    }

    /// Bounding box after mapping parent space through `transform`.
    pub fn bounding_box_with(&self, transform: &Transform) -> BoundingBox {
        let transform = *transform * self.transform;
        let mut bounding_box = BoundingBox::empty();
        for shape in &self.shapes {
            bounding_box.add_box(&shape.bounding_box_with(&transform));
        }
        if let Some(path) = &self.path {
            bounding_box.add_box(&path.transform(&transform).bounding_box());
        }
        for child in &self.children {
            bounding_box.add_box(&child.bounding_box_with(&transform));
        }
        bounding_box
    }

    /// Follow `path` down from this element.
    pub fn descendant(&self, path: &ElementPath) -> Option<&Element> {
        path.0
            .iter()
            .try_fold(self, |element, &index| element.children.get(index))
    }

    pub fn descendant_mut(&mut self, path: &ElementPath) -> Option<&mut Element> {
        path.0
            .iter()
            .try_fold(self, |element, &index| element.children.get_mut(index))
    }

    /// Number of elements in this subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Element::count).sum::<usize>()
    }
}

// ==================== Document ====================

/// A loaded document: the root element plus an id index.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
    index: HashMap<String, ElementPath>,
}

impl Document {
    /// Wrap an already built element tree.
    pub fn new(root: Element) -> Self {
        let mut document = Self {
            root,
            index: HashMap::new(),
        };
        document.reindex();
        document
    }

    /// Parse SVG source text.
    pub fn parse_str(source: &str) -> SceneResult<Self> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let tree = roxmltree::Document::parse_with_options(source, options)?;
        Self::from_tree(tree.root_element())
    }

    /// Read and parse an SVG file.
    pub fn open(path: impl AsRef<std::path::Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading document");
        let source = std::fs::read_to_string(path)?;
        Self::parse_str(&source)
    }

    /// Build a document from the first `svg` element at or below `node`.
    pub fn from_tree<N: TreeNode>(node: N) -> SceneResult<Self> {
        let svg = find_svg(node).ok_or(SceneError::MissingRoot)?;
        let root = parse_element(&svg)?;
        let document = Self::new(root);
        debug!(
            elements = document.root.count(),
            ids = document.index.len(),
            "Document loaded"
        );
        Ok(document)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the tree. Call [`Document::reindex`] after changing
    /// ids or the tree shape.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Look up an element by its `id` attribute.
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.index.get(id).and_then(|path| self.root.descendant(path))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        let path = self.index.get(id)?;
        self.root.descendant_mut(path)
    }

    /// Handle of the element with the given id.
    pub fn path_of(&self, id: &str) -> Option<&ElementPath> {
        self.index.get(id)
    }

    /// Rebuild the id index from the current tree.
    pub fn reindex(&mut self) {
        self.index.clear();
        index_element(&self.root, ElementPath::root(), &mut self.index);
    }
}

fn index_element(element: &Element, path: ElementPath, index: &mut HashMap<String, ElementPath>) {
    if let Some(id) = element.id() {
        if index.contains_key(id) {
            debug!(id, "Duplicate element id, keeping the first");
        } else {
            index.insert(id.to_string(), path.clone());
        }
    }
    for (i, child) in element.children.iter().enumerate() {
        index_element(child, path.child(i), index);
    }
}

fn find_svg<N: TreeNode>(node: N) -> Option<N> {
    if node.qualified_name() == "svg" {
        return Some(node);
    }
    node.element_children().into_iter().find_map(find_svg)
}

// ==================== Element parsing ====================

fn parse_element<N: TreeNode>(node: &N) -> SceneResult<Element> {
    let mut element = Element::new(node.qualified_name());
    if let Some(transform) = node.attr("transform") {
        element.transform = Transform::parse(transform)?;
    }
    for &(source, target) in COPIED_ATTRIBUTES {
        if let Some(value) = node.attr(source) {
            element.attributes.insert(target.to_string(), value.to_string());
        }
    }

    let name = element.name.clone();
    match name.as_str() {
        "path" => parse_path_element(node, &mut element)?,
        "rect" => element.shapes.push(parse_rect(node)?),
        "circle" => element.shapes.push(Shape::Circle(Circle::new(
            number_or(node, "cx", 0.0)?,
            number_or(node, "cy", 0.0)?,
            required_number(node, "r")?,
        ))),
        "line" => element.shapes.push(Shape::Line(Line::new(
            number_or(node, "x1", 0.0)?,
            number_or(node, "y1", 0.0)?,
            number_or(node, "x2", 0.0)?,
            number_or(node, "y2", 0.0)?,
        ))),
        "polyline" => element.shapes.push(Shape::Polyline(Polyline::new(parse_points(node)?))),
        "polygon" => element.shapes.push(Shape::Polygon(Polygon::new(parse_points(node)?))),
        "svg" | "g" => {}
        other => debug!(element = other, "Unknown element, treating as container"),
    }

    for child in node.element_children() {
        match child.qualified_name().as_str() {
            "title" => {
                let title = collapse_whitespace(&child.text_content());
                element.attributes.insert("title".to_string(), title);
            }
            "desc" => {
                let desc = collapse_whitespace(&child.text_content());
                element.attributes.insert("desc".to_string(), desc);
            }
            "sodipodi:namedview" => {
                if let Some(color) = child.attr("pagecolor") {
                    element.attributes.insert("pagecolor".to_string(), color.to_string());
                }
            }
            _ => element.children.push(parse_element(&child)?),
        }
    }
    trace!(
        element = %element.name,
        shapes = element.shapes.len(),
        children = element.children.len(),
        "Parsed element"
    );
    Ok(element)
}

fn parse_path_element<N: TreeNode>(node: &N, element: &mut Element) -> SceneResult<()> {
    if node.attr("sodipodi:type") == Some("arc") {
        let rx = required_number(node, "sodipodi:rx")?;
        let ry = required_number(node, "sodipodi:ry")?;
        element.shapes.push(Shape::Circle(Circle::new(
            number_or(node, "sodipodi:cx", 0.0)?,
            number_or(node, "sodipodi:cy", 0.0)?,
            (rx + ry) / 2.0,
        )));
        return Ok(());
    }
    element.path = Some(Path::parse(node.attr("d").unwrap_or_default())?);
    Ok(())
}

fn parse_rect<N: TreeNode>(node: &N) -> SceneResult<Shape> {
    let x = number_or(node, "x", 0.0)?;
    let y = number_or(node, "y", 0.0)?;
    let width = required_number(node, "width")?;
    let height = required_number(node, "height")?;
    let rx = optional_number(node, "rx")?;
    let ry = optional_number(node, "ry")?;
    let (rx, ry) = match (rx, ry) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };
    if rx > 0.0 || ry > 0.0 {
        return Ok(Shape::RoundedRect(RoundedRect::new(x, y, width, height, rx, ry)));
    }
    Ok(Shape::Polygon(Polygon::new(vec![
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
    ])))
}

/// Parse a `points` attribute: coordinate pairs separated by commas or
/// whitespace.
fn parse_points<N: TreeNode>(node: &N) -> SceneResult<Vec<Point>> {
    let values = node
        .attr("points")
        .unwrap_or_default()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_number)
        .collect::<SceneResult<Vec<f64>>>()?;
    if values.len() % 2 != 0 {
        return Err(SceneError::parse(format!(
            "odd number of coordinates in points: {}",
            values.len()
        )));
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}

/// A numeric attribute; blank values count as absent.
fn optional_number<N: TreeNode>(node: &N, name: &str) -> SceneResult<Option<f64>> {
    match node.attr(name).map(str::trim) {
        Some(value) if !value.is_empty() => parse_number(value).map(Some),
        _ => Ok(None),
    }
}

fn number_or<N: TreeNode>(node: &N, name: &str, default: f64) -> SceneResult<f64> {
    Ok(optional_number(node, name)?.unwrap_or(default))
}

fn required_number<N: TreeNode>(node: &N, name: &str) -> SceneResult<f64> {
    optional_number(node, name)?.ok_or_else(|| {
        SceneError::parse(format!(
            "missing attribute {} on <{}>",
            name,
            node.qualified_name()
        ))
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const INKSCAPE_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
     width="100" height="100">
  <sodipodi:namedview id="base" pagecolor="#ffffff"/>
  <title>  Test
     scene </title>
  <g id="layer1" inkscape:label="Layer 1" transform="translate(10,0)">
    <path id="tri" d="M0 0 L10 0 L10 10 Z" style="fill:#ff0000;stroke:none"/>
    <path id="ball" sodipodi:type="arc" sodipodi:cx="5" sodipodi:cy="5"
          sodipodi:rx="2" sodipodi:ry="4" d="M 7 5 A 2 4 0 1 1 7 5 z"/>
  </g>
</svg>"##;

    #[test]
    fn test_parse_inkscape_document() {
        let doc = Document::parse_str(INKSCAPE_SVG).unwrap();
        let root = doc.root();
        assert_eq!(root.name, "svg");
        assert_eq!(root.attribute("pagecolor"), Some("#ffffff"));
        assert_eq!(root.attribute("title"), Some("Test scene"));
        // namedview and title are folded into attributes
        assert_eq!(root.children.len(), 1);

        let layer = doc.get("layer1").unwrap();
        assert_eq!(layer.attribute("label"), Some("Layer 1"));
        assert_eq!(layer.transform, Transform::translate(10.0, 0.0));
        assert_eq!(layer.children.len(), 2);
    }

    #[test]
    fn test_sodipodi_arc_becomes_circle() {
        let doc = Document::parse_str(INKSCAPE_SVG).unwrap();
        let ball = doc.get("ball").unwrap();
        assert!(ball.path.is_none());
        assert_eq!(ball.shapes, vec![Shape::Circle(Circle::new(5.0, 5.0, 3.0))]);
    }

    #[test]
    fn test_path_element() {
        let doc = Document::parse_str(INKSCAPE_SVG).unwrap();
        let tri = doc.get("tri").unwrap();
        let path = tri.path.as_ref().unwrap();
        assert_eq!(path.subpaths.len(), 1);
        let attrs = tri.effective_attributes();
        assert_eq!(attrs["fill"], "#ff0000");
        assert_eq!(attrs["stroke"], "none");
    }

    #[test]
    fn test_element_bounding_box() {
        let doc = Document::parse_str(INKSCAPE_SVG).unwrap();
        let layer = doc.get("layer1").unwrap();
        // triangle (0..10, 0..10) and circle (2..8, 2..8), moved 10 right
        assert_eq!(layer.bounding_box(), BoundingBox::new(10.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn test_rect_variants() {
        let doc = Document::parse_str(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <rect id="plain" width="4" height="2"/>
                 <rect id="round" x="1" y="1" width="4" height="2" rx="0.5"/>
               </svg>"#,
        )
        .unwrap();
        match &doc.get("plain").unwrap().shapes[0] {
            Shape::Polygon(p) => {
                assert_eq!(p.points.len(), 4);
                assert_eq!(p.signed_area(), 8.0);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
        assert_eq!(
            doc.get("round").unwrap().shapes[0],
            Shape::RoundedRect(RoundedRect::new(1.0, 1.0, 4.0, 2.0, 0.5, 0.5))
        );
    }

    #[test]
    fn test_line_and_poly_elements() {
        let doc = Document::parse_str(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <line id="l" x2="3" y2="4"/>
                 <polyline id="pl" points="0,0 1,1 2,0"/>
                 <polygon id="pg" points="0 0, 4 0, 4 4"/>
               </svg>"#,
        )
        .unwrap();
        assert_eq!(doc.get("l").unwrap().shapes[0], Shape::Line(Line::new(0.0, 0.0, 3.0, 4.0)));
        assert_eq!(doc.get("pl").unwrap().shapes[0].kind(), "polyline");
        assert_eq!(doc.get("pg").unwrap().shapes[0].area(), 8.0);
    }

    #[test]
    fn test_missing_required_attribute() {
        let err = Document::parse_str(r#"<svg><circle cx="1"/></svg>"#).unwrap_err();
        assert!(matches!(err, SceneError::Parse(ref msg) if msg.contains("r on <circle>")));
        assert!(Document::parse_str(r#"<svg><rect width="1"/></svg>"#).is_err());
        assert!(Document::parse_str(r#"<svg><polygon points="1 2 3"/></svg>"#).is_err());
    }

    #[test]
    fn test_errors_abort_loading() {
        assert!(matches!(
            Document::parse_str(r#"<svg><path d="M 0 0 ?"/></svg>"#),
            Err(SceneError::Parse(_))
        ));
        assert!(matches!(
            Document::parse_str(r#"<svg><g transform="spin(3)"/></svg>"#),
            Err(SceneError::Parse(_))
        ));
        assert!(matches!(Document::parse_str("<svg>"), Err(SceneError::Xml(_))));
        assert!(matches!(
            Document::parse_str("<html><body/></html>"),
            Err(SceneError::MissingRoot)
        ));
    }

    #[test]
    fn test_nested_svg_root() {
        let doc = Document::parse_str(r#"<root><svg id="inner"><g/></svg></root>"#).unwrap();
        assert_eq!(doc.root().id(), Some("inner"));
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let doc = Document::parse_str(
            r#"<svg><g id="a" fill="red"/><g id="a" fill="blue"/></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.get("a").unwrap().attribute("fill"), Some("red"));
        assert_eq!(doc.path_of("a"), Some(&ElementPath(vec![0])));
    }

    #[test]
    fn test_reindex_after_mutation() {
        let mut doc = Document::parse_str(r#"<svg><g id="a"><g id="b"/></g></svg>"#).unwrap();
        doc.root_mut().children[0].children[0]
            .attributes
            .insert("id".to_string(), "c".to_string());
        doc.reindex();
        assert!(doc.get("b").is_none());
        assert_eq!(doc.get("c").unwrap().name, "g");
        assert_eq!(doc.path_of("c").unwrap().depth(), 2);
    }
}
