//! # Inkscene SVG
//!
//! Load Inkscape-flavoured SVG documents into flat scenes of geometric
//! shapes with absolute coordinates.
//!
//! ## Features
//!
//! - **Transforms**: SVG transform lists parsed into 2D affine matrices
//! - **Paths**: full path-data grammar (M, Z, L, H, V, C, S, Q, T, A), relative
//!   and repeated commands normalized to absolute ones
//! - **Shapes**: point, line, polyline, polygon, circle, rounded rect, group
//! - **Paint**: color keywords, hex colors, inline `style` declarations
//! - **Scenes**: transform stacks flattened, envelope and camera framing
//!
//! ## Architecture
//!
//! ```text
//! SVG text ── roxmltree ── Document
//!                            └── Element tree (transform, attributes, shapes, path)
//!                                  └── Scene::build
//!                                        ├── SceneEntry (shape, fill, stroke)
//!                                        ├── Envelope
//!                                        └── Camera
//! ```
//!
//! ## Example
//!
//! ```
//! use inkscene_svg::{Document, Scene, SceneConfig};
//!
//! let svg = r#"<svg><rect x="10" y="10" width="20" height="20" fill="red"/></svg>"#;
//! let document = Document::parse_str(svg)?;
//! let scene = Scene::build(&document, &SceneConfig::default())?;
//! assert_eq!(scene.len(), 1);
//! # Ok::<(), inkscene_svg::SceneError>(())
//! ```

pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod path;
pub mod scene;
pub mod style;
pub mod transform;

pub use color::{parse_float_color, Color};
pub use config::SceneConfig;
pub use document::{Document, Element, ElementPath, TreeNode};
pub use error::{SceneError, SceneResult};
pub use geometry::{BoundingBox, Circle, Line, Point, Polygon, Polyline, RoundedRect, Shape};
pub use path::{Command, Path, Subpath};
pub use scene::{Camera, Scene, SceneEntry};
pub use style::parse_style;
pub use transform::Transform;
