//! Backend-neutral rendered frames.
//!
//! A [`Scene`] is what a renderer produces for one step: labeled cells,
//! range outlines, an optional graph drawing, a title and an optional code
//! panel. The drawing backend is an external collaborator implementing
//! [`Surface`]; [`Scene::draw_on`] replays a scene onto it.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::layout::Point;
use crate::types::StepMetadata;

/// Axis-aligned rectangle in frame coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A filled, labeled rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Placement.
    pub rect: Rect,
    /// Text drawn inside.
    pub text: String,
    /// Fill color.
    pub fill: String,
    /// Small caption under the cell (list index).
    pub caption: Option<String>,
    /// Boundary marker (`Top`, `Front`, `Rear`).
    pub marker: Option<String>,
}

impl Cell {
    /// Create an unmarked, uncaptioned cell.
    pub fn new(rect: Rect, text: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
            fill: fill.into(),
            caption: None,
            marker: None,
        }
    }
}

/// An unfilled outline around a group of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Placement.
    pub rect: Rect,
    /// Stroke color.
    pub color: String,
}

/// A positioned graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Canonical node id.
    pub id: usize,
    /// Label.
    pub label: String,
    /// Position.
    pub position: Point,
    /// Fill color.
    pub fill: String,
}

/// A colored graph edge between canonical node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEdge {
    /// Source id.
    pub source: usize,
    /// Target id.
    pub target: usize,
    /// Stroke color.
    pub color: String,
}

/// Graph drawing of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphScene {
    /// Nodes with positions.
    pub nodes: Vec<SceneNode>,
    /// Edges.
    pub edges: Vec<SceneEdge>,
    /// Draw arrowheads.
    pub directed: bool,
}

/// Code shown beside a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePanel {
    /// `file:line` of the capture.
    pub location: Option<String>,
    /// Source excerpt.
    pub excerpt: Option<String>,
}

/// One rendered frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Step the frame shows.
    pub step: usize,
    /// Frame title.
    pub title: String,
    /// Cells, drawn in order.
    pub cells: Vec<Cell>,
    /// Outlines, drawn over the cells.
    pub outlines: Vec<Outline>,
    /// Graph drawing.
    pub graph: Option<GraphScene>,
    /// Centered text replacing the drawing ("Empty Stack").
    pub placeholder: Option<String>,
    /// Code panel.
    pub code: Option<CodePanel>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(step: usize, title: impl Into<String>) -> Self {
        Self {
            step,
            title: title.into(),
            cells: Vec::new(),
            outlines: Vec::new(),
            graph: None,
            placeholder: None,
            code: None,
        }
    }

    /// Content fingerprint (xxh64 of canonical JSON).
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(self)
    }

    /// Replay the scene onto a drawing surface.
    pub fn draw_on(&self, surface: &mut dyn Surface) {
        surface.clear();
        surface.set_title(&self.title);
        if let Some(text) = &self.placeholder {
            surface.draw_text(text, Point::new(0.5, 0.5));
        }
        for cell in &self.cells {
            surface.draw_cell(cell);
        }
        for outline in &self.outlines {
            surface.draw_outline(outline);
        }
        if let Some(graph) = &self.graph {
            surface.draw_graph(graph);
        }
        if let Some(code) = &self.code {
            surface.draw_code(code);
        }
    }
}

/// Drawing capability provided by a rendering backend.
pub trait Surface {
    /// Clear the surface before a new frame.
    fn clear(&mut self);

    /// Set the frame title.
    fn set_title(&mut self, title: &str);

    /// Draw a filled, labeled rectangle.
    fn draw_cell(&mut self, cell: &Cell);

    /// Draw an unfilled rectangle.
    fn draw_outline(&mut self, outline: &Outline);

    /// Draw a graph from node positions, colors and edges.
    fn draw_graph(&mut self, graph: &GraphScene);

    /// Draw free text.
    fn draw_text(&mut self, text: &str, at: Point);

    /// Draw a code panel. Backends without one may ignore it.
    fn draw_code(&mut self, _code: &CodePanel) {}
}

/// Frame title: explicit title, else `Step {n}: {description}`, else `Step {n}`.
pub fn resolve_title(explicit: Option<&str>, metadata: &StepMetadata) -> String {
    match (explicit, metadata.description()) {
        (Some(title), _) => title.to_string(),
        (None, Some(description)) => format!("Step {}: {}", metadata.step, description),
        (None, None) => format!("Step {}", metadata.step),
    }
}

/// Code panel for a step, if it has code attached.
pub fn code_panel(metadata: &StepMetadata) -> Option<CodePanel> {
    metadata.code().map(|code| CodePanel {
        location: code.location_label(),
        excerpt: code.excerpt.clone(),
    })
}
