//! Document model: diagram elements, connectors, styles, and sparse patches.
//!
//! `CanvasElement` carries the fields every element shares (identity and
//! bounding box) plus an exhaustive, tagged `ElementKind` payload. Connectors
//! reference two elements by id and remember which anchor they attach to on
//! each side. `ElementPatch` / `ConnectorPatch` are sparse updates applied by
//! the store; only present fields are merged.
//!
//! The serde shape of these types is the element/connector section of the
//! on-disk diagram file (see [`crate::file`]).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::MIN_DRAWING_EXTENT;
use crate::geometry::{Anchor, AnchorPoints, Point, Rect, anchor_points, bounds_of};

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Unique identifier for a connector.
pub type ConnectorId = Uuid;

// =============================================================
// Styles
// =============================================================

/// Outline geometry of a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeType {
    Rectangle,
    RoundedRectangle,
    Ellipse,
}

/// Fill and stroke of a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self { fill: "#FFFFFF".into(), stroke: "#1F1A17".into(), stroke_width: 2.0, opacity: 1.0 }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Font and color of element text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    pub align: TextAlign,
    pub bold: bool,
    pub italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_family: "sans-serif".into(),
            color: "#1F1A17".into(),
            align: TextAlign::Center,
            bold: false,
            italic: false,
        }
    }
}

/// Stroke of a freehand drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for DrawingStyle {
    fn default() -> Self {
        Self { stroke: "#1F1A17".into(), stroke_width: 2.0, opacity: 1.0 }
    }
}

/// Dash pattern of a connector line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// Stroke and arrowheads of a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectorStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub line_style: LineStyle,
    pub arrow_start: bool,
    pub arrow_end: bool,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            stroke: "#1F1A17".into(),
            stroke_width: 2.0,
            line_style: LineStyle::Solid,
            arrow_start: false,
            arrow_end: true,
        }
    }
}

// =============================================================
// Elements
// =============================================================

/// Variant payload of an element. Serialized inline with a `"type"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    /// Outlined shape with optional inline label.
    Shape {
        shape_type: ShapeType,
        #[serde(default)]
        style: ShapeStyle,
        #[serde(default)]
        text: String,
        #[serde(default)]
        text_style: TextStyle,
    },
    /// Standalone text box without fill or stroke.
    Text {
        #[serde(default)]
        text: String,
        #[serde(default)]
        text_style: TextStyle,
    },
    /// Freehand stroke. Points are relative to the element origin.
    Drawing {
        points: Vec<Point>,
        #[serde(default)]
        style: DrawingStyle,
    },
}

/// A diagram element as stored in the model and in the diagram file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    /// Unique identifier for this element.
    pub id: ElementId,
    /// Left edge of the bounding box in diagram coordinates.
    pub x: f64,
    /// Top edge of the bounding box in diagram coordinates.
    pub y: f64,
    /// Width of the bounding box.
    pub width: f64,
    /// Height of the bounding box.
    pub height: f64,
    /// Clockwise rotation in degrees around the bounding-box center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Locked elements ignore drag and resize gestures.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    /// Variant payload.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl CanvasElement {
    /// New shape with default styles and empty label.
    #[must_use]
    pub fn shape(shape_type: ShapeType, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            rotation: None,
            locked: false,
            kind: ElementKind::Shape {
                shape_type,
                style: ShapeStyle::default(),
                text: String::new(),
                text_style: TextStyle::default(),
            },
        }
    }

    /// New empty text box with the default text style.
    #[must_use]
    pub fn text(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            rotation: None,
            locked: false,
            kind: ElementKind::Text { text: String::new(), text_style: TextStyle::default() },
        }
    }

    /// New freehand drawing from absolute diagram-space points.
    ///
    /// The element origin is the top-left of the points' bounding box and the
    /// stored points are made relative to it. Returns `None` for fewer than
    /// two points.
    #[must_use]
    pub fn drawing(points: &[Point], style: DrawingStyle) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let bounds = bounds_of(points)?;
        let relative = points
            .iter()
            .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y))
            .collect();
        Some(Self {
            id: Uuid::new_v4(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width.max(MIN_DRAWING_EXTENT),
            height: bounds.height.max(MIN_DRAWING_EXTENT),
            rotation: None,
            locked: false,
            kind: ElementKind::Drawing { points: relative, style },
        })
    }

    /// Bounding box in diagram space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Anchor positions on the current bounding box.
    #[must_use]
    pub fn anchors(&self) -> AnchorPoints {
        anchor_points(self.bounds())
    }

    /// Diagram-space position of one anchor.
    #[must_use]
    pub fn anchor(&self, anchor: Anchor) -> Point {
        self.anchors().get(anchor)
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.kind, ElementKind::Drawing { .. })
    }

    /// Whether this element carries editable text (shape label or text box).
    #[must_use]
    pub fn has_text(&self) -> bool {
        matches!(self.kind, ElementKind::Shape { .. } | ElementKind::Text { .. })
    }

    /// The element's text, if its variant has any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Shape { text, .. } | ElementKind::Text { text, .. } => Some(text),
            ElementKind::Drawing { .. } => None,
        }
    }

    /// Drawing points translated into diagram space. Empty for non-drawings.
    #[must_use]
    pub fn absolute_points(&self) -> Vec<Point> {
        match &self.kind {
            ElementKind::Drawing { points, .. } => points.iter().map(|p| p.offset(self.x, self.y)).collect(),
            ElementKind::Shape { .. } | ElementKind::Text { .. } => Vec::new(),
        }
    }

    /// Merge a sparse patch into this element. Fields that do not apply to
    /// the element's variant are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(r) = patch.rotation {
            self.rotation = Some(r);
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        match &mut self.kind {
            ElementKind::Shape { shape_type, style, text, text_style } => {
                if let Some(t) = patch.shape_type {
                    *shape_type = t;
                }
                if let Some(ref s) = patch.style {
                    *style = s.clone();
                }
                if let Some(ref t) = patch.text {
                    text.clone_from(t);
                }
                if let Some(ref ts) = patch.text_style {
                    *text_style = ts.clone();
                }
            }
            ElementKind::Text { text, text_style } => {
                if let Some(ref t) = patch.text {
                    text.clone_from(t);
                }
                if let Some(ref ts) = patch.text_style {
                    *text_style = ts.clone();
                }
            }
            ElementKind::Drawing { style, .. } => {
                if let Some(ref s) = patch.drawing_style {
                    *style = s.clone();
                }
            }
        }
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Shapes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeType>,
    /// Shapes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ShapeStyle>,
    /// Shapes and text boxes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Shapes and text boxes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
    /// Drawings only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawing_style: Option<DrawingStyle>,
}

// =============================================================
// Connectors
// =============================================================

/// A directed link between two elements, attached at one anchor on each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorElement {
    pub id: ConnectorId,
    pub source_id: ElementId,
    pub target_id: ElementId,
    pub source_anchor: Anchor,
    pub target_anchor: Anchor,
    #[serde(default)]
    pub style: ConnectorStyle,
    /// Manual route between the two anchors, replacing the straight line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<Point>>,
}

impl ConnectorElement {
    #[must_use]
    pub fn new(source_id: ElementId, source_anchor: Anchor, target_id: ElementId, target_anchor: Anchor) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id,
            target_id,
            source_anchor,
            target_anchor,
            style: ConnectorStyle::default(),
            waypoints: None,
        }
    }

    /// Whether either endpoint references `id`.
    #[must_use]
    pub fn touches(&self, id: &ElementId) -> bool {
        self.source_id == *id || self.target_id == *id
    }

    /// Merge a sparse patch into this connector.
    pub fn apply_patch(&mut self, patch: &ConnectorPatch) {
        if let Some(a) = patch.source_anchor {
            self.source_anchor = a;
        }
        if let Some(a) = patch.target_anchor {
            self.target_anchor = a;
        }
        if let Some(ref s) = patch.style {
            self.style = s.clone();
        }
        if let Some(ref w) = patch.waypoints {
            self.waypoints = if w.is_empty() { None } else { Some(w.clone()) };
        }
    }
}

/// Sparse update for a connector. An empty `waypoints` list clears the
/// manual route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_anchor: Option<Anchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_anchor: Option<Anchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ConnectorStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<Point>>,
}
