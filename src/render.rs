//! Rendering: builds a display list for the current scene.
//!
//! This module produces drawing primitives and never touches a real surface;
//! the host replays [`Scene::primitives`] onto whatever backend it has (2D
//! canvas, SVG, a native painter). It reads the model, camera, and view state
//! and mutates nothing.
//!
//! Coordinates are in diagram space unless a primitive says otherwise; the
//! host applies the camera transform (`Scene::camera`) before replaying.
//! Selection chrome sizes are pre-divided by the zoom so they come out at a
//! constant screen size.
//!
//! Layer order: grid, connectors, elements (z-order), selection outlines,
//! resize handles, anchor markers, marquee, freehand draft, connector preview.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::consts::GRID_SPACING;
use crate::doc::{
    CanvasElement, ConnectorId, ConnectorStyle, DrawingStyle, ElementId, ElementKind, ShapeStyle, ShapeType, TextStyle,
};
use crate::geometry::{Point, Rect};
use crate::hit;
use crate::input::UiState;
use crate::store::DiagramStore;

/// Arrowhead length in diagram units.
const ARROW_SIZE: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Background grid in screen space: lines every `spacing` pixels, the
    /// first one at `offset`.
    Grid { spacing: f64, offset: Point },
    Shape { id: ElementId, shape_type: ShapeType, rect: Rect, rotation: f64, style: ShapeStyle },
    /// Text laid out inside `rect` (a shape label or a text box).
    Text { id: ElementId, rect: Rect, rotation: f64, text: String, style: TextStyle },
    /// Freehand stroke through absolute points.
    Path { id: ElementId, points: Vec<Point>, style: DrawingStyle },
    /// Connector line through its anchors and waypoints.
    Connector { id: ConnectorId, points: Vec<Point>, style: ConnectorStyle, selected: bool },
    /// Filled triangle: tip first.
    ArrowHead { points: [Point; 3], color: String },
    /// Dashed bounding box around a selected element.
    SelectionOutline { rect: Rect, rotation: f64, dash: f64, line_width: f64 },
    /// Square resize handle centred on `center`.
    ResizeHandle { center: Point, half_size: f64 },
    /// Circular connector anchor marker.
    AnchorMarker { center: Point, radius: f64 },
    Marquee { rect: Rect, dash: f64, line_width: f64 },
    /// Freehand stroke still being drawn.
    DraftPath { points: Vec<Point>, style: DrawingStyle },
    /// Dashed line from a connector's source anchor to the pointer.
    ConnectorPreview { from: Point, to: Point, dash: f64 },
}

/// A full frame: camera plus primitives in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub primitives: Vec<Primitive>,
}

/// Build the display list for one frame.
#[must_use]
pub fn draw(
    store: &DiagramStore,
    camera: &Camera,
    ui: &UiState,
    config: &EngineConfig,
    anchor_owners: &[ElementId],
) -> Scene {
    let mut out = Vec::new();
    let zoom = camera.zoom;

    if ui.show_grid {
        let spacing = GRID_SPACING * zoom;
        out.push(Primitive::Grid {
            spacing,
            offset: Point::new(camera.pan_x.rem_euclid(spacing), camera.pan_y.rem_euclid(spacing)),
        });
    }

    for c in store.connectors() {
        let Some(points) = store.connector_path(c) else {
            continue;
        };
        let heads = arrowheads(&points, &c.style);
        out.push(Primitive::Connector {
            id: c.id,
            points,
            style: c.style.clone(),
            selected: store.is_selected(&c.id),
        });
        out.extend(heads);
    }

    for el in store.elements() {
        draw_element(&mut out, el);
    }

    let dash = SELECTION_DASH_PX / zoom;
    let line_width = 1.0 / zoom;
    for el in store.selected_elements() {
        out.push(Primitive::SelectionOutline {
            rect: el.bounds(),
            rotation: el.rotation.unwrap_or(0.0),
            dash,
            line_width,
        });
    }

    if let Some(el) = store.single_selected_element().filter(|el| hit::is_resizable(el)) {
        let half_size = config.handle_radius_px / zoom;
        for (_, center) in hit::resize_handle_positions(el.bounds()) {
            out.push(Primitive::ResizeHandle { center, half_size });
        }
    }

    let radius = config.anchor_radius_px / zoom;
    for el in anchor_owners.iter().filter_map(|id| store.element(id)) {
        for (_, center) in el.anchors().iter() {
            out.push(Primitive::AnchorMarker { center, radius });
        }
    }

    if let Some(rect) = ui.marquee {
        out.push(Primitive::Marquee { rect, dash, line_width });
    }

    if ui.draft_points.len() > 1 {
        out.push(Primitive::DraftPath { points: ui.draft_points.clone(), style: DrawingStyle::default() });
    }

    if let Some(preview) = ui.connector_preview {
        out.push(Primitive::ConnectorPreview { from: preview.from, to: preview.to, dash });
    }

    Scene { camera: *camera, primitives: out }
}

fn draw_element(out: &mut Vec<Primitive>, el: &CanvasElement) {
    let rect = el.bounds();
    let rotation = el.rotation.unwrap_or(0.0);
    match &el.kind {
        ElementKind::Shape { shape_type, style, text, text_style } => {
            out.push(Primitive::Shape { id: el.id, shape_type: *shape_type, rect, rotation, style: style.clone() });
            if !text.is_empty() {
                out.push(Primitive::Text { id: el.id, rect, rotation, text: text.clone(), style: text_style.clone() });
            }
        }
        ElementKind::Text { text, text_style } => {
            out.push(Primitive::Text { id: el.id, rect, rotation, text: text.clone(), style: text_style.clone() });
        }
        ElementKind::Drawing { style, .. } => {
            out.push(Primitive::Path { id: el.id, points: el.absolute_points(), style: style.clone() });
        }
    }
}

fn arrowheads(points: &[Point], style: &ConnectorStyle) -> Vec<Primitive> {
    let mut heads = Vec::new();
    let n = points.len();
    if n < 2 {
        return heads;
    }
    if style.arrow_end {
        heads.push(arrowhead(points[n - 2], points[n - 1], &style.stroke));
    }
    if style.arrow_start {
        heads.push(arrowhead(points[1], points[0], &style.stroke));
    }
    heads
}

/// Triangle pointing at `tip`, along the direction `from -> tip`.
fn arrowhead(from: Point, tip: Point, color: &str) -> Primitive {
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    let wing = |a: f64| Point::new(tip.x - ARROW_SIZE * a.cos(), tip.y - ARROW_SIZE * a.sin());
    Primitive::ArrowHead { points: [tip, wing(angle - ARROW_ANGLE), wing(angle + ARROW_ANGLE)], color: color.to_owned() }
}
