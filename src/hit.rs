//! Hit-testing: what lies under a diagram-space point.
//!
//! Checks run in a fixed priority order and the first hit wins:
//!
//! 1. resize handles of the single selected element,
//! 2. anchor markers of the candidate elements (hovered / selected),
//! 3. element bodies, topmost first,
//! 4. connectors.
//!
//! Handle, marker, and stroke tolerances are configured in screen pixels and
//! divided by the zoom, so affordances keep a constant on-screen size. The
//! handle geometry here is the same geometry the renderer draws.
//!
//! Rotation is display-only; hit-testing uses the unrotated bounding box.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use uuid::Uuid;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::doc::{CanvasElement, ElementId, ElementKind, ShapeType};
use crate::geometry::{Anchor, Point, Rect, distance, point_in_ellipse, point_in_rect, point_near_polyline};
use crate::store::DiagramStore;

/// One of the eight resize handles on a selected element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
    ];

    /// CSS cursor name for hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeHandle::N | ResizeHandle::S => "ns-resize",
            ResizeHandle::E | ResizeHandle::W => "ew-resize",
            ResizeHandle::Ne | ResizeHandle::Sw => "nesw-resize",
            ResizeHandle::Nw | ResizeHandle::Se => "nwse-resize",
        }
    }

    fn moves_west(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::W | ResizeHandle::Sw)
    }

    fn moves_east(self) -> bool {
        matches!(self, ResizeHandle::Ne | ResizeHandle::E | ResizeHandle::Se)
    }

    fn moves_north(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::N | ResizeHandle::Ne)
    }

    fn moves_south(self) -> bool {
        matches!(self, ResizeHandle::Sw | ResizeHandle::S | ResizeHandle::Se)
    }
}

/// Which part of a target was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
    AnchorMarker(Anchor),
    Connector,
}

/// Result of a hit test. `id` is an element id, or a connector id when
/// `part` is `HitPart::Connector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: Uuid,
    pub part: HitPart,
}

/// Whether an element shows resize handles when it is the only selection.
#[must_use]
pub fn is_resizable(el: &CanvasElement) -> bool {
    !el.is_drawing() && !el.locked
}

/// Diagram-space positions of the eight resize handles of `rect`.
#[must_use]
pub fn resize_handle_positions(rect: Rect) -> [(ResizeHandle, Point); 8] {
    let Rect { x, y, width: w, height: h } = rect;
    let (cx, cy) = (x + w / 2.0, y + h / 2.0);
    [
        (ResizeHandle::Nw, Point::new(x, y)),
        (ResizeHandle::N, Point::new(cx, y)),
        (ResizeHandle::Ne, Point::new(x + w, y)),
        (ResizeHandle::E, Point::new(x + w, cy)),
        (ResizeHandle::Se, Point::new(x + w, y + h)),
        (ResizeHandle::S, Point::new(cx, y + h)),
        (ResizeHandle::Sw, Point::new(x, y + h)),
        (ResizeHandle::W, Point::new(x, cy)),
    ]
}

/// New geometry for a resize gesture: `orig` is the rect at mouse-down and
/// `(dx, dy)` the total pointer displacement since then.
///
/// Corner handles change both dimensions, edge handles one. Sizes are floored
/// at `min_size`; when the floor kicks in the edge opposite the dragged one
/// stays where it was.
#[must_use]
pub fn resize_rect(orig: Rect, handle: ResizeHandle, dx: f64, dy: f64, min_size: f64) -> Rect {
    let mut out = orig;
    if handle.moves_east() {
        out.width = (orig.width + dx).max(min_size);
    } else if handle.moves_west() {
        out.width = (orig.width - dx).max(min_size);
        out.x = orig.right() - out.width;
    }
    if handle.moves_south() {
        out.height = (orig.height + dy).max(min_size);
    } else if handle.moves_north() {
        out.height = (orig.height - dy).max(min_size);
        out.y = orig.bottom() - out.height;
    }
    out
}

/// Whether `p` lies on an element's body. `slop` widens freehand strokes.
#[must_use]
pub fn element_contains(el: &CanvasElement, p: Point, slop: f64) -> bool {
    match &el.kind {
        ElementKind::Shape { shape_type: ShapeType::Ellipse, .. } => point_in_ellipse(p, el.bounds()),
        ElementKind::Shape { .. } | ElementKind::Text { .. } => point_in_rect(p, el.bounds()),
        ElementKind::Drawing { style, .. } => {
            point_near_polyline(p, &el.absolute_points(), style.stroke_width / 2.0 + slop)
        }
    }
}

/// Topmost element whose body contains `p`, skipping `exclude`.
#[must_use]
pub fn element_at(store: &DiagramStore, p: Point, slop: f64, exclude: Option<ElementId>) -> Option<ElementId> {
    store
        .elements()
        .iter()
        .rev()
        .filter(|el| Some(el.id) != exclude)
        .find(|el| element_contains(el, p, slop))
        .map(|el| el.id)
}

/// The anchor marker of `el` within `radius` of `p`, closest first.
#[must_use]
pub fn anchor_marker_at(el: &CanvasElement, p: Point, radius: f64) -> Option<Anchor> {
    let anchors = el.anchors();
    let nearest = anchors.nearest(p);
    (distance(p, anchors.get(nearest)) <= radius).then_some(nearest)
}

/// Where a connector being dragged from `source` would attach if released at
/// `p`: an exact anchor-marker hit on another element, else the nearest
/// anchor of the element under the pointer.
#[must_use]
pub fn connector_target(
    store: &DiagramStore,
    camera: &Camera,
    config: &EngineConfig,
    p: Point,
    source: ElementId,
) -> Option<(ElementId, Anchor)> {
    let radius = camera.screen_dist_to_world(config.anchor_radius_px);
    let marker = store
        .elements()
        .iter()
        .rev()
        .filter(|el| el.id != source)
        .find_map(|el| anchor_marker_at(el, p, radius).map(|a| (el.id, a)));
    if marker.is_some() {
        return marker;
    }
    let slop = camera.screen_dist_to_world(config.hit_slop_px);
    let id = element_at(store, p, slop, Some(source))?;
    let el = store.element(&id)?;
    Some((id, el.anchors().nearest(p)))
}

/// Full hit test in priority order. `anchor_owners` are the elements whose
/// anchor markers are currently shown; pass an empty slice to skip markers.
#[must_use]
pub fn hit_test(
    store: &DiagramStore,
    camera: &Camera,
    config: &EngineConfig,
    p: Point,
    anchor_owners: &[ElementId],
) -> Option<Hit> {
    if let Some(el) = store.single_selected_element().filter(|el| is_resizable(el)) {
        let radius = camera.screen_dist_to_world(config.handle_radius_px);
        for (handle, pos) in resize_handle_positions(el.bounds()) {
            if (p.x - pos.x).abs() <= radius && (p.y - pos.y).abs() <= radius {
                return Some(Hit { id: el.id, part: HitPart::ResizeHandle(handle) });
            }
        }
    }

    let anchor_radius = camera.screen_dist_to_world(config.anchor_radius_px);
    for id in anchor_owners {
        if let Some(el) = store.element(id)
            && let Some(anchor) = anchor_marker_at(el, p, anchor_radius)
        {
            return Some(Hit { id: el.id, part: HitPart::AnchorMarker(anchor) });
        }
    }

    let slop = camera.screen_dist_to_world(config.hit_slop_px);
    if let Some(id) = element_at(store, p, slop, None) {
        return Some(Hit { id, part: HitPart::Body });
    }

    store.connectors().iter().rev().find_map(|c| {
        let path = store.connector_path(c)?;
        point_near_polyline(p, &path, c.style.stroke_width / 2.0 + slop).then_some(Hit { id: c.id, part: HitPart::Connector })
    })
}
