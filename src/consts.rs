//! Shared numeric constants for the diagram engine.

// ── Geometry ────────────────────────────────────────────────────

/// Minimum width and height of a non-drawing element after an interactive resize.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Smallest extent a freehand drawing's bounding box may collapse to.
pub const MIN_DRAWING_EXTENT: f64 = 1.0;

// ── Camera ──────────────────────────────────────────────────────

/// Lower zoom bound.
pub const ZOOM_MIN: f64 = 0.1;

/// Upper zoom bound.
pub const ZOOM_MAX: f64 = 5.0;

// ── Rendering ───────────────────────────────────────────────────

/// Grid cell size in diagram units.
pub const GRID_SPACING: f64 = 20.0;

// ── History ─────────────────────────────────────────────────────

/// Default number of snapshots retained by the undo stack.
pub const HISTORY_LIMIT: usize = 50;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space half-size in pixels of a resize handle.
pub const HANDLE_RADIUS_PX: f64 = 5.0;

/// Screen-space radius in pixels of a connector anchor marker.
pub const ANCHOR_RADIUS_PX: f64 = 6.0;

/// Screen-space slop in pixels for thin strokes (connectors, freehand paths).
pub const HIT_SLOP_PX: f64 = 6.0;

// ── Creation defaults ───────────────────────────────────────────

/// Default `(width, height)` of a new shape.
pub const DEFAULT_SHAPE_SIZE: (f64, f64) = (120.0, 80.0);

/// Default `(width, height)` of a new text box.
pub const DEFAULT_TEXT_SIZE: (f64, f64) = (160.0, 40.0);

/// Default paste offset in diagram units.
pub const PASTE_OFFSET: f64 = 20.0;

/// Wheel delta multiplier used to derive the zoom factor.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.0015;

/// Current on-disk diagram file version.
pub const FILE_VERSION: u32 = 1;
