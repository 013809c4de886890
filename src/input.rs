//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to compute per-frame deltas and to
//! decide on release whether anything is committed to history. `UiState` is
//! the view-only state the renderer reads: active tool, grid flag, hover, and
//! transient previews.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::{ElementId, ShapeType};
use crate::geometry::{Anchor, Point, Rect};
use crate::hit::ResizeHandle;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Drag to pan the viewport.
    Pan,
    Rectangle,
    RoundedRectangle,
    Ellipse,
    /// Create a standalone text box.
    Text,
    /// Freehand pen.
    Freehand,
    /// Drag from one element to another to link them.
    Connector,
}

impl Tool {
    /// The shape this tool creates, if it is a shape tool.
    #[must_use]
    pub fn shape_type(self) -> Option<ShapeType> {
        match self {
            Self::Rectangle => Some(ShapeType::Rectangle),
            Self::RoundedRectangle => Some(ShapeType::RoundedRectangle),
            Self::Ellipse => Some(ShapeType::Ellipse),
            Self::Select | Self::Pan | Self::Text | Self::Freehand | Self::Connector => None,
        }
    }

    /// Whether a click with this tool creates an element immediately.
    #[must_use]
    pub fn creates_element(self) -> bool {
        self.shape_type().is_some() || self == Self::Text
    }

    /// Whether anchor markers are shown (and hit-tested) with this tool.
    #[must_use]
    pub fn shows_anchors(self) -> bool {
        matches!(self, Self::Select | Self::Connector)
    }

    /// Default cursor while hovering empty space.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Select => "default",
            Self::Pan => "grab",
            Self::Text => "text",
            Self::Rectangle | Self::RoundedRectangle | Self::Ellipse | Self::Freehand | Self::Connector => {
                "crosshair"
            }
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Meta: the platform command modifier.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Case-insensitive comparison for single-letter shortcuts.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Wheel / trackpad scroll delta in pixels (positive `dy` = down).
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Live preview line of a connector being dragged, in diagram space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorPreview {
    pub from: Point,
    pub to: Point,
}

/// View state visible to the renderer. Never part of history.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: Tool,
    pub show_grid: bool,
    /// Element under the pointer while idle; its anchor markers are shown.
    pub hovered_id: Option<ElementId>,
    /// Normalized marquee rectangle while a marquee drag is active.
    pub marquee: Option<Rect>,
    /// Absolute points of the freehand stroke being drawn.
    pub draft_points: Vec<Point>,
    pub connector_preview: Option<ConnectorPreview>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::Select,
            show_grid: true,
            hovered_id: None,
            marquee: None,
            draft_points: Vec::new(),
            connector_preview: None,
        }
    }
}

impl UiState {
    /// Drop every transient preview.
    pub fn clear_previews(&mut self) {
        self.marquee = None;
        self.draft_points.clear();
        self.connector_preview = None;
    }
}

/// The gesture in progress. Each active variant carries what pointer-move
/// and pointer-up need.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No button held.
    #[default]
    Idle,
    /// Dragging the viewport.
    Panning {
        /// Screen position at the previous event.
        last_screen: Point,
    },
    /// Rubber-band selection.
    Marquee {
        /// Diagram-space corner where the drag started.
        start_world: Point,
        /// Shift held at mouse-down: union with the existing selection.
        additive: bool,
    },
    /// Moving the selected elements.
    DraggingElements {
        /// Dragged elements with their positions at mouse-down, for cancel.
        origins: Vec<(ElementId, Point)>,
        /// Diagram-space pointer at the previous event.
        last_world: Point,
        /// Whether any non-zero delta was applied.
        moved: bool,
    },
    /// Dragging one of the eight resize handles.
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        /// Diagram-space pointer at mouse-down.
        start_world: Point,
        /// Element geometry at mouse-down.
        orig: Rect,
    },
    /// Freehand stroke; points accumulate in `UiState::draft_points`.
    DrawingFreehand,
    /// Dragging a new connector out of `source`.
    DrawingConnector {
        source: ElementId,
        source_anchor: Anchor,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
