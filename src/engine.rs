//! Interaction controller: turns raw pointer, wheel, and keyboard events into
//! store mutations.
//!
//! DESIGN
//! ======
//! `Engine` owns the model store, the camera, the view state, and the gesture
//! state machine. Each handler takes screen-space input, converts it with the
//! camera, advances `InputState`, and returns a list of [`Action`]s for the
//! host (redraw, cursor change, history committed, ...).
//!
//! Only one gesture runs at a time. Per-frame updates mutate the live model
//! directly; history is pushed once when a gesture completes, and only if it
//! actually changed something. Keyboard commands other than Escape are
//! ignored while a gesture is in progress.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use time::OffsetDateTime;
use tracing::debug;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::consts::MIN_ELEMENT_SIZE;
use crate::doc::{ElementId, ElementPatch};
use crate::file::{DiagramFile, Metadata};
use crate::geometry::{Point, Rect, rects_intersect};
use crate::hit::{self, Hit, HitPart};
use crate::input::{Button, ConnectorPreview, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::render::{self, Scene};
use crate::store::DiagramStore;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The display list is stale.
    RenderNeeded,
    /// CSS cursor name to show.
    SetCursor(&'static str),
    /// The active tool changed without the host asking (e.g. after creating a shape).
    ToolChanged(Tool),
    /// A history snapshot was pushed.
    HistoryCommitted,
    /// The host should open its inline text editor for this element and
    /// report the result through [`Engine::set_text`].
    EditTextRequested { id: ElementId },
}

pub struct Engine {
    pub store: DiagramStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: DiagramStore::with_config(&config),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::Idle,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- View state ---

    /// Switch tools. Cancels any gesture in progress; never touches the model.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.cancel_gesture();
        self.ui.tool = tool;
        vec![Action::SetCursor(tool.cursor()), Action::RenderNeeded]
    }

    pub fn toggle_grid(&mut self) -> Vec<Action> {
        self.ui.show_grid = !self.ui.show_grid;
        vec![Action::RenderNeeded]
    }

    /// Replace the camera (zoom is clamped).
    pub fn set_camera(&mut self, camera: Camera) -> Vec<Action> {
        self.camera = camera.clamped();
        vec![Action::RenderNeeded]
    }

    /// Back to identity pan and zoom.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.camera.reset();
        vec![Action::RenderNeeded]
    }

    /// Elements whose anchor markers are shown: the hovered element and the
    /// single selected element, when the active tool uses anchors.
    ///
    /// An element showing resize handles never shows markers: the N/E/S/W
    /// handles sit on the anchor points and win the hit test.
    #[must_use]
    pub fn anchor_owners(&self) -> Vec<ElementId> {
        if !self.ui.tool.shows_anchors() {
            return Vec::new();
        }
        let selected = self.store.single_selected_element();
        let handle_owner = selected.filter(|el| hit::is_resizable(el)).map(|el| el.id);
        let mut owners = Vec::with_capacity(2);
        if let Some(id) = self.ui.hovered_id
            && Some(id) != handle_owner
        {
            owners.push(id);
        }
        if let Some(el) = selected
            && Some(el.id) != handle_owner
            && !owners.contains(&el.id)
        {
            owners.push(el.id);
        }
        owners
    }

    /// Display list for the current frame.
    #[must_use]
    pub fn render(&self) -> Scene {
        render::draw(&self.store, &self.camera, &self.ui, &self.config, &self.anchor_owners())
    }

    // --- Persistence ---

    /// Replace the model and viewport with a loaded file.
    pub fn load_file(&mut self, file: DiagramFile) -> Vec<Action> {
        self.input = InputState::Idle;
        self.ui.clear_previews();
        self.ui.hovered_id = None;
        self.store.load_diagram(file.elements, file.connectors);
        self.camera = file.viewport.clamped();
        vec![Action::RenderNeeded]
    }

    /// Snapshot the model and viewport as a file stamped modified now.
    #[must_use]
    pub fn to_file(&self, created: OffsetDateTime) -> DiagramFile {
        let metadata = Metadata { created, modified: OffsetDateTime::now_utc() };
        DiagramFile::new(self.store.elements().to_vec(), self.store.connectors().to_vec(), self.camera, metadata)
    }

    /// Commit edited text for a shape label or text box.
    pub fn set_text(&mut self, id: &ElementId, text: &str) -> Vec<Action> {
        match self.store.element(id).and_then(|el| el.label()) {
            None => {
                debug!(%id, "set_text: element has no text");
                return Vec::new();
            }
            Some(current) if current == text => return Vec::new(),
            Some(_) => {}
        }
        let patch = ElementPatch { text: Some(text.to_owned()), ..Default::default() };
        self.store.update_element(id, &patch);
        self.store.push_history();
        vec![Action::HistoryCommitted, Action::RenderNeeded]
    }

    // --- Pointer ---

    fn hit_at(&self, world: Point) -> Option<Hit> {
        hit::hit_test(&self.store, &self.camera, &self.config, world, &self.anchor_owners())
    }

    /// Pointer-down. Starts at most one gesture.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.input.is_idle() {
            return Vec::new();
        }
        match button {
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen };
                vec![Action::SetCursor("grabbing")]
            }
            Button::Secondary => Vec::new(),
            Button::Primary => self.primary_down(screen, modifiers),
        }
    }

    fn primary_down(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        let tool = self.ui.tool;

        match tool {
            Tool::Pan => {
                self.input = InputState::Panning { last_screen: screen };
                return vec![Action::SetCursor("grabbing")];
            }
            Tool::Freehand => {
                self.input = InputState::DrawingFreehand;
                self.ui.draft_points = vec![world];
                return vec![Action::RenderNeeded];
            }
            _ => {}
        }

        let hit = self.hit_at(world);

        if tool == Tool::Connector {
            return match hit {
                Some(Hit { part: HitPart::Connector, .. }) | None => Vec::new(),
                Some(Hit { id, part }) => self.start_connector(id, world, Some(part)),
            };
        }

        if hit.is_none() && tool.creates_element() {
            return self.create_at(tool, world);
        }

        match hit {
            Some(Hit { id, part: HitPart::ResizeHandle(handle) }) => {
                let Some(orig) = self.store.element(&id).map(|el| el.bounds()) else {
                    return Vec::new();
                };
                self.input = InputState::Resizing { id, handle, start_world: world, orig };
                vec![Action::SetCursor(handle.cursor())]
            }
            Some(Hit { id, part: part @ HitPart::AnchorMarker(_) }) => self.start_connector(id, world, Some(part)),
            Some(Hit { id, part: HitPart::Body }) => self.start_drag(id, world, modifiers),
            Some(Hit { id, part: HitPart::Connector }) => {
                if modifiers.shift {
                    self.store.toggle_selection(id);
                } else {
                    self.store.select_only(id);
                }
                vec![Action::RenderNeeded]
            }
            None if modifiers.command() => {
                self.input = InputState::Panning { last_screen: screen };
                vec![Action::SetCursor("grabbing")]
            }
            None => {
                self.input = InputState::Marquee { start_world: world, additive: modifiers.shift };
                self.ui.marquee = Some(Rect::new(world.x, world.y, 0.0, 0.0));
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Create an element centered on the pointer, commit it, and return to Select.
    fn create_at(&mut self, tool: Tool, world: Point) -> Vec<Action> {
        let id = if let Some(shape_type) = tool.shape_type() {
            let size = self.config.default_shape_size;
            self.store.add_shape(shape_type, world.x - size.width / 2.0, world.y - size.height / 2.0)
        } else {
            let size = self.config.default_text_size;
            self.store.add_text(world.x - size.width / 2.0, world.y - size.height / 2.0)
        };
        debug!(%id, ?tool, "element created");
        self.store.push_history();
        self.ui.tool = Tool::Select;
        vec![
            Action::HistoryCommitted,
            Action::ToolChanged(Tool::Select),
            Action::SetCursor(Tool::Select.cursor()),
            Action::RenderNeeded,
        ]
    }

    fn start_drag(&mut self, id: ElementId, world: Point, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.shift {
            self.store.toggle_selection(id);
            if !self.store.is_selected(&id) {
                return vec![Action::RenderNeeded];
            }
        } else if !self.store.is_selected(&id) {
            self.store.select_only(id);
        }
        let origins: Vec<(ElementId, Point)> = self
            .store
            .selected_elements()
            .into_iter()
            .filter(|el| !el.locked)
            .map(|el| (el.id, Point::new(el.x, el.y)))
            .collect();
        if !origins.is_empty() {
            self.input = InputState::DraggingElements { origins, last_world: world, moved: false };
        }
        vec![Action::SetCursor("move"), Action::RenderNeeded]
    }

    fn start_connector(&mut self, source: ElementId, world: Point, part: Option<HitPart>) -> Vec<Action> {
        let Some(el) = self.store.element(&source) else {
            return Vec::new();
        };
        let source_anchor = match part {
            Some(HitPart::AnchorMarker(anchor)) => anchor,
            _ => el.anchors().nearest(world),
        };
        let from = el.anchor(source_anchor);
        self.input = InputState::DrawingConnector { source, source_anchor };
        self.ui.connector_preview = Some(ConnectorPreview { from, to: world });
        vec![Action::SetCursor("crosshair"), Action::RenderNeeded]
    }

    /// Pointer-move: advances the active gesture, or updates hover when idle.
    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        if self.input.is_idle() {
            return self.update_hover(world);
        }
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let (dx, dy) = (screen.x - last_screen.x, screen.y - last_screen.y);
                *last_screen = screen;
                self.camera.pan(dx, dy);
                vec![Action::RenderNeeded]
            }
            InputState::Marquee { start_world, .. } => {
                self.ui.marquee = Some(Rect::from_corners(*start_world, world));
                vec![Action::RenderNeeded]
            }
            InputState::DraggingElements { origins, last_world, moved } => {
                let (dx, dy) = (world.x - last_world.x, world.y - last_world.y);
                *last_world = world;
                if dx == 0.0 && dy == 0.0 {
                    return Vec::new();
                }
                *moved = true;
                let ids: Vec<ElementId> = origins.iter().map(|(id, _)| *id).collect();
                self.store.move_elements(&ids, dx, dy);
                vec![Action::RenderNeeded]
            }
            InputState::Resizing { id, handle, start_world, orig } => {
                let r = hit::resize_rect(
                    *orig,
                    *handle,
                    world.x - start_world.x,
                    world.y - start_world.y,
                    MIN_ELEMENT_SIZE,
                );
                let id = *id;
                self.store.resize_element(&id, r.width, r.height, Some(r.x), Some(r.y));
                vec![Action::RenderNeeded]
            }
            InputState::DrawingFreehand => {
                if self.ui.draft_points.last() != Some(&world) {
                    self.ui.draft_points.push(world);
                }
                vec![Action::RenderNeeded]
            }
            InputState::DrawingConnector { .. } => {
                if let Some(preview) = self.ui.connector_preview.as_mut() {
                    preview.to = world;
                }
                vec![Action::RenderNeeded]
            }
        }
    }

    fn update_hover(&mut self, world: Point) -> Vec<Action> {
        let hit = self.hit_at(world);
        let hovered = match hit {
            Some(Hit { id, part: HitPart::Body | HitPart::AnchorMarker(_) | HitPart::ResizeHandle(_) }) => Some(id),
            Some(Hit { part: HitPart::Connector, .. }) | None => None,
        };
        let cursor = match hit.map(|h| h.part) {
            Some(HitPart::ResizeHandle(handle)) => handle.cursor(),
            Some(HitPart::AnchorMarker(_)) => "crosshair",
            Some(HitPart::Body) if self.ui.tool == Tool::Select => "move",
            Some(HitPart::Connector) if self.ui.tool == Tool::Select => "pointer",
            _ => self.ui.tool.cursor(),
        };
        let mut actions = vec![Action::SetCursor(cursor)];
        if hovered != self.ui.hovered_id {
            self.ui.hovered_id = hovered;
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Pointer-up: completes the active gesture and commits it if it changed
    /// the model.
    pub fn on_pointer_up(&mut self, screen: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        let actions = match std::mem::take(&mut self.input) {
            InputState::Idle => return Vec::new(),
            InputState::Panning { .. } => Vec::new(),
            InputState::Marquee { start_world, additive } => {
                let area = Rect::from_corners(start_world, world);
                if area.width <= 0.0 || area.height <= 0.0 {
                    // Zero-area marquee: a click on empty space.
                    if !additive {
                        self.store.clear_selection();
                    }
                    self.ui.marquee = None;
                    return self.finish_pointer_up(Vec::new(), world);
                }
                let hits: Vec<ElementId> = self
                    .store
                    .elements()
                    .iter()
                    .filter(|el| rects_intersect(area, el.bounds()))
                    .map(|el| el.id)
                    .collect();
                if additive {
                    self.store.add_to_selection(hits);
                } else {
                    self.store.set_selection(hits);
                }
                self.ui.marquee = None;
                Vec::new()
            }
            InputState::DraggingElements { origins, .. } => {
                let displaced = origins
                    .iter()
                    .any(|(id, origin)| self.store.element(id).is_some_and(|el| Point::new(el.x, el.y) != *origin));
                if displaced {
                    debug!(count = origins.len(), "drag committed");
                    self.commit()
                } else {
                    Vec::new()
                }
            }
            InputState::Resizing { id, orig, .. } => {
                let changed = self.store.element(&id).is_some_and(|el| el.bounds() != orig);
                if changed { self.commit() } else { Vec::new() }
            }
            InputState::DrawingFreehand => {
                let points = std::mem::take(&mut self.ui.draft_points);
                if self.store.add_drawing(&points).is_some() { self.commit() } else { Vec::new() }
            }
            InputState::DrawingConnector { source, source_anchor } => {
                self.ui.connector_preview = None;
                match hit::connector_target(&self.store, &self.camera, &self.config, world, source) {
                    Some((target, target_anchor)) => {
                        if self.store.add_connector_with_anchors(source, source_anchor, target, target_anchor).is_some()
                        {
                            self.commit()
                        } else {
                            Vec::new()
                        }
                    }
                    None => {
                        debug!(%source, "connector released over empty space");
                        Vec::new()
                    }
                }
            }
        };
        self.finish_pointer_up(actions, world)
    }

    fn finish_pointer_up(&mut self, mut actions: Vec<Action>, world: Point) -> Vec<Action> {
        actions.extend(self.update_hover(world));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn commit(&mut self) -> Vec<Action> {
        self.store.push_history();
        vec![Action::HistoryCommitted]
    }

    /// Abandon the current gesture, restoring any geometry it changed.
    fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.input) {
            InputState::DraggingElements { origins, moved: true, .. } => {
                for (id, origin) in origins {
                    let patch = ElementPatch { x: Some(origin.x), y: Some(origin.y), ..Default::default() };
                    self.store.update_element(&id, &patch);
                }
            }
            InputState::Resizing { id, orig, .. } => {
                let patch = ElementPatch {
                    x: Some(orig.x),
                    y: Some(orig.y),
                    width: Some(orig.width),
                    height: Some(orig.height),
                    ..Default::default()
                };
                self.store.update_element(&id, &patch);
            }
            _ => {}
        }
        self.ui.clear_previews();
    }

    /// Wheel: zoom about the cursor.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let factor = (-delta.dy * self.config.wheel_zoom_sensitivity).exp();
        self.camera.zoom_to(self.camera.zoom * factor, screen);
        vec![Action::RenderNeeded]
    }

    /// Double-click on a text-bearing element asks the host to edit it.
    pub fn on_double_click(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        let slop = self.camera.screen_dist_to_world(self.config.hit_slop_px);
        let Some(id) = hit::element_at(&self.store, world, slop, None) else {
            return Vec::new();
        };
        if !self.store.element(&id).is_some_and(|el| el.has_text()) {
            return Vec::new();
        }
        self.store.select_only(id);
        vec![Action::EditTextRequested { id }, Action::RenderNeeded]
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is("Escape") {
            self.cancel_gesture();
            self.store.clear_selection();
            return vec![Action::SetCursor(self.ui.tool.cursor()), Action::RenderNeeded];
        }
        if !self.input.is_idle() {
            return Vec::new();
        }

        if key.is("Delete") || key.is("Backspace") {
            return if self.store.delete_selected() > 0 {
                let mut actions = self.commit();
                actions.push(Action::RenderNeeded);
                actions
            } else {
                Vec::new()
            };
        }
        if !modifiers.command() {
            return Vec::new();
        }

        if (key.is("z") && modifiers.shift) || key.is("y") {
            return if self.store.redo() { vec![Action::RenderNeeded] } else { Vec::new() };
        }
        if key.is("z") {
            return if self.store.undo() { vec![Action::RenderNeeded] } else { Vec::new() };
        }
        if key.is("c") {
            self.store.copy();
            return Vec::new();
        }
        if key.is("x") {
            return if self.store.cut() > 0 {
                let mut actions = self.commit();
                actions.push(Action::RenderNeeded);
                actions
            } else {
                Vec::new()
            };
        }
        if key.is("v") {
            let offset = self.config.paste_offset;
            return if self.store.paste(offset, offset).is_empty() {
                Vec::new()
            } else {
                vec![Action::HistoryCommitted, Action::RenderNeeded]
            };
        }
        if key.is("a") {
            self.store.select_all();
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }
}
