//! Diagram model store: elements, connectors, selection, clipboard, history.
//!
//! DESIGN
//! ======
//! `DiagramStore` is the single owner of the live model. Every mutation goes
//! through one of its methods, which keep the model invariants:
//!
//! - every connector endpoint resolves to a live element (deleting an element
//!   cascades to its connectors),
//! - selection only holds live ids,
//! - connector anchors are sticky: moving or resizing never recomputes them,
//!   only `refresh_connector_anchors` does.
//!
//! Element order in `elements` is z-order: the last element is drawn last and
//! hit-tested first.
//!
//! ERROR HANDLING
//! ==============
//! Operations on stale or unknown ids are silent no-ops that report through
//! their return value (`None` / `false` / empty) and a `debug!` event. Input
//! races between the host and the engine are expected, not exceptional.
//!
//! HISTORY
//! =======
//! Mutations do not record history themselves (except `paste`); callers push
//! one snapshot per completed gesture with `push_history`. Subscribers are
//! notified on every push, undo, redo, and load so a host can autosave.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EngineConfig, Size};
use crate::consts::MIN_ELEMENT_SIZE;
use crate::doc::{
    CanvasElement, ConnectorElement, ConnectorId, ConnectorPatch, DrawingStyle, ElementId, ElementPatch, ShapeType,
};
use crate::geometry::{Anchor, Point, best_anchor_pair};
use crate::history::{History, Snapshot};

// =============================================================================
// CHANGE NOTIFICATION
// =============================================================================

/// What kind of model change a subscriber is being told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A gesture completed and a history snapshot was pushed.
    Committed,
    /// The model was restored from an earlier snapshot.
    Undo,
    /// The model was restored from a later snapshot.
    Redo,
    /// The model was replaced wholesale by `load_diagram`.
    Loaded,
}

/// Notification delivered to subscribers.
#[derive(Debug, Clone)]
pub struct ModelChange {
    pub kind: ChangeKind,
    /// Monotonic counter, bumped once per notification.
    pub revision: u64,
    /// The model as of this change.
    pub snapshot: Rc<Snapshot>,
}

/// Handle returned by [`DiagramStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ModelChange)>;

// =============================================================================
// STORE
// =============================================================================

pub struct DiagramStore {
    elements: Vec<CanvasElement>,
    connectors: Vec<ConnectorElement>,
    selected: HashSet<Uuid>,
    clipboard: Vec<CanvasElement>,
    history: History,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    shape_size: Size,
    text_size: Size,
}

impl fmt::Debug for DiagramStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramStore")
            .field("elements", &self.elements.len())
            .field("connectors", &self.connectors.len())
            .field("selected", &self.selected.len())
            .field("clipboard", &self.clipboard.len())
            .field("history", &self.history.len())
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for DiagramStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramStore {
    /// Create an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create an empty store. History starts with one entry: the empty model.
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut history = History::new(config.history_limit);
        history.reset(Snapshot::default());
        Self {
            elements: Vec::new(),
            connectors: Vec::new(),
            selected: HashSet::new(),
            clipboard: Vec::new(),
            history,
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 0,
            shape_size: config.default_shape_size,
            text_size: config.default_text_size,
        }
    }

    // --- Queries ---

    /// Elements in z-order, bottom first.
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    #[must_use]
    pub fn connectors(&self) -> &[ConnectorElement] {
        &self.connectors
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == *id)
    }

    #[must_use]
    pub fn connector(&self, id: &ConnectorId) -> Option<&ConnectorElement> {
        self.connectors.iter().find(|c| c.id == *id)
    }

    /// Whether `id` names a live element or connector.
    #[must_use]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.element(id).is_some() || self.connector(id).is_some()
    }

    #[must_use]
    pub fn selected_ids(&self) -> &HashSet<Uuid> {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, id: &Uuid) -> bool {
        self.selected.contains(id)
    }

    /// Selected elements in z-order.
    #[must_use]
    pub fn selected_elements(&self) -> Vec<&CanvasElement> {
        self.elements.iter().filter(|e| self.selected.contains(&e.id)).collect()
    }

    /// The selected element when exactly one element (and nothing else) is selected.
    #[must_use]
    pub fn single_selected_element(&self) -> Option<&CanvasElement> {
        if self.selected.len() != 1 {
            return None;
        }
        let id = self.selected.iter().next()?;
        self.element(id)
    }

    #[must_use]
    pub fn clipboard(&self) -> &[CanvasElement] {
        &self.clipboard
    }

    /// Deep copy of the current model.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { elements: self.elements.clone(), connectors: self.connectors.clone() }
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Resolved `(source, target)` anchor positions of a connector, or `None`
    /// if either endpoint is missing.
    #[must_use]
    pub fn connector_endpoints(&self, connector: &ConnectorElement) -> Option<(Point, Point)> {
        let source = self.element(&connector.source_id)?;
        let target = self.element(&connector.target_id)?;
        Some((source.anchor(connector.source_anchor), target.anchor(connector.target_anchor)))
    }

    /// The full polyline a connector is drawn along: source anchor, any
    /// manual waypoints, target anchor.
    #[must_use]
    pub fn connector_path(&self, connector: &ConnectorElement) -> Option<Vec<Point>> {
        let (a, b) = self.connector_endpoints(connector)?;
        let mut path = vec![a];
        if let Some(ref waypoints) = connector.waypoints {
            path.extend(waypoints.iter().copied());
        }
        path.push(b);
        Some(path)
    }

    // --- Creation ---

    /// Insert a shape of the default size with its top-left at `(x, y)` and
    /// select only it.
    pub fn add_shape(&mut self, shape_type: ShapeType, x: f64, y: f64) -> ElementId {
        let el = CanvasElement::shape(shape_type, x, y, self.shape_size.width, self.shape_size.height);
        self.insert_selected(el)
    }

    /// Insert an empty text box of the default size with its top-left at
    /// `(x, y)` and select only it.
    pub fn add_text(&mut self, x: f64, y: f64) -> ElementId {
        let el = CanvasElement::text(x, y, self.text_size.width, self.text_size.height);
        self.insert_selected(el)
    }

    /// Insert a freehand drawing from absolute points. Fewer than two points
    /// is a no-op.
    pub fn add_drawing(&mut self, points: &[Point]) -> Option<ElementId> {
        self.add_drawing_with_style(points, DrawingStyle::default())
    }

    pub fn add_drawing_with_style(&mut self, points: &[Point], style: DrawingStyle) -> Option<ElementId> {
        let Some(el) = CanvasElement::drawing(points, style) else {
            debug!(points = points.len(), "add_drawing: not enough points");
            return None;
        };
        Some(self.insert_selected(el))
    }

    /// Connect two distinct live elements at explicit anchors and select the
    /// connector.
    pub fn add_connector_with_anchors(
        &mut self,
        source_id: ElementId,
        source_anchor: Anchor,
        target_id: ElementId,
        target_anchor: Anchor,
    ) -> Option<ConnectorId> {
        if source_id == target_id {
            debug!(%source_id, "add_connector: self connection rejected");
            return None;
        }
        if self.element(&source_id).is_none() || self.element(&target_id).is_none() {
            debug!(%source_id, %target_id, "add_connector: endpoint not found");
            return None;
        }
        let connector = ConnectorElement::new(source_id, source_anchor, target_id, target_anchor);
        let id = connector.id;
        self.connectors.push(connector);
        self.select_only(id);
        Some(id)
    }

    /// Connect two live elements at the closest pair of anchors.
    pub fn add_connector(&mut self, source_id: ElementId, target_id: ElementId) -> Option<ConnectorId> {
        let (Some(source), Some(target)) = (
            self.element(&source_id).map(CanvasElement::bounds),
            self.element(&target_id).map(CanvasElement::bounds),
        ) else {
            debug!(%source_id, %target_id, "add_connector: endpoint not found");
            return None;
        };
        let (sa, ta) = best_anchor_pair(source, target);
        self.add_connector_with_anchors(source_id, sa, target_id, ta)
    }

    fn insert_selected(&mut self, el: CanvasElement) -> ElementId {
        let id = el.id;
        self.elements.push(el);
        self.select_only(id);
        id
    }

    // --- Mutation ---

    /// Shallow-merge `patch` into an element. Returns `false` for unknown ids.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(el) = self.element_mut(id) else {
            debug!(%id, "update_element: not found");
            return false;
        };
        el.apply_patch(patch);
        true
    }

    /// Shallow-merge `patch` into a connector. Returns `false` for unknown ids.
    pub fn update_connector(&mut self, id: &ConnectorId, patch: &ConnectorPatch) -> bool {
        let Some(c) = self.connectors.iter_mut().find(|c| c.id == *id) else {
            debug!(%id, "update_connector: not found");
            return false;
        };
        c.apply_patch(patch);
        true
    }

    /// Translate every listed element by the same delta. Connector anchors are
    /// left alone; their endpoints follow the elements when resolved.
    pub fn move_elements(&mut self, ids: &[ElementId], dx: f64, dy: f64) {
        for el in self.elements.iter_mut().filter(|e| ids.contains(&e.id)) {
            el.x += dx;
            el.y += dy;
        }
    }

    /// Set an element's size, clamped to the minimum, and optionally its
    /// origin. Drawings keep their frozen extent; resizing one is a no-op.
    pub fn resize_element(&mut self, id: &ElementId, width: f64, height: f64, x: Option<f64>, y: Option<f64>) -> bool {
        let Some(el) = self.element_mut(id) else {
            debug!(%id, "resize_element: not found");
            return false;
        };
        if el.is_drawing() {
            debug!(%id, "resize_element: drawings are not resizable");
            return false;
        }
        el.width = width.max(MIN_ELEMENT_SIZE);
        el.height = height.max(MIN_ELEMENT_SIZE);
        if let Some(x) = x {
            el.x = x;
        }
        if let Some(y) = y {
            el.y = y;
        }
        true
    }

    /// Recompute every connector's anchors with the best-anchor search
    /// against current element positions.
    pub fn refresh_connector_anchors(&mut self) {
        let elements = &self.elements;
        let bounds = |id: &ElementId| elements.iter().find(|e| e.id == *id).map(CanvasElement::bounds);
        for c in &mut self.connectors {
            if let (Some(s), Some(t)) = (bounds(&c.source_id), bounds(&c.target_id)) {
                let (sa, ta) = best_anchor_pair(s, t);
                c.source_anchor = sa;
                c.target_anchor = ta;
            }
        }
    }

    /// Move elements to the top of the z-order, keeping their relative order.
    pub fn bring_to_front(&mut self, ids: &[ElementId]) {
        let (picked, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| ids.contains(&e.id));
        self.elements = rest;
        self.elements.extend(picked);
    }

    /// Move elements to the bottom of the z-order, keeping their relative order.
    pub fn send_to_back(&mut self, ids: &[ElementId]) {
        let (mut picked, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| ids.contains(&e.id));
        picked.extend(rest);
        self.elements = picked;
    }

    // --- Deletion ---

    /// Remove an element and every connector attached to it.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != *id);
        if self.elements.len() == before {
            debug!(%id, "delete_element: not found");
            return false;
        }
        self.selected.remove(id);
        self.cascade_connectors();
        true
    }

    /// Remove a single connector.
    pub fn delete_connector(&mut self, id: &ConnectorId) -> bool {
        let before = self.connectors.len();
        self.connectors.retain(|c| c.id != *id);
        self.selected.remove(id);
        self.connectors.len() != before
    }

    /// Remove every selected element and connector, plus connectors attached
    /// to removed elements. Returns how many elements and connectors went away.
    pub fn delete_selected(&mut self) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        let before = self.elements.len() + self.connectors.len();
        let selected = std::mem::take(&mut self.selected);
        self.elements.retain(|e| !selected.contains(&e.id));
        self.connectors.retain(|c| !selected.contains(&c.id));
        self.cascade_connectors();
        let removed = before - (self.elements.len() + self.connectors.len());
        debug!(removed, "delete_selected");
        removed
    }

    /// Drop connectors whose endpoints no longer exist, and their selection.
    fn cascade_connectors(&mut self) {
        let live: HashSet<ElementId> = self.elements.iter().map(|e| e.id).collect();
        let selected = &mut self.selected;
        self.connectors.retain(|c| {
            let keep = live.contains(&c.source_id) && live.contains(&c.target_id);
            if !keep {
                selected.remove(&c.id);
            }
            keep
        });
    }

    // --- Clipboard ---

    /// Copy the selected elements (not connectors) into the clipboard.
    /// An empty selection leaves the clipboard untouched.
    pub fn copy(&mut self) {
        let copied: Vec<CanvasElement> = self.selected_elements().into_iter().cloned().collect();
        if copied.is_empty() {
            return;
        }
        debug!(count = copied.len(), "copy");
        self.clipboard = copied;
    }

    /// Copy the selection, then delete it.
    pub fn cut(&mut self) -> usize {
        self.copy();
        self.delete_selected()
    }

    /// Insert clones of the clipboard with fresh ids, shifted by the offset,
    /// select them, and push history. Returns the new ids.
    pub fn paste(&mut self, offset_x: f64, offset_y: f64) -> Vec<ElementId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let pasted: Vec<CanvasElement> = self
            .clipboard
            .iter()
            .map(|src| {
                let mut el = src.clone();
                el.id = Uuid::new_v4();
                el.x += offset_x;
                el.y += offset_y;
                el
            })
            .collect();
        let ids: Vec<ElementId> = pasted.iter().map(|e| e.id).collect();
        self.elements.extend(pasted);
        self.set_selection(ids.iter().copied());
        self.push_history();
        ids
    }

    // --- Selection ---

    /// Replace the selection with a single id (ignored if not live).
    pub fn select_only(&mut self, id: Uuid) {
        self.selected.clear();
        if self.contains(&id) {
            self.selected.insert(id);
        }
    }

    /// Replace the selection, keeping only live ids.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        let live: HashSet<Uuid> = ids.into_iter().filter(|id| self.contains(id)).collect();
        self.selected = live;
    }

    /// Add live ids to the selection.
    pub fn add_to_selection(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        for id in ids {
            if self.contains(&id) {
                self.selected.insert(id);
            }
        }
    }

    /// Flip membership of a live id.
    pub fn toggle_selection(&mut self, id: Uuid) {
        if !self.selected.remove(&id) && self.contains(&id) {
            self.selected.insert(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Select every element (connectors excluded).
    pub fn select_all(&mut self) {
        self.selected = self.elements.iter().map(|e| e.id).collect();
    }

    // --- History ---

    /// Record the current model as a new history entry and notify subscribers.
    pub fn push_history(&mut self) {
        let snapshot = self.snapshot();
        let entry = self.history.push(snapshot);
        debug!(index = self.history.index(), len = self.history.len(), "push_history");
        self.notify(ChangeKind::Committed, entry);
    }

    /// Restore the previous snapshot. Clears selection. Returns `false` at the
    /// oldest entry.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo() else {
            return false;
        };
        self.restore(&entry);
        self.notify(ChangeKind::Undo, entry);
        true
    }

    /// Restore the next snapshot. Clears selection. Returns `false` at the
    /// newest entry.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo() else {
            return false;
        };
        self.restore(&entry);
        self.notify(ChangeKind::Redo, entry);
        true
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.elements.clone_from(&snapshot.elements);
        self.connectors.clone_from(&snapshot.connectors);
        self.selected.clear();
    }

    /// Replace the model wholesale, e.g. when a diagram file is opened.
    ///
    /// Connectors with a missing endpoint are dropped. History is reset to a
    /// single entry holding the loaded model and the selection is cleared.
    pub fn load_diagram(&mut self, elements: Vec<CanvasElement>, connectors: Vec<ConnectorElement>) {
        let live: HashSet<ElementId> = elements.iter().map(|e| e.id).collect();
        let total = connectors.len();
        let connectors: Vec<ConnectorElement> = connectors
            .into_iter()
            .filter(|c| live.contains(&c.source_id) && live.contains(&c.target_id))
            .collect();
        if connectors.len() != total {
            warn!(dropped = total - connectors.len(), "load_diagram: dropped dangling connectors");
        }
        info!(elements = elements.len(), connectors = connectors.len(), "diagram loaded");
        self.elements = elements;
        self.connectors = connectors;
        self.selected.clear();
        let snapshot = self.snapshot();
        self.history.reset(snapshot);
        if let Some(entry) = self.history.current() {
            self.notify(ChangeKind::Loaded, entry);
        }
    }

    // --- Subscribers ---

    /// Register a callback invoked after every commit, undo, redo, and load.
    pub fn subscribe(&mut self, listener: impl FnMut(&ModelChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, kind: ChangeKind, snapshot: Rc<Snapshot>) {
        self.revision += 1;
        let change = ModelChange { kind, revision: self.revision, snapshot };
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }

    fn element_mut(&mut self, id: &ElementId) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }
}
