//! End-to-end editing scenarios driven through the public engine API.
#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use notecanvas::doc::{ElementKind, ShapeType};
use notecanvas::engine::{Action, Engine};
use notecanvas::geometry::{Anchor, Point};
use notecanvas::input::{Button, Key, Modifiers, Tool};
use notecanvas::store::ChangeKind;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn none() -> Modifiers {
    Modifiers::default()
}

fn cmd() -> Modifiers {
    Modifiers { meta: true, ..Default::default() }
}

fn click(engine: &mut Engine, at: Point) -> Vec<Action> {
    drag(engine, at, at)
}

fn drag(engine: &mut Engine, from: Point, to: Point) -> Vec<Action> {
    let mut actions = engine.on_pointer_down(from, Button::Primary, none());
    actions.extend(engine.on_pointer_move(to, none()));
    actions.extend(engine.on_pointer_up(to, Button::Primary, none()));
    actions
}

fn commits(actions: &[Action]) -> usize {
    actions.iter().filter(|a| **a == Action::HistoryCommitted).count()
}

/// Build a small flowchart with the tools: two rectangles linked by a connector.
fn flowchart() -> Engine {
    let mut engine = Engine::new();
    engine.set_tool(Tool::Rectangle);
    click(&mut engine, pt(60.0, 40.0)); // box at (0,0)
    engine.set_tool(Tool::Rectangle);
    click(&mut engine, pt(360.0, 40.0)); // box at (300,0)
    engine.set_tool(Tool::Connector);
    drag(&mut engine, pt(118.0, 40.0), pt(302.0, 40.0));
    engine.set_tool(Tool::Select);
    engine
}

#[test]
fn build_flowchart_with_tools() {
    let engine = flowchart();
    let store = &engine.store;
    assert_eq!(store.elements().len(), 2);
    assert_eq!(store.connectors().len(), 1);
    let c = &store.connectors()[0];
    assert_eq!((c.source_anchor, c.target_anchor), (Anchor::Right, Anchor::Left));
    assert_eq!(c.source_id, store.elements()[0].id);
    assert_eq!(c.target_id, store.elements()[1].id);
    // Initial entry + two shapes + one connector.
    assert_eq!(store.history().len(), 4);
}

#[test]
fn marquee_selects_intersecting_elements() {
    let mut engine = Engine::new();
    let a = engine.store.add_shape(ShapeType::Rectangle, 100.0, 100.0);
    let b = engine.store.add_shape(ShapeType::Ellipse, 150.0, 120.0);
    let far = engine.store.add_shape(ShapeType::Rectangle, 800.0, 800.0);
    engine.store.clear_selection();

    drag(&mut engine, pt(90.0, 90.0), pt(200.0, 150.0));
    let selected = engine.store.selected_ids();
    assert!(selected.contains(&a) && selected.contains(&b));
    assert!(!selected.contains(&far));
    assert_eq!(engine.store.history().len(), 1);
}

#[test]
fn freehand_round_trip() {
    let mut engine = Engine::new();
    engine.set_tool(Tool::Freehand);
    engine.on_pointer_down(pt(10.0, 10.0), Button::Primary, none());
    engine.on_pointer_move(pt(20.0, 15.0), none());
    engine.on_pointer_move(pt(30.0, 10.0), none());
    let actions = engine.on_pointer_up(pt(30.0, 10.0), Button::Primary, none());
    assert_eq!(commits(&actions), 1);

    let el = &engine.store.elements()[0];
    assert_eq!((el.x, el.y, el.width, el.height), (10.0, 10.0, 20.0, 5.0));
    let ElementKind::Drawing { points, .. } = &el.kind else {
        panic!("expected a drawing");
    };
    assert_eq!(points, &vec![pt(0.0, 0.0), pt(10.0, 5.0), pt(20.0, 0.0)]);
    assert_eq!(el.absolute_points(), vec![pt(10.0, 10.0), pt(20.0, 15.0), pt(30.0, 10.0)]);
}

#[test]
fn deleting_an_element_cascades_to_its_connectors() {
    let mut engine = flowchart();
    let left = engine.store.elements()[0].id;
    click(&mut engine, pt(60.0, 40.0));
    assert!(engine.store.is_selected(&left));
    let actions = engine.on_key_down(&Key("Delete".into()), none());
    assert_eq!(commits(&actions), 1);
    assert!(engine.store.connectors().is_empty());
    assert_eq!(engine.store.elements().len(), 1);

    engine.on_key_down(&Key("z".into()), cmd());
    assert_eq!(engine.store.connectors().len(), 1);
    assert_eq!(engine.store.elements().len(), 2);
}

#[test]
fn anchors_stay_put_when_elements_move() {
    let mut engine = flowchart();
    let right_box = engine.store.elements()[1].id;
    // Drag the right box below and to the left of the left box.
    click(&mut engine, pt(360.0, 40.0));
    drag(&mut engine, pt(360.0, 40.0), pt(-140.0, 440.0));
    assert_eq!(engine.store.element(&right_box).map(|e| (e.x, e.y)), Some((-200.0, 400.0)));

    let c = &engine.store.connectors()[0];
    assert_eq!((c.source_anchor, c.target_anchor), (Anchor::Right, Anchor::Left));
    let (start, end) = engine.store.connector_endpoints(c).unwrap();
    assert_eq!(start, pt(120.0, 40.0));
    assert_eq!(end, pt(-200.0, 440.0));
}

#[test]
fn drag_is_one_history_entry_and_click_is_none() {
    let mut engine = flowchart();
    let before = engine.store.history().len();

    let actions = click(&mut engine, pt(60.0, 40.0));
    assert_eq!(commits(&actions), 0);
    assert_eq!(engine.store.history().len(), before);

    engine.on_pointer_down(pt(60.0, 40.0), Button::Primary, none());
    for i in 1..=20 {
        engine.on_pointer_move(pt(60.0 + f64::from(i), 40.0), none());
    }
    let actions = engine.on_pointer_up(pt(80.0, 40.0), Button::Primary, none());
    assert_eq!(commits(&actions), 1);
    assert_eq!(engine.store.history().len(), before + 1);
}

#[test]
fn connector_dropped_on_empty_space_leaves_model_untouched() {
    let mut engine = flowchart();
    let before = engine.store.snapshot();
    let history = engine.store.history().len();
    engine.set_tool(Tool::Connector);
    let actions = drag(&mut engine, pt(60.0, 40.0), pt(200.0, 400.0));
    assert_eq!(commits(&actions), 0);
    assert_eq!(engine.store.snapshot(), before);
    assert_eq!(engine.store.history().len(), history);
}

#[test]
fn undo_redo_is_idempotent() {
    let mut engine = flowchart();
    drag(&mut engine, pt(60.0, 40.0), pt(60.0, 140.0));
    let end = engine.store.elements()[1].id;
    engine.set_text(&end, "End");
    let head = engine.store.snapshot();
    let depth = engine.store.history().len();

    for _ in 0..depth {
        engine.on_key_down(&Key("z".into()), cmd());
    }
    assert!(engine.store.elements().is_empty());
    for _ in 0..depth {
        engine.on_key_down(&Key("y".into()), cmd());
    }
    assert_eq!(engine.store.snapshot(), head);

    // Undo then redo from the head is a no-op on the model.
    engine.on_key_down(&Key("z".into()), cmd());
    engine.on_key_down(&Key("z".into()), Modifiers { shift: true, ..cmd() });
    assert_eq!(engine.store.snapshot(), head);
}

#[test]
fn subscribers_can_autosave() {
    let saved: Rc<RefCell<Vec<ChangeKind>>> = Rc::default();
    let mut engine = Engine::new();
    let sink = Rc::clone(&saved);
    engine.store.subscribe(move |change| sink.borrow_mut().push(change.kind));

    engine.set_tool(Tool::Text);
    click(&mut engine, pt(100.0, 100.0));
    engine.on_key_down(&Key("z".into()), cmd());
    engine.on_key_down(&Key("y".into()), cmd());

    assert_eq!(*saved.borrow(), vec![ChangeKind::Committed, ChangeKind::Undo, ChangeKind::Redo]);
}
