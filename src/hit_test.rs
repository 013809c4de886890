#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::MIN_ELEMENT_SIZE;
use crate::doc::ElementPatch;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn setup() -> (DiagramStore, Camera, EngineConfig) {
    (DiagramStore::new(), Camera::default(), EngineConfig::default())
}

// =============================================================
// resize_rect
// =============================================================

#[test]
fn se_corner_grows_both_dimensions() {
    let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 50.0), ResizeHandle::Se, 10.0, 20.0, MIN_ELEMENT_SIZE);
    assert_eq!(r, Rect::new(0.0, 0.0, 110.0, 70.0));
}

#[test]
fn nw_corner_moves_origin() {
    let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 50.0), ResizeHandle::Nw, 10.0, 20.0, MIN_ELEMENT_SIZE);
    assert_eq!(r, Rect::new(10.0, 20.0, 90.0, 30.0));
}

#[test]
fn edge_handle_changes_one_dimension() {
    let orig = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(resize_rect(orig, ResizeHandle::E, 15.0, 99.0, MIN_ELEMENT_SIZE), Rect::new(0.0, 0.0, 115.0, 50.0));
    assert_eq!(resize_rect(orig, ResizeHandle::N, 99.0, 10.0, MIN_ELEMENT_SIZE), Rect::new(0.0, 10.0, 100.0, 40.0));
}

#[test]
fn west_clamp_keeps_right_edge_fixed() {
    let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 50.0), ResizeHandle::W, 500.0, 0.0, MIN_ELEMENT_SIZE);
    assert_eq!(r.width, 20.0);
    assert_eq!(r.right(), 100.0);
}

#[test]
fn north_clamp_keeps_bottom_edge_fixed() {
    let r = resize_rect(Rect::new(0.0, 0.0, 100.0, 50.0), ResizeHandle::Ne, 0.0, 500.0, MIN_ELEMENT_SIZE);
    assert_eq!(r.height, 20.0);
    assert_eq!(r.bottom(), 50.0);
    assert_eq!(r.x, 0.0);
}

#[test]
fn handle_positions_cover_corners_and_midpoints() {
    let handles = resize_handle_positions(Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(handles.len(), 8);
    assert!(handles.contains(&(ResizeHandle::Se, pt(100.0, 50.0))));
    assert!(handles.contains(&(ResizeHandle::W, pt(0.0, 25.0))));
}

#[test]
fn handle_cursors() {
    assert_eq!(ResizeHandle::N.cursor(), "ns-resize");
    assert_eq!(ResizeHandle::W.cursor(), "ew-resize");
    assert_eq!(ResizeHandle::Sw.cursor(), "nesw-resize");
    assert_eq!(ResizeHandle::Se.cursor(), "nwse-resize");
}

// =============================================================
// element_contains
// =============================================================

#[test]
fn ellipse_corner_is_not_a_hit() {
    let el = CanvasElement::shape(ShapeType::Ellipse, 0.0, 0.0, 100.0, 100.0);
    assert!(element_contains(&el, pt(50.0, 50.0), 0.0));
    assert!(!element_contains(&el, pt(2.0, 2.0), 0.0));
    let rect = CanvasElement::shape(ShapeType::Rectangle, 0.0, 0.0, 100.0, 100.0);
    assert!(element_contains(&rect, pt(2.0, 2.0), 0.0));
}

#[test]
fn drawing_hit_follows_stroke_not_bbox() {
    let el = CanvasElement::drawing(&[pt(0.0, 0.0), pt(100.0, 100.0)], crate::doc::DrawingStyle::default()).unwrap();
    assert!(element_contains(&el, pt(50.0, 52.0), 6.0));
    assert!(!element_contains(&el, pt(90.0, 10.0), 6.0));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn topmost_element_wins() {
    let (mut store, cam, cfg) = setup();
    let below = store.add_shape(ShapeType::Rectangle, 0.0, 0.0);
    let above = store.add_shape(ShapeType::Rectangle, 50.0, 20.0);
    store.clear_selection();
    let hit = hit_test(&store, &cam, &cfg, pt(60.0, 40.0), &[]).unwrap();
    assert_eq!(hit, Hit { id: above, part: HitPart::Body });
    let hit = hit_test(&store, &cam, &cfg, pt(10.0, 10.0), &[]).unwrap();
    assert_eq!(hit.id, below);
}

#[test]
fn resize_handle_beats_body_for_single_selection() {
    let (mut store, cam, cfg) = setup();
    let id = store.add_shape(ShapeType::Rectangle, 0.0, 0.0);
    let hit = hit_test(&store, &cam, &cfg, pt(121.0, 81.0), &[]).unwrap();
    assert_eq!(hit, Hit { id, part: HitPart::ResizeHandle(ResizeHandle::Se) });
}

#[test]
fn handle_radius_is_constant_on_screen() {
    let (mut store, mut cam, cfg) = setup();
    store.add_shape(ShapeType::Rectangle, 0.0, 0.0);
    cam.zoom_to(2.0, pt(0.0, 0.0));
    // 4 diagram units = 8 screen px, outside a 5 px handle.
    let hit = hit_test(&store, &cam, &cfg, pt(124.0, 84.0), &[]);
    assert!(hit.is_none());
}

#[test]
fn locked_and_drawing_elements_have_no_handles() {
    let (mut store, cam, cfg) = setup();
    let id = store.add_shape(ShapeType::Rectangle, 0.0, 0.0);
    store.update_element(&id, &ElementPatch { locked: Some(true), ..Default::default() });
    let hit = hit_test(&store, &cam, &cfg, pt(120.0, 80.0), &[]).unwrap();
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn anchor_markers_only_for_owners() {
    let (mut store, cam, cfg) = setup();
    let id = store.add_shape(ShapeType::Rectangle, 0.0, 0.0);
    store.clear_selection();
    // Just right of the right anchor (120, 40), outside the body.
    let p = pt(124.0, 40.0);
    assert!(hit_test(&store, &cam, &cfg, p, &[]).is_none());
    let hit = hit_test(&store, &cam, &cfg, p, &[id]).unwrap();
    assert_eq!(hit, Hit { id, part: HitPart::AnchorMarker(Anchor::Right) });
}

#[test]
fn connector_is_hit_along_its_line() {
    let (mut store, cam, cfg) = setup();
    let a = store.add_shape(ShapeType::Rectangle, 0.0, 0.0);
    let b = store.add_shape(ShapeType::Rectangle, 300.0, 0.0);
    let c = store.add_connector(a, b).unwrap();
    store.clear_selection();
    let hit = hit_test(&store, &cam, &cfg, pt(200.0, 43.0), &[]).unwrap();
    assert_eq!(hit, Hit { id: c, part: HitPart::Connector });
    assert!(hit_test(&store, &cam, &cfg, pt(200.0, 60.0), &[]).is_none());
}

// =============================================================
// connector_target
// =============================================================

#[test]
fn connector_target_prefers_exact_marker() {
    let (mut store, cam, cfg) = setup();
    let a = store.add_shape(ShapeType::Rectangle, 0.0, 0.0);
    let b = store.add_shape(ShapeType::Rectangle, 300.0, 0.0);
    // Bottom anchor of b is (360, 80).
    assert_eq!(connector_target(&store, &cam, &cfg, pt(362.0, 82.0), a), Some((b, Anchor::Bottom)));
}

#[test]
fn connector_target_falls_back_to_nearest_anchor() {
    let (mut store, cam, cfg) = setup();
    let a = store.add_shape(ShapeType::Rectangle, 0.0, 0.0);
    let b = store.add_shape(ShapeType::Rectangle, 300.0, 0.0);
    assert_eq!(connector_target(&store, &cam, &cfg, pt(310.0, 35.0), a), Some((b, Anchor::Left)));
}

#[test]
fn connector_target_ignores_source_and_empty_space() {
    let (mut store, cam, cfg) = setup();
    let a = store.add_shape(ShapeType::Rectangle, 0.0, 0.0);
    assert!(connector_target(&store, &cam, &cfg, pt(60.0, 40.0), a).is_none());
    assert!(connector_target(&store, &cam, &cfg, pt(1000.0, 1000.0), a).is_none());
}
