//! Randomized property checks for the geometry helpers the engine leans on.
#![allow(clippy::float_cmp)]

use notecanvas::geometry::{
    Anchor, Point, Rect, anchor_points, best_anchor_pair, bounds_of, distance, point_in_rect, rects_intersect,
};
use rand::Rng;

const CASES: usize = 500;

fn random_rect(rng: &mut impl Rng) -> Rect {
    Rect::new(
        rng.random_range(-1000.0..1000.0),
        rng.random_range(-1000.0..1000.0),
        rng.random_range(1.0..400.0),
        rng.random_range(1.0..400.0),
    )
}

#[test]
fn best_anchor_pair_is_minimal_and_first_on_ties() {
    let mut rng = rand::rng();
    for _ in 0..CASES {
        let (a, b) = (random_rect(&mut rng), random_rect(&mut rng));
        let (sa, ta) = best_anchor_pair(a, b);
        let (pa, pb) = (anchor_points(a), anchor_points(b));
        let chosen = distance(pa.get(sa), pb.get(ta));

        let mut first_min = None;
        for s in Anchor::ALL {
            for t in Anchor::ALL {
                let d = distance(pa.get(s), pb.get(t));
                assert!(chosen <= d, "{a:?} -> {b:?}: ({sa:?},{ta:?}) beaten by ({s:?},{t:?})");
                if first_min.is_none() && d == chosen {
                    first_min = Some((s, t));
                }
            }
        }
        assert_eq!(first_min, Some((sa, ta)));
    }
}

#[test]
fn side_by_side_boxes_connect_facing_sides() {
    let mut rng = rand::rng();
    for _ in 0..CASES {
        let a = Rect::new(0.0, rng.random_range(-20.0..20.0), 100.0, 80.0);
        let gap = rng.random_range(50.0..500.0);
        let b = Rect::new(100.0 + gap, rng.random_range(-20.0..20.0), 100.0, 80.0);
        assert_eq!(best_anchor_pair(a, b), (Anchor::Right, Anchor::Left));
        assert_eq!(best_anchor_pair(b, a), (Anchor::Left, Anchor::Right));
    }
}

#[test]
fn intersection_is_symmetric_and_contains_centers() {
    let mut rng = rand::rng();
    for _ in 0..CASES {
        let (a, b) = (random_rect(&mut rng), random_rect(&mut rng));
        assert_eq!(rects_intersect(a, b), rects_intersect(b, a));
        assert!(rects_intersect(a, a));
        if point_in_rect(b.center(), a) {
            assert!(rects_intersect(a, b));
        }
    }
}

#[test]
fn bounds_of_encloses_every_point() {
    let mut rng = rand::rng();
    for _ in 0..CASES {
        let n = rng.random_range(1..20);
        let points: Vec<Point> = (0..n)
            .map(|_| Point::new(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0)))
            .collect();
        let bounds = bounds_of(&points).unwrap();
        let slack = Rect::new(bounds.x - 1e-9, bounds.y - 1e-9, bounds.width + 2e-9, bounds.height + 2e-9);
        for p in &points {
            assert!(point_in_rect(*p, slack), "{p:?} outside {bounds:?}");
        }
    }
}
