//! Pure geometry: points, rectangles, containment and proximity tests, anchors.
//!
//! Everything here is side-effect free and operates in diagram space unless a
//! caller says otherwise. Inputs are assumed to be finite numbers; there are no
//! error conditions.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or diagram space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Axis-aligned rectangle. Width and height may be negative until passed
/// through [`normalize_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a canonical rectangle spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        normalize_rect(Self::new(a.x, a.y, b.x - a.x, b.y - a.y))
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }
}

/// One of the four cardinal edge midpoints of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
}

impl Anchor {
    /// All anchors in canonical enumeration order. Tie-breaking in the
    /// best-anchor search depends on this order.
    pub const ALL: [Anchor; 4] = [Anchor::Top, Anchor::Right, Anchor::Bottom, Anchor::Left];
}

/// Diagram-space positions of the four anchors of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoints {
    pub top: Point,
    pub right: Point,
    pub bottom: Point,
    pub left: Point,
}

impl AnchorPoints {
    #[must_use]
    pub fn get(&self, anchor: Anchor) -> Point {
        match anchor {
            Anchor::Top => self.top,
            Anchor::Right => self.right,
            Anchor::Bottom => self.bottom,
            Anchor::Left => self.left,
        }
    }

    /// Iterate `(anchor, point)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Anchor, Point)> + '_ {
        Anchor::ALL.into_iter().map(|a| (a, self.get(a)))
    }

    /// The anchor closest to `p`. Ties resolve to the earliest anchor in
    /// canonical order.
    #[must_use]
    pub fn nearest(&self, p: Point) -> Anchor {
        let mut best = Anchor::Top;
        let mut best_dist = f64::INFINITY;
        for (anchor, pt) in self.iter() {
            let d = distance(p, pt);
            if d < best_dist {
                best = anchor;
                best_dist = d;
            }
        }
        best
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Half-open overlap test on both axes. Rectangles that only touch along an
/// edge do not intersect.
#[must_use]
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

/// Inclusive bounds test.
#[must_use]
pub fn point_in_rect(p: Point, rect: Rect) -> bool {
    p.x >= rect.x && p.x <= rect.x + rect.width && p.y >= rect.y && p.y <= rect.y + rect.height
}

/// Test `p` against the ellipse inscribed in `rect`.
#[must_use]
pub fn point_in_ellipse(p: Point, rect: Rect) -> bool {
    let rx = rect.width / 2.0;
    let ry = rect.height / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let c = rect.center();
    let nx = (p.x - c.x) / rx;
    let ny = (p.y - c.y) / ry;
    nx * nx + ny * ny <= 1.0
}

/// Distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

/// Whether `p` lies within `threshold` of the segment `a`–`b`.
#[must_use]
pub fn point_near_segment(p: Point, a: Point, b: Point, threshold: f64) -> bool {
    distance_to_segment(p, a, b) <= threshold
}

/// Whether `p` lies within `threshold` of any consecutive pair in `points`.
#[must_use]
pub fn point_near_polyline(p: Point, points: &[Point], threshold: f64) -> bool {
    points
        .windows(2)
        .any(|w| point_near_segment(p, w[0], w[1], threshold))
}

/// Edge midpoints of `rect`.
#[must_use]
pub fn anchor_points(rect: Rect) -> AnchorPoints {
    let c = rect.center();
    AnchorPoints {
        top: Point::new(c.x, rect.y),
        right: Point::new(rect.x + rect.width, c.y),
        bottom: Point::new(c.x, rect.y + rect.height),
        left: Point::new(rect.x, c.y),
    }
}

/// Resolve a rectangle drawn in any drag direction into one with
/// non-negative size anchored at its true top-left.
#[must_use]
pub fn normalize_rect(rect: Rect) -> Rect {
    let (x, width) = if rect.width < 0.0 { (rect.x + rect.width, -rect.width) } else { (rect.x, rect.width) };
    let (y, height) = if rect.height < 0.0 { (rect.y + rect.height, -rect.height) } else { (rect.y, rect.height) };
    Rect { x, y, width, height }
}

/// Bounding box of a point set, or `None` when empty.
#[must_use]
pub fn bounds_of(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// Exhaustive best-anchor search between two boxes.
///
/// Evaluates all 16 `(source, target)` anchor pairs and returns the pair with
/// the smallest Euclidean distance. Enumeration is `Anchor::ALL × Anchor::ALL`
/// and the first minimum wins.
#[must_use]
pub fn best_anchor_pair(source: Rect, target: Rect) -> (Anchor, Anchor) {
    let sa = anchor_points(source);
    let ta = anchor_points(target);
    let mut best = (Anchor::Top, Anchor::Top);
    let mut best_dist = f64::INFINITY;
    for (s, sp) in sa.iter() {
        for (t, tp) in ta.iter() {
            let d = distance(sp, tp);
            if d < best_dist {
                best = (s, t);
                best_dist = d;
            }
        }
    }
    best
}
