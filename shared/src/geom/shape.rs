use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{Rect, Transform2D, Vec2};

/// A 2D shape used for spatial queries.
///
/// Shapes are stored either in local space (as part of a configuration) or in
/// world space (after [`Shape::transformed`]). Polygons must be convex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point(Vec2),
    Segment { start: Vec2, end: Vec2 },
    Circle { center: Vec2, radius: f32 },
    Capsule { start: Vec2, end: Vec2, radius: f32 },
    /// Axis-aligned in the shape's own space; becomes a polygon when rotated
    Rectangle(Rect),
    Polygon(Vec<Vec2>),
}

// Every shape reduces to one of two primitives: a segment swept by a radius
// (points, segments, circles, capsules) or a convex vertex loop.
enum Primitive<'a> {
    Swept { start: Vec2, end: Vec2, radius: f32 },
    Convex(Cow<'a, [Vec2]>),
}

impl Shape {
    /// Convenience constructor for a rectangle centered on the origin
    pub fn centered_rectangle(width: f32, height: f32) -> Self {
        Shape::Rectangle(Rect::from_center(Vec2::ZERO, width * 0.5, height * 0.5))
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Point(point) => Rect::new(*point, *point),
            Shape::Segment { start, end } => segment_bounds(start, end, 0.0),
            Shape::Circle { center, radius } => Rect::from_center(*center, *radius, *radius),
            Shape::Capsule { start, end, radius } => segment_bounds(start, end, *radius),
            Shape::Rectangle(rect) => *rect,
            Shape::Polygon(vertices) => Rect::from_points(vertices.iter().copied())
                .unwrap_or(Rect::new(Vec2::ZERO, Vec2::ZERO)),
        }
    }

    /// Returns this shape moved into the space described by `transform`
    pub fn transformed(&self, transform: &Transform2D) -> Shape {
        match self {
            Shape::Point(point) => Shape::Point(transform.apply(*point)),
            Shape::Segment { start, end } => Shape::Segment {
                start: transform.apply(*start),
                end: transform.apply(*end),
            },
            Shape::Circle { center, radius } => Shape::Circle {
                center: transform.apply(*center),
                radius: *radius,
            },
            Shape::Capsule { start, end, radius } => Shape::Capsule {
                start: transform.apply(*start),
                end: transform.apply(*end),
                radius: *radius,
            },
            Shape::Rectangle(rect) => {
                if transform.rotation == 0.0 {
                    Shape::Rectangle(rect.translated(transform.translation))
                } else {
                    Shape::Polygon(rect.corners().iter().map(|c| transform.apply(*c)).collect())
                }
            }
            Shape::Polygon(vertices) => {
                Shape::Polygon(vertices.iter().map(|v| transform.apply(*v)).collect())
            }
        }
    }

    /// Exact intersection test (edges count as touching)
    pub fn intersects(&self, other: &Shape) -> bool {
        if !self.bounds().intersects(&other.bounds()) {
            return false;
        }
        match (self.primitive(), other.primitive()) {
            (
                Primitive::Swept {
                    start: s1,
                    end: e1,
                    radius: r1,
                },
                Primitive::Swept {
                    start: s2,
                    end: e2,
                    radius: r2,
                },
            ) => {
                let reach = r1 + r2;
                segment_segment_distance_squared(&s1, &e1, &s2, &e2) <= reach * reach
            }
            (Primitive::Swept { start, end, radius }, Primitive::Convex(vertices))
            | (Primitive::Convex(vertices), Primitive::Swept { start, end, radius }) => {
                swept_intersects_convex(&start, &end, radius, &vertices)
            }
            (Primitive::Convex(a), Primitive::Convex(b)) => convex_intersects_convex(&a, &b),
        }
    }

    fn primitive(&self) -> Primitive<'_> {
        match self {
            Shape::Point(point) => Primitive::Swept {
                start: *point,
                end: *point,
                radius: 0.0,
            },
            Shape::Segment { start, end } => Primitive::Swept {
                start: *start,
                end: *end,
                radius: 0.0,
            },
            Shape::Circle { center, radius } => Primitive::Swept {
                start: *center,
                end: *center,
                radius: *radius,
            },
            Shape::Capsule { start, end, radius } => Primitive::Swept {
                start: *start,
                end: *end,
                radius: *radius,
            },
            Shape::Rectangle(rect) => Primitive::Convex(Cow::Owned(rect.corners().to_vec())),
            Shape::Polygon(vertices) => Primitive::Convex(Cow::Borrowed(vertices.as_slice())),
        }
    }
}

fn segment_bounds(start: &Vec2, end: &Vec2, radius: f32) -> Rect {
    let mut rect = Rect::new(*start, *start);
    rect.add_point(*end);
    rect.expanded(radius)
}

pub(crate) fn point_segment_distance_squared(point: &Vec2, start: &Vec2, end: &Vec2) -> f32 {
    let edge = *end - *start;
    let length_squared = edge.length_squared();
    if length_squared == 0.0 {
        return point.distance_squared(*start);
    }
    let t = ((*point - *start).dot(edge) / length_squared).clamp(0.0, 1.0);
    point.distance_squared(*start + edge * t)
}

fn orientation(a: &Vec2, b: &Vec2, c: &Vec2) -> f32 {
    (*b - *a).perp_dot(*c - *a)
}

fn on_segment(point: &Vec2, start: &Vec2, end: &Vec2) -> bool {
    point.x >= start.x.min(end.x)
        && point.x <= start.x.max(end.x)
        && point.y >= start.y.min(end.y)
        && point.y <= start.y.max(end.y)
}

pub(crate) fn segments_cross(s1: &Vec2, e1: &Vec2, s2: &Vec2, e2: &Vec2) -> bool {
    let d1 = orientation(s2, e2, s1);
    let d2 = orientation(s2, e2, e1);
    let d3 = orientation(s1, e1, s2);
    let d4 = orientation(s1, e1, e2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(s1, s2, e2))
        || (d2 == 0.0 && on_segment(e1, s2, e2))
        || (d3 == 0.0 && on_segment(s2, s1, e1))
        || (d4 == 0.0 && on_segment(e2, s1, e1))
}

// In 2D, two segments that do not cross are closest at one of the four endpoints.
pub(crate) fn segment_segment_distance_squared(s1: &Vec2, e1: &Vec2, s2: &Vec2, e2: &Vec2) -> f32 {
    if segments_cross(s1, e1, s2, e2) {
        return 0.0;
    }
    point_segment_distance_squared(s1, s2, e2)
        .min(point_segment_distance_squared(e1, s2, e2))
        .min(point_segment_distance_squared(s2, s1, e1))
        .min(point_segment_distance_squared(e2, s1, e1))
}

pub(crate) fn point_in_convex(point: &Vec2, vertices: &[Vec2]) -> bool {
    let mut positive = false;
    let mut negative = false;
    for (index, start) in vertices.iter().enumerate() {
        let end = &vertices[(index + 1) % vertices.len()];
        let side = orientation(start, end, point);
        if side > 0.0 {
            positive = true;
        } else if side < 0.0 {
            negative = true;
        }
        if positive && negative {
            return false;
        }
    }
    !vertices.is_empty()
}

fn swept_intersects_convex(start: &Vec2, end: &Vec2, radius: f32, vertices: &[Vec2]) -> bool {
    if point_in_convex(start, vertices) || point_in_convex(end, vertices) {
        return true;
    }
    let radius_squared = radius * radius;
    vertices.iter().enumerate().any(|(index, edge_start)| {
        let edge_end = &vertices[(index + 1) % vertices.len()];
        segment_segment_distance_squared(start, end, edge_start, edge_end) <= radius_squared
    })
}

fn project(vertices: &[Vec2], axis: &Vec2) -> (f32, f32) {
    vertices
        .iter()
        .fold((f32::MAX, f32::MIN), |(min, max), vertex| {
            let value = vertex.dot(*axis);
            (min.min(value), max.max(value))
        })
}

fn has_separating_axis(edges_of: &[Vec2], a: &[Vec2], b: &[Vec2]) -> bool {
    edges_of.iter().enumerate().any(|(index, start)| {
        let end = &edges_of[(index + 1) % edges_of.len()];
        let axis = (*end - *start).perp();
        let (min_a, max_a) = project(a, &axis);
        let (min_b, max_b) = project(b, &axis);
        max_a < min_b || max_b < min_a
    })
}

fn convex_intersects_convex(a: &[Vec2], b: &[Vec2]) -> bool {
    !has_separating_axis(a, a, b) && !has_separating_axis(b, a, b)
}
