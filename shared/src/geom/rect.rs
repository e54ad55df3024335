use serde::{Deserialize, Serialize};

use super::Vec2;

/// An axis-aligned rectangle, used for bounds & areas of interest.
/// Intersection tests are inclusive of the edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a rectangle centered on `center` with the given half extents
    pub fn from_center(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self::new(
            Vec2::new(center.x - half_width, center.y - half_height),
            Vec2::new(center.x + half_width, center.y + half_height),
        )
    }

    /// Returns the smallest rectangle containing all of the given points,
    /// or `None` if the iterator is empty
    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect::new(first, first);
        for point in iter {
            rect.add_point(point);
        }
        Some(rect)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Returns the length of the longer side
    pub fn longest_edge(&self) -> f32 {
        self.width().max(self.height())
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains_point(&self, point: &Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Returns a copy of this rectangle moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.min + offset, self.max + offset)
    }

    /// Returns a copy of this rectangle grown by `amount` on every side
    pub fn expanded(&self, amount: f32) -> Rect {
        Rect::new(
            Vec2::new(self.min.x - amount, self.min.y - amount),
            Vec2::new(self.max.x + amount, self.max.y + amount),
        )
    }

    pub fn add_point(&mut self, point: Vec2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Corners in counter-clockwise order, starting at the minimum
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}
