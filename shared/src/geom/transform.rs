use serde::{Deserialize, Serialize};

use super::Vec2;

/// A rigid 2D transform: rotation about the origin followed by a translation
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub translation: Vec2,
    pub rotation: f32,
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        translation: Vec2::ZERO,
        rotation: 0.0,
    };

    pub const fn new(translation: Vec2, rotation: f32) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn apply(&self, point: Vec2) -> Vec2 {
        if self.rotation == 0.0 {
            point + self.translation
        } else {
            Vec2::from_angle(self.rotation).rotate(point) + self.translation
        }
    }
}
