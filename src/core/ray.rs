//! Strahl für Pick-Abfragen (z.B. Mausstrahl aus der Kamera).

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Halbgerade `origin + s · direction` mit normierter Richtung.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Erstellt einen Strahl; die Richtung wird normiert (Null-Richtung → +Z).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.try_normalize().unwrap_or(Vec3::Z);
        Self { origin, direction }
    }

    /// Punkt im Abstand `s` entlang des Strahls.
    pub fn point_at(&self, s: f32) -> Vec3 {
        self.origin + self.direction * s
    }

    /// Liegt `point` vor dem Ursprung (positives Skalarprodukt mit der Richtung)?
    pub fn is_in_front(&self, point: Vec3) -> bool {
        (point - self.origin).dot(self.direction) > 0.0
    }
}
