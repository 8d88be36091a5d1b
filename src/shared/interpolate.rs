//! Lineare Interpolation für Werte, die entlang eines Splines animiert werden.

use glam::{Quat, Vec2, Vec3, Vec4};

/// Typen, zwischen denen sich bei Faktor `t ∈ [0, 1]` interpolieren lässt.
///
/// `t` wird nicht geklemmt; Aufrufer liefern Werte innerhalb des Intervalls.
pub trait Interpolate: Copy {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Interpolate for Vec3 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Interpolate for Vec4 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Interpolate for Quat {
    /// Sphärisch, entlang des kürzeren Bogens.
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }
}
