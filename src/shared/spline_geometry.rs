//! Reine Geometrie-Funktionen für automatische Tangenten (Catmull-Rom-Stil).
//!
//! Layer-neutral: wird von `app::use_cases::smoothing` verwendet, braucht aber
//! selbst keinen Spline.

use glam::Vec3;

/// Gespiegelter Phantom-Punkt hinter einem Endpunkt.
///
/// Damit läuft die Kurve an offenen Enden natürlich durch `end` weiter.
pub fn phantom_point(end: Vec3, neighbour: Vec3) -> Vec3 {
    2.0 * end - neighbour
}

/// Handles eines Nodes aus seinen beiden Nachbarn.
///
/// Die Richtung ist die Sehne `next - prev` (wie bei Catmull-Rom), die Länge jeder
/// Seite `length_factor` mal der Abstand zum jeweiligen Nachbarn.
/// Gibt `(in_handle, out_handle)` relativ zu `current` zurück.
pub fn automatic_handles(
    prev: Vec3,
    current: Vec3,
    next: Vec3,
    length_factor: f32,
) -> (Vec3, Vec3) {
    let direction = (next - prev).normalize_or_zero();
    if direction == Vec3::ZERO {
        return (Vec3::ZERO, Vec3::ZERO);
    }

    let in_length = current.distance(prev) * length_factor;
    let out_length = current.distance(next) * length_factor;
    (-direction * in_length, direction * out_length)
}
