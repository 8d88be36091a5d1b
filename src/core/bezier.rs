//! Kubische Bézier-Segmente: Auswertung, Unterteilung, Bogenlänge, Nächster-Punkt-Suche.
//!
//! Reine Mathematik über vier Kontrollvektoren, ohne Kenntnis von Nodes oder Splines.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::SplineNode;

/// Untere/obere Klemmgrenze für `tangent()`, damit flache Handles an den Endpunkten
/// trotzdem eine brauchbare Richtung liefern.
const TANGENT_T_MIN: f32 = 0.0001;
const TANGENT_T_MAX: f32 = 0.9999;

/// Unterhalb/oberhalb dieser Parameter gilt `split()` als No-op.
const SPLIT_EPSILON: f32 = 1.0e-5;

/// 24-Punkt-Gauß-Legendre-Regel auf [-1, 1], nur positive Stützstellen (symmetrisch).
///
/// Paare `(Stützstelle, Gewicht)`.
const GAUSS_LEGENDRE_24: [(f32, f32); 12] = [
    (0.064_056_89, 0.127_938_2),
    (0.191_118_87, 0.125_837_46),
    (0.315_042_68, 0.121_670_47),
    (0.433_793_5, 0.115_505_67),
    (0.545_421_5, 0.107_444_27),
    (0.648_093_64, 0.097_618_65),
    (0.740_124_2, 0.086_190_16),
    (0.820_001_96, 0.073_346_48),
    (0.886_415_5, 0.059_298_585),
    (0.938_274_55, 0.044_277_44),
    (0.974_728_56, 0.028_531_389),
    (0.995_187_2, 0.012_341_23),
];

/// Kubische Bézier-Kurve B(t) = (1-t)³·A + 3(1-t)²t·B + 3(1-t)t²·C + t³·D.
///
/// `A` = Start, `B` = Start-Tangentenpunkt, `C` = End-Tangentenpunkt, `D` = Ende.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub d: Vec3,
}

impl CubicBezier {
    /// Erstellt eine Kurve aus vier Kontrollvektoren.
    pub const fn new(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Self {
        Self { a, b, c, d }
    }

    /// Degenerierte Kurve, deren vier Kontrollpunkte auf `point` liegen.
    pub const fn point(point: Vec3) -> Self {
        Self::new(point, point, point, point)
    }

    /// Baut das Segment zwischen zwei aufeinanderfolgenden Nodes.
    ///
    /// Verwendet die effektiven Handles (im `Point`-Modus also null).
    pub fn from_nodes(start: &SplineNode, end: &SplineNode) -> Self {
        Self::new(
            start.position,
            start.position + start.out_handle(),
            end.position + end.in_handle(),
            end.position,
        )
    }

    /// Relative Start-Tangente `B - A`.
    pub fn start_tangent(&self) -> Vec3 {
        self.b - self.a
    }

    /// Relative End-Tangente `C - D`.
    pub fn end_tangent(&self) -> Vec3 {
        self.c - self.d
    }

    /// Position bei `t ∈ [0, 1]` (Bernstein-Basis).
    pub fn position(&self, t: f32) -> Vec3 {
        let inv = 1.0 - t;
        let inv2 = inv * inv;
        let t2 = t * t;
        inv2 * inv * self.a + 3.0 * inv2 * t * self.b + 3.0 * inv * t2 * self.c + t2 * t * self.d
    }

    /// Erste Ableitung B'(t). Die Ableitung ist selbst eine quadratische Bézier-Kurve
    /// mit den Kontrollpunkten 3(B-A), 3(C-B), 3(D-C).
    pub fn derivative(&self, t: f32) -> Vec3 {
        let d0 = 3.0 * (self.b - self.a);
        let d1 = 3.0 * (self.c - self.b);
        let d2 = 3.0 * (self.d - self.c);
        let inv = 1.0 - t;
        inv * inv * d0 + 2.0 * inv * t * d1 + t * t * d2
    }

    /// Tangente (nicht normiert) bei `t`.
    ///
    /// `t` wird auf `[0.0001, 0.9999]` geklemmt, damit ein Handle der Länge null am
    /// exakten Endpunkt keine Null-Richtung erzeugt.
    pub fn tangent(&self, t: f32) -> Vec3 {
        self.derivative(t.clamp(TANGENT_T_MIN, TANGENT_T_MAX))
    }

    /// De-Casteljau-Unterteilung bei `t`.
    ///
    /// Bei `t ≈ 0` ist die rechte Hälfte die Originalkurve (links degeneriert auf `A`),
    /// bei `t ≈ 1` die linke Hälfte (rechts degeneriert auf `D`).
    pub fn split(&self, t: f32) -> (CubicBezier, CubicBezier) {
        if t <= SPLIT_EPSILON {
            return (Self::point(self.a), *self);
        }
        if t >= 1.0 - SPLIT_EPSILON {
            return (*self, Self::point(self.d));
        }

        let ab = self.a.lerp(self.b, t);
        let bc = self.b.lerp(self.c, t);
        let cd = self.c.lerp(self.d, t);
        let abc = ab.lerp(bc, t);
        let bcd = bc.lerp(cd, t);
        let mid = abc.lerp(bcd, t);

        (
            CubicBezier::new(self.a, ab, abc, mid),
            CubicBezier::new(mid, bcd, cd, self.d),
        )
    }

    /// Bogenlänge über 24-Punkt-Gauß-Legendre-Quadratur des Ableitungsbetrags auf [0, 1].
    pub fn length(&self) -> f32 {
        let mut sum = 0.0;
        for &(x, w) in GAUSS_LEGENDRE_24.iter() {
            let t_hi = 0.5 + 0.5 * x;
            let t_lo = 0.5 - 0.5 * x;
            sum += w * (self.derivative(t_hi).length() + self.derivative(t_lo).length());
        }
        // Intervall-Transformation [-1, 1] → [0, 1]
        0.5 * sum
    }

    /// Sucht den Parameter, dessen Kurvenpunkt `point` am nächsten liegt.
    ///
    /// Bisektion ohne Ableitungen: Der Bereich `[begin, end]` wird halbiert, in beiden
    /// Hälften wird je ein Probe-Parameter ausgewertet, die Hälfte mit der näheren Probe
    /// bleibt. Abbruch sobald die Bereichsbreite unter `tolerance` liegt.
    pub fn closest_parameter(&self, point: Vec3, tolerance: f32) -> f32 {
        self.closest_parameter_in(point, 0.0, 1.0, tolerance.max(f32::EPSILON))
    }

    fn closest_parameter_in(&self, point: Vec3, begin: f32, end: f32, tolerance: f32) -> f32 {
        let mid = (begin + end) * 0.5;
        if end - begin < tolerance {
            return mid;
        }

        let left_sample = (begin + mid) * 0.5;
        let right_sample = (mid + end) * 0.5;
        let left_dist = self.position(left_sample).distance_squared(point);
        let right_dist = self.position(right_sample).distance_squared(point);

        if left_dist < right_dist {
            self.closest_parameter_in(point, begin, mid, tolerance)
        } else {
            self.closest_parameter_in(point, mid, end, tolerance)
        }
    }

    /// Projiziert alle Kontrollvektoren auf die Ebene durch `plane_point` mit Normale
    /// `plane_normal`.
    ///
    /// Da die Projektion affin ist, liegt die Projektion von B(t) auf der projizierten Kurve
    /// beim selben `t`.
    pub fn project_to_plane(&self, plane_point: Vec3, plane_normal: Vec3) -> CubicBezier {
        let normal = plane_normal.normalize_or_zero();
        let project = |v: Vec3| v - normal * (v - plane_point).dot(normal);
        CubicBezier::new(
            project(self.a),
            project(self.b),
            project(self.c),
            project(self.d),
        )
    }

    /// Krümmungsmaß bei `t`, aus den Kreuzprodukten der Kontrolldifferenzen.
    ///
    /// Nur der quadratische Term wird durch die Länge geteilt; diese Rangfolge ist
    /// Teil des Vertrags.
    pub fn curvature(&self, t: f32) -> f32 {
        let a = self.b - self.a;
        let b = self.c - self.b;
        let c = self.d - self.c;
        let ab = a.cross(b).length();
        let ac = a.cross(c).length();
        let bc = b.cross(c).length();
        let length = self.length();
        if length <= f32::EPSILON {
            return 0.0;
        }
        ab + ac * t + bc * t * t / length
    }
}
