//! Ergebnis einer Spline-Abfrage.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Fallback-Richtung, wenn die Tangente degeneriert (Länge null) ist.
pub const FORWARD: Vec3 = Vec3::Z;

/// Vollständiges Abfrage-Ergebnis an einer Stelle des Splines.
///
/// Enthält genug Information, damit Konsumenten das Ergebnis nach einer
/// Strukturänderung wieder auf den Spline abbilden können (siehe `RemapPolicy`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplineResult {
    /// Weltposition
    pub position: Vec3,
    /// Normierte Laufrichtung (nie null)
    pub tangent: Vec3,
    /// Distanz entlang des Splines ∈ [0, length]
    pub distance: f32,
    /// `distance / length`
    pub t: f32,
    /// Ungewrappte Distanz (bei Loops inkl. vollständiger Runden)
    pub loop_distance: f32,
    /// `loop_distance / length`
    pub loop_t: f32,
    /// Anzahl vollständiger Runden (nur bei Loops ≠ 0)
    pub lap_count: i32,
    /// Index des Segments, in dem das Ergebnis liegt
    pub segment_index: usize,
    /// Lokaler Bézier-Parameter im Segment
    pub segment_t: f32,
    /// Distanz ab Segmentanfang
    pub segment_distance: f32,
    /// War der Spline zum Abfragezeitpunkt geschlossen?
    pub is_loop: bool,
    /// Gesamtlänge zum Abfragezeitpunkt
    pub length: f32,
    /// Cache-Version zum Abfragezeitpunkt
    pub version: u64,
}

impl SplineResult {
    /// Sentinel für Splines ohne Segmente.
    pub const EMPTY: Self = Self {
        position: Vec3::ZERO,
        tangent: FORWARD,
        distance: 0.0,
        t: 0.0,
        loop_distance: 0.0,
        loop_t: 0.0,
        lap_count: 0,
        segment_index: 0,
        segment_t: 0.0,
        segment_distance: 0.0,
        is_loop: false,
        length: 0.0,
        version: 0,
    };
}

impl Default for SplineResult {
    fn default() -> Self {
        Self::EMPTY
    }
}
