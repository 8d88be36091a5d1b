//! Gecachte Geometrie eines Spline-Segments.

use super::{CubicBezier, DistanceTable};

/// Ein Segment mit Kurve, Distanztabelle und Startdistanz innerhalb des Splines.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentCache {
    /// Kurve zwischen den beiden angrenzenden Nodes
    pub bezier: CubicBezier,
    /// Arc-Length-Tabelle dieses Segments
    pub table: DistanceTable,
    /// Summe der Längen aller vorherigen Segmente
    pub start_distance: f32,
}

impl SegmentCache {
    /// Erstellt einen neuen Cache-Eintrag.
    pub fn new(bezier: CubicBezier, sample_count: usize, start_distance: f32) -> Self {
        Self {
            table: DistanceTable::build(&bezier, sample_count),
            bezier,
            start_distance,
        }
    }

    /// Baut den Eintrag an Ort und Stelle neu auf.
    pub fn rebuild(&mut self, bezier: CubicBezier, sample_count: usize, start_distance: f32) {
        self.bezier = bezier;
        self.table.rebuild(&bezier, sample_count);
        self.start_distance = start_distance;
    }

    /// Länge dieses Segments.
    pub fn length(&self) -> f32 {
        self.table.length()
    }

    /// Spline-Distanz am Segmentende.
    pub fn end_distance(&self) -> f32 {
        self.start_distance + self.length()
    }
}
