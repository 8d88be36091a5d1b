//! Fehlertypen der Spline-Engine.

use thiserror::Error;

/// Fehler bei strukturellen Spline-Operationen.
///
/// Alle Fehler werden vor jeder Mutation erkannt; der Spline bleibt unverändert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplineError {
    /// Lese-/Schreibzugriff auf einen nicht existierenden Node.
    #[error("Node-Index {index} außerhalb des gültigen Bereichs (Node-Anzahl: {count})")]
    NodeIndexOutOfRange { index: usize, count: usize },
    /// Einfüge-Position liegt außerhalb von `0..=node_count`.
    #[error("Einfüge-Index {index} außerhalb des gültigen Bereichs (0..={max})")]
    InsertIndexOutOfRange { index: usize, max: usize },
    /// Segment-Index für eine Unterteilung existiert nicht.
    #[error("Segment-Index {index} außerhalb des gültigen Bereichs (Segment-Anzahl: {count})")]
    SegmentIndexOutOfRange { index: usize, count: usize },
    /// Unterteilung genau auf einem bestehenden Node.
    #[error("Unterteilung am Endpunkt von Segment {segment_index} ergäbe einen doppelten Node")]
    SplitAtEndpoint { segment_index: usize },
    /// Operation benötigt mindestens ein Segment.
    #[error("Spline hat keine Segmente")]
    NoSegments,
}
