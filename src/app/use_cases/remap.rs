//! Use-Case: aufgezeichnete Spline-Ergebnisse nach Strukturänderungen neu abbilden.
//!
//! Konsumenten (Keyframe-Tracks, platzierte Objekte) speichern ein `SplineResult`.
//! Nach Einfügen/Entfernen von Nodes, einem Loop-Wechsel oder einer Umkehrung wird
//! es über eine `RemapPolicy` wieder auf den geänderten Spline gesetzt.

use serde::{Deserialize, Serialize};

use crate::core::{Spline, SplineChange, SplineChangeKind, SplineResult};

/// Wie ein aufgezeichnetes Ergebnis nach einer Strukturänderung neu bestimmt wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RemapPolicy {
    /// Gleiche absolute Distanz entlang des Splines
    #[default]
    SplineDistance,
    /// Gleicher normierter Parameter `distance / length`
    SplineParameter,
    /// Gleiche Distanz ab Anfang des (umnummerierten) Segments
    SegmentDistance,
    /// Gleicher lokaler Bézier-Parameter im (umnummerierten) Segment
    SegmentParameter,
    /// Nächster Punkt zur alten Weltposition
    ClosestPoint,
}

/// Bildet `recorded` über alle `changes` (in Reihenfolge) auf den aktuellen Spline ab.
///
/// Segment-Policies verfolgen den Segment-Index durch jede Änderung; fällt das Segment
/// weg (Spline ohne Segmente), liefert der Spline sein leeres Ergebnis.
/// Nach einer ungeraden Anzahl von Umkehrungen werden Distanzen und Parameter von
/// hinten gemessen.
pub fn remap_result(
    spline: &mut Spline,
    recorded: &SplineResult,
    changes: &[SplineChange],
    policy: RemapPolicy,
) -> SplineResult {
    let mirrored = changes
        .iter()
        .filter(|change| change.kind == SplineChangeKind::Reversed)
        .count()
        % 2
        == 1;

    match policy {
        RemapPolicy::SplineDistance => {
            let distance = if mirrored {
                spline.length() - recorded.distance
            } else {
                recorded.distance
            };
            spline.result_at_distance(distance)
        }
        RemapPolicy::SplineParameter => {
            let t = if mirrored { 1.0 - recorded.t } else { recorded.t };
            spline.result_at_t(t)
        }
        RemapPolicy::SegmentDistance => match remap_segment(recorded.segment_index, changes) {
            Some(index) => {
                let distance = if mirrored {
                    let segment_length = spline
                        .segments()
                        .get(index)
                        .map_or(0.0, |segment| segment.length());
                    segment_length - recorded.segment_distance
                } else {
                    recorded.segment_distance
                };
                spline.result_at_segment_distance(index, distance)
            }
            None => spline.result_at_distance(0.0),
        },
        RemapPolicy::SegmentParameter => match remap_segment(recorded.segment_index, changes) {
            Some(index) => {
                let segment_t = if mirrored {
                    1.0 - recorded.segment_t
                } else {
                    recorded.segment_t
                };
                spline.result_at_segment_t(index, segment_t)
            }
            None => spline.result_at_distance(0.0),
        },
        RemapPolicy::ClosestPoint => spline.result_closest_to_point(recorded.position),
    }
}

fn remap_segment(segment_index: usize, changes: &[SplineChange]) -> Option<usize> {
    changes
        .iter()
        .try_fold(segment_index, |index, change| change.remap_segment_index(index))
}
