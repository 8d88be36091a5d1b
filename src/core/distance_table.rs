//! Abgetastete Zuordnung Kurvenparameter ↔ Bogenlänge für ein einzelnes Segment.

use serde::{Deserialize, Serialize};

use super::CubicBezier;

/// Ein Stützpunkt der Tabelle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceSample {
    /// Kurvenparameter ∈ [0, 1]
    pub t: f32,
    /// Bogenlänge vom Segmentanfang bis `t`
    pub distance: f32,
}

/// Lookup-Tabelle `(t, distance)` mit fester Auflösung.
///
/// Invarianten: `samples[0].distance == 0`, Distanzen nicht fallend,
/// `length() == samples.last().distance`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceTable {
    samples: Vec<DistanceSample>,
}

impl DistanceTable {
    /// Baut eine neue Tabelle mit `sample_count` Stützpunkten (mindestens 2).
    pub fn build(bezier: &CubicBezier, sample_count: usize) -> Self {
        let mut table = Self::default();
        table.rebuild(bezier, sample_count);
        table
    }

    /// Füllt die Tabelle neu, die Allokation wird wiederverwendet.
    ///
    /// `d_i` ist die Länge der linken Hälfte von `split(t_i)`.
    pub fn rebuild(&mut self, bezier: &CubicBezier, sample_count: usize) {
        let count = sample_count.max(2);
        let last = (count - 1) as f32;

        self.samples.clear();
        self.samples.reserve(count);

        let mut previous = 0.0f32;
        for i in 0..count {
            let t = i as f32 / last;
            let distance = if i == 0 {
                0.0
            } else {
                // Quadraturrauschen darf die Monotonie nicht brechen
                bezier.split(t).0.length().max(previous)
            };
            self.samples.push(DistanceSample { t, distance });
            previous = distance;
        }
    }

    /// Gesamtlänge des Segments.
    pub fn length(&self) -> f32 {
        self.samples.last().map_or(0.0, |s| s.distance)
    }

    /// Read-only Sicht auf alle Stützpunkte.
    pub fn samples(&self) -> &[DistanceSample] {
        &self.samples
    }

    /// Bogenlänge → Kurvenparameter.
    ///
    /// Binärsuche nach dem umschließenden Stützpunkt-Paar, dann lineare Interpolation.
    /// Distanzen jenseits der Länge liefern `t = 1`. Negative Distanzen sind ein
    /// Aufruferfehler (nur in Debug-Builds geprüft).
    pub fn distance_to_parameter(&self, distance: f32) -> f32 {
        debug_assert!(
            distance >= 0.0,
            "distance_to_parameter mit negativer Distanz aufgerufen: {}",
            distance
        );
        let n = self.samples.len();
        if n < 2 || distance >= self.length() {
            return 1.0;
        }
        if distance <= 0.0 {
            return 0.0;
        }

        let idx = self
            .samples
            .partition_point(|s| s.distance <= distance)
            .clamp(1, n - 1);
        let before = self.samples[idx - 1];
        let after = self.samples[idx];

        let span = after.distance - before.distance;
        let frac = if span > f32::EPSILON {
            (distance - before.distance) / span
        } else {
            0.0
        };
        before.t + frac * (after.t - before.t)
    }

    /// Kurvenparameter → Bogenlänge (symmetrisch zu `distance_to_parameter`).
    pub fn parameter_to_distance(&self, t: f32) -> f32 {
        let n = self.samples.len();
        if n < 2 {
            return 0.0;
        }
        let t = t.clamp(0.0, 1.0);

        let idx = self.samples.partition_point(|s| s.t <= t).clamp(1, n - 1);
        let before = self.samples[idx - 1];
        let after = self.samples[idx];

        let span = after.t - before.t;
        let frac = if span > f32::EPSILON {
            (t - before.t) / span
        } else {
            0.0
        };
        before.distance + frac * (after.distance - before.distance)
    }
}
