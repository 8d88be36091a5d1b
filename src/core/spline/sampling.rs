//! Schrittweise Abfragen für Platzierungs- und Mesh-Konsumenten.

use super::Spline;
use crate::core::SplineResult;

impl Spline {
    /// Läuft ab `from_distance` entlang des Splines, bis die Luftlinie zum Startpunkt
    /// `world_distance` erreicht.
    ///
    /// Schrittweite `step_hint` (Spline-Distanz), danach Bisektion zwischen den letzten
    /// beiden Schritten. Die Iterationen sind durch `advance_max_iterations` begrenzt;
    /// ohne Konvergenz wird eine Warnung geloggt und das beste bisherige Ergebnis geliefert.
    pub fn advance_to_world_distance(
        &mut self,
        from_distance: f32,
        world_distance: f32,
        step_hint: f32,
    ) -> SplineResult {
        let start = self.result_at_distance(from_distance);
        if self.segments.is_empty() || world_distance <= 0.0 {
            return start;
        }

        let max_iterations = self.options.advance_max_iterations.max(1);
        let tolerance = self.options.advance_tolerance;
        let step = if step_hint > f32::EPSILON {
            step_hint
        } else {
            world_distance
        };

        let mut best = start;
        let mut best_error = world_distance;
        let mut previous = start.loop_distance;
        let mut iterations = 0;

        // Grobe Schritte bis die Luftlinie überschritten ist
        let (mut lo, mut hi) = loop {
            if iterations >= max_iterations {
                log::warn!(
                    "advance_to_world_distance: keine Konvergenz nach {} Schritten (Ziel {:.3})",
                    iterations,
                    world_distance
                );
                return best;
            }
            iterations += 1;

            let mut next = previous + step;
            let at_end = !self.is_loop && next >= self.length;
            if at_end {
                next = self.length;
            }

            let result = self.result_at_distance(next);
            let covered = result.position.distance(start.position);
            let error = (covered - world_distance).abs();
            if error < best_error {
                best = result;
                best_error = error;
            }
            if error <= tolerance {
                return result;
            }
            if covered > world_distance {
                break (previous, next);
            }
            if at_end {
                log::warn!(
                    "advance_to_world_distance: Spline-Ende erreicht bei Luftlinie {:.3} < {:.3}",
                    covered,
                    world_distance
                );
                return best;
            }
            previous = next;
        };

        // Bisektion im letzten Schritt
        while iterations < max_iterations {
            iterations += 1;
            let mid = (lo + hi) * 0.5;
            let result = self.result_at_distance(mid);
            let covered = result.position.distance(start.position);
            let error = (covered - world_distance).abs();
            if error < best_error {
                best = result;
                best_error = error;
            }
            if error <= tolerance {
                return result;
            }
            if covered < world_distance {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        log::warn!(
            "advance_to_world_distance: Bisektion ohne Konvergenz (Restfehler {:.5})",
            best_error
        );
        best
    }

    /// Gleichmäßig verteilte Ergebnisse mit Abstand höchstens `max_spacing`.
    ///
    /// Offene Splines enthalten Start und Ende; bei Loops wird der Nahtpunkt nicht doppelt
    /// geliefert. Mehr als `max_even_samples` Abstände werden nicht erzeugt; dann wird
    /// der Abstand entsprechend größer.
    pub fn sample_evenly(&mut self, max_spacing: f32) -> Vec<SplineResult> {
        let length = self.length();
        if self.segments.is_empty() {
            return Vec::new();
        }
        if length < f32::EPSILON || max_spacing <= 0.0 {
            return vec![self.result_at_distance(0.0)];
        }

        let max_count = self.options.max_even_samples.max(1);
        let wanted = (length / max_spacing).ceil().max(1.0);
        let count = if wanted > max_count as f32 {
            log::warn!(
                "sample_evenly: Abstand {} ergäbe {} Abtastungen, begrenze auf {}",
                max_spacing,
                wanted,
                max_count
            );
            max_count
        } else {
            wanted as usize
        };
        let spacing = length / count as f32;
        let last = if self.is_loop { count - 1 } else { count };

        (0..=last)
            .map(|i| self.result_at_distance(i as f32 * spacing))
            .collect()
    }
}
