//! Nächster-Punkt-Suche gegen Punkte und Strahlen.
//!
//! Beide Suchen laufen über alle Segmente (O(Segmente)), weil es für zusammengesetzte
//! kubische Kurven keine geschlossene Lösung für das nächste Segment gibt.

use glam::Vec3;

use super::Spline;
use crate::core::{Ray, SplineResult};

/// Kandidat der Strahl-Suche, ein Eintrag pro Segment.
#[derive(Debug, Clone, Copy)]
struct RayCandidate {
    segment_index: usize,
    segment_t: f32,
    in_front: bool,
    projected_distance: f32,
    true_distance: f32,
}

impl RayCandidate {
    /// Reihenfolge: vor dem Ursprung schlägt dahinter; auf gleicher Seite gewinnt die
    /// kleinere projizierte Distanz, bei nahezu gleicher projizierter Distanz die
    /// kleinere echte 3D-Distanz.
    fn is_better_than(&self, other: &RayCandidate, tie_tolerance: f32) -> bool {
        if self.in_front != other.in_front {
            return self.in_front;
        }
        if (self.projected_distance - other.projected_distance).abs() <= tie_tolerance {
            return self.true_distance < other.true_distance;
        }
        self.projected_distance < other.projected_distance
    }
}

impl Spline {
    /// Nächster Punkt des Splines zu `point`.
    pub fn result_closest_to_point(&mut self, point: Vec3) -> SplineResult {
        self.ensure_fresh();
        if self.segments.is_empty() {
            return self.empty_result();
        }

        let tolerance = self.options.closest_point_tolerance;
        let mut best_index = 0;
        let mut best_t = 0.0;
        let mut best_distance_sq = f32::INFINITY;

        for (index, segment) in self.segments.iter().enumerate() {
            let t = segment.bezier.closest_parameter(point, tolerance);
            let distance_sq = segment.bezier.position(t).distance_squared(point);
            if distance_sq < best_distance_sq {
                best_distance_sq = distance_sq;
                best_index = index;
                best_t = t;
            }
        }

        self.result_at_segment_hit(best_index, best_t)
    }

    /// Punkt des Splines, den ein Betrachter entlang `ray` am ehesten meint.
    ///
    /// Jedes Segment wird auf die Ebene senkrecht zum Strahl durch dessen Ursprung
    /// projiziert, dort der nächste Parameter zum Ursprung gesucht und die
    /// *unprojizierte* Position an diesem Parameter bewertet.
    pub fn result_closest_to_ray(&mut self, ray: &Ray) -> SplineResult {
        self.ensure_fresh();
        if self.segments.is_empty() {
            return self.empty_result();
        }

        let tolerance = self.options.closest_point_tolerance;
        let tie_tolerance = self.options.ray_tie_tolerance;
        let mut best: Option<RayCandidate> = None;

        for (index, segment) in self.segments.iter().enumerate() {
            let projected = segment.bezier.project_to_plane(ray.origin, ray.direction);
            let t = projected.closest_parameter(ray.origin, tolerance);
            let world = segment.bezier.position(t);

            let candidate = RayCandidate {
                segment_index: index,
                segment_t: t,
                in_front: ray.is_in_front(world),
                projected_distance: projected.position(t).distance(ray.origin),
                true_distance: world.distance(ray.origin),
            };

            let replace = match &best {
                Some(current) => candidate.is_better_than(current, tie_tolerance),
                None => true,
            };
            if replace {
                best = Some(candidate);
            }
        }

        match best {
            Some(hit) => self.result_at_segment_hit(hit.segment_index, hit.segment_t),
            None => self.empty_result(),
        }
    }

    /// Wandelt einen Segment-Treffer über die Distanztabelle in ein Spline-Ergebnis.
    fn result_at_segment_hit(&mut self, segment_index: usize, segment_t: f32) -> SplineResult {
        let segment = &self.segments[segment_index];
        let distance = segment.start_distance + segment.table.parameter_to_distance(segment_t);
        self.result_at_distance(distance)
    }
}
