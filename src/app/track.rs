//! Keyframe-Track entlang eines Splines.
//!
//! Jeder Key ist an ein `SplineResult` verankert. Nach Strukturänderungen werden die
//! Anker über die `RemapPolicy` des Tracks neu bestimmt; Abfragen interpolieren
//! zwischen benachbarten Keys nach Spline-Distanz.

use std::cell::RefCell;
use std::rc::Rc;

use super::use_cases::remap::{remap_result, RemapPolicy};
use crate::core::{Spline, SplineChange, SplineListener, SplineResult};
use crate::shared::Interpolate;

/// Ein Key: Wert an einer Stelle des Splines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackKey<T> {
    pub anchor: SplineResult,
    pub value: T,
}

/// Sortierte Keys eines interpolierbaren Werts.
#[derive(Debug, Clone)]
pub struct DistanceTrack<T: Interpolate> {
    keys: Vec<TrackKey<T>>,
    policy: RemapPolicy,
}

impl<T: Interpolate> DistanceTrack<T> {
    /// Erstellt einen leeren Track.
    pub fn new(policy: RemapPolicy) -> Self {
        Self {
            keys: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RemapPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RemapPolicy) {
        self.policy = policy;
    }

    /// Alle Keys, aufsteigend nach Anker-Distanz.
    pub fn keys(&self) -> &[TrackKey<T>] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Fügt einen Key sortiert ein und gibt seinen Index zurück.
    ///
    /// Bei gleicher Distanz landet der neue Key hinter den vorhandenen.
    pub fn insert_key(&mut self, anchor: SplineResult, value: T) -> usize {
        let index = self
            .keys
            .partition_point(|k| k.anchor.distance <= anchor.distance);
        self.keys.insert(index, TrackKey { anchor, value });
        index
    }

    /// Entfernt den Key an `index`.
    pub fn remove_key(&mut self, index: usize) -> Option<TrackKey<T>> {
        (index < self.keys.len()).then(|| self.keys.remove(index))
    }

    /// Interpolierter Wert bei Spline-Distanz `distance`.
    ///
    /// Vor dem ersten bzw. hinter dem letzten Key gilt dessen Wert. `None` ohne Keys.
    pub fn sample(&self, distance: f32) -> Option<T> {
        let first = self.keys.first()?;
        let upper = self.keys.partition_point(|k| k.anchor.distance <= distance);
        if upper == 0 {
            return Some(first.value);
        }
        if upper == self.keys.len() {
            return self.keys.last().map(|k| k.value);
        }

        let a = &self.keys[upper - 1];
        let b = &self.keys[upper];
        let span = b.anchor.distance - a.anchor.distance;
        if span <= f32::EPSILON {
            return Some(b.value);
        }
        let factor = ((distance - a.anchor.distance) / span).clamp(0.0, 1.0);
        Some(T::interpolate(a.value, b.value, factor))
    }

    /// Interpolierter Wert an einem Abfrage-Ergebnis.
    pub fn sample_result(&self, result: &SplineResult) -> Option<T> {
        self.sample(result.distance)
    }

    /// Bildet alle Anker über `changes` auf den aktuellen Spline ab und sortiert neu.
    ///
    /// Mit leerem `changes` werden die Anker nur neu ausgewertet (z.B. nach
    /// Positionsänderungen an Nodes).
    pub fn apply_changes(&mut self, spline: &mut Spline, changes: &[SplineChange]) {
        for key in &mut self.keys {
            key.anchor = remap_result(spline, &key.anchor, changes, self.policy);
        }
        // Stabil, damit gleichauf liegende Keys ihre Reihenfolge behalten
        self.keys
            .sort_by(|a, b| a.anchor.distance.total_cmp(&b.anchor.distance));
        log::debug!(
            "Track mit {} Keys nach {} Änderungen neu verankert ({:?})",
            self.keys.len(),
            changes.len(),
            self.policy
        );
    }
}

/// Sammelt Strukturänderungen eines Splines für spätere Neuverankerung.
///
/// Listener bekommen den Spline selbst nicht zu sehen (er ist während der
/// Benachrichtigung gesperrt). Der Recorder puffert daher die Events, und der
/// Besitzer ruft danach `DistanceTrack::apply_changes` mit `take()` auf.
#[derive(Debug, Clone, Default)]
pub struct ChangeRecorder {
    changes: Rc<RefCell<Vec<SplineChange>>>,
}

impl ChangeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener zur Registrierung per `Spline::add_listener`.
    pub fn listener(&self) -> Box<dyn SplineListener> {
        let changes = Rc::clone(&self.changes);
        Box::new(move |change: &SplineChange| changes.borrow_mut().push(*change))
    }

    /// Entnimmt alle gepufferten Änderungen in Eingangsreihenfolge.
    pub fn take(&self) -> Vec<SplineChange> {
        std::mem::take(&mut *self.changes.borrow_mut())
    }

    /// Anzahl gepufferter Änderungen.
    pub fn pending(&self) -> usize {
        self.changes.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SplineNode;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn line(points: &[f32]) -> Spline {
        Spline::from_nodes(
            points
                .iter()
                .map(|&x| SplineNode::new(Vec3::new(x, 0.0, 0.0)))
                .collect(),
            false,
        )
    }

    #[test]
    fn test_sample_interpolates_between_keys() {
        let mut spline = line(&[0.0, 10.0]);
        let mut track = DistanceTrack::new(RemapPolicy::SplineDistance);
        track.insert_key(spline.result_at_distance(8.0), 4.0f32);
        track.insert_key(spline.result_at_distance(2.0), 1.0f32);

        assert_eq!(track.len(), 2);
        assert!(track.keys()[0].anchor.distance < track.keys()[1].anchor.distance);

        assert_eq!(track.sample(0.0), Some(1.0));
        assert_eq!(track.sample(10.0), Some(4.0));
        assert_relative_eq!(track.sample(5.0).unwrap_or_default(), 2.5, epsilon = 1e-3);
    }

    #[test]
    fn test_empty_track_samples_none() {
        let track: DistanceTrack<Vec3> = DistanceTrack::new(RemapPolicy::ClosestPoint);
        assert!(track.is_empty());
        assert_eq!(track.sample(1.0), None);
    }

    #[test]
    fn test_remove_key_out_of_range() {
        let mut spline = line(&[0.0, 10.0]);
        let mut track = DistanceTrack::new(RemapPolicy::SplineDistance);
        track.insert_key(spline.result_at_distance(1.0), Vec3::ONE);

        assert!(track.remove_key(3).is_none());
        assert!(track.remove_key(0).is_some());
        assert!(track.is_empty());
    }

    #[test]
    fn test_recorder_drives_closest_point_remap() {
        let mut spline = line(&[0.0, 10.0, 20.0]);
        let recorder = ChangeRecorder::new();
        spline.add_listener(recorder.listener());

        let mut track = DistanceTrack::new(RemapPolicy::ClosestPoint);
        track.insert_key(spline.result_at_distance(5.0), 0.0f32);
        track.insert_key(spline.result_at_distance(15.0), 1.0f32);

        spline.prepend_node(SplineNode::new(Vec3::new(-10.0, 0.0, 0.0)));
        assert_eq!(recorder.pending(), 1);

        track.apply_changes(&mut spline, &recorder.take());
        assert_eq!(recorder.pending(), 0);

        // Weltpositionen bleiben, Distanzen verschieben sich um 10
        assert_relative_eq!(track.keys()[0].anchor.distance, 15.0, epsilon = 0.05);
        assert_relative_eq!(track.keys()[1].anchor.distance, 25.0, epsilon = 0.05);
        assert_relative_eq!(track.sample(20.0).unwrap_or_default(), 0.5, epsilon = 0.01);
    }

    #[test]
    fn test_segment_policy_follows_inserted_node() {
        let mut spline = line(&[0.0, 10.0, 20.0]);
        let mut track = DistanceTrack::new(RemapPolicy::SegmentParameter);
        track.insert_key(spline.result_at_segment_t(1, 0.5), Vec3::X);

        let change = spline
            .insert_node(1, SplineNode::new(Vec3::new(5.0, 0.0, 0.0)))
            .expect("Index gültig");
        track.apply_changes(&mut spline, &[change]);

        let anchor = track.keys()[0].anchor;
        assert_eq!(anchor.segment_index, 2);
        assert!((anchor.position - Vec3::new(15.0, 0.0, 0.0)).length() < 0.05);
    }
}
