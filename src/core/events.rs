//! Strukturänderungs-Events und Listener-Registry eines Splines.
//!
//! Listener werden explizit pro Spline registriert und erhalten jede
//! Strukturänderung (Node hinzugefügt/entfernt, Loop umgeschaltet, Richtung
//! umgekehrt) synchron.
//! Positionsänderungen an bestehenden Nodes sind keine Strukturänderung.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Art der Strukturänderung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplineChangeKind {
    /// Node an `index` eingefügt (Append, Prepend, Insert, Split)
    NodeInserted { index: usize },
    /// Node an `index` entfernt
    NodeRemoved { index: usize },
    /// Loop-Flag geändert
    LoopChanged { is_loop: bool },
    /// Laufrichtung umgekehrt; Loops behalten ihren Start-Node
    Reversed,
}

/// Eine Strukturänderung mit Zählern vor und nach der Operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplineChange {
    pub kind: SplineChangeKind,
    pub old_node_count: usize,
    pub new_node_count: usize,
    pub old_segment_count: usize,
    pub new_segment_count: usize,
}

impl SplineChange {
    /// Bildet einen Segment-Index von vor der Änderung auf einen danach ab.
    ///
    /// - Einfügen an `k`: Segmente ab `k` rutschen um eins nach hinten; das geteilte
    ///   Segment `k-1` behält seinen Index.
    /// - Entfernen an `k`: Segmente `k-1` und `k` verschmelzen zu `k-1`, alle dahinter
    ///   rutschen nach vorne.
    /// - Loop-Wechsel: Index bleibt, wird nur in den gültigen Bereich geklemmt.
    /// - Umkehrung: Segment `i` wird zu `n - 1 - i`. Das gilt auch für Loops, weil
    ///   deren Start-Node beim Umkehren stehen bleibt.
    ///
    /// `None`, wenn der Spline danach keine Segmente mehr hat.
    pub fn remap_segment_index(&self, old_index: usize) -> Option<usize> {
        if self.new_segment_count == 0 {
            return None;
        }
        let mapped = match self.kind {
            SplineChangeKind::NodeInserted { index } if old_index >= index => old_index + 1,
            SplineChangeKind::NodeInserted { .. } => old_index,
            SplineChangeKind::NodeRemoved { index } if old_index >= index => {
                old_index.saturating_sub(1)
            }
            SplineChangeKind::NodeRemoved { .. } => old_index,
            SplineChangeKind::LoopChanged { .. } => old_index,
            SplineChangeKind::Reversed => {
                (self.new_segment_count - 1).saturating_sub(old_index)
            }
        };
        Some(mapped.min(self.new_segment_count - 1))
    }
}

/// Empfänger von Strukturänderungen.
pub trait SplineListener {
    /// Wird nach jeder Strukturänderung aufgerufen; der Spline ist dann bereits mutiert.
    fn on_spline_changed(&mut self, change: &SplineChange);
}

impl<F> SplineListener for F
where
    F: FnMut(&SplineChange),
{
    fn on_spline_changed(&mut self, change: &SplineChange) {
        self(change)
    }
}

/// Handle für die Abmeldung eines Listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Registry aller Listener eines Splines, in Registrierungsreihenfolge.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: IndexMap<ListenerId, Box<dyn SplineListener>>,
    next_id: u64,
}

impl ListenerRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert einen Listener und gibt die vergebene ID zurück.
    pub fn add(&mut self, listener: Box<dyn SplineListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    /// Entfernt den Listener mit der angegebenen ID.
    pub fn remove(&mut self, id: ListenerId) -> Option<Box<dyn SplineListener>> {
        self.listeners.shift_remove(&id)
    }

    /// Benachrichtigt alle Listener in Registrierungsreihenfolge.
    pub fn notify(&mut self, change: &SplineChange) {
        for listener in self.listeners.values_mut() {
            listener.on_spline_changed(change);
        }
    }

    /// Gibt die Anzahl registrierter Listener zurück.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Gibt zurück ob keine Listener registriert sind.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(kind: SplineChangeKind, old_segments: usize, new_segments: usize) -> SplineChange {
        SplineChange {
            kind,
            old_node_count: old_segments + 1,
            new_node_count: new_segments + 1,
            old_segment_count: old_segments,
            new_segment_count: new_segments,
        }
    }

    #[test]
    fn test_insert_shifts_following_segments() {
        let c = change(SplineChangeKind::NodeInserted { index: 2 }, 3, 4);

        assert_eq!(c.remap_segment_index(0), Some(0));
        assert_eq!(c.remap_segment_index(1), Some(1));
        assert_eq!(c.remap_segment_index(2), Some(3));
    }

    #[test]
    fn test_remove_merges_adjacent_segments() {
        let c = change(SplineChangeKind::NodeRemoved { index: 1 }, 3, 2);

        assert_eq!(c.remap_segment_index(0), Some(0));
        assert_eq!(c.remap_segment_index(1), Some(0));
        assert_eq!(c.remap_segment_index(2), Some(1));
    }

    #[test]
    fn test_remap_without_segments_is_none() {
        let c = change(SplineChangeKind::NodeRemoved { index: 1 }, 1, 0);
        assert_eq!(c.remap_segment_index(0), None);
    }

    #[test]
    fn test_reverse_mirrors_segment_indices() {
        let open = change(SplineChangeKind::Reversed, 3, 3);
        assert_eq!(open.remap_segment_index(0), Some(2));
        assert_eq!(open.remap_segment_index(1), Some(1));
        assert_eq!(open.remap_segment_index(2), Some(0));

        // Loop mit 4 Nodes: Schließsegment 3 (Node 3 → 0) wird zu Segment 0 (0 → alt 3)
        let closed = SplineChange {
            kind: SplineChangeKind::Reversed,
            old_node_count: 4,
            new_node_count: 4,
            old_segment_count: 4,
            new_segment_count: 4,
        };
        assert_eq!(closed.remap_segment_index(3), Some(0));
        assert_eq!(closed.remap_segment_index(0), Some(3));
    }

    #[test]
    fn test_registry_notifies_in_order_and_removes() {
        use std::sync::{Arc, Mutex};

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();

        let first_log = Arc::clone(&log);
        let first = registry.add(Box::new(move |_: &SplineChange| {
            first_log.lock().unwrap().push(1);
        }));
        let second_log = Arc::clone(&log);
        registry.add(Box::new(move |_: &SplineChange| {
            second_log.lock().unwrap().push(2);
        }));

        let c = change(SplineChangeKind::LoopChanged { is_loop: true }, 2, 3);
        registry.notify(&c);
        assert!(registry.remove(first).is_some());
        registry.notify(&c);

        assert_eq!(*log.lock().unwrap(), vec![1, 2, 2]);
        assert_eq!(registry.len(), 1);
    }
}
