//! Die zentrale Spline-Datenstruktur: Nodes, Loop-Flag und lazy Segment-Cache.
//!
//! Jede Mutation setzt `dirty`; jede geometrieabhängige Abfrage läuft zuerst über
//! `ensure_fresh()`, das den Cache synchron neu aufbaut und `version` erhöht.
//! Deshalb nehmen auch Abfragen `&mut self`.

use glam::Vec3;

use super::events::{ListenerId, ListenerRegistry, SplineChange, SplineChangeKind, SplineListener};
use super::result::FORWARD;
use super::{
    CubicBezier, HandleSide, NodeMode, SegmentCache, SplineError, SplineNode, SplineResult,
};
use crate::shared::SplineOptions;

mod closest;
mod sampling;

/// Lokale Parameter näher als dieser Wert an 0 oder 1 gelten beim Unterteilen als Endpunkt.
const SPLIT_ENDPOINT_EPSILON: f32 = 1e-5;

/// Stückweise kubischer Spline über einer geordneten Node-Folge.
pub struct Spline {
    nodes: Vec<SplineNode>,
    is_loop: bool,
    segments: Vec<SegmentCache>,
    length: f32,
    inverse_length: f32,
    dirty: bool,
    version: u64,
    options: SplineOptions,
    listeners: ListenerRegistry,
}

impl Spline {
    /// Erstellt einen leeren, offenen Spline mit Standard-Optionen.
    pub fn new() -> Self {
        Self::with_options(SplineOptions::default())
    }

    /// Erstellt einen leeren, offenen Spline mit den angegebenen Optionen.
    pub fn with_options(options: SplineOptions) -> Self {
        Self {
            nodes: Vec::new(),
            is_loop: false,
            segments: Vec::new(),
            length: 0.0,
            inverse_length: 1.0,
            dirty: true,
            version: 0,
            options: options.sanitized(),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Baut einen Spline aus einer Node-Liste (ohne Listener-Benachrichtigung).
    pub fn from_nodes(nodes: Vec<SplineNode>, is_loop: bool) -> Self {
        let mut spline = Self::new();
        spline.nodes = nodes;
        spline.is_loop = is_loop;
        spline
    }

    // ── Zustand ─────────────────────────────────────────────────────

    /// Aktive Optionen.
    pub fn options(&self) -> &SplineOptions {
        &self.options
    }

    /// Ersetzt die Optionen; der Cache wird beim nächsten Zugriff neu aufgebaut.
    pub fn set_options(&mut self, options: SplineOptions) {
        self.options = options.sanitized();
        self.dirty = true;
    }

    /// Gibt die Anzahl der Nodes zurück.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Gibt die Anzahl der Segmente zurück (`loop ? n : max(0, n-1)`).
    pub fn segment_count(&self) -> usize {
        Self::segment_count_for(self.nodes.len(), self.is_loop)
    }

    fn segment_count_for(node_count: usize, is_loop: bool) -> usize {
        if is_loop {
            node_count
        } else {
            node_count.saturating_sub(1)
        }
    }

    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    /// Muss der Cache vor der nächsten Abfrage neu aufgebaut werden?
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Gesamtlänge. Baut den Cache bei Bedarf neu auf.
    pub fn length(&mut self) -> f32 {
        self.ensure_fresh();
        self.length
    }

    /// `1 / length`, bzw. `1` bei Länge nahe null. Baut den Cache bei Bedarf neu auf.
    pub fn inverse_length(&mut self) -> f32 {
        self.ensure_fresh();
        self.inverse_length
    }

    /// Cache-Version. Baut den Cache bei Bedarf neu auf, damit Konsumenten
    /// ausstehende Änderungen als neue Version sehen.
    pub fn version(&mut self) -> u64 {
        self.ensure_fresh();
        self.version
    }

    /// Read-only Sicht auf alle Segmente (Cache wird vorher aktualisiert).
    pub fn segments(&mut self) -> &[SegmentCache] {
        self.ensure_fresh();
        &self.segments
    }

    // ── Cache ───────────────────────────────────────────────────────

    /// Baut den Cache neu auf, falls `dirty`.
    ///
    /// Seiteneffekt: erhöht `version` genau dann, wenn ein Neuaufbau stattfand.
    pub fn ensure_fresh(&mut self) {
        if self.dirty {
            self.rebuild_cache();
        }
    }

    /// Baut alle Segmente an Ort und Stelle neu auf und summiert die Länge.
    pub fn rebuild_cache(&mut self) {
        let node_count = self.nodes.len();
        let segment_count = self.segment_count();
        let samples = self.options.distance_table_samples;

        self.segments.truncate(segment_count);
        let mut start_distance = 0.0f32;
        for i in 0..segment_count {
            let bezier = CubicBezier::from_nodes(&self.nodes[i], &self.nodes[(i + 1) % node_count]);
            match self.segments.get_mut(i) {
                Some(segment) => segment.rebuild(bezier, samples, start_distance),
                None => self
                    .segments
                    .push(SegmentCache::new(bezier, samples, start_distance)),
            }
            start_distance += self.segments[i].length();
        }

        self.length = start_distance;
        self.inverse_length = if self.length > f32::EPSILON {
            1.0 / self.length
        } else {
            1.0
        };
        self.dirty = false;
        self.version += 1;

        log::debug!(
            "Spline-Cache neu aufgebaut: {} Segmente, Länge {:.3}, Version {}",
            segment_count,
            self.length,
            self.version
        );
    }

    // ── Nodes ───────────────────────────────────────────────────────

    /// Read-only Sicht auf alle Nodes.
    pub fn nodes(&self) -> &[SplineNode] {
        &self.nodes
    }

    /// Node an `index`, falls vorhanden.
    pub fn node(&self, index: usize) -> Option<&SplineNode> {
        self.nodes.get(index)
    }

    fn check_node_index(&self, index: usize) -> Result<(), SplineError> {
        if index < self.nodes.len() {
            Ok(())
        } else {
            Err(SplineError::NodeIndexOutOfRange {
                index,
                count: self.nodes.len(),
            })
        }
    }

    /// Ersetzt den Node an `index`.
    pub fn set_node(&mut self, index: usize, node: SplineNode) -> Result<(), SplineError> {
        self.check_node_index(index)?;
        self.nodes[index] = node;
        self.dirty = true;
        Ok(())
    }

    /// Verschiebt einen Node.
    pub fn set_node_position(&mut self, index: usize, position: Vec3) -> Result<(), SplineError> {
        self.check_node_index(index)?;
        self.nodes[index].position = position;
        self.dirty = true;
        Ok(())
    }

    /// Setzt einen Handle inklusive Constraint-Propagation.
    pub fn set_node_handle(
        &mut self,
        index: usize,
        side: HandleSide,
        value: Vec3,
    ) -> Result<(), SplineError> {
        self.check_node_index(index)?;
        self.nodes[index].set_handle(side, value);
        self.dirty = true;
        Ok(())
    }

    /// Wechselt den Modus eines Nodes.
    pub fn set_node_mode(&mut self, index: usize, mode: NodeMode) -> Result<(), SplineError> {
        self.check_node_index(index)?;
        self.nodes[index].set_mode(mode);
        self.dirty = true;
        Ok(())
    }

    /// Hängt einen Node an das Ende an.
    pub fn append_node(&mut self, node: SplineNode) -> SplineChange {
        self.insert_unchecked(self.nodes.len(), node)
    }

    /// Fügt einen Node am Anfang ein.
    pub fn prepend_node(&mut self, node: SplineNode) -> SplineChange {
        self.insert_unchecked(0, node)
    }

    /// Fügt einen Node an `index ∈ [0, node_count]` ein.
    pub fn insert_node(
        &mut self,
        index: usize,
        node: SplineNode,
    ) -> Result<SplineChange, SplineError> {
        if index > self.nodes.len() {
            log::warn!(
                "Node-Einfügen abgelehnt: Index {} > Node-Anzahl {}",
                index,
                self.nodes.len()
            );
            return Err(SplineError::InsertIndexOutOfRange {
                index,
                max: self.nodes.len(),
            });
        }
        Ok(self.insert_unchecked(index, node))
    }

    fn insert_unchecked(&mut self, index: usize, node: SplineNode) -> SplineChange {
        let old_node_count = self.nodes.len();
        let old_segment_count = self.segment_count();
        self.nodes.insert(index, node);
        self.dirty = true;
        self.emit(SplineChangeKind::NodeInserted { index }, old_node_count, old_segment_count)
    }

    /// Entfernt den Node an `index` und gibt ihn zurück.
    pub fn remove_node(&mut self, index: usize) -> Result<SplineNode, SplineError> {
        self.check_node_index(index)?;
        let old_node_count = self.nodes.len();
        let old_segment_count = self.segment_count();
        let removed = self.nodes.remove(index);
        self.dirty = true;
        self.emit(SplineChangeKind::NodeRemoved { index }, old_node_count, old_segment_count);
        Ok(removed)
    }

    /// Öffnet oder schließt den Spline (Segment-Anzahl ±1).
    ///
    /// Gibt `None` zurück, wenn sich das Flag nicht ändert.
    pub fn set_loop(&mut self, is_loop: bool) -> Option<SplineChange> {
        if self.is_loop == is_loop {
            return None;
        }
        let old_node_count = self.nodes.len();
        let old_segment_count = self.segment_count();
        self.is_loop = is_loop;
        self.dirty = true;
        Some(self.emit(
            SplineChangeKind::LoopChanged { is_loop },
            old_node_count,
            old_segment_count,
        ))
    }

    /// Kehrt die Laufrichtung um (Node-Reihenfolge und Handles).
    ///
    /// Bei Loops bleibt Node 0 der Start-Node, nur die übrigen Nodes werden umgedreht.
    pub fn reverse(&mut self) -> SplineChange {
        let old_node_count = self.nodes.len();
        let old_segment_count = self.segment_count();
        if self.is_loop && self.nodes.len() > 1 {
            self.nodes[1..].reverse();
        } else {
            self.nodes.reverse();
        }
        for node in &mut self.nodes {
            *node = node.reversed();
        }
        self.dirty = true;
        self.emit(SplineChangeKind::Reversed, old_node_count, old_segment_count)
    }

    /// Fügt an Spline-Parameter `t` einen Node ein, ohne die Form zu verändern.
    ///
    /// Fällt `t` auf einen bestehenden Node (auch `t = 1` bei Loops), wird abgelehnt.
    pub fn insert_node_at_t(&mut self, t: f32) -> Result<SplineChange, SplineError> {
        if self.segment_count() == 0 {
            return Err(SplineError::NoSegments);
        }
        let result = self.result_at_t(t);
        self.split_segment(result.segment_index, result.segment_t)
    }

    /// Teilt Segment `segment_index` bei lokalem Parameter `segment_t` (De Casteljau).
    ///
    /// Der neue Node erhält die Split-Tangenten als Handles; er ist `Point`, wenn beide
    /// Nachbarn `Point` sind, sonst `Aligned`. Die Nachbar-Handles werden auf die
    /// Split-Hälften gekürzt, die Kurvenform bleibt erhalten.
    ///
    /// `segment_t` nahe 0 oder 1 würde einen doppelten Node erzeugen und wird abgelehnt.
    pub fn split_segment(
        &mut self,
        segment_index: usize,
        segment_t: f32,
    ) -> Result<SplineChange, SplineError> {
        let segment_count = self.segment_count();
        if segment_index >= segment_count {
            log::warn!(
                "Segment-Unterteilung abgelehnt: Index {} >= Segment-Anzahl {}",
                segment_index,
                segment_count
            );
            return Err(SplineError::SegmentIndexOutOfRange {
                index: segment_index,
                count: segment_count,
            });
        }
        if segment_t <= SPLIT_ENDPOINT_EPSILON || segment_t >= 1.0 - SPLIT_ENDPOINT_EPSILON {
            log::warn!(
                "Segment-Unterteilung abgelehnt: t = {} liegt auf einem Endpunkt von Segment {}",
                segment_t,
                segment_index
            );
            return Err(SplineError::SplitAtEndpoint { segment_index });
        }

        let start_index = segment_index;
        let end_index = (segment_index + 1) % self.nodes.len();
        let bezier = CubicBezier::from_nodes(&self.nodes[start_index], &self.nodes[end_index]);
        let (left, right) = bezier.split(segment_t);

        let both_point = self.nodes[start_index].mode() == NodeMode::Point
            && self.nodes[end_index].mode() == NodeMode::Point;
        let mode = if both_point {
            NodeMode::Point
        } else {
            NodeMode::Aligned
        };

        let mut inserted = SplineNode::new(left.d);
        inserted.set_mode_raw(mode);
        inserted.set_raw_handle(HandleSide::In, left.end_tangent());
        inserted.set_raw_handle(HandleSide::Out, right.start_tangent());
        inserted.auto_tangent_length = self.options.default_auto_tangent_length;

        shorten_handle(&mut self.nodes[start_index], HandleSide::Out, left.start_tangent());
        shorten_handle(&mut self.nodes[end_index], HandleSide::In, right.end_tangent());

        Ok(self.insert_unchecked(segment_index + 1, inserted))
    }

    // ── Listener ────────────────────────────────────────────────────

    /// Registriert einen Listener für Strukturänderungen.
    pub fn add_listener(&mut self, listener: Box<dyn SplineListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Meldet einen Listener ab.
    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn SplineListener>> {
        self.listeners.remove(id)
    }

    fn emit(
        &mut self,
        kind: SplineChangeKind,
        old_node_count: usize,
        old_segment_count: usize,
    ) -> SplineChange {
        let change = SplineChange {
            kind,
            old_node_count,
            new_node_count: self.nodes.len(),
            old_segment_count,
            new_segment_count: self.segment_count(),
        };
        self.listeners.notify(&change);
        change
    }

    // ── Distanz-Abfragen ────────────────────────────────────────────

    /// Ergebnis bei Spline-Distanz `distance`.
    ///
    /// Offene Splines klemmen auf `[0, length]`, Loops wrappen und zählen Runden.
    pub fn result_at_distance(&mut self, distance: f32) -> SplineResult {
        self.ensure_fresh();
        if self.segments.is_empty() {
            return self.empty_result();
        }

        let (wrapped, loop_distance, lap_count) = self.wrap_distance(distance);
        let index = self.segment_index_at(wrapped);
        let segment = &self.segments[index];
        let local = (wrapped - segment.start_distance).clamp(0.0, segment.length());
        let segment_t = segment.table.distance_to_parameter(local);

        self.build_result(index, segment_t, local, loop_distance, lap_count)
    }

    /// Ergebnis bei normiertem Spline-Parameter `t` (`t · length`).
    pub fn result_at_t(&mut self, t: f32) -> SplineResult {
        let length = self.length();
        self.result_at_distance(t * length)
    }

    /// Ergebnis bei Distanz `distance` innerhalb von Segment `segment_index`.
    ///
    /// Loops wrappen den Index modulo Segment-Anzahl, offene Splines klemmen ihn.
    pub fn result_at_segment_distance(
        &mut self,
        segment_index: usize,
        distance: f32,
    ) -> SplineResult {
        self.ensure_fresh();
        let Some(index) = self.resolve_segment_index(segment_index) else {
            return self.empty_result();
        };
        let segment = &self.segments[index];
        let local = distance.clamp(0.0, segment.length());
        let segment_t = segment.table.distance_to_parameter(local);
        let global = segment.start_distance + local;

        self.build_result(index, segment_t, local, global, 0)
    }

    /// Ergebnis bei lokalem Bézier-Parameter `t` innerhalb von Segment `segment_index`.
    pub fn result_at_segment_t(&mut self, segment_index: usize, t: f32) -> SplineResult {
        self.ensure_fresh();
        let Some(index) = self.resolve_segment_index(segment_index) else {
            return self.empty_result();
        };
        let segment = &self.segments[index];
        let segment_t = t.clamp(0.0, 1.0);
        let local = segment.table.parameter_to_distance(segment_t);
        let global = segment.start_distance + local;

        self.build_result(index, segment_t, local, global, 0)
    }

    /// Ergebnis exakt an Node `index`.
    pub fn result_at_node(&mut self, index: usize) -> Option<SplineResult> {
        if index >= self.nodes.len() {
            return None;
        }
        self.ensure_fresh();
        if self.segments.is_empty() {
            return Some(SplineResult {
                position: self.nodes[index].position,
                ..self.empty_result()
            });
        }
        if index < self.segments.len() {
            Some(self.result_at_segment_t(index, 0.0))
        } else {
            // Letzter Node eines offenen Splines
            Some(self.result_at_segment_t(self.segments.len() - 1, 1.0))
        }
    }

    /// Spline-Distanz von Node `index`.
    pub fn node_distance(&mut self, index: usize) -> Option<f32> {
        self.result_at_node(index).map(|r| r.distance)
    }

    fn wrap_distance(&self, distance: f32) -> (f32, f32, i32) {
        if self.is_loop && self.length > f32::EPSILON {
            // Division statt `inverse_length`, damit `length / length` exakt eine Runde ergibt
            let lap = (distance / self.length).floor();
            let wrapped = (distance - lap * self.length).clamp(0.0, self.length);
            (wrapped, distance, lap as i32)
        } else {
            let clamped = distance.clamp(0.0, self.length);
            (clamped, clamped, 0)
        }
    }

    fn segment_index_at(&self, distance: f32) -> usize {
        self.segments
            .partition_point(|s| s.start_distance <= distance)
            .saturating_sub(1)
            .min(self.segments.len() - 1)
    }

    fn resolve_segment_index(&self, segment_index: usize) -> Option<usize> {
        let count = self.segments.len();
        if count == 0 {
            None
        } else if self.is_loop {
            Some(segment_index % count)
        } else {
            Some(segment_index.min(count - 1))
        }
    }

    fn build_result(
        &self,
        index: usize,
        segment_t: f32,
        segment_distance: f32,
        loop_distance: f32,
        lap_count: i32,
    ) -> SplineResult {
        let segment = &self.segments[index];
        let distance = (segment.start_distance + segment_distance).clamp(0.0, self.length);
        let tangent = segment
            .bezier
            .tangent(segment_t)
            .try_normalize()
            .unwrap_or(FORWARD);

        SplineResult {
            position: segment.bezier.position(segment_t),
            tangent,
            distance,
            t: distance * self.inverse_length,
            loop_distance,
            loop_t: loop_distance * self.inverse_length,
            lap_count,
            segment_index: index,
            segment_t,
            segment_distance,
            is_loop: self.is_loop,
            length: self.length,
            version: self.version,
        }
    }

    fn empty_result(&self) -> SplineResult {
        SplineResult {
            is_loop: self.is_loop,
            version: self.version,
            ..SplineResult::EMPTY
        }
    }
}

/// Ersetzt einen Nachbar-Handle durch die Split-Hälfte, ohne die Gegenseite zu verändern.
///
/// `Mirrored` wird zu `Aligned`, sonst würde die Gegenseite mitgekürzt.
fn shorten_handle(node: &mut SplineNode, side: HandleSide, value: Vec3) {
    match node.mode() {
        NodeMode::Point => {}
        NodeMode::Mirrored => {
            node.set_mode_raw(NodeMode::Aligned);
            node.set_raw_handle(side, value);
        }
        NodeMode::Free | NodeMode::Aligned | NodeMode::Automatic => {
            node.set_raw_handle(side, value)
        }
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Spline {
    /// Klont Geometrie und Cache; Listener werden nicht übernommen.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            is_loop: self.is_loop,
            segments: self.segments.clone(),
            length: self.length,
            inverse_length: self.inverse_length,
            dirty: self.dirty,
            version: self.version,
            options: self.options.clone(),
            listeners: ListenerRegistry::new(),
        }
    }
}

impl std::fmt::Debug for Spline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spline")
            .field("nodes", &self.nodes)
            .field("is_loop", &self.is_loop)
            .field("segments", &self.segments.len())
            .field("length", &self.length)
            .field("dirty", &self.dirty)
            .field("version", &self.version)
            .field("listeners", &self.listeners)
            .finish()
    }
}
