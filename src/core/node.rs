//! Kontrollpunkt eines Splines mit zwei relativen Tangenten-Handles.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Standardwert für den Automatik-Tangenten-Hinweis (Anteil der Nachbar-Abstände).
pub const DEFAULT_AUTO_TANGENT_LENGTH: f32 = 0.33;

/// Constraint-Modus der Handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeMode {
    /// Ecke ohne Handles, beide Handles lesen sich als null
    #[default]
    Point,
    /// Handles unabhängig voneinander
    Free,
    /// Handles antiparallel, Längen unabhängig
    Aligned,
    /// `out == -in`
    Mirrored,
    /// Handles werden von einer externen Glättung gesetzt
    Automatic,
}

/// Welcher Handle gemeint ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandleSide {
    In,
    #[default]
    Out,
}

impl HandleSide {
    /// Die jeweils andere Seite.
    pub fn opposite(self) -> Self {
        match self {
            HandleSide::In => HandleSide::Out,
            HandleSide::Out => HandleSide::In,
        }
    }
}

/// Ein Node des Splines.
///
/// Die Handles sind relativ zur Position gespeichert. Gespeichert wird immer der
/// Rohwert; im `Point`-Modus liefern die Getter trotzdem null. `last_edited` merkt sich
/// den zuletzt bearbeiteten Handle, damit ein Moduswechsel den anderen daraus ableitet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplineNode {
    /// Weltposition
    pub position: Vec3,
    in_handle: Vec3,
    out_handle: Vec3,
    mode: NodeMode,
    /// Längenhinweis für `NodeMode::Automatic`
    pub auto_tangent_length: f32,
    last_edited: HandleSide,
}

impl SplineNode {
    /// Node ohne Handles (`NodeMode::Point`).
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            in_handle: Vec3::ZERO,
            out_handle: Vec3::ZERO,
            mode: NodeMode::Point,
            auto_tangent_length: DEFAULT_AUTO_TANGENT_LENGTH,
            last_edited: HandleSide::Out,
        }
    }

    /// Node mit beiden Handles.
    ///
    /// `in_handle` wird roh übernommen, danach wird `out_handle` gesetzt und per Modus
    /// propagiert. Bei `Mirrored` gewinnt also `out_handle`.
    pub fn with_handles(position: Vec3, in_handle: Vec3, out_handle: Vec3, mode: NodeMode) -> Self {
        let node = Self {
            in_handle,
            mode,
            ..Self::new(position)
        };
        derive_handles(&node, HandleSide::Out, out_handle)
    }

    /// Effektiver Eingangs-Handle.
    pub fn in_handle(&self) -> Vec3 {
        self.handle(HandleSide::In)
    }

    /// Effektiver Ausgangs-Handle.
    pub fn out_handle(&self) -> Vec3 {
        self.handle(HandleSide::Out)
    }

    /// Effektiver Handle der angegebenen Seite (null im `Point`-Modus).
    pub fn handle(&self, side: HandleSide) -> Vec3 {
        if self.mode == NodeMode::Point {
            Vec3::ZERO
        } else {
            self.raw_handle(side)
        }
    }

    /// Gespeicherter Rohwert, unabhängig vom Modus.
    pub fn raw_handle(&self, side: HandleSide) -> Vec3 {
        match side {
            HandleSide::In => self.in_handle,
            HandleSide::Out => self.out_handle,
        }
    }

    /// Eingangs-Handle in Weltkoordinaten.
    pub fn in_point(&self) -> Vec3 {
        self.position + self.in_handle()
    }

    /// Ausgangs-Handle in Weltkoordinaten.
    pub fn out_point(&self) -> Vec3 {
        self.position + self.out_handle()
    }

    pub fn mode(&self) -> NodeMode {
        self.mode
    }

    pub fn last_edited(&self) -> HandleSide {
        self.last_edited
    }

    /// Setzt einen Handle und leitet den anderen gemäß Modus ab.
    pub fn set_handle(&mut self, side: HandleSide, value: Vec3) {
        *self = derive_handles(self, side, value);
    }

    /// Wechselt den Modus.
    ///
    /// Der nicht zuletzt bearbeitete Handle wird aus dem zuletzt bearbeiteten abgeleitet.
    pub fn set_mode(&mut self, mode: NodeMode) {
        self.mode = mode;
        let edited = self.last_edited;
        *self = derive_handles(self, edited, self.raw_handle(edited));
    }

    /// Setzt einen Rohwert ohne Propagation und ohne `last_edited` zu ändern.
    ///
    /// Nur für formerhaltende Operationen, die beide Seiten selbst konsistent halten.
    pub(crate) fn set_raw_handle(&mut self, side: HandleSide, value: Vec3) {
        match side {
            HandleSide::In => self.in_handle = value,
            HandleSide::Out => self.out_handle = value,
        }
    }

    /// Setzt den Modus ohne Neuableitung.
    pub(crate) fn set_mode_raw(&mut self, mode: NodeMode) {
        self.mode = mode;
    }

    /// Vertauscht Ein- und Ausgang (für das Umkehren der Laufrichtung).
    pub fn reversed(&self) -> Self {
        Self {
            in_handle: self.out_handle,
            out_handle: self.in_handle,
            last_edited: self.last_edited.opposite(),
            ..*self
        }
    }
}

/// Reine Ableitungsfunktion: setzt `edited` auf `value` und leitet die Gegenseite ab.
///
/// - `Mirrored`: `other = -value`
/// - `Aligned`: `other = -value.normalize() * |other|`, bei `value == 0` unverändert
/// - `Free` / `Automatic` / `Point`: keine Ableitung
pub fn derive_handles(node: &SplineNode, edited: HandleSide, value: Vec3) -> SplineNode {
    let mut result = *node;
    result.set_raw_handle(edited, value);
    result.last_edited = edited;

    let other_side = edited.opposite();
    let other = node.raw_handle(other_side);

    let derived = match node.mode {
        NodeMode::Mirrored => Some(-value),
        NodeMode::Aligned => {
            let direction = value.normalize_or_zero();
            if direction == Vec3::ZERO {
                None
            } else {
                Some(-direction * other.length())
            }
        }
        NodeMode::Free | NodeMode::Automatic | NodeMode::Point => None,
    };

    if let Some(derived) = derived {
        result.set_raw_handle(other_side, derived);
    }
    result
}
