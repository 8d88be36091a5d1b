//! Spline-Editor-Engine.
//! Kern: Bézier-Segmente mit Distanztabellen, Spline-Abfragen nach Bogenlänge,
//! formerhaltendes Unterteilen und Nächster-Punkt-Suche. Als Library exportiert
//! für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    remap_result, smooth_automatic_tangents, ChangeRecorder, DistanceTrack, RemapPolicy, TrackKey,
};
pub use core::{
    CubicBezier, DistanceTable, HandleSide, ListenerId, NodeMode, Ray, Spline, SplineChange,
    SplineChangeKind, SplineError, SplineListener, SplineNode, SplineResult,
};
pub use shared::{Interpolate, SplineOptions};
