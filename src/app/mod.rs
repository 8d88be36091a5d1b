//! Application-Layer: Use-Cases, die auf dem Spline-Kern aufbauen.
//!
//! Der Kern kennt nur Nodes, Segmente und Abfragen. Glättung, Neuverankerung
//! aufgezeichneter Ergebnisse und Keyframe-Tracks liegen hier.

pub mod track;
pub mod use_cases;

pub use track::{ChangeRecorder, DistanceTrack, TrackKey};
pub use use_cases::remap::{remap_result, RemapPolicy};
pub use use_cases::smoothing::{smooth_automatic_tangents, smooth_node};
