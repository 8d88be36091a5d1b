//! Geteilte Typen und reine Hilfsfunktionen für layer-übergreifende Verträge.
//!
//! Enthält Typen, die zwischen `core` und `app` geteilt werden,
//! um direkte Abhängigkeiten zu vermeiden.

mod interpolate;
pub mod options;
pub mod spline_geometry;

pub use interpolate::Interpolate;
pub use options::SplineOptions;
