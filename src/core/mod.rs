//! Core-Domänentypen: Bézier-Segmente, Distanztabellen, Nodes und der Spline selbst.

pub mod bezier;
pub mod distance_table;
pub mod error;
pub mod events;
/// Kontrollpunkte mit Handles und Constraint-Modus
pub mod node;
pub mod ray;
pub mod result;
pub mod segment;
pub mod spline;

pub use bezier::CubicBezier;
pub use distance_table::{DistanceSample, DistanceTable};
pub use error::SplineError;
pub use events::{ListenerId, ListenerRegistry, SplineChange, SplineChangeKind, SplineListener};
pub use node::{derive_handles, HandleSide, NodeMode, SplineNode, DEFAULT_AUTO_TANGENT_LENGTH};
pub use ray::Ray;
pub use result::{SplineResult, FORWARD};
pub use segment::SegmentCache;
pub use spline::Spline;
