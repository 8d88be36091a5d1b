//! Use-Cases der Application-Layer-Orchestrierung.

pub mod remap;
pub mod smoothing;
