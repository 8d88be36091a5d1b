//! Spline-Editor-Demo.
//!
//! Baut einen Kreis aus vier Bézier-Segmenten, wertet ihn nach Bogenlänge aus und
//! gibt gleichmäßig verteilte Abtastpunkte als JSON auf stdout aus.

use glam::Vec3;
use spline_editor::{NodeMode, Ray, Spline, SplineNode, SplineOptions};

/// Handle-Länge für einen Viertelkreis aus einem kubischen Bézier.
const CIRCLE_KAPPA: f32 = 0.552_284_8;

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Spline-Editor v{} startet...", env!("CARGO_PKG_VERSION"));

    let options = SplineOptions::load_from_file(&SplineOptions::config_path());
    let mut spline = circle(1.0, options);

    log::info!(
        "Kreis: {} Nodes, {} Segmente, Länge {:.5} (2π = {:.5})",
        spline.node_count(),
        spline.segment_count(),
        spline.length(),
        std::f32::consts::TAU
    );

    let quarter = spline.result_at_t(0.25);
    log::info!(
        "Viertel: Position {:?}, Tangente {:?}",
        quarter.position,
        quarter.tangent
    );

    let picked = spline.result_closest_to_ray(&Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z));
    log::info!(
        "Strahl von oben trifft Segment {} bei t = {:.3}",
        picked.segment_index,
        picked.segment_t
    );

    let samples = spline.sample_evenly(0.25);
    println!("{}", serde_json::to_string_pretty(&samples)?);
    Ok(())
}

/// Kreis in der XY-Ebene aus vier gespiegelten Nodes.
fn circle(radius: f32, options: SplineOptions) -> Spline {
    let mut spline = Spline::with_options(options);
    let handle = radius * CIRCLE_KAPPA;
    for (position, tangent) in [
        (Vec3::X, Vec3::Y),
        (Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_X, Vec3::NEG_Y),
        (Vec3::NEG_Y, Vec3::X),
    ] {
        spline.append_node(SplineNode::with_handles(
            position * radius,
            -tangent * handle,
            tangent * handle,
            NodeMode::Mirrored,
        ));
    }
    spline.set_loop(true);
    spline
}
