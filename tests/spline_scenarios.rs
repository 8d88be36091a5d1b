//! Integrationstests für die Spline-Engine:
//! - Szenarien A–E (Gerade, Kreis, Einfügen, Nächster Punkt, Loop-Umschaltung)
//! - Monotonie und Additivität der Distanztabellen
//! - Formerhaltung beim Einfügen, Handle-Constraints, Loop-Wrap

use approx::assert_relative_eq;
use glam::Vec3;
use spline_editor::{CubicBezier, DistanceTable, HandleSide, NodeMode, Spline, SplineNode};

const CIRCLE_HANDLE: f32 = 0.552_284_75;

fn line_a() -> Spline {
    Spline::from_nodes(
        vec![
            SplineNode::new(Vec3::ZERO),
            SplineNode::new(Vec3::new(10.0, 0.0, 0.0)),
        ],
        false,
    )
}

/// Einheitskreis in der XY-Ebene, Nodes an den Himmelsrichtungen, gegen den Uhrzeigersinn.
fn unit_circle() -> Spline {
    let cardinal = [
        (Vec3::X, Vec3::Y),
        (Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_X, Vec3::NEG_Y),
        (Vec3::NEG_Y, Vec3::X),
    ];
    let nodes = cardinal
        .iter()
        .map(|&(position, tangent)| {
            SplineNode::with_handles(
                position,
                -tangent * CIRCLE_HANDLE,
                tangent * CIRCLE_HANDLE,
                NodeMode::Mirrored,
            )
        })
        .collect();
    Spline::from_nodes(nodes, true)
}

fn wavy_spline() -> Spline {
    Spline::from_nodes(
        vec![
            SplineNode::with_handles(
                Vec3::ZERO,
                Vec3::ZERO,
                Vec3::new(2.0, 4.0, 0.0),
                NodeMode::Free,
            ),
            SplineNode::with_handles(
                Vec3::new(8.0, 0.0, 1.0),
                Vec3::new(-2.0, -1.0, 0.0),
                Vec3::new(4.0, 2.0, 0.0),
                NodeMode::Aligned,
            ),
            SplineNode::with_handles(
                Vec3::new(16.0, 6.0, 0.0),
                Vec3::new(-3.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                NodeMode::Mirrored,
            ),
            SplineNode::with_handles(
                Vec3::new(24.0, 0.0, -2.0),
                Vec3::new(0.0, 3.0, 0.0),
                Vec3::ZERO,
                NodeMode::Free,
            ),
        ],
        false,
    )
}

// ── Szenarien ───────────────────────────────────────────────────────

#[test]
fn test_scenario_a_straight_line_midpoint() {
    let mut spline = line_a();
    let mid = spline.result_at_t(0.5);
    assert!((mid.position - Vec3::new(5.0, 0.0, 0.0)).length() < 0.05);
}

#[test]
fn test_scenario_b_unit_circle() {
    let mut spline = unit_circle();

    let length = spline.length();
    assert!(
        (length - std::f32::consts::TAU).abs() < std::f32::consts::TAU * 0.01,
        "Kreisumfang {} weicht mehr als 1% von 2π ab",
        length
    );

    let quarter = spline.result_at_t(0.25);
    assert!((quarter.position - Vec3::Y).length() < 1e-3);
    assert!((quarter.tangent - Vec3::NEG_X).length() < 1e-3);
}

#[test]
fn test_scenario_c_insert_at_half() {
    let mut spline = Spline::from_nodes(
        vec![SplineNode::new(Vec3::ZERO), SplineNode::new(Vec3::new(4.0, 0.0, 0.0))],
        false,
    );

    spline.insert_node_at_t(0.5).expect("Segment vorhanden");

    assert_eq!(spline.node_count(), 3);
    assert!((spline.nodes()[1].position - Vec3::new(2.0, 0.0, 0.0)).length() < 0.01);
}

#[test]
fn test_scenario_d_closest_to_point() {
    let mut spline = line_a();
    let result = spline.result_closest_to_point(Vec3::new(5.0, 5.0, 0.0));

    assert_relative_eq!(result.distance, 5.0, epsilon = 0.01);
    assert!((result.position - Vec3::new(5.0, 0.0, 0.0)).length() < 0.01);
}

#[test]
fn test_scenario_e_set_loop() {
    let mut spline = Spline::from_nodes(
        vec![
            SplineNode::new(Vec3::ZERO),
            SplineNode::new(Vec3::new(4.0, 0.0, 0.0)),
            SplineNode::new(Vec3::new(2.0, 3.0, 0.0)),
        ],
        false,
    );
    let segments = spline.segment_count();
    let version = spline.version();

    let change = spline.set_loop(true).expect("Flag ändert sich");

    assert_eq!(spline.segment_count(), segments + 1);
    assert_eq!(change.new_segment_count, segments + 1);
    assert!(spline.version() > version);
    assert!(spline.set_loop(true).is_none(), "Erneutes Setzen ist kein Event");
}

// ── Distanztabellen ─────────────────────────────────────────────────

#[test]
fn test_distance_tables_are_monotone() {
    let mut spline = wavy_spline();

    for segment in spline.segments() {
        let mut previous = 0.0f32;
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let d = segment.table.parameter_to_distance(t);
            assert!(d >= previous, "Distanz fällt bei t = {}", t);
            previous = d;

            let back = segment.table.distance_to_parameter(d);
            assert!((back - t).abs() < 1.0 / 15.0, "Rückweg t = {} → {}", t, back);
        }
    }
}

#[test]
fn test_split_lengths_are_additive() {
    let bezier = CubicBezier::new(
        Vec3::ZERO,
        Vec3::new(1.0, 5.0, 0.0),
        Vec3::new(7.0, -3.0, 2.0),
        Vec3::new(9.0, 1.0, 0.0),
    );
    let total = bezier.length();

    for &t in &[0.1f32, 0.33, 0.5, 0.77, 0.95] {
        let (left, right) = bezier.split(t);
        assert_relative_eq!(left.length() + right.length(), total, epsilon = 1e-3);
    }
}

#[test]
fn test_table_length_matches_quadrature() {
    let bezier = CubicBezier::new(
        Vec3::ZERO,
        Vec3::new(0.0, 3.0, 0.0),
        Vec3::new(6.0, 3.0, 0.0),
        Vec3::new(6.0, 0.0, 0.0),
    );
    let table = DistanceTable::build(&bezier, 16);

    assert_eq!(table.samples().len(), 16);
    assert_eq!(table.samples()[0].distance, 0.0);
    assert_relative_eq!(table.length(), bezier.length(), epsilon = 1e-3);
}

// ── Formerhaltung ───────────────────────────────────────────────────

#[test]
fn test_insert_node_preserves_shape() {
    let mut spline = wavy_spline();
    let length = spline.length();
    let distances: Vec<f32> = (0..20).map(|i| length * i as f32 / 19.0).collect();
    let before: Vec<_> = distances.iter().map(|&d| spline.result_at_distance(d)).collect();

    spline.insert_node_at_t(0.41).expect("Segmente vorhanden");
    assert_relative_eq!(spline.length(), length, epsilon = 0.01);

    for (d, old) in distances.iter().zip(&before) {
        let new = spline.result_at_distance(*d);
        assert!(
            (new.position - old.position).length() < 0.05,
            "Position bei d = {} verschoben: {:?} → {:?}",
            d,
            old.position,
            new.position
        );
        assert!(new.tangent.dot(old.tangent) > 0.995, "Tangente bei d = {}", d);
    }
}

// ── Constraints ─────────────────────────────────────────────────────

#[test]
fn test_mirrored_and_aligned_invariants() {
    let mut spline = wavy_spline();

    spline
        .set_node_handle(2, HandleSide::In, Vec3::new(-1.0, 2.0, 0.5))
        .expect("Node 2 existiert");
    let mirrored = spline.nodes()[2];
    assert_eq!(mirrored.out_handle(), -mirrored.in_handle());

    spline
        .set_node_handle(1, HandleSide::Out, Vec3::new(0.0, 5.0, 0.0))
        .expect("Node 1 existiert");
    let aligned = spline.nodes()[1];
    let dot = aligned.in_handle().normalize().dot(aligned.out_handle().normalize());
    assert_relative_eq!(dot, -1.0, epsilon = 1e-5);
    assert_relative_eq!(aligned.in_handle().length(), 5f32.sqrt(), epsilon = 1e-5);
}

#[test]
fn test_mode_switch_derives_from_last_edited() {
    let mut spline = wavy_spline();

    spline
        .set_node_handle(0, HandleSide::Out, Vec3::new(1.0, 1.0, 0.0))
        .expect("Node 0 existiert");
    spline.set_node_mode(0, NodeMode::Mirrored).expect("Node 0 existiert");

    let node = spline.nodes()[0];
    assert_eq!(node.in_handle(), Vec3::new(-1.0, -1.0, 0.0));
}

#[test]
fn test_point_mode_reads_zero_handles() {
    let mut spline = wavy_spline();
    spline.set_node_mode(1, NodeMode::Point).expect("Node 1 existiert");

    let node = spline.nodes()[1];
    assert_eq!(node.in_handle(), Vec3::ZERO);
    assert_eq!(node.out_handle(), Vec3::ZERO);
    assert_ne!(node.raw_handle(HandleSide::Out), Vec3::ZERO, "Rohwert bleibt erhalten");
}

// ── Loop ────────────────────────────────────────────────────────────

#[test]
fn test_loop_wrap_on_three_nodes() {
    let mut spline = Spline::from_nodes(
        vec![
            SplineNode::with_handles(
                Vec3::ZERO,
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                NodeMode::Mirrored,
            ),
            SplineNode::new(Vec3::new(5.0, 1.0, 0.0)),
            SplineNode::new(Vec3::new(2.0, 6.0, 1.0)),
        ],
        true,
    );
    let length = spline.length();

    for i in 0..25 {
        let d = length * i as f32 / 25.0;
        let a = spline.result_at_distance(d);
        let b = spline.result_at_distance(length + d);
        assert!((a.position - b.position).length() < 1e-3, "Abweichung bei d = {}", d);
        assert!(a.tangent.dot(b.tangent) > 0.999);
    }
}

#[test]
fn test_circle_closest_to_ray_from_above() {
    let mut spline = unit_circle();
    let ray = spline_editor::Ray::new(Vec3::new(0.0, 0.8, 4.0), Vec3::NEG_Z);

    let hit = spline.result_closest_to_ray(&ray);

    assert!((hit.position - Vec3::Y).length() < 0.01);
}
