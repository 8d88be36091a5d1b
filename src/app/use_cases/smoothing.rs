//! Use-Case: Automatik-Tangenten aus den Nachbarpositionen setzen.

use glam::Vec3;

use crate::core::{HandleSide, NodeMode, Spline, SplineError};
use crate::shared::spline_geometry::{automatic_handles, phantom_point};

/// Setzt die Handles aller `Automatic`-Nodes neu.
///
/// Gibt die Anzahl der angepassten Nodes zurück. Die Handles hängen nur von Positionen
/// ab, daher spielt die Reihenfolge keine Rolle.
pub fn smooth_automatic_tangents(spline: &mut Spline) -> usize {
    let mut changed = 0;
    for index in 0..spline.node_count() {
        match smooth_node(spline, index) {
            Ok(true) => changed += 1,
            Ok(false) => {}
            Err(e) => log::warn!("Glättung von Node {} fehlgeschlagen: {}", index, e),
        }
    }
    if changed > 0 {
        log::debug!("{} Automatik-Nodes geglättet", changed);
    }
    changed
}

/// Glättet einen einzelnen Node, falls er im Modus `Automatic` ist.
///
/// Offene Enden verwenden einen gespiegelten Phantom-Nachbarn. `Ok(false)`, wenn der
/// Node nicht `Automatic` ist oder keinen Nachbarn hat.
pub fn smooth_node(spline: &mut Spline, index: usize) -> Result<bool, SplineError> {
    let count = spline.node_count();
    let Some(node) = spline.node(index).copied() else {
        return Err(SplineError::NodeIndexOutOfRange { index, count });
    };
    if node.mode() != NodeMode::Automatic || count < 2 {
        return Ok(false);
    }

    let (prev, next) = neighbours(spline, index);
    let (in_handle, out_handle) =
        automatic_handles(prev, node.position, next, node.auto_tangent_length);

    let mut smoothed = node;
    smoothed.set_handle(HandleSide::In, in_handle);
    smoothed.set_handle(HandleSide::Out, out_handle);
    spline.set_node(index, smoothed)?;
    Ok(true)
}

/// Positionen von Vorgänger und Nachfolger (bei Loops zyklisch, sonst Phantom).
fn neighbours(spline: &Spline, index: usize) -> (Vec3, Vec3) {
    let nodes = spline.nodes();
    let count = nodes.len();
    let current = nodes[index].position;

    if spline.is_loop() {
        return (
            nodes[(index + count - 1) % count].position,
            nodes[(index + 1) % count].position,
        );
    }

    let prev = if index > 0 {
        nodes[index - 1].position
    } else {
        phantom_point(current, nodes[index + 1].position)
    };
    let next = if index + 1 < count {
        nodes[index + 1].position
    } else {
        phantom_point(current, nodes[index - 1].position)
    };
    (prev, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SplineNode;
    use approx::assert_relative_eq;

    fn automatic(position: Vec3) -> SplineNode {
        let mut node = SplineNode::new(position);
        node.set_mode(NodeMode::Automatic);
        node
    }

    #[test]
    fn test_interior_node_gets_chord_tangent() {
        let mut spline = Spline::from_nodes(
            vec![
                SplineNode::new(Vec3::ZERO),
                automatic(Vec3::new(5.0, 5.0, 0.0)),
                SplineNode::new(Vec3::new(10.0, 0.0, 0.0)),
            ],
            false,
        );

        assert_eq!(smooth_automatic_tangents(&mut spline), 1);

        let node = spline.nodes()[1];
        assert_relative_eq!(node.out_handle().y, 0.0);
        assert!(node.out_handle().x > 0.0);
        assert!(node.in_handle().x < 0.0);
        assert_relative_eq!(node.out_handle().length(), 50f32.sqrt() * 0.33, epsilon = 1e-4);
    }

    #[test]
    fn test_open_end_uses_phantom_neighbour() {
        let mut spline = Spline::from_nodes(
            vec![automatic(Vec3::ZERO), SplineNode::new(Vec3::new(4.0, 0.0, 0.0))],
            false,
        );

        assert_eq!(smooth_node(&mut spline, 0), Ok(true));

        // Phantom bei (-4,0,0) → beide Handles entlang der X-Achse
        let node = spline.nodes()[0];
        assert_relative_eq!(node.out_handle().x, 4.0 * 0.33, epsilon = 1e-5);
        assert_relative_eq!(node.in_handle().x, -4.0 * 0.33, epsilon = 1e-5);
    }

    #[test]
    fn test_loop_uses_cyclic_neighbours() {
        let mut spline = Spline::from_nodes(
            vec![
                automatic(Vec3::ZERO),
                SplineNode::new(Vec3::new(4.0, 0.0, 0.0)),
                SplineNode::new(Vec3::new(4.0, 4.0, 0.0)),
                SplineNode::new(Vec3::new(0.0, 4.0, 0.0)),
            ],
            true,
        );

        smooth_automatic_tangents(&mut spline);

        // Sehne von (0,4) nach (4,0) → Diagonale
        let out = spline.nodes()[0].out_handle().normalize();
        assert_relative_eq!(out.x, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
        assert_relative_eq!(out.y, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
    }

    #[test]
    fn test_non_automatic_nodes_are_untouched() {
        let mut spline = Spline::from_nodes(
            vec![SplineNode::new(Vec3::ZERO), SplineNode::new(Vec3::X)],
            false,
        );
        let before = spline.nodes().to_vec();

        assert_eq!(smooth_automatic_tangents(&mut spline), 0);
        assert_eq!(spline.nodes(), before.as_slice());
        assert!(smooth_node(&mut spline, 9).is_err());
    }
}
