//! Hit testing: pixel → board element.
//!
//! Connection-point dots are drawn above components, and later entries
//! above earlier ones, so the walk goes dots first, then components,
//! each in reverse document order.

use bb_core::grid::{dot_rect, footprint};
use bb_core::model::{Document, Endpoint};
use bb_core::id::ComponentId;

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A component pin or custom point dot.
    Endpoint(Endpoint),
    /// The body of a component.
    Component(ComponentId),
    /// Empty board.
    Board,
}

/// Find the topmost element at `(px, py)`.
pub fn hit_test(doc: &Document, px: f64, py: f64) -> HitTarget {
    for point in doc.custom_connection_points.iter().rev() {
        if dot_rect(point.anchor()).contains(px, py) {
            return HitTarget::Endpoint(Endpoint::custom(point.id));
        }
    }

    for component in doc.components.iter().rev() {
        for index in (0..component.connection_points.len()).rev() {
            if let Some(anchor) = component.pin_anchor(index)
                && dot_rect(anchor).contains(px, py)
            {
                return HitTarget::Endpoint(Endpoint::pin(component.id, index));
            }
        }
    }

    doc.components
        .iter()
        .rev()
        .find(|c| footprint(c.position).contains(px, py))
        .map_or(HitTarget::Board, |c| HitTarget::Component(c.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_core::catalog::Catalog;
    use bb_core::grid::Cell;
    use bb_core::model::ComponentKind;
    use pretty_assertions::assert_eq;

    fn board() -> (Document, ComponentId, ComponentId) {
        let catalog = Catalog::builtin();
        let mut doc = Document::new();
        let a = doc
            .add_component(&catalog, ComponentKind::Resistor, Cell::new(0, 0), 1)
            .unwrap();
        // Overlaps `a` on purpose.
        let b = doc
            .add_component(&catalog, ComponentKind::Capacitor, Cell::new(2, 1), 2)
            .unwrap();
        (doc, a, b)
    }

    #[test]
    fn pin_dot_wins_over_body() {
        let (doc, a, _) = board();
        // Left pin of `a` anchored at (0,25); dot spans (5..15, 20..30).
        assert_eq!(
            hit_test(&doc, 10.0, 25.0),
            HitTarget::Endpoint(Endpoint::pin(a, 0))
        );
    }

    #[test]
    fn later_component_is_on_top() {
        let (doc, _, b) = board();
        assert_eq!(hit_test(&doc, 60.0, 30.0), HitTarget::Component(b));
    }

    #[test]
    fn custom_point_and_empty_board() {
        let (mut doc, _, _) = board();
        let p = doc.add_custom_point(400.0, 300.0, 3).unwrap();
        assert_eq!(
            hit_test(&doc, 410.0, 300.0),
            HitTarget::Endpoint(Endpoint::custom(p))
        );
        assert_eq!(hit_test(&doc, 700.0, 390.0), HitTarget::Board);
    }

    #[test]
    fn far_off_pointer_and_component() {
        let (mut doc, _, _) = board();
        let far = doc
            .add_component(&Catalog::builtin(), ComponentKind::Led, Cell::new(200_000_000, 0), 3)
            .unwrap();
        assert_eq!(hit_test(&doc, 1e12, 1e12), HitTarget::Board);
        assert_eq!(
            hit_test(&doc, f64::from(i32::MAX), 10.0),
            HitTarget::Component(far)
        );
    }
}
