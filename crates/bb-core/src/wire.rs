//! Wire resolution: endpoint → absolute pixel coordinates.
//!
//! Resolution is best-effort. A wire whose endpoint points at a missing
//! component, pin, or custom point is left out of the result; the rest
//! are unaffected.

use crate::grid::{DOT_SIZE, Point};
use crate::model::{Connection, Document, Endpoint};

/// Offset from a connection-point anchor to the centre of its rendered dot.
pub const DOT_CENTER_OFFSET: Point = Point::new(DOT_SIZE, 0);

/// A wire ready to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireSegment {
    /// Index of the connection in `Document::connections`.
    pub index: usize,
    pub from: Point,
    pub to: Point,
}

/// Absolute pixel position of the dot centre for `endpoint`, if it exists.
pub fn resolve_endpoint(doc: &Document, endpoint: &Endpoint) -> Option<Point> {
    let anchor = match *endpoint {
        Endpoint::Pin {
            component_id,
            point_index,
        } => doc.component(component_id)?.pin_anchor(point_index)?,
        Endpoint::Custom { custom_point_id } => doc.custom_point(custom_point_id)?.anchor(),
    };
    Some(anchor + DOT_CENTER_OFFSET)
}

/// Resolve one connection into a segment.
pub fn resolve_connection(doc: &Document, index: usize, conn: &Connection) -> Option<WireSegment> {
    let from = resolve_endpoint(doc, &conn.from)?;
    let to = resolve_endpoint(doc, &conn.to)?;
    Some(WireSegment { index, from, to })
}

/// Resolve every drawable wire, in document order.
#[must_use]
pub fn resolve_wires(doc: &Document) -> Vec<WireSegment> {
    doc.connections
        .iter()
        .enumerate()
        .filter_map(|(index, conn)| {
            let seg = resolve_connection(doc, index, conn);
            if seg.is_none() {
                log::debug!("dropping wire #{index} ({} -> {}): unresolved endpoint", conn.from, conn.to);
            }
            seg
        })
        .collect()
}
