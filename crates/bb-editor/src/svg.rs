//! SVG rendering of the board.
//!
//! Produces a standalone SVG document: grid background, components with
//! their labels and pin dots, custom points, then wires on top. Used by
//! the browser bridge for display and by the CLI for export.

use crate::wiring::WireTool;
use bb_core::catalog::Catalog;
use bb_core::grid::{
    BOARD_HEIGHT, BOARD_WIDTH, COMPONENT_HEIGHT, COMPONENT_WIDTH, DOT_SIZE, GRID_SIZE, Point,
    footprint,
};
use bb_core::id::ComponentId;
use bb_core::model::{Component, Document};
use bb_core::wire::{DOT_CENTER_OFFSET, resolve_wires};
use std::fmt::Write;

const PIN_COLOR: &str = "#555555";
const ACTIVE_COLOR: &str = "#E53935";
const WIRE_COLOR: &str = "#1E88E5";
const SELECTED_STROKE: &str = "#FB8C00";

/// Render the whole board. `wiring` drives pending-endpoint highlights;
/// `selected` outlines one component.
pub fn render_board_svg(
    doc: &Document,
    catalog: &Catalog,
    wiring: &WireTool,
    selected: Option<ComponentId>,
) -> String {
    let (width, height) = board_extent(doc);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    svg.push_str("<style>\n");
    svg.push_str("  text { font-family: Inter, system-ui, sans-serif; font-size: 11px; }\n");
    svg.push_str("</style>\n");
    let _ = writeln!(
        svg,
        "<defs><pattern id=\"grid\" width=\"{GRID_SIZE}\" height=\"{GRID_SIZE}\" patternUnits=\"userSpaceOnUse\"><path d=\"M {GRID_SIZE} 0 L 0 0 0 {GRID_SIZE}\" fill=\"none\" stroke=\"#E0E0E0\" stroke-width=\"1\" /></pattern></defs>"
    );
    let _ = writeln!(
        svg,
        "<rect width=\"{width}\" height=\"{height}\" fill=\"#FAFAFA\" />\n<rect width=\"{width}\" height=\"{height}\" fill=\"url(#grid)\" />"
    );

    for component in &doc.components {
        render_component(&mut svg, component, catalog, wiring, selected == Some(component.id));
    }

    for point in &doc.custom_connection_points {
        let active = wiring.is_custom_active(point.id);
        render_dot(&mut svg, point.anchor(), active, &format!("point-{}", point.id));
    }

    for wire in resolve_wires(doc) {
        let _ = writeln!(
            svg,
            "  <line class=\"wire\" data-index=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{WIRE_COLOR}\" stroke-width=\"2\" stroke-linecap=\"round\" />",
            wire.index, wire.from.x, wire.from.y, wire.to.x, wire.to.y
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Board size: the default extent, grown to fit anything placed beyond it.
fn board_extent(doc: &Document) -> (i32, i32) {
    let mut width = BOARD_WIDTH;
    let mut height = BOARD_HEIGHT;
    for c in &doc.components {
        let r = footprint(c.position);
        let corner = Point::new(r.x, r.y).offset(r.width + DOT_SIZE * 2, r.height);
        width = width.max(corner.x);
        height = height.max(corner.y);
    }
    for p in &doc.custom_connection_points {
        let corner = p.anchor().offset(DOT_SIZE * 2, DOT_SIZE);
        width = width.max(corner.x);
        height = height.max(corner.y);
    }
    (width, height)
}

fn render_component(
    out: &mut String,
    component: &Component,
    catalog: &Catalog,
    wiring: &WireTool,
    selected: bool,
) {
    let origin = component.position.origin();
    let label = catalog
        .get(component.kind)
        .map_or(component.kind.as_str(), |k| k.label);
    let stroke = if selected { SELECTED_STROKE } else { "#424242" };
    let stroke_width = if selected { 2 } else { 1 };
    let Point { x: cx, y: cy } = origin.offset(COMPONENT_WIDTH / 2, COMPONENT_HEIGHT / 2);

    let _ = writeln!(
        out,
        "<g class=\"component\" id=\"{}\" transform=\"rotate({} {cx} {cy})\">",
        escape_xml(component.id.as_str()),
        component.rotation.degrees()
    );
    let _ = writeln!(
        out,
        "  <rect x=\"{}\" y=\"{}\" width=\"{COMPONENT_WIDTH}\" height=\"{COMPONENT_HEIGHT}\" rx=\"4\" ry=\"4\" fill=\"#FFFFFF\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" />",
        origin.x, origin.y
    );
    let _ = writeln!(
        out,
        "  <text x=\"{cx}\" y=\"{}\" text-anchor=\"middle\" fill=\"#212121\">{}</text>",
        cy.saturating_add(4),
        escape_xml(label)
    );
    out.push_str("</g>\n");

    // Pins are not rotated with the body.
    for index in 0..component.connection_points.len() {
        if let Some(anchor) = component.pin_anchor(index) {
            let active = wiring.is_pin_active(component.id, index);
            render_dot(out, anchor, active, &format!("{}:{index}", component.id));
        }
    }
}

fn render_dot(out: &mut String, anchor: Point, active: bool, key: &str) {
    let center = anchor + DOT_CENTER_OFFSET;
    let fill = if active { ACTIVE_COLOR } else { PIN_COLOR };
    let _ = writeln!(
        out,
        "  <circle class=\"dot\" data-endpoint=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{fill}\" />",
        escape_xml(key),
        center.x,
        center.y,
        DOT_SIZE / 2
    );
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
