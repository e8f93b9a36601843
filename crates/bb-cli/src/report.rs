//! `inspect` report: a summary of a circuit file.

use bb_core::catalog::Catalog;
use bb_core::lint::{LintDiagnostic, LintSeverity, lint_document};
use bb_core::model::Document;
use bb_core::netlist::{Net, extract_nets};
use bb_core::wire::resolve_wires;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub components: usize,
    /// Component count per type, in type order.
    pub by_type: BTreeMap<String, usize>,
    pub connections: usize,
    /// Connections that resolve to two existing endpoints.
    pub drawable_connections: usize,
    pub custom_points: usize,
    pub nets: Vec<Net>,
    pub diagnostics: Vec<LintDiagnostic>,
}

impl Report {
    pub fn build(doc: &Document, catalog: &Catalog) -> Self {
        let mut by_type = BTreeMap::new();
        for c in &doc.components {
            *by_type.entry(c.kind.to_string()).or_insert(0) += 1;
        }
        Self {
            components: doc.components.len(),
            by_type,
            connections: doc.connections.len(),
            drawable_connections: resolve_wires(doc).len(),
            custom_points: doc.custom_connection_points.len(),
            nets: extract_nets(doc),
            diagnostics: lint_document(doc, catalog),
        }
    }

    /// Plain-text rendering for the terminal.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "components: {}", self.components);
        for (kind, n) in &self.by_type {
            let _ = writeln!(out, "  {kind}: {n}");
        }
        let _ = writeln!(
            out,
            "connections: {} ({} drawable)",
            self.connections, self.drawable_connections
        );
        let _ = writeln!(out, "custom points: {}", self.custom_points);
        let _ = writeln!(out, "nets: {}", self.nets.len());
        for (i, net) in self.nets.iter().enumerate() {
            let members: Vec<String> = net.endpoints.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "  #{i}: {}", members.join(", "));
        }
        out.push_str(&format_diagnostics(&self.diagnostics));
        out
    }
}

/// One line per diagnostic, or a clean bill of health.
pub fn format_diagnostics(diags: &[LintDiagnostic]) -> String {
    if diags.is_empty() {
        return "no issues found\n".to_string();
    }
    let mut out = String::new();
    for d in diags {
        let level = match d.severity {
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        };
        let _ = writeln!(out, "{level}[{}]: {}", d.rule, d.message);
    }
    out
}
