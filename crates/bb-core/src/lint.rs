//! Lint diagnostics for circuit documents.
//!
//! Reports structural issues without modifying the document: property
//! values the catalog does not describe, wires that point at nothing,
//! repeated wires, and repeated ids. Nothing here judges whether the
//! circuit is electrically sound.

use crate::catalog::{Catalog, InputKind};
use crate::model::{Connection, Document, Endpoint, PropertyValue};
use serde::Serialize;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Likely a mistake.
    Warning,
    /// Informational.
    Info,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LintTarget {
    Component(String),
    Wire(usize),
    CustomPoint(u64),
}

/// A single lint diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintDiagnostic {
    pub target: LintTarget,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-wire", "select-option").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the document and return diagnostics.
#[must_use]
pub fn lint_document(doc: &Document, catalog: &Catalog) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(doc, &mut diags);
    lint_properties(doc, catalog, &mut diags);
    lint_wires(doc, &mut diags);
    diags
}

/// Whether any diagnostic is a warning.
pub fn has_warnings(diags: &[LintDiagnostic]) -> bool {
    diags.iter().any(|d| d.severity == LintSeverity::Warning)
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_duplicate_ids(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for c in &doc.components {
        if !seen.insert(c.id) {
            diags.push(LintDiagnostic {
                target: LintTarget::Component(c.id.to_string()),
                message: format!("Component id `{}` is used more than once.", c.id),
                severity: LintSeverity::Warning,
                rule: "duplicate-id",
            });
        }
    }

    let mut seen = HashSet::new();
    for p in &doc.custom_connection_points {
        if !seen.insert(p.id) {
            diags.push(LintDiagnostic {
                target: LintTarget::CustomPoint(p.id.0),
                message: format!("Custom point id {} is used more than once.", p.id),
                severity: LintSeverity::Warning,
                rule: "duplicate-id",
            });
        }
    }
}

fn lint_properties(doc: &Document, catalog: &Catalog, diags: &mut Vec<LintDiagnostic>) {
    for c in &doc.components {
        let Some(spec) = catalog.get(c.kind) else {
            diags.push(LintDiagnostic {
                target: LintTarget::Component(c.id.to_string()),
                message: format!("Type `{}` is not in the catalog.", c.kind),
                severity: LintSeverity::Warning,
                rule: "unknown-kind",
            });
            continue;
        };

        for (name, value) in &c.properties {
            let target = || LintTarget::Component(c.id.to_string());
            let Some(prop) = spec.property(name) else {
                diags.push(LintDiagnostic {
                    target: target(),
                    message: format!("`{name}` is not a {} property.", spec.label),
                    severity: LintSeverity::Info,
                    rule: "unknown-property",
                });
                continue;
            };

            match (prop.input, value) {
                (InputKind::Number, PropertyValue::Number(_)) => {}
                (InputKind::Number, PropertyValue::Text(s)) => diags.push(LintDiagnostic {
                    target: target(),
                    message: format!("`{name}` should be a number, found \"{s}\"."),
                    severity: LintSeverity::Warning,
                    rule: "property-type",
                }),
                (InputKind::Select, PropertyValue::Text(s))
                    if prop.option(&s.to_lowercase()).is_none() =>
                {
                    let allowed: Vec<&str> = prop.options.iter().map(|o| o.id).collect();
                    diags.push(LintDiagnostic {
                        target: target(),
                        message: format!(
                            "`{name}` is \"{s}\", expected one of: {}.",
                            allowed.join(", ")
                        ),
                        severity: LintSeverity::Warning,
                        rule: "select-option",
                    });
                }
                (_, PropertyValue::Number(n)) if prop.input != InputKind::Number => {
                    diags.push(LintDiagnostic {
                        target: target(),
                        message: format!("`{name}` should be text, found {n}."),
                        severity: LintSeverity::Warning,
                        rule: "property-type",
                    });
                }
                _ => {}
            }
        }
    }
}

fn lint_wires(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    let mut seen: HashSet<(Endpoint, Endpoint)> = HashSet::new();
    for (i, Connection { from, to }) in doc.connections.iter().enumerate() {
        for end in [from, to] {
            if let Err(e) = doc.check_endpoint(end) {
                diags.push(LintDiagnostic {
                    target: LintTarget::Wire(i),
                    message: format!("Wire #{i} cannot be drawn: {e}."),
                    severity: LintSeverity::Warning,
                    rule: "dangling-wire",
                });
            }
        }

        if from.same_anchor(to) {
            diags.push(LintDiagnostic {
                target: LintTarget::Wire(i),
                message: format!("Wire #{i} connects {from} back to its own anchor."),
                severity: LintSeverity::Warning,
                rule: "self-connection",
            });
        }

        // Direction does not matter for a wire.
        let key = if seen.contains(&(*to, *from)) {
            (*to, *from)
        } else {
            (*from, *to)
        };
        if !seen.insert(key) {
            diags.push(LintDiagnostic {
                target: LintTarget::Wire(i),
                message: format!("Wire #{i} duplicates an earlier wire between {from} and {to}."),
                severity: LintSeverity::Info,
                rule: "duplicate-wire",
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::id::ComponentId;
    use crate::model::{ComponentKind, Properties};

    fn rules(diags: &[LintDiagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.rule).collect()
    }

    #[test]
    fn clean_document_has_no_findings() {
        let catalog = Catalog::builtin();
        let mut doc = Document::new();
        let a = doc
            .add_component(&catalog, ComponentKind::Capacitor, Cell::new(0, 0), 1)
            .unwrap();
        let b = doc
            .add_component(&catalog, ComponentKind::Ic, Cell::new(4, 0), 2)
            .unwrap();
        doc.connect(Endpoint::pin(a, 1), Endpoint::pin(b, 0)).unwrap();
        assert!(lint_document(&doc, &catalog).is_empty());
    }

    #[test]
    fn property_findings() {
        let catalog = Catalog::builtin();
        let mut doc = Document::new();
        let led = doc
            .add_component(&catalog, ComponentKind::Led, Cell::new(0, 0), 1)
            .unwrap();
        let mut partial = Properties::new();
        partial.insert("color".into(), "ultraviolet".into());
        partial.insert("maxCurrent".into(), "lots".into());
        partial.insert("brightness".into(), PropertyValue::Number(3.0));
        doc.update_properties(led, partial).unwrap();

        let diags = lint_document(&doc, &catalog);
        let mut found = rules(&diags);
        found.sort_unstable();
        assert_eq!(found, vec!["property-type", "select-option", "unknown-property"]);
        assert!(has_warnings(&diags));
    }

    #[test]
    fn wire_findings() {
        let catalog = Catalog::builtin();
        let mut doc = Document::new();
        let a = doc
            .add_component(&catalog, ComponentKind::Resistor, Cell::new(0, 0), 1)
            .unwrap();
        let b = doc
            .add_component(&catalog, ComponentKind::Resistor, Cell::new(4, 0), 2)
            .unwrap();
        doc.connect(Endpoint::pin(a, 1), Endpoint::pin(b, 0)).unwrap();
        doc.connect(Endpoint::pin(b, 0), Endpoint::pin(a, 1)).unwrap();
        doc.connections.push(Connection {
            from: Endpoint::pin(ComponentId::intern("diode-9"), 0),
            to: Endpoint::pin(a, 0),
        });

        let diags = lint_document(&doc, &catalog);
        assert_eq!(rules(&diags), vec!["duplicate-wire", "dangling-wire"]);
        assert_eq!(diags[1].target, LintTarget::Wire(2));
    }

    #[test]
    fn capitalised_select_values_are_accepted() {
        let catalog = Catalog::builtin();
        let mut doc = Document::new();
        let cap = doc
            .add_component(&catalog, ComponentKind::Capacitor, Cell::new(0, 0), 1)
            .unwrap();
        let q = doc
            .add_component(&catalog, ComponentKind::Transistor, Cell::new(5, 0), 2)
            .unwrap();
        let mut partial = Properties::new();
        partial.insert("capacitorType".into(), "Electrolytic".into());
        doc.update_properties(cap, partial).unwrap();
        let mut partial = Properties::new();
        partial.insert("transistorType".into(), "NPN".into());
        doc.update_properties(q, partial).unwrap();

        assert_eq!(lint_document(&doc, &catalog), vec![]);
    }
}
