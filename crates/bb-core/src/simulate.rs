//! Request body for the external simulation service.
//!
//! The editor never simulates anything itself. It reduces the document to
//! one headline number per component plus the raw wire list and posts
//! that to `SIMULATE_PATH`.

use crate::catalog::Catalog;
use crate::model::{ComponentKind, Connection, Document};
use serde::Serialize;

/// Endpoint path of the simulation service.
pub const SIMULATE_PATH: &str = "/api/simulate";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub value: f64,
}

/// Body of `POST /api/simulate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulateRequest {
    pub components: Vec<SimComponent>,
    pub connections: Vec<Connection>,
}

impl SimulateRequest {
    #[must_use]
    pub fn from_document(doc: &Document, catalog: &Catalog) -> Self {
        let components = doc
            .components
            .iter()
            .map(|c| SimComponent {
                id: c.id.to_string(),
                kind: c.kind,
                value: catalog.primary_value(c),
            })
            .collect();
        Self {
            components,
            connections: doc.connections.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::model::{Endpoint, Properties, PropertyValue};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn payload_carries_primary_values_and_wires() {
        let catalog = Catalog::builtin();
        let mut doc = Document::new();
        let r = doc
            .add_component(&catalog, ComponentKind::Resistor, Cell::new(0, 0), 5)
            .unwrap();
        let ic = doc
            .add_component(&catalog, ComponentKind::Ic, Cell::new(5, 0), 6)
            .unwrap();
        let mut partial = Properties::new();
        partial.insert("resistance".into(), PropertyValue::Number(470.0));
        doc.update_properties(r, partial).unwrap();
        doc.connect(Endpoint::pin(r, 1), Endpoint::pin(ic, 0)).unwrap();

        let body = serde_json::to_value(SimulateRequest::from_document(&doc, &catalog)).unwrap();
        assert_eq!(
            body,
            json!({
                "components": [
                    {"id": "resistor-5", "type": "resistor", "value": 470.0},
                    {"id": "ic-6", "type": "ic", "value": 0.0}
                ],
                "connections": [{
                    "from": {"componentId": "resistor-5", "pointIndex": 1},
                    "to": {"componentId": "ic-6", "pointIndex": 0}
                }]
            })
        );
    }

    #[test]
    fn text_in_numeric_field_sends_zero() {
        let catalog = Catalog::builtin();
        let mut doc = Document::new();
        let b = doc
            .add_component(&catalog, ComponentKind::Battery, Cell::new(0, 0), 1)
            .unwrap();
        let mut partial = Properties::new();
        partial.insert("voltage".into(), "nine".into());
        doc.update_properties(b, partial).unwrap();

        let req = SimulateRequest::from_document(&doc, &catalog);
        assert_eq!(req.components[0].value, 0.0);
    }
}
