//! Edit commands.
//!
//! Every change to a circuit document is expressed as a `Command` value.
//! Commands can be executed in place against a session's document or
//! applied purely, producing a new document and leaving the input as it
//! was. Either way a failed command changes nothing.

use bb_core::catalog::Catalog;
use bb_core::grid::Cell;
use bb_core::id::{ComponentId, CustomPointId};
use bb_core::model::{ComponentKind, Document, EditError, Endpoint, Properties};

/// A single document edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddComponent {
        kind: ComponentKind,
        cell: Cell,
        stamp: u64,
    },
    MoveComponent {
        id: ComponentId,
        cell: Cell,
    },
    RotateComponent {
        id: ComponentId,
    },
    /// Shallow-merge `partial` into the component's properties.
    UpdateProperties {
        id: ComponentId,
        partial: Properties,
    },
    /// Pixel position; snapped to grid lines when applied.
    AddCustomPoint {
        x: f64,
        y: f64,
        stamp: u64,
    },
    CreateConnection {
        from: Endpoint,
        to: Endpoint,
    },
}

/// What a successful command created, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    Nothing,
    Component(ComponentId),
    CustomPoint(CustomPointId),
}

impl Command {
    /// Short human-readable label, used in logs.
    pub fn describe(&self) -> String {
        match self {
            Command::AddComponent { kind, cell, .. } => {
                format!("add {kind} at ({}, {})", cell.x, cell.y)
            }
            Command::MoveComponent { id, cell } => {
                format!("move {id} to ({}, {})", cell.x, cell.y)
            }
            Command::RotateComponent { id } => format!("rotate {id}"),
            Command::UpdateProperties { id, partial } => {
                let keys: Vec<&str> = partial.keys().map(String::as_str).collect();
                format!("set {} on {id}", keys.join(", "))
            }
            Command::AddCustomPoint { x, y, .. } => format!("add point at ({x}, {y})"),
            Command::CreateConnection { from, to } => format!("wire {from} → {to}"),
        }
    }

    /// Run the command against `doc` in place.
    pub fn execute(&self, doc: &mut Document, catalog: &Catalog) -> Result<Created, EditError> {
        match self {
            Command::AddComponent { kind, cell, stamp } => doc
                .add_component(catalog, *kind, *cell, *stamp)
                .map(Created::Component),
            Command::MoveComponent { id, cell } => {
                doc.move_component(*id, *cell).map(|()| Created::Nothing)
            }
            Command::RotateComponent { id } => {
                doc.rotate_component(*id).map(|_| Created::Nothing)
            }
            Command::UpdateProperties { id, partial } => doc
                .update_properties(*id, partial.clone())
                .map(|()| Created::Nothing),
            Command::AddCustomPoint { x, y, stamp } => doc
                .add_custom_point(*x, *y, *stamp)
                .map(Created::CustomPoint),
            Command::CreateConnection { from, to } => {
                doc.connect(*from, *to).map(|()| Created::Nothing)
            }
        }
    }
}

/// Apply a command to a copy of `doc` and return the copy.
pub fn apply(doc: &Document, catalog: &Catalog, command: &Command) -> Result<Document, EditError> {
    let mut next = doc.clone();
    command.execute(&mut next, catalog)?;
    Ok(next)
}
