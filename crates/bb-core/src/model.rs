//! Circuit document model.
//!
//! The document is three ordered lists: placed components, wires
//! (connections between endpoints), and free-standing custom connection
//! points. Components sit on grid cells; custom points and pin offsets
//! are in pixels. Every mutation goes through a method here, and a
//! method that fails leaves the document untouched.

use crate::catalog::Catalog;
use crate::grid::{COMPONENT_HEIGHT, COMPONENT_WIDTH, Cell, Point};
use crate::id::{ComponentId, CustomPointId};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─── Component kinds ─────────────────────────────────────────────────────

/// The fixed set of placeable parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    Diode,
    Led,
    Transistor,
    Ic,
    Battery,
    PowerSupply,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 9] = [
        ComponentKind::Resistor,
        ComponentKind::Capacitor,
        ComponentKind::Inductor,
        ComponentKind::Diode,
        ComponentKind::Led,
        ComponentKind::Transistor,
        ComponentKind::Ic,
        ComponentKind::Battery,
        ComponentKind::PowerSupply,
    ];

    /// Wire name, e.g. `power_supply`.
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Resistor => "resistor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::Inductor => "inductor",
            ComponentKind::Diode => "diode",
            ComponentKind::Led => "led",
            ComponentKind::Transistor => "transistor",
            ComponentKind::Ic => "ic",
            ComponentKind::Battery => "battery",
            ComponentKind::PowerSupply => "power_supply",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component type name that is not in the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown component type `{0}`")]
pub struct ParseKindError(pub String);

impl FromStr for ComponentKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

// ─── Rotation ────────────────────────────────────────────────────────────

/// Quarter-turn rotation, serialized as integer degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Advance by +90° (mod 360).
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(deg: u16) -> Result<Self, Self::Error> {
        match deg {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(format!("rotation must be 0, 90, 180 or 270, got {other}")),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> u16 {
        r.degrees()
    }
}

// ─── Properties ──────────────────────────────────────────────────────────

/// A single property value: a number or a string (free text or select id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Number(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

/// Property bag of a component, keyed by property name.
pub type Properties = BTreeMap<String, PropertyValue>;

// ─── Components ──────────────────────────────────────────────────────────

/// Pin offsets of every component: centre of the left and right edges.
pub fn default_pins() -> SmallVec<[Point; 2]> {
    smallvec![
        Point::new(0, COMPONENT_HEIGHT / 2),
        Point::new(COMPONENT_WIDTH, COMPONENT_HEIGHT / 2),
    ]
}

/// A part placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Grid cell of the top-left corner.
    pub position: Cell,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub properties: Properties,
    /// Pin offsets relative to the top-left corner, in pixels.
    /// Fixed at creation; not affected by rotation.
    #[serde(default = "default_pins")]
    pub connection_points: SmallVec<[Point; 2]>,
}

impl Component {
    pub fn new(id: ComponentId, kind: ComponentKind, position: Cell, properties: Properties) -> Self {
        Self {
            id,
            kind,
            position,
            rotation: Rotation::Deg0,
            properties,
            connection_points: default_pins(),
        }
    }

    /// Absolute pixel position of pin `index`.
    pub fn pin_anchor(&self, index: usize) -> Option<Point> {
        self.connection_points
            .get(index)
            .map(|offset| self.position.origin() + *offset)
    }
}

// ─── Wiring ──────────────────────────────────────────────────────────────

/// One end of a wire: a component pin or a custom connection point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Pin {
        #[serde(rename = "componentId")]
        component_id: ComponentId,
        #[serde(rename = "pointIndex")]
        point_index: usize,
    },
    Custom {
        #[serde(rename = "customPointId")]
        custom_point_id: CustomPointId,
    },
}

impl Endpoint {
    pub fn pin(component_id: ComponentId, point_index: usize) -> Self {
        Endpoint::Pin {
            component_id,
            point_index,
        }
    }

    pub fn custom(custom_point_id: CustomPointId) -> Self {
        Endpoint::Custom { custom_point_id }
    }

    /// Whether both endpoints belong to the same entity: the same component
    /// (any pin) or the same custom point.
    pub fn same_anchor(&self, other: &Endpoint) -> bool {
        match (self, other) {
            (Endpoint::Pin { component_id: a, .. }, Endpoint::Pin { component_id: b, .. }) => {
                a == b
            }
            (
                Endpoint::Custom { custom_point_id: a },
                Endpoint::Custom { custom_point_id: b },
            ) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Pin {
                component_id,
                point_index,
            } => write!(f, "{component_id}:{point_index}"),
            Endpoint::Custom { custom_point_id } => write!(f, "point:{custom_point_id}"),
        }
    }
}

/// A wire between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
}

/// A free-standing wire anchor, in absolute pixels snapped to grid lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPoint {
    pub id: CustomPointId,
    pub x: i32,
    pub y: i32,
}

impl CustomPoint {
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────

/// Why an edit was refused. The document is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("component `{0}` not found")]
    ComponentNotFound(ComponentId),
    #[error("custom connection point {0} not found")]
    CustomPointNotFound(CustomPointId),
    #[error("component `{component}` has no pin {index}")]
    PinOutOfRange { component: ComponentId, index: usize },
    #[error("component type `{0}` is not in the catalog")]
    UnknownKind(ComponentKind),
    #[error("id `{0}` is already in use")]
    DuplicateId(String),
    #[error("a wire cannot connect {0} to itself")]
    SelfConnection(Endpoint),
}

// ─── Document ────────────────────────────────────────────────────────────

/// The complete circuit document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
    pub custom_connection_points: Vec<CustomPoint>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
            && self.connections.is_empty()
            && self.custom_connection_points.is_empty()
    }

    /// Look up a component by id.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component, EditError> {
        self.components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EditError::ComponentNotFound(id))
    }

    /// Look up a custom connection point by id.
    pub fn custom_point(&self, id: CustomPointId) -> Option<&CustomPoint> {
        self.custom_connection_points.iter().find(|p| p.id == id)
    }

    /// Place a new component of `kind` at `cell` with the catalog's default
    /// properties. The id is `<kind>-<stamp>`.
    pub fn add_component(
        &mut self,
        catalog: &Catalog,
        kind: ComponentKind,
        cell: Cell,
        stamp: u64,
    ) -> Result<ComponentId, EditError> {
        let properties = catalog.defaults(kind).ok_or(EditError::UnknownKind(kind))?;
        let id = ComponentId::for_stamp(kind.as_str(), stamp);
        if self.component(id).is_some() {
            return Err(EditError::DuplicateId(id.to_string()));
        }
        self.components
            .push(Component::new(id, kind, cell, properties));
        Ok(id)
    }

    /// Move a component to a new cell. Nothing else about it changes.
    pub fn move_component(&mut self, id: ComponentId, cell: Cell) -> Result<(), EditError> {
        self.component_mut(id)?.position = cell;
        Ok(())
    }

    /// Rotate a component by +90°. Returns the new rotation.
    pub fn rotate_component(&mut self, id: ComponentId) -> Result<Rotation, EditError> {
        let component = self.component_mut(id)?;
        component.rotation = component.rotation.next();
        Ok(component.rotation)
    }

    /// Shallow-merge `partial` into a component's properties.
    pub fn update_properties(
        &mut self,
        id: ComponentId,
        partial: Properties,
    ) -> Result<(), EditError> {
        self.component_mut(id)?.properties.extend(partial);
        Ok(())
    }

    /// Add a custom connection point at a pixel position, snapped down to
    /// the grid lines.
    pub fn add_custom_point(
        &mut self,
        px: f64,
        py: f64,
        stamp: u64,
    ) -> Result<CustomPointId, EditError> {
        let id = CustomPointId(stamp);
        if self.custom_point(id).is_some() {
            return Err(EditError::DuplicateId(id.to_string()));
        }
        let snapped = Point::snapped(px, py);
        self.custom_connection_points.push(CustomPoint {
            id,
            x: snapped.x,
            y: snapped.y,
        });
        Ok(id)
    }

    /// Check that an endpoint refers to something on the board.
    pub fn check_endpoint(&self, endpoint: &Endpoint) -> Result<(), EditError> {
        match *endpoint {
            Endpoint::Pin {
                component_id,
                point_index,
            } => {
                let component = self
                    .component(component_id)
                    .ok_or(EditError::ComponentNotFound(component_id))?;
                if point_index >= component.connection_points.len() {
                    return Err(EditError::PinOutOfRange {
                        component: component_id,
                        index: point_index,
                    });
                }
                Ok(())
            }
            Endpoint::Custom { custom_point_id } => self
                .custom_point(custom_point_id)
                .map(|_| ())
                .ok_or(EditError::CustomPointNotFound(custom_point_id)),
        }
    }

    /// Append a wire. Both ends must exist and belong to different anchors.
    /// Duplicate wires and pin fan-out are allowed.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> Result<(), EditError> {
        if from.same_anchor(&to) {
            return Err(EditError::SelfConnection(from));
        }
        self.check_endpoint(&from)?;
        self.check_endpoint(&to)?;
        self.connections.push(Connection { from, to });
        Ok(())
    }

    /// Highest id stamp found anywhere in the document. Used to reseed the
    /// stamp source after a load so new ids cannot collide.
    pub fn max_stamp(&self) -> u64 {
        let components = self.components.iter().filter_map(|c| c.id.stamp());
        let points = self.custom_connection_points.iter().map(|p| p.id.0);
        components.chain(points).max().unwrap_or(0)
    }
}
