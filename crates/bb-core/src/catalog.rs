//! Component catalog: the immutable table of component kinds, their
//! editable properties, and default values.
//!
//! The catalog is a plain value handed to the document model and the
//! property editor. `Catalog::builtin()` is the standard table; tests and
//! embedders may build their own.

use crate::model::{Component, ComponentKind, Properties, PropertyValue};
use serde::Serialize;

/// How a property is edited in the property panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Number,
    Select,
    Text,
    TextArea,
}

/// One choice of a select property. `id` is what gets stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub id: &'static str,
    pub label: &'static str,
}

/// Default value of a property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyDefault {
    Number(f64),
    Text(&'static str),
}

impl PropertyDefault {
    pub fn to_value(self) -> PropertyValue {
        match self {
            PropertyDefault::Number(n) => PropertyValue::Number(n),
            PropertyDefault::Text(s) => PropertyValue::Text(s.to_string()),
        }
    }
}

fn no_options(options: &&'static [SelectOption]) -> bool {
    options.is_empty()
}

/// Descriptor for one editable property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [SelectOption],
    pub default: PropertyDefault,
}

impl PropertySpec {
    pub const fn number(name: &'static str, label: &'static str, unit: &'static str) -> Self {
        Self {
            name,
            label,
            input: InputKind::Number,
            unit: Some(unit),
            options: &[],
            default: PropertyDefault::Number(0.0),
        }
    }

    pub const fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [SelectOption],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            input: InputKind::Select,
            unit: None,
            options,
            default: PropertyDefault::Text(default),
        }
    }

    pub const fn text(name: &'static str, label: &'static str, input: InputKind) -> Self {
        Self {
            name,
            label,
            input,
            unit: None,
            options: &[],
            default: PropertyDefault::Text(""),
        }
    }

    /// Look up a select option by its stored id.
    pub fn option(&self, id: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// Everything the catalog knows about one component kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindSpec {
    pub kind: ComponentKind,
    pub label: &'static str,
    pub properties: Vec<PropertySpec>,
}

impl KindSpec {
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Default property bag for a freshly placed component.
    pub fn defaults(&self) -> Properties {
        self.properties
            .iter()
            .map(|p| (p.name.to_string(), p.default.to_value()))
            .collect()
    }

    /// The first numeric property, used as the component's headline value.
    pub fn primary(&self) -> Option<&PropertySpec> {
        self.properties
            .iter()
            .find(|p| p.input == InputKind::Number)
    }
}

const CAPACITOR_TYPES: &[SelectOption] = &[
    SelectOption {
        id: "ceramic",
        label: "Ceramic",
    },
    SelectOption {
        id: "electrolytic",
        label: "Electrolytic",
    },
    SelectOption {
        id: "film",
        label: "Film",
    },
];

const LED_COLORS: &[SelectOption] = &[
    SelectOption {
        id: "red",
        label: "Red",
    },
    SelectOption {
        id: "green",
        label: "Green",
    },
    SelectOption {
        id: "blue",
        label: "Blue",
    },
    SelectOption {
        id: "yellow",
        label: "Yellow",
    },
];

const TRANSISTOR_TYPES: &[SelectOption] = &[
    SelectOption {
        id: "npn",
        label: "NPN",
    },
    SelectOption {
        id: "pnp",
        label: "PNP",
    },
];

/// The table of placeable component kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    kinds: Vec<KindSpec>,
}

impl Catalog {
    pub fn new(kinds: Vec<KindSpec>) -> Self {
        Self { kinds }
    }

    /// The standard breadboard parts bin.
    pub fn builtin() -> Self {
        use ComponentKind::*;
        let diode_like = || {
            vec![
                PropertySpec::number("forwardVoltage", "Forward Voltage", "V"),
                PropertySpec::number("maxCurrent", "Max Current", "mA"),
            ]
        };

        let mut led = diode_like();
        led.push(PropertySpec::select("color", "Color", LED_COLORS, "red"));

        Self::new(vec![
            KindSpec {
                kind: Resistor,
                label: "Resistor",
                properties: vec![
                    PropertySpec::number("resistance", "Resistance", "Ω"),
                    PropertySpec::number("powerRating", "Power Rating", "W"),
                    PropertySpec::number("tolerance", "Tolerance", "%"),
                ],
            },
            KindSpec {
                kind: Capacitor,
                label: "Capacitor",
                properties: vec![
                    PropertySpec::number("capacitance", "Capacitance", "µF"),
                    PropertySpec::number("voltageRating", "Voltage Rating", "V"),
                    PropertySpec::select(
                        "capacitorType",
                        "Type",
                        CAPACITOR_TYPES,
                        "electrolytic",
                    ),
                ],
            },
            KindSpec {
                kind: Inductor,
                label: "Inductor",
                properties: vec![
                    PropertySpec::number("inductance", "Inductance", "mH"),
                    PropertySpec::number("currentRating", "Current Rating", "A"),
                ],
            },
            KindSpec {
                kind: Diode,
                label: "Diode",
                properties: diode_like(),
            },
            KindSpec {
                kind: Led,
                label: "LED",
                properties: led,
            },
            KindSpec {
                kind: Transistor,
                label: "Transistor",
                properties: vec![
                    PropertySpec::select("transistorType", "Type", TRANSISTOR_TYPES, "npn"),
                    PropertySpec::number("gain", "Gain", "hFE"),
                    PropertySpec::number("maxCollectorCurrent", "Max Collector Current", "A"),
                ],
            },
            KindSpec {
                kind: Ic,
                label: "IC",
                properties: vec![
                    PropertySpec::text("icType", "Type", InputKind::Text),
                    PropertySpec::text("description", "Description", InputKind::TextArea),
                ],
            },
            KindSpec {
                kind: Battery,
                label: "Battery",
                properties: vec![
                    PropertySpec::number("voltage", "Voltage", "V"),
                    PropertySpec::number("capacity", "Capacity", "mAh"),
                ],
            },
            KindSpec {
                kind: PowerSupply,
                label: "Power Supply",
                properties: vec![
                    PropertySpec::number("voltage", "Voltage", "V"),
                    PropertySpec::number("maxCurrent", "Max Current", "A"),
                ],
            },
        ])
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&KindSpec> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    /// Kinds in palette order.
    pub fn kinds(&self) -> impl Iterator<Item = &KindSpec> {
        self.kinds.iter()
    }

    pub fn defaults(&self, kind: ComponentKind) -> Option<Properties> {
        self.get(kind).map(KindSpec::defaults)
    }

    pub fn property(&self, kind: ComponentKind, name: &str) -> Option<&PropertySpec> {
        self.get(kind).and_then(|k| k.property(name))
    }

    /// Headline numeric value of a component (its first numeric property),
    /// or 0 when the kind has none or the value is not a number.
    pub fn primary_value(&self, component: &Component) -> f64 {
        self.get(component.kind)
            .and_then(KindSpec::primary)
            .and_then(|p| component.properties.get(p.name))
            .and_then(PropertyValue::as_number)
            .unwrap_or(0.0)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_covers_every_kind() {
        let catalog = Catalog::builtin();
        for kind in ComponentKind::ALL {
            assert!(catalog.get(kind).is_some(), "missing {kind}");
        }
        assert_eq!(catalog.kinds().count(), ComponentKind::ALL.len());
    }

    #[test]
    fn resistor_defaults() {
        let defaults = Catalog::builtin()
            .defaults(ComponentKind::Resistor)
            .unwrap();
        let names: Vec<&str> = defaults.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["powerRating", "resistance", "tolerance"]);
        assert!(defaults.values().all(|v| *v == PropertyValue::Number(0.0)));
    }

    #[test]
    fn select_defaults_are_valid_option_ids() {
        let catalog = Catalog::builtin();
        for spec in catalog.kinds() {
            for prop in spec.properties.iter().filter(|p| p.input == InputKind::Select) {
                let PropertyDefault::Text(id) = prop.default else {
                    panic!("select {} has a numeric default", prop.name);
                };
                assert!(prop.option(id).is_some(), "{}.{}", spec.label, prop.name);
            }
        }
    }

    #[test]
    fn led_extends_diode_with_color() {
        let catalog = Catalog::builtin();
        let led = catalog.get(ComponentKind::Led).unwrap();
        let names: Vec<&str> = led.properties.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["forwardVoltage", "maxCurrent", "color"]);
    }

    #[test]
    fn ic_has_no_primary_value() {
        let catalog = Catalog::builtin();
        assert!(catalog.get(ComponentKind::Ic).unwrap().primary().is_none());
        assert_eq!(
            catalog
                .get(ComponentKind::Transistor)
                .unwrap()
                .primary()
                .map(|p| p.name),
            Some("gain")
        );
    }
}
