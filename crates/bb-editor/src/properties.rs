//! Property panel editing.
//!
//! Numeric fields keep a text buffer while the user types so partial
//! input such as `-` or `3.` survives between keystrokes. The buffer is
//! committed as a number on blur or when the panel closes. Select and
//! text fields commit on every change.

use crate::commands::Command;
use bb_core::catalog::{Catalog, InputKind, PropertySpec, SelectOption};
use bb_core::id::ComponentId;
use bb_core::model::{ComponentKind, Document, Properties, PropertyValue};
use serde::Serialize;
use std::collections::BTreeMap;
use winnow::ascii::digit0;
use winnow::combinator::opt;
use winnow::prelude::*;

// ─── Numeric input ───────────────────────────────────────────────────────

fn numeric_text(input: &mut &str) -> ModalResult<()> {
    (opt('-'), digit0, opt(('.', digit0)))
        .void()
        .parse_next(input)
}

/// Whether `text` is acceptable in a numeric field: an optional leading
/// minus, digits, and at most one decimal point. Empty text is accepted.
pub fn is_numeric_text(text: &str) -> bool {
    numeric_text.parse(text).is_ok()
}

/// Convert committed numeric text to a value. Anything that does not
/// parse (empty, `-`, `.`) or overflows to infinity becomes 0.
pub fn coerce_number(text: &str) -> f64 {
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

// ─── Errors ──────────────────────────────────────────────────────────────

/// Input the property panel refused. Nothing is committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("component `{0}` not found")]
    ComponentNotFound(ComponentId),
    #[error("component type `{0}` is not in the catalog")]
    UnknownKind(ComponentKind),
    #[error("{kind} has no property `{name}`")]
    UnknownProperty { kind: ComponentKind, name: String },
    #[error("`{0}` is not a number")]
    NotNumeric(String),
    #[error("`{value}` is not an option of `{name}`")]
    InvalidOption { name: String, value: String },
}

// ─── Form view ───────────────────────────────────────────────────────────

/// One row of the rendered property form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Current text of the field: the pending buffer if any, else the
    /// stored value, else empty.
    pub value: String,
}

/// The whole form for one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub component: String,
    pub title: String,
    pub fields: Vec<FieldView>,
}

// ─── Editor ──────────────────────────────────────────────────────────────

/// Edit session for the properties of one component.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEditor {
    component: ComponentId,
    kind: ComponentKind,
    /// Uncommitted numeric text, keyed by property name.
    buffers: BTreeMap<&'static str, String>,
}

impl PropertyEditor {
    /// Open the panel for `id`.
    pub fn open(doc: &Document, catalog: &Catalog, id: ComponentId) -> Result<Self, FormError> {
        let component = doc.component(id).ok_or(FormError::ComponentNotFound(id))?;
        catalog
            .get(component.kind)
            .ok_or(FormError::UnknownKind(component.kind))?;
        Ok(Self {
            component: id,
            kind: component.kind,
            buffers: BTreeMap::new(),
        })
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn has_pending(&self) -> bool {
        !self.buffers.is_empty()
    }

    fn spec<'c>(&self, catalog: &'c Catalog, name: &str) -> Result<&'c PropertySpec, FormError> {
        catalog
            .property(self.kind, name)
            .ok_or_else(|| FormError::UnknownProperty {
                kind: self.kind,
                name: name.to_string(),
            })
    }

    fn update(&self, name: &str, value: PropertyValue) -> Command {
        let mut partial = Properties::new();
        partial.insert(name.to_string(), value);
        Command::UpdateProperties {
            id: self.component,
            partial,
        }
    }

    /// Handle a change event on field `name`.
    ///
    /// Numeric text is buffered and yields no command. Select and text
    /// fields yield the command that commits the value.
    pub fn input(
        &mut self,
        catalog: &Catalog,
        name: &str,
        text: &str,
    ) -> Result<Option<Command>, FormError> {
        let spec = self.spec(catalog, name)?;
        match spec.input {
            InputKind::Number => {
                if !is_numeric_text(text) {
                    return Err(FormError::NotNumeric(text.to_string()));
                }
                self.buffers.insert(spec.name, text.to_string());
                Ok(None)
            }
            InputKind::Select => {
                let value = text.to_lowercase();
                if spec.option(&value).is_none() {
                    return Err(FormError::InvalidOption {
                        name: name.to_string(),
                        value: text.to_string(),
                    });
                }
                Ok(Some(self.update(name, PropertyValue::Text(value))))
            }
            InputKind::Text | InputKind::TextArea => {
                Ok(Some(self.update(name, PropertyValue::Text(text.to_string()))))
            }
        }
    }

    /// Handle a blur event: commit the buffered number for `name`, if any.
    pub fn blur(&mut self, name: &str) -> Option<Command> {
        let text = self.buffers.remove(name)?;
        Some(self.update(name, PropertyValue::Number(coerce_number(&text))))
    }

    /// Close the panel, committing every pending numeric buffer at once.
    pub fn close(self) -> Option<Command> {
        if self.buffers.is_empty() {
            return None;
        }
        let partial: Properties = self
            .buffers
            .into_iter()
            .map(|(name, text)| (name.to_string(), PropertyValue::Number(coerce_number(&text))))
            .collect();
        Some(Command::UpdateProperties {
            id: self.component,
            partial,
        })
    }

    /// Build the form as currently displayed.
    pub fn view(&self, doc: &Document, catalog: &Catalog) -> Result<FormView, FormError> {
        let component = doc
            .component(self.component)
            .ok_or(FormError::ComponentNotFound(self.component))?;
        let spec = catalog
            .get(self.kind)
            .ok_or(FormError::UnknownKind(self.kind))?;

        let fields = spec
            .properties
            .iter()
            .map(|p| FieldView {
                name: p.name,
                label: p.label,
                input: p.input,
                unit: p.unit,
                options: p.options.to_vec(),
                value: match self.buffers.get(p.name) {
                    Some(text) => text.clone(),
                    None => component
                        .properties
                        .get(p.name)
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                },
            })
            .collect();

        Ok(FormView {
            component: self.component.to_string(),
            title: format!("{} Properties", spec.label),
            fields,
        })
    }
}
