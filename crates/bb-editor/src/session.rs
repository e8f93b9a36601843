//! Editor session: the authoritative document plus all transient UI state.
//!
//! The session owns the circuit document, the wiring state machine, the
//! current selection and the open property panel. Every document change
//! goes through `execute`, which logs rejected edits and leaves the
//! document untouched. Callers supply the wall-clock time for anything
//! that creates an id, so the session runs the same natively and in WASM.

use crate::commands::{Command, Created};
use crate::hit::{HitTarget, hit_test};
use crate::input::{InputEvent, Modifiers};
use crate::properties::{FormError, FormView, PropertyEditor};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::svg::render_board_svg;
use crate::wiring::{WireOutcome, WireTool};
use bb_core::catalog::Catalog;
use bb_core::grid::Cell;
use bb_core::id::{ComponentId, CustomPointId, StampSource};
use bb_core::lint::{LintDiagnostic, lint_document};
use bb_core::model::{ComponentKind, Document, EditError, Endpoint};
use bb_core::netlist::{Net, extract_nets};
use bb_core::persist::{self, LoadError, STORAGE_KEY, Storage, StorageError};
use bb_core::simulate::SimulateRequest;
use bb_core::wire::{WireSegment, resolve_wires};

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Key the circuit is saved under.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

/// What a board click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Wire(WireOutcome),
    Selected(ComponentId),
    PointAdded(CustomPointId),
    Nothing,
}

/// What an input event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Placed(ComponentId),
    Moved(ComponentId),
    Click(ClickOutcome),
    /// A shortcut fired. `Save` is left to the caller, which owns storage.
    Shortcut(ShortcutAction),
    Ignored,
}

pub struct Session {
    document: Document,
    catalog: Catalog,
    config: SessionConfig,
    wiring: WireTool,
    stamps: StampSource,
    selected: Option<ComponentId>,
    editor: Option<PropertyEditor>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Catalog::builtin(), SessionConfig::default())
    }
}

impl Session {
    pub fn new(catalog: Catalog, config: SessionConfig) -> Self {
        Self {
            document: Document::new(),
            catalog,
            config,
            wiring: WireTool::new(),
            stamps: StampSource::new(),
            selected: None,
            editor: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn wiring(&self) -> &WireTool {
        &self.wiring
    }

    pub fn selected(&self) -> Option<ComponentId> {
        self.selected
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    /// Run a command against the document. Rejected edits are logged and
    /// change nothing.
    pub fn execute(&mut self, command: &Command) -> Result<Created, EditError> {
        match command.execute(&mut self.document, &self.catalog) {
            Ok(created) => {
                log::debug!("{}", command.describe());
                Ok(created)
            }
            Err(e) => {
                log::warn!("rejected `{}`: {e}", command.describe());
                Err(e)
            }
        }
    }

    /// Place a new component of `kind` in the cell containing the pixel.
    pub fn drop_new(
        &mut self,
        kind: ComponentKind,
        px: f64,
        py: f64,
        now_ms: u64,
    ) -> Result<ComponentId, EditError> {
        let stamp = self.stamps.next(now_ms);
        self.execute(&Command::AddComponent {
            kind,
            cell: Cell::containing(px, py),
            stamp,
        })?;
        Ok(ComponentId::for_stamp(kind.as_str(), stamp))
    }

    /// Move an existing component to the cell containing the pixel.
    pub fn drop_existing(&mut self, id: ComponentId, px: f64, py: f64) -> Result<(), EditError> {
        self.execute(&Command::MoveComponent {
            id,
            cell: Cell::containing(px, py),
        })
        .map(|_| ())
    }

    pub fn rotate(&mut self, id: ComponentId) -> Result<(), EditError> {
        self.execute(&Command::RotateComponent { id }).map(|_| ())
    }

    /// Add a custom connection point at a pixel position.
    pub fn add_custom_point(
        &mut self,
        px: f64,
        py: f64,
        now_ms: u64,
    ) -> Result<CustomPointId, EditError> {
        let stamp = self.stamps.next(now_ms);
        self.execute(&Command::AddCustomPoint {
            x: px,
            y: py,
            stamp,
        })?;
        Ok(CustomPointId(stamp))
    }

    // ─── Wiring ──────────────────────────────────────────────────────────

    /// A pin or custom point was clicked. A wire the document refuses
    /// (missing component, pin out of range) reports `Cancelled`.
    pub fn click_endpoint(&mut self, endpoint: Endpoint) -> WireOutcome {
        let outcome = self.wiring.select(endpoint);
        if let WireOutcome::Completed(conn) = outcome {
            let created = self.execute(&Command::CreateConnection {
                from: conn.from,
                to: conn.to,
            });
            if created.is_err() {
                return WireOutcome::Cancelled;
            }
        }
        outcome
    }

    pub fn cancel_wire(&mut self) {
        self.wiring.cancel();
    }

    /// A click somewhere on the board. Ctrl/⌘ on empty board adds a
    /// custom connection point.
    pub fn click_board(&mut self, px: f64, py: f64, modifiers: Modifiers, now_ms: u64) -> ClickOutcome {
        match hit_test(&self.document, px, py) {
            HitTarget::Endpoint(endpoint) => ClickOutcome::Wire(self.click_endpoint(endpoint)),
            HitTarget::Component(id) => match self.select(id) {
                Ok(()) => ClickOutcome::Selected(id),
                Err(e) => {
                    log::warn!("cannot open properties of {id}: {e}");
                    ClickOutcome::Nothing
                }
            },
            HitTarget::Board if modifiers.command() => self
                .add_custom_point(px, py, now_ms)
                .map_or(ClickOutcome::Nothing, ClickOutcome::PointAdded),
            HitTarget::Board => ClickOutcome::Nothing,
        }
    }

    // ─── Property panel ──────────────────────────────────────────────────

    /// Select a component and open its property panel. A panel already
    /// open for another component is closed (and flushed) first.
    pub fn select(&mut self, id: ComponentId) -> Result<(), FormError> {
        let editor = PropertyEditor::open(&self.document, &self.catalog, id)?;
        self.close_panel();
        self.selected = Some(id);
        self.editor = Some(editor);
        Ok(())
    }

    /// Change event on a property field.
    pub fn property_input(&mut self, name: &str, text: &str) -> Result<(), FormError> {
        let Some(editor) = self.editor.as_mut() else {
            log::debug!("property input `{name}` with no panel open");
            return Ok(());
        };
        if let Some(command) = editor.input(&self.catalog, name, text)? {
            let _ = self.execute(&command);
        }
        Ok(())
    }

    /// Blur event on a property field.
    pub fn property_blur(&mut self, name: &str) {
        if let Some(command) = self.editor.as_mut().and_then(|e| e.blur(name)) {
            let _ = self.execute(&command);
        }
    }

    /// Close the property panel, committing pending numeric input, and
    /// clear the selection.
    pub fn close_panel(&mut self) {
        if let Some(command) = self.editor.take().and_then(PropertyEditor::close) {
            let _ = self.execute(&command);
        }
        self.selected = None;
    }

    /// The property form as currently displayed, if the panel is open.
    pub fn form(&self) -> Option<FormView> {
        let editor = self.editor.as_ref()?;
        match editor.view(&self.document, &self.catalog) {
            Ok(view) => Some(view),
            Err(e) => {
                log::warn!("property panel is stale: {e}");
                None
            }
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Resolve and run a keyboard shortcut. `Save` is returned untouched
    /// for the caller.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, modifiers)?;
        match action {
            ShortcutAction::Rotate => match self.selected {
                Some(id) => {
                    let _ = self.rotate(id);
                }
                None => log::debug!("rotate with nothing selected"),
            },
            ShortcutAction::Cancel => {
                self.cancel_wire();
                self.close_panel();
            }
            ShortcutAction::Save => {}
        }
        Some(action)
    }

    /// Dispatch a normalized input event.
    pub fn handle_event(&mut self, event: &InputEvent, now_ms: u64) -> EventOutcome {
        match event {
            InputEvent::DropNew { kind, x, y } => self
                .drop_new(*kind, *x, *y, now_ms)
                .map_or(EventOutcome::Ignored, EventOutcome::Placed),
            InputEvent::DropExisting { id, x, y } => self
                .drop_existing(*id, *x, *y)
                .map_or(EventOutcome::Ignored, |()| EventOutcome::Moved(*id)),
            InputEvent::Click { x, y, modifiers } => {
                EventOutcome::Click(self.click_board(*x, *y, *modifiers, now_ms))
            }
            InputEvent::Key { key, modifiers } => self
                .handle_key(key, *modifiers)
                .map_or(EventOutcome::Ignored, EventOutcome::Shortcut),
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        persist::save(storage, &self.config.storage_key, &self.document)
    }

    /// Replace the document with the one in storage. On error the current
    /// document is kept.
    pub fn load(&mut self, storage: &dyn Storage) -> Result<(), LoadError> {
        let doc = persist::load(storage, &self.config.storage_key)?;
        self.replace_document(doc);
        Ok(())
    }

    /// Replace the document with uploaded file text. On error the current
    /// document is kept.
    pub fn upload(&mut self, text: &str) -> Result<(), LoadError> {
        let doc = persist::parse(text)?;
        log::info!("uploaded circuit ({} components)", doc.components.len());
        self.replace_document(doc);
        Ok(())
    }

    /// Document text for the download file.
    pub fn download_text(&self) -> Result<String, StorageError> {
        persist::to_json(&self.document)
    }

    /// Swap in a whole new document and reset transient state.
    pub fn replace_document(&mut self, doc: Document) {
        self.wiring.cancel();
        self.editor = None;
        self.selected = None;
        self.stamps.observe(doc.max_stamp());
        self.document = doc;
    }

    // ─── Views ───────────────────────────────────────────────────────────

    pub fn wires(&self) -> Vec<WireSegment> {
        resolve_wires(&self.document)
    }

    pub fn render_svg(&self) -> String {
        render_board_svg(&self.document, &self.catalog, &self.wiring, self.selected)
    }

    pub fn simulate_request(&self) -> SimulateRequest {
        SimulateRequest::from_document(&self.document, &self.catalog)
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_document(&self.document, &self.catalog)
    }

    pub fn nets(&self) -> Vec<Net> {
        extract_nets(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_core::model::{PropertyValue, Rotation};
    use bb_core::persist::MemoryStorage;
    use pretty_assertions::assert_eq;

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn drop_new_uses_cell_under_pointer() {
        let mut s = Session::default();
        let id = s.drop_new(ComponentKind::Resistor, 47.0, 63.0, NOW).unwrap();
        assert_eq!(id.as_str(), "resistor-1700000000000");
        assert_eq!(s.document().component(id).unwrap().position, Cell::new(2, 3));
    }

    #[test]
    fn same_millisecond_drops_get_distinct_ids() {
        let mut s = Session::default();
        let a = s.drop_new(ComponentKind::Led, 0.0, 0.0, NOW).unwrap();
        let b = s.drop_new(ComponentKind::Led, 100.0, 0.0, NOW).unwrap();
        assert_ne!(a, b);
        assert_eq!(s.document().components.len(), 2);
    }

    #[test]
    fn drop_existing_missing_id_changes_nothing() {
        let mut s = Session::default();
        s.drop_new(ComponentKind::Diode, 0.0, 0.0, NOW).unwrap();
        let before = s.document().clone();
        assert!(s.drop_existing(ComponentId::intern("diode-1"), 90.0, 90.0).is_err());
        assert_eq!(s.document(), &before);
    }

    #[test]
    fn wiring_two_components() {
        let mut s = Session::default();
        let a = s.drop_new(ComponentKind::Battery, 0.0, 0.0, NOW).unwrap();
        let b = s.drop_new(ComponentKind::Led, 200.0, 0.0, NOW).unwrap();

        assert_eq!(
            s.click_endpoint(Endpoint::pin(a, 1)),
            WireOutcome::Started(Endpoint::pin(a, 1))
        );
        assert!(matches!(
            s.click_endpoint(Endpoint::pin(b, 0)),
            WireOutcome::Completed(_)
        ));
        assert_eq!(s.document().connections.len(), 1);
        assert_eq!(s.wires().len(), 1);
    }

    #[test]
    fn refused_wire_reports_cancelled() {
        let mut s = Session::default();
        let a = s.drop_new(ComponentKind::Battery, 0.0, 0.0, NOW).unwrap();

        s.click_endpoint(Endpoint::pin(a, 1));
        let ghost = Endpoint::pin(ComponentId::intern("led-404"), 0);
        assert_eq!(s.click_endpoint(ghost), WireOutcome::Cancelled);

        s.click_endpoint(Endpoint::pin(a, 0));
        let out_of_range = s.drop_new(ComponentKind::Led, 200.0, 0.0, NOW).unwrap();
        assert_eq!(
            s.click_endpoint(Endpoint::pin(out_of_range, 7)),
            WireOutcome::Cancelled
        );

        assert!(s.document().connections.is_empty());
        assert_eq!(s.wiring().pending(), None);
    }

    #[test]
    fn download_after_huge_numeric_input_uploads_again() {
        let mut s = Session::default();
        let id = s.drop_new(ComponentKind::Resistor, 0.0, 0.0, NOW).unwrap();
        s.select(id).unwrap();
        s.property_input("resistance", &"9".repeat(400)).unwrap();
        s.property_blur("resistance");

        let text = s.download_text().unwrap();
        assert!(s.upload(&text).is_ok());
        assert_eq!(
            s.document().component(id).unwrap().properties["resistance"],
            PropertyValue::Number(0.0)
        );
    }

    #[test]
    fn ctrl_click_on_board_adds_point() {
        let mut s = Session::default();
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert_eq!(s.click_board(300.0, 300.0, Modifiers::NONE, NOW), ClickOutcome::Nothing);
        let outcome = s.click_board(307.0, 311.0, ctrl, NOW);
        assert_eq!(outcome, ClickOutcome::PointAdded(CustomPointId(NOW)));
        let p = &s.document().custom_connection_points[0];
        assert_eq!((p.x, p.y), (300, 300));
    }

    #[test]
    fn clicking_body_selects_and_r_rotates() {
        let mut s = Session::default();
        let id = s.drop_new(ComponentKind::Capacitor, 0.0, 0.0, NOW).unwrap();
        assert_eq!(
            s.click_board(33.0, 10.0, Modifiers::NONE, NOW),
            ClickOutcome::Selected(id)
        );
        assert_eq!(s.handle_key("r", Modifiers::NONE), Some(ShortcutAction::Rotate));
        assert_eq!(s.document().component(id).unwrap().rotation, Rotation::Deg90);
        assert_eq!(s.form().unwrap().title, "Capacitor Properties");
    }

    #[test]
    fn escape_flushes_panel_and_cancels_wire() {
        let mut s = Session::default();
        let id = s.drop_new(ComponentKind::Resistor, 0.0, 0.0, NOW).unwrap();
        s.select(id).unwrap();
        s.property_input("resistance", "4.7").unwrap();
        s.click_endpoint(Endpoint::pin(id, 0));

        s.handle_key("Escape", Modifiers::NONE);
        assert_eq!(s.selected(), None);
        assert!(s.form().is_none());
        assert_eq!(s.wiring().pending(), None);
        assert_eq!(
            s.document().component(id).unwrap().properties["resistance"],
            PropertyValue::Number(4.7)
        );
    }

    #[test]
    fn save_then_load_resets_transient_state() {
        let mut s = Session::default();
        let a = s.drop_new(ComponentKind::Battery, 0.0, 0.0, NOW).unwrap();
        let mut storage = MemoryStorage::new();
        s.save(&mut storage).unwrap();

        s.drop_new(ComponentKind::Led, 200.0, 0.0, NOW).unwrap();
        s.select(a).unwrap();
        s.click_endpoint(Endpoint::pin(a, 0));
        s.load(&storage).unwrap();

        assert_eq!(s.document().components.len(), 1);
        assert_eq!(s.selected(), None);
        assert_eq!(s.wiring().pending(), None);
        // New ids stay above the loaded ones even if the clock went back.
        let next = s.drop_new(ComponentKind::Ic, 0.0, 0.0, 5).unwrap();
        assert_eq!(next.stamp(), Some(NOW + 2));
    }

    #[test]
    fn bad_upload_keeps_document() {
        let mut s = Session::default();
        s.drop_new(ComponentKind::Inductor, 0.0, 0.0, NOW).unwrap();
        let before = s.document().clone();
        let err = s
            .upload(r#"{"components": {}, "connections": [], "customConnectionPoints": []}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Corrupted("components")));
        assert_eq!(s.document(), &before);
    }

    #[test]
    fn load_from_empty_storage_is_not_found() {
        let mut s = Session::default();
        assert!(matches!(
            s.load(&MemoryStorage::new()),
            Err(LoadError::NotFound)
        ));
    }

    #[test]
    fn events_dispatch() {
        let mut s = Session::default();
        let placed = s.handle_event(
            &InputEvent::DropNew {
                kind: ComponentKind::PowerSupply,
                x: 10.0,
                y: 10.0,
            },
            NOW,
        );
        let EventOutcome::Placed(id) = placed else {
            panic!("expected placement, got {placed:?}");
        };
        assert_eq!(
            s.handle_event(&InputEvent::DropExisting { id, x: 250.0, y: 130.0 }, NOW),
            EventOutcome::Moved(id)
        );
        assert_eq!(s.document().component(id).unwrap().position, Cell::new(12, 6));

        let save = InputEvent::key(
            "s",
            Modifiers {
                meta: true,
                ..Modifiers::NONE
            },
        );
        assert_eq!(
            s.handle_event(&save, NOW),
            EventOutcome::Shortcut(ShortcutAction::Save)
        );
    }
}
