//! WASM bridge for the breadboard editor: exposes the Rust editing session
//! to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. Structured values cross
//! the boundary as JSON strings; fallible calls return an error message,
//! or an empty string on success.

mod download;
mod simulate;
mod storage;

use bb_core::id::{ComponentId, CustomPointId};
use bb_core::model::{ComponentKind, Endpoint};
use bb_core::persist::DOWNLOAD_FILE_NAME;
use bb_editor::input::Modifiers;
use bb_editor::session::{ClickOutcome, Session};
use bb_editor::shortcuts::ShortcutAction;
use bb_editor::wiring::WireOutcome;
use serde::Serialize;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

pub use storage::LocalStorage;

/// The main WASM-facing board controller.
///
/// Holds the editing session. All interaction from the page goes
/// through this struct.
#[wasm_bindgen]
pub struct BreadboardApp {
    session: Session,
}

impl Default for BreadboardApp {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl BreadboardApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            session: Session::default(),
        }
    }

    // ─── Palette & placement ─────────────────────────────────────────────

    /// The component palette: `[{kind, label, properties}]`.
    pub fn palette_json(&self) -> String {
        let kinds: Vec<_> = self.session.catalog().kinds().collect();
        to_json(&kinds, "[]")
    }

    /// Drop a palette item at board pixel `(x, y)`. Returns the new id, or
    /// an empty string if nothing was placed.
    pub fn drop_new(&mut self, kind: &str, x: f64, y: f64) -> String {
        let kind: ComponentKind = match kind.parse() {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("{e}");
                return String::new();
            }
        };
        self.session
            .drop_new(kind, x, y, now_ms())
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// Drop an existing component at board pixel `(x, y)`.
    pub fn drop_existing(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.session
            .drop_existing(ComponentId::intern(id), x, y)
            .is_ok()
    }

    pub fn rotate(&mut self, id: &str) -> bool {
        self.session.rotate(ComponentId::intern(id)).is_ok()
    }

    // ─── Clicks ──────────────────────────────────────────────────────────

    /// Click on the board at `(x, y)`. Returns what happened:
    /// `started`, `cancelled`, `connected`, `selected`, `point` or `none`.
    pub fn click(&mut self, x: f64, y: f64, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        };
        click_label(self.session.click_board(x, y, modifiers, now_ms())).to_string()
    }

    pub fn click_pin(&mut self, component_id: &str, index: usize) -> String {
        let endpoint = Endpoint::pin(ComponentId::intern(component_id), index);
        wire_label(self.session.click_endpoint(endpoint)).to_string()
    }

    pub fn click_custom_point(&mut self, id: f64) -> String {
        let endpoint = Endpoint::custom(CustomPointId(id as u64));
        wire_label(self.session.click_endpoint(endpoint)).to_string()
    }

    /// Ctrl/⌘-click on empty board. Returns the new point id, or -1.
    pub fn add_custom_point(&mut self, x: f64, y: f64) -> f64 {
        self.session
            .add_custom_point(x, y, now_ms())
            .map_or(-1.0, |id| id.0 as f64)
    }

    // ─── Property panel ──────────────────────────────────────────────────

    pub fn select(&mut self, id: &str) -> String {
        status(self.session.select(ComponentId::intern(id)))
    }

    pub fn selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// The open property form as JSON, or `null`.
    pub fn property_form_json(&self) -> String {
        to_json(&self.session.form(), "null")
    }

    /// Change event on a property field. Returns an error message when
    /// the input was refused.
    pub fn property_input(&mut self, name: &str, value: &str) -> String {
        status(self.session.property_input(name, value))
    }

    pub fn property_blur(&mut self, name: &str) {
        self.session.property_blur(name);
    }

    pub fn close_panel(&mut self) {
        self.session.close_panel();
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a key press. Returns true if a shortcut fired.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        };
        match self.session.handle_key(key, modifiers) {
            Some(ShortcutAction::Save) => {
                let err = self.save();
                if !err.is_empty() {
                    log::warn!("{err}");
                }
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    // ─── Views ───────────────────────────────────────────────────────────

    pub fn render_svg(&self) -> String {
        self.session.render_svg()
    }

    pub fn document_json(&self) -> String {
        to_json(self.session.document(), "{}")
    }

    /// Resolved wires: `[{index, from: {x, y}, to: {x, y}}]`.
    pub fn wires_json(&self) -> String {
        let wires: Vec<WireView> = self
            .session
            .wires()
            .into_iter()
            .map(|w| WireView {
                index: w.index,
                from: [w.from.x, w.from.y],
                to: [w.to.x, w.to.y],
            })
            .collect();
        to_json(&wires, "[]")
    }

    pub fn lint_json(&self) -> String {
        to_json(&self.session.lint(), "[]")
    }

    pub fn nets_json(&self) -> String {
        to_json(&self.session.nets(), "[]")
    }

    pub fn pending_endpoint_json(&self) -> String {
        to_json(&self.session.wiring().pending(), "null")
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Save to local storage.
    pub fn save(&self) -> String {
        match LocalStorage::open() {
            Ok(mut storage) => status(self.session.save(&mut storage)),
            Err(e) => e.to_string(),
        }
    }

    /// Load from local storage. The board is unchanged on error.
    pub fn load(&mut self) -> String {
        match LocalStorage::open() {
            Ok(storage) => status(self.session.load(&storage)),
            Err(e) => e.to_string(),
        }
    }

    /// Download the circuit as `circuit.json`.
    pub fn download(&self) -> String {
        match self.session.download_text() {
            Ok(text) => status(download::download_text(&text, DOWNLOAD_FILE_NAME)),
            Err(e) => e.to_string(),
        }
    }

    /// Replace the board with uploaded file text. The board is unchanged
    /// on error.
    pub fn upload(&mut self, text: &str) -> String {
        status(self.session.upload(text))
    }

    // ─── Simulation ──────────────────────────────────────────────────────

    /// Post the circuit to `<base_url>/api/simulate`. Resolves with the
    /// response text; rejects with an error message.
    pub fn simulate(&self, base_url: &str) -> js_sys::Promise {
        let body = self.session.simulate_request().to_json();
        let base_url = base_url.to_string();
        wasm_bindgen_futures::future_to_promise(async move {
            let body = body.map_err(|e| JsValue::from_str(&e.to_string()))?;
            simulate::post_simulate(base_url, body)
                .await
                .map(|text| JsValue::from_str(&text))
                .map_err(|e| JsValue::from_str(&e))
        })
    }
}

#[derive(Serialize)]
struct WireView {
    index: usize,
    from: [i32; 2],
    to: [i32; 2],
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

fn status<E: Display>(result: Result<(), E>) -> String {
    match result {
        Ok(()) => String::new(),
        Err(e) => e.to_string(),
    }
}

fn wire_label(outcome: WireOutcome) -> &'static str {
    match outcome {
        WireOutcome::Started(_) => "started",
        WireOutcome::Cancelled => "cancelled",
        WireOutcome::Completed(_) => "connected",
    }
}

fn click_label(outcome: ClickOutcome) -> &'static str {
    match outcome {
        ClickOutcome::Wire(w) => wire_label(w),
        ClickOutcome::Selected(_) => "selected",
        ClickOutcome::PointAdded(_) => "point",
        ClickOutcome::Nothing => "none",
    }
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Breadboard WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
