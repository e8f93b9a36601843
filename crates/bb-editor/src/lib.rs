pub mod commands;
pub mod hit;
pub mod input;
pub mod properties;
pub mod session;
pub mod shortcuts;
pub mod svg;
pub mod wiring;

pub use commands::{Command, apply};
pub use input::{InputEvent, Modifiers};
pub use session::{ClickOutcome, EventOutcome, Session, SessionConfig};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use wiring::{WireOutcome, WireTool, WiringState};
