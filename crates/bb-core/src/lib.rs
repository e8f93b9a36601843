pub mod catalog;
pub mod grid;
pub mod id;
pub mod lint;
pub mod model;
pub mod netlist;
pub mod persist;
pub mod simulate;
pub mod wire;

pub use catalog::{Catalog, InputKind, KindSpec, PropertySpec};
pub use grid::{Cell, Point, Rect};
pub use id::{ComponentId, CustomPointId, StampSource};
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use netlist::{Net, extract_nets};
pub use persist::{LoadError, MemoryStorage, Storage, StorageError};
pub use simulate::SimulateRequest;
pub use wire::{WireSegment, resolve_wires};
