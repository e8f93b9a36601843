//! Two-click wiring.
//!
//! The first click on a pin or custom point remembers it as the pending
//! endpoint. The second click either completes a wire or, when it lands
//! on the same anchor (any pin of the same component, or the same custom
//! point), cancels the gesture.

use bb_core::id::{ComponentId, CustomPointId};
use bb_core::model::{Connection, Endpoint};

/// Wiring state. At most one endpoint is pending at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WiringState {
    #[default]
    Idle,
    Pending(Endpoint),
}

/// Result of selecting an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireOutcome {
    /// The endpoint is now pending.
    Started(Endpoint),
    /// Same anchor as the pending endpoint; nothing was wired.
    Cancelled,
    /// A wire should be added from the pending endpoint to this one.
    Completed(Connection),
}

#[derive(Debug, Clone, Default)]
pub struct WireTool {
    state: WiringState,
}

impl WireTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WiringState {
        self.state
    }

    pub fn pending(&self) -> Option<Endpoint> {
        match self.state {
            WiringState::Idle => None,
            WiringState::Pending(e) => Some(e),
        }
    }

    /// Feed a clicked endpoint into the state machine.
    pub fn select(&mut self, endpoint: Endpoint) -> WireOutcome {
        match self.state {
            WiringState::Idle => {
                self.state = WiringState::Pending(endpoint);
                WireOutcome::Started(endpoint)
            }
            WiringState::Pending(start) => {
                self.state = WiringState::Idle;
                if start.same_anchor(&endpoint) {
                    WireOutcome::Cancelled
                } else {
                    WireOutcome::Completed(Connection {
                        from: start,
                        to: endpoint,
                    })
                }
            }
        }
    }

    /// Drop any pending endpoint.
    pub fn cancel(&mut self) {
        self.state = WiringState::Idle;
    }

    /// Whether pin `index` of `component` is the pending endpoint.
    pub fn is_pin_active(&self, component: ComponentId, index: usize) -> bool {
        self.pending() == Some(Endpoint::pin(component, index))
    }

    /// Whether custom point `id` is the pending endpoint.
    pub fn is_custom_active(&self, id: CustomPointId) -> bool {
        self.pending() == Some(Endpoint::custom(id))
    }
}
