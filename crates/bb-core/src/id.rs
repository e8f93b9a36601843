use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for component ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for a placed component
/// (e.g. `resistor-1718000000000`).
/// Internally a `Spur` index, so copies and comparisons are O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(Spur);

impl ComponentId {
    /// Intern a string as a ComponentId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ComponentId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Build the `<type>-<stamp>` id used for newly placed components.
    pub fn for_stamp(kind: &str, stamp: u64) -> Self {
        Self::intern(&format!("{kind}-{stamp}"))
    }

    /// The numeric stamp suffix, if the id follows the `<type>-<stamp>` shape.
    pub fn stamp(&self) -> Option<u64> {
        self.as_str()
            .rsplit_once('-')
            .and_then(|(_, tail)| tail.parse().ok())
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ComponentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComponentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ComponentId::intern(&s))
    }
}

/// Identifier of a free-standing custom connection point.
/// Serialized as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomPointId(pub u64);

impl fmt::Display for CustomPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic stamp generator for new ids.
///
/// Stamps track wall-clock milliseconds but never repeat: each stamp is
/// `max(now_ms, last + 1)`. Callers supply `now_ms` so the same source
/// works natively and under WASM (where `SystemTime` is unavailable).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StampSource {
    last: u64,
}

impl StampSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next stamp for a creation happening at `now_ms`.
    pub fn next(&mut self, now_ms: u64) -> u64 {
        let stamp = now_ms.max(self.last.saturating_add(1));
        self.last = stamp;
        stamp
    }

    /// Record an externally seen stamp so later stamps stay above it.
    pub fn observe(&mut self, stamp: u64) {
        self.last = self.last.max(stamp);
    }

    /// The most recent stamp handed out or observed.
    pub fn last(&self) -> u64 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ComponentId::intern("resistor-1");
        let b = ComponentId::intern("resistor-1");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "resistor-1");
    }

    #[test]
    fn stamp_suffix() {
        assert_eq!(ComponentId::for_stamp("led", 42).stamp(), Some(42));
        assert_eq!(
            ComponentId::for_stamp("power_supply", 1700).as_str(),
            "power_supply-1700"
        );
        assert_eq!(ComponentId::intern("hand-named").stamp(), None);
    }

    #[test]
    fn stamps_are_strictly_increasing_within_one_millisecond() {
        let mut src = StampSource::new();
        let a = src.next(1_000);
        let b = src.next(1_000);
        let c = src.next(999);
        assert_eq!(a, 1_000);
        assert_eq!(b, 1_001);
        assert_eq!(c, 1_002);
        assert_eq!(src.next(5_000), 5_000);
    }

    #[test]
    fn observed_stamps_raise_the_floor() {
        let mut src = StampSource::new();
        src.observe(10_000);
        assert_eq!(src.next(3), 10_001);
        src.observe(5);
        assert_eq!(src.last(), 10_001);
    }

    #[test]
    fn custom_point_id_serializes_as_number() {
        let json = serde_json::to_string(&CustomPointId(123)).unwrap();
        assert_eq!(json, "123");
    }
}
