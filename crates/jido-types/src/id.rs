//! Identifier types for agents and signals.
//!
//! Agent identifiers are UUID-based; signal identifiers embed the
//! owning agent and a nanosecond timestamp so they sort by creation
//! time within an agent.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// Namespace UUID for deterministic UUID v5 generation.
///
/// Used to derive stable identifiers for named agents so that the
/// same name always maps to the same agent across processes.
pub const JIDO_NAMESPACE: Uuid = uuid!("7a1c5b88-30fd-4f92-9df1-6c41a0e6b3d4");

/// Identifier for an agent served by a runtime instance.
///
/// # UUID Strategy
///
/// - [`AgentId::new`] generates a random UUID v4 for anonymous agents.
/// - [`AgentId::named`] derives a deterministic UUID v5 from
///   [`JIDO_NAMESPACE`] and the name, so named agents keep a stable
///   identity across restarts and machines.
///
/// # Example
///
/// ```
/// use jido_types::AgentId;
///
/// let a = AgentId::named("scheduler");
/// let b = AgentId::named("scheduler");
/// assert_eq!(a, b);
///
/// let c = AgentId::new();
/// let d = AgentId::new();
/// assert_ne!(c, d);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Creates a new [`AgentId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives a deterministic [`AgentId`] from a name.
    ///
    /// Same name always produces the same id.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self(Uuid::new_v5(&JIDO_NAMESPACE, name.as_bytes()))
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns the agent's source URI, `jido://agent/<id>`.
    ///
    /// Signals produced by this agent carry this URI in their
    /// `source` field.
    ///
    /// # Example
    ///
    /// ```
    /// use jido_types::AgentId;
    ///
    /// let id = AgentId::named("worker");
    /// assert!(id.uri().starts_with("jido://agent/"));
    /// ```
    #[must_use]
    pub fn uri(&self) -> String {
        format!("jido://agent/{}", self.0)
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a single signal.
///
/// Format: `<agentId>_<nanosecondTimestamp>`. Unique per signal and
/// monotonic per agent for practical purposes (two signals created in
/// the same nanosecond by the same producer would collide, which the
/// clock resolution makes vanishingly unlikely).
///
/// # Why Not a Plain UUID?
///
/// Embedding the producing agent and the creation instant makes ids
/// self-describing in logs and lets subscribers order events from one
/// agent without extra metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalId(pub String);

impl SignalId {
    /// Generates a fresh id for a signal produced by `agent`.
    #[must_use]
    pub fn generate(agent: &AgentId) -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self(format!("{}_{}", agent, nanos))
    }

    /// Wraps an externally supplied id verbatim.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_agent_is_deterministic() {
        assert_eq!(AgentId::named("a"), AgentId::named("a"));
        assert_ne!(AgentId::named("a"), AgentId::named("b"));
    }

    #[test]
    fn random_agents_differ() {
        assert_ne!(AgentId::new(), AgentId::new());
    }

    #[test]
    fn uri_format() {
        let id = AgentId::named("worker");
        assert_eq!(id.uri(), format!("jido://agent/{}", id));
    }

    #[test]
    fn signal_id_embeds_agent() {
        let agent = AgentId::named("worker");
        let sig = SignalId::generate(&agent);
        assert!(sig.as_str().starts_with(&agent.to_string()));
        assert!(sig.as_str().contains('_'));
    }

    #[test]
    fn signal_ids_are_unique() {
        let agent = AgentId::new();
        let a = SignalId::generate(&agent);
        // A spin to guarantee the clock ticked.
        std::thread::sleep(std::time::Duration::from_nanos(100));
        let b = SignalId::generate(&agent);
        assert_ne!(a, b);
    }

    #[test]
    fn signal_id_from_raw() {
        let sig = SignalId::from_raw("external-42");
        assert_eq!(sig.as_str(), "external-42");
    }
}
