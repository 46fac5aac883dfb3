//! Command infrastructure for CQRS handlers.
//!
//! `CommandMetadata` is the context that flows through command processing.
//! Handlers record its correlation id on their tracing spans.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MemberId;

/// Metadata context for command handlers.
///
/// Carries the acting member and correlation context through the
/// command processing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The member executing this command.
    pub member_id: MemberId,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "api", "test").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for the acting member.
    pub fn new(member_id: MemberId) -> Self {
        Self {
            member_id,
            correlation_id: None,
            source: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture for the given member.
    pub fn test_fixture(member_id: &MemberId) -> Self {
        Self::new(member_id.clone())
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain_sets_fields() {
        let metadata = CommandMetadata::new(MemberId::new("m-1").unwrap())
            .with_correlation_id("corr-123")
            .with_source("api");

        assert_eq!(metadata.correlation_id(), "corr-123");
        assert_eq!(metadata.source(), Some("api"));
    }

    #[test]
    fn correlation_id_generates_if_missing() {
        let metadata = CommandMetadata::new(MemberId::new("m-1").unwrap());
        assert!(!metadata.correlation_id().is_empty());
        assert!(metadata.source().is_none());
    }
}
