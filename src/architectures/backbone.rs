use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::architectures::Embeddings;

/// Backbone contract errors.
#[derive(Debug, Snafu)]
pub enum BackboneError {
    /// A capability that a family member must provide was invoked on a
    /// member that does not implement it. This is a contract violation
    /// in the family member, not a recoverable runtime condition.
    #[snafu(display("Backbone '{name}' does not implement the {capability} capability"))]
    UnimplementedCapability {
        name: String,
        capability: &'static str,
    },
}

/// Configuration shared by all backbone family members.
///
/// Holds exactly the family-base fields. Family members with
/// architecture-specific configuration carry this struct alongside their
/// own fields rather than replacing it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BackboneConfig {
    name: String,
    trainable: bool,
}

impl BackboneConfig {
    /// Create a backbone configuration.
    ///
    /// * `name` - Model identifier, unique within a serialization context.
    /// * `trainable` - Whether the model parameters are updated during
    ///   optimization.
    pub fn new(name: impl Into<String>, trainable: bool) -> Self {
        Self {
            name: name.into(),
            trainable,
        }
    }

    /// Model identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the model parameters are updated during optimization.
    pub fn trainable(&self) -> bool {
        self.trainable
    }
}

impl Default for BackboneConfig {
    fn default() -> Self {
        Self {
            name: "backbone".to_string(),
            trainable: true,
        }
    }
}

/// Trait for backbone model family members.
///
/// A backbone is a model architecture sharing a common external contract
/// with the other members of its family while differing in internal
/// topology. The trait defines the minimal polymorphic surface every
/// member supports.
pub trait Backbone {
    /// Model identifier.
    fn name(&self) -> &str;

    /// Whether the model parameters are updated during optimization.
    fn trainable(&self) -> bool;

    /// Snapshot of the family-base configuration.
    ///
    /// The snapshot holds exactly the `name` and `trainable` fields and
    /// does not alias mutable model state. It is the floor of a member's
    /// configuration; architecture-specific fields live in the member's
    /// own configuration type.
    fn config(&self) -> BackboneConfig {
        BackboneConfig::new(self.name(), self.trainable())
    }

    /// The layer mapping piece identifiers to embedding vectors.
    ///
    /// Family members with a standard token embedding layer override
    /// this to return the same underlying layer on every call. The
    /// default fails with [`BackboneError::UnimplementedCapability`].
    fn token_embedding(&self) -> Result<&dyn Embeddings, BackboneError> {
        UnimplementedCapabilitySnafu {
            name: self.name(),
            capability: "token embedding",
        }
        .fail()
    }
}
