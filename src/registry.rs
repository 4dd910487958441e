//! Name-keyed reconstruction of backbone configurations.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::{ensure, ResultExt, Snafu};

use crate::architectures::BuildBackbone;
use crate::models::EmbeddingBackboneConfig;

/// Serialization registry errors.
#[derive(Debug, Snafu)]
pub enum RegistryError {
    #[snafu(display("Cannot deserialize configuration of class: {class_name}"))]
    DeserializeConfig {
        source: serde_json::Error,
        class_name: String,
    },

    #[snafu(display("Class is already registered: {class_name}"))]
    DuplicateClass { class_name: String },

    #[snafu(display("Cannot serialize configuration of class: {class_name}"))]
    SerializeConfig {
        source: serde_json::Error,
        class_name: String,
    },

    #[snafu(display("Class is not registered: {class_name}"))]
    UnknownClass { class_name: String },
}

/// A backbone configuration persisted together with its class name.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBackbone {
    class_name: String,
    config: Value,
}

impl SavedBackbone {
    /// The class name the configuration was saved under.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The persisted configuration.
    pub fn config(&self) -> &Value {
        &self.config
    }
}

type ConfigDeserializer = Box<dyn Fn(Value) -> Result<Box<dyn BuildBackbone>, RegistryError> + Send + Sync>;

/// Registry mapping class names to backbone configuration deserializers.
///
/// The registry is constructed explicitly at startup and passed to the
/// code that persists or restores models. Registration has no global
/// side effects.
#[derive(Default)]
pub struct BackboneRegistry {
    deserializers: HashMap<String, ConfigDeserializer>,
}

impl BackboneRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the backbone families of this crate
    /// registered under their type names.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register::<EmbeddingBackboneConfig>("EmbeddingBackbone")?;
        Ok(registry)
    }

    /// Register a backbone configuration type under a class name.
    ///
    /// Registering the same class name twice is an error.
    pub fn register<C>(&mut self, class_name: impl Into<String>) -> Result<(), RegistryError>
    where
        C: BuildBackbone + DeserializeOwned + 'static,
    {
        let class_name = class_name.into();
        if self.deserializers.contains_key(&class_name) {
            return DuplicateClassSnafu { class_name }.fail();
        }

        let deserializer = {
            let class_name = class_name.clone();
            move |config: Value| {
                let config: C = serde_json::from_value(config).context(DeserializeConfigSnafu {
                    class_name: class_name.clone(),
                })?;
                Ok(Box::new(config) as Box<dyn BuildBackbone>)
            }
        };
        self.deserializers.insert(class_name, Box::new(deserializer));

        Ok(())
    }

    /// Serialize a configuration under a registered class name.
    ///
    /// Serialization requires prior registration, so the result is
    /// guaranteed to be restorable by the same registry.
    pub fn serialize<C>(&self, class_name: &str, config: &C) -> Result<SavedBackbone, RegistryError>
    where
        C: BuildBackbone + Serialize,
    {
        ensure!(
            self.deserializers.contains_key(class_name),
            UnknownClassSnafu { class_name }
        );

        let config = serde_json::to_value(config).context(SerializeConfigSnafu { class_name })?;

        Ok(SavedBackbone {
            class_name: class_name.to_string(),
            config,
        })
    }

    /// Restore a configuration from its persisted form.
    pub fn deserialize(&self, saved: &SavedBackbone) -> Result<Box<dyn BuildBackbone>, RegistryError> {
        let deserializer = self
            .deserializers
            .get(&saved.class_name)
            .ok_or_else(|| {
                UnknownClassSnafu {
                    class_name: &saved.class_name,
                }
                .build()
            })?;

        deserializer(saved.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use candle_core::{DType, Device};
    use candle_nn::VarBuilder;
    use snafu::{report, FromString, ResultExt, Whatever};

    use super::{BackboneRegistry, RegistryError, SavedBackbone};
    use crate::architectures::{Backbone, BackboneConfig, BuildBackbone};
    use crate::models::EmbeddingBackboneConfig;

    fn sample_config() -> EmbeddingBackboneConfig {
        EmbeddingBackboneConfig::default().backbone(BackboneConfig::new("backbone_a", true))
    }

    #[test]
    #[report]
    fn saved_backbone_round_trips() -> Result<(), Whatever> {
        let registry =
            BackboneRegistry::with_builtins().whatever_context("Cannot create registry")?;

        let saved = registry
            .serialize("EmbeddingBackbone", &sample_config())
            .whatever_context("Cannot serialize configuration")?;
        let restored = registry
            .deserialize(&saved)
            .whatever_context("Cannot deserialize configuration")?;

        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        let backbone = restored
            .build(vb)
            .map_err(|e| Whatever::with_source(e, "Cannot build backbone".to_string()))?;
        assert_eq!(backbone.config(), BackboneConfig::new("backbone_a", true));

        Ok(())
    }

    #[test]
    #[report]
    fn saved_backbone_uses_class_name_key() -> Result<(), Whatever> {
        let registry =
            BackboneRegistry::with_builtins().whatever_context("Cannot create registry")?;
        let saved = registry
            .serialize("EmbeddingBackbone", &sample_config())
            .whatever_context("Cannot serialize configuration")?;

        let value = serde_json::to_value(&saved).whatever_context("Cannot convert to JSON")?;
        let fields = value.as_object().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["className"], "EmbeddingBackbone");
        assert_eq!(fields["config"], *saved.config());

        let reparsed: SavedBackbone =
            serde_json::from_value(value).whatever_context("Cannot parse saved backbone")?;
        assert_eq!(reparsed.class_name(), "EmbeddingBackbone");

        Ok(())
    }

    #[test]
    fn duplicate_registration_fails_by_kind() {
        let mut registry = BackboneRegistry::new();
        registry
            .register::<EmbeddingBackboneConfig>("EmbeddingBackbone")
            .unwrap();
        assert!(matches!(
            registry.register::<EmbeddingBackboneConfig>("EmbeddingBackbone"),
            Err(RegistryError::DuplicateClass { .. })
        ));
    }

    #[test]
    fn unknown_class_fails_by_kind() {
        let registry = BackboneRegistry::new();
        assert!(matches!(
            registry.serialize("EmbeddingBackbone", &sample_config()),
            Err(RegistryError::UnknownClass { .. })
        ));
    }

    #[test]
    #[report]
    fn malformed_config_fails_by_kind() -> Result<(), Whatever> {
        let registry =
            BackboneRegistry::with_builtins().whatever_context("Cannot create registry")?;
        let saved: SavedBackbone = serde_json::from_str(
            r#"{"className": "EmbeddingBackbone", "config": {"name": "backbone_a"}}"#,
        )
        .whatever_context("Cannot parse saved backbone")?;

        assert!(matches!(
            registry.deserialize(&saved),
            Err(RegistryError::DeserializeConfig { .. })
        ));

        Ok(())
    }
}
