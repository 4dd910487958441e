use candle_nn::VarBuilder;
use serde::{Deserialize, Serialize};

use crate::architectures::{
    Backbone, BackboneConfig, BackboneError, BuildBackbone, BuildEmbeddings, Embeddings,
};
use crate::error::BoxedError;
use crate::layers::token_embedding::TokenEmbeddingConfig;

/// Embedding backbone configuration.
///
/// Serializes as the union of the family-base fields and the token
/// embedding fields.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EmbeddingBackboneConfig {
    #[serde(flatten)]
    backbone: BackboneConfig,
    #[serde(flatten)]
    token_embedding: TokenEmbeddingConfig,
}

impl EmbeddingBackboneConfig {
    /// Family-base configuration.
    ///
    /// Default: `BackboneConfig::default()`
    pub fn backbone(mut self, backbone: BackboneConfig) -> Self {
        self.backbone = backbone;
        self
    }

    /// Token embedding layer configuration.
    ///
    /// Default: `TokenEmbeddingConfig::default()`
    pub fn token_embedding(mut self, token_embedding: TokenEmbeddingConfig) -> Self {
        self.token_embedding = token_embedding;
        self
    }
}

impl Default for EmbeddingBackboneConfig {
    fn default() -> Self {
        Self {
            backbone: BackboneConfig::default(),
            token_embedding: TokenEmbeddingConfig::default(),
        }
    }
}

impl BuildBackbone for EmbeddingBackboneConfig {
    fn build(&self, vb: VarBuilder) -> Result<Box<dyn Backbone>, BoxedError> {
        let embeddings = self.token_embedding.build(vb.push_prefix("embeddings"))?;

        Ok(Box::new(EmbeddingBackbone {
            config: self.backbone.clone(),
            embeddings,
        }))
    }
}

/// Family member whose only component is its token embedding table.
pub struct EmbeddingBackbone {
    config: BackboneConfig,
    embeddings: Box<dyn Embeddings>,
}

impl Backbone for EmbeddingBackbone {
    fn name(&self) -> &str {
        self.config.name()
    }

    fn trainable(&self) -> bool {
        self.config.trainable()
    }

    fn token_embedding(&self) -> Result<&dyn Embeddings, BackboneError> {
        Ok(self.embeddings.as_ref())
    }
}
