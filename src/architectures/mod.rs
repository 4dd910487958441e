//! Traits for backbone model families.

use std::fmt::Debug;

use candle_nn::VarBuilder;

use crate::error::BoxedError;

mod backbone;
pub use backbone::{Backbone, BackboneConfig, BackboneError};

mod embeddings;
pub use embeddings::{BuildEmbeddings, Embeddings};

/// Trait for building backbones.
pub trait BuildBackbone: Debug {
    /// Build a backbone.
    ///
    /// Construction is delegated to the given variable builder, which
    /// wires up the model parameters. Failures of the delegated
    /// construction are passed through unmodified.
    fn build(&self, vb: VarBuilder) -> Result<Box<dyn Backbone>, BoxedError>;
}
