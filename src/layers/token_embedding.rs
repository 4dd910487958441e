use candle_core::{Module, Tensor};
use candle_nn::{embedding, Embedding, VarBuilder};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use crate::architectures::{BuildEmbeddings, Embeddings};
use crate::error::BoxedError;

/// Token embedding configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TokenEmbeddingConfig {
    embedding_width: usize,
    n_pieces: usize,
}

impl TokenEmbeddingConfig {
    /// Width of the embedding vectors.
    ///
    /// Default: `768`
    pub fn embedding_width(mut self, embedding_width: usize) -> Self {
        self.embedding_width = embedding_width;
        self
    }

    /// Number of pieces in the embedding table.
    ///
    /// Default: `32000`
    pub fn n_pieces(mut self, n_pieces: usize) -> Self {
        self.n_pieces = n_pieces;
        self
    }
}

impl Default for TokenEmbeddingConfig {
    fn default() -> Self {
        Self {
            embedding_width: 768,
            n_pieces: 32000,
        }
    }
}

impl BuildEmbeddings for TokenEmbeddingConfig {
    fn build(&self, vb: VarBuilder) -> Result<Box<dyn Embeddings>, BoxedError> {
        let inner = embedding(
            self.n_pieces,
            self.embedding_width,
            vb.push_prefix("piece_embeddings"),
        )
        .context(ConstructionSnafu)?;

        Ok(Box::new(TokenEmbedding { inner }))
    }
}

/// Token embedding errors.
#[derive(Debug, Snafu)]
pub enum TokenEmbeddingError {
    #[snafu(display("Cannot construct token embedding layer"))]
    Construction { source: candle_core::Error },

    #[snafu(display("Cannot look up piece embeddings"))]
    Lookup { source: candle_core::Error },
}

/// Layer mapping piece identifiers to embedding vectors.
pub struct TokenEmbedding {
    inner: Embedding,
}

impl Embeddings for TokenEmbedding {
    fn forward(&self, piece_ids: &Tensor, _train: bool) -> Result<Tensor, BoxedError> {
        Ok(self.inner.forward(piece_ids).context(LookupSnafu)?)
    }
}
