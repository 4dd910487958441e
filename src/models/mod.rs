mod embedding;
pub use embedding::{EmbeddingBackbone, EmbeddingBackboneConfig};
