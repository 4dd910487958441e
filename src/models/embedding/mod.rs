mod backbone;
pub use backbone::{EmbeddingBackbone, EmbeddingBackboneConfig};
