pub mod token_embedding;
