use std::error::Error;

/// Alias for boxed errors that can cross thread boundaries.
pub type BoxedError = Box<dyn Error + Send + Sync>;
