pub mod error;
pub mod math;
pub mod operations;
pub mod scene;
pub mod topology;

pub use error::{KnotworkError, Result};
