pub mod config;
pub mod error;
pub mod scene;
pub mod session;

// Re-export common error type
pub use error::{LingoError, Result};
