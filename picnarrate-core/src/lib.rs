pub mod config;
pub mod error;
pub mod media;
pub mod types;

// Keep the public surface small and intentional.
pub use config::*;
pub use error::*;
pub use media::*;
pub use types::*;
