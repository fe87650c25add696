//! uidex-common: Shared types, errors, and helpers used across all uidex crates.

pub mod error;
pub mod sandbox;
pub mod text;

// Re-export commonly used types
pub use error::{Result, UidexError};
pub use sandbox::{DocumentFetcher, FetchSettings, SandboxClient, BROWSER_USER_AGENT};
