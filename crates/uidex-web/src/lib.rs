//! uidex-web: HTTP surface and one-shot binaries for the uidex catalog.
//! Provides:
//!   - Ranked component search
//!   - Submission intake
//!   - Moderation endpoints (list, approve, reject)
//!   - On-demand harvest runs
//!   - Health and catalog stats

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
