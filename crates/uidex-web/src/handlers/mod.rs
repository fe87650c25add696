//! HTTP handlers for all web routes.

pub mod admin;
pub mod search;
pub mod submit;
pub mod system;
