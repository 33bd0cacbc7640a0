//! Backend API access
//!
//! The backend computes every milestone state; this client only reads the
//! child snapshot and posts evidence and review overrides.

mod client;

pub use client::{ApiContext, BackendClient};
