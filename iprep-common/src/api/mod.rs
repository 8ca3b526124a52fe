//! API module for functionality shared with HTTP front ends
//!
//! Pure types and functions only; the HTTP framework wiring lives in
//! `iprep-server`.

pub mod auth;

pub use auth::{EditKeyGate, EditKeyRequest, EditKeyResponse};
