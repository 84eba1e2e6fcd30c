//! Data Transfer Objects
//!
//! Wire shapes of the platform REST API and of the chat webhook payload.

pub mod position;
pub mod webhook;
