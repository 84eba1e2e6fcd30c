//! Core domain types
//!
//! These types are shared between the platform client (which produces
//! position reports), the monitor (which assesses them) and the notifiers
//! (which render them).

pub mod assessment;
pub mod notification;
pub mod pipeline;
