//! Repository layer
//!
//! Repositories are thin adapters over the platform client. They expose
//! focused, trait-based interfaces so the check service can be exercised
//! without a live platform.

mod positions;

pub use positions::{HttpPositionRepository, PositionRepository};

#[cfg(test)]
pub use positions::StaticPositionRepository;
