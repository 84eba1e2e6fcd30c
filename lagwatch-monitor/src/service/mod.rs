//! Service layer
//!
//! Services hold the monitor's business logic: running a check cycle over
//! the configured pipelines and rendering its results. They depend on
//! repositories through traits so they can be tested in isolation.

mod lag_check;
pub mod report;

pub use lag_check::{LagCheckService, StandardLagCheckService};
