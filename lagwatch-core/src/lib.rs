//! Lagwatch Core
//!
//! Core types and pure logic shared by the lagwatch binaries.
//!
//! This crate contains:
//! - Domain types: pipelines, position reports, lag assessments, deliveries
//! - DTOs: wire shapes of the platform API and the chat webhook
//! - Timestamp normalization and lag classification
//! - Schema diffing and record transforms used by the operations CLI

pub mod domain;
pub mod dto;
pub mod error;
pub mod lag;
pub mod schema;
pub mod timestamp;
pub mod transform;

pub use error::{ErrorKind, MonitorError};
