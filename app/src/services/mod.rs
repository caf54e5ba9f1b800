//! Business logic services
//!
//! Services wrap the engine's state container with validation, logging
//! and persistence.

pub mod diet;
pub mod export;

pub use diet::{DietService, MetricsSummary};
pub use export::ExportService;
