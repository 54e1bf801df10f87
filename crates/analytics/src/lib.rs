//! # Stockboard Analytics Engine
//!
//! This crate turns two daily price histories (a target ticker and a benchmark) into
//! the four series the performance dashboard charts: relative performance, its rolling
//! z-score, rolling alpha and cumulative alpha.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no network, no environment, no clock. Callers hand in clean
//!   `PricePoint` slices (and "today" for the fallback) and get values back.
//! - **Stateless calculation:** every request recomputes from scratch; nothing is cached.
//! - **Explicit missing-value policy:** see [`summary::fill_policy`] for how each
//!   derived field treats undefined values.
//!
//! ## Pipeline
//!
//! ```text
//! aligner ──► returns ──► regression ──┐
//!    └──────► zscore ──────────────────┴──► summary (trim + format) ──► PerformanceCharts
//! fallback ─────────────────────────────────────────────────────────► PerformanceCharts
//! ```

pub mod aligner;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod regression;
pub mod report;
pub mod returns;
pub mod snapshot;
pub mod summary;
pub mod zscore;

mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use fallback::FallbackGenerator;
pub use regression::RollingRegression;
pub use report::{MetricSummary, PerformanceCharts};
pub use snapshot::MetricSnapshot;
