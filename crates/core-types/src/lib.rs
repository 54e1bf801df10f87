pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{MetricFormat, MetricKind, Sentiment};
pub use structs::{AlignedRow, AlphaBetaPoint, Article, DatedValue, PricePoint, ReturnRow};
