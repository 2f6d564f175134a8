//! Pricewatch - daily store discount checks rendered as timeline events
//! Built with Domain-Driven Design principles

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;
pub mod config;
pub mod app;

// Re-export main types for convenience
pub use application::DiscountMonitor;
pub use domain::event::TimelineEvent;
pub use domain::item::{ItemSpecParser, TrackedItem};
pub use infrastructure::{create_source, PriceSource};
pub use shared::types::{SourceKind, SourceSettings};
