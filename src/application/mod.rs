//! Application layer - use cases and services

pub mod discount_monitor;
pub mod price_fetcher;

pub use discount_monitor::DiscountMonitor;
pub use price_fetcher::PriceFetcher;
