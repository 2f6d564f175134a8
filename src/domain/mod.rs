//! Domain layer - core business logic and entities

pub mod item;
pub mod price;
pub mod discount;
pub mod event;
pub mod cache;
