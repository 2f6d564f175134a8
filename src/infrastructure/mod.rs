//! Infrastructure layer - HTTP, storage, time and vendor adapters

pub mod clock;
pub mod http;
pub mod pacing;
pub mod sources;
pub mod storage;

#[cfg(test)]
pub mod testing;

pub use clock::{Clock, SystemClock};
pub use http::{HttpClient, ReqwestHttpClient};
pub use pacing::Pacer;
pub use sources::{create_source, BatchContext, PriceSource};
pub use storage::{JsonFileCacheStore, MemoryCacheStore};
