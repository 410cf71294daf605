pub mod controller;
pub mod feed_cache;
pub mod model;
pub mod router;
pub mod service;

pub use feed_cache::{FeedCache, FeedEntry};
pub use model::*;
pub use router::init_legal_updates_router;
pub use service::LegalUpdateService;
