//! SQLite persistence layer.

pub mod campaign;
pub mod pool;

pub use campaign::SqliteCampaignRepository;
pub use pool::DatabasePool;
