pub mod bid_repository;
pub mod connection;
pub mod error;
pub mod job_repository;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{BidStore, JobStore, Store};
