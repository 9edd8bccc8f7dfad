//! SQLite storage implementation for FX deals.

mod model;
mod repository;

pub use model::FxDealDB;
pub use repository::DealRepository;
