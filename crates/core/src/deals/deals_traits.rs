use super::deals_model::{DealRecord, FxDeal, ImportReport};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for deal storage.
///
/// Implementations must enforce a unique key on the deal id and report a
/// conflicting insert as `DatabaseError::UniqueViolation`.
#[async_trait]
pub trait DealRepositoryTrait: Send + Sync {
    fn exists_by_id(&self, deal_id: &str) -> Result<bool>;
    async fn insert_deal(&self, deal: FxDeal) -> Result<FxDeal>;
    fn get_deal(&self, deal_id: &str) -> Result<Option<FxDeal>>;
    fn count_deals(&self) -> Result<i64>;
}

/// Trait defining the contract for deal service operations.
#[async_trait]
pub trait DealServiceTrait: Send + Sync {
    /// Imports `records` in order. Per-record failures are reported, never returned as errors.
    async fn import_deals(&self, records: Vec<DealRecord>) -> ImportReport;
    fn get_deal(&self, deal_id: &str) -> Result<Option<FxDeal>>;
    fn count_deals(&self) -> Result<i64>;
}
