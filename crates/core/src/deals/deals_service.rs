use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::deals::deals_errors::DealImportError;
use crate::deals::deals_model::*;
use crate::deals::deals_validation::validate_deal;
use crate::deals::{DealRepositoryTrait, DealServiceTrait};
use crate::Result;

/// Service for importing and reading FX deals
pub struct DealService {
    deal_repository: Arc<dyn DealRepositoryTrait>,
}

impl DealService {
    /// Creates a new DealService instance with injected dependencies
    pub fn new(deal_repository: Arc<dyn DealRepositoryTrait>) -> Self {
        Self { deal_repository }
    }

    /// Runs validation, the duplicate check and the insert for one record.
    ///
    /// The existence check and the insert are separate store calls, so a
    /// concurrent writer can slip in between them. A unique-key conflict on
    /// insert is therefore reported as a duplicate, same as the pre-check.
    async fn import_deal(&self, record: &DealRecord) -> std::result::Result<FxDeal, DealImportError> {
        let valid = validate_deal(record, Utc::now())?;

        if self.deal_repository.exists_by_id(valid.id())? {
            return Err(DealImportError::Duplicate(valid.id().to_string()));
        }

        let deal = valid.into_deal();
        let deal_id = deal.id.clone();
        match self.deal_repository.insert_deal(deal).await {
            Ok(stored) => Ok(stored),
            Err(err) if err.is_unique_violation() => {
                debug!("Insert conflict for deal {}: {}", deal_id, err);
                Err(DealImportError::Duplicate(deal_id))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl DealServiceTrait for DealService {
    /// Imports a batch of deals, one record at a time, in input order.
    ///
    /// Successful inserts are never rolled back because of a later failure.
    async fn import_deals(&self, records: Vec<DealRecord>) -> ImportReport {
        let batch_id = Uuid::new_v4();
        let mut report = ImportReportBuilder::default();

        for record in &records {
            let deal_id = record.reported_id();
            match self.import_deal(record).await {
                Ok(_) => report.record_success(),
                Err(err @ DealImportError::Unexpected(_)) => {
                    error!("Unexpected error importing deal {} (batch {}): {}", deal_id, batch_id, err);
                    report.record_failure(deal_id, err.to_string());
                }
                Err(err) => {
                    warn!("Failed to import deal {} (batch {}): {}", deal_id, batch_id, err);
                    report.record_failure(deal_id, err.to_string());
                }
            }
        }

        let report = report.build();
        info!(
            "Deal import batch {} finished: {} records, {} imported, {} failed",
            batch_id,
            records.len(),
            report.success_count,
            report.failure_count
        );
        report
    }

    fn get_deal(&self, deal_id: &str) -> Result<Option<FxDeal>> {
        self.deal_repository.get_deal(deal_id)
    }

    fn count_deals(&self) -> Result<i64> {
        self.deal_repository.count_deals()
    }
}
