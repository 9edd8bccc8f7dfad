use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MISSING_DEAL_ID;

/// Candidate deal as submitted by a client.
///
/// Every field is optional so that a missing value is reported as a
/// validation failure of this record instead of rejecting the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealRecord {
    pub deal_unique_id: Option<String>,
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
    pub deal_timestamp: Option<DateTime<Utc>>,
    // Decoded from the JSON number text, so scale and digits survive.
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub deal_amount: Option<Decimal>,
}

impl DealRecord {
    /// Id to report for this record, even when the record is otherwise malformed.
    pub fn reported_id(&self) -> &str {
        self.deal_unique_id.as_deref().unwrap_or(MISSING_DEAL_ID)
    }
}

/// Persisted deal. `id` is the immutable primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxDeal {
    #[serde(rename = "dealUniqueId")]
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub deal_timestamp: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub deal_amount: Decimal,
}

/// A record that passed every validation rule.
///
/// Only [`crate::deals::validate_deal`] builds one, so holding a `ValidDeal`
/// means all required fields are present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDeal(FxDeal);

impl ValidDeal {
    pub(crate) fn new(deal: FxDeal) -> Self {
        Self(deal)
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn into_deal(self) -> FxDeal {
        self.0
    }
}

/// One rejected record of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    pub deal_id: String,
    #[serde(rename = "error")]
    pub reason: String,
}

/// Outcome of one batch import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }
}

/// Accumulates per-record outcomes while a batch is processed.
#[derive(Debug, Default)]
pub(crate) struct ImportReportBuilder {
    success_count: usize,
    failures: Vec<ImportFailure>,
}

impl ImportReportBuilder {
    pub(crate) fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub(crate) fn record_failure(&mut self, deal_id: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(ImportFailure {
            deal_id: deal_id.into(),
            reason: reason.into(),
        });
    }

    pub(crate) fn build(self) -> ImportReport {
        ImportReport {
            success_count: self.success_count,
            failure_count: self.failures.len(),
            failures: self.failures,
        }
    }
}
