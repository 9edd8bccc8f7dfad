use chrono::{DateTime, Utc};
use fxdeals_core::deals as core_deals;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One element of an import payload. Absent fields are reported per record.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DealRequest {
    pub deal_unique_id: Option<String>,
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
    pub deal_timestamp: Option<DateTime<Utc>>,
    #[schema(value_type = Option<f64>)]
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub deal_amount: Option<Decimal>,
}

impl From<DealRequest> for core_deals::DealRecord {
    fn from(r: DealRequest) -> Self {
        Self {
            deal_unique_id: r.deal_unique_id,
            from_currency: r.from_currency,
            to_currency: r.to_currency,
            deal_timestamp: r.deal_timestamp,
            deal_amount: r.deal_amount,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub deal_unique_id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub deal_timestamp: DateTime<Utc>,
    #[schema(value_type = f64)]
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub deal_amount: Decimal,
}

impl From<core_deals::FxDeal> for Deal {
    fn from(d: core_deals::FxDeal) -> Self {
        Self {
            deal_unique_id: d.id,
            from_currency: d.from_currency,
            to_currency: d.to_currency,
            deal_timestamp: d.deal_timestamp,
            deal_amount: d.deal_amount,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    pub deal_id: String,
    pub error: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub failures: Vec<ImportFailure>,
}

impl From<core_deals::ImportReport> for ImportReport {
    fn from(r: core_deals::ImportReport) -> Self {
        Self {
            success_count: r.success_count,
            failure_count: r.failure_count,
            failures: r
                .failures
                .into_iter()
                .map(|f| ImportFailure {
                    deal_id: f.deal_id,
                    error: f.reason,
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct DealCount {
    pub count: i64,
}
