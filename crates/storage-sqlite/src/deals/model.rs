//! Database model for FX deals.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use fxdeals_core::deals::FxDeal;
use fxdeals_core::errors::{DatabaseError, Error};
use rust_decimal::Decimal;

/// Row of the `fx_deals` table.
///
/// Timestamps are stored as RFC 3339 text and amounts as decimal text, so
/// no precision is lost on the way through SQLite.
#[derive(Queryable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::fx_deals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FxDealDB {
    pub deal_unique_id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub deal_timestamp: String,
    pub deal_amount: String,
    pub created_at: String,
}

impl From<FxDeal> for FxDealDB {
    fn from(deal: FxDeal) -> Self {
        Self {
            deal_unique_id: deal.id,
            from_currency: deal.from_currency,
            to_currency: deal.to_currency,
            deal_timestamp: deal.deal_timestamp.to_rfc3339(),
            deal_amount: deal.deal_amount.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

impl TryFrom<FxDealDB> for FxDeal {
    type Error = Error;

    fn try_from(db: FxDealDB) -> Result<Self, Self::Error> {
        let deal_timestamp = DateTime::parse_from_rfc3339(&db.deal_timestamp)
            .map_err(|e| {
                DatabaseError::Internal(format!(
                    "Stored timestamp '{}' for deal {} is invalid: {}",
                    db.deal_timestamp, db.deal_unique_id, e
                ))
            })?
            .with_timezone(&Utc);
        let deal_amount = Decimal::from_str(&db.deal_amount).map_err(|e| {
            DatabaseError::Internal(format!(
                "Stored amount '{}' for deal {} is invalid: {}",
                db.deal_amount, db.deal_unique_id, e
            ))
        })?;

        Ok(Self {
            id: db.deal_unique_id,
            from_currency: db.from_currency,
            to_currency: db.to_currency,
            deal_timestamp,
            deal_amount,
        })
    }
}
