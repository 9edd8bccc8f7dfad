//! Field rules for incoming deal records.
//!
//! Each field has one named check. A check reports at most one message, so a
//! missing field never also reports a shape violation. Checks run in the
//! order of [`DEAL_RULES`] and every violation is kept.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::deals_errors::DealImportError;
use super::deals_model::{DealRecord, FxDeal, ValidDeal};
use crate::constants::CURRENCY_CODE_LENGTH;

type FieldCheck = fn(&DealRecord, DateTime<Utc>) -> Option<&'static str>;

/// A named check over one field of a [`DealRecord`].
pub struct FieldRule {
    pub field: &'static str,
    check: FieldCheck,
}

impl FieldRule {
    pub fn check(&self, record: &DealRecord, now: DateTime<Utc>) -> Option<FieldViolation> {
        (self.check)(record, now).map(|message| FieldViolation {
            field: self.field,
            message,
        })
    }
}

/// A violated rule, attributable to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

pub const DEAL_RULES: [FieldRule; 5] = [
    FieldRule {
        field: "dealUniqueId",
        check: check_deal_unique_id,
    },
    FieldRule {
        field: "fromCurrency",
        check: check_from_currency,
    },
    FieldRule {
        field: "toCurrency",
        check: check_to_currency,
    },
    FieldRule {
        field: "dealTimestamp",
        check: check_deal_timestamp,
    },
    FieldRule {
        field: "dealAmount",
        check: check_deal_amount,
    },
];

fn check_deal_unique_id(record: &DealRecord, _now: DateTime<Utc>) -> Option<&'static str> {
    match record.deal_unique_id.as_deref() {
        None => Some("Deal Unique Id cannot be null"),
        Some("") => Some("Deal Unique Id cannot be empty"),
        Some(_) => None,
    }
}

fn check_from_currency(record: &DealRecord, _now: DateTime<Utc>) -> Option<&'static str> {
    match record.from_currency.as_deref() {
        None => Some("From Currency ISO Code cannot be null"),
        Some(code) if !is_currency_code_shape(code) => {
            Some("From Currency ISO Code must be 3 characters")
        }
        Some(_) => None,
    }
}

fn check_to_currency(record: &DealRecord, _now: DateTime<Utc>) -> Option<&'static str> {
    match record.to_currency.as_deref() {
        None => Some("To Currency ISO Code cannot be null"),
        Some(code) if !is_currency_code_shape(code) => {
            Some("To Currency ISO Code must be 3 characters")
        }
        Some(_) => None,
    }
}

fn check_deal_timestamp(record: &DealRecord, now: DateTime<Utc>) -> Option<&'static str> {
    match record.deal_timestamp {
        None => Some("Deal timestamp cannot be null"),
        Some(ts) if ts > now => Some("Deal timestamp cannot be in the future"),
        Some(_) => None,
    }
}

fn check_deal_amount(record: &DealRecord, _now: DateTime<Utc>) -> Option<&'static str> {
    match record.deal_amount {
        None => Some("Deal Amount cannot be null"),
        Some(amount) if amount <= Decimal::ZERO => Some("Deal Amount must be positive"),
        Some(_) => None,
    }
}

// Shape only; whether the code names a real currency is not checked.
fn is_currency_code_shape(code: &str) -> bool {
    code.chars().count() == CURRENCY_CODE_LENGTH
}

/// Runs every rule against `record` and returns the violations in rule order.
pub fn deal_violations(record: &DealRecord, now: DateTime<Utc>) -> Vec<FieldViolation> {
    DEAL_RULES
        .iter()
        .filter_map(|rule| rule.check(record, now))
        .collect()
}

/// Validates `record` as of `now`.
///
/// On success the record is converted into the deal that will be stored,
/// with every field copied verbatim.
pub fn validate_deal(
    record: &DealRecord,
    now: DateTime<Utc>,
) -> std::result::Result<ValidDeal, DealImportError> {
    let violations = deal_violations(record, now);
    match (
        violations.is_empty(),
        &record.deal_unique_id,
        &record.from_currency,
        &record.to_currency,
        record.deal_timestamp,
        record.deal_amount,
    ) {
        (true, Some(id), Some(from), Some(to), Some(timestamp), Some(amount)) => {
            Ok(ValidDeal::new(FxDeal {
                id: id.clone(),
                from_currency: from.clone(),
                to_currency: to.clone(),
                deal_timestamp: timestamp,
                deal_amount: amount,
            }))
        }
        _ => Err(DealImportError::Validation(
            violations.iter().map(|v| v.message.to_string()).collect(),
        )),
    }
}
