//! Deals module - domain models, validation, services, and traits.

mod deals_errors;
mod deals_model;
mod deals_service;
mod deals_traits;
mod deals_validation;



pub use deals_errors::DealImportError;
pub use deals_model::{DealRecord, FxDeal, ImportFailure, ImportReport, ValidDeal};
pub use deals_service::DealService;
pub use deals_traits::{DealRepositoryTrait, DealServiceTrait};
pub use deals_validation::{deal_violations, validate_deal, FieldRule, FieldViolation, DEAL_RULES};
