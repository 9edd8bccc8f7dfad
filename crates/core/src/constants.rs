/// Required length of an ISO 4217 currency code
pub const CURRENCY_CODE_LENGTH: usize = 3;

/// Separator used when joining several validation messages for one record
pub const VALIDATION_MESSAGE_SEPARATOR: &str = ", ";

/// Marker used as the failure id when a record carries no id at all
pub const MISSING_DEAL_ID: &str = "";
