use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price of one base-asset unit, denominated in the offer currency
pub type Price = Decimal;

/// Amount in base-asset units
pub type Amount = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// ISO 4217 style currency code ("EUR", "USD", ...)
///
/// Codes are normalised to upper case so that scope comparisons between
/// the selected account and fetched offers are not case sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A code is well formed when it is three ASCII letters
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 3 && self.0.chars().all(|c| c.is_ascii_uppercase())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_normalised() {
        let code = CurrencyCode::new(" eur ");
        assert_eq!(code.as_str(), "EUR");
        assert_eq!(code, CurrencyCode::from("EUR"));
        assert!(code.is_well_formed());
    }

    #[test]
    fn test_currency_code_malformed() {
        assert!(!CurrencyCode::new("EURO").is_well_formed());
        assert!(!CurrencyCode::new("E1R").is_well_formed());
        assert!(!CurrencyCode::new("").is_well_formed());
    }
}
