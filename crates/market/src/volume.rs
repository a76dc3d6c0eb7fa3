//! Volume display derived from the viewer's amount and price text
//!
//! Text is parsed with the configured locale. An unparsable edit reverts
//! that field to its last valid text and the volume is computed from the
//! reverted value, so a typo never blanks the display.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tradebook_core::{Amount, CurrencyCode, Price};

/// Text that is not a number in the active locale
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot parse {text:?} as a number")]
pub struct ParseFailure {
    pub text: String,
}

/// Decimal conventions of the viewer's locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub grouping_separator: Option<char>,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::english()
    }
}

impl NumberLocale {
    /// "1,234.5"
    pub fn english() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: Some(','),
        }
    }

    /// "1.234,5"
    pub fn german() -> Self {
        Self {
            decimal_separator: ',',
            grouping_separator: Some('.'),
        }
    }

    /// Parse non-negative decimal text; empty text is zero
    pub fn parse(&self, text: &str) -> Result<Decimal, ParseFailure> {
        let failure = || ParseFailure {
            text: text.to_string(),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let mut normalised = String::with_capacity(trimmed.len());
        for c in trimmed.chars() {
            if c.is_ascii_digit() {
                normalised.push(c);
            } else if c == self.decimal_separator {
                normalised.push('.');
            } else if Some(c) == self.grouping_separator {
                continue;
            } else {
                return Err(failure());
            }
        }

        if !normalised.chars().any(|c| c.is_ascii_digit()) {
            return Err(failure());
        }
        Decimal::from_str(&normalised).map_err(|_| failure())
    }
}

/// Which text input an update concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeField {
    Amount,
    Price,
}

/// Trade volume as a count of the currency's minor units
///
/// The count is `amount x price` truncated to an integer: an amount of 2
/// at a price of 100 gives 200 minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub currency: CurrencyCode,
    pub minor_units: i64,
}

impl Volume {
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            currency,
            minor_units: 0,
        }
    }

    fn compute(amount: Amount, price: Price, currency: CurrencyCode) -> Self {
        let minor_units = match amount.checked_mul(price) {
            Some(product) => product.trunc().to_i64().unwrap_or(i64::MAX),
            None => {
                warn!("Volume overflow for {} x {}", amount, price);
                i64::MAX
            }
        };
        Self {
            currency,
            minor_units,
        }
    }
}

/// Result of one text edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeUpdate {
    pub volume: Volume,
    /// Set when the edit was rejected and the field reverted
    pub reverted: Option<VolumeField>,
}

#[derive(Debug, Clone, Default)]
struct FieldInput {
    text: String,
    value: Decimal,
}

impl FieldInput {
    /// Value entered by the viewer; None while the field is empty
    fn entered(&self) -> Option<Decimal> {
        if self.text.trim().is_empty() {
            None
        } else {
            Some(self.value)
        }
    }
}

/// Derives the volume display from amount and price text
#[derive(Debug, Clone)]
pub struct VolumeCalculator {
    locale: NumberLocale,
    currency: CurrencyCode,
    amount: FieldInput,
    price: FieldInput,
    volume: Volume,
}

impl VolumeCalculator {
    pub fn new(locale: NumberLocale, currency: CurrencyCode) -> Self {
        Self {
            locale,
            volume: Volume::zero(currency.clone()),
            currency,
            amount: FieldInput::default(),
            price: FieldInput::default(),
        }
    }

    pub fn set_amount_text(&mut self, text: &str) -> VolumeUpdate {
        self.apply(VolumeField::Amount, text)
    }

    pub fn set_price_text(&mut self, text: &str) -> VolumeUpdate {
        self.apply(VolumeField::Price, text)
    }

    /// Switch the destination currency and recompute
    pub fn set_currency(&mut self, currency: CurrencyCode) {
        self.currency = currency;
        self.recompute();
    }

    fn apply(&mut self, field: VolumeField, text: &str) -> VolumeUpdate {
        let locale = self.locale;
        let input = match field {
            VolumeField::Amount => &mut self.amount,
            VolumeField::Price => &mut self.price,
        };

        let reverted = match locale.parse(text) {
            Ok(value) => {
                input.text = text.to_string();
                input.value = value;
                None
            }
            Err(failure) => {
                debug!(
                    "{}; reverting {:?} to {:?}",
                    failure, field, input.text
                );
                Some(field)
            }
        };

        self.recompute();
        VolumeUpdate {
            volume: self.volume.clone(),
            reverted,
        }
    }

    fn recompute(&mut self) {
        self.volume = Volume::compute(self.amount.value, self.price.value, self.currency.clone());
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Current (last valid) amount text
    pub fn amount_text(&self) -> &str {
        &self.amount.text
    }

    /// Current (last valid) price text
    pub fn price_text(&self) -> &str {
        &self.price.text
    }

    pub fn entered_amount(&self) -> Option<Amount> {
        self.amount.entered()
    }

    pub fn entered_price(&self) -> Option<Price> {
        self.price.entered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn calculator() -> VolumeCalculator {
        VolumeCalculator::new(NumberLocale::english(), CurrencyCode::new("EUR"))
    }

    #[test]
    fn test_volume_is_truncated_product() {
        let mut calc = calculator();
        calc.set_amount_text("2");
        let update = calc.set_price_text("100");
        assert_eq!(update.volume.minor_units, 200);
        assert_eq!(update.volume.currency.as_str(), "EUR");
        assert_eq!(update.reverted, None);

        let update = calc.set_amount_text("0.015");
        assert_eq!(update.volume.minor_units, 1);
    }

    #[test]
    fn test_unparsable_amount_reverts() {
        let mut calc = calculator();
        calc.set_amount_text("2");
        calc.set_price_text("100");

        let update = calc.set_amount_text("2x");
        assert_eq!(update.reverted, Some(VolumeField::Amount));
        assert_eq!(calc.amount_text(), "2");
        assert_eq!(update.volume.minor_units, 200);
    }

    #[test]
    fn test_unparsable_price_reverts_only_price() {
        let mut calc = calculator();
        calc.set_amount_text("3");
        calc.set_price_text("10");

        let update = calc.set_price_text("ten");
        assert_eq!(update.reverted, Some(VolumeField::Price));
        assert_eq!(calc.price_text(), "10");
        assert_eq!(calc.amount_text(), "3");
        assert_eq!(update.volume.minor_units, 30);
    }

    #[test]
    fn test_first_edit_invalid_reverts_to_empty() {
        let mut calc = calculator();
        let update = calc.set_amount_text("abc");
        assert_eq!(update.reverted, Some(VolumeField::Amount));
        assert_eq!(calc.amount_text(), "");
        assert_eq!(calc.entered_amount(), None);
        assert_eq!(update.volume.minor_units, 0);
    }

    #[test]
    fn test_empty_text_is_zero_and_not_entered() {
        let mut calc = calculator();
        calc.set_amount_text("1.5");
        assert_eq!(calc.entered_amount(), Some(dec!(1.5)));

        let update = calc.set_amount_text("");
        assert_eq!(update.reverted, None);
        assert_eq!(calc.entered_amount(), None);
        assert_eq!(update.volume.minor_units, 0);
    }

    #[test]
    fn test_locale_parsing() {
        let en = NumberLocale::english();
        assert_eq!(en.parse("1,234.5").unwrap(), dec!(1234.5));
        assert_eq!(en.parse(" 7 ").unwrap(), dec!(7));
        assert!(en.parse("1.2.3").is_err());
        assert!(en.parse("-5").is_err());
        assert!(en.parse(",").is_err());

        let de = NumberLocale::german();
        assert_eq!(de.parse("1.234,5").unwrap(), dec!(1234.5));
        assert_eq!(de.parse("0,25").unwrap(), dec!(0.25));
    }

    #[test]
    fn test_german_volume() {
        let mut calc = VolumeCalculator::new(NumberLocale::german(), CurrencyCode::new("EUR"));
        calc.set_amount_text("1,5");
        let update = calc.set_price_text("300");
        assert_eq!(update.volume.minor_units, 450);
    }

    #[test]
    fn test_currency_switch_keeps_inputs() {
        let mut calc = calculator();
        calc.set_amount_text("2");
        calc.set_price_text("100");
        calc.set_currency(CurrencyCode::new("USD"));
        assert_eq!(calc.volume().currency.as_str(), "USD");
        assert_eq!(calc.volume().minor_units, 200);
    }
}
