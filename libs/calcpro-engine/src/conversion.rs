//! Unit and currency conversion
//!
//! Linear units convert through the base unit of their category
//! (`value / from_factor * to_factor`). Temperature converts through Celsius.
//! Currency rates are fixed and quoted per US dollar.

use crate::error::{CalcError, Result};
use crate::evaluator::leading_number;
use crate::format::{display_number, fixed};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Fixed decimals for linear unit results
pub const UNIT_DECIMALS: usize = 6;

/// Fixed decimals for temperature results
pub const TEMPERATURE_DECIMALS: usize = 4;

/// Fixed decimals for currency results
pub const CURRENCY_DECIMALS: usize = 2;

/// Linear unit: `factor` units equal one base unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub code: &'static str,
    pub name: &'static str,
    pub factor: f64,
}

const fn unit(code: &'static str, name: &'static str, factor: f64) -> Unit {
    Unit { code, name, factor }
}

const LENGTH: &[Unit] = &[
    unit("m", "Meters", 1.0),
    unit("cm", "Centimeters", 100.0),
    unit("mm", "Millimeters", 1000.0),
    unit("km", "Kilometers", 0.001),
    unit("in", "Inches", 39.3701),
    unit("ft", "Feet", 3.28084),
    unit("yd", "Yards", 1.09361),
    unit("mi", "Miles", 0.000621371),
];

const WEIGHT: &[Unit] = &[
    unit("kg", "Kilograms", 1.0),
    unit("g", "Grams", 1000.0),
    unit("lb", "Pounds", 2.20462),
    unit("oz", "Ounces", 35.274),
    unit("ton", "Tons", 0.001),
];

const AREA: &[Unit] = &[
    unit("m2", "Square Meters", 1.0),
    unit("cm2", "Square Centimeters", 10000.0),
    unit("km2", "Square Kilometers", 0.000001),
    unit("ft2", "Square Feet", 10.7639),
    unit("in2", "Square Inches", 1550.0),
    unit("acre", "Acres", 0.000247105),
];

const VOLUME: &[Unit] = &[
    unit("l", "Liters", 1.0),
    unit("ml", "Milliliters", 1000.0),
    unit("gal", "Gallons", 0.264172),
    unit("qt", "Quarts", 1.05669),
    unit("pt", "Pints", 2.11338),
    unit("cup", "Cups", 4.22675),
    unit("fl_oz", "Fluid Ounces", 33.814),
];

/// Temperature scales carry no factor; they convert through Celsius
const TEMPERATURE: &[Unit] = &[
    unit("c", "Celsius", 1.0),
    unit("f", "Fahrenheit", 1.0),
    unit("k", "Kelvin", 1.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Weight,
    Temperature,
    Area,
    Volume,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 5] = [
        Self::Length,
        Self::Weight,
        Self::Temperature,
        Self::Area,
        Self::Volume,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Weight => "weight",
            Self::Temperature => "temperature",
            Self::Area => "area",
            Self::Volume => "volume",
        }
    }

    pub fn units(self) -> &'static [Unit] {
        match self {
            Self::Length => LENGTH,
            Self::Weight => WEIGHT,
            Self::Temperature => TEMPERATURE,
            Self::Area => AREA,
            Self::Volume => VOLUME,
        }
    }

    pub fn unit(self, code: &str) -> Result<&'static Unit> {
        self.units()
            .iter()
            .find(|u| u.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| {
                CalcError::conversion(format!("Unknown {} unit '{}'", self.id(), code))
            })
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for UnitCategory {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| CalcError::conversion(format!("Unknown unit category '{}'", s)))
    }
}

/// Currency with its rate per US dollar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub rate: f64,
}

const fn currency(
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    rate: f64,
) -> Currency {
    Currency {
        code,
        name,
        symbol,
        rate,
    }
}

pub const CURRENCIES: &[Currency] = &[
    currency("USD", "US Dollar", "$", 1.0),
    currency("EUR", "Euro", "€", 0.85),
    currency("GBP", "British Pound", "£", 0.73),
    currency("JPY", "Japanese Yen", "¥", 110.0),
    currency("CAD", "Canadian Dollar", "C$", 1.25),
    currency("AUD", "Australian Dollar", "A$", 1.35),
    currency("CHF", "Swiss Franc", "CHF", 0.92),
    currency("CNY", "Chinese Yuan", "¥", 6.45),
    currency("INR", "Indian Rupee", "₹", 74.5),
    currency("KRW", "South Korean Won", "₩", 1180.0),
];

pub fn find_currency(code: &str) -> Result<&'static Currency> {
    CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .ok_or_else(|| CalcError::conversion(format!("Unknown currency '{}'", code)))
}

/// Completed conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub result: f64,
    /// Fixed-decimal result, shown on the calculator display
    pub display: String,
    /// History expression, e.g. `10 m`
    pub expression: String,
    /// History result, e.g. `1000.000000 cm`
    pub label: String,
}

/// Parse a conversion amount typed by the user
pub fn parse_amount(text: &str) -> Result<f64> {
    if text.trim().is_empty() {
        return Err(CalcError::invalid_input("Please enter a value to convert"));
    }
    leading_number(text)
        .filter(|v| v.is_finite())
        .ok_or_else(|| CalcError::invalid_input("Please enter a valid number"))
}

/// Convert `value` between two units of the same category
pub fn convert_unit(
    category: UnitCategory,
    value: f64,
    from: &str,
    to: &str,
) -> Result<Conversion> {
    let from = category.unit(from)?;
    let to = category.unit(to)?;

    let conversion = if category == UnitCategory::Temperature {
        let result = from_celsius(to_celsius(value, from.code), to.code);
        let display = fixed(result, TEMPERATURE_DECIMALS);
        Conversion {
            result,
            expression: format!("{}°{}", display_number(value), from.code.to_uppercase()),
            label: format!("{}°{}", display, to.code.to_uppercase()),
            display,
        }
    } else {
        let result = value / from.factor * to.factor;
        let display = fixed(result, UNIT_DECIMALS);
        Conversion {
            result,
            expression: format!("{} {}", display_number(value), from.code),
            label: format!("{} {}", display, to.code),
            display,
        }
    };

    debug!(
        category = %category,
        from = from.code,
        to = to.code,
        value,
        result = %conversion.display,
        "converted unit"
    );
    Ok(conversion)
}

fn to_celsius(value: f64, scale: &str) -> f64 {
    match scale {
        "f" => (value - 32.0) * 5.0 / 9.0,
        "k" => value - 273.15,
        _ => value,
    }
}

fn from_celsius(celsius: f64, scale: &str) -> f64 {
    match scale {
        "f" => celsius * 9.0 / 5.0 + 32.0,
        "k" => celsius + 273.15,
        _ => celsius,
    }
}

/// Convert a non-negative amount between currencies
pub fn convert_currency(amount: f64, from: &str, to: &str) -> Result<Conversion> {
    if amount < 0.0 {
        return Err(CalcError::invalid_input("Please enter a valid positive number"));
    }
    let from = find_currency(from)?;
    let to = find_currency(to)?;

    let result = amount / from.rate * to.rate;
    let shown = fixed(result, CURRENCY_DECIMALS);

    debug!(from = from.code, to = to.code, amount, result = %shown, "converted currency");
    Ok(Conversion {
        result,
        expression: format!("{} {}", display_number(amount), from.code),
        label: format!("{} {}", shown, to.code),
        display: shown,
    })
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_length() {
        let c = convert_unit(UnitCategory::Length, 10.0, "m", "cm").unwrap();
        assert_eq!(c.display, "1000.000000");
        assert_eq!(c.expression, "10 m");
        assert_eq!(c.label, "1000.000000 cm");

        let c = convert_unit(UnitCategory::Length, 1.0, "km", "mi").unwrap();
        assert_eq!(c.display, "0.621371");
    }

    #[test]
    fn test_weight_and_volume() {
        let c = convert_unit(UnitCategory::Weight, 1.0, "kg", "lb").unwrap();
        assert_eq!(c.display, "2.204620");

        let c = convert_unit(UnitCategory::Volume, 2.0, "l", "ml").unwrap();
        assert_eq!(c.display, "2000.000000");
    }

    #[test]
    fn test_temperature() {
        let c = convert_unit(UnitCategory::Temperature, 100.0, "c", "f").unwrap();
        assert_eq!(c.display, "212.0000");
        assert_eq!(c.expression, "100°C");
        assert_eq!(c.label, "212.0000°F");

        let c = convert_unit(UnitCategory::Temperature, 32.0, "f", "k").unwrap();
        assert_eq!(c.display, "273.1500");

        let c = convert_unit(UnitCategory::Temperature, 0.0, "k", "c").unwrap();
        assert_eq!(c.display, "-273.1500");
    }

    #[test]
    fn test_unknown_units() {
        let err = convert_unit(UnitCategory::Length, 1.0, "m", "kg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert!("speed".parse::<UnitCategory>().is_err());
        assert_eq!("Area".parse::<UnitCategory>().unwrap(), UnitCategory::Area);
    }

    #[test]
    fn test_currency() {
        let c = convert_currency(100.0, "USD", "EUR").unwrap();
        assert_eq!(c.display, "85.00");
        assert_eq!(c.expression, "100 USD");
        assert_eq!(c.label, "85.00 EUR");

        let c = convert_currency(110.0, "JPY", "usd").unwrap();
        assert_eq!(c.display, "1.00");

        assert_eq!(
            convert_currency(-5.0, "USD", "EUR").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            convert_currency(5.0, "USD", "XYZ").unwrap_err().kind(),
            ErrorKind::Conversion
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_amount("3kg").unwrap(), 3.0);
        assert_eq!(parse_amount("").unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(parse_amount("abc").unwrap_err().kind(), ErrorKind::InvalidInput);
    }
}
