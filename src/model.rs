use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::currency;
use crate::error::AppError;

/// Client the proposal is addressed to. Only the name is required;
/// email and phone are rendered when present.
#[derive(Debug, Clone)]
pub struct ClientRecord {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Closed set of unit-of-measure symbols offered by the form selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Un,
    M2,
    Km2,
    Ha,
    Mm,
    Cm,
    M,
    Km,
    Ml,
    L,
    M3,
    Min,
    Hour,
    Day,
    Week,
    Month,
    G,
    Kg,
}

impl Unit {
    pub const ALL: [Unit; 18] = [
        Unit::Un,
        Unit::M2,
        Unit::Km2,
        Unit::Ha,
        Unit::Mm,
        Unit::Cm,
        Unit::M,
        Unit::Km,
        Unit::Ml,
        Unit::L,
        Unit::M3,
        Unit::Min,
        Unit::Hour,
        Unit::Day,
        Unit::Week,
        Unit::Month,
        Unit::G,
        Unit::Kg,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Un => "un",
            Unit::M2 => "m²",
            Unit::Km2 => "km²",
            Unit::Ha => "ha",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::M => "m",
            Unit::Km => "km",
            Unit::Ml => "mL",
            Unit::L => "L",
            Unit::M3 => "m³",
            Unit::Min => "min",
            Unit::Hour => "h",
            Unit::Day => "dias",
            Unit::Week => "semanas",
            Unit::Month => "meses",
            Unit::G => "g",
            Unit::Kg => "kg",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .iter()
            .copied()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| AppError::UnknownUnit(s.to_string()))
    }
}

/// One committed row of the proposal.
///
/// `unit_price` holds the masked BRL display string; `quantity` is kept as
/// the raw entry and treated as a plain multiplier at render time.
#[derive(Debug, Clone)]
pub struct LineItem {
    pub id: Uuid,
    pub name: String,
    pub details: Option<String>,
    pub unit: Unit,
    pub unit_price: String,
    pub quantity: String,
}

impl LineItem {
    /// Line total in currency units: unit price × quantity.
    pub fn total(&self) -> Result<f64, AppError> {
        let price = currency::parse(&self.unit_price)
            .ok_or_else(|| AppError::InvalidNumber(self.unit_price.clone()))?;
        let quantity: f64 = self
            .quantity
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| AppError::InvalidNumber(self.quantity.clone()))?;
        Ok(price * quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_symbols_round_trip() {
        for unit in Unit::ALL {
            assert_eq!(unit.as_str().parse::<Unit>().unwrap(), unit);
        }
        assert!("parsecs".parse::<Unit>().is_err());
    }

    fn item(unit_price: &str, quantity: &str) -> LineItem {
        LineItem {
            id: Uuid::new_v4(),
            name: "Pintura".to_string(),
            details: None,
            unit: Unit::M2,
            unit_price: unit_price.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn total_multiplies_price_by_quantity() {
        let total = item("R$ 15,00", "10").total().unwrap();
        assert!((total - 150.0).abs() < 1e-9);
        assert_eq!(crate::currency::format(total), "R$ 150,00");
    }

    #[test]
    fn total_accepts_comma_decimal_quantity() {
        let total = item("R$ 10,00", "2,5").total().unwrap();
        assert!((total - 25.0).abs() < 1e-9);
    }

    #[test]
    fn total_rejects_non_numeric_quantity() {
        assert!(item("R$ 15,00", "muitos").total().is_err());
    }
}
