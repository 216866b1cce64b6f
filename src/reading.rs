pub mod parser;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{error::BillingError, utility::Utility};

/// New meter values with optional rate overrides.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReadingInput {
    pub cw: Decimal,
    pub hw: Decimal,
    pub el: Decimal,

    pub cw_rate: Option<Decimal>,
    pub hw_rate: Option<Decimal>,
    pub wd_rate: Option<Decimal>,
    pub el_rate: Option<Decimal>,
}

impl ReadingInput {
    /// Build the input from already parsed fields, the last occurrence of a field wins.
    ///
    /// Returns `None` when any of the new readings is missing.
    pub fn from_fields(fields: impl IntoIterator<Item = (Field, Decimal)>) -> Option<Self> {
        let (mut cw, mut hw, mut el) = (None, None, None);
        let (mut cw_rate, mut hw_rate, mut wd_rate, mut el_rate) = (None, None, None, None);
        for (field, value) in fields {
            let slot = match field {
                Field::ColdWater => &mut cw,
                Field::HotWater => &mut hw,
                Field::Electricity => &mut el,
                Field::ColdWaterRate => &mut cw_rate,
                Field::HotWaterRate => &mut hw_rate,
                Field::WaterDisposalRate => &mut wd_rate,
                Field::ElectricityRate => &mut el_rate,
            };
            *slot = Some(value);
        }
        Some(Self { cw: cw?, hw: hw?, el: el?, cw_rate, hw_rate, wd_rate, el_rate })
    }

    pub const fn rate_override(&self, utility: Utility) -> Option<Decimal> {
        match utility {
            Utility::ColdWater => self.cw_rate,
            Utility::HotWater => self.hw_rate,
            Utility::WaterDisposal => self.wd_rate,
            Utility::Electricity => self.el_rate,
        }
    }
}

/// Recognized command field.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, derive_more::Display)]
pub enum Field {
    #[display("cw")]
    ColdWater,

    #[display("hw")]
    HotWater,

    #[display("el")]
    Electricity,

    #[display("cw_rate")]
    ColdWaterRate,

    #[display("hw_rate")]
    HotWaterRate,

    #[display("wd_rate")]
    WaterDisposalRate,

    #[display("el_rate")]
    ElectricityRate,
}

impl Field {
    /// Fields without which the command makes no sense.
    pub const READINGS: [Self; 3] = [Self::ColdWater, Self::HotWater, Self::Electricity];
}

impl FromStr for Field {
    type Err = BillingError;

    /// Case-insensitive, long names are accepted for the readings.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let key = key.trim().to_lowercase();
        match key.as_str() {
            "cw" | "cold_water" => Ok(Self::ColdWater),
            "hw" | "hot_water" => Ok(Self::HotWater),
            "el" | "electricity" => Ok(Self::Electricity),
            "cw_rate" => Ok(Self::ColdWaterRate),
            "hw_rate" => Ok(Self::HotWaterRate),
            "wd_rate" => Ok(Self::WaterDisposalRate),
            "el_rate" => Ok(Self::ElectricityRate),
            _ => Err(BillingError::UnknownField(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_field_from_str() {
        assert_eq!("HW_Rate".parse::<Field>().unwrap(), Field::HotWaterRate);
        assert_eq!("cold_water".parse::<Field>().unwrap(), Field::ColdWater);
        assert_eq!(
            "gas".parse::<Field>(),
            Err(BillingError::UnknownField("gas".to_owned()))
        );
    }

    #[test]
    fn test_from_fields_last_wins() {
        let input = ReadingInput::from_fields([
            (Field::ColdWater, dec!(1)),
            (Field::HotWater, dec!(2)),
            (Field::Electricity, dec!(3)),
            (Field::ColdWater, dec!(4)),
        ])
        .unwrap();
        assert_eq!(input.cw, dec!(4));
        assert_eq!(input.rate_override(Utility::ColdWater), None);
    }

    #[test]
    fn test_from_fields_requires_readings() {
        assert!(
            ReadingInput::from_fields([(Field::ColdWater, dec!(1)), (Field::HotWater, dec!(2))])
                .is_none()
        );
    }
}
