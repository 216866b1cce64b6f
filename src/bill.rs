pub mod parser;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utility::Utility;

/// One utility section of a previously sent report, taken verbatim.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct UtilityReading {
    pub previous: Decimal,
    pub current: Decimal,

    /// As stated in the text, not re-derived from the readings.
    pub consumption: Decimal,

    pub rate: Decimal,

    /// As stated in the text, not recomputed.
    pub amount: Decimal,
}

/// Previously sent report.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Bill {
    pub cold_water: Option<UtilityReading>,
    pub hot_water: Option<UtilityReading>,

    /// Has no meter: `previous` is zero and `current` is the sum of the water consumptions.
    pub water_disposal: Option<UtilityReading>,

    pub electricity: Option<UtilityReading>,
    pub total: Decimal,
    pub date: NaiveDate,
}

impl Bill {
    pub const fn reading(&self, utility: Utility) -> Option<&UtilityReading> {
        match utility {
            Utility::ColdWater => self.cold_water.as_ref(),
            Utility::HotWater => self.hot_water.as_ref(),
            Utility::WaterDisposal => self.water_disposal.as_ref(),
            Utility::Electricity => self.electricity.as_ref(),
        }
    }

    /// Utilities which have a section in the bill.
    pub fn utilities(&self) -> impl Iterator<Item = Utility> + '_ {
        Utility::ALL.into_iter().filter(|utility| self.reading(*utility).is_some())
    }
}
