//! Billing calculator: merges the old bill with the new readings and renders the new report.

use std::fmt::{Display, Formatter};

use bon::Builder;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    bill::{Bill, UtilityReading, parser::DATE_FORMAT},
    decimal::round_money,
    error::BillingError,
    prelude::*,
    reading::ReadingInput,
    utility::Utility,
};

#[derive(Builder)]
pub struct Calculator {
    /// The new bill is always dated with this day.
    today: NaiveDate,

    /// Reject negative consumption instead of reporting it.
    #[builder(default)]
    strict: bool,
}

impl Calculator {
    #[instrument(skip_all, fields(today = %self.today, strict = self.strict))]
    pub fn calculate(&self, old: &Bill, new: &ReadingInput) -> Result<Report, BillingError> {
        let [cw_rate, hw_rate, wd_rate, el_rate] = Utility::ALL.map(|utility| {
            resolve_rate(utility, new.rate_override(utility), old.reading(utility))
        });
        let (cw_rate, hw_rate, wd_rate, el_rate) = (cw_rate?, hw_rate?, wd_rate?, el_rate?);
        debug!(%cw_rate, %hw_rate, %wd_rate, %el_rate, "resolved the rates");

        let cold_water = self.metered(Utility::ColdWater, old, new.cw, cw_rate)?;
        let hot_water = self.metered(Utility::HotWater, old, new.hw, hw_rate)?;
        let electricity = self.metered(Utility::Electricity, old, new.el, el_rate)?;
        let water_disposal = {
            let consumption = cold_water
                .charge
                .consumption
                .checked_add(hot_water.charge.consumption)
                .ok_or(BillingError::Overflow)?;
            Charge::try_new(consumption, wd_rate)?
        };

        let total = [&cold_water.charge, &hot_water.charge, &water_disposal, &electricity.charge]
            .into_iter()
            .try_fold(Decimal::ZERO, |total, charge| total.checked_add(charge.amount))
            .map(round_money)
            .ok_or(BillingError::Overflow)?;
        info!(%total, "calculated the bill");

        Ok(Report { cold_water, hot_water, water_disposal, electricity, total, date: self.today })
    }

    fn metered(
        &self,
        utility: Utility,
        old: &Bill,
        current: Decimal,
        rate: Decimal,
    ) -> Result<MeteredCharge, BillingError> {
        let previous = old.reading(utility).ok_or(BillingError::MissingReading { utility })?.current;
        let consumption = current.checked_sub(previous).ok_or(BillingError::Overflow)?;
        if consumption < Decimal::ZERO {
            if self.strict {
                return Err(BillingError::NegativeConsumption { utility, previous, current });
            }
            warn!(%utility, %previous, %current, "negative consumption");
        }
        Ok(MeteredCharge { previous, current, charge: Charge::try_new(consumption, rate)? })
    }
}

/// Override, else the rate inherited from the old bill, else the utility's no-history default.
pub fn resolve_rate(
    utility: Utility,
    rate_override: Option<Decimal>,
    old_reading: Option<&UtilityReading>,
) -> Result<Decimal, BillingError> {
    rate_override
        .or_else(|| old_reading.map(|reading| reading.rate))
        .or_else(|| utility.no_history_rate())
        .ok_or(BillingError::MissingRate { utility })
}

/// `<consumption> * <rate> = <amount>`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Charge {
    pub consumption: Decimal,
    pub rate: Decimal,

    /// Rounded to kopecks.
    pub amount: Decimal,
}

impl Charge {
    fn try_new(consumption: Decimal, rate: Decimal) -> Result<Self, BillingError> {
        let amount = consumption.checked_mul(rate).ok_or(BillingError::Overflow)?;
        Ok(Self { consumption, rate, amount: round_money(amount) })
    }
}

impl Display for Charge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} * {} = {}", self.consumption, self.rate, self.amount)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MeteredCharge {
    /// Current reading of the old bill.
    pub previous: Decimal,

    /// New reading.
    pub current: Decimal,

    pub charge: Charge,
}

impl Display for MeteredCharge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Было - {}\nСтало - {}\n\n{}", self.previous, self.current, self.charge)
    }
}

/// The new bill, [`Display`] renders the report message.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Report {
    pub cold_water: MeteredCharge,
    pub hot_water: MeteredCharge,
    pub water_disposal: Charge,
    pub electricity: MeteredCharge,
    pub total: Decimal,
    pub date: NaiveDate,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:\n{}\n\n", Utility::ColdWater, self.cold_water)?;
        write!(f, "{}:\n{}\n\n", Utility::HotWater, self.hot_water)?;
        write!(f, "{}:\n{}\n\n", Utility::WaterDisposal, self.water_disposal)?;
        write!(f, "{}:\n{}\n\n", Utility::Electricity, self.electricity)?;
        write!(f, "Итого: {}\n\n#счетчики {}", self.total, self.date.format(DATE_FORMAT))
    }
}
