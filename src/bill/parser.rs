//! Old bill parser: recovers a [`Bill`] from a previously generated report.

use std::sync::LazyLock;

use chrono::NaiveDate;
use itertools::Itertools;
use regex::{Captures, Regex};
use rust_decimal::Decimal;

use crate::{
    bill::{Bill, UtilityReading},
    decimal::{NUMBER_PATTERN, SIGNED_NUMBER_PATTERN, normalize, normalize_signed},
    error::{BillField, BillingError},
    prelude::*,
    utility::Utility,
};

pub const DATE_FORMAT: &str = "%d.%m.%Y";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)Итого:\s*({SIGNED_NUMBER_PATTERN})")).unwrap());

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)#счетчики\s*([0-9]{2}\.[0-9]{2}\.[0-9]{4})").unwrap());

static COLD_WATER: LazyLock<SectionGrammar> =
    LazyLock::new(|| SectionGrammar::metered(r"Хол\.\s*вода:"));

static HOT_WATER: LazyLock<SectionGrammar> =
    LazyLock::new(|| SectionGrammar::metered(r"Гор\.\s*вода:"));

static WATER_DISPOSAL: LazyLock<SectionGrammar> =
    LazyLock::new(|| SectionGrammar::new(r"Водоотведение:", &format!(r"\s*{}", charge_pattern())));

static ELECTRICITY: LazyLock<SectionGrammar> =
    LazyLock::new(|| SectionGrammar::metered(r"Электроэнергия:"));

/// `<consumption> * <rate> = <amount>`.
fn charge_pattern() -> String {
    format!(
        r"({SIGNED_NUMBER_PATTERN})\s*\*\s*({NUMBER_PATTERN})\s*=\s*({SIGNED_NUMBER_PATTERN})"
    )
}

struct SectionGrammar {
    /// Just the label, to tell an absent section from a broken one.
    label: Regex,

    /// Label followed by the section body.
    section: Regex,
}

impl SectionGrammar {
    fn new(label: &str, body: &str) -> Self {
        Self {
            label: Regex::new(&format!("(?i){label}")).unwrap(),
            section: Regex::new(&format!("(?i){label}{body}")).unwrap(),
        }
    }

    fn metered(label: &str) -> Self {
        Self::new(
            label,
            &format!(
                r"\s*Было\s*-\s*({NUMBER_PATTERN})\s*Стало\s*-\s*({NUMBER_PATTERN})\s*{}",
                charge_pattern(),
            ),
        )
    }

    fn of(utility: Utility) -> &'static Self {
        match utility {
            Utility::ColdWater => &*COLD_WATER,
            Utility::HotWater => &*HOT_WATER,
            Utility::WaterDisposal => &*WATER_DISPOSAL,
            Utility::Electricity => &*ELECTRICITY,
        }
    }

    /// Match the section: `None` if its label is absent altogether.
    fn captures<'t>(
        &self,
        utility: Utility,
        text: &'t str,
    ) -> Result<Option<Captures<'t>>, BillingError> {
        match self.section.captures(text) {
            Some(captures) => Ok(Some(captures)),
            None if self.label.is_match(text) => Err(BillingError::MalformedSection { utility }),
            None => Ok(None),
        }
    }
}

/// Parse the old bill text.
///
/// The layout is irrelevant: all whitespace runs are collapsed before matching.
#[instrument(skip_all)]
pub fn parse(text: &str) -> Result<Bill, BillingError> {
    let text = WHITESPACE.replace_all(text.trim(), " ");

    let cold_water = parse_metered(Utility::ColdWater, &text)?;
    let hot_water = parse_metered(Utility::HotWater, &text)?;
    let water_disposal = parse_disposal(&text, cold_water.as_ref(), hot_water.as_ref())?;
    let electricity = parse_metered(Utility::Electricity, &text)?;

    let total = TOTAL
        .captures(&text)
        .ok_or(BillingError::MissingField(BillField::Total))
        .and_then(|captures| normalize_signed(&captures[1]))?;
    let date = DATE
        .captures(&text)
        .ok_or(BillingError::MissingField(BillField::Date))
        .and_then(|captures| parse_date(&captures[1]))?;

    let bill = Bill { cold_water, hot_water, water_disposal, electricity, total, date };
    debug!(
        sections = bill.utilities().join(", "),
        total = %bill.total,
        date = %bill.date,
        "parsed the old bill",
    );
    Ok(bill)
}

pub fn parse_date(date: &str) -> Result<NaiveDate, BillingError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| BillingError::MalformedDate(date.to_owned()))
}

fn parse_metered(utility: Utility, text: &str) -> Result<Option<UtilityReading>, BillingError> {
    let Some(captures) = SectionGrammar::of(utility).captures(utility, text)? else {
        trace!(%utility, "no section");
        return Ok(None);
    };
    Ok(Some(UtilityReading {
        previous: normalize(&captures[1])?,
        current: normalize(&captures[2])?,
        consumption: normalize_signed(&captures[3])?,
        rate: normalize(&captures[4])?,
        amount: normalize_signed(&captures[5])?,
    }))
}

/// Disposal has no meter: the current value is synthesized from the water consumptions.
fn parse_disposal(
    text: &str,
    cold_water: Option<&UtilityReading>,
    hot_water: Option<&UtilityReading>,
) -> Result<Option<UtilityReading>, BillingError> {
    let utility = Utility::WaterDisposal;
    let Some(captures) = SectionGrammar::of(utility).captures(utility, text)? else {
        trace!(%utility, "no section");
        return Ok(None);
    };
    let current = cold_water
        .into_iter()
        .chain(hot_water)
        .try_fold(Decimal::ZERO, |sum, reading| sum.checked_add(reading.consumption))
        .ok_or(BillingError::Overflow)?;
    Ok(Some(UtilityReading {
        previous: Decimal::ZERO,
        current,
        consumption: normalize_signed(&captures[1])?,
        rate: normalize(&captures[2])?,
        amount: normalize_signed(&captures[3])?,
    }))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::fixtures::{OLD_BILL, OLD_BILL_WITHOUT_COLD_WATER, OLD_BILL_WITHOUT_DISPOSAL};

    #[test]
    fn test_parse_ok() {
        let bill = parse(OLD_BILL).unwrap();
        assert_eq!(
            bill.cold_water,
            Some(UtilityReading {
                previous: dec!(579),
                current: dec!(587),
                consumption: dec!(8),
                rate: dec!(59.8),
                amount: dec!(478),
            })
        );
        assert_eq!(
            bill.hot_water,
            Some(UtilityReading {
                previous: dec!(47),
                current: dec!(49),
                consumption: dec!(2),
                rate: dec!(272.14),
                amount: dec!(544.28),
            })
        );
        assert_eq!(
            bill.electricity,
            Some(UtilityReading {
                previous: dec!(7984),
                current: dec!(8108),
                consumption: dec!(124),
                rate: dec!(6.99),
                amount: dec!(866.76),
            })
        );
        assert_eq!(bill.total, dec!(2348.14));
        assert_eq!(bill.date, NaiveDate::from_ymd_opt(2025, 6, 22).unwrap());
    }

    #[test]
    fn test_disposal_is_synthesized() {
        let disposal = parse(OLD_BILL).unwrap().water_disposal.unwrap();
        assert_eq!(disposal.previous, Decimal::ZERO);
        assert_eq!(disposal.current, dec!(10));
        assert_eq!(disposal.consumption, dec!(10));
        assert_eq!(disposal.rate, dec!(45.91));
        assert_eq!(disposal.amount, dec!(459.1));
    }

    #[test]
    fn test_disposal_with_only_one_water_section() {
        let disposal = parse(OLD_BILL_WITHOUT_COLD_WATER).unwrap().water_disposal.unwrap();
        assert_eq!(disposal.current, dec!(2));
    }

    #[test]
    fn test_absent_sections() {
        let bill = parse(OLD_BILL_WITHOUT_DISPOSAL).unwrap();
        assert!(bill.water_disposal.is_none());
        assert!(bill.cold_water.is_some());

        let bill = parse(OLD_BILL_WITHOUT_COLD_WATER).unwrap();
        assert!(bill.cold_water.is_none());
        assert_eq!(
            bill.utilities().collect_vec(),
            [Utility::HotWater, Utility::WaterDisposal, Utility::Electricity]
        );
    }

    #[test]
    fn test_layout_and_case_insensitive() {
        let text = "хол. ВОДА: было - 1 стало - 3 2 * 10 = 20 итого: 20 #СЧЕТЧИКИ 01.02.2025";
        let bill = parse(text).unwrap();
        assert_eq!(bill.cold_water.unwrap().current, dec!(3));
        assert_eq!(bill.total, dec!(20));
        assert!(bill.hot_water.is_none());
    }

    #[test]
    fn test_negative_consumption() {
        let text = "Электроэнергия: Было - 10 Стало - 8 -2 * 6.99 = -13.98 Итого: -13.98 #счетчики 01.02.2025";
        let electricity = parse(text).unwrap().electricity.unwrap();
        assert_eq!(electricity.consumption, dec!(-2));
        assert_eq!(electricity.amount, dec!(-13.98));
    }

    #[test]
    fn test_missing_total() {
        let text = OLD_BILL.replace("Итого: 2348,14", "");
        assert_eq!(parse(&text), Err(BillingError::MissingField(BillField::Total)));
    }

    #[test]
    fn test_missing_date() {
        let text = OLD_BILL.replace("#счетчики 22.06.2025", "");
        assert_eq!(parse(&text), Err(BillingError::MissingField(BillField::Date)));
    }

    #[test]
    fn test_malformed_date() {
        let text = OLD_BILL.replace("22.06.2025", "31.02.2025");
        assert_eq!(parse(&text), Err(BillingError::MalformedDate("31.02.2025".to_owned())));
    }

    #[test]
    fn test_malformed_section() {
        let text = OLD_BILL.replace("2 * 272,14 = 544,28", "2 * много = 544,28");
        assert_eq!(
            parse(&text),
            Err(BillingError::MalformedSection { utility: Utility::HotWater })
        );
    }
}
