use rust_decimal::Decimal;
use serde::Serialize;

/// The four billed utilities, in report order.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Utility {
    #[display("Хол. вода")]
    ColdWater,

    #[display("Гор. вода")]
    HotWater,

    #[display("Водоотведение")]
    WaterDisposal,

    #[display("Электроэнергия")]
    Electricity,
}

impl Utility {
    pub const ALL: [Self; 4] = [Self::ColdWater, Self::HotWater, Self::WaterDisposal, Self::Electricity];

    /// Rate to use when the old bill has no section for the utility and the command has no override.
    ///
    /// Disposal without history is considered untracked, everything else must have a rate.
    pub const fn no_history_rate(self) -> Option<Decimal> {
        match self {
            Self::WaterDisposal => Some(Decimal::ZERO),
            Self::ColdWater | Self::HotWater | Self::Electricity => None,
        }
    }

    /// Whether the utility has a cumulative meter («Было» / «Стало»).
    pub const fn is_metered(self) -> bool {
        !matches!(self, Self::WaterDisposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_report_labels() {
        assert_eq!(Utility::ColdWater.to_string(), "Хол. вода");
        assert_eq!(Utility::Electricity.to_string(), "Электроэнергия");
    }

    #[test]
    fn test_no_history_rate() {
        assert_eq!(Utility::WaterDisposal.no_history_rate(), Some(Decimal::ZERO));
        assert_eq!(Utility::HotWater.no_history_rate(), None);
    }
}
