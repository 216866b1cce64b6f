use rust_decimal::Decimal;

use crate::utility::Utility;

/// Every way a bill recalculation can fail.
///
/// All of them are caused by the input messages and are meant to be shown to the user as is.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum BillingError {
    #[error("Некорректное число: `{0}`")]
    MalformedNumber(String),

    #[error(
        "Не смог распознать команду. Форматы: 'cw=587 hw=49 el=8108 hw_rate=275' или '587 49 8108'."
    )]
    UnrecognizedCommand,

    #[error("Лишнее поле запрещено: `{0}`")]
    UnknownField(String),

    #[error("Не найдена {0} в сообщении")]
    MissingField(BillField),

    #[error("Некорректная дата: `{0}`")]
    MalformedDate(String),

    #[error("Раздел «{utility}» найден, но не распознан")]
    MalformedSection { utility: Utility },

    #[error("Отсутствует тариф (rate) для «{utility}» в старом сообщении, и он не указан в команде.")]
    MissingRate { utility: Utility },

    #[error("Раздел «{utility}» отсутствует в старом сообщении, расход не посчитать")]
    MissingReading { utility: Utility },

    #[error("Слишком большие числа для расчёта")]
    Overflow,

    #[error("Отрицательный расход для «{utility}»: {previous} → {current}")]
    NegativeConsumption { utility: Utility, previous: Decimal, current: Decimal },
}

/// Mandatory old bill fields.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum BillField {
    #[display("общая сумма")]
    Total,

    #[display("дата")]
    Date,
}
