//! New reading command parser.
//!
//! Users type either keyed pairs, `cw=587 hw=49 el=8108 hw_rate=275`, or three bare numbers
//! optionally followed by rate overrides, `587 49 8108 hw_rate=275`. The keyed form wins whenever
//! it yields all the three readings.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    decimal::{NUMBER_PATTERN, normalize},
    error::BillingError,
    prelude::*,
    reading::{Field, ReadingInput},
};

static COMMAND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[/.]?meter").unwrap());

static KEYED_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(\w+)\s*=\s*({NUMBER_PATTERN})")).unwrap());

static RATE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)(\w+_rate)\s*=\s*({NUMBER_PATTERN})")).unwrap());

/// A leading minus is captured so that a negative reading is rejected instead of losing its sign.
static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"-?\b{NUMBER_PATTERN}\b")).unwrap());

/// Which of the input forms has been recognized.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Grammar {
    #[display("keyed")]
    Keyed,

    #[display("positional")]
    Positional,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ParsedReading {
    pub grammar: Grammar,
    pub input: ReadingInput,
}

/// Whether the message is the meter command: `meter`, `/meter`, or `.meter`.
#[must_use]
pub fn is_command(text: &str) -> bool {
    COMMAND.is_match(text)
}

/// Everything after the command token.
#[must_use]
pub fn payload(text: &str) -> &str {
    text.trim_start().split_once(char::is_whitespace).map_or("", |(_, rest)| rest.trim_start())
}

/// Parse the meter command, refusing any other message.
pub fn parse_command(text: &str) -> Result<ParsedReading, BillingError> {
    if !is_command(text) {
        return Err(BillingError::UnrecognizedCommand);
    }
    parse(text)
}

/// Parse the whole command message, including the leading command token.
#[instrument(skip_all)]
pub fn parse(text: &str) -> Result<ParsedReading, BillingError> {
    let payload = payload(text);
    let parsed = match parse_keyed(payload)? {
        Some(input) => ParsedReading { grammar: Grammar::Keyed, input },
        None => ParsedReading { grammar: Grammar::Positional, input: parse_positional(payload)? },
    };
    debug!(
        grammar = %parsed.grammar,
        cw = %parsed.input.cw,
        hw = %parsed.input.hw,
        el = %parsed.input.el,
        "parsed the new readings",
    );
    Ok(parsed)
}

/// `None` means the keyed form does not apply and the positional one should be tried.
fn parse_keyed(payload: &str) -> Result<Option<ReadingInput>, BillingError> {
    if !payload.contains('=') {
        return Ok(None);
    }
    let pairs: Vec<(&str, &str)> = KEYED_PAIR
        .captures_iter(payload)
        .map(|captures| {
            let (_, [key, value]) = captures.extract();
            (key, value)
        })
        .collect();
    let known: HashSet<Field> = pairs.iter().filter_map(|(key, _)| key.parse().ok()).collect();
    if !Field::READINGS.iter().all(|field| known.contains(field)) {
        trace!(n_pairs = pairs.len(), "no complete keyed readings");
        return Ok(None);
    }
    let fields = parse_pairs(pairs)?;
    Ok(ReadingInput::from_fields(fields))
}

fn parse_positional(payload: &str) -> Result<ReadingInput, BillingError> {
    let readings = NUMBER_TOKEN
        .find_iter(payload)
        .take(Field::READINGS.len())
        .map(|token| normalize(token.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let &[cw, hw, el] = readings.as_slice() else {
        return Err(BillingError::UnrecognizedCommand);
    };
    let rates = parse_pairs(RATE_PAIR.captures_iter(payload).map(|captures| {
        let (_, [key, value]) = captures.extract();
        (key, value)
    }))?;
    let fields = Field::READINGS.into_iter().zip([cw, hw, el]).chain(rates);
    ReadingInput::from_fields(fields).ok_or(BillingError::UnrecognizedCommand)
}

/// Any unknown key rejects the whole command.
fn parse_pairs<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Vec<(Field, Decimal)>, BillingError> {
    pairs
        .into_iter()
        .map(|(key, value)| -> Result<_, BillingError> { Ok((key.parse()?, normalize(value)?)) })
        .collect()
}
