use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};
use rust_decimal::Decimal;

use crate::{
    bill::{Bill, parser::DATE_FORMAT},
    reading::{Field, parser::ParsedReading},
    utility::Utility,
};

const ABSENT: &str = "—";

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn number(value: Decimal) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn absent() -> Cell {
    Cell::new(ABSENT).add_attribute(Attribute::Dim)
}

pub fn build_bill_table(bill: &Bill) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Utility", "Previous", "Current", "Consumption", "Rate", "Amount"]);
    for utility in Utility::ALL {
        let Some(reading) = bill.reading(utility) else {
            table.add_row(vec![Cell::new(utility), absent()]);
            continue;
        };
        // Disposal readings are synthesized, not read from the text.
        let meter = |value| {
            if utility.is_metered() { number(value) } else { number(value).add_attribute(Attribute::Dim) }
        };
        table.add_row(vec![
            Cell::new(utility),
            meter(reading.previous),
            meter(reading.current),
            number(reading.consumption),
            number(reading.rate),
            number(reading.amount),
        ]);
    }
    table.add_row(vec![
        Cell::new("Итого").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        number(bill.total).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("#счетчики").add_attribute(Attribute::Dim),
        Cell::new(bill.date.format(DATE_FORMAT)),
    ]);
    table
}

pub fn build_reading_table(parsed: &ParsedReading) -> Table {
    let input = &parsed.input;
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    for (field, value) in Field::READINGS.into_iter().zip([input.cw, input.hw, input.el]) {
        table.add_row(vec![Cell::new(field), number(value)]);
    }
    for (field, value) in [
        (Field::ColdWaterRate, input.cw_rate),
        (Field::HotWaterRate, input.hw_rate),
        (Field::WaterDisposalRate, input.wd_rate),
        (Field::ElectricityRate, input.el_rate),
    ] {
        table.add_row(vec![Cell::new(field), value.map_or_else(absent, number)]);
    }
    table
}
