#![doc = include_str!("../README.md")]

mod bill;
mod calculator;
mod cli;
mod decimal;
mod error;
#[cfg(test)]
mod fixtures;
mod prelude;
mod reading;
mod tables;
mod utility;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    calculator::{Calculator, Report},
    cli::{Args, BurrowBillArgs, BurrowCommand, BurrowReadingArgs, CalculateArgs, Command},
    prelude::*,
    tables::{build_bill_table, build_reading_table},
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Calculate(args) => {
            println!("{}", calculate(&args)?);
        }
        Command::Burrow(args) => match args.command {
            BurrowCommand::Bill(args) => burrow_bill(&args)?,
            BurrowCommand::Reading(args) => burrow_reading(&args)?,
        },
    }

    info!("done!");
    Ok(())
}

/// New readings are checked first, so that a typo is reported before the old bill is even read.
#[instrument(skip_all)]
fn calculate(args: &CalculateArgs) -> Result<Report> {
    let new = reading::parser::parse_command(&args.message.text())?.input;
    let old = bill::parser::parse(&args.old_bill.read()?)
        .context("Не удалось разобрать старые показания")?;
    let report =
        Calculator::builder().today(args.date()).strict(args.strict).build().calculate(&old, &new)?;
    Ok(report)
}

#[instrument(skip_all)]
fn burrow_bill(args: &BurrowBillArgs) -> Result {
    let bill = bill::parser::parse(&args.old_bill.read()?)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&bill)?);
    } else {
        info!(sections = bill.utilities().count(), "gotcha");
        println!("{}", build_bill_table(&bill));
    }
    Ok(())
}

#[instrument(skip_all)]
fn burrow_reading(args: &BurrowReadingArgs) -> Result {
    let parsed = reading::parser::parse(&args.message.text())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        info!(grammar = %parsed.grammar, "gotcha");
        println!("{}", build_reading_table(&parsed));
    }
    Ok(())
}
