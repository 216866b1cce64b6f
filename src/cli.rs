use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::{bill::parser::parse_date, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: recalculate the bill from the old report and the new readings.
    #[clap(name = "calculate")]
    Calculate(Box<CalculateArgs>),

    /// Development tools.
    #[clap(name = "burrow")]
    Burrow(Box<BurrowArgs>),
}

#[derive(Parser)]
pub struct CalculateArgs {
    #[clap(flatten)]
    pub old_bill: OldBillArgs,

    /// Fail on negative consumption instead of putting it into the report.
    #[clap(long, env = "METERBILL_STRICT")]
    pub strict: bool,

    /// Report date as `DD.MM.YYYY`, today by default.
    ///
    /// Only meant for reproducing a report: a new bill is normally dated today.
    #[clap(long, env = "METERBILL_DATE", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    #[clap(flatten)]
    pub message: MessageArgs,
}

impl CalculateArgs {
    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Parser)]
pub struct OldBillArgs {
    /// File with the previously sent report, `-` for the standard input.
    #[clap(long = "old-bill", env = "METERBILL_OLD_BILL", default_value = "-")]
    pub path: PathBuf,
}

impl OldBillArgs {
    pub fn read(&self) -> Result<String> {
        if self.path == Path::new("-") {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("failed to read the standard input")?;
            Ok(text)
        } else {
            fs::read_to_string(&self.path)
                .with_context(|| format!("failed to read `{}`", self.path.display()))
        }
    }
}

#[derive(Parser)]
pub struct MessageArgs {
    /// The command message. For example: `.meter cw=587 hw=49 el=8108 hw_rate=275`.
    #[clap(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub message: Vec<String>,
}

impl MessageArgs {
    #[must_use]
    pub fn text(&self) -> String {
        self.message.join(" ")
    }
}

#[derive(Parser)]
pub struct BurrowArgs {
    #[command(subcommand)]
    pub command: BurrowCommand,
}

#[derive(Subcommand)]
pub enum BurrowCommand {
    /// Parse the old bill and show what has been recognized.
    Bill(BurrowBillArgs),

    /// Parse the new readings command and show what has been recognized.
    Reading(BurrowReadingArgs),
}

#[derive(Parser)]
pub struct BurrowBillArgs {
    #[clap(flatten)]
    pub old_bill: OldBillArgs,

    /// Print JSON instead of the table.
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct BurrowReadingArgs {
    /// Print JSON instead of the table.
    #[clap(long)]
    pub json: bool,

    #[clap(flatten)]
    pub message: MessageArgs,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_verify_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_calculate() {
        let args = Args::try_parse_from([
            "meterbill",
            "calculate",
            "--old-bill",
            "old.txt",
            "--date",
            "14.10.2026",
            ".meter",
            "587",
            "49",
            "8108",
        ])
        .unwrap();
        let Command::Calculate(args) = args.command else { panic!("expected `calculate`") };
        assert_eq!(args.old_bill.path, PathBuf::from("old.txt"));
        assert_eq!(args.date(), NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        assert_eq!(args.message.text(), ".meter 587 49 8108");
        assert!(!args.strict);
    }

    #[test]
    fn test_date_defaults_to_today() {
        let args = Args::try_parse_from(["meterbill", "calculate", ".meter"]).unwrap();
        let Command::Calculate(args) = args.command else { panic!("expected `calculate`") };
        assert_eq!(args.date(), Local::now().date_naive());
    }

    #[test]
    fn test_invalid_date() {
        assert!(
            Args::try_parse_from(["meterbill", "calculate", "--date", "2026-10-14", ".meter"])
                .is_err()
        );
    }
}
