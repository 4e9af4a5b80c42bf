use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::datetime::parse_deadline_date;
use crate::grid::MAX_GRID_SIZE;

const COUNTDOWN_EPILOG: &str = "\
Examples:
  # Calendar for AAAI with both abstract and full paper deadlines
  conference-countdown \"AAAI\" --full-paper 2025-08-01 --abstract 2025-07-25

  # Calendar for a conference with only a full paper deadline
  conference-countdown \"ICML\" --full-paper 2025-06-15

Note: Dates use YYYY-MM-DD. All deadlines are AoE (Anywhere on Earth) and are
converted to the display timezone (IST, UTC+5:30, unless configured). For
example, a deadline of 2025-08-01 AoE means 2025-08-02 17:29:59 IST.";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "conference-countdown",
    version,
    about = "Generate a weekly calendar PDF for conference submission deadlines.",
    after_help = COUNTDOWN_EPILOG
)]
pub struct CountdownCli {
    /// Name of the conference/event
    pub event_name: String,

    /// Full paper submission deadline (YYYY-MM-DD) in AoE timezone
    #[arg(long = "full-paper", value_parser = parse_deadline_date)]
    pub full_paper: NaiveDate,

    /// Abstract submission deadline (YYYY-MM-DD) in AoE timezone
    #[arg(long = "abstract", value_parser = parse_deadline_date)]
    pub abstract_date: Option<NaiveDate>,

    /// Render as if today were this date (YYYY-MM-DD)
    #[arg(long = "today", value_parser = parse_deadline_date)]
    pub today: Option<NaiveDate>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hour-grid",
    version,
    about = "Generate a PDF hour grid with a header row on an A6 (palm size) page."
)]
pub struct HourGridCli {
    /// The text for the header row (also used for the default filename)
    pub heading: String,

    /// The size of the data grid (e.g. 10 for a 10x10 grid)
    #[arg(value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_GRID_SIZE)))]
    pub grid_size: u32,

    /// Output PDF filename; derived from the heading when omitted
    #[arg(long)]
    pub filename: Option<String>,

    /// Hour value per cell [default: 0.5]
    #[arg(long = "cell_value", alias = "cell-value", value_parser = parse_cell_value)]
    pub cell_value: Option<f64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Path to a sheetkit.toml config file
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn parse_cell_value(s: &str) -> anyhow::Result<f64> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| anyhow!("expected a number, got: {s}"))?;
    if !value.is_finite() {
        return Err(anyhow!("cell value must be finite, got: {s}"));
    }
    Ok(value)
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::Parser;
    use clap::error::ErrorKind;

    use super::{CountdownCli, HourGridCli, MAX_GRID_SIZE};

    #[test]
    fn countdown_parses_both_deadlines() {
        let cli = CountdownCli::try_parse_from([
            "conference-countdown",
            "AAAI",
            "--full-paper",
            "2025-08-01",
            "--abstract",
            "2025-07-25",
        ])
        .expect("parse");
        assert_eq!(cli.event_name, "AAAI");
        assert_eq!(
            cli.full_paper,
            NaiveDate::from_ymd_opt(2025, 8, 1).expect("date")
        );
        assert_eq!(cli.abstract_date, NaiveDate::from_ymd_opt(2025, 7, 25));
        assert_eq!(cli.today, None);
    }

    #[test]
    fn countdown_rejects_bad_dates_as_usage_errors() {
        let err = CountdownCli::try_parse_from([
            "conference-countdown",
            "AAAI",
            "--full-paper",
            "2025-8-1",
        ])
        .expect_err("bad date");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("YYYY-MM-DD"));

        let err = CountdownCli::try_parse_from(["conference-countdown", "AAAI"])
            .expect_err("missing full paper");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn hour_grid_defaults_and_flags() {
        let cli = HourGridCli::try_parse_from(["hour-grid", "Deep Work", "12", "-vv"])
            .expect("parse");
        assert_eq!(cli.grid_size, 12);
        assert_eq!(cli.cell_value, None);
        assert_eq!(cli.filename, None);
        assert_eq!(cli.common.verbose, 2);

        let cli = HourGridCli::try_parse_from([
            "hour-grid",
            "Deep Work",
            "5",
            "--cell_value",
            "0.25",
            "--filename",
            "out.pdf",
        ])
        .expect("parse");
        assert_eq!(cli.cell_value, Some(0.25));
        assert_eq!(cli.filename.as_deref(), Some("out.pdf"));
    }

    #[test]
    fn hour_grid_accepts_largest_size() {
        let cli = HourGridCli::try_parse_from(["hour-grid", "H", "100"]).expect("parse");
        assert_eq!(cli.grid_size, MAX_GRID_SIZE);
    }

    #[test]
    fn hour_grid_rejects_out_of_range_size() {
        for size in ["0", "-3", "ten", "101", "100000"] {
            assert!(
                HourGridCli::try_parse_from(["hour-grid", "H", size]).is_err(),
                "{size}"
            );
        }
        assert!(
            HourGridCli::try_parse_from(["hour-grid", "H", "4", "--cell_value", "inf"]).is_err()
        );
    }
}
