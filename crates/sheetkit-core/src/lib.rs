pub mod calendar;
pub mod cli;
pub mod config;
pub mod datetime;
pub mod grid;
pub mod metrics;
pub mod naming;
pub mod render;
pub mod weeks;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

use crate::render::PdfCanvas;

/// Entry point for
/// `conference-countdown`.
#[tracing::instrument(skip_all)]
pub fn run_countdown(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::CountdownCli::parse_from(raw_args);

  cli::init_tracing(
    cli.common.verbose,
    cli.common.quiet
  )?;
  info!(
    event = %cli.event_name,
    "starting conference countdown"
  );

  let cfg = config::Config::load(
    cli.common.config.as_deref()
  )?;
  debug!(config = ?cfg.loaded_file, "config resolved");
  let today = cli.today.unwrap_or_else(
    || datetime::today_in(cfg.timezone)
  );
  debug!(%today, timezone = %cfg.timezone, "resolved today");

  let path = write_countdown(
    &cfg,
    &cli.event_name,
    cli.full_paper,
    cli.abstract_date,
    today
  )?;

  println!(
    "Calendar generated: {}",
    path.display()
  );
  info!("done");
  Ok(())
}

/// Builds and saves the countdown
/// calendar, returning where it was
/// written.
#[tracing::instrument(skip(cfg))]
pub fn write_countdown(
  cfg: &config::Config,
  event_name: &str,
  full_paper: chrono::NaiveDate,
  abstract_date: Option<chrono::NaiveDate>,
  today: chrono::NaiveDate
) -> anyhow::Result<PathBuf> {
  let deadlines =
    datetime::Deadlines::resolve(
      full_paper,
      abstract_date,
      cfg.timezone
    )?;
  for deadline in deadlines.iter() {
    info!(
      kind = %deadline.kind,
      aoe = %deadline.source,
      local = %deadline.resolved,
      "deadline"
    );
  }
  let calendar = calendar::build_calendar(
    event_name, &deadlines, today
  );
  debug!(
    today = %calendar.today,
    rows = calendar.rows.len(),
    "calendar laid out"
  );

  let (width, height) =
    calendar::calendar_page_size(
      calendar.rows.len()
    );
  let mut canvas = PdfCanvas::new(
    &calendar.title,
    width,
    height
  )?;
  calendar::render_calendar(
    &calendar,
    &mut canvas
  );

  let path = cfg.output_path(
    &naming::countdown_filename(
      event_name
    )?
  )?;
  canvas.save(&path).with_context(
    || {
      format!(
        "failed to save countdown \
         calendar for {event_name}"
      )
    }
  )?;
  Ok(path)
}

/// Entry point for `hour-grid`.
#[tracing::instrument(skip_all)]
pub fn run_hour_grid(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::HourGridCli::parse_from(raw_args);

  cli::init_tracing(
    cli.common.verbose,
    cli.common.quiet
  )?;
  info!(
    heading = %cli.heading,
    grid_size = cli.grid_size,
    "starting hour grid"
  );

  let cfg = config::Config::load(
    cli.common.config.as_deref()
  )?;
  debug!(config = ?cfg.loaded_file, "config resolved");
  let step = cli
    .cell_value
    .unwrap_or(cfg.grid_cell_value);

  let file_name = match cli.filename {
    | Some(name) => name,
    | None => {
      naming::hour_grid_filename(
        &cli.heading
      )?
    }
  };

  let summary = write_hour_grid(
    &cfg,
    &file_name,
    &cli.heading,
    cli.grid_size,
    step
  )?;

  println!("{summary}");
  info!("done");
  Ok(())
}

/// Renders the grid to
/// `output_dir/file_name` and returns
/// the summary to report.
#[tracing::instrument(skip(cfg))]
pub fn write_hour_grid(
  cfg: &config::Config,
  file_name: &str,
  heading: &str,
  grid_size: u32,
  step: f64
) -> anyhow::Result<grid::GridSummary> {
  let layout =
    grid::GridLayout::a6(grid_size)?;
  let mut canvas = PdfCanvas::new(
    heading,
    layout.page_width,
    layout.page_height
  )?;
  let cells = grid::render_hour_grid(
    heading,
    &layout,
    step,
    &mut canvas
  );

  let path = cfg.output_path(file_name)?;
  canvas.save(&path).with_context(
    || {
      format!(
        "failed to save hour grid \
         {file_name}"
      )
    }
  )?;

  Ok(grid::GridSummary::new(
    &path.display().to_string(),
    heading,
    &layout,
    cells.len(),
    step
  ))
}
