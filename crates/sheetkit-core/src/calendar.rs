use chrono::{
  Datelike,
  NaiveDate
};

use crate::datetime::{
  DeadlineKind,
  Deadlines,
  days_remaining,
  week_index,
  weekday_labels
};
use crate::metrics::{
  string_width,
  wrap_text
};
use crate::render::{
  Canvas,
  Font,
  Rect,
  Rgb,
  TextRun,
  centered_baseline
};
use crate::weeks::{
  bucketize_weeks,
  calendar_span
};

const LETTER: (f64, f64) = (612.0, 792.0);
const MARGIN_X: f64 = 15.0;
const MARGIN_Y: f64 = 20.0;

const COLUMN_WIDTH: f64 = 82.0;
const TITLE_HEIGHT: f64 = 40.0;
const HEADER_HEIGHT: f64 = 25.0;
const WEEK_HEIGHT: f64 = 70.0;
const CELL_PAD_X: f64 = 3.0;
const CELL_PAD_TOP: f64 = 2.0;
const LEADING: f64 = 1.2;
const MARKER_GAP: f64 = 4.0;

const TITLE_SIZE: f64 = 18.0;
const HEADER_SIZE: f64 = 10.0;
const DATE_SIZE: f64 = 11.0;
const WEEK_BADGE_SIZE: f64 = 9.0;
const LABEL_SIZE: f64 = 12.0;
const COUNTDOWN_SIZE: f64 = 28.0;
const GRID_LINE: f64 = 0.25;

const TITLE_COLOR: Rgb = Rgb::hex(0x2C3E50);
const HEADER_BG: Rgb = Rgb::hex(0x2C3E50);
const HEADER_TEXT: Rgb = Rgb::hex(0xF5F5F5);
const BODY_BG: Rgb = Rgb::hex(0xECF0F1);
const BODY_ALT_BG: Rgb = Rgb::hex(0xF8F9F9);
const GRID_COLOR: Rgb = Rgb::hex(0xBDC3C7);
const TODAY_COLOR: Rgb = Rgb::hex(0xE67E22);
const FULL_PAPER_COLOR: Rgb =
  Rgb::hex(0x2980B9);
const ABSTRACT_COLOR: Rgb =
  Rgb::hex(0x3498DB);
const FULL_PAPER_BG: Rgb =
  Rgb::hex(0xD4E6F1);
const ABSTRACT_BG: Rgb =
  Rgb::hex(0xD6EAF8);

fn accent(kind: DeadlineKind) -> Rgb {
  match kind {
    | DeadlineKind::Abstract => {
      ABSTRACT_COLOR
    }
    | DeadlineKind::FullPaper => {
      FULL_PAPER_COLOR
    }
  }
}

fn highlight(kind: DeadlineKind) -> Rgb {
  match kind {
    | DeadlineKind::Abstract => {
      ABSTRACT_BG
    }
    | DeadlineKind::FullPaper => {
      FULL_PAPER_BG
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayMarker {
  /// The deadline itself, with its local
  /// clock time.
  DeadlineLabel {
    kind:  DeadlineKind,
    clock: String
  },
  DaysRemaining(i64),
  None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
  pub date:       NaiveDate,
  pub is_today:   bool,
  pub week_index: Option<i64>,
  pub marker:     DayMarker,
  pub highlight:  Option<DeadlineKind>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayCell {
  Blank,
  Day(DayView)
}

impl DayCell {
  #[must_use]
  pub fn view(&self) -> Option<&DayView> {
    match self {
      | DayCell::Day(view) => Some(view),
      | DayCell::Blank => None
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownCalendar {
  pub title: String,
  pub today: NaiveDate,
  pub rows:  Vec<[DayCell; 7]>
}

/// Lays out one cell per day from
/// `today` through the week of the last
/// deadline.
#[tracing::instrument(skip(deadlines))]
pub fn build_calendar(
  event_name: &str,
  deadlines: &Deadlines,
  today: NaiveDate
) -> CountdownCalendar {
  let (start, end) =
    calendar_span(today, deadlines);
  let title = format!(
    "{event_name}-{}",
    deadlines.latest_date().year()
  );

  let rows: Vec<[DayCell; 7]> =
    bucketize_weeks(start, end, today)
      .into_iter()
      .map(|week| {
        week.map(|slot| {
          slot.map_or(
            DayCell::Blank,
            |date| {
              day_cell(
                date, deadlines, today
              )
            }
          )
        })
      })
      .filter(|row| {
        row.iter().any(|cell| {
          *cell != DayCell::Blank
        })
      })
      .collect();

  tracing::info!(
    %title,
    rows = rows.len(),
    "built countdown calendar"
  );
  CountdownCalendar {
    title,
    today,
    rows
  }
}

fn day_cell(
  date: NaiveDate,
  deadlines: &Deadlines,
  today: NaiveDate
) -> DayCell {
  let full_paper = &deadlines.full_paper;
  let full_date = full_paper.local_date();
  if date > full_date {
    return DayCell::Blank;
  }

  let upcoming_on = |kind| {
    deadlines.get(kind).is_some_and(
      |deadline| {
        let local = deadline.local_date();
        local == date && local >= today
      }
    )
  };

  let mut view = DayView {
    date,
    is_today: date == today,
    week_index: None,
    marker: DayMarker::None,
    highlight: None
  };

  if upcoming_on(DeadlineKind::FullPaper)
  {
    view.highlight =
      Some(DeadlineKind::FullPaper);
  }

  if upcoming_on(DeadlineKind::Abstract)
    && let Some(deadline) = deadlines
      .get(DeadlineKind::Abstract)
  {
    view.highlight =
      Some(DeadlineKind::Abstract);
    view.marker =
      DayMarker::DeadlineLabel {
        kind:  DeadlineKind::Abstract,
        clock: deadline.clock_label()
      };
    return DayCell::Day(view);
  }

  if full_date >= today {
    match days_remaining(date, full_date)
    {
      | Some(0) => {
        view.marker =
          DayMarker::DeadlineLabel {
            kind:  DeadlineKind::FullPaper,
            clock: full_paper.clock_label()
          };
      }
      | Some(days) => {
        view.marker =
          DayMarker::DaysRemaining(days);
      }
      | None => {}
    }
  }

  view.week_index =
    days_remaining(date, full_date)
      .map(week_index);

  DayCell::Day(view)
}

/// Page size for a calendar with `rows`
/// week rows. Grows past US Letter only
/// when the table would not otherwise
/// fit on one page.
#[must_use]
pub fn calendar_page_size(
  rows: usize
) -> (f64, f64) {
  let rows_f = rows as f64;
  let preferred = (30.0
    + (rows_f + 1.0) * 100.0)
    .min(LETTER.1);
  let needed =
    table_height(rows) + 2.0 * MARGIN_Y;
  (LETTER.0, preferred.max(needed))
}

fn table_height(rows: usize) -> f64 {
  TITLE_HEIGHT
    + HEADER_HEIGHT
    + rows as f64 * WEEK_HEIGHT
}

#[tracing::instrument(skip_all)]
pub fn render_calendar<C: Canvas>(
  calendar: &CountdownCalendar,
  canvas: &mut C
) {
  let (page_width, page_height) =
    canvas.size();
  let table_width = COLUMN_WIDTH * 7.0;
  let left = ((page_width - table_width)
    / 2.0)
    .max(MARGIN_X);
  let top = page_height - MARGIN_Y;

  let title_rect = Rect::new(
    left,
    top - TITLE_HEIGHT,
    table_width,
    TITLE_HEIGHT
  );
  let header_top = title_rect.y;
  let body_top = header_top - HEADER_HEIGHT;

  let cell_rect = |row: usize, col: usize| {
    Rect::new(
      left + col as f64 * COLUMN_WIDTH,
      body_top
        - (row as f64 + 1.0) * WEEK_HEIGHT,
      COLUMN_WIDTH,
      WEEK_HEIGHT
    )
  };
  let header_rect = |col: usize| {
    Rect::new(
      left + col as f64 * COLUMN_WIDTH,
      body_top,
      COLUMN_WIDTH,
      HEADER_HEIGHT
    )
  };

  canvas.fill_rect(title_rect, Rgb::WHITE);
  for col in 0..7 {
    canvas
      .fill_rect(header_rect(col), HEADER_BG);
  }
  for (row_idx, row) in
    calendar.rows.iter().enumerate() {
    let base = if row_idx % 2 == 1 {
      BODY_ALT_BG
    } else {
      BODY_BG
    };
    for (col, cell) in
      row.iter().enumerate() {
      let color = cell
        .view()
        .and_then(|view| view.highlight)
        .map_or(base, highlight);
      canvas.fill_rect(
        cell_rect(row_idx, col),
        color
      );
    }
  }

  canvas.stroke_rect(
    title_rect,
    GRID_COLOR,
    GRID_LINE
  );
  for col in 0..7 {
    canvas.stroke_rect(
      header_rect(col),
      GRID_COLOR,
      GRID_LINE
    );
    for row_idx in 0..calendar.rows.len() {
      canvas.stroke_rect(
        cell_rect(row_idx, col),
        GRID_COLOR,
        GRID_LINE
      );
    }
  }

  draw_centered(
    canvas,
    &calendar.title,
    Font::HelveticaBold,
    TITLE_SIZE,
    TITLE_COLOR,
    title_rect.x,
    title_rect.width,
    centered_baseline(
      title_rect.y,
      title_rect.height,
      TITLE_SIZE,
      0.15
    )
  );

  for (col, label) in
    weekday_labels().iter().enumerate() {
    let rect = header_rect(col);
    draw_centered(
      canvas,
      label,
      Font::Helvetica,
      HEADER_SIZE,
      HEADER_TEXT,
      rect.x,
      rect.width,
      centered_baseline(
        rect.y,
        rect.height,
        HEADER_SIZE,
        0.15
      )
    );
  }

  for (row_idx, row) in
    calendar.rows.iter().enumerate() {
    for (col, cell) in
      row.iter().enumerate() {
      if let Some(view) = cell.view() {
        draw_day(
          canvas,
          view,
          cell_rect(row_idx, col)
        );
      }
    }
  }
}

fn draw_day<C: Canvas>(
  canvas: &mut C,
  view: &DayView,
  rect: Rect
) {
  let x = rect.x + CELL_PAD_X;
  let width = rect.width - 2.0 * CELL_PAD_X;
  let mut cursor = rect.top() - CELL_PAD_TOP;

  let date_color = if view.is_today {
    TODAY_COLOR
  } else {
    Rgb::BLACK
  };
  cursor = draw_lines(
    canvas,
    &view.date.format("%d-%b-%Y").to_string(),
    Font::HelveticaBold,
    DATE_SIZE,
    date_color,
    x,
    width,
    cursor
  );

  if let Some(weeks) = view.week_index {
    cursor = draw_lines(
      canvas,
      &format!("W{weeks}"),
      Font::HelveticaBold,
      WEEK_BADGE_SIZE,
      FULL_PAPER_COLOR,
      x,
      width,
      cursor
    );
  }

  match &view.marker {
    | DayMarker::DeadlineLabel {
      kind,
      clock
    } => {
      draw_lines(
        canvas,
        &format!("* {kind} ({clock})"),
        Font::HelveticaBold,
        LABEL_SIZE,
        accent(*kind),
        x,
        width,
        cursor - MARKER_GAP
      );
    }
    | DayMarker::DaysRemaining(days) => {
      draw_lines(
        canvas,
        &days.to_string(),
        Font::HelveticaBold,
        COUNTDOWN_SIZE,
        FULL_PAPER_COLOR,
        x,
        width,
        cursor - MARKER_GAP
      );
    }
    | DayMarker::None => {}
  }
}

/// Wraps `text` to `width` and draws it
/// downward from `top`. Returns the
/// position below the last line.
#[allow(clippy::too_many_arguments)]
fn draw_lines<C: Canvas>(
  canvas: &mut C,
  text: &str,
  font: Font,
  size: f64,
  color: Rgb,
  x: f64,
  width: f64,
  top: f64
) -> f64 {
  let mut cursor = top;
  for line in
    wrap_text(text, font, size, width)
  {
    draw_centered(
      canvas,
      &line,
      font,
      size,
      color,
      x,
      width,
      cursor - size
    );
    cursor -= size * LEADING;
  }
  cursor
}

#[allow(clippy::too_many_arguments)]
fn draw_centered<C: Canvas>(
  canvas: &mut C,
  text: &str,
  font: Font,
  size: f64,
  color: Rgb,
  x: f64,
  width: f64,
  baseline: f64
) {
  let text_width =
    string_width(text, font, size);
  canvas.draw_text(TextRun {
    text: text.to_string(),
    font,
    size,
    color,
    x: x + (width - text_width) / 2.0,
    y: baseline
  });
}
