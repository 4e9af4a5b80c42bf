use chrono::{
  Datelike,
  NaiveDate
};

use crate::datetime::{
  Deadlines,
  add_days,
  end_of_week,
  is_week_end
};

/// Seven Monday-aligned slots.
pub type WeekRow = [Option<NaiveDate>; 7];

/// First and last day shown on the
/// countdown calendar.
#[must_use]
pub fn calendar_span(
  today: NaiveDate,
  deadlines: &Deadlines
) -> (NaiveDate, NaiveDate) {
  (
    today,
    end_of_week(deadlines.latest_date())
  )
}

/// Partitions `start..=end` into
/// Monday-aligned rows. Rows holding no
/// date on or after `today` are dropped.
#[tracing::instrument]
pub fn bucketize_weeks(
  start: NaiveDate,
  end: NaiveDate,
  today: NaiveDate
) -> Vec<WeekRow> {
  let mut weeks = Vec::new();
  let mut current: Vec<Option<NaiveDate>> =
    Vec::with_capacity(7);

  let mut day = start;
  while day <= end {
    if current.is_empty() {
      let offset = day
        .weekday()
        .num_days_from_monday()
        as usize;
      current.resize(offset, None);
    }

    current.push(Some(day));

    if is_week_end(day) {
      flush_week(
        &mut weeks,
        &mut current,
        today
      );
    }

    let next = add_days(day, 1);
    if next == day {
      break;
    }
    day = next;
  }

  if !current.is_empty() {
    flush_week(
      &mut weeks,
      &mut current,
      today
    );
  }

  tracing::debug!(
    rows = weeks.len(),
    %start,
    %end,
    "bucketized calendar weeks"
  );
  weeks
}

fn flush_week(
  weeks: &mut Vec<WeekRow>,
  current: &mut Vec<Option<NaiveDate>>,
  today: NaiveDate
) {
  let has_future = current
    .iter()
    .flatten()
    .any(|date| *date >= today);

  if has_future {
    let mut row: WeekRow = [None; 7];
    for (slot, value) in
      row.iter_mut().zip(current.iter())
    {
      *slot = *value;
    }
    weeks.push(row);
  } else {
    tracing::trace!(
      "dropping week with no \
       upcoming dates"
    );
  }

  current.clear();
}
