use std::fmt;

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  DateTime,
  Datelike,
  Duration,
  FixedOffset,
  NaiveDate,
  TimeZone,
  Utc,
  Weekday
};
use chrono_tz::Tz;
use regex::Regex;

/// Anywhere on Earth sits at UTC-12:00.
const AOE_OFFSET_SECS: i32 = 12 * 3600;

pub const DEFAULT_DISPLAY_TIMEZONE: &str =
  "Asia/Kolkata";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord
)]
pub enum DeadlineKind {
  Abstract,
  FullPaper
}

impl DeadlineKind {
  #[must_use]
  pub fn label(self) -> &'static str {
    match self {
      | DeadlineKind::Abstract => {
        "Abstract"
      }
      | DeadlineKind::FullPaper => {
        "Full Paper"
      }
    }
  }
}

impl fmt::Display for DeadlineKind {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// A submission cutoff, resolved from
/// its AoE calendar date into the
/// display timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct Deadline {
  pub kind:     DeadlineKind,
  pub source:   NaiveDate,
  pub resolved: DateTime<Tz>
}

impl Deadline {
  #[must_use]
  pub fn local_date(&self) -> NaiveDate {
    self.resolved.date_naive()
  }

  /// 12-hour clock, e.g. `05:29 PM`.
  #[must_use]
  pub fn clock_label(&self) -> String {
    self
      .resolved
      .format("%I:%M %p")
      .to_string()
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deadlines {
  pub full_paper:        Deadline,
  pub abstract_deadline: Option<Deadline>
}

impl Deadlines {
  #[tracing::instrument(skip(tz))]
  pub fn resolve(
    full_paper: NaiveDate,
    abstract_date: Option<NaiveDate>,
    tz: Tz
  ) -> anyhow::Result<Self> {
    let full_paper =
      resolve_aoe_deadline(
        DeadlineKind::FullPaper,
        full_paper,
        tz
      )?;
    let abstract_deadline =
      abstract_date
        .map(|date| {
          resolve_aoe_deadline(
            DeadlineKind::Abstract,
            date,
            tz
          )
        })
        .transpose()?;

    Ok(Self {
      full_paper,
      abstract_deadline
    })
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = &Deadline> {
    std::iter::once(&self.full_paper)
      .chain(
        self.abstract_deadline.iter()
      )
  }

  #[must_use]
  pub fn get(
    &self,
    kind: DeadlineKind
  ) -> Option<&Deadline> {
    match kind {
      | DeadlineKind::FullPaper => {
        Some(&self.full_paper)
      }
      | DeadlineKind::Abstract => {
        self.abstract_deadline.as_ref()
      }
    }
  }

  /// Local date of whichever deadline
  /// falls last.
  #[must_use]
  pub fn latest_date(&self) -> NaiveDate {
    self.iter().map(Deadline::local_date).fold(
      self.full_paper.local_date(),
      NaiveDate::max
    )
  }
}

/// Strict `YYYY-MM-DD`. Used directly as
/// a clap value parser.
pub fn parse_deadline_date(
  input: &str
) -> anyhow::Result<NaiveDate> {
  let date_re =
    Regex::new(r"^\d{4}-\d{2}-\d{2}$")
      .map_err(|e| {
        anyhow!(
          "internal regex compile \
           failure: {e}"
        )
      })?;

  let invalid = || {
    anyhow!(
      "Invalid date format. Please \
       use YYYY-MM-DD format."
    )
  };

  let token = input.trim();
  if !date_re.is_match(token) {
    return Err(invalid());
  }

  NaiveDate::parse_from_str(
    token, "%Y-%m-%d"
  )
  .map_err(|_| invalid())
}

#[tracing::instrument(skip(tz))]
pub fn resolve_aoe_deadline(
  kind: DeadlineKind,
  date: NaiveDate,
  tz: Tz
) -> anyhow::Result<Deadline> {
  let aoe = FixedOffset::west_opt(
    AOE_OFFSET_SECS
  )
  .ok_or_else(|| {
    anyhow!("invalid AoE offset")
  })?;

  let end_of_day = date
    .and_hms_micro_opt(
      23, 59, 59, 999_999
    )
    .ok_or_else(|| {
      anyhow!(
        "failed to construct end of \
         day for {date}"
      )
    })?;

  let aoe_deadline = aoe
    .from_local_datetime(&end_of_day)
    .single()
    .with_context(|| {
      format!(
        "{kind} deadline {date} has no \
         single AoE instant"
      )
    })?;

  let resolved =
    aoe_deadline.with_timezone(&tz);
  let shift =
    (resolved.date_naive() - date).num_days();
  if !(0..=1).contains(&shift) {
    return Err(anyhow!(
      "display timezone {tz} is more \
       than 12 hours ahead of UTC; \
       {kind} deadline {date} would \
       land on {}",
      resolved.date_naive()
    ));
  }
  tracing::debug!(
    %kind,
    source = %date,
    resolved = %resolved,
    "resolved AoE deadline"
  );

  Ok(Deadline {
    kind,
    source: date,
    resolved
  })
}

/// Whole days from `day` until
/// `target`; `None` once `day` is past
/// it.
#[must_use]
pub fn days_remaining(
  day: NaiveDate,
  target: NaiveDate
) -> Option<i64> {
  if day > target {
    return None;
  }
  Some((target - day).num_days())
}

#[must_use]
pub fn week_index(
  days_until_target: i64
) -> i64 {
  days_until_target.div_euclid(7)
}

/// The Sunday on or after `date`.
#[must_use]
pub fn end_of_week(
  date: NaiveDate
) -> NaiveDate {
  let offset = 6 - date
    .weekday()
    .num_days_from_monday()
    as i64;
  add_days(date, offset)
}

#[must_use]
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

#[must_use]
pub fn today_in(tz: Tz) -> NaiveDate {
  Utc::now()
    .with_timezone(&tz)
    .date_naive()
}

#[must_use]
pub fn weekday_labels()
-> [&'static str; 7] {
  [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday"
  ]
}

#[must_use]
pub fn is_week_end(
  date: NaiveDate
) -> bool {
  date.weekday() == Weekday::Sun
}

#[cfg(test)]
mod tests {
  use chrono::{
    Datelike,
    NaiveDate,
    Timelike
  };

  use super::{
    DeadlineKind,
    Deadlines,
    days_remaining,
    end_of_week,
    parse_deadline_date,
    resolve_aoe_deadline,
    week_index
  };

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn aoe_end_of_day_lands_next_afternoon_in_ist() {
    let deadline = resolve_aoe_deadline(
      DeadlineKind::FullPaper,
      ymd(2025, 8, 1),
      chrono_tz::Asia::Kolkata
    )
    .expect("resolve deadline");

    assert_eq!(
      deadline
        .resolved
        .format("%Y-%m-%d %H:%M:%S")
        .to_string(),
      "2025-08-02 17:29:59"
    );
    assert_eq!(
      deadline.local_date(),
      ymd(2025, 8, 2)
    );
    assert_eq!(
      deadline.clock_label(),
      "05:29 PM"
    );
  }

  #[test]
  fn resolved_date_is_same_or_next_day() {
    let zones = [
      chrono_tz::Asia::Kolkata,
      chrono_tz::UTC,
      chrono_tz::Asia::Tokyo,
      chrono_tz::Etc::GMTPlus12
    ];
    let mut day = ymd(2024, 1, 1);
    while day.year() == 2024 {
      for tz in zones {
        let deadline =
          resolve_aoe_deadline(
            DeadlineKind::Abstract,
            day,
            tz
          )
          .expect("resolve deadline");
        let shift = (deadline
          .local_date()
          - day)
          .num_days();
        assert!(
          shift == 0 || shift == 1,
          "{day} in {tz} shifted by \
           {shift}"
        );
      }
      day = day
        .succ_opt()
        .expect("next day");
    }
  }

  #[test]
  fn zones_past_utc_plus_twelve_are_rejected() {
    for tz in [
      chrono_tz::Pacific::Kiritimati,
      chrono_tz::Pacific::Tongatapu
    ] {
      let err = resolve_aoe_deadline(
        DeadlineKind::FullPaper,
        ymd(2025, 8, 1),
        tz
      )
      .expect_err("two-day shift");
      assert!(
        err
          .to_string()
          .contains("2025-08-03"),
        "{tz}: {err}"
      );
    }

    assert!(
      Deadlines::resolve(
        ymd(2025, 8, 1),
        None,
        chrono_tz::Pacific::Kiritimati
      )
      .is_err()
    );
  }

  #[test]
  fn utc_display_keeps_seconds_of_cutoff() {
    let deadline = resolve_aoe_deadline(
      DeadlineKind::Abstract,
      ymd(2025, 7, 25),
      chrono_tz::UTC
    )
    .expect("resolve deadline");
    assert_eq!(deadline.resolved.hour(), 11);
    assert_eq!(
      deadline.resolved.minute(),
      59
    );
    assert_eq!(
      deadline.local_date(),
      ymd(2025, 7, 26)
    );
  }

  #[test]
  fn strict_date_format_is_enforced() {
    assert_eq!(
      parse_deadline_date("2025-08-01")
        .expect("valid"),
      ymd(2025, 8, 1)
    );
    for bad in [
      "2025-8-1",
      "25-08-01",
      "2025/08/01",
      "2025-02-30",
      "2025-13-01",
      "tomorrow",
      ""
    ] {
      let err =
        parse_deadline_date(bad)
          .expect_err(bad);
      assert!(
        err
          .to_string()
          .contains("YYYY-MM-DD"),
        "{bad}: {err}"
      );
    }
  }

  #[test]
  fn countdown_and_week_index() {
    let target = ymd(2025, 8, 2);
    assert_eq!(
      days_remaining(
        ymd(2025, 7, 19),
        target
      ),
      Some(14)
    );
    assert_eq!(
      days_remaining(target, target),
      Some(0)
    );
    assert_eq!(
      days_remaining(
        ymd(2025, 8, 3),
        target
      ),
      None
    );
    assert_eq!(week_index(0), 0);
    assert_eq!(week_index(6), 0);
    assert_eq!(week_index(7), 1);
    assert_eq!(week_index(20), 2);
  }

  #[test]
  fn end_of_week_is_sunday_on_or_after() {
    // 2025-08-02 is a Saturday.
    assert_eq!(
      end_of_week(ymd(2025, 8, 2)),
      ymd(2025, 8, 3)
    );
    assert_eq!(
      end_of_week(ymd(2025, 8, 3)),
      ymd(2025, 8, 3)
    );
    assert_eq!(
      end_of_week(ymd(2025, 8, 4)),
      ymd(2025, 8, 10)
    );
  }

  #[test]
  fn latest_date_considers_abstract() {
    let deadlines = Deadlines::resolve(
      ymd(2025, 8, 1),
      Some(ymd(2025, 8, 20)),
      chrono_tz::Asia::Kolkata
    )
    .expect("resolve");
    assert_eq!(
      deadlines.latest_date(),
      ymd(2025, 8, 21)
    );
    assert_eq!(deadlines.iter().count(), 2);
  }
}
