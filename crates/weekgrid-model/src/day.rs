use std::fmt;

use chrono::{
  Datelike,
  Duration,
  NaiveDate,
  Weekday
};
use serde::{
  Deserialize,
  Serialize
};

// 1970-01-01 counted from 0001-01-01 (day 1).
const UNIX_EPOCH_DAYS_FROM_CE: i32 =
  719_163;

pub const DAYS_PER_WEEK: i64 = 7;

/// Calendar day as a plain scalar: days
/// since 1970-01-01. Used as the task map
/// key so equality never depends on time of
/// day or object identity.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct DayIndex(i32);

impl DayIndex {
  #[must_use]
  pub const fn from_raw(
    days: i32
  ) -> Self {
    Self(days)
  }

  #[must_use]
  pub const fn raw(self) -> i32 {
    self.0
  }

  #[must_use]
  pub fn from_date(
    date: NaiveDate
  ) -> Self {
    Self(
      date.num_days_from_ce()
        - UNIX_EPOCH_DAYS_FROM_CE
    )
  }

  #[must_use]
  pub fn to_date(
    self
  ) -> Option<NaiveDate> {
    self
      .0
      .checked_add(
        UNIX_EPOCH_DAYS_FROM_CE
      )
      .and_then(
        NaiveDate::from_num_days_from_ce_opt
      )
  }

  #[must_use]
  pub fn offset(
    self,
    days: i32
  ) -> Self {
    Self(self.0.saturating_add(days))
  }

  /// `None` past the end of the `i32`
  /// range.
  #[must_use]
  pub fn checked_offset(
    self,
    days: i32
  ) -> Option<Self> {
    self.0.checked_add(days).map(Self)
  }
}

impl From<NaiveDate> for DayIndex {
  fn from(date: NaiveDate) -> Self {
    Self::from_date(date)
  }
}

impl fmt::Display for DayIndex {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self.to_date() {
      | Some(date) => {
        write!(
          f,
          "{}",
          date.format("%Y-%m-%d")
        )
      }
      | None => write!(f, "day#{}", self.0)
    }
  }
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
pub fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let day_idx = day
    .weekday()
    .num_days_from_monday()
    as i64;
  let start_idx = week_start
    .num_days_from_monday()
    as i64;
  let diff =
    (DAYS_PER_WEEK + day_idx - start_idx)
      % DAYS_PER_WEEK;
  add_days(day, -diff)
}

#[must_use]
pub fn monday_of(
  day: NaiveDate
) -> NaiveDate {
  start_of_week(day, Weekday::Mon)
}

#[must_use]
pub fn weekday_name(
  date: NaiveDate
) -> String {
  date.format("%A").to_string()
}

#[must_use]
pub fn month_title(
  date: NaiveDate
) -> String {
  date.format("%B %Y").to_string()
}
