use anyhow::anyhow;
use chrono::{
  Local,
  NaiveDate,
  Weekday
};
use regex::Regex;
use weekgrid_model::day::{
  DAYS_PER_WEEK,
  add_days
};

use crate::config::{
  Config,
  parse_iso_date
};

/// Cell address typed in a session
/// command.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum CellRef {
  Today,
  Date(NaiveDate),
  Column {
    weekday: Weekday,
    row:     u32
  }
}

impl CellRef {
  #[must_use]
  pub fn resolve(
    self,
    week_start: NaiveDate,
    today: NaiveDate
  ) -> NaiveDate {
    match self {
      | Self::Today => today,
      | Self::Date(date) => date,
      | Self::Column { weekday, row } => {
        let column = weekday
          .num_days_from_monday()
          as i64;
        add_days(
          week_start,
          column
            + DAYS_PER_WEEK * i64::from(row)
        )
      }
    }
  }
}

pub fn parse_cell_ref(
  token: &str
) -> anyhow::Result<CellRef> {
  let token = token.trim();
  if token.eq_ignore_ascii_case("today") {
    return Ok(CellRef::Today);
  }

  let iso_re =
    Regex::new(r"^\d{4}-\d{2}-\d{2}$")
      .map_err(|e| {
        anyhow!("bad date pattern: {e}")
      })?;
  if iso_re.is_match(token) {
    return Ok(CellRef::Date(
      parse_iso_date(token)?
    ));
  }

  let column_re = Regex::new(
    r"(?i)^(?P<day>[a-z]+)(?:/(?P<row>\d{1,2}))?$",
  )
  .map_err(|e| {
    anyhow!("bad cell pattern: {e}")
  })?;
  let captures = column_re
    .captures(token)
    .ok_or_else(|| {
      anyhow!(
        "invalid cell: {token} (expected \
         weekday[/row], YYYY-MM-DD or \
         today)"
      )
    })?;

  let day_token = captures
    .name("day")
    .map(|m| m.as_str().to_ascii_lowercase())
    .unwrap_or_default();
  let weekday = parse_weekday_name(
    &day_token
  )
  .ok_or_else(|| {
    anyhow!("unknown weekday: {day_token}")
  })?;
  let row = match captures.name("row") {
    | Some(m) => {
      m.as_str().parse::<u32>().map_err(
        |e| anyhow!("invalid row: {e}")
      )?
    }
    | None => 0
  };

  Ok(CellRef::Column { weekday, row })
}

fn parse_weekday_name(
  token: &str
) -> Option<Weekday> {
  match token.trim() {
    | "monday" | "mon" => {
      Some(Weekday::Mon)
    }
    | "tuesday" | "tue" | "tues" => {
      Some(Weekday::Tue)
    }
    | "wednesday" | "wed" => {
      Some(Weekday::Wed)
    }
    | "thursday" | "thu" | "thur"
    | "thurs" => Some(Weekday::Thu),
    | "friday" | "fri" => {
      Some(Weekday::Fri)
    }
    | "saturday" | "sat" => {
      Some(Weekday::Sat)
    }
    | "sunday" | "sun" => {
      Some(Weekday::Sun)
    }
    | _ => None
  }
}

/// The planner never reads the clock;
/// this is the one place that does.
#[must_use]
pub fn resolve_today(
  cli_today: Option<NaiveDate>,
  cfg: &Config
) -> NaiveDate {
  if let Some(today) = cli_today {
    tracing::debug!(%today, "today pinned by command line");
    return today;
  }
  if let Some(today) = cfg.today {
    tracing::debug!(%today, "today pinned by config");
    return today;
  }
  Local::now().date_naive()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn parses_weekday_with_row() {
    assert_eq!(
      parse_cell_ref("Tue/2")
        .expect("parse cell"),
      CellRef::Column {
        weekday: Weekday::Tue,
        row:     2
      }
    );
    assert_eq!(
      parse_cell_ref("sunday")
        .expect("parse cell"),
      CellRef::Column {
        weekday: Weekday::Sun,
        row:     0
      }
    );
  }

  #[test]
  fn parses_dates_and_today() {
    assert_eq!(
      parse_cell_ref("2026-10-19")
        .expect("parse cell"),
      CellRef::Date(date(2026, 10, 19))
    );
    assert_eq!(
      parse_cell_ref("TODAY")
        .expect("parse cell"),
      CellRef::Today
    );
  }

  #[test]
  fn rejects_garbage() {
    for token in [
      "moon",
      "mon/x",
      "2026-13-01",
      "mon/123",
      ""
    ] {
      assert!(
        parse_cell_ref(token).is_err(),
        "expected {token:?} to fail"
      );
    }
  }

  #[test]
  fn resolves_against_displayed_week() {
    let week_start = date(2026, 10, 12);
    let today = date(2026, 10, 18);
    let cell = CellRef::Column {
      weekday: Weekday::Wed,
      row:     1
    };
    assert_eq!(
      cell.resolve(week_start, today),
      date(2026, 10, 21)
    );
    assert_eq!(
      CellRef::Today
        .resolve(week_start, today),
      today
    );
  }

  #[test]
  fn cli_today_beats_config() {
    let mut cfg = Config::default();
    cfg.today = Some(date(2020, 1, 1));
    assert_eq!(
      resolve_today(
        Some(date(2026, 10, 18)),
        &cfg
      ),
      date(2026, 10, 18)
    );
    assert_eq!(
      resolve_today(None, &cfg),
      date(2020, 1, 1)
    );
  }
}
