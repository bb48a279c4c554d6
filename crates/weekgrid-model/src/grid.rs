use chrono::{
  Datelike,
  NaiveDate
};
use serde::{
  Deserialize,
  Serialize
};

use crate::TaskMap;
use crate::day::{
  DayIndex,
  add_days,
  month_title,
  weekday_name
};
use crate::placement::{
  ROW_STRIDE_DAYS,
  column_chain
};
use crate::store::PlannerState;

pub const DEFAULT_ROWS: usize = 10;
pub const MAX_ROWS: usize = 52;
pub const COLUMNS: usize = 7;

/// How rows below the first are filled.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CascadeDisplay {
  /// Row `r` shows the slot `7r` days
  /// below the header date.
  #[default]
  Full,
  /// Two rows only. The second holds the
  /// task a week below, or an input under
  /// a filled first row.
  TwoRows
}

impl CascadeDisplay {
  #[must_use]
  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "full" => Some(Self::Full),
      | "two-rows" | "two_rows"
      | "tworows" => Some(Self::TwoRows),
      | _ => None
    }
  }

  #[must_use]
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Full => "full",
      | Self::TwoRows => "two-rows"
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct GridOptions {
  pub rows:    usize,
  pub cascade: CascadeDisplay
}

impl Default for GridOptions {
  fn default() -> Self {
    Self {
      rows:    DEFAULT_ROWS,
      cascade: CascadeDisplay::Full
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHeader {
  pub date:       NaiveDate,
  pub day:        DayIndex,
  pub day_number: u32,
  pub weekday:    String,
  pub is_today:   bool
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
  Input {
    day: DayIndex
  },
  Task {
    day:       DayIndex,
    title:     String,
    completed: bool
  },
  Blank
}

impl Cell {
  #[must_use]
  pub fn is_blank(&self) -> bool {
    matches!(self, Self::Blank)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
  pub title:      String,
  pub week_start: NaiveDate,
  pub headers:    [DayHeader; COLUMNS],
  pub rows:       Vec<[Cell; COLUMNS]>,
  /// Filled tasks per column that fall
  /// below the visible rows.
  pub overflow:   [usize; COLUMNS]
}

impl WeekGrid {
  #[must_use]
  pub fn cell(
    &self,
    row: usize,
    column: usize
  ) -> Option<&Cell> {
    self
      .rows
      .get(row)
      .and_then(|cells| cells.get(column))
  }

  #[must_use]
  pub fn column_of(
    &self,
    date: NaiveDate
  ) -> Option<usize> {
    self
      .headers
      .iter()
      .position(|header| header.date == date)
  }
}

#[must_use]
pub fn render_week(
  state: &PlannerState,
  today: NaiveDate,
  options: &GridOptions
) -> WeekGrid {
  let week_start = state.week_start();
  let tasks = state.tasks().as_ref();

  let headers: [DayHeader; COLUMNS] =
    std::array::from_fn(|column| {
      let date =
        add_days(week_start, column as i64);
      DayHeader {
        date,
        day: DayIndex::from_date(date),
        day_number: date.day(),
        weekday: weekday_name(date),
        is_today: date == today
      }
    });

  let rows = (0..options.rows)
    .map(|row| {
      std::array::from_fn(|column| {
        cell_at(
          tasks,
          headers[column].day,
          row,
          options.cascade
        )
      })
    })
    .collect::<Vec<[Cell; COLUMNS]>>();

  let task_rows = match options.cascade {
    | CascadeDisplay::Full => options.rows,
    | CascadeDisplay::TwoRows => {
      options.rows.min(2)
    }
  };
  let overflow =
    std::array::from_fn(|column| {
      column_chain(tasks, headers[column].day)
        .into_iter()
        .skip(task_rows)
        .filter(|slot| {
          tasks
            .get(slot)
            .is_some_and(|task| {
              !task.is_placeholder()
            })
        })
        .count()
    });

  WeekGrid {
    title: month_title(week_start),
    week_start,
    headers,
    rows,
    overflow
  }
}

fn cell_at(
  tasks: &TaskMap,
  column_day: DayIndex,
  row: usize,
  cascade: CascadeDisplay
) -> Cell {
  let day = column_day.offset(
    ROW_STRIDE_DAYS
      .saturating_mul(row as i32)
  );

  match (row, cascade) {
    | (0, _) => {
      match tasks.get(&day) {
        | Some(task)
          if !task.is_placeholder() =>
        {
          task_cell(day, task)
        }
        | _ => Cell::Input { day }
      }
    }
    | (1, CascadeDisplay::TwoRows) => {
      match tasks.get(&day) {
        | Some(task)
          if !task.is_placeholder() =>
        {
          task_cell(day, task)
        }
        | _ if tasks
          .contains_key(&column_day) =>
        {
          Cell::Input { day }
        }
        | _ => Cell::Blank
      }
    }
    | (_, CascadeDisplay::TwoRows) => {
      Cell::Blank
    }
    | (_, CascadeDisplay::Full) => {
      match tasks.get(&day) {
        | Some(task)
          if task.is_placeholder() =>
        {
          Cell::Input { day }
        }
        | Some(task) => task_cell(day, task),
        | None => Cell::Blank
      }
    }
  }
}

fn task_cell(
  day: DayIndex,
  task: &crate::task::Task
) -> Cell {
  Cell::Task {
    day,
    title: task.title.clone(),
    completed: task.completed
  }
}
