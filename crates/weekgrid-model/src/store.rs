use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{
  debug,
  trace
};

use crate::TaskMap;
use crate::day::{
  DAYS_PER_WEEK,
  DayIndex,
  add_days,
  monday_of
};
use crate::placement::next_open_slot;
use crate::task::{
  Task,
  normalize_title
};

pub const DEFAULT_MAX_TITLE_LEN: usize =
  200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  AddTask {
    day:   DayIndex,
    title: String
  },
  ToggleComplete {
    day: DayIndex
  },
  DeleteTask {
    day: DayIndex
  },
  ShiftWeek {
    days: i64
  },
  GoToToday
}

impl Action {
  #[must_use]
  pub fn previous_week() -> Self {
    Self::ShiftWeek {
      days: -DAYS_PER_WEEK
    }
  }

  #[must_use]
  pub fn next_week() -> Self {
    Self::ShiftWeek {
      days: DAYS_PER_WEEK
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Outcome {
  Added {
    day:    DayIndex,
    opened: Option<DayIndex>
  },
  Toggled {
    day:       DayIndex,
    completed: bool
  },
  Deleted {
    day: DayIndex
  },
  Moved {
    week_start: NaiveDate
  },
  RejectedPast {
    day: DayIndex
  },
  Missing {
    day: DayIndex
  },
  Unchanged
}

impl Outcome {
  #[must_use]
  pub fn changed(self) -> bool {
    matches!(
      self,
      Self::Added { .. }
        | Self::Toggled { .. }
        | Self::Deleted { .. }
        | Self::Moved { .. }
    )
  }
}

/// Immutable planner snapshot. Every
/// applied action yields a new value; the
/// task map is shared until an action
/// actually rewrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerState {
  tasks:         Arc<TaskMap>,
  reference:     NaiveDate,
  revision:      u64,
  max_title_len: usize
}

impl PlannerState {
  #[must_use]
  pub fn new(
    reference: NaiveDate
  ) -> Self {
    Self {
      tasks: Arc::new(TaskMap::new()),
      reference,
      revision: 0,
      max_title_len: DEFAULT_MAX_TITLE_LEN
    }
  }

  #[must_use]
  pub fn with_max_title_len(
    mut self,
    max_title_len: usize
  ) -> Self {
    self.max_title_len = max_title_len;
    self
  }

  #[must_use]
  pub fn tasks(&self) -> &Arc<TaskMap> {
    &self.tasks
  }

  #[must_use]
  pub fn task(
    &self,
    day: DayIndex
  ) -> Option<&Task> {
    self.tasks.get(&day)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  #[must_use]
  pub fn reference(&self) -> NaiveDate {
    self.reference
  }

  #[must_use]
  pub fn week_start(&self) -> NaiveDate {
    monday_of(self.reference)
  }

  #[must_use]
  pub fn revision(&self) -> u64 {
    self.revision
  }

  /// Pure reducer: `self` is left intact.
  #[tracing::instrument(
    skip(self),
    fields(revision = self.revision)
  )]
  pub fn apply(
    &self,
    action: Action,
    today: NaiveDate
  ) -> (Self, Outcome) {
    let (next, outcome) = match action {
      | Action::AddTask { day, title } => {
        self.add_task(day, &title, today)
      }
      | Action::ToggleComplete { day } => {
        self.toggle_complete(day)
      }
      | Action::DeleteTask { day } => {
        self.delete_task(day)
      }
      | Action::ShiftWeek { days } => {
        self.move_reference(add_days(
          self.reference,
          days
        ))
      }
      | Action::GoToToday => {
        self.move_reference(today)
      }
    };

    if outcome.changed() {
      debug!(?outcome, revision = next.revision, "applied action");
    } else {
      trace!(?outcome, "action left state unchanged");
    }

    (next, outcome)
  }

  /// In-place variant of [`apply`] for
  /// owners holding the state by value.
  ///
  /// [`apply`]: PlannerState::apply
  pub fn dispatch(
    &mut self,
    action: Action,
    today: NaiveDate
  ) -> Outcome {
    let (next, outcome) =
      self.apply(action, today);
    *self = next;
    outcome
  }

  fn add_task(
    &self,
    day: DayIndex,
    raw_title: &str,
    today: NaiveDate
  ) -> (Self, Outcome) {
    if day < DayIndex::from_date(today) {
      return (
        self.clone(),
        Outcome::RejectedPast { day }
      );
    }

    let title = normalize_title(
      raw_title,
      self.max_title_len
    );
    if title.is_empty() {
      return (
        self.clone(),
        Outcome::Unchanged
      );
    }

    let mut tasks = (*self.tasks).clone();
    tasks.insert(day, Task::new(title));
    let opened =
      next_open_slot(&tasks, day);
    if let Some(slot) = opened {
      tasks.insert(
        slot,
        Task::placeholder()
      );
    }

    (
      self.with_tasks(tasks),
      Outcome::Added { day, opened }
    )
  }

  fn toggle_complete(
    &self,
    day: DayIndex
  ) -> (Self, Outcome) {
    let Some(current) = self
      .tasks
      .get(&day)
      .filter(|task| !task.is_placeholder())
    else {
      return (
        self.clone(),
        Outcome::Missing { day }
      );
    };

    let completed = !current.completed;
    let mut tasks = (*self.tasks).clone();
    tasks.insert(day, Task {
      title: current.title.clone(),
      completed
    });

    (
      self.with_tasks(tasks),
      Outcome::Toggled { day, completed }
    )
  }

  fn delete_task(
    &self,
    day: DayIndex
  ) -> (Self, Outcome) {
    if !self.tasks.contains_key(&day) {
      return (
        self.clone(),
        Outcome::Missing { day }
      );
    }

    let mut tasks = (*self.tasks).clone();
    tasks.remove(&day);

    (
      self.with_tasks(tasks),
      Outcome::Deleted { day }
    )
  }

  fn move_reference(
    &self,
    reference: NaiveDate
  ) -> (Self, Outcome) {
    if reference == self.reference {
      return (
        self.clone(),
        Outcome::Unchanged
      );
    }

    let next = Self {
      tasks: Arc::clone(&self.tasks),
      reference,
      revision: self.revision + 1,
      max_title_len: self.max_title_len
    };
    let week_start = next.week_start();
    (next, Outcome::Moved { week_start })
  }

  fn with_tasks(
    &self,
    tasks: TaskMap
  ) -> Self {
    Self {
      tasks:         Arc::new(tasks),
      reference:     self.reference,
      revision:      self.revision + 1,
      max_title_len: self.max_title_len
    }
  }
}
