pub mod day;
pub mod grid;
pub mod placement;
pub mod store;
pub mod task;

use std::collections::BTreeMap;

pub use day::DayIndex;
pub use grid::{
  CascadeDisplay,
  Cell,
  GridOptions,
  WeekGrid,
  render_week
};
pub use store::{
  Action,
  Outcome,
  PlannerState
};
pub use task::Task;

pub type TaskMap = BTreeMap<DayIndex, Task>;
