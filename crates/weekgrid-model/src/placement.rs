use crate::TaskMap;
use crate::day::DayIndex;

pub const ROW_STRIDE_DAYS: i32 = 7;

/// Smallest `day + 7k` (k >= 1) with no
/// task, placeholders included. `None`
/// when the walk runs off the end of the
/// day range.
#[must_use]
pub fn next_open_slot(
  tasks: &TaskMap,
  day: DayIndex
) -> Option<DayIndex> {
  let mut slot =
    day.checked_offset(ROW_STRIDE_DAYS)?;
  while tasks.contains_key(&slot) {
    slot =
      slot.checked_offset(ROW_STRIDE_DAYS)?;
  }
  Some(slot)
}

/// Occupied slots `day, day + 7, ...` up to
/// the first gap.
#[must_use]
pub fn column_chain(
  tasks: &TaskMap,
  day: DayIndex
) -> Vec<DayIndex> {
  let mut chain = Vec::new();
  let mut slot = day;
  while tasks.contains_key(&slot) {
    chain.push(slot);
    match slot.checked_offset(ROW_STRIDE_DAYS)
    {
      | Some(next) => slot = next,
      | None => break
    }
  }
  chain
}
