use chrono::NaiveDate;
use weekgrid_model::DayIndex;
use weekgrid_model::grid::{
  Cell,
  DayHeader
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  TargetCast,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct CalendarNavActionsProps {
  pub title:    String,
  pub on_prev:  Callback<MouseEvent>,
  pub on_today: Callback<MouseEvent>,
  pub on_next:  Callback<MouseEvent>
}

#[function_component(CalendarNavActions)]
pub fn calendar_nav_actions(
  props: &CalendarNavActionsProps
) -> Html {
  html! {
      <>
          <button class="btn" onclick={props.on_prev.clone()}>{ "Previous Week" }</button>
          <div class="calendar-title">
              <h2>{ &props.title }</h2>
              <button class="btn btn-small" onclick={props.on_today.clone()}>{ "Today" }</button>
          </div>
          <button class="btn" onclick={props.on_next.clone()}>{ "Next Week" }</button>
      </>
  }
}

#[derive(Properties, PartialEq)]
pub struct DayHeaderRowProps {
  pub headers: Vec<DayHeader>
}

#[function_component(DayHeaderRow)]
pub fn day_header_row(
  props: &DayHeaderRowProps
) -> Html {
  html! {
      <>
          <tr>
              {
                  for props.headers.iter().map(|header| html! {
                      <td
                          key={header.day.raw()}
                          class={classes!(header.is_today.then_some("current-date"))}
                      >
                          { header.day_number }
                      </td>
                  })
              }
          </tr>
          <tr>
              {
                  for props.headers.iter().map(|header| html! {
                      <td key={header.day.raw()} class="weekday">{ &header.weekday }</td>
                  })
              }
          </tr>
      </>
  }
}

/// Past days never take new tasks.
fn accepts_commit(
  day: DayIndex,
  today: NaiveDate
) -> bool {
  day >= DayIndex::from(today)
}

#[derive(Properties, PartialEq)]
pub struct GridCellProps {
  pub cell:      Cell,
  pub today:     NaiveDate,
  pub on_add:    Callback<(DayIndex, String)>,
  pub on_toggle: Callback<DayIndex>,
  pub on_delete: Callback<DayIndex>
}

#[function_component(GridCell)]
pub fn grid_cell(
  props: &GridCellProps
) -> Html {
  match &props.cell {
    | Cell::Blank => html! { <td></td> },
    | Cell::Input { day } => {
      let day = *day;
      let today = props.today;
      let on_add = props.on_add.clone();
      let onblur = Callback::from(
        move |e: web_sys::FocusEvent| {
          let input: web_sys::HtmlInputElement =
            e.target_unchecked_into();
          let value = input.value();
          if value.trim().is_empty() {
            return;
          }
          // Rejected text stays in the box.
          if accepts_commit(day, today) {
            input.set_value("");
          }
          on_add.emit((day, value));
        }
      );
      let onkeydown = Callback::from(
        |e: web_sys::KeyboardEvent| {
          if e.key() == "Enter" {
            let input: web_sys::HtmlInputElement =
              e.target_unchecked_into();
            if let Err(error) = input.blur() {
              tracing::debug!(?error, "input blur failed");
            }
          }
        }
      );

      html! {
          <td>
              <div style="display:flex;">
                  <input
                      class="item-input"
                      type="text"
                      placeholder="Add item"
                      onblur={onblur}
                      onkeydown={onkeydown}
                  />
              </div>
          </td>
      }
    }
    | Cell::Task {
      day,
      title,
      completed
    } => {
      let day = *day;
      let on_toggle = props.on_toggle.clone();
      let on_delete = props.on_delete.clone();

      html! {
          <td>
              <div
                  class={classes!("task-text", completed.then_some("completed"))}
                  onclick={move |_| on_toggle.emit(day)}
              >
                  <span class="task-check">{ "✔" }</span>
                  <span class="task-title">{ title }</span>
                  <button
                      class="delete-button"
                      onclick={move |e: MouseEvent| {
                          e.stop_propagation();
                          on_delete.emit(day);
                      }}
                  >
                      { "X" }
                  </button>
              </div>
          </td>
      }
    }
  }
}

#[derive(Properties, PartialEq)]
pub struct OverflowRowProps {
  pub overflow: Vec<usize>
}

#[function_component(OverflowRow)]
pub fn overflow_row(
  props: &OverflowRowProps
) -> Html {
  if props.overflow.iter().all(|count| *count == 0) {
    return html! {};
  }

  html! {
      <tr class="overflow">
          {
              for props.overflow.iter().map(|count| {
                  if *count > 0 {
                      html! { <td>{ format!("+{count} more") }</td> }
                  } else {
                      html! { <td></td> }
                  }
              })
          }
      </tr>
  }
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
  fn only_today_and_later_accept_commits() {
    let today = date(2026, 10, 14);
    assert!(accepts_commit(today.into(), today));
    assert!(accepts_commit(
      date(2026, 10, 21).into(),
      today
    ));
    assert!(!accepts_commit(
      date(2026, 10, 13).into(),
      today
    ));
  }
}
