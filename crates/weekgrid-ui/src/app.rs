mod config;

use std::rc::Rc;

use chrono::{
  Local,
  NaiveDate
};
use weekgrid_model::{
  Action,
  DayIndex,
  PlannerState,
  render_week
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Reducible,
  function_component,
  html,
  use_memo,
  use_reducer
};

use self::config::load_ui_config;
use crate::components::{
  CalendarNavActions,
  DayHeaderRow,
  GridCell,
  OverflowRow
};

/// Reducer wrapper so stale callbacks
/// always apply to the latest snapshot.
#[derive(Debug, PartialEq)]
struct Planner(PlannerState);

struct PlannerMsg {
  action: Action,
  today:  NaiveDate
}

impl Reducible for Planner {
  type Action = PlannerMsg;

  fn reduce(
    self: Rc<Self>,
    msg: Self::Action
  ) -> Rc<Self> {
    let (next, outcome) =
      self.0.apply(msg.action, msg.today);
    if !outcome.changed() {
      tracing::debug!(?outcome, "ignored grid action");
      return self;
    }
    Rc::new(Self(next))
  }
}

fn today_local() -> NaiveDate {
  Local::now().date_naive()
}

#[function_component(App)]
pub fn app() -> Html {
  let config =
    use_memo((), |_| load_ui_config());
  let planner = {
    let max_title_len =
      config.tasks.max_title_len;
    use_reducer(move || {
      Planner(
        PlannerState::new(today_local())
          .with_max_title_len(
            max_title_len
          )
      )
    })
  };

  let today = today_local();
  let grid = render_week(
    &planner.0,
    today,
    &config.grid_options()
  );

  let dispatch = {
    let planner = planner.clone();
    Callback::from(move |action: Action| {
      planner.dispatch(PlannerMsg {
        action,
        today
      });
    })
  };

  let on_prev = {
    let dispatch = dispatch.clone();
    Callback::from(move |_: MouseEvent| {
      dispatch.emit(Action::previous_week());
    })
  };
  let on_next = {
    let dispatch = dispatch.clone();
    Callback::from(move |_: MouseEvent| {
      dispatch.emit(Action::next_week());
    })
  };
  let on_today = {
    let dispatch = dispatch.clone();
    Callback::from(move |_: MouseEvent| {
      dispatch.emit(Action::GoToToday);
    })
  };
  let on_add = {
    let dispatch = dispatch.clone();
    Callback::from(
      move |(day, title): (
        DayIndex,
        String
      )| {
        dispatch
          .emit(Action::AddTask { day, title });
      }
    )
  };
  let on_toggle = {
    let dispatch = dispatch.clone();
    Callback::from(move |day: DayIndex| {
      dispatch.emit(
        Action::ToggleComplete { day }
      );
    })
  };
  let on_delete = {
    let dispatch = dispatch.clone();
    Callback::from(move |day: DayIndex| {
      dispatch
        .emit(Action::DeleteTask { day });
    })
  };

  html! {
      <div class="calendar-container">
          <div class="calendar-header">
              <CalendarNavActions
                  title={grid.title.clone()}
                  on_prev={on_prev}
                  on_today={on_today}
                  on_next={on_next}
              />
          </div>
          <div class="calendar-body">
              <table class="calendar-table">
                  <tbody>
                      <DayHeaderRow headers={grid.headers.to_vec()} />
                      {
                          for grid.rows.iter().enumerate().map(|(row, cells)| html! {
                              <tr key={row}>
                                  {
                                      for cells.iter().enumerate().map(|(column, cell)| html! {
                                          <GridCell
                                              key={format!("{row}:{column}:{}", grid.headers[column].day.raw())}
                                              cell={cell.clone()}
                                              today={today}
                                              on_add={on_add.clone()}
                                              on_toggle={on_toggle.clone()}
                                              on_delete={on_delete.clone()}
                                          />
                                      })
                                  }
                              </tr>
                          })
                      }
                      <OverflowRow overflow={grid.overflow.to_vec()} />
                  </tbody>
              </table>
          </div>
      </div>
  }
}
