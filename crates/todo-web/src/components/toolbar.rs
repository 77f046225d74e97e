use todo_core::calendar::{
  SelectOption,
  hour_options,
  minute_options
};
use todo_core::controller::Event as AppEvent;
use todo_core::render::{
  FormView,
  month_options
};
use web_sys::{
  Event,
  HtmlInputElement,
  HtmlSelectElement,
  InputEvent,
  MouseEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
  pub form:     FormView,
  pub on_event: Callback<AppEvent>
}

fn option_list(
  options: &[SelectOption],
  selected: Option<u32>
) -> Html {
  options
    .iter()
    .map(|option| {
      html! {
          <option
              value={option.value.to_string()}
              selected={selected == Some(option.value)}
          >
              { option.label.clone() }
          </option>
      }
    })
    .collect::<Html>()
}

/// Parses the selected value of a
/// `<select>`; empty means nothing is
/// selected.
fn selected_value(
  e: &Event
) -> Option<u32> {
  let select: HtmlSelectElement =
    e.target_unchecked_into();
  select.value().trim().parse().ok()
}

#[function_component(Toolbar)]
pub fn toolbar(
  props: &ToolbarProps
) -> Html {
  let form = &props.form;

  let on_year = {
    let on_event = props.on_event.clone();
    Callback::from(move |e: Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      match input.value().trim().parse() {
        | Ok(year) => {
          on_event
            .emit(AppEvent::YearChanged(year))
        }
        | Err(err) => {
          tracing::debug!(
            error = %err,
            "ignoring unparsable year"
          )
        }
      }
    })
  };

  let on_month = {
    let on_event = props.on_event.clone();
    Callback::from(move |e: Event| {
      if let Some(month) = selected_value(&e)
      {
        on_event
          .emit(AppEvent::MonthChanged(month));
      }
    })
  };

  let on_day = {
    let on_event = props.on_event.clone();
    Callback::from(move |e: Event| {
      on_event.emit(AppEvent::DayChanged(
        selected_value(&e)
      ));
    })
  };

  let on_hour = {
    let on_event = props.on_event.clone();
    Callback::from(move |e: Event| {
      if let Some(hour) = selected_value(&e) {
        on_event
          .emit(AppEvent::HourChanged(hour));
      }
    })
  };

  let on_minute = {
    let on_event = props.on_event.clone();
    Callback::from(move |e: Event| {
      if let Some(minute) = selected_value(&e)
      {
        on_event.emit(
          AppEvent::MinuteChanged(minute)
        );
      }
    })
  };

  let on_title = {
    let on_event = props.on_event.clone();
    Callback::from(
      move |e: InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        on_event.emit(
          AppEvent::TitleChanged(
            input.value()
          )
        );
      }
    )
  };

  let on_today = {
    let on_event = props.on_event.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_event.emit(AppEvent::TodayClicked)
      }
    )
  };

  // Enter in the title field adds too.
  let on_submit = {
    let on_event = props.on_event.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        on_event.emit(AppEvent::AddSubmitted);
      }
    )
  };

  html! {
      <form id="toolbar" onsubmit={on_submit}>
          <input
              id="title"
              type="text"
              placeholder="What needs doing?"
              value={form.title.clone()}
              oninput={on_title}
          />
          <input
              id="year"
              type="number"
              value={form.year.to_string()}
              onchange={on_year}
          />
          <select id="month" onchange={on_month}>
              { option_list(&month_options(), Some(form.month)) }
          </select>
          <select id="date" onchange={on_day}>
              if form.selected_day.is_none() {
                  <option value="" selected={true}></option>
              }
              { option_list(&form.day_options, form.selected_day) }
          </select>
          <select id="hour" onchange={on_hour}>
              { option_list(&hour_options(), Some(form.hour)) }
          </select>
          <select id="minute" onchange={on_minute}>
              { option_list(&minute_options(), Some(form.minute)) }
          </select>
          <button id="today" type="button" onclick={on_today}>{ "Today" }</button>
          <button id="addItem" type="submit">{ "Add" }</button>
      </form>
  }
}
