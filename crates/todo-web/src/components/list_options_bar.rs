use todo_core::controller::Event as AppEvent;
use web_sys::{
  Event,
  HtmlInputElement
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
pub struct ListOptionsBarProps {
  pub on_event: Callback<AppEvent>
}

#[function_component(ListOptionsBar)]
pub fn list_options_bar(
  props: &ListOptionsBarProps
) -> Html {
  let toggle = |make: fn(bool) -> AppEvent| {
    let on_event = props.on_event.clone();
    Callback::from(move |e: Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_event.emit(make(input.checked()));
    })
  };

  html! {
      <div class="list-options">
          <label>
              <input
                  id="onlyIncomplete"
                  type="checkbox"
                  onchange={toggle(AppEvent::OnlyIncompleteToggled)}
              />
              { " Only incomplete" }
          </label>
          <label>
              <input
                  id="oldestFirst"
                  type="checkbox"
                  onchange={toggle(AppEvent::OldestFirstToggled)}
              />
              { " Oldest first" }
          </label>
      </div>
  }
}
