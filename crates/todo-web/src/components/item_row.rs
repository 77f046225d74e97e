use todo_core::controller::Event as AppEvent;
use todo_core::render::ItemView;
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
pub struct ItemRowProps {
  pub item:     ItemView,
  pub on_event: Callback<AppEvent>
}

#[function_component(ItemRow)]
pub fn item_row(
  props: &ItemRowProps
) -> Html {
  let item = &props.item;
  let id = item.id;
  let done = item.done;

  let on_toggle = {
    let on_event = props.on_event.clone();
    Callback::from(move |e: Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      let requested = input.checked();
      // the box follows the fetched list,
      // not the click
      input.set_checked(done);
      on_event.emit(
        AppEvent::CompleteToggled {
          id,
          done: requested
        }
      );
    })
  };

  html! {
      <div class={item.class()} id={item.dom_id()}>
          <input type="checkbox" checked={item.done} onchange={on_toggle} />
          <span class="due">
              <span class="dueDate">{ item.date_label.clone() }</span>
              { " @ " }
              <span class="dueTime">{ item.time_label.clone() }</span>
          </span>
          <span class="title">{ item.title.clone() }</span>
      </div>
  }
}
