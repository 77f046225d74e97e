use todo_core::controller::Event as AppEvent;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ErrorOverlayProps {
  pub message:  Option<String>,
  pub on_event: Callback<AppEvent>
}

/// Blocks the page until the user
/// acknowledges the error.
#[function_component(ErrorOverlay)]
pub fn error_overlay(
  props: &ErrorOverlayProps
) -> Html {
  let Some(message) = props.message.clone()
  else {
    return html! {};
  };

  let on_ok = {
    let on_event = props.on_event.clone();
    move |_| {
      on_event.emit(AppEvent::ErrorDismissed)
    }
  };

  html! {
      <>
          <div id="shade" class="shade"></div>
          <div id="errorBox" class="error-box" role="alertdialog">
              <p id="errorText">{ message }</p>
              <button id="errorOK" type="button" onclick={on_ok}>{ "OK" }</button>
          </div>
      </>
  }
}
