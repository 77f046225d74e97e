use todo_core::controller::Event as AppEvent;
use web_sys::{
  HtmlInputElement,
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
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
  pub error:    Option<String>,
  pub on_event: Callback<AppEvent>
}

#[function_component(LoginForm)]
pub fn login_form(
  props: &LoginFormProps
) -> Html {
  let email = use_state(String::new);
  let name = use_state(String::new);

  let on_email_input = {
    let email = email.clone();
    Callback::from(
      move |e: InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        email.set(input.value());
      }
    )
  };

  let on_name_input = {
    let name = name.clone();
    Callback::from(
      move |e: InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        name.set(input.value());
      }
    )
  };

  // Enter in either field logs in.
  let on_login = {
    let email = email.clone();
    let on_event = props.on_event.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        on_event.emit(
          AppEvent::LoginSubmitted {
            email: email.trim().to_string()
          }
        );
      }
    )
  };

  let on_register = {
    let email = email.clone();
    let name = name.clone();
    let on_event = props.on_event.clone();
    Callback::from(
      move |e: MouseEvent| {
        e.prevent_default();
        on_event.emit(
          AppEvent::RegisterSubmitted {
            email: email.trim().to_string(),
            name:  name.trim().to_string()
          }
        );
      }
    )
  };

  html! {
      <form id="login" onsubmit={on_login}>
          <div>
              <input
                  id="email"
                  type="email"
                  placeholder="Email"
                  value={(*email).clone()}
                  oninput={on_email_input}
              />
          </div>
          <div>
              <input
                  id="name"
                  type="text"
                  placeholder="Name (to register)"
                  value={(*name).clone()}
                  oninput={on_name_input}
              />
          </div>
          <button id="loginButton" type="submit">{ "Log in" }</button>
          <button id="registerButton" type="button" onclick={on_register}>{ "Register" }</button>
          if let Some(error) = props.error.clone() {
              <div id="loginError" class="login-error">{ error }</div>
          }
      </form>
  }
}
