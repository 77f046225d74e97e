use chrono::Utc;
use todo_core::config::ClientConfig;
use todo_core::controller::{
  Controller,
  Event as AppEvent,
  Screen
};
use todo_core::datetime::resolve_timezone;
use todo_core::remote::RemoteClient;
use todo_core::render::{
  FormView,
  ItemView
};
use todo_core::runtime::{
  PageModel,
  Runtime,
  View
};
use wasm_bindgen::JsValue;
use yew::{
  Callback,
  Html,
  UseStateSetter,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_state
};

use crate::api::FetchTransport;
use crate::components::{
  ErrorOverlay,
  ItemList,
  ListOptionsBar,
  LoginForm,
  Toolbar
};

const CLIENT_CONFIG_TOML: &str =
  include_str!(
    "../assets/todo-client.toml"
  );

type AppRuntime =
  Runtime<FetchTransport, PageView>;

/// Keeps the page model and hands a
/// fresh copy to yew after each change.
struct PageView {
  model:   PageModel,
  publish: UseStateSetter<PageModel>
}

impl PageView {
  fn publish(&self) {
    self.publish.set(self.model.clone());
  }
}

impl View for PageView {
  fn show_screen(
    &mut self,
    screen: Screen,
    user_name: Option<&str>
  ) {
    self
      .model
      .show_screen(screen, user_name);
    self.publish();
  }

  fn render_form(
    &mut self,
    form: &FormView
  ) {
    self.model.render_form(form);
    self.publish();
  }

  fn render_list(
    &mut self,
    items: &[ItemView]
  ) {
    self.model.render_list(items);
    self.publish();
  }

  fn show_login_error(
    &mut self,
    message: Option<&str>
  ) {
    self
      .model
      .show_login_error(message);
    self.publish();
  }

  fn show_error(
    &mut self,
    message: Option<&str>
  ) {
    self.model.show_error(message);
    self.publish();
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let page = use_state(PageModel::default);

  let runtime = {
    let publish = page.setter();
    use_memo((), move |_| {
      build_runtime(publish)
    })
  };

  {
    let runtime = runtime.clone();
    use_effect_with((), move |_| {
      runtime.start();
      || ()
    });
  }

  let on_event = {
    let runtime = runtime.clone();
    Callback::from(
      move |event: AppEvent| {
        runtime.dispatch(event)
      }
    )
  };

  html! {
      <>
          if page.screen == Screen::Anonymous {
              <LoginForm
                  error={page.login_error.clone()}
                  on_event={on_event.clone()}
              />
          } else {
              <main id="main">
                  <header>
                      { "Signed in as " }
                      <span id="nameIndicator">{ page.user_name.clone().unwrap_or_default() }</span>
                  </header>
                  if let Some(form) = page.form.clone() {
                      <Toolbar form={form} on_event={on_event.clone()} />
                  }
                  <ListOptionsBar on_event={on_event.clone()} />
                  <ItemList items={page.items.clone()} on_event={on_event.clone()} />
              </main>
          }
          <ErrorOverlay message={page.error.clone()} on_event={on_event} />
      </>
  }
}

fn build_runtime(
  publish: UseStateSetter<PageModel>
) -> AppRuntime {
  let config = load_client_config();
  let detected = detect_browser_timezone();
  let tz = resolve_timezone(
    config.timezone.as_deref(),
    detected.as_deref()
  );

  tracing::info!(
    endpoint = %config.endpoint,
    timezone = %tz,
    "building todo runtime"
  );

  Runtime::new(
    Controller::new(tz, Utc::now()),
    RemoteClient::new(FetchTransport::new(
      &config.endpoint
    )),
    PageView {
      model: PageModel::default(),
      publish
    }
  )
}

fn load_client_config() -> ClientConfig {
  match ClientConfig::from_toml_str(
    CLIENT_CONFIG_TOML
  ) {
    | Ok(config) => config,
    | Err(error) => {
      tracing::error!(
        error = ?error,
        "failed parsing client config; \
         using defaults"
      );
      ClientConfig::default()
    }
  }
}

fn detect_browser_timezone()
-> Option<String> {
  let format =
    js_sys::Intl::DateTimeFormat::new(
      &js_sys::Array::new(),
      &js_sys::Object::new()
    );
  js_sys::Reflect::get(
    &format.resolved_options(),
    &JsValue::from_str("timeZone")
  )
  .ok()?
  .as_string()
}

