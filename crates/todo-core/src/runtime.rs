//! Wires the controller to a transport and a view.
//!
//! Event -> [`Controller::update`] -> effects: render effects go straight to
//! the [`View`], calls go out through the [`RemoteClient`] and come back as
//! [`Event::Replied`]. Replies are applied in arrival order, so when two list
//! fetches overlap the one answered last wins.

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::controller::{Call, Controller, Effect, Event, Render, Reply, Screen};
use crate::remote::{RemoteClient, Transport};
use crate::render::{FormView, ItemView};

/// What the page can be asked to do.
pub trait View {
    fn show_screen(&mut self, screen: Screen, user_name: Option<&str>);
    fn render_form(&mut self, form: &FormView);
    fn render_list(&mut self, items: &[ItemView]);
    fn show_login_error(&mut self, message: Option<&str>);
    fn show_error(&mut self, message: Option<&str>);
}

/// A [`View`] that just keeps the latest output of every capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageModel {
    pub screen: Screen,
    pub user_name: Option<String>,
    pub form: Option<FormView>,
    pub items: Vec<ItemView>,
    pub login_error: Option<String>,
    pub error: Option<String>,
}

impl View for PageModel {
    fn show_screen(&mut self, screen: Screen, user_name: Option<&str>) {
        self.screen = screen;
        self.user_name = user_name.map(str::to_string);
    }

    fn render_form(&mut self, form: &FormView) {
        self.form = Some(form.clone());
    }

    fn render_list(&mut self, items: &[ItemView]) {
        self.items = items.to_vec();
    }

    fn show_login_error(&mut self, message: Option<&str>) {
        self.login_error = message.map(str::to_string);
    }

    fn show_error(&mut self, message: Option<&str>) {
        self.error = message.map(str::to_string);
    }
}

pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

struct Inner<T, V> {
    controller: RefCell<Controller>,
    client: RemoteClient<T>,
    view: RefCell<V>,
    clock: Clock,
}

pub struct Runtime<T, V> {
    inner: Rc<Inner<T, V>>,
}

impl<T, V> Clone for Runtime<T, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, V> Runtime<T, V>
where
    T: Transport + 'static,
    V: View + 'static,
{
    pub fn new(controller: Controller, client: RemoteClient<T>, view: V) -> Self {
        Self::with_clock(controller, client, view, Box::new(Utc::now))
    }

    pub fn with_clock(controller: Controller, client: RemoteClient<T>, view: V, clock: Clock) -> Self {
        Self {
            inner: Rc::new(Inner {
                controller: RefCell::new(controller),
                client,
                view: RefCell::new(view),
                clock,
            }),
        }
    }

    /// Paints the initial screen and form.
    pub fn start(&self) {
        let effects = self.inner.controller.borrow().initial_effects();
        self.apply(effects);
    }

    pub fn dispatch(&self, event: Event) {
        let now = (self.inner.clock)();
        let effects = self.inner.controller.borrow_mut().update(event, now);
        self.apply(effects);
    }

    pub fn controller(&self) -> Ref<'_, Controller> {
        self.inner.controller.borrow()
    }

    pub fn view(&self) -> Ref<'_, V> {
        self.inner.view.borrow()
    }

    fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render(render) => self.render(render),
                Effect::Call(call) => self.call(call),
            }
        }
    }

    fn render(&self, render: Render) {
        let mut view = self.inner.view.borrow_mut();
        match render {
            Render::Screen { screen, user_name } => view.show_screen(screen, user_name.as_deref()),
            Render::Form(form) => view.render_form(&form),
            Render::List(items) => view.render_list(&items),
            Render::LoginError(message) => view.show_login_error(message.as_deref()),
            Render::ErrorOverlay(message) => view.show_error(message.as_deref()),
        }
    }

    fn call(&self, call: Call) {
        debug!(?call, "issuing remote call");
        let client = &self.inner.client;
        let weak = Rc::downgrade(&self.inner);

        match call {
            Call::Login { email } => {
                client.login(&email, move |outcome| deliver(&weak, Reply::LoggedIn(outcome)));
            }
            Call::Register { email, name } => {
                let submitted = name.clone();
                client.register(&email, &name, move |outcome| {
                    deliver(
                        &weak,
                        Reply::Registered {
                            name: submitted,
                            outcome,
                        },
                    );
                });
            }
            Call::ListItems { user, done } => {
                client.list_items(user, done, move |outcome| deliver(&weak, Reply::Listed(outcome)));
            }
            Call::AddItem { user, due, title } => {
                client.add_item(user, due, &title, move |outcome| deliver(&weak, Reply::Added(outcome)));
            }
            Call::CompleteItem { id, done } => {
                client.complete_item(id, done, move |outcome| {
                    deliver(&weak, Reply::Completed(outcome));
                });
            }
        }
    }
}

fn deliver<T, V>(weak: &Weak<Inner<T, V>>, reply: Reply)
where
    T: Transport + 'static,
    V: View + 'static,
{
    match weak.upgrade() {
        Some(inner) => Runtime { inner }.dispatch(Event::Replied(reply)),
        None => debug!("runtime dropped before reply arrived"),
    }
}
