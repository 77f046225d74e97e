//! Presentation state and the update function that drives it.
//!
//! [`Controller::update`] folds one [`Event`] into the [`AppState`] and
//! returns the [`Effect`]s the runtime has to carry out: remote calls to
//! issue and render instructions for the view. Nothing here touches the
//! network or the page directly.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use todo_shared::{Ack, Item, ItemId, NewUser, UserId, UserRecord};
use tracing::{debug, info, warn};

use crate::calendar::DueForm;
use crate::remote::RemoteError;
use crate::render::{FormView, ItemView, SortOrder, item_views};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Anonymous,
    Authenticated,
}

/// The signed-in user. Lives as long as the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub only_incomplete: bool,
    pub oldest_first: bool,
}

impl ListOptions {
    #[must_use]
    pub fn done_filter(&self) -> Option<bool> {
        self.only_incomplete.then_some(false)
    }

    #[must_use]
    pub fn order(&self) -> SortOrder {
        if self.oldest_first {
            SortOrder::OldestFirst
        } else {
            SortOrder::LatestFirst
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub session: Option<Session>,
    pub form: DueForm,
    pub options: ListOptions,
    /// Last fetched list, in fetch order.
    pub items: Vec<Item>,
    pub login_error: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login { email: String },
    Register { email: String, name: String },
    ListItems { user: UserId, done: Option<bool> },
    AddItem { user: UserId, due: DateTime<Utc>, title: String },
    CompleteItem { id: ItemId, done: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    LoggedIn(Result<UserRecord, RemoteError>),
    /// `addUser` only answers with an id, so the submitted name rides along.
    Registered {
        name: String,
        outcome: Result<NewUser, RemoteError>,
    },
    Listed(Result<Vec<Item>, RemoteError>),
    Added(Result<Ack, RemoteError>),
    Completed(Result<Ack, RemoteError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoginSubmitted { email: String },
    RegisterSubmitted { email: String, name: String },
    YearChanged(i32),
    /// 0-based month.
    MonthChanged(u32),
    DayChanged(Option<u32>),
    HourChanged(u32),
    MinuteChanged(u32),
    TitleChanged(String),
    TodayClicked,
    AddSubmitted,
    CompleteToggled { id: ItemId, done: bool },
    OnlyIncompleteToggled(bool),
    OldestFirstToggled(bool),
    ErrorDismissed,
    Replied(Reply),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    Screen {
        screen: Screen,
        user_name: Option<String>,
    },
    Form(FormView),
    List(Vec<ItemView>),
    LoginError(Option<String>),
    ErrorOverlay(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Call(Call),
    Render(Render),
}

#[derive(Debug, Clone)]
pub struct Controller {
    state: AppState,
    tz: Tz,
}

impl Controller {
    /// Starts anonymous, with the due form set to today.
    pub fn new(tz: Tz, now: DateTime<Utc>) -> Self {
        let today = now.with_timezone(&tz).date_naive();
        Self {
            state: AppState {
                screen: Screen::Anonymous,
                session: None,
                form: DueForm::starting_on(today),
                options: ListOptions::default(),
                items: Vec::new(),
                login_error: None,
                error: None,
            },
            tz,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Everything the view needs on first paint.
    pub fn initial_effects(&self) -> Vec<Effect> {
        vec![
            Effect::Render(Render::Screen {
                screen: self.state.screen,
                user_name: None,
            }),
            self.render_form(),
        ]
    }

    #[tracing::instrument(skip(self, event, now))]
    pub fn update(&mut self, event: Event, now: DateTime<Utc>) -> Vec<Effect> {
        match event {
            Event::LoginSubmitted { email } => {
                info!(%email, "login requested");
                vec![Effect::Call(Call::Login { email })]
            }
            Event::RegisterSubmitted { email, name } => {
                info!(%email, "registration requested");
                vec![Effect::Call(Call::Register { email, name })]
            }
            Event::YearChanged(year) => {
                self.state.form.set_year(year);
                vec![self.render_form()]
            }
            Event::MonthChanged(month) => {
                self.state.form.set_month(month);
                vec![self.render_form()]
            }
            Event::DayChanged(day) => {
                match day {
                    Some(day) => self.state.form.days.select(day),
                    None => self.state.form.days.clear(),
                }
                vec![self.render_form()]
            }
            Event::HourChanged(hour) => {
                self.state.form.hour = hour;
                vec![self.render_form()]
            }
            Event::MinuteChanged(minute) => {
                self.state.form.minute = minute;
                vec![self.render_form()]
            }
            Event::TitleChanged(title) => {
                self.state.form.title = title;
                vec![self.render_form()]
            }
            Event::TodayClicked => {
                let today = now.with_timezone(&self.tz).date_naive();
                self.state.form.set_today(today);
                vec![self.render_form()]
            }
            Event::AddSubmitted => self.submit_item(),
            Event::CompleteToggled { id, done } => {
                debug!(id, done, "toggling completion");
                vec![Effect::Call(Call::CompleteItem { id, done })]
            }
            Event::OnlyIncompleteToggled(only_incomplete) => {
                self.state.options.only_incomplete = only_incomplete;
                self.refetch().into_iter().collect()
            }
            Event::OldestFirstToggled(oldest_first) => {
                self.state.options.oldest_first = oldest_first;
                self.refetch().into_iter().collect()
            }
            Event::ErrorDismissed => {
                self.state.error = None;
                let mut effects = vec![Effect::Render(Render::ErrorOverlay(None))];
                // repaint from the last fetched list so rows the user touched
                // while the failing call was out show the server's state again
                if self.state.session.is_some() {
                    effects.push(self.render_list(now));
                }
                effects
            }
            Event::Replied(reply) => self.on_reply(reply, now),
        }
    }

    fn on_reply(&mut self, reply: Reply, now: DateTime<Utc>) -> Vec<Effect> {
        match reply {
            Reply::LoggedIn(Ok(user)) => self.sign_in(Session {
                user_id: user.id,
                name: user.name,
            }),
            Reply::Registered {
                name,
                outcome: Ok(user),
            } => self.sign_in(Session {
                user_id: user.id,
                name,
            }),
            Reply::LoggedIn(Err(err))
            | Reply::Registered {
                outcome: Err(err), ..
            } => self.auth_failed(err),
            Reply::Listed(Ok(items)) => {
                debug!(count = items.len(), "item list received");
                self.state.items = items;
                vec![self.render_list(now)]
            }
            Reply::Added(Ok(_)) | Reply::Completed(Ok(_)) => self.refetch().into_iter().collect(),
            Reply::Listed(Err(err)) | Reply::Added(Err(err)) | Reply::Completed(Err(err)) => {
                self.show_error(err.user_message())
            }
        }
    }

    fn sign_in(&mut self, session: Session) -> Vec<Effect> {
        if self.state.screen == Screen::Authenticated {
            warn!(user_id = session.user_id, "already signed in; ignoring late auth reply");
            return Vec::new();
        }

        info!(user_id = session.user_id, "signed in");
        let user_name = session.name.clone();
        self.state.session = Some(session);
        self.state.screen = Screen::Authenticated;
        self.state.login_error = None;

        let mut effects = vec![
            Effect::Render(Render::LoginError(None)),
            Effect::Render(Render::Screen {
                screen: Screen::Authenticated,
                user_name: Some(user_name),
            }),
        ];
        effects.extend(self.refetch());
        effects
    }

    fn auth_failed(&mut self, err: RemoteError) -> Vec<Effect> {
        match err {
            RemoteError::Domain(message) => {
                info!(%message, "sign-in rejected");
                self.state.login_error = Some(message.clone());
                vec![Effect::Render(Render::LoginError(Some(message)))]
            }
            err @ RemoteError::Transport(_) => self.show_error(err.user_message()),
        }
    }

    fn submit_item(&mut self) -> Vec<Effect> {
        let Some(user) = self.user_id() else {
            warn!("add submitted without a session");
            return Vec::new();
        };

        match self.state.form.compose(&self.tz) {
            Ok(due) => {
                info!(%due, "adding item");
                vec![Effect::Call(Call::AddItem {
                    user,
                    due,
                    title: self.state.form.title.clone(),
                })]
            }
            Err(err) => {
                debug!(error = %err, "due date rejected");
                self.show_error(err.to_string())
            }
        }
    }

    fn refetch(&self) -> Option<Effect> {
        let user = self.user_id()?;
        Some(Effect::Call(Call::ListItems {
            user,
            done: self.state.options.done_filter(),
        }))
    }

    fn show_error(&mut self, message: String) -> Vec<Effect> {
        self.state.error = Some(message.clone());
        vec![Effect::Render(Render::ErrorOverlay(Some(message)))]
    }

    fn user_id(&self) -> Option<UserId> {
        self.state.session.as_ref().map(|session| session.user_id)
    }

    fn render_form(&self) -> Effect {
        Effect::Render(Render::Form(FormView::from(&self.state.form)))
    }

    fn render_list(&self, now: DateTime<Utc>) -> Effect {
        Effect::Render(Render::List(item_views(
            &self.state.items,
            self.state.options.order(),
            now,
            &self.tz,
        )))
    }
}
