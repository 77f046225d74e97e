use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use todo_core::controller::{Controller, Event, Screen};
use todo_core::remote::{Completion, RemoteClient, Transport, TransportError};
use todo_core::runtime::{PageModel, Runtime};

/// Holds every posted request until the test answers it, the way a browser
/// fetch completes on a later tick.
#[derive(Clone, Default)]
struct Deferred {
    pending: Rc<RefCell<VecDeque<(Value, Completion)>>>,
}

impl Transport for Deferred {
    fn post(&self, body: String, on_done: Completion) {
        let request = serde_json::from_str(&body).expect("request body is json");
        self.pending.borrow_mut().push_back((request, on_done));
    }
}

impl Deferred {
    fn outstanding(&self) -> Vec<Value> {
        self.pending.borrow().iter().map(|(request, _)| request.clone()).collect()
    }

    fn answer_front(&self, reply: Result<Value, TransportError>) -> Value {
        let (request, on_done) = self.pending.borrow_mut().pop_front().expect("a pending request");
        on_done(reply.map(|value| value.to_string()));
        request
    }

    fn answer_back(&self, reply: Value) -> Value {
        let (request, on_done) = self.pending.borrow_mut().pop_back().expect("a pending request");
        on_done(Ok(reply.to_string()));
        request
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().expect("valid now")
}

fn start() -> (Deferred, Runtime<Deferred, PageModel>) {
    let transport = Deferred::default();
    let runtime = Runtime::with_clock(
        Controller::new(chrono_tz::UTC, now()),
        RemoteClient::new(transport.clone()),
        PageModel::default(),
        Box::new(now),
    );
    runtime.start();
    (transport, runtime)
}

fn item(id: i64, due: DateTime<Utc>, done: bool) -> Value {
    json!({
        "id": id,
        "title": format!("task {id}"),
        "due": due.to_rfc3339(),
        "done": done,
    })
}

fn sign_in(transport: &Deferred, runtime: &Runtime<Deferred, PageModel>) {
    runtime.dispatch(Event::LoginSubmitted {
        email: "ada@example.com".to_string(),
    });
    transport.answer_front(Ok(json!({"id": 7, "name": "Ada"})));
    transport.answer_front(Ok(json!([])));
}

#[test]
fn unknown_email_shows_inline_error_and_keeps_login_screen() {
    let (transport, runtime) = start();
    assert_eq!(runtime.view().screen, Screen::Anonymous);
    assert!(runtime.view().form.is_some());

    runtime.dispatch(Event::LoginSubmitted {
        email: "nobody@example.com".to_string(),
    });
    let request = transport.answer_front(Ok(json!({"error": "No user with that email"})));

    assert_eq!(request, json!({"action": "getUserFromEmail", "email": "nobody@example.com"}));
    assert_eq!(runtime.view().screen, Screen::Anonymous);
    assert_eq!(runtime.view().login_error.as_deref(), Some("No user with that email"));
    assert_eq!(runtime.view().error, None);
    assert!(transport.outstanding().is_empty());
}

#[test]
fn login_then_list_renders_sorted_items() {
    let (transport, runtime) = start();

    runtime.dispatch(Event::LoginSubmitted {
        email: "ada@example.com".to_string(),
    });
    transport.answer_front(Ok(json!({"id": 7, "name": "Ada"})));

    assert_eq!(runtime.view().screen, Screen::Authenticated);
    assert_eq!(runtime.view().user_name.as_deref(), Some("Ada"));
    assert_eq!(
        runtime.controller().state().session.as_ref().map(|session| session.user_id),
        Some(7)
    );
    assert_eq!(
        transport.outstanding(),
        vec![json!({"action": "getUserItems", "user": 7, "done": null})]
    );

    transport.answer_front(Ok(json!([
        item(1, now() - Duration::days(1), false),
        item(2, now() + Duration::days(1), true),
    ])));

    let view = runtime.view();
    let ids: Vec<i64> = view.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(view.items[1].overdue);
    assert!(!view.items[0].overdue);
    assert!(view.items[0].done);
}

#[test]
fn registration_signs_in_with_submitted_name() {
    let (transport, runtime) = start();

    runtime.dispatch(Event::RegisterSubmitted {
        email: "grace@example.com".to_string(),
        name: "Grace".to_string(),
    });
    let request = transport.answer_front(Ok(json!({"id": 12})));

    assert_eq!(
        request,
        json!({"action": "addUser", "email": "grace@example.com", "name": "Grace"})
    );
    assert_eq!(runtime.view().screen, Screen::Authenticated);
    assert_eq!(runtime.view().user_name.as_deref(), Some("Grace"));
    assert_eq!(transport.outstanding().len(), 1);
}

#[test]
fn duplicate_registration_shows_inline_error_and_keeps_login_screen() {
    let (transport, runtime) = start();

    runtime.dispatch(Event::RegisterSubmitted {
        email: "ada@example.com".to_string(),
        name: "Ada".to_string(),
    });
    transport.answer_front(Ok(json!({"error": "Email already registered"})));

    assert_eq!(runtime.view().screen, Screen::Anonymous);
    assert_eq!(runtime.view().user_name, None);
    assert_eq!(runtime.view().login_error.as_deref(), Some("Email already registered"));
    assert_eq!(runtime.view().error, None);
    assert!(transport.outstanding().is_empty());
}

#[test]
fn add_ack_triggers_one_refetch() {
    let (transport, runtime) = start();
    sign_in(&transport, &runtime);

    runtime.dispatch(Event::TitleChanged("buy milk".to_string()));
    runtime.dispatch(Event::HourChanged(18));
    runtime.dispatch(Event::AddSubmitted);

    let request = transport.answer_front(Ok(json!({})));
    assert_eq!(
        request,
        json!({
            "action": "addItem",
            "user": 7,
            "due": "2024-03-01T18:00:00.000Z",
            "title": "buy milk",
        })
    );
    assert_eq!(
        transport.outstanding(),
        vec![json!({"action": "getUserItems", "user": 7, "done": null})]
    );
}

#[test]
fn add_error_opens_overlay_without_refetch() {
    let (transport, runtime) = start();
    sign_in(&transport, &runtime);

    runtime.dispatch(Event::AddSubmitted);
    transport.answer_front(Ok(json!({"error": "Title required"})));

    assert_eq!(runtime.view().error.as_deref(), Some("Title required"));
    assert!(transport.outstanding().is_empty());

    runtime.dispatch(Event::ErrorDismissed);
    assert_eq!(runtime.view().error, None);
    assert_eq!(runtime.view().screen, Screen::Authenticated);
}

#[test]
fn network_failure_is_reported_generically() {
    let (transport, runtime) = start();
    sign_in(&transport, &runtime);

    runtime.dispatch(Event::CompleteToggled { id: 4, done: true });
    transport.answer_front(Err(TransportError::Network("connection reset".to_string())));

    assert_eq!(runtime.view().error.as_deref(), Some("Internal error"));
    assert!(transport.outstanding().is_empty());
}

#[test]
fn overlapping_fetches_last_answer_wins() {
    let (transport, runtime) = start();
    sign_in(&transport, &runtime);

    runtime.dispatch(Event::OnlyIncompleteToggled(true));
    runtime.dispatch(Event::OldestFirstToggled(true));
    assert_eq!(transport.outstanding().len(), 2);

    // the second fetch is answered first; the first one lands last
    transport.answer_back(json!([item(5, now(), false)]));
    transport.answer_front(Ok(json!([item(6, now(), false), item(7, now(), false)])));

    let ids: Vec<i64> = runtime.view().items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![6, 7]);
}

#[test]
fn day_left_empty_after_month_switch_rolls_back_to_previous_month() {
    let transport = Deferred::default();
    let jan_31 = Utc.with_ymd_and_hms(2023, 1, 31, 12, 0, 0).single().expect("valid date");
    let runtime = Runtime::with_clock(
        Controller::new(chrono_tz::UTC, jan_31),
        RemoteClient::new(transport.clone()),
        PageModel::default(),
        Box::new(move || jan_31),
    );
    runtime.start();
    sign_in(&transport, &runtime);

    runtime.dispatch(Event::MonthChanged(1));
    {
        let view = runtime.view();
        let form = view.form.as_ref().expect("form rendered");
        assert_eq!(form.day_options.len(), 28);
        assert_eq!(form.selected_day, None);
    }

    runtime.dispatch(Event::TitleChanged("renew passport".to_string()));
    runtime.dispatch(Event::AddSubmitted);
    assert_eq!(runtime.view().error, None);
    assert_eq!(
        transport.outstanding(),
        vec![json!({
            "action": "addItem",
            "user": 7,
            "due": "2023-01-31T00:00:00.000Z",
            "title": "renew passport",
        })]
    );
}
