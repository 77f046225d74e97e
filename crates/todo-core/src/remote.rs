//! Client for the single todo endpoint.
//!
//! Every call posts one JSON envelope and hands exactly one
//! `Result` to its callback. A reply object carrying `error` is a domain
//! error and keeps the server's text; anything that stops the exchange from
//! producing a usable reply collapses into [`RemoteError::Transport`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use todo_shared::{Ack, Item, ItemId, NewUser, Request, UserId, UserRecord};
use tracing::{debug, warn};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("malformed reply: {0}")]
    Malformed(String),
    #[error("could not encode request: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("{0}")]
    Domain(String),
    #[error("Internal error")]
    Transport(#[source] TransportError),
}

impl RemoteError {
    /// Text shown to the user: the server's message for domain errors, the
    /// generic message otherwise.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(message) => message.clone(),
            Self::Transport(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

pub type Completion = Box<dyn FnOnce(Result<String, TransportError>)>;

/// Moves one request body to the endpoint and reports the raw reply body.
/// Implementations must call `on_done` exactly once, possibly before `post`
/// returns.
pub trait Transport {
    fn post(&self, body: String, on_done: Completion);
}

#[derive(Debug, Clone)]
pub struct RemoteClient<T> {
    transport: T,
}

impl<T: Transport> RemoteClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn login(
        &self,
        email: &str,
        on_result: impl FnOnce(Result<UserRecord, RemoteError>) + 'static,
    ) {
        self.send(
            &Request::GetUserFromEmail {
                email: email.to_string(),
            },
            on_result,
        );
    }

    pub fn register(
        &self,
        email: &str,
        name: &str,
        on_result: impl FnOnce(Result<NewUser, RemoteError>) + 'static,
    ) {
        self.send(
            &Request::AddUser {
                email: email.to_string(),
                name: name.to_string(),
            },
            on_result,
        );
    }

    /// `done = None` lists everything, `Some(false)` only incomplete items.
    pub fn list_items(
        &self,
        user: UserId,
        done: Option<bool>,
        on_result: impl FnOnce(Result<Vec<Item>, RemoteError>) + 'static,
    ) {
        self.send(&Request::GetUserItems { user, done }, on_result);
    }

    pub fn add_item(
        &self,
        user: UserId,
        due: DateTime<Utc>,
        title: &str,
        on_result: impl FnOnce(Result<Ack, RemoteError>) + 'static,
    ) {
        self.send(
            &Request::AddItem {
                user,
                due,
                title: title.to_string(),
            },
            on_result,
        );
    }

    pub fn complete_item(
        &self,
        id: ItemId,
        done: bool,
        on_result: impl FnOnce(Result<Ack, RemoteError>) + 'static,
    ) {
        self.send(&Request::CompleteItem { id, done }, on_result);
    }

    #[tracing::instrument(skip(self, request, on_result), fields(action = request.action()))]
    pub fn send<P>(
        &self,
        request: &Request,
        on_result: impl FnOnce(Result<P, RemoteError>) + 'static,
    ) where
        P: DeserializeOwned + 'static,
    {
        let body = match serde_json::to_string(request) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "failed to encode request");
                on_result(Err(RemoteError::Transport(TransportError::Encode(
                    err.to_string(),
                ))));
                return;
            }
        };

        let action = request.action();
        debug!(%body, "posting request");
        self.transport.post(
            body,
            Box::new(move |reply| {
                let outcome = reply
                    .map_err(RemoteError::Transport)
                    .and_then(|body| decode_reply::<P>(&body));
                match &outcome {
                    Ok(_) => debug!(action, "request succeeded"),
                    Err(RemoteError::Domain(message)) => {
                        debug!(action, %message, "server reported an error")
                    }
                    Err(RemoteError::Transport(err)) => {
                        warn!(action, error = %err, "request failed")
                    }
                }
                on_result(outcome);
            }),
        );
    }
}

/// Splits a reply body into payload, domain error, or malformed reply.
pub fn decode_reply<P: DeserializeOwned>(body: &str) -> Result<P, RemoteError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| RemoteError::Transport(TransportError::Malformed(err.to_string())))?;

    if let Some(message) = domain_error(&value) {
        return Err(RemoteError::Domain(message));
    }

    serde_json::from_value(value)
        .map_err(|err| RemoteError::Transport(TransportError::Malformed(err.to_string())))
}

fn domain_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
