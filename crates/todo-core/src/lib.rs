pub mod calendar;
pub mod config;
pub mod controller;
pub mod datetime;
pub mod remote;
pub mod render;
pub mod runtime;

pub use controller::{Controller, Event, Screen};
pub use remote::{RemoteClient, RemoteError, Transport, TransportError};
pub use runtime::{PageModel, Runtime, View};
