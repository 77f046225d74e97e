use std::rc::Rc;

use gloo::net::http::Request;
use todo_core::remote::{
  Completion,
  Transport,
  TransportError
};

/// Posts JSON envelopes with `fetch`
/// and completes on a later tick.
#[derive(Clone)]
pub struct FetchTransport {
  endpoint: Rc<str>
}

impl FetchTransport {
  pub fn new(endpoint: &str) -> Self {
    Self {
      endpoint: Rc::from(endpoint)
    }
  }
}

impl Transport for FetchTransport {
  fn post(
    &self,
    body: String,
    on_done: Completion
  ) {
    let endpoint = self.endpoint.clone();
    wasm_bindgen_futures::spawn_local(
      async move {
        on_done(
          exchange(&endpoint, body).await
        );
      }
    );
  }
}

async fn exchange(
  endpoint: &str,
  body: String
) -> Result<String, TransportError> {
  let response = Request::post(endpoint)
    .header(
      "Content-Type",
      "application/json"
    )
    .body(body)
    .map_err(|e| {
      TransportError::Network(
        e.to_string()
      )
    })?
    .send()
    .await
    .map_err(|e| {
      TransportError::Network(
        e.to_string()
      )
    })?;

  if !response.ok() {
    return Err(TransportError::Status(
      response.status()
    ));
  }

  response.text().await.map_err(|e| {
    TransportError::Malformed(
      e.to_string()
    )
  })
}
