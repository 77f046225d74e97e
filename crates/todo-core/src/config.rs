use anyhow::{
  Context,
  anyhow
};
use serde::Deserialize;
use tracing::{
  debug,
  warn
};

pub const DEFAULT_ENDPOINT: &str =
  "/todo";

#[derive(
  Debug, Clone, PartialEq, Eq, Deserialize,
)]
pub struct ClientConfig {
  #[serde(default = "default_endpoint")]
  pub endpoint: String,
  /// IANA zone name; when unset the
  /// host's zone is used.
  #[serde(default)]
  pub timezone: Option<String>
}

fn default_endpoint() -> String {
  DEFAULT_ENDPOINT.to_string()
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      endpoint: default_endpoint(),
      timezone: None
    }
  }
}

impl ClientConfig {
  #[tracing::instrument(skip(raw))]
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut cfg =
      toml::from_str::<ClientConfig>(raw)
        .context(
          "failed to parse client config"
        )?;

    cfg.endpoint =
      cfg.endpoint.trim().to_string();
    if cfg.endpoint.is_empty() {
      return Err(anyhow!(
        "client config endpoint cannot \
         be empty"
      ));
    }

    if cfg
      .timezone
      .as_deref()
      .is_some_and(|tz| {
        tz.trim().is_empty()
      })
    {
      warn!(
        "blank timezone in client \
         config; ignoring"
      );
      cfg.timezone = None;
    }

    debug!(
      endpoint = %cfg.endpoint,
      timezone = ?cfg.timezone,
      "loaded client config"
    );
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_uses_defaults() {
    let cfg =
      ClientConfig::from_toml_str("")
        .expect("parse empty config");
    assert_eq!(
      cfg,
      ClientConfig::default()
    );
    assert_eq!(cfg.endpoint, "/todo");
  }

  #[test]
  fn reads_endpoint_and_timezone() {
    let cfg = ClientConfig::from_toml_str(
      "endpoint = \" /api/todo \"\n\
       timezone = \"Europe/Paris\"\n"
    )
    .expect("parse config");
    assert_eq!(cfg.endpoint, "/api/todo");
    assert_eq!(
      cfg.timezone.as_deref(),
      Some("Europe/Paris")
    );
  }

  #[test]
  fn blank_timezone_is_dropped() {
    let cfg = ClientConfig::from_toml_str(
      "timezone = \"  \""
    )
    .expect("parse config");
    assert_eq!(cfg.timezone, None);
  }

  #[test]
  fn rejects_blank_endpoint() {
    let err = ClientConfig::from_toml_str(
      "endpoint = \"\""
    )
    .expect_err("blank endpoint");
    assert!(
      err
        .to_string()
        .contains("endpoint")
    );
  }

  #[test]
  fn rejects_malformed_toml() {
    assert!(
      ClientConfig::from_toml_str(
        "endpoint = "
      )
      .is_err()
    );
  }
}
