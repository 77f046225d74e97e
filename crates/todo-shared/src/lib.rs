use chrono::{
  DateTime,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};

pub type UserId = i64;
pub type ItemId = i64;

/// Envelope posted to the todo endpoint,
/// discriminated by its `action` field.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
#[serde(
  tag = "action",
  rename_all = "camelCase"
)]
pub enum Request {
  GetUserFromEmail {
    email: String
  },
  AddUser {
    email: String,
    name:  String
  },
  GetUserItems {
    user: UserId,
    done: Option<bool>
  },
  AddItem {
    user:  UserId,
    #[serde(with = "due_serde")]
    due:   DateTime<Utc>,
    title: String
  },
  CompleteItem {
    id:   ItemId,
    done: bool
  }
}

impl Request {
  pub fn action(&self) -> &'static str {
    match self {
      | Self::GetUserFromEmail {
        ..
      } => "getUserFromEmail",
      | Self::AddUser {
        ..
      } => "addUser",
      | Self::GetUserItems {
        ..
      } => "getUserItems",
      | Self::AddItem {
        ..
      } => "addItem",
      | Self::CompleteItem {
        ..
      } => "completeItem"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Item {
  pub id:    ItemId,
  #[serde(default)]
  pub title: String,
  #[serde(with = "due_serde")]
  pub due:   DateTime<Utc>,
  #[serde(
    default,
    deserialize_with = "flag_serde::deserialize"
  )]
  pub done:  bool
}

/// Payload of a successful
/// `getUserFromEmail`.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct UserRecord {
  pub id:   UserId,
  #[serde(default)]
  pub name: String
}

/// Payload of a successful `addUser`.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct NewUser {
  pub id: UserId
}

/// Success reply that carries nothing
/// beyond the absence of `error`.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Ack {}

/// Due timestamps go out the way a
/// browser `JSON.stringify`s a date and
/// come back either as text or as epoch
/// milliseconds.
pub mod due_serde {
  use chrono::{
    DateTime,
    NaiveDateTime,
    SecondsFormat,
    Utc
  };
  use serde::{
    Deserialize,
    Deserializer,
    Serializer
  };

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawDue {
    Millis(i64),
    Text(String)
  }

  pub fn serialize<S>(
    dt: &DateTime<Utc>,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    serializer.serialize_str(
      &dt.to_rfc3339_opts(
        SecondsFormat::Millis,
        true
      )
    )
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<DateTime<Utc>, D::Error>
  where
    D: Deserializer<'de>
  {
    match RawDue::deserialize(
      deserializer
    )? {
      | RawDue::Millis(ms) => {
        DateTime::<Utc>::from_timestamp_millis(ms)
          .ok_or_else(|| {
            serde::de::Error::custom(
              format!(
                "due timestamp out of range: {ms}"
              )
            )
          })
      }
      | RawDue::Text(raw) => {
        parse_due_text(&raw)
          .map_err(serde::de::Error::custom)
      }
    }
  }

  fn parse_due_text(
    raw: &str
  ) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(dt) =
      DateTime::parse_from_rfc3339(
        trimmed
      )
    {
      return Ok(dt.with_timezone(&Utc));
    }

    // SQLite `datetime()` text, stored as UTC
    NaiveDateTime::parse_from_str(
      trimmed,
      "%Y-%m-%d %H:%M:%S"
    )
    .map(|ndt| ndt.and_utc())
    .map_err(|err| {
      format!(
        "invalid due timestamp \
         {trimmed:?}: {err}"
      )
    })
  }
}

/// Completion flags arrive as booleans or
/// as 0/1 integers.
pub mod flag_serde {
  use serde::{
    Deserialize,
    Deserializer
  };

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawFlag {
    Bool(bool),
    Int(i64)
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<bool, D::Error>
  where
    D: Deserializer<'de>
  {
    Ok(
      match RawFlag::deserialize(
        deserializer
      )? {
        | RawFlag::Bool(value) => value,
        | RawFlag::Int(value) => {
          value != 0
        }
      }
    )
  }
}
