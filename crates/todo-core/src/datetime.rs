use chrono::{
  DateTime,
  Datelike,
  Timelike,
  Utc
};
use chrono_tz::Tz;

use crate::calendar::two_digit;

pub const MONTH_NAMES: [&str; 12] = [
  "Jan", "Feb", "Mar", "Apr", "May",
  "Jun", "Jul", "Aug", "Sep", "Oct",
  "Nov", "Dec"
];

/// Picks the zone used for every
/// wall-clock conversion: the configured
/// name, then whatever the host reports,
/// then UTC.
pub fn resolve_timezone(
  configured: Option<&str>,
  detected: Option<&str>
) -> Tz {
  if let Some(raw) = configured
    && let Some(tz) =
      parse_timezone(raw, "config")
  {
    return tz;
  }

  if let Some(raw) = detected
    && let Some(tz) =
      parse_timezone(raw, "host")
  {
    return tz;
  }

  tracing::warn!(
    "no usable timezone; falling back \
     to UTC"
  );
  chrono_tz::UTC
}

fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::info!(
        source,
        timezone = %trimmed,
        "resolved timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::warn!(
        source,
        timezone = %trimmed,
        error = %err,
        "invalid timezone name"
      );
      None
    }
  }
}

/// `DD Mon`, with ` YYYY` appended when
/// the due year differs from `now`'s.
#[must_use]
pub fn format_due_date(
  due: DateTime<Utc>,
  now: DateTime<Utc>,
  tz: &Tz
) -> String {
  let local = due.with_timezone(tz);
  let current_year =
    now.with_timezone(tz).year();
  let month =
    MONTH_NAMES[local.month0() as usize];

  if local.year() == current_year {
    format!(
      "{} {month}",
      two_digit(local.day())
    )
  } else {
    format!(
      "{} {month} {}",
      two_digit(local.day()),
      local.year()
    )
  }
}

/// 12-hour `hh:mm` followed by `am`/`pm`.
#[must_use]
pub fn format_due_time(
  due: DateTime<Utc>,
  tz: &Tz
) -> String {
  let local = due.with_timezone(tz);
  let (pm, hour) = local.hour12();
  format!(
    "{}:{}{}",
    two_digit(hour),
    two_digit(local.minute()),
    if pm { "pm" } else { "am" }
  )
}

#[must_use]
pub fn is_overdue(
  due: DateTime<Utc>,
  now: DateTime<Utc>
) -> bool {
  due < now
}

#[cfg(test)]
mod tests {
  use chrono::{
    Duration,
    TimeZone
  };

  use super::*;

  fn utc(
    y: i32,
    mo: u32,
    d: u32,
    h: u32,
    mi: u32
  ) -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(y, mo, d, h, mi, 0)
      .single()
      .expect("valid timestamp")
  }

  #[test]
  fn same_year_omits_year() {
    let due = utc(2024, 3, 5, 13, 30);
    let now = utc(2024, 1, 1, 0, 0);
    assert_eq!(
      format_due_date(
        due,
        now,
        &chrono_tz::UTC
      ),
      "05 Mar"
    );
    assert_eq!(
      format_due_time(
        due,
        &chrono_tz::UTC
      ),
      "01:30pm"
    );
  }

  #[test]
  fn other_year_appends_year() {
    let due = utc(2024, 3, 5, 13, 30);
    let now = utc(2025, 6, 1, 0, 0);
    assert_eq!(
      format_due_date(
        due,
        now,
        &chrono_tz::UTC
      ),
      "05 Mar 2024"
    );
  }

  #[test]
  fn midnight_and_noon_read_as_twelve() {
    assert_eq!(
      format_due_time(
        utc(2024, 3, 5, 0, 5),
        &chrono_tz::UTC
      ),
      "12:05am"
    );
    assert_eq!(
      format_due_time(
        utc(2024, 3, 5, 12, 0),
        &chrono_tz::UTC
      ),
      "12:00pm"
    );
  }

  #[test]
  fn formatting_uses_the_given_zone() {
    let tz: Tz = "Asia/Tokyo"
      .parse()
      .expect("known zone");
    let due = utc(2024, 12, 31, 16, 0);
    let now = utc(2024, 6, 1, 0, 0);
    assert_eq!(
      format_due_date(due, now, &tz),
      "01 Jan 2025"
    );
    assert_eq!(
      format_due_time(due, &tz),
      "01:00am"
    );
  }

  #[test]
  fn overdue_is_strict() {
    let now = utc(2024, 3, 5, 13, 30);
    assert!(is_overdue(
      now - Duration::minutes(1),
      now
    ));
    assert!(!is_overdue(now, now));
    assert!(!is_overdue(
      now + Duration::minutes(1),
      now
    ));
  }

  #[test]
  fn timezone_falls_back_in_order() {
    assert_eq!(
      resolve_timezone(
        Some("Europe/Paris"),
        Some("Asia/Tokyo")
      ),
      chrono_tz::Europe::Paris
    );
    assert_eq!(
      resolve_timezone(
        Some("Mars/Olympus"),
        Some("Asia/Tokyo")
      ),
      chrono_tz::Asia::Tokyo
    );
    assert_eq!(
      resolve_timezone(None, Some(" ")),
      chrono_tz::UTC
    );
  }
}
