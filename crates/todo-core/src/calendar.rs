use chrono::{DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::debug;

const MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DueError {
    /// `month` is 0-based, as the form holds it.
    #[error("due date out of range (year {year}, month index {month}, day {day})")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a 1-based `month`, or `None` for a month outside 1..=12.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let idx = month.checked_sub(1)? as usize;
    let len = *MONTH_LENGTHS.get(idx)?;
    if month == 2 && is_leap_year(year) {
        Some(29)
    } else {
        Some(len)
    }
}

/// Zero-padded two digit rendering used by every selector label and the
/// item date/time columns.
#[must_use]
pub fn two_digit(n: u32) -> String {
    format!("{:02}", n % 100)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: u32,
    pub label: String,
}

#[must_use]
pub fn hour_options() -> Vec<SelectOption> {
    (0..24)
        .map(|hour| SelectOption {
            value: hour,
            label: format!(
                "{}{}",
                two_digit(if hour % 12 == 0 { 12 } else { hour % 12 }),
                if hour < 12 { "am" } else { "pm" }
            ),
        })
        .collect()
}

#[must_use]
pub fn minute_options() -> Vec<SelectOption> {
    (0..60)
        .map(|minute| SelectOption {
            value: minute,
            label: two_digit(minute),
        })
        .collect()
}

/// Day-of-month selector. Holds the option count for the current month and
/// the selected value, which may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySelector {
    len: u32,
    selected: Option<u32>,
}

impl DaySelector {
    /// Freshly populated selector; like an HTML `<select>`, the first option
    /// starts out selected.
    #[must_use]
    pub fn for_month(year: i32, month: u32) -> Self {
        let len = days_in_month(year, month).unwrap_or(0);
        Self {
            len,
            selected: (len > 0).then_some(1),
        }
    }

    /// Repopulates for a new year/month and re-applies the previous day.
    /// A day past the end of the new month is not clamped: the selection
    /// becomes empty.
    pub fn rebuild(&mut self, year: i32, month: u32) {
        let previous = self.selected;
        *self = Self::for_month(year, month);
        match previous {
            Some(day) => self.select(day),
            None => self.selected = None,
        }
        debug!(year, month, days = self.len, selected = ?self.selected, "rebuilt day selector");
    }

    pub fn select(&mut self, day: u32) {
        self.selected = (1..=self.len).contains(&day).then_some(day);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    #[must_use]
    pub fn options(&self) -> Vec<SelectOption> {
        (1..=self.len)
            .map(|day| SelectOption {
                value: day,
                label: day.to_string(),
            })
            .collect()
    }
}

/// The add-item toolbar: due date fields plus the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueForm {
    pub year: i32,
    /// 0-based, matching the month selector values.
    pub month: u32,
    pub days: DaySelector,
    pub hour: u32,
    pub minute: u32,
    pub title: String,
}

impl DueForm {
    #[must_use]
    pub fn starting_on(today: NaiveDate) -> Self {
        let mut form = Self {
            year: today.year(),
            month: today.month0(),
            days: DaySelector::for_month(today.year(), today.month()),
            hour: 0,
            minute: 0,
            title: String::new(),
        };
        form.days.select(today.day());
        form
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
        self.days.rebuild(self.year, self.month.saturating_add(1));
    }

    pub fn set_month(&mut self, month: u32) {
        self.month = month;
        self.days.rebuild(self.year, self.month.saturating_add(1));
    }

    /// Jumps the date fields to `today`; hour, minute and title are kept.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.year = today.year();
        self.days = DaySelector::for_month(today.year(), today.month());
        self.month = today.month0();
        self.days.select(today.day());
    }

    /// Combines the fields (seconds fixed at zero) into an absolute instant,
    /// reading them as wall-clock time in `tz`.
    ///
    /// Fields roll over like a browser `Date`: an empty day counts as day 0,
    /// the last day of the previous month. Ambiguous wall-clock times resolve
    /// to the earlier instant; times inside a gap keep the offset in force
    /// before it, which lands them past the gap.
    pub fn compose(&self, tz: &Tz) -> Result<DateTime<Utc>, DueError> {
        let day = self.days.selected().unwrap_or(0);
        let out_of_range = || DueError::OutOfRange {
            year: self.year,
            month: self.month,
            day,
        };

        let local = NaiveDate::from_ymd_opt(self.year, 1, 1)
            .and_then(|jan_1| jan_1.checked_add_months(Months::new(self.month)))
            .and_then(|first| first.and_hms_opt(0, 0, 0))
            .and_then(|midnight| {
                let offset = Duration::try_days(i64::from(day) - 1)?
                    .checked_add(&Duration::try_hours(i64::from(self.hour))?)?
                    .checked_add(&Duration::try_minutes(i64::from(self.minute))?)?;
                midnight.checked_add_signed(offset)
            })
            .ok_or_else(out_of_range)?;

        match tz.from_local_datetime(&local) {
            LocalResult::Single(due) | LocalResult::Ambiguous(due, _) => Ok(due.with_timezone(&Utc)),
            LocalResult::None => {
                let offset = local
                    .checked_sub_signed(Duration::days(1))
                    .and_then(|before| tz.offset_from_local_datetime(&before).earliest())
                    .map(|offset| offset.fix())
                    .ok_or_else(out_of_range)?;
                let due = local
                    .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
                    .ok_or_else(out_of_range)?
                    .and_utc();
                debug!(%local, %due, "local time falls in a gap; shifted past it");
                Ok(due)
            }
        }
    }
}
