use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use todo_shared::{Item, ItemId};

use crate::calendar::{DueForm, SelectOption};
use crate::datetime::{MONTH_NAMES, format_due_date, format_due_time, is_overdue};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    OldestFirst,
    #[default]
    LatestFirst,
}

/// Stable sort by due timestamp; items due at the same instant keep their
/// fetch order in both directions.
pub fn sort_items(items: &mut [Item], order: SortOrder) {
    match order {
        SortOrder::OldestFirst => items.sort_by(|a, b| a.due.cmp(&b.due)),
        SortOrder::LatestFirst => items.sort_by(|a, b| b.due.cmp(&a.due)),
    }
}

/// One rendered row of the item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: ItemId,
    pub title: String,
    pub date_label: String,
    pub time_label: String,
    pub overdue: bool,
    pub done: bool,
}

impl ItemView {
    #[must_use]
    pub fn dom_id(&self) -> String {
        format!("item-{}", self.id)
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.overdue { "item overdue" } else { "item" }
    }
}

#[tracing::instrument(skip(items, tz), fields(count = items.len()))]
pub fn item_views(items: &[Item], order: SortOrder, now: DateTime<Utc>, tz: &Tz) -> Vec<ItemView> {
    let mut sorted = items.to_vec();
    sort_items(&mut sorted, order);

    sorted
        .into_iter()
        .map(|item| ItemView {
            id: item.id,
            date_label: format_due_date(item.due, now, tz),
            time_label: format_due_time(item.due, tz),
            overdue: is_overdue(item.due, now),
            done: item.done,
            title: item.title,
        })
        .collect()
}

/// Snapshot of the add-item toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub year: i32,
    pub month: u32,
    pub day_options: Vec<SelectOption>,
    pub selected_day: Option<u32>,
    pub hour: u32,
    pub minute: u32,
    pub title: String,
}

impl From<&DueForm> for FormView {
    fn from(form: &DueForm) -> Self {
        Self {
            year: form.year,
            month: form.month,
            day_options: form.days.options(),
            selected_day: form.days.selected(),
            hour: form.hour,
            minute: form.minute,
            title: form.title.clone(),
        }
    }
}

#[must_use]
pub fn month_options() -> Vec<SelectOption> {
    MONTH_NAMES
        .iter()
        .zip(0..)
        .map(|(name, value)| SelectOption {
            value,
            label: (*name).to_string(),
        })
        .collect()
}
