use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::item::{CalendarItem, ItemKind};
use super::ticket::Ticket;
use super::time::minutes_to_time;
use crate::error::CommitRejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOffKind {
    Vacation,
    Sick,
    Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOffRequest {
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TimeOffKind,
    #[serde(default)]
    pub status: ApprovalStatus,
}

impl TimeOffRequest {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A committed drag: new bounds for one item, and the day it was dropped on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeChange {
    pub item_id: String,
    pub date: NaiveDate,
    pub start_minutes: u16,
    pub end_minutes: u16,
}

/// Everything the scheduling desk works on, as loaded from the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub items: Vec<CalendarItem>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub time_off: Vec<TimeOffRequest>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

impl Schedule {
    pub fn item(&self, id: &str) -> Option<&CalendarItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut CalendarItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn events(&self) -> impl Iterator<Item = &CalendarItem> {
        self.items.iter().filter(|i| i.kind == ItemKind::Event)
    }

    pub fn shifts_of<'a>(&'a self, event_id: &'a str) -> impl Iterator<Item = &'a CalendarItem> {
        self.items
            .iter()
            .filter(move |i| i.kind == ItemKind::Shift && i.event_id.as_deref() == Some(event_id))
    }

    /// Shifts with no owning event, including those whose event is gone.
    pub fn standalone_shifts(&self) -> impl Iterator<Item = &CalendarItem> {
        self.items.iter().filter(move |i| {
            i.kind == ItemKind::Shift
                && i
                    .event_id
                    .as_deref()
                    .map_or(true, |event_id| self.item(event_id).is_none())
        })
    }

    pub fn open_tickets(&self) -> usize {
        self.tickets.iter().filter(|t| t.is_open()).count()
    }

    /// Write a committed drag back into the item. One-off items follow the
    /// drop day; repeating items keep their rule and only change time.
    pub fn apply(&mut self, change: &TimeChange) -> Result<(), CommitRejection> {
        if change.end_minutes <= change.start_minutes {
            return Err(CommitRejection::InvertedRange);
        }
        let item = self
            .item_mut(&change.item_id)
            .ok_or_else(|| CommitRejection::UnknownItem(change.item_id.clone()))?;
        // the file may have been reloaded since the drag started
        item.span()?;
        item.start_time = minutes_to_time(change.start_minutes);
        item.end_time = if change.end_minutes >= 24 * 60 {
            "24:00".to_string()
        } else {
            minutes_to_time(change.end_minutes)
        };
        if !item.recurrence.is_recurring() {
            item.anchor_date = Some(change.date);
        }
        Ok(())
    }
}
